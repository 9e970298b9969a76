use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;

use crate::database::draft_store::{check_draft_id, CommitOutcome, DraftStore, StoredDraft};
use crate::error::{Error, Result};
use crate::models::course::CourseDraft;

/// Drafts kept as JSONB rows in `course_drafts`.
#[derive(Clone, Debug)]
pub struct PgDraftStore {
    pool: PgPool,
}

fn to_db_revision(revision: u64) -> Result<i64> {
    i64::try_from(revision)
        .map_err(|_| Error::Internal(format!("revision {} overflows BIGINT", revision)))
}

fn from_db_revision(revision: i64) -> Result<u64> {
    u64::try_from(revision)
        .map_err(|_| Error::Internal(format!("negative revision {} in storage", revision)))
}

impl PgDraftStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("course_drafts migrations applied");
        Ok(())
    }
}

#[async_trait]
impl DraftStore for PgDraftStore {
    async fn load(&self, draft_id: &str) -> Result<Option<StoredDraft>> {
        check_draft_id(draft_id)?;
        let row = sqlx::query_as::<_, (String, i64, Json<CourseDraft>, DateTime<Utc>)>(
            r#"
            SELECT draft_id, revision, document, saved_at
            FROM course_drafts
            WHERE draft_id = $1
            "#,
        )
        .bind(draft_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(draft_id, revision, Json(course), saved_at)| {
            Ok(StoredDraft {
                draft_id,
                revision: from_db_revision(revision)?,
                saved_at,
                course,
            })
        })
        .transpose()
    }

    async fn commit(&self, draft: &StoredDraft) -> Result<CommitOutcome> {
        check_draft_id(&draft.draft_id)?;
        let revision = to_db_revision(draft.revision)?;

        // The conditional upsert is the whole last-writer-wins check; no row
        // comes back when the stored revision is already newer.
        let written: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO course_drafts (draft_id, revision, document, saved_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (draft_id) DO UPDATE
            SET revision = EXCLUDED.revision,
                document = EXCLUDED.document,
                saved_at = EXCLUDED.saved_at
            WHERE course_drafts.revision < EXCLUDED.revision
            RETURNING revision
            "#,
        )
        .bind(&draft.draft_id)
        .bind(revision)
        .bind(Json(&draft.course))
        .bind(draft.saved_at)
        .fetch_optional(&self.pool)
        .await?;

        if written.is_some() {
            return Ok(CommitOutcome::Applied);
        }

        let current: i64 =
            sqlx::query_scalar("SELECT revision FROM course_drafts WHERE draft_id = $1")
                .bind(&draft.draft_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(CommitOutcome::Superseded {
            current_revision: from_db_revision(current)?,
        })
    }
}
