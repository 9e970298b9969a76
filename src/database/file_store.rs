use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::database::draft_store::{check_draft_id, CommitOutcome, DraftStore, StoredDraft};
use crate::error::Result;

/// One pretty-printed JSON document per draft under `dir`.
///
/// Writes go to a temporary sibling and are renamed into place, so a reader
/// never sees a half-written document. The mutex serializes the
/// read-compare-write of a commit within this process.
#[derive(Debug)]
pub struct FileDraftStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileDraftStore {
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, draft_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", draft_id))
    }

    async fn read(&self, draft_id: &str) -> Result<Option<StoredDraft>> {
        let path = self.path_for(draft_id);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl DraftStore for FileDraftStore {
    async fn load(&self, draft_id: &str) -> Result<Option<StoredDraft>> {
        check_draft_id(draft_id)?;
        self.read(draft_id).await
    }

    async fn commit(&self, draft: &StoredDraft) -> Result<CommitOutcome> {
        check_draft_id(&draft.draft_id)?;
        let _guard = self.write_lock.lock().await;

        if let Some(current) = self.read(&draft.draft_id).await? {
            if current.revision >= draft.revision {
                return Ok(CommitOutcome::Superseded {
                    current_revision: current.revision,
                });
            }
        }

        let path = self.path_for(&draft.draft_id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(draft)?).await?;
        fs::rename(&tmp, &path).await?;
        debug!(
            draft_id = %draft.draft_id,
            revision = draft.revision,
            path = %path.display(),
            "draft written"
        );
        Ok(CommitOutcome::Applied)
    }
}
