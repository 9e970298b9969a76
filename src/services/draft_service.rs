//! Keeps an authoring session's curriculum tree in step with the draft store.
//!
//! Every form save becomes a pure tree mutation followed by a commit of the
//! complete tree. Nothing is ever written field by field, so any reader of the
//! store sees a whole, internally consistent snapshot.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::database::draft_store::{CommitOutcome, DraftStore, StoredDraft};
use crate::dto::curriculum_dto::{
    CourseDetailsPatch, ItemPatch, LessonPatch, ModulePatch, SiblingScope,
};
use crate::error::{Error, Result};
use crate::models::course::{CourseDraft, CourseStatus};
use crate::models::lesson_item::ItemType;
use crate::services::curriculum_service::CurriculumService;
use crate::services::review_service::{ReviewService, ReviewSummary};
use crate::utils::time::now;

// Highest revision issued or observed for one draft; `None` until seeded
// from the store.
type RevisionSlot = Arc<tokio::sync::Mutex<Option<u64>>>;

#[derive(Clone)]
pub struct DraftService {
    store: Arc<dyn DraftStore>,
    curriculum: CurriculumService,
    review: ReviewService,
    revisions: Arc<Mutex<HashMap<String, RevisionSlot>>>,
}

impl DraftService {
    pub fn new(
        store: Arc<dyn DraftStore>,
        curriculum: CurriculumService,
        review: ReviewService,
    ) -> Self {
        Self {
            store,
            curriculum,
            review,
            revisions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn curriculum(&self) -> &CurriculumService {
        &self.curriculum
    }

    pub fn review(&self) -> &ReviewService {
        &self.review
    }

    /// Starts a new draft keyed by `course_id` and persists it immediately.
    pub async fn create(&self, course_id: &str, title: &str) -> Result<DraftSession> {
        if let Some(existing) = self.store.load(course_id).await? {
            self.observe(course_id, existing.revision).await?;
            return Err(Error::InvalidState(format!(
                "draft {} already exists at revision {}",
                course_id, existing.revision
            )));
        }
        let tree = CourseDraft::new(course_id, title);
        let outcome = self.commit(course_id, &tree).await?;
        info!(draft_id = %course_id, "draft created");
        Ok(DraftSession {
            service: self.clone(),
            draft_id: course_id.to_string(),
            snapshot: tree,
            last_outcome: Some(outcome),
        })
    }

    /// Reads the stored tree and repairs any ordering damage it carries.
    pub async fn load(&self, draft_id: &str) -> Result<CourseDraft> {
        let stored = self
            .store
            .load(draft_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Draft {}", draft_id)))?;
        self.observe(draft_id, stored.revision).await?;

        let (tree, repaired) = self.curriculum.normalize(&stored.course);
        if repaired {
            warn!(
                %draft_id,
                revision = stored.revision,
                "stored draft had inconsistent ordering; repaired in memory"
            );
        }
        Ok(tree)
    }

    pub async fn open(&self, draft_id: &str) -> Result<DraftSession> {
        let snapshot = self.load(draft_id).await?;
        Ok(DraftSession {
            service: self.clone(),
            draft_id: draft_id.to_string(),
            snapshot,
            last_outcome: None,
        })
    }

    /// Writes the whole tree under the next revision for `draft_id`. Revisions
    /// follow the order commits were issued, so a commit issued earlier can
    /// never replace one issued later, whatever order they complete in.
    pub async fn commit(&self, draft_id: &str, tree: &CourseDraft) -> Result<CommitOutcome> {
        let revision = self.reserve_revision(draft_id).await?;
        let draft = StoredDraft {
            draft_id: draft_id.to_string(),
            revision,
            saved_at: now(),
            course: tree.clone(),
        };

        let outcome = self.store.commit(&draft).await?;
        match outcome {
            CommitOutcome::Applied => {
                info!(%draft_id, revision, modules = tree.modules.len(), "draft committed");
            }
            CommitOutcome::Superseded { current_revision } => {
                self.observe(draft_id, current_revision).await?;
                warn!(
                    %draft_id,
                    revision,
                    current_revision,
                    "commit superseded by a newer write"
                );
            }
        }
        Ok(outcome)
    }

    /// Load, mutate, commit. Returns the committed tree.
    pub async fn apply<F>(&self, draft_id: &str, mutation: F) -> Result<CourseDraft>
    where
        F: FnOnce(&CurriculumService, &CourseDraft) -> Result<CourseDraft>,
    {
        let current = self.load(draft_id).await?;
        let next = mutation(&self.curriculum, &current)?;
        self.commit(draft_id, &next).await?;
        Ok(next)
    }

    /// Moves the stored draft to pending review when nothing blocks it.
    pub async fn submit(&self, draft_id: &str) -> Result<ReviewSummary> {
        let tree = self.load(draft_id).await?;
        let (summary, submitted) = self.prepare_submission(&tree)?;
        self.commit(draft_id, &submitted).await?;
        info!(%draft_id, "draft submitted for review");
        Ok(summary)
    }

    fn prepare_submission(&self, tree: &CourseDraft) -> Result<(ReviewSummary, CourseDraft)> {
        if tree.status != CourseStatus::Draft {
            return Err(Error::InvalidState(format!(
                "course {} is not a draft",
                tree.course_id
            )));
        }
        let summary = self.review.ensure_submittable(tree)?;
        let mut submitted = tree.clone();
        submitted.status = CourseStatus::PendingReview;
        Ok((summary, submitted))
    }

    fn slot(&self, draft_id: &str) -> Result<RevisionSlot> {
        let mut revisions = self
            .revisions
            .lock()
            .map_err(|_| Error::Internal("revision counter poisoned".to_string()))?;
        Ok(revisions.entry(draft_id.to_string()).or_default().clone())
    }

    async fn observe(&self, draft_id: &str, revision: u64) -> Result<()> {
        let slot = self.slot(draft_id)?;
        let mut last = slot.lock().await;
        *last = Some(last.map_or(revision, |seen| seen.max(revision)));
        Ok(())
    }

    /// The per-draft lock is taken on the first poll and is granted in FIFO
    /// order. It stays held while an unseeded draft is read from the store, so
    /// revisions are handed out in issue order.
    async fn reserve_revision(&self, draft_id: &str) -> Result<u64> {
        let slot = self.slot(draft_id)?;
        let mut last = slot.lock().await;
        let seen = match *last {
            Some(seen) => seen,
            None => self
                .store
                .load(draft_id)
                .await?
                .map_or(0, |stored| stored.revision),
        };
        let next = seen + 1;
        *last = Some(next);
        Ok(next)
    }
}

/// One author's working copy of a draft. Mutations run against the local
/// snapshot, which is replaced only after the commit call returns. When a
/// newer write supersedes the commit, the edit is dropped and the session
/// reloads the stored tree.
pub struct DraftSession {
    service: DraftService,
    draft_id: String,
    snapshot: CourseDraft,
    last_outcome: Option<CommitOutcome>,
}

impl DraftSession {
    pub fn draft_id(&self) -> &str {
        &self.draft_id
    }

    pub fn snapshot(&self) -> &CourseDraft {
        &self.snapshot
    }

    /// Outcome of the most recent commit made through this session.
    pub fn last_outcome(&self) -> Option<CommitOutcome> {
        self.last_outcome
    }

    pub fn summary(&self) -> ReviewSummary {
        self.service.review.summarize(&self.snapshot)
    }

    pub async fn apply<F>(&mut self, mutation: F) -> Result<&CourseDraft>
    where
        F: FnOnce(&CurriculumService, &CourseDraft) -> Result<CourseDraft>,
    {
        let next = mutation(&self.service.curriculum, &self.snapshot)?;
        let outcome = self.service.commit(&self.draft_id, &next).await?;
        self.adopt(next, outcome).await?;
        Ok(&self.snapshot)
    }

    async fn adopt(&mut self, next: CourseDraft, outcome: CommitOutcome) -> Result<()> {
        self.last_outcome = Some(outcome);
        self.snapshot = match outcome {
            CommitOutcome::Applied => next,
            CommitOutcome::Superseded { .. } => self.service.load(&self.draft_id).await?,
        };
        Ok(())
    }

    pub async fn add_module(&mut self) -> Result<&CourseDraft> {
        self.apply(|c, tree| Ok(c.add_module(tree))).await
    }

    pub async fn add_lesson(&mut self, module_id: &str) -> Result<&CourseDraft> {
        self.apply(|c, tree| c.add_lesson(tree, module_id)).await
    }

    pub async fn add_item(
        &mut self,
        module_id: &str,
        lesson_id: &str,
        item_type: ItemType,
    ) -> Result<&CourseDraft> {
        self.apply(|c, tree| c.add_item(tree, module_id, lesson_id, item_type))
            .await
    }

    pub async fn remove_module(&mut self, module_id: &str) -> Result<&CourseDraft> {
        self.apply(|c, tree| c.remove_module(tree, module_id)).await
    }

    pub async fn remove_lesson(
        &mut self,
        module_id: &str,
        lesson_id: &str,
    ) -> Result<&CourseDraft> {
        self.apply(|c, tree| c.remove_lesson(tree, module_id, lesson_id))
            .await
    }

    pub async fn remove_item(
        &mut self,
        module_id: &str,
        lesson_id: &str,
        item_id: &str,
    ) -> Result<&CourseDraft> {
        self.apply(|c, tree| c.remove_item(tree, module_id, lesson_id, item_id))
            .await
    }

    pub async fn reorder(
        &mut self,
        scope: &SiblingScope,
        order: &[String],
    ) -> Result<&CourseDraft> {
        self.apply(|c, tree| c.reorder(tree, scope, order)).await
    }

    pub async fn save_item(&mut self, item_id: &str, patch: &ItemPatch) -> Result<&CourseDraft> {
        self.apply(|c, tree| c.update_item(tree, item_id, patch)).await
    }

    pub async fn save_module(
        &mut self,
        module_id: &str,
        patch: &ModulePatch,
    ) -> Result<&CourseDraft> {
        self.apply(|c, tree| c.update_module(tree, module_id, patch))
            .await
    }

    pub async fn save_lesson(
        &mut self,
        module_id: &str,
        lesson_id: &str,
        patch: &LessonPatch,
    ) -> Result<&CourseDraft> {
        self.apply(|c, tree| c.update_lesson(tree, module_id, lesson_id, patch))
            .await
    }

    pub async fn save_details(&mut self, patch: &CourseDetailsPatch) -> Result<&CourseDraft> {
        self.apply(|c, tree| c.update_course_details(tree, patch))
            .await
    }

    /// Submits the session's snapshot. Blocking issues come back as
    /// `ValidationFailed` and nothing is written.
    pub async fn submit(&mut self) -> Result<ReviewSummary> {
        let (summary, submitted) = self.service.prepare_submission(&self.snapshot)?;
        let outcome = self.service.commit(&self.draft_id, &submitted).await?;
        self.adopt(submitted, outcome).await?;
        if let CommitOutcome::Superseded { .. } = outcome {
            return Err(Error::InvalidState(
                "Draft changed elsewhere before it was submitted".to_string(),
            ));
        }
        info!(draft_id = %self.draft_id, "draft submitted for review");
        Ok(summary)
    }
}
