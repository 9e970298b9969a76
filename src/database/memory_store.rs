use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::draft_store::{check_draft_id, CommitOutcome, DraftStore, StoredDraft};
use crate::error::Result;

/// Session-local store. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryDraftStore {
    drafts: Arc<RwLock<HashMap<String, StoredDraft>>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.drafts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.drafts.read().await.is_empty()
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn load(&self, draft_id: &str) -> Result<Option<StoredDraft>> {
        check_draft_id(draft_id)?;
        Ok(self.drafts.read().await.get(draft_id).cloned())
    }

    async fn commit(&self, draft: &StoredDraft) -> Result<CommitOutcome> {
        check_draft_id(&draft.draft_id)?;
        let mut drafts = self.drafts.write().await;
        if let Some(current) = drafts.get(&draft.draft_id) {
            if current.revision >= draft.revision {
                return Ok(CommitOutcome::Superseded {
                    current_revision: current.revision,
                });
            }
        }
        drafts.insert(draft.draft_id.clone(), draft.clone());
        Ok(CommitOutcome::Applied)
    }
}
