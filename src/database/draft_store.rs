//! Persistence boundary for curriculum drafts.
//!
//! A draft is always written as one complete document. Each write carries
//! the revision assigned when the commit was issued, and a store only
//! accepts a write whose revision is newer than what it holds. A slow commit
//! that lands after a later one is therefore dropped instead of overwriting it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::course::CourseDraft;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDraft {
    pub draft_id: String,
    pub revision: u64,
    pub saved_at: DateTime<Utc>,
    pub course: CourseDraft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitOutcome {
    Applied,
    /// A write with an equal or newer revision was already persisted.
    Superseded { current_revision: u64 },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn load(&self, draft_id: &str) -> Result<Option<StoredDraft>>;

    async fn commit(&self, draft: &StoredDraft) -> Result<CommitOutcome>;
}

/// Rejects ids that would escape a key namespace or a directory.
pub fn check_draft_id(draft_id: &str) -> Result<()> {
    let valid = !draft_id.is_empty()
        && draft_id.len() <= 128
        && draft_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(crate::error::Error::InvalidState(format!(
            "invalid draft id '{}'",
            draft_id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_ids_are_restricted() {
        assert!(check_draft_id("course-42_v2").is_ok());
        assert!(check_draft_id("").is_err());
        assert!(check_draft_id("../etc/passwd").is_err());
        assert!(check_draft_id("a b").is_err());
    }
}
