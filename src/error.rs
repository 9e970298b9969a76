use crate::models::lesson_item::ItemType;
use crate::services::review_service::ReviewIssue;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid permutation: {0}")]
    InvalidPermutation(String),

    #[error("Type mismatch: item is {expected}, patch carries {actual}")]
    TypeMismatch { expected: ItemType, actual: ItemType },

    #[error("Degenerate quiz: {0}")]
    DegenerateQuiz(String),

    #[error("Validation failed: {}", join_issues(.0))]
    ValidationFailed(Vec<ReviewIssue>),

    #[error("Unanswered questions: {}", .0.join(", "))]
    UnansweredQuestions(Vec<String>),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Calls the authoring UI must never construct. Seeing one means a bug upstream.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_)
                | Error::InvalidPermutation(_)
                | Error::TypeMismatch { .. }
                | Error::DegenerateQuiz(_)
        )
    }

    /// Conditions the author can fix and retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::ValidationFailed(_) | Error::UnansweredQuestions(_) | Error::Validation(_)
        )
    }
}

fn join_issues(issues: &[ReviewIssue]) -> String {
    issues
        .iter()
        .map(|i| i.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_contract_violations() {
        assert!(Error::NotFound("m1".into()).is_contract_violation());
        assert!(Error::InvalidPermutation("x".into()).is_contract_violation());
        assert!(!Error::ValidationFailed(vec![]).is_contract_violation());
        assert!(Error::ValidationFailed(vec![]).is_recoverable());
        assert!(!Error::Internal("boom".into()).is_recoverable());
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err: Error = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
