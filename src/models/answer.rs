use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Answer {
    pub id: String,
    #[validate(custom(function = "crate::models::content::non_blank"))]
    pub content: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl Answer {
    pub fn new(id: String, content: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id,
            content: content.into(),
            is_correct,
        }
    }
}
