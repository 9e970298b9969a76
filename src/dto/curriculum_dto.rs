use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::lesson_item::ItemContent;
use crate::models::module::PublishStatus;

/// Save action of the item form. Absent fields keep their current value; a
/// present `content` replaces the whole payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ItemPatch {
    #[serde(default, deserialize_with = "trim_optional_string")]
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub is_required: Option<bool>,
    pub is_preview: Option<bool>,
    pub content: Option<ItemContent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ModulePatch {
    #[serde(default, deserialize_with = "trim_optional_string")]
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    /// An empty string clears the description.
    pub description: Option<String>,
    pub status: Option<PublishStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LessonPatch {
    #[serde(default, deserialize_with = "trim_optional_string")]
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub status: Option<PublishStatus>,
}

/// Course-level fields edited on the details step.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CourseDetailsPatch {
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub category_id: Option<String>,
    pub learning_objectives: Option<Vec<String>>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub thumbnail_url: Option<String>,
}

/// Which sibling list a reorder targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum SiblingScope {
    Modules,
    Lessons { module_id: String },
    Items { module_id: String, lesson_id: String },
}

/// `{ id, sort_order }` pair accepted by per-level reorder endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderEntry {
    pub id: String,
    pub sort_order: u32,
}

// Trims strings and turns empty ones into None
fn trim_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
