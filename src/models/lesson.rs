use serde::{Deserialize, Serialize};

use crate::models::lesson_item::LessonItem;
use crate::models::module::PublishStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub module_id: String,
    pub title: String,
    pub sort_order: u32,
    #[serde(default)]
    pub status: PublishStatus,
    #[serde(default)]
    pub items: Vec<LessonItem>,
}

impl Lesson {
    pub fn item(&self, item_id: &str) -> Option<&LessonItem> {
        self.items.iter().find(|i| i.id == item_id)
    }
}
