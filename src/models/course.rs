use serde::{Deserialize, Serialize};

use crate::models::lesson::Lesson;
use crate::models::lesson_item::LessonItem;
use crate::models::module::Module;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    #[default]
    Draft,
    PendingReview,
    Published,
}

/// Root of the curriculum tree persisted as one draft document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDraft {
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub status: CourseStatus,
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl CourseDraft {
    pub fn new(course_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            title: title.into(),
            description: None,
            category_id: None,
            learning_objectives: Vec::new(),
            thumbnail_url: None,
            status: CourseStatus::Draft,
            modules: Vec::new(),
        }
    }

    pub fn module(&self, module_id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    pub fn lesson(&self, module_id: &str, lesson_id: &str) -> Option<&Lesson> {
        self.module(module_id).and_then(|m| m.lesson(lesson_id))
    }

    /// Looks an item up anywhere in the tree.
    pub fn find_item(&self, item_id: &str) -> Option<&LessonItem> {
        self.items().find(|i| i.id == item_id)
    }

    pub fn items(&self) -> impl Iterator<Item = &LessonItem> {
        self.modules
            .iter()
            .flat_map(|m| m.lessons.iter())
            .flat_map(|l| l.items.iter())
    }

    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }
}
