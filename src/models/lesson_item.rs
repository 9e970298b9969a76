use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::models::content::{
    CodingContent, FileContent, QuizContent, ReadingContent, VideoContent,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Video,
    Reading,
    Quiz,
    Coding,
    File,
}

impl ItemType {
    pub const ALL: [ItemType; 5] = [
        ItemType::Video,
        ItemType::Reading,
        ItemType::Quiz,
        ItemType::Coding,
        ItemType::File,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Video => "video",
            ItemType::Reading => "reading",
            ItemType::Quiz => "quiz",
            ItemType::Coding => "coding",
            ItemType::File => "file",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exactly one payload per item; the variant is the item's type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "item_type", content = "payload", rename_all = "snake_case")]
pub enum ItemContent {
    Video(VideoContent),
    Reading(ReadingContent),
    Quiz(QuizContent),
    Coding(CodingContent),
    File(FileContent),
}

impl ItemContent {
    pub fn item_type(&self) -> ItemType {
        match self {
            ItemContent::Video(_) => ItemType::Video,
            ItemContent::Reading(_) => ItemType::Reading,
            ItemContent::Quiz(_) => ItemType::Quiz,
            ItemContent::Coding(_) => ItemType::Coding,
            ItemContent::File(_) => ItemType::File,
        }
    }

    /// Minutes counted toward the course's total duration.
    pub fn duration_minutes(&self) -> u32 {
        match self {
            ItemContent::Video(v) => v.duration,
            ItemContent::Reading(r) => r.duration,
            ItemContent::Quiz(_) | ItemContent::Coding(_) | ItemContent::File(_) => 0,
        }
    }

    pub fn as_quiz(&self) -> Option<&QuizContent> {
        match self {
            ItemContent::Quiz(quiz) => Some(quiz),
            _ => None,
        }
    }
}

impl Validate for ItemContent {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            ItemContent::Video(v) => v.validate(),
            ItemContent::Reading(r) => r.validate(),
            ItemContent::Quiz(q) => q.validate(),
            ItemContent::Coding(c) => c.validate(),
            ItemContent::File(f) => f.validate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonItem {
    pub id: String,
    pub lesson_id: String,
    pub title: String,
    pub sort_order: u32,
    #[serde(default = "default_required")]
    pub is_required: bool,
    #[serde(default)]
    pub is_preview: bool,
    pub content: ItemContent,
}

fn default_required() -> bool {
    true
}

impl LessonItem {
    pub fn item_type(&self) -> ItemType {
        self.content.item_type()
    }
}
