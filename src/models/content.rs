//! Payload records for the five lesson item variants.
//!
//! Each variant carries its own validation rules. Defaults mirror what the
//! authoring form pre-fills when an item of that type is added.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::question::Question;
use crate::utils::text::{estimate_reading_minutes, is_visually_blank};

pub const DEFAULT_READING_MINUTES: u32 = 5;
pub const DEFAULT_QUIZ_TIME_LIMIT: u32 = 30;
pub const DEFAULT_PASSING_SCORE: u32 = 70;
pub const DEFAULT_CODING_MAX_SCORE: u32 = 100;
pub const DEFAULT_CODING_DUE_DAYS: u32 = 7;

pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be empty".into());
        return Err(err);
    }
    Ok(())
}

/// Rich-text fields must show something once markup is removed.
pub fn non_blank_text(value: &str) -> Result<(), ValidationError> {
    if is_visually_blank(value) {
        let mut err = ValidationError::new("blank");
        err.message = Some("Content must not be empty".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct VideoContent {
    #[validate(custom(function = "non_blank"))]
    pub video_url: String,
    /// Minutes.
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ReadingContent {
    #[validate(custom(function = "non_blank_text"))]
    pub content: String,
    /// Authored estimate in minutes. Not derived from `content`.
    #[serde(default = "default_reading_minutes")]
    #[validate(range(min = 1, message = "Reading duration must be at least 1 minute"))]
    pub duration: u32,
}

fn default_reading_minutes() -> u32 {
    DEFAULT_READING_MINUTES
}

impl Default for ReadingContent {
    fn default() -> Self {
        Self {
            content: String::new(),
            duration: DEFAULT_READING_MINUTES,
        }
    }
}

impl ReadingContent {
    /// Word-count based hint displayed beside the authored duration.
    pub fn suggested_duration(&self, words_per_minute: u32) -> u32 {
        estimate_reading_minutes(&self.content, words_per_minute)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct QuizContent {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_time_limit")]
    #[validate(range(min = 1, max = 180, message = "Time limit must be between 1 and 180 minutes"))]
    pub time_limit_minutes: u32,
    #[serde(default = "default_passing_score")]
    #[validate(range(max = 100, message = "Passing score must be between 0 and 100"))]
    pub passing_score: u32,
    #[validate(length(min = 1, message = "A quiz needs at least one question"), nested)]
    pub questions: Vec<Question>,
}

fn default_time_limit() -> u32 {
    DEFAULT_QUIZ_TIME_LIMIT
}

fn default_passing_score() -> u32 {
    DEFAULT_PASSING_SCORE
}

impl QuizContent {
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn max_score(&self) -> u64 {
        self.questions.iter().map(|q| u64::from(q.score)).sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodingLanguage {
    #[default]
    Python,
    Javascript,
    Typescript,
    Java,
    Cpp,
    Csharp,
    Go,
    Rust,
    Php,
    Ruby,
}

impl CodingLanguage {
    pub const ALL: [CodingLanguage; 10] = [
        CodingLanguage::Python,
        CodingLanguage::Javascript,
        CodingLanguage::Typescript,
        CodingLanguage::Java,
        CodingLanguage::Cpp,
        CodingLanguage::Csharp,
        CodingLanguage::Go,
        CodingLanguage::Rust,
        CodingLanguage::Php,
        CodingLanguage::Ruby,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CodingLanguage::Python => "python",
            CodingLanguage::Javascript => "javascript",
            CodingLanguage::Typescript => "typescript",
            CodingLanguage::Java => "java",
            CodingLanguage::Cpp => "cpp",
            CodingLanguage::Csharp => "csharp",
            CodingLanguage::Go => "go",
            CodingLanguage::Rust => "rust",
            CodingLanguage::Php => "php",
            CodingLanguage::Ruby => "ruby",
        }
    }
}

impl fmt::Display for CodingLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CodingContent {
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "non_blank_text"))]
    pub instructions: String,
    #[serde(default)]
    pub starter_code: Option<String>,
    #[serde(default)]
    pub language: CodingLanguage,
    #[serde(default = "default_max_score")]
    #[validate(range(min = 1, message = "Max score must be at least 1"))]
    pub max_score: u32,
    #[serde(default = "default_due_days")]
    #[validate(range(min = 1, message = "Due days must be at least 1"))]
    pub due_days: u32,
}

fn default_max_score() -> u32 {
    DEFAULT_CODING_MAX_SCORE
}

fn default_due_days() -> u32 {
    DEFAULT_CODING_DUE_DAYS
}

impl Default for CodingContent {
    fn default() -> Self {
        Self {
            description: String::new(),
            instructions: String::new(),
            starter_code: None,
            language: CodingLanguage::default(),
            max_score: DEFAULT_CODING_MAX_SCORE,
            due_days: DEFAULT_CODING_DUE_DAYS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FileContent {
    #[validate(custom(function = "non_blank"))]
    pub file_url: String,
    /// Extension without the dot, e.g. `pdf`.
    #[validate(custom(function = "non_blank"))]
    pub file_type: String,
    /// Bytes.
    #[serde(default)]
    pub file_size: Option<u64>,
}
