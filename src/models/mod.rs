pub mod answer;
pub mod content;
pub mod course;
pub mod lesson;
pub mod lesson_item;
pub mod module;
pub mod question;
pub mod quiz_result;
