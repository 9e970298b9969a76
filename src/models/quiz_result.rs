use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Selected answer ids keyed by question id.
pub type Selections = BTreeMap<String, BTreeSet<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    pub selected: Vec<String>,
    pub correct: Vec<String>,
    pub earned: u32,
    pub max: u32,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub earned: u64,
    pub max: u64,
    pub percentage: u32,
    pub passing_score: u32,
    pub passed: bool,
    pub questions: Vec<QuestionOutcome>,
}

impl QuizResult {
    pub fn correct_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_correct).count()
    }

    pub fn outcome(&self, question_id: &str) -> Option<&QuestionOutcome> {
        self.questions.iter().find(|q| q.question_id == question_id)
    }
}
