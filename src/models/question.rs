use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::answer::Answer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_answer_key"))]
pub struct Question {
    pub id: String,
    #[validate(custom(function = "crate::models::content::non_blank"))]
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    pub question_type: QuestionType,
    #[serde(default = "default_score")]
    #[validate(range(min = 1, message = "Score must be at least 1"))]
    pub score: u32,
    #[serde(default)]
    pub explanation: Option<String>,
    #[validate(length(min = 2, message = "A question needs at least two answers"), nested)]
    pub answers: Vec<Answer>,
}

fn default_score() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Single,
    Multiple,
    TrueFalse,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Single => "single",
            QuestionType::Multiple => "multiple",
            QuestionType::TrueFalse => "true_false",
        }
    }

    /// Radio semantics: picking an answer replaces the whole selection.
    pub fn is_exclusive(&self) -> bool {
        matches!(self, QuestionType::Single | QuestionType::TrueFalse)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Question {
    pub fn correct_answer_ids(&self) -> BTreeSet<String> {
        self.answers
            .iter()
            .filter(|a| a.is_correct)
            .map(|a| a.id.clone())
            .collect()
    }

    pub fn answer(&self, answer_id: &str) -> Option<&Answer> {
        self.answers.iter().find(|a| a.id == answer_id)
    }

    pub fn has_answer(&self, answer_id: &str) -> bool {
        self.answer(answer_id).is_some()
    }
}

fn validate_answer_key(question: &Question) -> Result<(), ValidationError> {
    let correct = question.answers.iter().filter(|a| a.is_correct).count();
    match question.question_type {
        QuestionType::TrueFalse => {
            if question.answers.len() != 2 {
                return Err(key_error(
                    "true_false_answer_count",
                    "A true/false question has exactly two answers",
                ));
            }
            if correct != 1 {
                return Err(key_error(
                    "true_false_correct_count",
                    "Exactly one of true/false must be correct",
                ));
            }
        }
        QuestionType::Single => {
            if correct != 1 {
                return Err(key_error(
                    "single_correct_count",
                    "A single-choice question has exactly one correct answer",
                ));
            }
        }
        QuestionType::Multiple => {
            if correct == 0 {
                return Err(key_error(
                    "multiple_correct_count",
                    "A multiple-choice question needs at least one correct answer",
                ));
            }
        }
    }
    Ok(())
}

fn key_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(question_type: QuestionType, flags: &[bool]) -> Question {
        Question {
            id: "q1".into(),
            title: "Which one?".into(),
            content: None,
            question_type,
            score: 1,
            explanation: None,
            answers: flags
                .iter()
                .enumerate()
                .map(|(i, c)| Answer::new(format!("a{}", i + 1), format!("Option {}", i + 1), *c))
                .collect(),
        }
    }

    #[test]
    fn single_requires_exactly_one_correct() {
        assert!(question(QuestionType::Single, &[true, false, false]).validate().is_ok());
        assert!(question(QuestionType::Single, &[true, true, false]).validate().is_err());
        assert!(question(QuestionType::Single, &[false, false]).validate().is_err());
    }

    #[test]
    fn multiple_accepts_several_correct() {
        assert!(question(QuestionType::Multiple, &[true, true, false]).validate().is_ok());
        assert!(question(QuestionType::Multiple, &[false, false]).validate().is_err());
    }

    #[test]
    fn true_false_has_two_exclusive_answers() {
        assert!(question(QuestionType::TrueFalse, &[false, true]).validate().is_ok());
        assert!(question(QuestionType::TrueFalse, &[true, true]).validate().is_err());
        assert!(question(QuestionType::TrueFalse, &[true, false, false]).validate().is_err());
    }

    #[test]
    fn needs_two_answers_and_a_title() {
        assert!(question(QuestionType::Multiple, &[true]).validate().is_err());
        let mut q = question(QuestionType::Single, &[true, false]);
        q.title = "  ".into();
        assert!(q.validate().is_err());
    }

    #[test]
    fn correct_ids_are_collected() {
        let q = question(QuestionType::Multiple, &[false, true, true]);
        let ids: Vec<_> = q.correct_answer_ids().into_iter().collect();
        assert_eq!(ids, vec!["a2".to_string(), "a3".to_string()]);
    }
}
