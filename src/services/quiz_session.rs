//! Lifecycle of one quiz attempt: `intro -> playing -> result`, with retry
//! looping `result -> playing`. Preview attempts open directly on `result`
//! with the answer key selected and never accept input.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::models::content::QuizContent;
use crate::models::quiz_result::{QuizResult, Selections};
use crate::services::grading_service::GradingService;
use crate::utils::time::minutes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizPhase {
    Intro,
    Playing,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptMode {
    Interactive,
    /// Read-only review of the quiz as the author built it.
    Preview,
}

#[derive(Debug, Clone)]
pub struct QuizAttempt {
    quiz: QuizContent,
    mode: AttemptMode,
    phase: QuizPhase,
    selections: Selections,
    result: Option<QuizResult>,
    started_at: Option<DateTime<Utc>>,
    attempt_number: u32,
}

impl QuizAttempt {
    pub fn new(quiz: QuizContent) -> Self {
        Self {
            quiz,
            mode: AttemptMode::Interactive,
            phase: QuizPhase::Intro,
            selections: Selections::new(),
            result: None,
            started_at: None,
            attempt_number: 0,
        }
    }

    pub fn preview(quiz: QuizContent) -> Result<Self> {
        let selections = GradingService::answer_key(&quiz);
        let mut result = GradingService::grade(&quiz, &selections)?;
        result.passed = true;
        Ok(Self {
            quiz,
            mode: AttemptMode::Preview,
            phase: QuizPhase::Result,
            selections,
            result: Some(result),
            started_at: None,
            attempt_number: 0,
        })
    }

    pub fn quiz(&self) -> &QuizContent {
        &self.quiz
    }

    pub fn mode(&self) -> AttemptMode {
        self.mode
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    pub fn attempt_number(&self) -> u32 {
        self.attempt_number
    }

    pub fn is_read_only(&self) -> bool {
        self.mode == AttemptMode::Preview
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.ensure_editable()?;
        if self.phase != QuizPhase::Intro {
            return Err(Error::InvalidState(format!(
                "cannot start an attempt from {:?}",
                self.phase
            )));
        }
        self.begin(now);
        Ok(())
    }

    /// Radio semantics for single/true-false, toggle for multiple.
    pub fn select(&mut self, question_id: &str, answer_id: &str) -> Result<()> {
        self.ensure_editable()?;
        if self.phase != QuizPhase::Playing {
            return Err(Error::InvalidState(
                "answers can only be selected while playing".to_string(),
            ));
        }
        let question = self
            .quiz
            .question(question_id)
            .ok_or_else(|| Error::NotFound(format!("Question {}", question_id)))?;
        if !question.has_answer(answer_id) {
            return Err(Error::NotFound(format!(
                "Answer {} in question {}",
                answer_id, question_id
            )));
        }

        let exclusive = question.question_type.is_exclusive();
        let chosen = self.selections.entry(question_id.to_string()).or_default();
        if exclusive {
            chosen.clear();
            chosen.insert(answer_id.to_string());
        } else if !chosen.remove(answer_id) {
            chosen.insert(answer_id.to_string());
        }
        Ok(())
    }

    pub fn is_selected(&self, question_id: &str, answer_id: &str) -> bool {
        self.selections
            .get(question_id)
            .is_some_and(|s| s.contains(answer_id))
    }

    pub fn unanswered(&self) -> Vec<String> {
        GradingService::unanswered(&self.quiz, &self.selections)
    }

    pub fn can_submit(&self) -> bool {
        !self.is_read_only() && self.phase == QuizPhase::Playing && self.unanswered().is_empty()
    }

    pub fn submit(&mut self) -> Result<&QuizResult> {
        self.ensure_editable()?;
        if self.phase != QuizPhase::Playing {
            return Err(Error::InvalidState(
                "only an attempt in progress can be submitted".to_string(),
            ));
        }
        let unanswered = self.unanswered();
        if !unanswered.is_empty() {
            return Err(Error::UnansweredQuestions(unanswered));
        }

        let result = GradingService::grade(&self.quiz, &self.selections)?;
        info!(
            attempt = self.attempt_number,
            earned = result.earned,
            max = result.max,
            percentage = result.percentage,
            passed = result.passed,
            "quiz attempt graded"
        );
        self.phase = QuizPhase::Result;
        let result = self.result.insert(result);
        Ok(&*result)
    }

    pub fn can_retry(&self) -> bool {
        !self.is_read_only() && self.phase == QuizPhase::Result
    }

    /// Clears every selection and returns to `playing`. No-op in preview.
    pub fn retry(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.is_read_only() {
            return Ok(());
        }
        if self.phase != QuizPhase::Result {
            return Err(Error::InvalidState(
                "retry is only available after a result".to_string(),
            ));
        }
        self.begin(now);
        Ok(())
    }

    /// Correct/incorrect highlighting and explanations appear only on `result`.
    pub fn shows_feedback(&self) -> bool {
        self.phase == QuizPhase::Result
    }

    pub fn explanation(&self, question_id: &str) -> Option<&str> {
        if !self.shows_feedback() {
            return None;
        }
        self.quiz
            .question(question_id)
            .and_then(|q| q.explanation.as_deref())
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.started_at
            .map(|start| start + minutes(self.quiz.time_limit_minutes))
    }

    /// Time left on the clock, floored at zero. Expiry is informational only.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        if self.phase != QuizPhase::Playing {
            return None;
        }
        self.deadline()
            .map(|deadline| (deadline - now).max(Duration::zero()))
    }

    fn begin(&mut self, now: DateTime<Utc>) {
        self.selections.clear();
        self.result = None;
        self.started_at = Some(now);
        self.attempt_number += 1;
        self.phase = QuizPhase::Playing;
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.is_read_only() {
            return Err(Error::InvalidState(
                "preview attempts do not accept input".to_string(),
            ));
        }
        Ok(())
    }
}
