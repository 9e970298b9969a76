use std::collections::BTreeSet;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{Error, Result};
use crate::models::content::QuizContent;
use crate::models::quiz_result::{QuestionOutcome, QuizResult, Selections};

pub struct GradingService;

impl GradingService {
    /// All-or-nothing per question: full score only when the selected set
    /// equals the correct set exactly.
    pub fn grade(quiz: &QuizContent, selections: &Selections) -> Result<QuizResult> {
        let empty = BTreeSet::new();
        // Per-question scores are unbounded u32; totals are summed in u64.
        let mut earned: u64 = 0;
        let mut max: u64 = 0;
        let mut outcomes = Vec::with_capacity(quiz.questions.len());

        for question in &quiz.questions {
            max += u64::from(question.score);
            let correct = question.correct_answer_ids();
            let selected = selections.get(&question.id).unwrap_or(&empty);
            let is_correct = *selected == correct;
            let points = if is_correct { question.score } else { 0 };
            earned += u64::from(points);

            outcomes.push(QuestionOutcome {
                question_id: question.id.clone(),
                selected: selected.iter().cloned().collect(),
                correct: correct.into_iter().collect(),
                earned: points,
                max: question.score,
                is_correct,
                explanation: question.explanation.clone(),
            });
        }

        let percentage = Self::percentage(earned, max)?;
        Ok(QuizResult {
            earned,
            max,
            percentage,
            passing_score: quiz.passing_score,
            passed: percentage >= quiz.passing_score,
            questions: outcomes,
        })
    }

    /// `round(earned / max * 100)`, halves rounded up.
    pub fn percentage(earned: u64, max: u64) -> Result<u32> {
        if max == 0 {
            return Err(Error::DegenerateQuiz(
                "quiz has no scorable questions".to_string(),
            ));
        }
        let ratio = Decimal::from(earned) * Decimal::ONE_HUNDRED / Decimal::from(max);
        ratio
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .ok_or_else(|| Error::Internal(format!("percentage out of range: {}", ratio)))
    }

    /// Question ids without any selected answer, in quiz order.
    pub fn unanswered(quiz: &QuizContent, selections: &Selections) -> Vec<String> {
        quiz.questions
            .iter()
            .filter(|q| selections.get(&q.id).map_or(true, |s| s.is_empty()))
            .map(|q| q.id.clone())
            .collect()
    }

    /// Selections that pick every correct answer.
    pub fn answer_key(quiz: &QuizContent) -> Selections {
        quiz.questions
            .iter()
            .map(|q| (q.id.clone(), q.correct_answer_ids()))
            .collect()
    }
}
