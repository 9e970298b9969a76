//! Editing helpers for a quiz payload. The quiz form works on a local copy
//! of `QuizContent` with these functions and hands the finished payload to
//! `CurriculumService::update_item`, which swaps it in whole.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::models::answer::Answer;
use crate::models::content::{QuizContent, DEFAULT_PASSING_SCORE, DEFAULT_QUIZ_TIME_LIMIT};
use crate::models::question::{Question, QuestionType};
use crate::utils::id::IdGenerator;

#[derive(Clone, Debug, Default)]
pub struct QuizBuilder {
    ids: IdGenerator,
}

fn question_mut<'a>(quiz: &'a mut QuizContent, question_id: &str) -> Result<&'a mut Question> {
    quiz.questions
        .iter_mut()
        .find(|q| q.id == question_id)
        .ok_or_else(|| Error::NotFound(format!("Question {}", question_id)))
}

impl QuizBuilder {
    pub fn new(ids: IdGenerator) -> Self {
        Self { ids }
    }

    pub fn new_quiz(&self) -> QuizContent {
        QuizContent {
            description: None,
            time_limit_minutes: DEFAULT_QUIZ_TIME_LIMIT,
            passing_score: DEFAULT_PASSING_SCORE,
            questions: vec![self.new_question(QuestionType::Single)],
        }
    }

    /// A blank question whose answer key already satisfies its type.
    pub fn new_question(&self, question_type: QuestionType) -> Question {
        let answers = match question_type {
            QuestionType::TrueFalse => self.true_false_pair(),
            QuestionType::Single | QuestionType::Multiple => vec![
                Answer::new(self.ids.generate("answer"), "", true),
                Answer::new(self.ids.generate("answer"), "", false),
            ],
        };
        Question {
            id: self.ids.generate("question"),
            title: String::new(),
            content: None,
            question_type,
            score: 1,
            explanation: None,
            answers,
        }
    }

    pub fn add_question(&self, quiz: &QuizContent, question_type: QuestionType) -> QuizContent {
        let mut next = quiz.clone();
        next.questions.push(self.new_question(question_type));
        next
    }

    /// Removing the last question is allowed while editing; validation reports it.
    pub fn remove_question(&self, quiz: &QuizContent, question_id: &str) -> Result<QuizContent> {
        let mut next = quiz.clone();
        let idx = next
            .questions
            .iter()
            .position(|q| q.id == question_id)
            .ok_or_else(|| Error::NotFound(format!("Question {}", question_id)))?;
        next.questions.remove(idx);
        Ok(next)
    }

    /// Replaces a question wholesale, keeping its position.
    pub fn replace_question(&self, quiz: &QuizContent, question: Question) -> Result<QuizContent> {
        let mut next = quiz.clone();
        let slot = question_mut(&mut next, &question.id)?;
        *slot = question;
        Ok(next)
    }

    pub fn add_answer(&self, quiz: &QuizContent, question_id: &str) -> Result<QuizContent> {
        let mut next = quiz.clone();
        let question = question_mut(&mut next, question_id)?;
        if question.question_type == QuestionType::TrueFalse {
            return Err(Error::InvalidState(
                "true/false questions have a fixed answer pair".to_string(),
            ));
        }
        question
            .answers
            .push(Answer::new(self.ids.generate("answer"), "", false));
        Ok(next)
    }

    pub fn remove_answer(
        &self,
        quiz: &QuizContent,
        question_id: &str,
        answer_id: &str,
    ) -> Result<QuizContent> {
        let mut next = quiz.clone();
        let question = question_mut(&mut next, question_id)?;
        if question.question_type == QuestionType::TrueFalse {
            return Err(Error::InvalidState(
                "true/false questions have a fixed answer pair".to_string(),
            ));
        }
        let idx = question
            .answers
            .iter()
            .position(|a| a.id == answer_id)
            .ok_or_else(|| {
                Error::NotFound(format!("Answer {} in question {}", answer_id, question_id))
            })?;
        question.answers.remove(idx);
        Ok(next)
    }

    /// Single and true/false keep exactly one correct answer; multiple toggles.
    pub fn mark_correct(
        &self,
        quiz: &QuizContent,
        question_id: &str,
        answer_id: &str,
    ) -> Result<QuizContent> {
        let mut next = quiz.clone();
        let question = question_mut(&mut next, question_id)?;
        if !question.has_answer(answer_id) {
            return Err(Error::NotFound(format!(
                "Answer {} in question {}",
                answer_id, question_id
            )));
        }
        if question.question_type.is_exclusive() {
            for answer in question.answers.iter_mut() {
                answer.is_correct = answer.id == answer_id;
            }
        } else if let Some(answer) = question.answers.iter_mut().find(|a| a.id == answer_id) {
            answer.is_correct = !answer.is_correct;
        }
        Ok(next)
    }

    /// Switches the question type and coerces the answer key to fit it.
    pub fn change_question_type(
        &self,
        quiz: &QuizContent,
        question_id: &str,
        question_type: QuestionType,
    ) -> Result<QuizContent> {
        let mut next = quiz.clone();
        let pair = self.true_false_pair();
        let question = question_mut(&mut next, question_id)?;
        if question.question_type == question_type {
            return Ok(next);
        }

        match question_type {
            QuestionType::TrueFalse => {
                question.answers = pair;
            }
            QuestionType::Single => {
                let keep = question
                    .answers
                    .iter()
                    .position(|a| a.is_correct)
                    .unwrap_or(0);
                for (idx, answer) in question.answers.iter_mut().enumerate() {
                    answer.is_correct = idx == keep;
                }
            }
            QuestionType::Multiple => {
                if !question.answers.iter().any(|a| a.is_correct) {
                    if let Some(first) = question.answers.first_mut() {
                        first.is_correct = true;
                    }
                }
            }
        }
        question.question_type = question_type;
        Ok(next)
    }

    pub fn reorder_questions(&self, quiz: &QuizContent, order: &[String]) -> Result<QuizContent> {
        if order.len() != quiz.questions.len() {
            return Err(Error::InvalidPermutation(format!(
                "question reorder lists {} ids but the quiz has {} questions",
                order.len(),
                quiz.questions.len()
            )));
        }
        let mut seen = HashSet::new();
        let mut questions = Vec::with_capacity(order.len());
        for id in order {
            if !seen.insert(id.as_str()) {
                return Err(Error::InvalidPermutation(format!(
                    "question id {} appears more than once",
                    id
                )));
            }
            let question = quiz.question(id).ok_or_else(|| {
                Error::InvalidPermutation(format!("question id {} is not in this quiz", id))
            })?;
            questions.push(question.clone());
        }
        let mut next = quiz.clone();
        next.questions = questions;
        Ok(next)
    }

    fn true_false_pair(&self) -> Vec<Answer> {
        vec![
            Answer::new(self.ids.generate("answer"), "True", true),
            Answer::new(self.ids.generate("answer"), "False", false),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn builder() -> QuizBuilder {
        QuizBuilder::new(IdGenerator::new())
    }

    fn correct_flags(question: &Question) -> Vec<bool> {
        question.answers.iter().map(|a| a.is_correct).collect()
    }

    #[test]
    fn new_quiz_has_one_single_choice_question() {
        let quiz = builder().new_quiz();
        assert_eq!(quiz.questions.len(), 1);
        assert_eq!(quiz.questions[0].question_type, QuestionType::Single);
        assert_eq!(correct_flags(&quiz.questions[0]), vec![true, false]);
    }

    #[test]
    fn new_true_false_question_validates_once_titled() {
        let mut question = builder().new_question(QuestionType::TrueFalse);
        question.title = "The borrow checker runs at compile time".into();
        assert!(question.validate().is_ok());
    }

    #[test]
    fn mark_correct_is_radio_for_single_and_toggle_for_multiple() {
        let b = builder();
        let quiz = b.new_quiz();
        let q = quiz.questions[0].clone();
        let quiz = b.mark_correct(&quiz, &q.id, &q.answers[1].id).unwrap();
        assert_eq!(correct_flags(&quiz.questions[0]), vec![false, true]);

        let quiz = b
            .change_question_type(&quiz, &q.id, QuestionType::Multiple)
            .unwrap();
        let quiz = b.mark_correct(&quiz, &q.id, &q.answers[0].id).unwrap();
        assert_eq!(correct_flags(&quiz.questions[0]), vec![true, true]);
        let quiz = b.mark_correct(&quiz, &q.id, &q.answers[1].id).unwrap();
        assert_eq!(correct_flags(&quiz.questions[0]), vec![true, false]);
    }

    #[test]
    fn switching_to_single_keeps_first_correct_answer() {
        let b = builder();
        let quiz = b.add_question(&b.new_quiz(), QuestionType::Multiple);
        let qid = quiz.questions[1].id.clone();
        let quiz = b.add_answer(&quiz, &qid).unwrap();
        let answers: Vec<String> = quiz.questions[1].answers.iter().map(|a| a.id.clone()).collect();
        let quiz = b.mark_correct(&quiz, &qid, &answers[2]).unwrap();
        assert_eq!(correct_flags(&quiz.questions[1]), vec![true, false, true]);

        let quiz = b.change_question_type(&quiz, &qid, QuestionType::Single).unwrap();
        assert_eq!(correct_flags(&quiz.questions[1]), vec![true, false, false]);
    }

    #[test]
    fn switching_to_true_false_resets_answers() {
        let b = builder();
        let quiz = b.new_quiz();
        let qid = quiz.questions[0].id.clone();
        let quiz = b.add_answer(&quiz, &qid).unwrap();
        let quiz = b
            .change_question_type(&quiz, &qid, QuestionType::TrueFalse)
            .unwrap();
        let question = &quiz.questions[0];
        assert_eq!(question.answers.len(), 2);
        assert_eq!(question.answers[0].content, "True");
        assert!(matches!(
            b.add_answer(&quiz, &qid),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn remove_and_reorder_questions() {
        let b = builder();
        let quiz = b.add_question(&b.new_quiz(), QuestionType::TrueFalse);
        let ids: Vec<String> = quiz.questions.iter().map(|q| q.id.clone()).collect();
        let reversed: Vec<String> = ids.iter().rev().cloned().collect();
        let flipped = b.reorder_questions(&quiz, &reversed).unwrap();
        assert_eq!(flipped.questions[0].id, ids[1]);
        assert!(matches!(
            b.reorder_questions(&quiz, &ids[..1]),
            Err(Error::InvalidPermutation(_))
        ));

        let trimmed = b.remove_question(&quiz, &ids[0]).unwrap();
        assert_eq!(trimmed.questions.len(), 1);
        assert!(matches!(
            b.remove_question(&trimmed, &ids[0]),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn replace_question_keeps_position() {
        let b = builder();
        let quiz = b.add_question(&b.new_quiz(), QuestionType::Multiple);
        let mut edited = quiz.questions[0].clone();
        edited.title = "What does `?` do?".into();
        edited.score = 5;
        let quiz = b.replace_question(&quiz, edited).unwrap();
        assert_eq!(quiz.questions[0].score, 5);
        assert_eq!(quiz.max_score(), 6);
    }
}
