//! Quiz session state machine.
//!
//! A session moves `Loading -> InProgress -> Finished`, or ends in `Empty`
//! (the source produced no questions) or `Failed` (the source errored).
//! While in progress, each question is either unanswered or answered; the
//! first selection on a question is final.

use thiserror::Error;

use crate::model::{CategoryId, FinalScore, FinalScoreError, Question};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("operation not valid while quiz is {status:?}")]
    InvalidStatus { status: QuizStatus },

    #[error("option {index} out of range for question with {len} options")]
    OptionOutOfRange { index: usize, len: usize },

    #[error("current question has not been answered")]
    Unanswered,

    #[error(transparent)]
    Score(#[from] FinalScoreError),
}

//
// ─── STATES ────────────────────────────────────────────────────────────────────
//

/// Top-level lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStatus {
    Loading,
    InProgress,
    Finished,
    /// The question source returned nothing. Terminal until `retry`.
    Empty,
    /// The question source failed. Terminal until `retry`.
    Failed,
}

impl QuizStatus {
    #[must_use]
    pub fn can_retry(self) -> bool {
        matches!(self, Self::Empty | Self::Failed)
    }
}

/// Sub-state of the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerState {
    Unanswered,
    Answered { selected: usize, correct: bool },
}

/// What a single operation did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizTransition {
    /// The event did not apply (answer already locked, stale timer, etc).
    Ignored,
    Answered { selected: usize, correct: bool },
    Advanced { index: usize },
    /// Emitted exactly once per session.
    Finished(FinalScore),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone)]
pub struct QuizSession {
    category: CategoryId,
    status: QuizStatus,
    questions: Vec<Question>,
    current: usize,
    selected: Option<usize>,
    score: u32,
    answered: u32,
    failure: Option<String>,
    final_score: Option<FinalScore>,
}

impl QuizSession {
    /// A new session waiting for its questions.
    #[must_use]
    pub fn new(category: CategoryId) -> Self {
        Self {
            category,
            status: QuizStatus::Loading,
            questions: Vec::new(),
            current: 0,
            selected: None,
            score: 0,
            answered: 0,
            failure: None,
            final_score: None,
        }
    }

    #[must_use]
    pub fn category(&self) -> CategoryId {
        self.category
    }

    #[must_use]
    pub fn status(&self) -> QuizStatus {
        self.status
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Reason recorded by `fail`, if the session is in `Failed`.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    #[must_use]
    pub fn final_score(&self) -> Option<FinalScore> {
        self.final_score
    }

    /// The question being shown. `None` unless in progress.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.status == QuizStatus::InProgress {
            self.questions.get(self.current)
        } else {
            None
        }
    }

    #[must_use]
    pub fn answer_state(&self) -> AnswerState {
        match (self.selected, self.current_question()) {
            (Some(selected), Some(question)) => AnswerState::Answered {
                selected,
                correct: question.is_correct(selected),
            },
            _ => AnswerState::Unanswered,
        }
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    /// Deliver the fetched questions. Zero questions moves to `Empty`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidStatus` unless the session is `Loading`.
    pub fn load(&mut self, questions: Vec<Question>) -> Result<QuizStatus, QuizError> {
        self.expect_status(QuizStatus::Loading)?;
        if questions.is_empty() {
            self.status = QuizStatus::Empty;
        } else {
            self.questions = questions;
            self.status = QuizStatus::InProgress;
        }
        Ok(self.status)
    }

    /// Record a question source failure.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidStatus` unless the session is `Loading`.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), QuizError> {
        self.expect_status(QuizStatus::Loading)?;
        self.failure = Some(reason.into());
        self.status = QuizStatus::Failed;
        Ok(())
    }

    /// Go back to `Loading` after `Empty` or `Failed`, clearing all progress.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidStatus` from any other state.
    pub fn retry(&mut self) -> Result<(), QuizError> {
        if !self.status.can_retry() {
            return Err(QuizError::InvalidStatus {
                status: self.status,
            });
        }
        *self = Self::new(self.category);
        Ok(())
    }

    /// Lock in an answer for the current question.
    ///
    /// Any selection on an answered question is ignored, in range or not.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidStatus` when not in progress and
    /// `QuizError::OptionOutOfRange` for an index past the last option.
    pub fn select_option(&mut self, index: usize) -> Result<QuizTransition, QuizError> {
        self.expect_status(QuizStatus::InProgress)?;
        if self.selected.is_some() {
            return Ok(QuizTransition::Ignored);
        }
        let question = &self.questions[self.current];
        let len = question.option_count();
        if index >= len {
            return Err(QuizError::OptionOutOfRange { index, len });
        }

        let correct = question.is_correct(index);
        self.selected = Some(index);
        self.answered += 1;
        if correct {
            self.score += 1;
        }
        Ok(QuizTransition::Answered {
            selected: index,
            correct,
        })
    }

    /// Select an option on a specific question. A selection made on a
    /// question that is no longer current is dropped.
    ///
    /// # Errors
    ///
    /// Same as `select_option`.
    pub fn select_on(
        &mut self,
        question_index: usize,
        option: usize,
    ) -> Result<QuizTransition, QuizError> {
        if self.status == QuizStatus::InProgress && question_index != self.current {
            return Ok(QuizTransition::Ignored);
        }
        self.select_option(option)
    }

    /// Move past an answered question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidStatus` when not in progress and
    /// `QuizError::Unanswered` if no option has been selected yet.
    pub fn advance(&mut self) -> Result<QuizTransition, QuizError> {
        self.expect_status(QuizStatus::InProgress)?;
        if self.selected.is_none() {
            return Err(QuizError::Unanswered);
        }
        self.move_next()
    }

    /// Timer expiry for `question_index`. Advances regardless of the answer
    /// state; an unanswered question scores nothing. Expiry for a question
    /// that is no longer current, or outside `InProgress`, is ignored.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Score` only if the internal counters are inconsistent.
    pub fn expire(&mut self, question_index: usize) -> Result<QuizTransition, QuizError> {
        if self.status != QuizStatus::InProgress || question_index != self.current {
            return Ok(QuizTransition::Ignored);
        }
        self.move_next()
    }

    fn move_next(&mut self) -> Result<QuizTransition, QuizError> {
        if self.is_last_question() {
            let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
            let final_score = FinalScore::new(self.category, self.score, self.answered, total)?;
            self.status = QuizStatus::Finished;
            self.final_score = Some(final_score);
            return Ok(QuizTransition::Finished(final_score));
        }

        self.current += 1;
        self.selected = None;
        Ok(QuizTransition::Advanced {
            index: self.current,
        })
    }

    fn expect_status(&self, expected: QuizStatus) -> Result<(), QuizError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(QuizError::InvalidStatus {
                status: self.status,
            })
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
