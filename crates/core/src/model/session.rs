use thiserror::Error;

use crate::model::CategoryId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FinalScoreError {
    #[error("score ({score}) exceeds answered questions ({answered})")]
    ScoreExceedsAnswered { score: u32, answered: u32 },

    #[error("answered questions ({answered}) exceed total ({total})")]
    AnsweredExceedsTotal { answered: u32, total: u32 },
}

/// Outcome of a finished quiz, handed to the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    category: CategoryId,
    score: u32,
    answered: u32,
    total: u32,
}

impl FinalScore {
    /// Build a final score from its counters.
    ///
    /// # Errors
    ///
    /// Returns `FinalScoreError` unless `score <= answered <= total`.
    pub fn new(
        category: CategoryId,
        score: u32,
        answered: u32,
        total: u32,
    ) -> Result<Self, FinalScoreError> {
        if score > answered {
            return Err(FinalScoreError::ScoreExceedsAnswered { score, answered });
        }
        if answered > total {
            return Err(FinalScoreError::AnsweredExceedsTotal { answered, total });
        }
        Ok(Self {
            category,
            score,
            answered,
            total,
        })
    }

    #[must_use]
    pub fn category(&self) -> CategoryId {
        self.category
    }

    /// Number of correctly answered questions.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of questions that received a selection before advancing.
    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn unanswered(&self) -> u32 {
        self.total - self.answered
    }

    /// Whole-number percentage of correct answers, 0 for an empty quiz.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let percent = u64::from(self.score) * 100 / u64::from(self.total);
        u32::try_from(percent).unwrap_or(100)
    }
}
