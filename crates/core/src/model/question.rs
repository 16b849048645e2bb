use serde::Deserialize;
use thiserror::Error;

/// Smallest number of options a question may offer.
pub const MIN_OPTIONS: usize = 2;
/// Largest number of options a question may offer.
pub const MAX_OPTIONS: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question must have between {MIN_OPTIONS} and {MAX_OPTIONS} options, got {len}")]
    OptionCount { len: usize },

    #[error("option text cannot be empty")]
    EmptyOption,

    #[error("duplicate option: {0}")]
    DuplicateOption(String),

    #[error("correct answer is not one of the options")]
    CorrectAnswerMissing,
}

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Unvalidated question as received from a question source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionDraft {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl QuestionDraft {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            options,
            correct_answer: correct_answer.into(),
        }
    }

    /// Validate the draft into an immutable `Question`.
    ///
    /// Text and options are trimmed before checks are applied.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is empty, the option count is out of
    /// range, an option is empty or repeated, or the correct answer is not one
    /// of the options.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let text = self.text.trim().to_owned();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        let len = self.options.len();
        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&len) {
            return Err(QuestionError::OptionCount { len });
        }

        let mut options: Vec<String> = Vec::with_capacity(len);
        for option in self.options {
            let option = option.trim().to_owned();
            if option.is_empty() {
                return Err(QuestionError::EmptyOption);
            }
            if options.contains(&option) {
                return Err(QuestionError::DuplicateOption(option));
            }
            options.push(option);
        }

        let correct_answer = self.correct_answer.trim();
        let correct_index = options
            .iter()
            .position(|option| option == correct_answer)
            .ok_or(QuestionError::CorrectAnswerMissing)?;

        Ok(Question {
            text,
            options,
            correct_index,
        })
    }
}

/// A validated multiple-choice question. Immutable once built.
///
/// Deserializes from the `QuestionDraft` shape and is validated on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "QuestionDraft")]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct_index: usize,
}

impl TryFrom<QuestionDraft> for Question {
    type Error = QuestionError;

    fn try_from(draft: QuestionDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl Question {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.options[self.correct_index]
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    /// Returns true if the option at `index` is the correct answer.
    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
