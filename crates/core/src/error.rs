use thiserror::Error;

use crate::model::{CallbackError, CredentialsError, FinalScoreError, QuestionError};
use crate::quiz::QuizError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
    #[error(transparent)]
    Callback(#[from] CallbackError),
    #[error(transparent)]
    FinalScore(#[from] FinalScoreError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}
