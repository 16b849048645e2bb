//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use trivia_core::model::{CallbackError, CredentialsError};

/// Errors emitted by question and category sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionSourceError {
    #[error("trivia request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("trivia api returned response code {0}")]
    Api(u8),
    #[error("trivia api rate limit reached, try again in a few seconds")]
    RateLimited,
    #[error("trivia api returned text that could not be decoded: {0}")]
    Decode(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the identity provider and `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("sign-in is not configured")]
    Disabled,
    #[error("{0}")]
    Rejected(String),
    #[error("auth request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("no sign-in is in progress")]
    NoPendingOAuth,
    #[error("sign-up succeeded; confirm your email before signing in")]
    ConfirmationRequired,
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
    #[error(transparent)]
    Callback(#[from] CallbackError),
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("stored session is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizService` and quiz handles.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("quiz session has been closed")]
    Closed,
}

/// Errors from reading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{name} must be a number, got {raw:?}")]
    NotANumber { name: &'static str, raw: String },
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        min: u32,
        max: u32,
        value: u32,
    },
    #[error("{name} is not a valid url: {raw}")]
    InvalidUrl { name: &'static str, raw: String },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Questions(#[from] QuestionSourceError),
}
