#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth;
pub mod category_service;
pub mod config;
pub mod error;
pub mod progress_service;
pub mod question_source;
pub mod quiz;

pub use trivia_core::Clock;

pub use app_services::AppServices;
pub use auth::{AuthService, DEFAULT_OAUTH_PROVIDER, IdentityProvider, SupabaseAuth};
pub use category_service::CategoryService;
pub use config::{AuthConfig, QuizConfig};
pub use error::{
    AppServicesError, AuthError, ConfigError, ProgressError, QuestionSourceError,
    QuizServiceError,
};
pub use progress_service::ProgressService;
pub use question_source::{CategorySource, OpenTdbClient, QuestionSource, StaticQuestionSource};
pub use quiz::{Navigator, QuizCommand, QuizHandle, QuizService, QuizSnapshot};
