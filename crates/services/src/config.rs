use std::env;

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "https://opentdb.com";
pub const DEFAULT_QUESTION_COUNT: u32 = 10;
pub const DEFAULT_TIMER_SECS: u32 = trivia_core::timer::DEFAULT_DURATION_SECS;
pub const DEFAULT_AUTH_REDIRECT: &str = "trivia://auth/callback";

pub const QUESTION_COUNT_RANGE: (u32, u32) = (1, 50);
pub const TIMER_SECS_RANGE: (u32, u32) = (5, 600);

/// Settings for fetching and running quizzes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizConfig {
    pub api_base_url: String,
    pub question_count: u32,
    pub timer_secs: u32,
    pub offline: bool,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            question_count: DEFAULT_QUESTION_COUNT,
            timer_secs: DEFAULT_TIMER_SECS,
            offline: false,
        }
    }
}

impl QuizConfig {
    /// Read `TRIVIA_API_BASE_URL`, `TRIVIA_QUESTION_COUNT`,
    /// `TRIVIA_TIMER_SECS` and `TRIVIA_OFFLINE`, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = non_empty(lookup("TRIVIA_API_BASE_URL")) {
            config = config.with_api_base_url(&raw)?;
        }
        if let Some(raw) = non_empty(lookup("TRIVIA_QUESTION_COUNT")) {
            config.question_count = parse_question_count(&raw)?;
        }
        if let Some(raw) = non_empty(lookup("TRIVIA_TIMER_SECS")) {
            config.timer_secs = parse_timer_secs(&raw)?;
        }
        if let Some(raw) = non_empty(lookup("TRIVIA_OFFLINE")) {
            config.offline = is_truthy(&raw);
        }
        Ok(config)
    }

    /// Replace the API base URL after checking it parses.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` for an unparsable URL.
    pub fn with_api_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        Url::parse(trimmed).map_err(|_| ConfigError::InvalidUrl {
            name: "api base url",
            raw: trimmed.to_string(),
        })?;
        self.api_base_url = trimmed.trim_end_matches('/').to_string();
        Ok(self)
    }
}

/// Settings for the hosted identity provider. Absent means guest mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthConfig {
    pub base_url: String,
    pub anon_key: String,
    pub redirect_url: String,
}

impl AuthConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let base_url = non_empty(lookup("TRIVIA_AUTH_URL"))?;
        let anon_key = non_empty(lookup("TRIVIA_AUTH_ANON_KEY"))?;
        let redirect_url = non_empty(lookup("TRIVIA_AUTH_REDIRECT"))
            .unwrap_or_else(|| DEFAULT_AUTH_REDIRECT.to_string());
        Some(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            redirect_url,
        })
    }
}

/// Parse and range-check a question count.
///
/// # Errors
///
/// Returns `ConfigError` if `raw` is not a number in range.
pub fn parse_question_count(raw: &str) -> Result<u32, ConfigError> {
    parse_in_range("question count", raw, QUESTION_COUNT_RANGE)
}

/// Parse and range-check a per-question timer in seconds.
///
/// # Errors
///
/// Returns `ConfigError` if `raw` is not a number in range.
pub fn parse_timer_secs(raw: &str) -> Result<u32, ConfigError> {
    parse_in_range("timer seconds", raw, TIMER_SECS_RANGE)
}

fn parse_in_range(name: &'static str, raw: &str, (min, max): (u32, u32)) -> Result<u32, ConfigError> {
    let value: u32 = raw.trim().parse().map_err(|_| ConfigError::NotANumber {
        name,
        raw: raw.to_string(),
    })?;
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            name,
            min,
            max,
            value,
        });
    }
    Ok(value)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
