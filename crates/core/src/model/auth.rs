use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::ids::UserId;

/// Minimum password length accepted by the hosted identity provider.
pub const MIN_PASSWORD_LEN: usize = 6;

//
// ─── CREDENTIALS ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CredentialsError {
    #[error("email cannot be empty")]
    EmptyEmail,

    #[error("email address is not valid")]
    InvalidEmail,

    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
}

/// Email/password pair for sign-in and sign-up.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Validate and build credentials. The email is trimmed; the password is kept verbatim.
    ///
    /// # Errors
    ///
    /// Returns `CredentialsError` for an empty or malformed email or a short password.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Result<Self, CredentialsError> {
        let email = email.into().trim().to_owned();
        let password = password.into();
        if email.is_empty() {
            return Err(CredentialsError::EmptyEmail);
        }
        let valid_shape = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid_shape {
            return Err(CredentialsError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CredentialsError::PasswordTooShort);
        }
        Ok(Self { email, password })
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: Option<String>,
}

/// Signed-in session issued by the identity provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub user: AuthUser,
}

impl AuthSession {
    /// A session without an expiry is treated as valid.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("user", &self.user)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

//
// ─── OAUTH CALLBACK ────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CallbackError {
    #[error("callback url is not valid: {0}")]
    InvalidUrl(String),

    #[error("provider returned an error: {0}")]
    Provider(String),

    #[error("callback url has no authorization code")]
    MissingCode,
}

/// Extract the authorization code from an OAuth redirect URL.
///
/// Checks the query first and falls back to the fragment, which some
/// providers use for errors.
///
/// # Errors
///
/// Returns `CallbackError` if the URL cannot be parsed, carries an `error`
/// parameter, or has no `code`.
pub fn authorization_code(callback_url: &str) -> Result<String, CallbackError> {
    let url = Url::parse(callback_url.trim())
        .map_err(|err| CallbackError::InvalidUrl(err.to_string()))?;

    let fragment_pairs = url
        .fragment()
        .map(|fragment| url::form_urlencoded::parse(fragment.as_bytes()))
        .into_iter()
        .flatten();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .chain(fragment_pairs)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let lookup = |name: &str| {
        pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    };

    if let Some(error) = lookup("error") {
        let message = lookup("error_description").unwrap_or(error);
        return Err(CallbackError::Provider(message));
    }

    lookup("code")
        .filter(|code| !code.is_empty())
        .ok_or(CallbackError::MissingCode)
}
