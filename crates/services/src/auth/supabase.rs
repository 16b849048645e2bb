//! Supabase GoTrue REST client.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use trivia_core::model::{AuthSession, AuthUser, Credentials, UserId};

use super::IdentityProvider;
use super::pkce::PkcePair;
use crate::Clock;
use crate::config::AuthConfig;
use crate::error::AuthError;

#[derive(Clone)]
pub struct SupabaseAuth {
    client: Client,
    config: AuthConfig,
    clock: Clock,
}

impl SupabaseAuth {
    #[must_use]
    pub fn new(config: AuthConfig, clock: Clock) -> Self {
        Self {
            client: Client::new(),
            config,
            clock,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.config.base_url)
    }

    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("apikey", &self.config.anon_key)
    }

    async fn token_grant<B: Serialize + Sync>(
        &self,
        grant_type: &str,
        body: &B,
    ) -> Result<AuthSession, AuthError> {
        let request = self
            .client
            .post(self.endpoint("token"))
            .query(&[("grant_type", grant_type)])
            .json(body);
        let response = checked(self.with_key(request).send().await?).await?;
        let body: TokenResponse = response.json().await?;
        Ok(body.into_session(self.clock.now()))
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuth {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, AuthError> {
        debug!("password sign-in");
        self.token_grant("password", &EmailPassword::from(credentials))
            .await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Option<AuthSession>, AuthError> {
        let request = self
            .client
            .post(self.endpoint("signup"))
            .json(&EmailPassword::from(credentials));
        let response = checked(self.with_key(request).send().await?).await?;
        let body: SignupResponse = response.json().await?;
        Ok(body.into_session(self.clock.now()))
    }

    async fn sign_out(&self, session: &AuthSession) -> Result<(), AuthError> {
        let request = self
            .client
            .post(self.endpoint("logout"))
            .bearer_auth(&session.access_token);
        checked(self.with_key(request).send().await?).await?;
        Ok(())
    }

    fn authorize_url(&self, provider: &str, pkce: &PkcePair) -> Result<Url, AuthError> {
        let mut url = Url::parse(&self.endpoint("authorize"))?;
        url.query_pairs_mut()
            .append_pair("provider", provider)
            .append_pair("redirect_to", &self.config.redirect_url)
            .append_pair("code_challenge", pkce.challenge())
            .append_pair("code_challenge_method", "s256");
        Ok(url)
    }

    async fn exchange_code_for_session(
        &self,
        code: &str,
        verifier: &str,
    ) -> Result<AuthSession, AuthError> {
        self.token_grant(
            "pkce",
            &PkceExchange {
                auth_code: code,
                code_verifier: verifier,
            },
        )
        .await
    }
}

/// Pass successful responses through; turn error bodies into `AuthError`.
async fn checked(response: Response) -> Result<Response, AuthError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status.is_client_error() && status != StatusCode::NOT_FOUND {
        let body: ErrorBody = response.json().await.unwrap_or_default();
        if let Some(message) = body.message() {
            return Err(AuthError::Rejected(message));
        }
    }
    Err(AuthError::HttpStatus(status))
}

#[derive(Debug, Serialize)]
struct EmailPassword<'a> {
    email: &'a str,
    password: &'a str,
}

impl<'a> From<&'a Credentials> for EmailPassword<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            email: credentials.email(),
            password: credentials.password(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PkceExchange<'a> {
    auth_code: &'a str,
    code_verifier: &'a str,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl From<RawUser> for AuthUser {
    fn from(raw: RawUser) -> Self {
        Self {
            id: UserId::new(raw.id),
            email: raw.email,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: RawUser,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> AuthSession {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .or_else(|| self.expires_in.map(|secs| now + Duration::seconds(secs)));
        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user.into(),
        }
    }
}

/// Sign-up answers with a full session when email confirmation is off, and
/// with just the user otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignupResponse {
    Session(TokenResponse),
    Pending(RawUser),
}

impl SignupResponse {
    fn into_session(self, now: DateTime<Utc>) -> Option<AuthSession> {
        match self {
            Self::Session(token) => Some(token.into_session(now)),
            Self::Pending(_) => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    fn message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}
