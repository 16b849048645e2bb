//! Sign-in, sign-up and OAuth against a hosted identity provider.
//!
//! The signed-in session is kept in the key-value store so it survives
//! restarts. Without an identity provider the app runs in guest mode and
//! every auth operation returns `AuthError::Disabled`.

mod pkce;
mod supabase;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use url::Url;

use storage::repository::KeyValueRepository;
use trivia_core::model::{AuthSession, Credentials, authorization_code};

use crate::Clock;
use crate::error::AuthError;

pub use pkce::PkcePair;
pub use supabase::SupabaseAuth;

pub const SESSION_KEY: &str = "auth_session";
pub const PKCE_VERIFIER_KEY: &str = "auth_pkce_verifier";
pub const DEFAULT_OAUTH_PROVIDER: &str = "google";

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` for bad credentials.
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, AuthError>;

    /// Returns `None` when the account still needs email confirmation.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` if the provider refuses the sign-up.
    async fn sign_up(&self, credentials: &Credentials) -> Result<Option<AuthSession>, AuthError>;

    /// # Errors
    ///
    /// Returns `AuthError` if the provider cannot be reached.
    async fn sign_out(&self, session: &AuthSession) -> Result<(), AuthError>;

    /// URL to open in the browser to start an OAuth sign-in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Url` if the provider base URL is invalid.
    fn authorize_url(&self, provider: &str, pkce: &PkcePair) -> Result<Url, AuthError>;

    /// # Errors
    ///
    /// Returns `AuthError` if the code is rejected.
    async fn exchange_code_for_session(
        &self,
        code: &str,
        verifier: &str,
    ) -> Result<AuthSession, AuthError>;
}

#[derive(Clone)]
pub struct AuthService {
    provider: Option<Arc<dyn IdentityProvider>>,
    kv: Arc<dyn KeyValueRepository>,
    clock: Clock,
}

impl AuthService {
    #[must_use]
    pub fn new(
        provider: Option<Arc<dyn IdentityProvider>>,
        kv: Arc<dyn KeyValueRepository>,
        clock: Clock,
    ) -> Self {
        Self {
            provider,
            kv,
            clock,
        }
    }

    /// Guest mode: no identity provider configured.
    #[must_use]
    pub fn guest(kv: Arc<dyn KeyValueRepository>, clock: Clock) -> Self {
        Self::new(None, kv, clock)
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> Result<&Arc<dyn IdentityProvider>, AuthError> {
        self.provider.as_ref().ok_or(AuthError::Disabled)
    }

    /// The persisted session, if one exists and has not expired.
    ///
    /// A stored session that cannot be parsed is discarded.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the store cannot be read.
    pub async fn current_session(&self) -> Result<Option<AuthSession>, AuthError> {
        let Some(raw) = self.kv.get(SESSION_KEY).await? else {
            return Ok(None);
        };
        let session: AuthSession = match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "discarding unreadable stored session");
                self.kv.remove(SESSION_KEY).await?;
                return Ok(None);
            }
        };
        if session.is_expired(self.clock.now()) {
            info!(user = %session.user.id, "stored session expired");
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// # Errors
    ///
    /// Returns `AuthError` for invalid input, rejected credentials, or
    /// storage and network failures.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let credentials = Credentials::new(email, password)?;
        let session = self
            .provider()?
            .sign_in(&credentials)
            .await
            .inspect_err(|err| warn!(error = %err, "sign-in failed"))?;
        self.persist(&session).await?;
        info!(user = %session.user.id, "signed in");
        Ok(session)
    }

    /// # Errors
    ///
    /// Returns `AuthError::ConfirmationRequired` when the account was created
    /// but must be confirmed before it can sign in, and other `AuthError`s as
    /// for `sign_in`.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let credentials = Credentials::new(email, password)?;
        let session = self
            .provider()?
            .sign_up(&credentials)
            .await
            .inspect_err(|err| warn!(error = %err, "sign-up failed"))?
            .ok_or(AuthError::ConfirmationRequired)?;
        self.persist(&session).await?;
        info!(user = %session.user.id, "signed up");
        Ok(session)
    }

    /// Forget the local session. A provider failure is logged and does not
    /// keep the user signed in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the stored session cannot be removed.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        if let (Some(provider), Some(session)) = (&self.provider, self.current_session().await?) {
            if let Err(err) = provider.sign_out(&session).await {
                warn!(error = %err, "provider sign-out failed");
            }
        }
        self.kv.remove(SESSION_KEY).await?;
        info!("signed out");
        Ok(())
    }

    /// Start an OAuth sign-in and return the URL to open.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if auth is disabled or the verifier cannot be stored.
    pub async fn begin_oauth(&self, provider_name: &str) -> Result<Url, AuthError> {
        let provider = self.provider()?;
        let pkce = PkcePair::generate();
        let url = provider.authorize_url(provider_name, &pkce)?;
        self.kv.set(PKCE_VERIFIER_KEY, pkce.verifier()).await?;
        info!(provider = provider_name, "oauth started");
        Ok(url)
    }

    /// Finish an OAuth sign-in from the redirect URL.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Callback` for a redirect without a code,
    /// `AuthError::NoPendingOAuth` if `begin_oauth` was not called, and other
    /// `AuthError`s if the exchange fails.
    pub async fn complete_oauth(&self, callback_url: &str) -> Result<AuthSession, AuthError> {
        let provider = self.provider()?;
        let code = authorization_code(callback_url)?;
        let verifier = self
            .kv
            .get(PKCE_VERIFIER_KEY)
            .await?
            .ok_or(AuthError::NoPendingOAuth)?;
        let session = provider
            .exchange_code_for_session(&code, &verifier)
            .await
            .inspect_err(|err| warn!(error = %err, "oauth code exchange failed"))?;
        self.kv.remove(PKCE_VERIFIER_KEY).await?;
        self.persist(&session).await?;
        info!(user = %session.user.id, "signed in with oauth");
        Ok(session)
    }

    async fn persist(&self, session: &AuthSession) -> Result<(), AuthError> {
        let raw = serde_json::to_string(session)?;
        self.kv.set(SESSION_KEY, &raw).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use chrono::Duration;
    use storage::repository::InMemoryRepository;
    use trivia_core::model::{AuthUser, CredentialsError, UserId};
    use trivia_core::time::{fixed_clock, fixed_now};

    #[derive(Default)]
    struct FakeProvider {
        exchanged: Mutex<Vec<(String, String)>>,
        signed_out: Mutex<u32>,
        confirm_sign_ups: bool,
    }

    fn session(expires_in: i64) -> AuthSession {
        AuthSession {
            access_token: "token".into(),
            refresh_token: Some("refresh".into()),
            expires_at: Some(fixed_now() + Duration::seconds(expires_in)),
            user: AuthUser {
                id: UserId::new("user-1"),
                email: Some("a@b.co".into()),
            },
        }
    }

    #[async_trait]
    impl IdentityProvider for FakeProvider {
        async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, AuthError> {
            if credentials.password() == "correct-horse" {
                Ok(session(3600))
            } else {
                Err(AuthError::Rejected("Invalid login credentials".into()))
            }
        }

        async fn sign_up(&self, _: &Credentials) -> Result<Option<AuthSession>, AuthError> {
            Ok((!self.confirm_sign_ups).then(|| session(3600)))
        }

        async fn sign_out(&self, _: &AuthSession) -> Result<(), AuthError> {
            *self.signed_out.lock().unwrap() += 1;
            Ok(())
        }

        fn authorize_url(&self, provider: &str, pkce: &PkcePair) -> Result<Url, AuthError> {
            Ok(Url::parse(&format!(
                "https://idp.test/authorize?provider={provider}&code_challenge={}",
                pkce.challenge()
            ))?)
        }

        async fn exchange_code_for_session(
            &self,
            code: &str,
            verifier: &str,
        ) -> Result<AuthSession, AuthError> {
            self.exchanged
                .lock()
                .unwrap()
                .push((code.to_string(), verifier.to_string()));
            Ok(session(3600))
        }
    }

    fn service(provider: FakeProvider) -> (AuthService, Arc<FakeProvider>, Arc<InMemoryRepository>) {
        let provider = Arc::new(provider);
        let kv = Arc::new(InMemoryRepository::new());
        let dyn_provider: Arc<dyn IdentityProvider> = provider.clone();
        let service = AuthService::new(Some(dyn_provider), kv.clone(), fixed_clock());
        (service, provider, kv)
    }

    #[tokio::test]
    async fn sign_in_persists_session() {
        let (auth, _, kv) = service(FakeProvider::default());
        assert!(auth.current_session().await.unwrap().is_none());

        auth.sign_in("a@b.co", "correct-horse").await.unwrap();
        assert!(kv.get(SESSION_KEY).await.unwrap().is_some());
        let current = auth.current_session().await.unwrap().unwrap();
        assert_eq!(current.user.id.as_str(), "user-1");
    }

    #[tokio::test]
    async fn rejected_sign_in_keeps_user_signed_out() {
        let (auth, _, _) = service(FakeProvider::default());
        let err = auth.sign_in("a@b.co", "wrong-pass").await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected(ref m) if m == "Invalid login credentials"));
        assert!(auth.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn invalid_credentials_never_reach_provider() {
        let (auth, _, _) = service(FakeProvider::default());
        let err = auth.sign_in("not-an-email", "correct-horse").await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Credentials(CredentialsError::InvalidEmail)
        ));
    }

    #[tokio::test]
    async fn unconfirmed_sign_up_is_reported() {
        let (auth, _, _) = service(FakeProvider {
            confirm_sign_ups: true,
            ..FakeProvider::default()
        });
        let err = auth.sign_up("a@b.co", "secret1").await.unwrap_err();
        assert!(matches!(err, AuthError::ConfirmationRequired));
    }

    #[tokio::test]
    async fn sign_out_clears_session() {
        let (auth, provider, kv) = service(FakeProvider::default());
        auth.sign_up("a@b.co", "secret1").await.unwrap();
        auth.sign_out().await.unwrap();
        assert_eq!(*provider.signed_out.lock().unwrap(), 1);
        assert!(kv.get(SESSION_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn oauth_round_trip_uses_stored_verifier() {
        let (auth, provider, kv) = service(FakeProvider::default());
        let url = auth.begin_oauth(DEFAULT_OAUTH_PROVIDER).await.unwrap();
        let verifier = kv.get(PKCE_VERIFIER_KEY).await.unwrap().unwrap();
        let challenge = PkcePair::from_verifier(verifier.clone()).challenge().to_string();
        assert!(url.as_str().contains(&challenge));

        auth.complete_oauth("trivia://auth/callback?code=abc123")
            .await
            .unwrap();
        assert_eq!(
            provider.exchanged.lock().unwrap().as_slice(),
            &[("abc123".to_string(), verifier)]
        );
        assert!(kv.get(PKCE_VERIFIER_KEY).await.unwrap().is_none());
        assert!(auth.current_session().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn oauth_callback_without_begin_is_rejected() {
        let (auth, _, _) = service(FakeProvider::default());
        let err = auth
            .complete_oauth("trivia://auth/callback?code=abc123")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NoPendingOAuth));

        let err = auth
            .complete_oauth("trivia://auth/callback#error_description=denied")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Callback(_)));
    }

    #[tokio::test]
    async fn expired_or_corrupt_sessions_read_as_absent() {
        let (auth, _, kv) = service(FakeProvider::default());
        kv.set(SESSION_KEY, &serde_json::to_string(&session(-5)).unwrap())
            .await
            .unwrap();
        assert!(auth.current_session().await.unwrap().is_none());

        kv.set(SESSION_KEY, "{not json").await.unwrap();
        assert!(auth.current_session().await.unwrap().is_none());
        assert!(kv.get(SESSION_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn guest_mode_disables_auth() {
        let auth = AuthService::guest(Arc::new(InMemoryRepository::new()), fixed_clock());
        assert!(!auth.enabled());
        assert!(matches!(
            auth.sign_in("a@b.co", "secret1").await.unwrap_err(),
            AuthError::Disabled
        ));
        assert!(auth.current_session().await.unwrap().is_none());
        auth.sign_out().await.unwrap();
    }
}
