use std::sync::Arc;

use tracing::info;

use storage::repository::Storage;

use crate::Clock;
use crate::auth::{AuthService, IdentityProvider, SupabaseAuth};
use crate::category_service::CategoryService;
use crate::config::{AuthConfig, QuizConfig};
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;
use crate::question_source::{CategorySource, OpenTdbClient, QuestionSource, StaticQuestionSource};
use crate::quiz::QuizService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    quiz: Arc<QuizService>,
    categories: Arc<CategoryService>,
    progress: Arc<ProgressService>,
    auth: Arc<AuthService>,
    config: QuizConfig,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the
    /// offline deck cannot be loaded.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: QuizConfig,
        auth: Option<AuthConfig>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, clock, config, auth)
    }

    /// Build services over an existing storage aggregate.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the offline deck cannot be loaded.
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        config: QuizConfig,
        auth: Option<AuthConfig>,
    ) -> Result<Self, AppServicesError> {
        let (questions, categories): (Arc<dyn QuestionSource>, Arc<dyn CategorySource>) =
            if config.offline {
                info!("using bundled offline questions");
                let deck = Arc::new(StaticQuestionSource::bundled(config.question_count)?);
                (deck.clone() as Arc<dyn QuestionSource>, deck as Arc<dyn CategorySource>)
            } else {
                let client = Arc::new(OpenTdbClient::new(
                    config.api_base_url.clone(),
                    config.question_count,
                ));
                (client.clone() as Arc<dyn QuestionSource>, client as Arc<dyn CategorySource>)
            };
        Ok(Self::with_sources(storage, clock, config, auth, questions, categories))
    }

    /// Build services with explicit question and category sources.
    #[must_use]
    pub fn with_sources(
        storage: &Storage,
        clock: Clock,
        config: QuizConfig,
        auth: Option<AuthConfig>,
        questions: Arc<dyn QuestionSource>,
        categories: Arc<dyn CategorySource>,
    ) -> Self {
        let progress = ProgressService::new(clock, Arc::clone(&storage.kv));
        let quiz = Arc::new(QuizService::new(
            questions,
            progress.clone(),
            config.timer_secs,
        ));

        let provider = auth.map(|auth| {
            info!(url = %auth.base_url, "sign-in enabled");
            Arc::new(SupabaseAuth::new(auth, clock)) as Arc<dyn IdentityProvider>
        });
        if provider.is_none() {
            info!("sign-in not configured, running in guest mode");
        }
        let auth = Arc::new(AuthService::new(provider, Arc::clone(&storage.kv), clock));

        Self {
            quiz,
            categories: Arc::new(CategoryService::new(categories)),
            progress: Arc::new(progress),
            auth,
            config,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn categories(&self) -> Arc<CategoryService> {
        Arc::clone(&self.categories)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }
}
