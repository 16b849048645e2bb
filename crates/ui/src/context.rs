use std::sync::Arc;

use services::{AuthService, CategoryService, ProgressService, QuizService};

use crate::platform::LinkOpenerRef;

pub trait UiApp: Send + Sync {
    fn quiz(&self) -> Arc<QuizService>;
    fn categories(&self) -> Arc<CategoryService>;
    fn progress(&self) -> Arc<ProgressService>;
    fn auth(&self) -> Arc<AuthService>;
    fn link_opener(&self) -> LinkOpenerRef;
}

#[derive(Clone)]
pub struct AppContext {
    quiz: Arc<QuizService>,
    categories: Arc<CategoryService>,
    progress: Arc<ProgressService>,
    auth: Arc<AuthService>,
    link_opener: LinkOpenerRef,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            quiz: app.quiz(),
            categories: app.categories(),
            progress: app.progress(),
            auth: app.auth(),
            link_opener: app.link_opener(),
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
    pub fn link_opener(&self) -> LinkOpenerRef {
        Arc::clone(&self.link_opener)
    }

    /// Whether sign-in screens should be shown at all.
    #[must_use]
    pub fn auth_enabled(&self) -> bool {
        self.auth.enabled()
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
