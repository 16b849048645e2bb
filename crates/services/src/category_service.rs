use std::sync::Arc;

use tracing::{info, warn};

use trivia_core::model::{Category, featured_categories};

use crate::error::QuestionSourceError;
use crate::question_source::CategorySource;

/// Lists the categories offered in the category browser.
#[derive(Clone)]
pub struct CategoryService {
    source: Arc<dyn CategorySource>,
}

impl CategoryService {
    #[must_use]
    pub fn new(source: Arc<dyn CategorySource>) -> Self {
        Self { source }
    }

    /// Featured categories, ordered by provider id.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError` if the provider request fails.
    pub async fn featured(&self) -> Result<Vec<Category>, QuestionSourceError> {
        let all = self.source.categories().await.inspect_err(|err| {
            warn!(error = %err, "failed to list categories");
        })?;
        let featured = featured_categories(all);
        info!(count = featured.len(), "loaded categories");
        Ok(featured)
    }
}
