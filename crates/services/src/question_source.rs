//! Question and category providers.
//!
//! `OpenTdbClient` talks to the Open Trivia Database; `StaticQuestionSource`
//! serves the bundled offline deck.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use trivia_core::model::{Category, CategoryId, Question, QuestionDraft, builtin_categories};

use crate::config::{DEFAULT_API_BASE_URL, DEFAULT_QUESTION_COUNT};
use crate::error::QuestionSourceError;

const OFFLINE_DECK: &str = include_str!("../data/offline_deck.json");

const RESPONSE_OK: u8 = 0;
const RESPONSE_NO_RESULTS: u8 = 1;
const RESPONSE_RATE_LIMITED: u8 = 5;

/// Ordered questions for a category.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch a fresh set of questions. An empty list is a valid answer.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError` if the provider cannot be reached or
    /// rejects the request.
    async fn fetch(&self, category: CategoryId) -> Result<Vec<Question>, QuestionSourceError>;
}

/// All categories a provider knows about, unfiltered.
#[async_trait]
pub trait CategorySource: Send + Sync {
    /// # Errors
    ///
    /// Returns `QuestionSourceError` if the provider cannot be reached.
    async fn categories(&self) -> Result<Vec<Category>, QuestionSourceError>;
}

//
// ─── OPEN TRIVIA DATABASE ──────────────────────────────────────────────────────
//

#[derive(Clone)]
pub struct OpenTdbClient {
    client: Client,
    base_url: String,
    amount: u32,
    shuffle: bool,
}

impl Default for OpenTdbClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL, DEFAULT_QUESTION_COUNT)
    }
}

impl OpenTdbClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, amount: u32) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            amount: amount.max(1),
            shuffle: true,
        }
    }

    /// Keep the provider's option order (correct answer first). Used by tests.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    #[must_use]
    pub fn amount(&self) -> u32 {
        self.amount
    }
}

#[async_trait]
impl QuestionSource for OpenTdbClient {
    async fn fetch(&self, category: CategoryId) -> Result<Vec<Question>, QuestionSourceError> {
        let url = format!("{}/api.php", self.base_url);
        debug!(%category, amount = self.amount, "fetching questions");

        let response = self
            .client
            .get(url)
            .query(&[
                ("amount", self.amount.to_string()),
                ("category", category.value().to_string()),
                ("type", "multiple".to_string()),
                ("encode", "url3986".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QuestionSourceError::HttpStatus(response.status()));
        }

        let body: QuestionsResponse = response.json().await?;
        match body.response_code {
            RESPONSE_OK => {}
            RESPONSE_NO_RESULTS => {
                debug!(%category, "provider has no questions for category");
                return Ok(Vec::new());
            }
            RESPONSE_RATE_LIMITED => return Err(QuestionSourceError::RateLimited),
            code => return Err(QuestionSourceError::Api(code)),
        }

        let questions = decode_questions(body.results, self.shuffle)?;
        debug!(%category, count = questions.len(), "fetched questions");
        Ok(questions)
    }
}

#[async_trait]
impl CategorySource for OpenTdbClient {
    async fn categories(&self) -> Result<Vec<Category>, QuestionSourceError> {
        let url = format!("{}/api_category.php", self.base_url);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(QuestionSourceError::HttpStatus(response.status()));
        }

        let body: CategoriesResponse = response.json().await?;
        Ok(body
            .trivia_categories
            .into_iter()
            .map(|entry| Category::new(CategoryId::new(entry.id), entry.name))
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct QuestionsResponse {
    response_code: u8,
    #[serde(default)]
    results: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    trivia_categories: Vec<RawCategory>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    id: u32,
    name: String,
}

fn decode_questions(
    raw: Vec<RawQuestion>,
    shuffle: bool,
) -> Result<Vec<Question>, QuestionSourceError> {
    let mut rng = rand::rng();
    let mut questions = Vec::with_capacity(raw.len());

    for entry in raw {
        let text = percent_decode(&entry.question)?;
        let correct = percent_decode(&entry.correct_answer)?;
        let mut options = Vec::with_capacity(entry.incorrect_answers.len() + 1);
        options.push(correct.clone());
        for incorrect in &entry.incorrect_answers {
            options.push(percent_decode(incorrect)?);
        }
        if shuffle {
            options.shuffle(&mut rng);
        }

        match QuestionDraft::new(text, options, correct).validate() {
            Ok(question) => questions.push(question),
            Err(err) => warn!(error = %err, "skipping malformed question"),
        }
    }

    Ok(questions)
}

fn percent_decode(raw: &str) -> Result<String, QuestionSourceError> {
    urlencoding::decode(raw)
        .map(std::borrow::Cow::into_owned)
        .map_err(|err| QuestionSourceError::Decode(err.to_string()))
}

//
// ─── OFFLINE DECK ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct OfflineDeck {
    questions: Vec<OfflineQuestion>,
}

#[derive(Debug, Deserialize)]
struct OfflineQuestion {
    question: String,
    options: Vec<String>,
    correct_answer: String,
}

/// Serves a fixed list of questions for every category.
#[derive(Debug, Clone)]
pub struct StaticQuestionSource {
    questions: Vec<Question>,
    amount: usize,
}

impl StaticQuestionSource {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        let amount = questions.len();
        Self { questions, amount }
    }

    /// The general knowledge deck shipped with the app, capped at `amount`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError::Decode` if the embedded deck is malformed.
    pub fn bundled(amount: u32) -> Result<Self, QuestionSourceError> {
        let deck: OfflineDeck = serde_json::from_str(OFFLINE_DECK)
            .map_err(|err| QuestionSourceError::Decode(err.to_string()))?;
        let questions = deck
            .questions
            .into_iter()
            .map(|q| {
                QuestionDraft::new(q.question, q.options, q.correct_answer)
                    .validate()
                    .map_err(|err| QuestionSourceError::Decode(err.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(questions).with_amount(amount))
    }

    #[must_use]
    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = usize::try_from(amount).unwrap_or(usize::MAX);
        self
    }
}

#[async_trait]
impl QuestionSource for StaticQuestionSource {
    async fn fetch(&self, _category: CategoryId) -> Result<Vec<Question>, QuestionSourceError> {
        Ok(self.questions.iter().take(self.amount).cloned().collect())
    }
}

#[async_trait]
impl CategorySource for StaticQuestionSource {
    async fn categories(&self) -> Result<Vec<Category>, QuestionSourceError> {
        Ok(builtin_categories())
    }
}
