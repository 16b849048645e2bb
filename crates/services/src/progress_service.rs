use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use storage::repository::KeyValueRepository;
use trivia_core::model::{DaysStreak, FinalScore, ProgressSnapshot};

use crate::Clock;
use crate::error::ProgressError;

pub const QUESTIONS_SOLVED_KEY: &str = "total_questions_solved";
pub const STREAK_COUNT_KEY: &str = "days_streak_count";
pub const LAST_ACTIVITY_KEY: &str = "last_activity_date";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Lifetime player statistics kept in the key-value store.
///
/// Missing or unreadable values count as zero.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    kv: Arc<dyn KeyValueRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, kv: Arc<dyn KeyValueRepository>) -> Self {
        Self { clock, kv }
    }

    /// Current statistics as shown on the home screen.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if storage cannot be read.
    pub async fn snapshot(&self) -> Result<ProgressSnapshot, ProgressError> {
        let questions_solved = self.questions_solved().await?;
        let days_streak = self
            .streak()
            .await?
            .map_or(0, |streak| streak.current(self.clock.today()));
        Ok(ProgressSnapshot {
            questions_solved,
            days_streak,
        })
    }

    /// Fold a finished quiz into the statistics: correct answers are added to
    /// the solved counter and today counts toward the streak.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if storage cannot be read or written.
    pub async fn record_quiz(&self, score: &FinalScore) -> Result<ProgressSnapshot, ProgressError> {
        let solved = self
            .questions_solved()
            .await?
            .saturating_add(u64::from(score.score()));
        self.kv
            .set(QUESTIONS_SOLVED_KEY, &solved.to_string())
            .await?;

        let today = self.clock.today();
        let streak = match self.streak().await? {
            Some(streak) => streak.record_activity(today),
            None => DaysStreak::start(today),
        };
        self.kv
            .set(STREAK_COUNT_KEY, &streak.count().to_string())
            .await?;
        self.kv
            .set(
                LAST_ACTIVITY_KEY,
                &streak.last_active().format(DATE_FORMAT).to_string(),
            )
            .await?;

        info!(
            questions_solved = solved,
            days_streak = streak.count(),
            "progress updated"
        );
        Ok(ProgressSnapshot {
            questions_solved: solved,
            days_streak: streak.current(today),
        })
    }

    async fn questions_solved(&self) -> Result<u64, ProgressError> {
        let raw = self.kv.get(QUESTIONS_SOLVED_KEY).await?;
        Ok(raw
            .and_then(|value| parse_logged(QUESTIONS_SOLVED_KEY, &value))
            .unwrap_or(0))
    }

    async fn streak(&self) -> Result<Option<DaysStreak>, ProgressError> {
        let Some(raw_date) = self.kv.get(LAST_ACTIVITY_KEY).await? else {
            return Ok(None);
        };
        let Ok(last_active) = NaiveDate::parse_from_str(raw_date.trim(), DATE_FORMAT) else {
            debug!(key = LAST_ACTIVITY_KEY, value = %raw_date, "ignoring unparsable value");
            return Ok(None);
        };
        let count = self
            .kv
            .get(STREAK_COUNT_KEY)
            .await?
            .and_then(|value| parse_logged::<u32>(STREAK_COUNT_KEY, &value))
            .unwrap_or(0);
        Ok(Some(DaysStreak::from_persisted(last_active, count)))
    }
}

fn parse_logged<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    let parsed = value.trim().parse().ok();
    if parsed.is_none() {
        debug!(key, value, "ignoring unparsable value");
    }
    parsed
}
