use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Consecutive-day activity streak.
///
/// `last_active` is the calendar day of the most recent finished quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaysStreak {
    last_active: NaiveDate,
    count: u32,
}

impl DaysStreak {
    /// A fresh streak started on `today`.
    #[must_use]
    pub fn start(today: NaiveDate) -> Self {
        Self {
            last_active: today,
            count: 1,
        }
    }

    /// Rehydrate a streak from stored values. A stored count of zero is lifted to 1.
    #[must_use]
    pub fn from_persisted(last_active: NaiveDate, count: u32) -> Self {
        Self {
            last_active,
            count: count.max(1),
        }
    }

    #[must_use]
    pub fn last_active(&self) -> NaiveDate {
        self.last_active
    }

    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Apply activity on `today` and return the updated streak.
    ///
    /// - same day: unchanged
    /// - the day after `last_active`: count + 1
    /// - more than one day later: reset to 1
    /// - `today` before `last_active` (clock moved back): unchanged
    #[must_use]
    pub fn record_activity(self, today: NaiveDate) -> Self {
        let gap = (today - self.last_active).num_days();
        match gap {
            1 => Self {
                last_active: today,
                count: self.count.saturating_add(1),
            },
            g if g > 1 => Self::start(today),
            _ => self,
        }
    }

    /// Streak as it should be displayed on `today`: a streak whose last day is
    /// older than yesterday is already broken and shows 0.
    #[must_use]
    pub fn current(&self, today: NaiveDate) -> u32 {
        if (today - self.last_active).num_days() > 1 {
            0
        } else {
            self.count
        }
    }
}

/// Aggregate player statistics shown on the home screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub questions_solved: u64,
    pub days_streak: u32,
}
