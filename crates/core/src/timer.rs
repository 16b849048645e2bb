//! Per-question countdown.
//!
//! `Countdown` is driven by external ticks (one per second in the app) and
//! reports expiry exactly once per arming. Scheduling the ticks is the
//! caller's job; see `services::quiz::timer`.

/// Default time allowed per question, in seconds.
pub const DEFAULT_DURATION_SECS: u32 = 30;

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Still counting; `remaining` seconds left.
    Running { remaining: u32 },
    /// Reached zero on this tick. Reported once per arming.
    Expired,
    /// Already expired; the tick is ignored until `restart`.
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    duration: u32,
    remaining: u32,
    fired: bool,
}

impl Countdown {
    /// A countdown armed at `duration_secs`. A zero duration is treated as one second.
    #[must_use]
    pub fn new(duration_secs: u32) -> Self {
        let duration = duration_secs.max(1);
        Self {
            duration,
            remaining: duration,
            fired: false,
        }
    }

    #[must_use]
    pub fn duration(&self) -> u32 {
        self.duration
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.fired
    }

    /// Fraction of time left in `[0, 1]`, for progress bars.
    #[must_use]
    pub fn fraction_remaining(&self) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let fraction = self.remaining as f32 / self.duration as f32;
        fraction.clamp(0.0, 1.0)
    }

    /// Advance by one unit of time.
    pub fn tick(&mut self) -> Tick {
        if self.fired {
            return Tick::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.fired = true;
            Tick::Expired
        } else {
            Tick::Running {
                remaining: self.remaining,
            }
        }
    }

    /// Reset elapsed time and re-arm the single-shot expiry.
    pub fn restart(&mut self) {
        self.remaining = self.duration;
        self.fired = false;
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_SECS)
    }
}
