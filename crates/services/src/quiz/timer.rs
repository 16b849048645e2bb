//! Wall-clock driver for the per-question countdown.

use std::time::Duration;

use tokio::sync::mpsc::WeakUnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use super::QuizCommand;

const TICK: Duration = Duration::from_secs(1);

/// Sends one `QuizCommand::Tick` per second into the quiz loop.
///
/// Every `start` bumps the generation so ticks from a torn-down timer can be
/// told apart. At most one task runs at a time; dropping the timer stops it.
#[derive(Debug, Default)]
pub struct QuestionTimer {
    task: Option<JoinHandle<()>>,
    generation: u64,
}

impl QuestionTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop any running task and start a fresh one. Returns the new generation.
    pub fn start(&mut self, events: WeakUnboundedSender<QuizCommand>) -> u64 {
        self.stop();
        self.generation += 1;
        let generation = self.generation;

        self.task = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK, TICK);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(events) = events.upgrade() else {
                    break;
                };
                if events.send(QuizCommand::Tick { generation }).is_err() {
                    break;
                }
            }
        }));
        generation
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for QuestionTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
