//! Running quizzes.
//!
//! Each quiz is a `QuizController` task that owns its `QuizSession` and
//! processes `QuizCommand`s one at a time. User input, timer ticks and fetch
//! results all arrive on the same channel; the UI reads state from a `watch`
//! of `QuizSnapshot`.

mod controller;
mod navigator;
mod timer;

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use trivia_core::model::{CategoryId, FinalScore, Question};
use trivia_core::quiz::{AnswerState, QuizSession, QuizStatus};
use trivia_core::timer::Countdown;

use crate::error::{QuestionSourceError, QuizServiceError};
use crate::progress_service::ProgressService;
use crate::question_source::QuestionSource;

pub use controller::QuizController;
pub use navigator::Navigator;
pub use timer::QuestionTimer;

/// Everything the quiz loop reacts to.
#[derive(Debug)]
pub enum QuizCommand {
    /// Pick `option` on question `question`. Dropped if that question is no
    /// longer current.
    Select { question: usize, option: usize },
    Advance,
    Retry,
    Tick { generation: u64 },
    Loaded {
        generation: u64,
        result: Result<Vec<Question>, QuestionSourceError>,
    },
    /// Stop the quiz and return to the previous screen.
    Leave,
    Close,
}

/// Read-only view of a running quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSnapshot {
    pub category: CategoryId,
    pub status: QuizStatus,
    pub index: usize,
    pub total: usize,
    pub score: u32,
    pub question: Option<Question>,
    pub answer: AnswerState,
    pub remaining_secs: u32,
    pub duration_secs: u32,
    pub failure: Option<String>,
    pub final_score: Option<FinalScore>,
}

impl QuizSnapshot {
    fn capture(session: &QuizSession, countdown: &Countdown) -> Self {
        Self {
            category: session.category(),
            status: session.status(),
            index: session.current_index(),
            total: session.total(),
            score: session.score(),
            question: session.current_question().cloned(),
            answer: session.answer_state(),
            remaining_secs: countdown.remaining(),
            duration_secs: countdown.duration(),
            failure: session.failure().map(str::to_owned),
            final_score: session.final_score(),
        }
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.index + 1 >= self.total
    }

    /// Fraction of the question timer left, in `[0, 1]`.
    #[must_use]
    pub fn time_fraction(&self) -> f32 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let fraction = self.remaining_secs as f32 / self.duration_secs as f32;
        fraction.clamp(0.0, 1.0)
    }
}

/// Sending side of a running quiz. Cheap to clone; the quiz stops when
/// `close` is called or the last handle is dropped.
#[derive(Clone)]
pub struct QuizHandle {
    commands: mpsc::UnboundedSender<QuizCommand>,
    snapshots: watch::Receiver<QuizSnapshot>,
}

impl QuizHandle {
    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        self.snapshots.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QuizSnapshot> {
        self.snapshots.clone()
    }

    /// # Errors
    ///
    /// Returns `QuizServiceError::Closed` if the quiz has stopped.
    pub fn select(&self, question: usize, option: usize) -> Result<(), QuizServiceError> {
        self.send(QuizCommand::Select { question, option })
    }

    /// # Errors
    ///
    /// Returns `QuizServiceError::Closed` if the quiz has stopped.
    pub fn advance(&self) -> Result<(), QuizServiceError> {
        self.send(QuizCommand::Advance)
    }

    /// # Errors
    ///
    /// Returns `QuizServiceError::Closed` if the quiz has stopped.
    pub fn retry(&self) -> Result<(), QuizServiceError> {
        self.send(QuizCommand::Retry)
    }

    /// Stop the quiz and ask the navigator to go back.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Closed` if the quiz has stopped.
    pub fn leave(&self) -> Result<(), QuizServiceError> {
        self.send(QuizCommand::Leave)
    }

    /// Stop the quiz. Closing twice is fine.
    pub fn close(&self) {
        let _ = self.commands.send(QuizCommand::Close);
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    fn send(&self, command: QuizCommand) -> Result<(), QuizServiceError> {
        self.commands
            .send(command)
            .map_err(|_| QuizServiceError::Closed)
    }
}

/// Starts quizzes.
#[derive(Clone)]
pub struct QuizService {
    source: Arc<dyn QuestionSource>,
    progress: ProgressService,
    timer_secs: u32,
}

impl QuizService {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>, progress: ProgressService, timer_secs: u32) -> Self {
        Self {
            source,
            progress,
            timer_secs,
        }
    }

    #[must_use]
    pub fn timer_secs(&self) -> u32 {
        self.timer_secs
    }

    /// Spawn a quiz for `category` and begin fetching its questions.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(&self, category: CategoryId, navigator: Arc<dyn Navigator>) -> QuizHandle {
        let (commands, inbox) = mpsc::unbounded_channel();
        let controller = QuizController::new(
            category,
            Arc::clone(&self.source),
            navigator,
            self.progress.clone(),
            self.timer_secs,
        );
        let snapshots = controller.subscribe();
        tokio::spawn(controller.run(commands.downgrade(), inbox));
        QuizHandle {
            commands,
            snapshots,
        }
    }
}
