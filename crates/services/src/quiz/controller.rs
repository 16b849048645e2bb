use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, WeakUnboundedSender};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use trivia_core::model::{CategoryId, FinalScore, Question};
use trivia_core::quiz::{QuizError, QuizSession, QuizStatus, QuizTransition};
use trivia_core::timer::{Countdown, Tick};

use super::timer::QuestionTimer;
use super::{Navigator, QuizCommand, QuizSnapshot};
use crate::error::QuestionSourceError;
use crate::progress_service::ProgressService;
use crate::question_source::QuestionSource;

/// Owns one quiz session and applies commands to it in arrival order.
pub struct QuizController {
    session: QuizSession,
    countdown: Countdown,
    timer: QuestionTimer,
    fetch: Option<JoinHandle<()>>,
    load_generation: u64,
    source: Arc<dyn QuestionSource>,
    navigator: Arc<dyn Navigator>,
    progress: ProgressService,
    snapshots: watch::Sender<QuizSnapshot>,
}

impl QuizController {
    #[must_use]
    pub fn new(
        category: CategoryId,
        source: Arc<dyn QuestionSource>,
        navigator: Arc<dyn Navigator>,
        progress: ProgressService,
        timer_secs: u32,
    ) -> Self {
        let session = QuizSession::new(category);
        let countdown = Countdown::new(timer_secs);
        let (snapshots, _) = watch::channel(QuizSnapshot::capture(&session, &countdown));
        Self {
            session,
            countdown,
            timer: QuestionTimer::new(),
            fetch: None,
            load_generation: 0,
            source,
            navigator,
            progress,
            snapshots,
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QuizSnapshot> {
        self.snapshots.subscribe()
    }

    /// Process commands until `Close` arrives or every handle is dropped.
    ///
    /// `events` is where the timer and fetch tasks post their results; it is
    /// weak so that it does not keep the loop alive on its own.
    pub async fn run(
        mut self,
        events: WeakUnboundedSender<QuizCommand>,
        mut inbox: UnboundedReceiver<QuizCommand>,
    ) {
        let category = self.session.category();
        info!(%category, "quiz started");
        self.start_fetch(&events);

        while let Some(command) = inbox.recv().await {
            match command {
                QuizCommand::Close => break,
                QuizCommand::Leave => {
                    info!(%category, "leaving quiz");
                    self.shutdown();
                    self.navigator.go_back();
                    break;
                }
                QuizCommand::Select { question, option } => {
                    let result = self.session.select_on(question, option);
                    self.apply(result, &events).await;
                }
                QuizCommand::Advance => {
                    let result = self.session.advance();
                    self.apply(result, &events).await;
                }
                QuizCommand::Retry => match self.session.retry() {
                    Ok(()) => {
                        info!(%category, "retrying quiz");
                        self.countdown.restart();
                        self.start_fetch(&events);
                        self.publish();
                    }
                    Err(err) => debug!(error = %err, "retry ignored"),
                },
                QuizCommand::Tick { generation } => {
                    self.on_tick(generation, &events).await;
                }
                QuizCommand::Loaded { generation, result } => {
                    self.on_loaded(generation, result, &events);
                }
            }
        }

        self.shutdown();
        info!(%category, "quiz closed");
    }

    fn start_fetch(&mut self, events: &WeakUnboundedSender<QuizCommand>) {
        if let Some(previous) = self.fetch.take() {
            previous.abort();
        }
        self.load_generation += 1;
        let generation = self.load_generation;
        let category = self.session.category();
        let source = Arc::clone(&self.source);
        let events = events.clone();

        self.fetch = Some(tokio::spawn(async move {
            let result = source.fetch(category).await;
            if let Some(events) = events.upgrade() {
                let _ = events.send(QuizCommand::Loaded { generation, result });
            }
        }));
    }

    fn on_loaded(
        &mut self,
        generation: u64,
        result: Result<Vec<Question>, QuestionSourceError>,
        events: &WeakUnboundedSender<QuizCommand>,
    ) {
        if generation != self.load_generation {
            debug!(generation, "dropping stale fetch result");
            return;
        }
        self.fetch = None;
        let category = self.session.category();

        let outcome = match result {
            Ok(questions) => self.session.load(questions).map(|status| {
                if status == QuizStatus::Empty {
                    info!(%category, "no questions available");
                }
            }),
            Err(err) => {
                warn!(%category, error = %err, "failed to fetch questions");
                self.session.fail(err.to_string())
            }
        };
        match outcome {
            Ok(()) if self.session.status() == QuizStatus::InProgress => {
                info!(%category, total = self.session.total(), "questions loaded");
                self.arm_timer(events);
            }
            Ok(()) => {}
            Err(err) => debug!(error = %err, "fetch result ignored"),
        }
        self.publish();
    }

    async fn on_tick(&mut self, generation: u64, events: &WeakUnboundedSender<QuizCommand>) {
        if generation != self.timer.generation() || self.session.status() != QuizStatus::InProgress
        {
            return;
        }
        match self.countdown.tick() {
            Tick::Running { .. } => self.publish(),
            Tick::Expired => {
                let index = self.session.current_index();
                debug!(index, "question timer expired");
                let result = self.session.expire(index);
                self.apply(result, events).await;
            }
            Tick::Idle => {}
        }
    }

    async fn apply(
        &mut self,
        result: Result<QuizTransition, QuizError>,
        events: &WeakUnboundedSender<QuizCommand>,
    ) {
        match result {
            Ok(QuizTransition::Ignored) => return,
            Ok(QuizTransition::Answered { selected, correct }) => {
                debug!(selected, correct, "answer locked");
            }
            Ok(QuizTransition::Advanced { index }) => {
                debug!(index, "next question");
                self.arm_timer(events);
            }
            Ok(QuizTransition::Finished(score)) => {
                self.finish(score).await;
                return;
            }
            Err(err) => {
                debug!(error = %err, "command rejected");
                return;
            }
        }
        self.publish();
    }

    async fn finish(&mut self, score: FinalScore) {
        self.timer.stop();
        info!(
            category = %score.category(),
            score = score.score(),
            answered = score.answered(),
            total = score.total(),
            "quiz finished"
        );
        if let Err(err) = self.progress.record_quiz(&score).await {
            warn!(error = %err, "failed to record progress");
        }
        self.publish();
        self.navigator.go_to_results(score);
    }

    fn arm_timer(&mut self, events: &WeakUnboundedSender<QuizCommand>) {
        self.countdown.restart();
        self.timer.start(events.clone());
    }

    fn publish(&self) {
        self.snapshots
            .send_replace(QuizSnapshot::capture(&self.session, &self.countdown));
    }

    fn shutdown(&mut self) {
        self.timer.stop();
        if let Some(fetch) = self.fetch.take() {
            fetch.abort();
        }
    }
}
