use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use services::{
    Navigator, ProgressService, QuestionSource, QuestionSourceError, QuizService, QuizSnapshot,
};
use storage::repository::InMemoryRepository;
use tokio::sync::watch;
use trivia_core::model::{CategoryId, FinalScore, Question, QuestionDraft};
use trivia_core::quiz::{AnswerState, QuizStatus};
use trivia_core::time::fixed_clock;

const CATEGORY: CategoryId = CategoryId::new(9);

fn question(n: usize) -> Question {
    QuestionDraft::new(
        format!("Question {n}"),
        vec!["right".into(), "wrong".into(), "also wrong".into()],
        "right",
    )
    .validate()
    .unwrap()
}

/// Serves queued responses in order; once drained, returns `fallback` questions.
struct ScriptedSource {
    responses: Mutex<Vec<Result<Vec<Question>, QuestionSourceError>>>,
    fallback: usize,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn returning(count: usize) -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            fallback: count,
            calls: AtomicUsize::new(0),
        }
    }

    fn then(self, response: Result<Vec<Question>, QuestionSourceError>) -> Self {
        self.responses.lock().unwrap().insert(0, response);
        self
    }
}

#[async_trait]
impl QuestionSource for ScriptedSource {
    async fn fetch(&self, _category: CategoryId) -> Result<Vec<Question>, QuestionSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let queued = self.responses.lock().unwrap().pop();
        queued.unwrap_or_else(|| Ok((0..self.fallback).map(question).collect()))
    }
}

struct PendingSource;

#[async_trait]
impl QuestionSource for PendingSource {
    async fn fetch(&self, _category: CategoryId) -> Result<Vec<Question>, QuestionSourceError> {
        std::future::pending().await
    }
}

#[derive(Default)]
struct RecordingNavigator {
    results: Mutex<Vec<FinalScore>>,
    backs: AtomicUsize,
}

impl RecordingNavigator {
    fn results(&self) -> Vec<FinalScore> {
        self.results.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn go_to_results(&self, score: FinalScore) {
        self.results.lock().unwrap().push(score);
    }

    fn go_back(&self) {
        self.backs.fetch_add(1, Ordering::SeqCst);
    }
}

fn quiz_service(source: Arc<dyn QuestionSource>, timer_secs: u32) -> (QuizService, ProgressService) {
    let progress = ProgressService::new(fixed_clock(), Arc::new(InMemoryRepository::new()));
    (QuizService::new(source, progress.clone(), timer_secs), progress)
}

async fn wait_for(
    rx: &mut watch::Receiver<QuizSnapshot>,
    done: impl Fn(&QuizSnapshot) -> bool,
) -> QuizSnapshot {
    tokio::time::timeout(Duration::from_secs(600), async {
        loop {
            {
                let snapshot = rx.borrow_and_update();
                if done(&snapshot) {
                    return snapshot.clone();
                }
            }
            rx.changed().await.expect("quiz loop stopped");
        }
    })
    .await
    .expect("condition never reached")
}

#[tokio::test(start_paused = true)]
async fn answering_three_correctly_scores_three() {
    let navigator = Arc::new(RecordingNavigator::default());
    let (service, progress) = quiz_service(Arc::new(ScriptedSource::returning(3)), 30);
    let handle = service.start(CATEGORY, navigator.clone());
    let mut rx = handle.subscribe();

    for index in 0..3 {
        let snapshot = wait_for(&mut rx, |s| s.status == QuizStatus::InProgress && s.index == index).await;
        assert_eq!(snapshot.answer, AnswerState::Unanswered);
        let correct = snapshot.question.as_ref().unwrap().correct_index();

        handle.select(index, correct).unwrap();
        let snapshot = wait_for(&mut rx, |s| matches!(s.answer, AnswerState::Answered { .. })).await;
        assert_eq!(snapshot.score as usize, index + 1);
        handle.advance().unwrap();
    }

    let finished = wait_for(&mut rx, |s| s.status == QuizStatus::Finished).await;
    assert_eq!(finished.final_score.map(|s| s.score()), Some(3));
    let results = navigator.results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score(), 3);
    assert_eq!(results[0].total(), 3);

    let stats = progress.snapshot().await.unwrap();
    assert_eq!(stats.questions_solved, 3);
    assert_eq!(stats.days_streak, 1);
}

#[tokio::test(start_paused = true)]
async fn unanswered_question_expires_with_zero() {
    let navigator = Arc::new(RecordingNavigator::default());
    let (service, _) = quiz_service(Arc::new(ScriptedSource::returning(1)), 5);
    let handle = service.start(CATEGORY, navigator.clone());
    let mut rx = handle.subscribe();

    let started = wait_for(&mut rx, |s| s.status == QuizStatus::InProgress).await;
    assert_eq!(started.remaining_secs, 5);
    let ticking = wait_for(&mut rx, |s| s.remaining_secs == 2).await;
    assert_eq!(ticking.status, QuizStatus::InProgress);

    let finished = wait_for(&mut rx, |s| s.status == QuizStatus::Finished).await;
    let score = finished.final_score.unwrap();
    assert_eq!(score.score(), 0);
    assert_eq!(score.answered(), 0);
    assert_eq!(score.total(), 1);
    assert_eq!(navigator.results().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn expiry_advances_without_changing_score() {
    let navigator = Arc::new(RecordingNavigator::default());
    let (service, _) = quiz_service(Arc::new(ScriptedSource::returning(2)), 5);
    let handle = service.start(CATEGORY, navigator);
    let mut rx = handle.subscribe();

    wait_for(&mut rx, |s| s.status == QuizStatus::InProgress).await;
    let second = wait_for(&mut rx, |s| s.index == 1).await;
    assert_eq!(second.score, 0);
    assert_eq!(second.answer, AnswerState::Unanswered);
    assert_eq!(second.remaining_secs, 5);

    // a click that was meant for the first question arrives late
    handle.select(0, 0).unwrap();
    handle.select(1, 1).unwrap();
    let answered = wait_for(&mut rx, |s| matches!(s.answer, AnswerState::Answered { .. })).await;
    assert_eq!(
        answered.answer,
        AnswerState::Answered {
            selected: 1,
            correct: false
        }
    );
}

#[tokio::test(start_paused = true)]
async fn answer_locked_before_expiry_is_kept() {
    let (service, _) = quiz_service(Arc::new(ScriptedSource::returning(2)), 5);
    let handle = service.start(CATEGORY, Arc::new(RecordingNavigator::default()));
    let mut rx = handle.subscribe();

    let first = wait_for(&mut rx, |s| s.status == QuizStatus::InProgress).await;
    let correct = first.question.as_ref().unwrap().correct_index();
    handle.select(0, correct).unwrap();
    let answered = wait_for(&mut rx, |s| matches!(s.answer, AnswerState::Answered { .. })).await;
    assert_eq!(answered.score, 1);

    // no manual advance; the timer moves on and the point stays
    let second = wait_for(&mut rx, |s| s.index == 1).await;
    assert_eq!(second.score, 1);
    assert_eq!(second.answer, AnswerState::Unanswered);
    assert_eq!(second.remaining_secs, 5);
}

#[tokio::test(start_paused = true)]
async fn manual_advance_restarts_full_timer() {
    let (service, _) = quiz_service(Arc::new(ScriptedSource::returning(2)), 10);
    let handle = service.start(CATEGORY, Arc::new(RecordingNavigator::default()));
    let mut rx = handle.subscribe();

    wait_for(&mut rx, |s| s.status == QuizStatus::InProgress).await;
    let partial = wait_for(&mut rx, |s| s.remaining_secs == 7).await;
    assert_eq!(partial.index, 0);

    handle.select(0, 1).unwrap();
    wait_for(&mut rx, |s| matches!(s.answer, AnswerState::Answered { .. })).await;
    handle.advance().unwrap();
    let second = wait_for(&mut rx, |s| s.index == 1).await;
    assert_eq!(second.remaining_secs, 10);
    assert_eq!(second.duration_secs, 10);
    assert_eq!(second.score, 0);
}

#[tokio::test(start_paused = true)]
async fn leaving_goes_back_and_stops_the_quiz() {
    let navigator = Arc::new(RecordingNavigator::default());
    let (service, progress) = quiz_service(Arc::new(ScriptedSource::returning(3)), 30);
    let handle = service.start(CATEGORY, navigator.clone());
    let mut rx = handle.subscribe();
    wait_for(&mut rx, |s| s.status == QuizStatus::InProgress).await;

    handle.leave().unwrap();
    tokio::time::timeout(Duration::from_secs(5), async {
        while rx.changed().await.is_ok() {}
    })
    .await
    .expect("loop should stop after leaving");

    assert_eq!(navigator.backs.load(Ordering::SeqCst), 1);
    assert!(navigator.results().is_empty());
    assert!(handle.advance().is_err());
    assert_eq!(progress.snapshot().await.unwrap().questions_solved, 0);
}

#[tokio::test(start_paused = true)]
async fn advance_before_answer_is_ignored() {
    let (service, _) = quiz_service(Arc::new(ScriptedSource::returning(2)), 30);
    let handle = service.start(CATEGORY, Arc::new(RecordingNavigator::default()));
    let mut rx = handle.subscribe();

    wait_for(&mut rx, |s| s.status == QuizStatus::InProgress).await;
    handle.advance().unwrap();
    handle.select(0, 2).unwrap();
    handle.select(0, 0).unwrap();
    let snapshot = wait_for(&mut rx, |s| matches!(s.answer, AnswerState::Answered { .. })).await;
    assert_eq!(snapshot.index, 0);
    assert_eq!(snapshot.score, 0);
    assert_eq!(
        snapshot.answer,
        AnswerState::Answered {
            selected: 2,
            correct: false
        }
    );
}

#[tokio::test(start_paused = true)]
async fn empty_source_never_starts() {
    let navigator = Arc::new(RecordingNavigator::default());
    let (service, _) = quiz_service(Arc::new(ScriptedSource::returning(0)), 30);
    let handle = service.start(CATEGORY, navigator.clone());
    let mut rx = handle.subscribe();

    let snapshot = wait_for(&mut rx, |s| s.status != QuizStatus::Loading).await;
    assert_eq!(snapshot.status, QuizStatus::Empty);
    assert!(snapshot.question.is_none());
    assert!(navigator.results().is_empty());
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_can_be_retried() {
    let source = Arc::new(
        ScriptedSource::returning(2).then(Err(QuestionSourceError::RateLimited)),
    );
    let (service, _) = quiz_service(source.clone(), 30);
    let handle = service.start(CATEGORY, Arc::new(RecordingNavigator::default()));
    let mut rx = handle.subscribe();

    let failed = wait_for(&mut rx, |s| s.status == QuizStatus::Failed).await;
    assert!(failed.failure.unwrap().contains("rate limit"));

    handle.retry().unwrap();
    let started = wait_for(&mut rx, |s| s.status == QuizStatus::InProgress).await;
    assert_eq!(started.total, 2);
    assert_eq!(started.score, 0);
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn close_stops_loop_and_outstanding_fetch() {
    let navigator = Arc::new(RecordingNavigator::default());
    let (service, _) = quiz_service(Arc::new(PendingSource), 30);
    let handle = service.start(CATEGORY, navigator.clone());
    let mut rx = handle.subscribe();

    handle.close();
    tokio::time::timeout(Duration::from_secs(5), async {
        while rx.changed().await.is_ok() {}
    })
    .await
    .expect("loop should stop");

    assert!(handle.select(0, 0).is_err());
    assert_eq!(rx.borrow().status, QuizStatus::Loading);
    assert!(navigator.results().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dropping_every_handle_stops_the_quiz() {
    let (service, _) = quiz_service(Arc::new(ScriptedSource::returning(3)), 5);
    let handle = service.start(CATEGORY, Arc::new(RecordingNavigator::default()));
    let mut rx = handle.subscribe();
    wait_for(&mut rx, |s| s.status == QuizStatus::InProgress).await;

    drop(handle);
    tokio::time::timeout(Duration::from_secs(60), async {
        while rx.changed().await.is_ok() {}
    })
    .await
    .expect("loop should stop once handles are gone");
    assert_ne!(rx.borrow().status, QuizStatus::Finished);
}
