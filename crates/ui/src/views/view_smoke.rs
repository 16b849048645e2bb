use trivia_core::model::{CategoryId, FinalScore};

use super::test_harness::{
    HarnessOptions, ViewKind, auth_config, setup_view_harness, setup_view_harness_with,
};

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_stats_and_categories() {
    let mut harness = setup_view_harness(ViewKind::Home);
    let score = FinalScore::new(CategoryId::new(9), 7, 9, 10).unwrap();
    harness
        .services
        .progress()
        .record_quiz(&score)
        .await
        .expect("record quiz");

    harness.rebuild();
    let html = harness.render_until("Geography").await;
    assert!(html.contains("Hello, Player"), "missing greeting in {html}");
    assert!(html.contains("Questions solved"), "missing stat label in {html}");
    assert!(html.contains(">7<"), "missing solved count in {html}");
    assert!(html.contains("1 🔥"), "missing streak in {html}");
    assert!(html.contains("Geography"), "missing category in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn categories_view_smoke_lists_featured_categories() {
    let mut harness = setup_view_harness(ViewKind::Categories);
    harness.rebuild();
    let html = harness.render_until("General Knowledge").await;
    assert!(html.contains("Film"), "missing display name in {html}");
    assert!(html.contains("Entertainment: Film"), "missing provider name in {html}");
    assert!(!html.contains("Loading Categories..."), "still loading in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_first_question() {
    let mut harness = setup_view_harness(ViewKind::Quiz(17));
    harness.rebuild();
    let html = harness.render_until("Question 1 / 2").await;
    assert!(html.contains("Question 1 / 2"), "missing progress in {html}");
    assert!(html.contains("Largest planet?"), "missing question in {html}");
    assert!(html.contains("Jupiter"), "missing option in {html}");
    assert!(html.contains("Next"), "missing next button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_offers_retry_when_empty() {
    let mut harness = setup_view_harness_with(
        ViewKind::Quiz(9),
        HarnessOptions {
            questions: Vec::new(),
            ..HarnessOptions::default()
        },
    );
    harness.rebuild();
    let html = harness.render_until("Could not load questions").await;
    assert!(html.contains("Try Again"), "missing retry in {html}");
    assert!(html.contains("Try Another Category"), "missing back link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_smoke_renders_score_in_guest_mode() {
    let mut harness = setup_view_harness(ViewKind::Results {
        category: 9,
        score: 3,
        answered: 4,
        total: 5,
    });
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Quiz Complete!"), "missing title in {html}");
    assert!(html.contains("3 / 5"), "missing score in {html}");
    assert!(html.contains("Play Again"), "missing replay in {html}");
    assert!(!html.contains("Log Out"), "guest mode should hide logout in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_smoke_rejects_bad_counters() {
    let mut harness = setup_view_harness(ViewKind::Results {
        category: 9,
        score: 8,
        answered: 4,
        total: 5,
    });
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("could not be shown"), "missing error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn login_view_smoke_renders_form_when_auth_configured() {
    let mut harness = setup_view_harness_with(
        ViewKind::Login,
        HarnessOptions {
            auth: Some(auth_config()),
            ..HarnessOptions::default()
        },
    );
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Welcome Back"), "missing title in {html}");
    assert!(html.contains("Login with google"), "missing oauth button in {html}");
    assert!(html.contains("have an account?"), "missing signup link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn signup_view_smoke_in_guest_mode_points_home() {
    let mut harness = setup_view_harness(ViewKind::Signup);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Sign-in is not configured"), "missing notice in {html}");
    assert!(!html.contains("Create Account"), "form should be hidden in {html}");
}
