use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{
    AppServices, AuthConfig, AuthService, CategoryService, Clock, ProgressService,
    QuestionSource, QuizConfig, QuizService, StaticQuestionSource,
};
use storage::repository::Storage;
use trivia_core::model::{Question, QuestionDraft};
use trivia_core::time::fixed_now;

use crate::context::{UiApp, build_app_context};
use crate::platform::{LinkOpenerRef, UiLinkOpener};
use crate::views::{
    CategoriesView, HomeView, LoginView, QuizView, ResultsView, SignupView,
};

struct NoopOpener;

impl UiLinkOpener for NoopOpener {
    fn open_url(&self, _url: &str) {}
}

struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn quiz(&self) -> Arc<QuizService> {
        self.services.quiz()
    }

    fn categories(&self) -> Arc<CategoryService> {
        self.services.categories()
    }

    fn progress(&self) -> Arc<ProgressService> {
        self.services.progress()
    }

    fn auth(&self) -> Arc<AuthService> {
        self.services.auth()
    }

    fn link_opener(&self) -> LinkOpenerRef {
        Arc::new(NoopOpener)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Categories,
    Login,
    Signup,
    Quiz(u32),
    Results {
        category: u32,
        score: u32,
        answered: u32,
        total: u32,
    },
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Categories => rsx! { CategoriesView {} },
        ViewKind::Login => rsx! { LoginView {} },
        ViewKind::Signup => rsx! { SignupView {} },
        ViewKind::Quiz(category) => rsx! { QuizView { category } },
        ViewKind::Results {
            category,
            score,
            answered,
            total,
        } => rsx! { ResultsView { category, score, answered, total } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub services: AppServices,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive the dom until the rendered html contains `needle` or we give up.
    pub async fn render_until(&mut self, needle: &str) -> String {
        for _ in 0..40 {
            let html = self.render();
            if html.contains(needle) {
                return html;
            }
            self.drive_async().await;
        }
        self.render()
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn question(text: &str, correct: &str, wrong: &[&str]) -> Question {
    let mut options = vec![correct.to_string()];
    options.extend(wrong.iter().map(|w| (*w).to_string()));
    QuestionDraft::new(text, options, correct).validate().unwrap()
}

pub struct HarnessOptions {
    pub questions: Vec<Question>,
    pub auth: Option<AuthConfig>,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            questions: vec![
                question("Largest planet?", "Jupiter", &["Mars", "Venus"]),
                question("Capital of Japan?", "Tokyo", &["Kyoto", "Osaka"]),
            ],
            auth: None,
        }
    }
}

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        anon_key: "anon".to_string(),
        redirect_url: "trivia://auth/callback".to_string(),
    }
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with(view, HarnessOptions::default())
}

pub fn setup_view_harness_with(view: ViewKind, options: HarnessOptions) -> ViewHarness {
    let storage = Storage::in_memory();
    let source = Arc::new(StaticQuestionSource::new(options.questions));
    let services = AppServices::with_sources(
        &storage,
        Clock::fixed(fixed_now()),
        QuizConfig::default(),
        options.auth,
        source.clone() as Arc<dyn QuestionSource>,
        source,
    );
    let app = Arc::new(TestApp {
        services: services.clone(),
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness {
        dom,
        services,
    }
}
