use dioxus::prelude::*;

use trivia_core::model::ProgressSnapshot;

use crate::context::AppContext;
use crate::views::categories::use_category_cards;
use crate::views::{CategoryGrid, ViewError, ViewState, view_state_from_resource};
use crate::vm::filter_categories;

#[derive(Clone, Debug, PartialEq)]
struct HomeData {
    player: String,
    stats: ProgressSnapshot,
}

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let progress = ctx.progress();
    let auth = ctx.auth();
    let mut query = use_signal(String::new);

    let resource = use_resource(move || {
        let progress = progress.clone();
        let auth = auth.clone();
        async move {
            let stats = progress.snapshot().await.map_err(|err| {
                tracing::warn!(error = %err, "failed to load progress");
                ViewError::Unknown
            })?;
            // a missing or unreadable session only affects the greeting
            let player = auth
                .current_session()
                .await
                .ok()
                .flatten()
                .and_then(|session| session.user.email)
                .and_then(|email| email.split('@').next().map(str::to_owned))
                .unwrap_or_else(|| "Player".to_string());
            Ok::<_, ViewError>(HomeData { player, stats })
        }
    });
    let categories = use_category_cards();
    let state = view_state_from_resource(&resource);
    let category_state = view_state_from_resource(&categories);

    rsx! {
        div { class: "page home",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    header { class: "home-header",
                        h2 { "Hello, {data.player}" }
                        div { class: "stats",
                            div { class: "stat",
                                span { class: "stat-value", "{data.stats.questions_solved}" }
                                span { class: "stat-label", "Questions solved" }
                            }
                            div { class: "stat",
                                span { class: "stat-value", "{data.stats.days_streak} 🔥" }
                                span { class: "stat-label", "Day streak" }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                },
            }
            input {
                class: "search",
                r#type: "search",
                placeholder: "Search categories",
                value: "{query}",
                oninput: move |evt| query.set(evt.value()),
            }
            match category_state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading Categories..." }
                },
                ViewState::Ready(cards) => rsx! {
                    CategoryGrid { cards: filter_categories(&cards, &query.read()) }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                },
            }
        }
    }
}
