use std::sync::Arc;

use dioxus::prelude::*;
use dioxus_router::use_navigator;

use services::QuizSnapshot;
use trivia_core::model::CategoryId;
use trivia_core::quiz::QuizStatus;

use crate::context::AppContext;
use crate::navigation::RouteNavigator;
use crate::vm::QuizVm;

#[component]
pub fn QuizView(category: u32) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut snapshot = use_signal(|| None::<QuizSnapshot>);

    let quiz = ctx.quiz();
    let handle = use_hook(move || {
        let (route_navigator, mut requests) = RouteNavigator::channel();
        let handle = quiz.start(CategoryId::new(category), Arc::new(route_navigator));

        let mut updates = handle.subscribe();
        spawn(async move {
            loop {
                let current = updates.borrow_and_update().clone();
                snapshot.set(Some(current));
                if updates.changed().await.is_err() {
                    break;
                }
            }
        });
        spawn(async move {
            while let Some(request) = requests.recv().await {
                match request.route() {
                    Some(route) => {
                        navigator.replace(route);
                    }
                    None => {
                        navigator.go_back();
                    }
                }
            }
        });
        handle
    });

    {
        let handle = handle.clone();
        use_drop(move || handle.close());
    }

    let on_select = {
        let handle = handle.clone();
        use_callback(move |(question, option): (usize, usize)| {
            if let Err(err) = handle.select(question, option) {
                tracing::debug!(error = %err, "selection dropped");
            }
        })
    };
    let on_next = {
        let handle = handle.clone();
        use_callback(move |()| {
            if let Err(err) = handle.advance() {
                tracing::debug!(error = %err, "advance dropped");
            }
        })
    };
    let on_retry = {
        let handle = handle.clone();
        use_callback(move |()| {
            if let Err(err) = handle.retry() {
                tracing::debug!(error = %err, "retry dropped");
            }
        })
    };
    let on_leave = {
        let handle = handle.clone();
        use_callback(move |()| {
            if handle.leave().is_err() {
                navigator.go_back();
            }
        })
    };

    let vm = snapshot.read().as_ref().map(QuizVm::from_snapshot);
    let Some(vm) = vm else {
        return rsx! { div { class: "page quiz", p { "Loading Quiz..." } } };
    };

    let question_index = vm.index;
    let timer_width = vm.timer_width();
    let message = vm.message.clone().unwrap_or_default();

    let on_key = {
        let option_count = vm.options.len();
        let can_advance = vm.can_advance;
        move |evt: KeyboardEvent| {
            match evt.data.key() {
                Key::Enter if can_advance => {
                    evt.prevent_default();
                    on_next.call(());
                }
                Key::Character(value) => {
                    let picked = value
                        .parse::<usize>()
                        .ok()
                        .filter(|n| (1..=option_count).contains(n));
                    if let Some(n) = picked {
                        evt.prevent_default();
                        on_select.call((question_index, n - 1));
                    }
                }
                _ => {}
            }
        }
    };

    rsx! {
        div {
            class: "page quiz",
            tabindex: "0",
            onkeydown: on_key,
            match vm.status {
                QuizStatus::Loading => rsx! {
                    p { "Loading Quiz..." }
                },
                QuizStatus::Empty | QuizStatus::Failed => rsx! {
                    div { class: "quiz-message",
                        p { "{message}" }
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            onclick: move |_| on_retry.call(()),
                            "Try Again"
                        }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| on_leave.call(()),
                            "Try Another Category"
                        }
                    }
                },
                QuizStatus::Finished => rsx! {
                    p { "Quiz Complete!" }
                },
                QuizStatus::InProgress => rsx! {
                    header { class: "quiz-header",
                        button {
                            class: "back",
                            r#type: "button",
                            onclick: move |_| on_leave.call(()),
                            "←"
                        }
                        span { class: "quiz-progress", "{vm.progress_label}" }
                        span { class: "quiz-score", "{vm.score_label}" }
                    }
                    div { class: "timer",
                        div { class: "timer-bar", style: "width: {timer_width}" }
                        span { class: "timer-label", "{vm.timer_label}" }
                    }
                    if let Some(text) = vm.question.clone() {
                        h2 { class: "question", "{text}" }
                    }
                    div { class: "options",
                        for option in vm.options.clone() {
                            button {
                                key: "{option.index}",
                                class: option.tone.class(),
                                r#type: "button",
                                disabled: option.disabled,
                                onclick: move |_| on_select.call((question_index, option.index)),
                                "{option.label}"
                            }
                        }
                    }
                    button {
                        class: "btn btn-primary next",
                        r#type: "button",
                        disabled: !vm.can_advance,
                        onclick: move |_| on_next.call(()),
                        "{vm.next_label}"
                    }
                },
            }
        }
    }
}
