use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::map_results;

#[component]
pub fn ResultsView(category: u32, score: u32, answered: u32, total: u32) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let auth_enabled = ctx.auth_enabled();

    let on_logout = {
        let auth = ctx.auth();
        use_callback(move |()| {
            let auth = auth.clone();
            spawn(async move {
                if let Err(err) = auth.sign_out().await {
                    tracing::warn!(error = %err, "sign-out failed");
                }
                navigator.replace(Route::Login {});
            });
        })
    };

    let Some(vm) = map_results(category, score, answered, total) else {
        return rsx! {
            div { class: "page results",
                p { class: "form-error", "This score could not be shown." }
                Link { class: "btn btn-secondary", to: Route::Categories {}, "Categories" }
            }
        };
    };

    rsx! {
        div { class: "page results",
            h1 { "Quiz Complete!" }
            p { class: "muted", "Your Final Score" }
            p { class: "final-score", "{vm.score_label}" }
            p { class: "muted", "{vm.detail_label}" }
            div { class: "actions",
                Link { class: "btn btn-primary", to: Route::quiz(vm.category), "Play Again" }
                Link { class: "btn btn-secondary", to: Route::Categories {}, "Categories" }
                if auth_enabled {
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| on_logout.call(()),
                        "Log Out"
                    }
                }
            }
        }
    }
}
