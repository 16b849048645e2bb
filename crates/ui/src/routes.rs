use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};

use trivia_core::model::{CategoryId, FinalScore};

use crate::context::AppContext;
use crate::views::{
    CategoriesView, HomeView, LoginView, QuizView, ResultsView, SignupView, SplashView,
};

#[derive(Clone, Debug, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/", SplashView)] Splash {},
    #[route("/login", LoginView)] Login {},
    #[route("/signup", SignupView)] Signup {},
    #[layout(Layout)]
        #[route("/home", HomeView)] Home {},
        #[route("/categories", CategoriesView)] Categories {},
    #[end_layout]
    #[route("/quiz/:category", QuizView)] Quiz { category: u32 },
    #[route("/results/:category/:score/:answered/:total", ResultsView)]
    Results { category: u32, score: u32, answered: u32, total: u32 },
}

impl Route {
    #[must_use]
    pub fn quiz(category: CategoryId) -> Self {
        Self::Quiz {
            category: category.value(),
        }
    }

    #[must_use]
    pub fn results_for(score: &FinalScore) -> Self {
        Self::Results {
            category: score.category().value(),
            score: score.score(),
            answered: score.answered(),
            total: score.total(),
        }
    }
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            TabBar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn TabBar() -> Element {
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

    rsx! {
        nav { class: "tabs",
            h1 { "Trivia" }
            ul {
                li { Link { to: Route::Home {}, "Home" } }
                li { Link { to: Route::Categories {}, "Categories" } }
            }
            if auth_enabled {
                button {
                    class: "btn btn-secondary tabs-logout",
                    r#type: "button",
                    onclick: move |_| on_logout.call(()),
                    "Log Out"
                }
            }
        }
    }
}
