use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::ViewError;

/// Picks the first real screen: home for a signed-in user or guest mode,
/// login otherwise.
#[component]
pub fn SplashView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let auth = ctx.auth();

    let resource = use_resource(move || {
        let auth = auth.clone();
        async move {
            if !auth.enabled() {
                return Ok::<_, ViewError>(true);
            }
            match auth.current_session().await {
                Ok(session) => Ok(session.is_some()),
                Err(err) => {
                    tracing::warn!(error = %err, "could not read stored session");
                    Err(ViewError::Unknown)
                }
            }
        }
    });

    use_effect(move || {
        let target = match resource.value().read().as_ref() {
            Some(Ok(true)) => Route::Home {},
            Some(_) => Route::Login {},
            None => return,
        };
        navigator.replace(target);
    });

    rsx! {
        div { class: "page splash",
            h1 { "Trivia" }
            p { "Loading..." }
        }
    }
}
