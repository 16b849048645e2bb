use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{CategoryCardVm, map_category_cards};

/// Loads the featured categories as cards.
pub(crate) fn use_category_cards() -> Resource<Result<Vec<CategoryCardVm>, ViewError>> {
    let ctx = use_context::<AppContext>();
    let categories = ctx.categories();
    use_resource(move || {
        let categories = categories.clone();
        async move {
            let list = categories.featured().await.map_err(|err| {
                tracing::warn!(error = %err, "failed to load categories");
                ViewError::Unavailable
            })?;
            Ok(map_category_cards(&list))
        }
    })
}

#[component]
pub fn CategoryGrid(cards: Vec<CategoryCardVm>) -> Element {
    if cards.is_empty() {
        return rsx! { p { class: "muted", "No categories found." } };
    }
    rsx! {
        div { class: "category-grid",
            for card in cards {
                Link {
                    key: "{card.id}",
                    class: "category-card",
                    to: Route::quiz(card.id),
                    span { class: "category-title", "{card.title}" }
                    span { class: "category-subtitle", "{card.subtitle}" }
                }
            }
        }
    }
}

#[component]
pub fn CategoriesView() -> Element {
    let mut resource = use_category_cards();
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Categories" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading Categories..." }
                },
                ViewState::Ready(cards) => rsx! {
                    CategoryGrid { cards }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| resource.restart(),
                        "Try Again"
                    }
                },
            }
        }
    }
}
