use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use services::{AuthError, DEFAULT_OAUTH_PROVIDER};

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::auth_error_message;

const CONFIRM_NOTICE: &str = "Check your email to confirm your account, then log in.";

#[component]
fn GuestNotice() -> Element {
    rsx! {
        div { class: "page auth",
            p { "Sign-in is not configured. Progress is kept on this device." }
            Link { class: "btn btn-primary", to: Route::Home {}, "Continue" }
        }
    }
}

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);
    let mut awaiting_callback = use_signal(|| false);
    let mut callback_url = use_signal(String::new);

    let on_submit = {
        let auth = ctx.auth();
        use_callback(move |()| {
            if busy() {
                return;
            }
            let auth = auth.clone();
            let (address, secret) = (email(), password());
            spawn(async move {
                busy.set(true);
                match auth.sign_in(&address, &secret).await {
                    Ok(_) => {
                        error.set(None);
                        navigator.replace(Route::Home {});
                    }
                    Err(err) => error.set(Some(auth_error_message(&err))),
                }
                busy.set(false);
            });
        })
    };

    let on_oauth = {
        let auth = ctx.auth();
        let opener = ctx.link_opener();
        use_callback(move |()| {
            let auth = auth.clone();
            let opener = opener.clone();
            spawn(async move {
                match auth.begin_oauth(DEFAULT_OAUTH_PROVIDER).await {
                    Ok(url) => {
                        opener.open_url(url.as_str());
                        error.set(None);
                        awaiting_callback.set(true);
                    }
                    Err(err) => error.set(Some(auth_error_message(&err))),
                }
            });
        })
    };

    let on_callback = {
        let auth = ctx.auth();
        use_callback(move |()| {
            let auth = auth.clone();
            let url = callback_url();
            spawn(async move {
                busy.set(true);
                match auth.complete_oauth(url.trim()).await {
                    Ok(_) => {
                        awaiting_callback.set(false);
                        navigator.replace(Route::Home {});
                    }
                    Err(err) => error.set(Some(auth_error_message(&err))),
                }
                busy.set(false);
            });
        })
    };

    if !ctx.auth_enabled() {
        return rsx! { GuestNotice {} };
    }

    rsx! {
        div { class: "page auth",
            h1 { "Welcome Back" }
            p { class: "muted", "Login to continue your journey" }
            form {
                class: "auth-form",
                onsubmit: move |evt| {
                    evt.prevent_default();
                    on_submit.call(());
                },
                input {
                    r#type: "email",
                    placeholder: "Email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                input {
                    r#type: "password",
                    placeholder: "Password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                button { class: "btn btn-primary", r#type: "submit", disabled: busy(), "Login" }
            }
            if let Some(message) = error() {
                p { class: "form-error", "{message}" }
            }
            div { class: "divider", "or" }
            button {
                class: "btn btn-secondary",
                r#type: "button",
                onclick: move |_| on_oauth.call(()),
                "Login with {DEFAULT_OAUTH_PROVIDER}"
            }
            if awaiting_callback() {
                form {
                    class: "auth-form callback-form",
                    onsubmit: move |evt| {
                        evt.prevent_default();
                        on_callback.call(());
                    },
                    p { class: "muted", "Finish signing in the browser, then paste the address it redirected to." }
                    input {
                        r#type: "url",
                        placeholder: "Redirect address",
                        value: "{callback_url}",
                        oninput: move |evt| callback_url.set(evt.value()),
                    }
                    button { class: "btn btn-primary", r#type: "submit", disabled: busy(), "Complete sign-in" }
                }
            }
            p { class: "auth-switch",
                "Don't have an account? "
                Link { to: Route::Signup {}, "Sign Up" }
            }
        }
    }
}

#[component]
pub fn SignupView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut notice = use_signal(|| None::<&'static str>);
    let mut busy = use_signal(|| false);

    let on_submit = {
        let auth = ctx.auth();
        use_callback(move |()| {
            if busy() {
                return;
            }
            let auth = auth.clone();
            let (address, secret) = (email(), password());
            spawn(async move {
                busy.set(true);
                match auth.sign_up(&address, &secret).await {
                    Ok(_) => {
                        error.set(None);
                        navigator.replace(Route::Home {});
                    }
                    Err(AuthError::ConfirmationRequired) => {
                        error.set(None);
                        notice.set(Some(CONFIRM_NOTICE));
                    }
                    Err(err) => error.set(Some(auth_error_message(&err))),
                }
                busy.set(false);
            });
        })
    };

    if !ctx.auth_enabled() {
        return rsx! { GuestNotice {} };
    }

    rsx! {
        div { class: "page auth",
            h1 { "Create Account" }
            p { class: "muted", "Join and start your adventure" }
            form {
                class: "auth-form",
                onsubmit: move |evt| {
                    evt.prevent_default();
                    on_submit.call(());
                },
                input {
                    r#type: "email",
                    placeholder: "Email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                input {
                    r#type: "password",
                    placeholder: "Password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                button { class: "btn btn-primary", r#type: "submit", disabled: busy(), "Sign Up" }
            }
            if let Some(message) = error() {
                p { class: "form-error", "{message}" }
            }
            if let Some(message) = notice() {
                p { class: "form-notice", "{message}" }
            }
            p { class: "auth-switch",
                "Already have an account? "
                Link { to: Route::Login {}, "Login" }
            }
        }
    }
}
