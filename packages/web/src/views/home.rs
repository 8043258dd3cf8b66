//! Landing page.

use dioxus::prelude::*;
use store::{AppConfig, AuthActions};
use ui::{use_app_store, use_auth_status};

use crate::Route;

#[component]
pub fn Home() -> Element {
    let store = use_app_store();
    let title = use_hook(|| AppConfig::load().app_name);
    let logged_in = use_auth_status();

    let logout = move |_| {
        let store = store.clone();
        async move {
            match api::logout().await {
                Ok(()) => store.dispatch(AuthActions.logout_success()),
                Err(e) => tracing::error!("Failed to log out: {}", e),
            }
        }
    };

    rsx! {
        div {
            class: "flex flex-col items-center justify-center min-h-screen p-8 bg-white",

            h1 {
                class: "mb-8 text-neutral-800 font-bold text-[1.75rem]",
                "{title}"
            }

            if logged_in() {
                button {
                    class: "px-5 py-2.5 rounded bg-neutral-800 text-white",
                    onclick: logout,
                    "Log out"
                }
            } else {
                Link {
                    class: "text-primary-500 no-underline",
                    to: Route::SignUp {},
                    "Create an account"
                }
            }
        }
    }
}
