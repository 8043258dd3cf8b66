//! Sign-up page view.

use dioxus::prelude::*;

/// Sign-up page component.
#[component]
pub fn SignUp() -> Element {
    rsx! {
        ui::SignUp {}
    }
}
