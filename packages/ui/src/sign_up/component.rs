//! Sign-up page view.

use std::cell::RefCell;
use std::rc::Rc;

use api::FieldName;
use dioxus::prelude::*;
use store::AppConfig;

use super::controller::SignUpController;
use super::form::SignUpForm;
use crate::auth::{use_app_store, ApiAuthService};
use crate::navigation::LocationNavigator;

type Controller = SignUpController<ApiAuthService, store::AppStore, LocationNavigator>;

/// Registration form with client-side validation and social login buttons.
#[component]
pub fn SignUp() -> Element {
    let store = use_app_store();
    let mut form = use_signal(SignUpForm::new);

    let controller: Rc<RefCell<Controller>> = use_hook(|| {
        let config = AppConfig::load();
        Rc::new(RefCell::new(SignUpController::new(
            ApiAuthService::new(store.clone()),
            store,
            LocationNavigator,
            &config,
        )))
    });

    // If already logged in, leave for the home page
    use_hook({
        let controller = controller.clone();
        move || spawn(controller.borrow_mut().redirect_if_logged_in())
    });

    use_drop({
        let controller = controller.clone();
        move || controller.borrow_mut().teardown()
    });

    let title = controller.borrow().title().to_string();

    let on_submit = {
        let controller = controller.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let pending = controller.borrow_mut().submit(&mut form.write());
            if let Some(pending) = pending {
                spawn(async move {
                    if let Some(outcome) = pending.await {
                        form.write().complete_registration(outcome);
                    }
                });
            }
        }
    };

    let social_login = move |provider: &'static str| {
        let controller = controller.clone();
        move |_: MouseEvent| controller.borrow().social_login(provider)
    };

    let show_mismatch = {
        let state = form.read();
        state.submitted() && state.mismatched_passwords()
    };

    rsx! {
        document::Title { "Sign up | {title}" }

        div {
            class: "flex flex-col items-center justify-center min-h-screen p-8 bg-white",

            h1 {
                class: "mb-2 text-neutral-800 font-bold text-[1.75rem]",
                "Create Account"
            }

            p {
                class: "mb-8 text-neutral-600 text-[0.9375rem]",
                "Sign up for {title}"
            }

            form {
                novalidate: true,
                onsubmit: on_submit,
                class: "flex flex-col gap-3 w-full max-w-[320px]",

                FieldInput { form, field: FieldName::Email, r#type: "email" }
                FieldInput { form, field: FieldName::Password, r#type: "password" }
                FieldInput { form, field: FieldName::PasswordConfirmation, r#type: "password" }

                if show_mismatch {
                    div {
                        class: "text-red-600 text-[0.8125rem]",
                        "Passwords do not match"
                    }
                }

                FieldInput { form, field: FieldName::Mobile, r#type: "tel" }
                GenderSelect { form }

                button {
                    class: "w-full py-2.5 rounded bg-primary-500 text-white text-[0.9375rem] font-medium",
                    r#type: "submit",
                    "Sign up"
                }
            }

            div {
                class: "flex flex-col gap-3 mt-6 w-full max-w-[320px]",

                button {
                    class: "w-full py-2.5 rounded bg-[#4285f4] text-white",
                    r#type: "button",
                    onclick: social_login("google"),
                    "Continue with Google"
                }

                button {
                    class: "w-full py-2.5 rounded bg-[#3b5998] text-white",
                    r#type: "button",
                    onclick: social_login("facebook"),
                    "Continue with Facebook"
                }
            }
        }
    }
}

#[component]
fn FieldInput(mut form: Signal<SignUpForm>, field: FieldName, r#type: &'static str) -> Element {
    let (value, invalid, message) = {
        let state = form.read();
        let invalid = state.show_error(field);
        let message = if invalid { state.error_message(field) } else { None };
        (state.field(field).value().to_string(), invalid, message)
    };
    let border = if invalid { "border-red-400" } else { "border-neutral-300" };

    rsx! {
        div {
            class: "flex flex-col gap-1",

            input {
                class: "w-full px-3 py-2 border rounded {border}",
                r#type: r#type,
                name: field.as_str(),
                placeholder: field.label(),
                value: value,
                oninput: move |evt: FormEvent| form.write().set_value(field, evt.value()),
                onblur: move |_| form.write().mark_touched(field),
            }

            if let Some(message) = message {
                span { class: "text-red-600 text-[0.8125rem]", "{message}" }
            }
        }
    }
}

#[component]
fn GenderSelect(mut form: Signal<SignUpForm>) -> Element {
    let field = FieldName::Gender;
    let (value, invalid, message) = {
        let state = form.read();
        let invalid = state.show_error(field);
        let message = if invalid { state.error_message(field) } else { None };
        (state.field(field).value().to_string(), invalid, message)
    };
    let border = if invalid { "border-red-400" } else { "border-neutral-300" };

    rsx! {
        div {
            class: "flex flex-col gap-1",

            select {
                class: "w-full px-3 py-2 border rounded {border}",
                name: field.as_str(),
                value: value,
                onchange: move |evt: FormEvent| form.write().set_value(field, evt.value()),
                onblur: move |_| form.write().mark_touched(field),

                option { value: "", disabled: true, "Gender" }
                option { value: "male", "Male" }
                option { value: "female", "Female" }
            }

            if let Some(message) = message {
                span { class: "text-red-600 text-[0.8125rem]", "{message}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthProvider;
    use api::RegisterError;

    fn render(app: fn() -> Element) -> String {
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
        dioxus::ssr::render(&dom)
    }

    #[tokio::test]
    async fn test_form_opts_out_of_browser_validation() {
        let html = render(|| rsx! { AuthProvider { SignUp {} } });

        assert!(html.contains("<form"));
        assert!(html.contains("novalidate"));
    }

    #[test]
    fn test_gender_shows_server_message() {
        let html = render(|| {
            let form = use_signal(|| {
                let mut form = SignUpForm::new();
                form.set_value(FieldName::Gender, "other");
                form.mark_touched(FieldName::Gender);
                let mut rejection = RegisterError::default();
                rejection.add(FieldName::Gender, "is not included in the list");
                form.apply_server_errors(&rejection);
                form
            });
            rsx! { GenderSelect { form } }
        });

        assert!(html.contains("is not included in the list"));
        assert!(!html.contains("Please select a gender"));
    }

    #[test]
    fn test_untouched_gender_shows_nothing() {
        let html = render(|| {
            let form = use_signal(SignUpForm::new);
            rsx! { GenderSelect { form } }
        });

        assert!(!html.contains("<span"));
    }
}
