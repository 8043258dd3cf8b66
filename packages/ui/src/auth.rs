//! Authentication context, effects and the API-backed registration service.

use std::future::Future;

use api::{RegisterError, RegisterResponse, SignUpValues, UserInfo};
use dioxus::core::spawn_forever;
use dioxus::prelude::*;
use futures::channel::oneshot;
use futures::StreamExt;
use store::{Action, AppConfig, AppStore, AuthActions};

use crate::navigation::redirect_to;
use crate::sign_up::AuthService;

/// Get the application store provided by [`AuthProvider`].
pub fn use_app_store() -> AppStore {
    use_context::<AppStore>()
}

/// The "is logged in" flag as a signal that follows the store.
pub fn use_auth_status() -> Signal<bool> {
    let store = use_app_store();
    let mut status = use_signal(|| store.state().auth.is_authenticated);

    use_hook(move || {
        let mut changes = store.select_auth_status();
        spawn(async move {
            while let Some(logged_in) = changes.next().await {
                status.set(logged_in);
            }
        })
    });

    status
}

/// Provider component that owns the application store.
/// Wrap your app with this component to enable authentication.
///
/// On mount it asks the server for the session's user and marks the store
/// as logged in when there is one. It also runs the social login effect:
/// every [`Action::OAuthLogin`] sends the browser to the provider's entry
/// point from [`AppConfig::oauth_url`] when a social login host is configured.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let store = use_context_provider(AppStore::new);

    // Fetch the current user on mount
    let session_store = store.clone();
    let _ = use_resource(move || {
        let store = session_store.clone();
        async move {
            match api::get_current_user().await {
                Ok(Some(_)) => store.dispatch(AuthActions.login_success()),
                Ok(None) => {}
                Err(e) => tracing::warn!("Failed to fetch current user: {}", e),
            }
        }
    });

    let effect_store = store.clone();
    use_hook(move || {
        let config = AppConfig::load();
        let mut actions = effect_store.actions();
        spawn(async move {
            while let Some(action) = actions.next().await {
                if let Action::OAuthLogin { provider } = action {
                    match config.oauth_url(&provider) {
                        Some(url) => redirect_to(&url),
                        None => tracing::warn!("No social login host configured for {}", provider),
                    }
                }
            }
        })
    });

    rsx! {
        {children}
    }
}

/// Registration through the `register` server function.
///
/// A successful registration logs the user in on the store, which is what
/// moves an open sign-up page away. Transport failures carry no field errors.
///
/// The server call runs as a detached task: aborting the returned future
/// only drops the reply, so a registration the server already accepted
/// still reaches the store.
#[derive(Clone, Debug)]
pub struct ApiAuthService {
    store: AppStore,
}

impl ApiAuthService {
    pub fn new(store: AppStore) -> Self {
        Self { store }
    }
}

impl AuthService for ApiAuthService {
    fn register(
        &self,
        values: SignUpValues,
    ) -> impl Future<Output = Result<UserInfo, RegisterError>> + 'static {
        let (call, reply) = detach_registration(api::register(values), self.store.clone());
        spawn_forever(call);
        async move { reply.await.unwrap_or_else(|_| Err(RegisterError::default())) }
    }
}

/// Split a register call into the work that settles it on the store and the
/// receiver for its outcome. The first half keeps running when the receiver
/// is dropped.
fn detach_registration(
    call: impl Future<Output = Result<RegisterResponse, ServerFnError>> + 'static,
    store: AppStore,
) -> (
    impl Future<Output = ()> + 'static,
    oneshot::Receiver<Result<UserInfo, RegisterError>>,
) {
    let (tx, rx) = oneshot::channel();
    let work = async move {
        let outcome = settle_registration(call.await, &store);
        if tx.send(outcome).is_err() {
            tracing::debug!("Registration finished after the sign-up page went away");
        }
    };
    (work, rx)
}

/// Map the server's answer to the form's outcome, logging the user in on
/// success.
fn settle_registration(
    response: Result<RegisterResponse, ServerFnError>,
    store: &AppStore,
) -> Result<UserInfo, RegisterError> {
    match response {
        Ok(response) => {
            let outcome = response.into_result();
            if outcome.is_ok() {
                store.dispatch(AuthActions.login_success());
            }
            outcome
        }
        Err(e) => {
            tracing::warn!("Registration request failed: {}", e);
            Err(RegisterError::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::FieldName;
    use futures::FutureExt;

    fn user() -> UserInfo {
        UserInfo {
            id: "0b6f8c1e-6c43-4c1a-9a57-3f1d2b7e8a90".to_string(),
            email: "a@b.com".to_string(),
            mobile: "1234567890".to_string(),
            gender: "female".to_string(),
        }
    }

    #[test]
    fn test_registered_logs_in() {
        let store = AppStore::new();
        let outcome = settle_registration(Ok(RegisterResponse::Registered(user())), &store);

        assert_eq!(outcome.map(|u| u.email), Ok("a@b.com".to_string()));
        assert!(store.state().auth.is_authenticated);
    }

    #[test]
    fn test_rejected_keeps_server_errors() {
        let store = AppStore::new();
        let mut errors = RegisterError::default();
        errors.add(FieldName::Email, "has already been taken");

        let outcome = settle_registration(Ok(RegisterResponse::Rejected(errors.clone())), &store);

        assert_eq!(outcome, Err(errors));
        assert!(!store.state().auth.is_authenticated);
    }

    #[test]
    fn test_transport_failure_has_no_field_errors() {
        let store = AppStore::new();
        let outcome = settle_registration(Err(ServerFnError::new("connection refused".to_string())), &store);

        assert_eq!(outcome, Err(RegisterError::default()));
        assert!(!store.state().auth.is_authenticated);
    }

    #[tokio::test]
    async fn test_detached_registration_delivers_outcome() {
        let store = AppStore::new();
        let (work, reply) = detach_registration(
            async { Ok(RegisterResponse::Registered(user())) },
            store.clone(),
        );

        work.await;
        assert!(reply.await.unwrap().is_ok());
        assert!(store.state().auth.is_authenticated);
    }

    #[test]
    fn test_success_reaches_store_after_page_is_gone() {
        let store = AppStore::new();
        let (work, reply) = detach_registration(
            async { Ok(RegisterResponse::Registered(user())) },
            store.clone(),
        );
        drop(reply);

        assert!(work.now_or_never().is_some());
        assert!(store.state().auth.is_authenticated);
    }
}
