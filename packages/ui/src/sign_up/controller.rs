//! Collaborators of the sign-up page and the controller that owns its
//! subscriptions.
//!
//! The controller never touches a concrete store, HTTP client or router: it
//! talks to [`AuthService`], [`AuthStore`] and [`Navigator`]. Every piece of
//! asynchronous work it starts is wrapped in [`abortable`] and the handle is
//! kept, so [`SignUpController::teardown`] (also run on drop) can stop both
//! the auth-status watcher and an in-flight registration.

use std::future::Future;

use futures::future::{abortable, AbortHandle};
use futures::StreamExt;

use api::{RegisterError, SignUpValues, UserInfo};
use store::{Action, AppConfig, AppStore, AuthActions, AuthStatusStream};

use super::form::{SignUpForm, Submission};

/// Remote registration.
pub trait AuthService {
    fn register(
        &self,
        values: SignUpValues,
    ) -> impl Future<Output = Result<UserInfo, RegisterError>> + 'static;
}

/// The slice of the global store the sign-up page needs.
pub trait AuthStore {
    fn select_auth_status(&self) -> AuthStatusStream;
    fn dispatch(&self, action: Action);
}

impl AuthStore for AppStore {
    fn select_auth_status(&self) -> AuthStatusStream {
        AppStore::select_auth_status(self)
    }

    fn dispatch(&self, action: Action) {
        AppStore::dispatch(self, action)
    }
}

/// Fire-and-forget navigation.
pub trait Navigator {
    fn navigate_by_url(&self, url: &str);
}

/// Outcome of a registration started by [`SignUpController::submit`]. `None`
/// when the request was aborted before it finished.
pub type PendingRegistration = std::pin::Pin<
    Box<dyn Future<Output = Option<Result<UserInfo, RegisterError>>>>,
>;

pub struct SignUpController<S, T, N> {
    service: S,
    store: T,
    navigator: N,
    actions: AuthActions,
    title: String,
    registration: Option<AbortHandle>,
    auth_status: Option<AbortHandle>,
}

impl<S, T, N> SignUpController<S, T, N>
where
    S: AuthService,
    T: AuthStore,
    N: Navigator + Clone + 'static,
{
    pub fn new(service: S, store: T, navigator: N, config: &AppConfig) -> Self {
        Self {
            service,
            store,
            navigator,
            actions: AuthActions,
            title: config.app_name.clone(),
            registration: None,
            auth_status: None,
        }
    }

    /// Application display name.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Watch the auth status and go to `/` on every `true`. The returned
    /// future runs until [`teardown`](Self::teardown) and must be spawned by
    /// the caller.
    pub fn redirect_if_logged_in(&mut self) -> impl Future<Output = ()> + 'static {
        let mut status = self.store.select_auth_status();
        let navigator = self.navigator.clone();

        let (watcher, handle) = abortable(async move {
            while let Some(logged_in) = status.next().await {
                if logged_in {
                    tracing::debug!("Already logged in, leaving sign-up");
                    navigator.navigate_by_url("/");
                }
            }
        });
        if let Some(previous) = self.auth_status.replace(handle) {
            previous.abort();
        }

        async move {
            let _ = watcher.await;
        }
    }

    /// Submit the form. Returns the pending registration when the form is
    /// valid; its outcome goes back into [`SignUpForm::complete_registration`].
    ///
    /// A previous registration still in flight is aborted first.
    pub fn submit(&mut self, form: &mut SignUpForm) -> Option<PendingRegistration> {
        let Submission::Valid(values) = form.submit() else {
            return None;
        };

        let (request, handle) = abortable(self.service.register(values));
        if let Some(previous) = self.registration.replace(handle) {
            tracing::debug!("Aborting previous registration request");
            previous.abort();
        }

        Some(Box::pin(async move { request.await.ok() }))
    }

    /// Start a social login with `provider`, e.g. "google".
    pub fn social_login(&self, provider: &str) {
        self.store.dispatch(self.actions.oauth_login(provider));
    }
}

impl<S, T, N> SignUpController<S, T, N> {
    /// Release every subscription this controller holds.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.registration.take() {
            handle.abort();
        }
        if let Some(handle) = self.auth_status.take() {
            handle.abort();
        }
    }
}

impl<S, T, N> Drop for SignUpController<S, T, N> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use futures::channel::oneshot;
    use futures::FutureExt;

    use api::FieldName;

    use super::*;
    use crate::sign_up::form::SubmissionState;

    type Reply = oneshot::Sender<Result<UserInfo, RegisterError>>;

    #[derive(Clone, Default)]
    struct MockService {
        calls: Rc<RefCell<Vec<SignUpValues>>>,
        replies: Rc<RefCell<VecDeque<Reply>>>,
    }

    impl MockService {
        fn reply(&self, outcome: Result<UserInfo, RegisterError>) {
            let tx = self.replies.borrow_mut().pop_front().expect("no pending call");
            let _ = tx.send(outcome);
        }
    }

    impl AuthService for MockService {
        fn register(
            &self,
            values: SignUpValues,
        ) -> impl Future<Output = Result<UserInfo, RegisterError>> + 'static {
            self.calls.borrow_mut().push(values);
            let (tx, rx) = oneshot::channel();
            self.replies.borrow_mut().push_back(tx);
            async move { rx.await.unwrap_or_else(|_| Err(RegisterError::default())) }
        }
    }

    #[derive(Clone, Default)]
    struct MockNavigator {
        visited: Rc<RefCell<Vec<String>>>,
    }

    impl Navigator for MockNavigator {
        fn navigate_by_url(&self, url: &str) {
            self.visited.borrow_mut().push(url.to_string());
        }
    }

    struct Harness {
        service: MockService,
        store: AppStore,
        navigator: MockNavigator,
        controller: SignUpController<MockService, AppStore, MockNavigator>,
    }

    fn harness() -> Harness {
        let service = MockService::default();
        let store = AppStore::new();
        let navigator = MockNavigator::default();
        let controller = SignUpController::new(
            service.clone(),
            store.clone(),
            navigator.clone(),
            &AppConfig::default().with_app_name("Spree Shop"),
        );
        Harness {
            service,
            store,
            navigator,
            controller,
        }
    }

    fn valid_form() -> SignUpForm {
        let mut form = SignUpForm::new();
        form.set_value(FieldName::Email, "a@b.com");
        form.set_value(FieldName::Password, "secret1");
        form.set_value(FieldName::PasswordConfirmation, "secret1");
        form.set_value(FieldName::Mobile, "1234567890");
        form.set_value(FieldName::Gender, "male");
        form
    }

    fn user() -> UserInfo {
        UserInfo {
            id: "42".into(),
            email: "a@b.com".into(),
            mobile: "1234567890".into(),
            gender: "male".into(),
        }
    }

    #[test]
    fn test_title_from_config() {
        let h = harness();
        assert_eq!(h.controller.title(), "Spree Shop");
    }

    #[test]
    fn test_invalid_form_does_not_register() {
        let mut h = harness();
        let mut form = SignUpForm::new();
        form.set_value(FieldName::Email, "a@b.com");

        assert!(h.controller.submit(&mut form).is_none());
        assert!(h.service.calls.borrow().is_empty());
        assert!(form.submitted());
    }

    #[test]
    fn test_mismatched_passwords_do_not_register() {
        let mut h = harness();
        let mut form = valid_form();
        form.set_value(FieldName::PasswordConfirmation, "secret2");

        assert!(h.controller.submit(&mut form).is_none());
        assert!(h.service.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_register_sends_all_values() {
        let mut h = harness();
        let mut form = valid_form();

        let pending = h.controller.submit(&mut form).expect("valid form registers");
        assert_eq!(h.service.calls.borrow().as_slice(), &[form.values()]);

        h.service.reply(Ok(user()));
        let outcome = pending.await.expect("not aborted");
        form.complete_registration(outcome);
        assert_eq!(form.state(), SubmissionState::Succeeded);
    }

    #[tokio::test]
    async fn test_server_rejection_reconciled_onto_form() {
        let mut h = harness();
        let mut form = valid_form();

        let pending = h.controller.submit(&mut form).unwrap();
        let rejection: RegisterError =
            serde_json::from_str(r#"{"errors":{"email":["already taken"]}}"#).unwrap();
        h.service.reply(Err(rejection));

        form.complete_registration(pending.await.unwrap());
        assert_eq!(
            form.error_message(FieldName::Email).as_deref(),
            Some("already taken")
        );
        assert!(form.field(FieldName::Mobile).synthetic_error().is_none());
    }

    #[tokio::test]
    async fn test_resubmission_aborts_previous_request() {
        let mut h = harness();
        let mut form = valid_form();

        let first = h.controller.submit(&mut form).unwrap();
        let second = h.controller.submit(&mut form).unwrap();
        assert_eq!(h.service.calls.borrow().len(), 2);

        // The first reply is never observed
        h.service.reply(Ok(user()));
        assert_eq!(first.await, None);

        h.service.reply(Err(RegisterError::default()));
        assert_eq!(second.await, Some(Err(RegisterError::default())));
    }

    #[tokio::test]
    async fn test_teardown_while_outstanding() {
        let mut h = harness();
        let mut form = valid_form();

        let pending = h.controller.submit(&mut form).unwrap();
        let before = form.clone();
        drop(h.controller);

        let mut rejection = RegisterError::default();
        rejection.add(FieldName::Email, "already taken");
        h.service.reply(Err(rejection));

        assert_eq!(pending.await, None);
        assert_eq!(form, before);
    }

    #[test]
    fn test_redirects_once_per_true_emission() {
        let mut h = harness();
        let mut watcher = Box::pin(h.controller.redirect_if_logged_in());

        assert!((&mut watcher).now_or_never().is_none());
        assert!(h.navigator.visited.borrow().is_empty());

        h.store.dispatch(AuthActions.login_success());
        assert!((&mut watcher).now_or_never().is_none());
        assert_eq!(h.navigator.visited.borrow().as_slice(), ["/"]);

        h.store.dispatch(AuthActions.logout_success());
        h.store.dispatch(AuthActions.login_success());
        assert!((&mut watcher).now_or_never().is_none());
        assert_eq!(h.navigator.visited.borrow().as_slice(), ["/", "/"]);
    }

    #[test]
    fn test_redirects_immediately_when_already_logged_in() {
        let mut h = harness();
        h.store.dispatch(AuthActions.login_success());

        let mut watcher = Box::pin(h.controller.redirect_if_logged_in());
        assert!((&mut watcher).now_or_never().is_none());
        assert_eq!(h.navigator.visited.borrow().as_slice(), ["/"]);
    }

    #[test]
    fn test_teardown_releases_status_subscription() {
        let mut h = harness();
        let mut watcher = Box::pin(h.controller.redirect_if_logged_in());
        assert!((&mut watcher).now_or_never().is_none());

        h.controller.teardown();
        assert_eq!((&mut watcher).now_or_never(), Some(()));

        h.store.dispatch(AuthActions.login_success());
        assert!(h.navigator.visited.borrow().is_empty());
    }

    #[test]
    fn test_social_login_dispatches_provider() {
        let h = harness();
        let mut actions = h.store.actions();

        h.controller.social_login("facebook");

        assert_eq!(
            actions.next().now_or_never().flatten(),
            Some(Action::OAuthLogin {
                provider: "facebook".to_string()
            })
        );
        assert_eq!(
            h.store.state().auth.pending_provider.as_deref(),
            Some("facebook")
        );
    }
}
