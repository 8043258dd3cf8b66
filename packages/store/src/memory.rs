use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};

use crate::actions::Action;
use crate::models::AppState;
use crate::reducer::{get_auth_status, reduce};

/// Emits the current auth status on subscription, then every change.
pub type AuthStatusStream = UnboundedReceiver<bool>;

/// Every action dispatched after subscription, in order.
pub type ActionStream = UnboundedReceiver<Action>;

struct StatusSubscriber {
    tx: UnboundedSender<bool>,
    last: bool,
}

#[derive(Default)]
struct Inner {
    state: AppState,
    status_subscribers: Vec<StatusSubscriber>,
    action_subscribers: Vec<UnboundedSender<Action>>,
}

/// In-memory application store. Cloning yields another handle to the same state.
#[derive(Clone, Default)]
pub struct AppStore {
    inner: Arc<Mutex<Inner>>,
}

impl std::fmt::Debug for AppStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStore")
            .field("state", &self.lock().state)
            .finish()
    }
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.lock().state.clone()
    }

    /// Run the action through the reducer and notify subscribers.
    pub fn dispatch(&self, action: Action) {
        let mut inner = self.lock();
        tracing::debug!(action = action.kind(), "dispatch");

        inner.state = reduce(&inner.state, &action);
        let status = get_auth_status(&inner.state);

        // Dropped receivers are pruned here
        inner.status_subscribers.retain_mut(|sub| {
            if sub.last == status {
                return !sub.tx.is_closed();
            }
            sub.last = status;
            sub.tx.unbounded_send(status).is_ok()
        });
        inner
            .action_subscribers
            .retain(|tx| tx.unbounded_send(action.clone()).is_ok());
    }

    /// Subscribe to the "is logged in" flag.
    pub fn select_auth_status(&self) -> AuthStatusStream {
        let mut inner = self.lock();
        let current = get_auth_status(&inner.state);
        let (tx, rx) = unbounded();
        if tx.unbounded_send(current).is_ok() {
            inner.status_subscribers.push(StatusSubscriber { tx, last: current });
        }
        rx
    }

    /// Subscribe to dispatched actions, used by effects.
    pub fn actions(&self) -> ActionStream {
        let (tx, rx) = unbounded();
        self.lock().action_subscribers.push(tx);
        rx
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.lock().status_subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::AuthActions;
    use futures::{FutureExt, StreamExt};

    #[tokio::test]
    async fn test_status_emits_current_then_changes() {
        let store = AppStore::new();
        let mut status = store.select_auth_status();

        assert_eq!(status.next().await, Some(false));

        store.dispatch(AuthActions.login_success());
        assert_eq!(status.next().await, Some(true));

        store.dispatch(AuthActions.logout_success());
        assert_eq!(status.next().await, Some(false));
    }

    #[tokio::test]
    async fn test_status_skips_repeated_values() {
        let store = AppStore::new();
        store.dispatch(AuthActions.login_success());

        let mut status = store.select_auth_status();
        assert_eq!(status.next().await, Some(true));

        // Same status again, then an action that doesn't touch it
        store.dispatch(AuthActions.login_success());
        store.dispatch(AuthActions.oauth_login("google"));
        store.dispatch(AuthActions.logout_success());

        assert_eq!(status.next().await, Some(false));
        assert!(status.next().now_or_never().is_none());
    }

    #[tokio::test]
    async fn test_actions_stream() {
        let store = AppStore::new();
        let mut actions = store.actions();

        store.dispatch(AuthActions.oauth_login("facebook"));
        store.dispatch(AuthActions.login_success());

        assert_eq!(
            actions.next().await,
            Some(Action::OAuthLogin {
                provider: "facebook".to_string()
            })
        );
        assert_eq!(actions.next().await, Some(Action::LoginSuccess));
        assert_eq!(
            store.state().auth.pending_provider,
            None,
            "login success clears the pending provider"
        );
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let store = AppStore::new();
        let kept = store.select_auth_status();
        let dropped = store.select_auth_status();
        assert_eq!(store.subscriber_count(), 2);

        drop(dropped);
        store.dispatch(AuthActions.oauth_login("google"));
        assert_eq!(store.subscriber_count(), 1);

        drop(kept);
        store.dispatch(AuthActions.login_success());
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let store = AppStore::new();
        let other = store.clone();
        other.dispatch(AuthActions.login_success());
        assert!(store.state().auth.is_authenticated);
    }
}
