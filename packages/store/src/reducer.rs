use crate::actions::Action;
use crate::models::{AppState, AuthState};

/// Apply one action to the state.
pub fn reduce(state: &AppState, action: &Action) -> AppState {
    let auth = match action {
        Action::LoginSuccess => AuthState {
            is_authenticated: true,
            pending_provider: None,
        },
        Action::LogoutSuccess => AuthState {
            is_authenticated: false,
            pending_provider: None,
        },
        Action::OAuthLogin { provider } => AuthState {
            pending_provider: Some(provider.clone()),
            ..state.auth.clone()
        },
    };
    AppState { auth }
}

/// Selector for the "is logged in" flag.
pub fn get_auth_status(state: &AppState) -> bool {
    state.auth.is_authenticated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::AuthActions;

    #[test]
    fn test_login_and_logout() {
        let actions = AuthActions;
        let state = AppState::default();
        assert!(!get_auth_status(&state));

        let state = reduce(&state, &actions.login_success());
        assert!(get_auth_status(&state));

        let state = reduce(&state, &actions.logout_success());
        assert!(!get_auth_status(&state));
    }

    #[test]
    fn test_oauth_login_records_provider_only() {
        let actions = AuthActions;
        let state = reduce(&AppState::default(), &actions.oauth_login("google"));
        assert_eq!(state.auth.pending_provider.as_deref(), Some("google"));
        assert!(!state.auth.is_authenticated);

        // Completing the login clears the pending provider
        let state = reduce(&state, &actions.login_success());
        assert!(state.auth.pending_provider.is_none());
        assert!(state.auth.is_authenticated);
    }
}
