use serde::{Deserialize, Serialize};

/// Root of the application state held by [`crate::AppStore`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub auth: AuthState,
}

/// Authentication slice of the state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthState {
    pub is_authenticated: bool,
    /// Provider of a social login that has been requested but not completed.
    pub pending_provider: Option<String>,
}
