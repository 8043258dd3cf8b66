//! Actions understood by the store and the factory that builds them.

use serde::{Deserialize, Serialize};

/// Something that happened, sent to [`crate::AppStore::dispatch`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    LoginSuccess,
    LogoutSuccess,
    /// Start a social login with the named provider ("google", "facebook", ...).
    OAuthLogin { provider: String },
}

impl Action {
    /// Stable name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::LoginSuccess => "LOGIN_SUCCESS",
            Action::LogoutSuccess => "LOGOUT_SUCCESS",
            Action::OAuthLogin { .. } => "O_AUTH_LOGIN",
        }
    }
}

/// Action creators for the auth slice.
#[derive(Clone, Copy, Debug, Default)]
pub struct AuthActions;

impl AuthActions {
    pub fn login_success(&self) -> Action {
        Action::LoginSuccess
    }

    pub fn logout_success(&self) -> Action {
        Action::LogoutSuccess
    }

    /// The provider is forwarded untouched.
    pub fn oauth_login(&self, provider: impl Into<String>) -> Action {
        Action::OAuthLogin {
            provider: provider.into(),
        }
    }
}
