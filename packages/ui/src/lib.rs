//! This crate contains all shared UI for the workspace.

mod auth;
pub use auth::{use_app_store, use_auth_status, ApiAuthService, AuthProvider};

mod navigation;
pub use navigation::{redirect_to, LocationNavigator};

pub mod sign_up;
pub use sign_up::SignUp;
