//! Data models for the application.

mod sign_up;
mod user;

pub use sign_up::{FieldName, RegisterError, RegisterResponse, SignUpValues};
#[cfg(feature = "server")]
pub use user::User;
pub use user::UserInfo;
