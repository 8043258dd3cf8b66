//! Server-side authentication helpers: password hashing and session keys.

#[cfg(feature = "server")]
mod password;
#[cfg(feature = "server")]
mod session;

#[cfg(feature = "server")]
pub use password::hash_password;
#[cfg(feature = "server")]
pub use session::{current_user_id, SESSION_USER_ID_KEY};
