//! Session keys and accessors.

use dioxus::prelude::ServerFnError;
use tower_sessions::Session;
use uuid::Uuid;

/// Key for storing user ID in session.
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// The logged-in user's id, if the session carries one.
pub async fn current_user_id(session: &Session) -> Result<Option<Uuid>, ServerFnError> {
    let user_id: Option<String> = session
        .get(SESSION_USER_ID_KEY)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    user_id
        .map(|id| Uuid::parse_str(&id).map_err(|e| ServerFnError::new(e.to_string())))
        .transpose()
}
