//! # API crate — shared fullstack server functions for the storefront
//!
//! Defines the Dioxus server functions the frontend calls for account
//! registration and session handling, plus the client-safe models and the
//! validation rules both sides share.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`auth`] | `server` | Argon2id password hashing, session keys |
//! | [`db`] | `server` | PostgreSQL connection pool (lazy `OnceCell` singleton) |
//! | [`models`] | — | `UserInfo`, sign-up field set and registration payloads |
//! | [`settings`] | `server` | Server settings from defaults, `config.toml` and environment |
//! | [`validation`] | — | Per-field rules for the sign-up form |
//!
//! ## Server functions exposed here
//!
//! Every public `async fn` in this file is compiled twice: once with the
//! server logic (behind `#[cfg(feature = "server")]`) and once as a thin
//! client stub that forwards the call over HTTP.
//!
//! - `get_current_user`, `logout`, `register`

use dioxus::prelude::*;

pub mod auth;
pub mod db;
pub mod models;
#[cfg(feature = "server")]
pub mod settings;
pub mod validation;

pub use models::{FieldName, RegisterError, RegisterResponse, SignUpValues, UserInfo};

/// Get the current authenticated user from the session.
#[cfg(feature = "server")]
#[get("/api/auth/me", session: tower_sessions::Session)]
pub async fn get_current_user() -> Result<Option<UserInfo>, ServerFnError> {
    use crate::db::get_pool;
    use crate::models::User;

    let Some(user_id) = auth::current_user_id(&session).await? else {
        return Ok(None);
    };

    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(user.map(|u| u.to_info()))
}

#[cfg(not(feature = "server"))]
#[get("/api/auth/me")]
pub async fn get_current_user() -> Result<Option<UserInfo>, ServerFnError> {
    Ok(None)
}

/// Log out the current user by clearing the session.
#[cfg(feature = "server")]
#[post("/api/auth/logout", session: tower_sessions::Session)]
pub async fn logout() -> Result<(), ServerFnError> {
    session
        .flush()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(())
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/logout")]
pub async fn logout() -> Result<(), ServerFnError> {
    Ok(())
}

/// Register a new account.
///
/// Invalid or conflicting input is not an error: it comes back as
/// [`RegisterResponse::Rejected`] with messages keyed by field name, which the
/// sign-up form attaches to its fields.
#[cfg(feature = "server")]
#[post("/api/auth/register", session: tower_sessions::Session)]
pub async fn register(values: SignUpValues) -> Result<RegisterResponse, ServerFnError> {
    use crate::db::get_pool;

    let values = values.normalized();

    let mut rejection = validation::validate_sign_up(&values);
    if !rejection.is_empty() {
        tracing::debug!(fields = ?rejection.errors.keys().collect::<Vec<_>>(), "Registration rejected");
        return Ok(RegisterResponse::Rejected(rejection));
    }

    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let existing: Option<(i64,)> = sqlx::query_as("SELECT 1::BIGINT FROM users WHERE email = $1")
        .bind(&values.email)
        .fetch_optional(pool)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    if existing.is_some() {
        rejection.add(FieldName::Email, "has already been taken");
        return Ok(RegisterResponse::Rejected(rejection));
    }

    let password_hash = auth::hash_password(&values.password).map_err(ServerFnError::new)?;

    let inserted = sqlx::query_as::<_, models::User>(
        "INSERT INTO users (email, mobile, gender, password_hash) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&values.email)
    .bind(&values.mobile)
    .bind(&values.gender)
    .bind(&password_hash)
    .fetch_one(pool)
    .await;

    let user = match inserted {
        Ok(user) => user,
        // Lost a race with a concurrent registration of the same address
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            rejection.add(FieldName::Email, "has already been taken");
            return Ok(RegisterResponse::Rejected(rejection));
        }
        Err(e) => return Err(ServerFnError::new(e.to_string())),
    };

    session
        .insert(auth::SESSION_USER_ID_KEY, user.id.to_string())
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    tracing::info!(user_id = %user.id, "Registered new user");
    Ok(RegisterResponse::Registered(user.to_info()))
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/register")]
pub async fn register(values: SignUpValues) -> Result<RegisterResponse, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}
