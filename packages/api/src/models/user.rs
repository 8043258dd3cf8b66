//! # User model for registered customers
//!
//! ## [`User`] (server only)
//!
//! The complete database row from the `users` table, loaded through
//! [`sqlx::FromRow`]. Holds the Argon2 `password_hash`, the sign-up profile
//! (`mobile`, `gender`) and audit timestamps.
//!
//! ## [`UserInfo`]
//!
//! The client-safe projection that crosses the server function boundary. It
//! omits the password hash and timestamps and carries the id as a `String`
//! so it works in WASM.

use serde::{Deserialize, Serialize};

#[cfg(feature = "server")]
use chrono::{DateTime, Utc};
#[cfg(feature = "server")]
use sqlx::FromRow;
#[cfg(feature = "server")]
use uuid::Uuid;

/// Full user record from the database.
#[cfg(feature = "server")]
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub mobile: String,
    pub gender: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "server")]
impl User {
    /// Convert to UserInfo for client consumption.
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id.to_string(),
            email: self.email.clone(),
            mobile: self.mobile.clone(),
            gender: self.gender.clone(),
        }
    }
}

/// User information safe to send to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub mobile: String,
    pub gender: String,
}
