//! # Database module — PostgreSQL connection pool
//!
//! Server-only. The pool is a lazy, process-wide singleton behind a
//! [`tokio::sync::OnceCell`]; the first call to [`get_pool`] reads the
//! `database` section of [`crate::settings::Settings`] and connects.

#[cfg(feature = "server")]
mod pool;

#[cfg(feature = "server")]
pub use pool::get_pool;
