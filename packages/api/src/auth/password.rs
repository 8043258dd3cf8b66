//! # Password hashing — Argon2id
//!
//! [`hash_password`] generates a random salt via [`OsRng`], hashes the
//! plaintext with the default Argon2id parameters and returns the PHC string
//! (`$argon2id$v=19$m=19456,t=2,p=1$...`) stored in `users.password_hash`.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};

/// Hash a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| format!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}
