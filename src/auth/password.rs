//! Argon2id password hashing.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$...`) which carry their
//! own salt and parameters, so verification needs nothing but the string.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{PasswordHash, SaltString};

use crate::error::PorticoError;

const SALT_BYTES: usize = 16;

/// Hash `password` with a fresh random salt. Returns a PHC string.
pub fn hash_password(password: &str) -> Result<String, PorticoError> {
    let mut salt_bytes = [0u8; SALT_BYTES];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| PorticoError::Entropy(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes)?;
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string();
    Ok(phc)
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is malformed.
pub fn verify_password(password: &str, phc: &str) -> Result<bool, PorticoError> {
    let parsed = PasswordHash::new(phc)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Hash on the blocking pool; Argon2 is deliberately slow.
pub async fn hash_password_blocking(password: String) -> Result<String, PorticoError> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

pub async fn verify_password_blocking(
    password: String,
    phc: String,
) -> Result<bool, PorticoError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &phc)).await?
}
