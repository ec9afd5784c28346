use std::sync::OnceLock;
use tracing::{debug, info};

use super::password::{hash_password, verify_password, verify_password_blocking};
use super::{Principal, normalize_username};
use crate::db::UsersStorage;
use crate::error::PorticoError;

/// Why a login was refused. Only used for logging; callers show one generic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    UnknownUser,
    BadCredential,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated(Principal),
    Rejected(AuthFailure),
}

/// Hash checked when the username is unknown, so both rejections cost one Argon2 verify.
fn dummy_hash() -> Result<&'static str, PorticoError> {
    static DUMMY: OnceLock<String> = OnceLock::new();
    if let Some(phc) = DUMMY.get() {
        return Ok(phc);
    }
    let phc = hash_password("portico-unknown-user")?;
    Ok(DUMMY.get_or_init(|| phc))
}

/// Verify `username`/`password` against the credential store.
pub async fn authenticate(
    users: &UsersStorage,
    username: &str,
    password: &str,
) -> Result<AuthOutcome, PorticoError> {
    let username = normalize_username(username);
    let Some(user) = users.find_by_username(username).await? else {
        let password = password.to_string();
        tokio::task::spawn_blocking(move || verify_password(&password, dummy_hash()?)).await??;
        debug!(username = %username, "login for unknown user");
        return Ok(AuthOutcome::Rejected(AuthFailure::UnknownUser));
    };

    if !verify_password_blocking(password.to_string(), user.password_hash.clone()).await? {
        debug!(username = %username, "login with bad credential");
        return Ok(AuthOutcome::Rejected(AuthFailure::BadCredential));
    }

    info!(username = %user.username, "user authenticated");
    Ok(AuthOutcome::Authenticated(user.into()))
}
