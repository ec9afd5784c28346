//! Credential verification and account registration.

pub mod password;
pub mod registration;
pub mod strategy;

pub use registration::{Registration, RegistrationForm, register};
pub use strategy::{AuthFailure, AuthOutcome, authenticate};

/// Canonical form of a submitted username, shared by registration and login.
pub fn normalize_username(raw: &str) -> &str {
    raw.trim()
}

/// The authenticated identity attached to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
}
