use serde::Deserialize;
use tracing::info;

use super::normalize_username;
use super::password::hash_password_blocking;
use crate::db::{InsertOutcome, UsersStorage};
use crate::error::PorticoError;

/// Body of `POST /register`. Absent fields read as empty and fail validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub username: String,
    pub password: String,
    #[serde(rename = "confirmPassword", alias = "confirm_password")]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Registered,
    MissingFields,
    PasswordMismatch,
    UsernameTaken,
}

impl Registration {
    /// Message shown to the user through a flash.
    pub fn message(self) -> &'static str {
        match self {
            Registration::Registered => "Registration successful! Please login.",
            Registration::MissingFields => "Username and password are required.",
            Registration::PasswordMismatch => "Passwords do not match.",
            Registration::UsernameTaken => "Username already taken.",
        }
    }
}

/// Validate the form and store a new user with a hashed password.
pub async fn register(
    users: &UsersStorage,
    form: RegistrationForm,
) -> Result<Registration, PorticoError> {
    let username = normalize_username(&form.username);
    if username.is_empty() || form.password.is_empty() {
        return Ok(Registration::MissingFields);
    }
    if form.password != form.confirm_password {
        return Ok(Registration::PasswordMismatch);
    }
    // Cheap pre-check; the UNIQUE constraint settles races.
    if users.find_by_username(username).await?.is_some() {
        return Ok(Registration::UsernameTaken);
    }

    let phc = hash_password_blocking(form.password).await?;
    match users.insert(username, &phc).await? {
        InsertOutcome::Created(id) => {
            info!(user_id = id, username = %username, "user registered");
            Ok(Registration::Registered)
        }
        InsertOutcome::UsernameTaken => Ok(Registration::UsernameTaken),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use crate::db::sqlite::test_support::temp_pool;

    fn form(username: &str, password: &str, confirm: &str) -> RegistrationForm {
        RegistrationForm {
            username: username.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[tokio::test]
    async fn registration_stores_a_hash_not_the_password() {
        let (pool, path) = temp_pool("register-ok").await;
        let users = UsersStorage::new(pool);

        let outcome = register(&users, form("alice", "pw1", "pw1")).await.unwrap();
        assert_eq!(outcome, Registration::Registered);

        let stored = users.find_by_username("alice").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "pw1");
        assert!(verify_password("pw1", &stored.password_hash).unwrap());
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn invalid_forms_are_rejected_without_writing() {
        let (pool, path) = temp_pool("register-invalid").await;
        let users = UsersStorage::new(pool);

        assert_eq!(
            register(&users, form("alice", "pw1", "pw2")).await.unwrap(),
            Registration::PasswordMismatch
        );
        assert_eq!(
            register(&users, form("   ", "pw1", "pw1")).await.unwrap(),
            Registration::MissingFields
        );
        assert_eq!(
            register(&users, form("alice", "", "")).await.unwrap(),
            Registration::MissingFields
        );
        assert!(users.find_by_username("alice").await.unwrap().is_none());
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let (pool, path) = temp_pool("register-dup").await;
        let users = UsersStorage::new(pool);

        register(&users, form("alice", "pw1", "pw1")).await.unwrap();
        assert_eq!(
            register(&users, form("alice", "other", "other")).await.unwrap(),
            Registration::UsernameTaken
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn form_accepts_both_confirmation_field_names() {
        let camel: RegistrationForm =
            serde_json::from_str(r#"{"username":"a","password":"b","confirmPassword":"b"}"#)
                .unwrap();
        let snake: RegistrationForm =
            serde_json::from_str(r#"{"username":"a","password":"b","confirm_password":"b"}"#)
                .unwrap();
        assert_eq!(camel.confirm_password, "b");
        assert_eq!(snake.confirm_password, "b");
    }

    #[tokio::test]
    async fn absent_confirmation_counts_as_mismatch() {
        let (pool, path) = temp_pool("register-absent").await;
        let users = UsersStorage::new(pool);

        let partial: RegistrationForm =
            serde_json::from_str(r#"{"username":"bob","password":"x"}"#).unwrap();
        assert_eq!(
            register(&users, partial).await.unwrap(),
            Registration::PasswordMismatch
        );
        let empty: RegistrationForm = serde_json::from_str("{}").unwrap();
        assert_eq!(
            register(&users, empty).await.unwrap(),
            Registration::MissingFields
        );
        let _ = std::fs::remove_file(&path);
    }
}
