use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PorticoError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Random source unavailable: {0}")]
    Entropy(String),

    #[error("Background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl From<figment::Error> for PorticoError {
    fn from(e: figment::Error) -> Self {
        PorticoError::ConfigError(Box::new(e))
    }
}

impl From<argon2::password_hash::Error> for PorticoError {
    fn from(e: argon2::password_hash::Error) -> Self {
        PorticoError::PasswordHash(e.to_string())
    }
}

impl IntoResponse for PorticoError {
    fn into_response(self) -> axum::response::Response {
        // Details stay in the logs; the client only sees a generic page.
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let body = crate::views::error_page(status);
        (status, Html(body)).into_response()
    }
}
