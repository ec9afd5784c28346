pub mod auth;

pub use auth::{CurrentUser, LOGIN_PATH, require_session};
