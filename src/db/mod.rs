//! Database module: models, schema and storage handles.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite)
//! - `sqlite.rs`: pool construction and schema bootstrap
//! - `users.rs` / `sessions.rs`: the credential and session stores

pub mod models;
pub mod schema;
pub mod sessions;
pub mod sqlite;
pub mod users;

pub use models::{DbSession, DbUser};
pub use schema::SQLITE_INIT;
pub use sessions::SessionsStorage;
pub use sqlite::{SqlitePool, connect};
pub use users::{InsertOutcome, UsersStorage};
