//! SQL DDL for the user and session tables.

/// SQLite schema with:
/// - `users.username` UNIQUE, so concurrent registrations cannot both succeed
/// - `users.password_hash` holding an Argon2id PHC string
/// - `sessions.id` an opaque random token, `expires_at` unix seconds
/// - sessions removed with their user via `ON DELETE CASCADE`
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY NOT NULL,
    username TEXT NOT NULL REFERENCES users(username) ON DELETE CASCADE,
    created_at INTEGER NOT NULL,
    expires_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);
"#;
