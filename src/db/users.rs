use crate::db::models::DbUser;
use crate::db::sqlite::SqlitePool;
use crate::error::PorticoError;
use chrono::Utc;

/// Result of inserting a new user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Created(i64),
    UsernameTaken,
}

/// Credential store: username -> password hash. No update or delete.
#[derive(Clone)]
pub struct UsersStorage {
    pool: SqlitePool,
}

impl UsersStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<DbUser>, PorticoError> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"SELECT id, username, password_hash, created_at
               FROM users WHERE username = ?"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Insert a user with an already-hashed credential.
    /// A UNIQUE violation is reported as `UsernameTaken`, not as an error.
    pub async fn insert(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<InsertOutcome, PorticoError> {
        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, created_at) VALUES (?, ?, ?)",
        )
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(InsertOutcome::Created(done.last_insert_rowid())),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Ok(InsertOutcome::UsernameTaken)
            }
            Err(e) => Err(e.into()),
        }
    }
}
