use crate::db::models::DbSession;
use crate::db::sqlite::SqlitePool;
use crate::error::PorticoError;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};

const SESSION_ID_BYTES: usize = 32;

/// Session store: opaque id -> username, with an absolute expiry.
#[derive(Clone)]
pub struct SessionsStorage {
    pool: SqlitePool,
}

impl SessionsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a session for `username` that expires `ttl` after `now`.
    pub async fn create(
        &self,
        username: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<DbSession, PorticoError> {
        let session = DbSession {
            id: new_session_id()?,
            username: username.to_string(),
            created_at: now.timestamp(),
            expires_at: (now + ttl).timestamp(),
        };
        sqlx::query("INSERT INTO sessions (id, username, created_at, expires_at) VALUES (?, ?, ?, ?)")
            .bind(&session.id)
            .bind(&session.username)
            .bind(session.created_at)
            .bind(session.expires_at)
            .execute(&self.pool)
            .await?;
        Ok(session)
    }

    /// Look up a session that is still live at `now` and whose user still exists.
    /// An expired row is deleted on the way out.
    pub async fn find_live(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<DbSession>, PorticoError> {
        let row = sqlx::query_as::<_, DbSession>(
            r#"SELECT s.id, s.username, s.created_at, s.expires_at
               FROM sessions s JOIN users u ON u.username = s.username
               WHERE s.id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(session) if session.is_live(now) => Ok(Some(session)),
            Some(session) => {
                self.delete(&session.id).await?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> Result<bool, PorticoError> {
        let done = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    /// Delete every session expired at `now`. Returns the number removed.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, PorticoError> {
        let done = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now.timestamp())
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected())
    }
}

fn new_session_id() -> Result<String, PorticoError> {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| PorticoError::Entropy(e.to_string()))?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::test_support::temp_pool;
    use crate::db::users::UsersStorage;

    async fn setup(tag: &str) -> (SessionsStorage, std::path::PathBuf) {
        let (pool, path) = temp_pool(tag).await;
        UsersStorage::new(pool.clone())
            .insert("alice", "hash")
            .await
            .unwrap();
        (SessionsStorage::new(pool), path)
    }

    #[tokio::test]
    async fn session_is_live_until_ttl_elapses() {
        let (sessions, path) = setup("sessions-ttl").await;
        let issued = Utc::now();
        let s = sessions
            .create("alice", Duration::hours(1), issued)
            .await
            .unwrap();
        assert_eq!(s.expires_at - s.created_at, 3600);

        let live = sessions
            .find_live(&s.id, issued + Duration::minutes(59))
            .await
            .unwrap();
        assert_eq!(live.map(|l| l.username), Some("alice".to_string()));

        let expired = sessions
            .find_live(&s.id, issued + Duration::minutes(61))
            .await
            .unwrap();
        assert!(expired.is_none());

        // expired lookup removed the row
        assert!(!sessions.delete(&s.id).await.unwrap());
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn deleted_session_no_longer_resolves() {
        let (sessions, path) = setup("sessions-delete").await;
        let now = Utc::now();
        let s = sessions.create("alice", Duration::hours(1), now).await.unwrap();

        assert!(sessions.delete(&s.id).await.unwrap());
        assert!(sessions.find_live(&s.id, now).await.unwrap().is_none());
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn purge_removes_only_expired_sessions() {
        let (sessions, path) = setup("sessions-purge").await;
        let now = Utc::now();
        let old = sessions
            .create("alice", Duration::hours(1), now - Duration::hours(2))
            .await
            .unwrap();
        let fresh = sessions.create("alice", Duration::hours(1), now).await.unwrap();

        assert_eq!(sessions.purge_expired(now).await.unwrap(), 1);
        assert!(sessions.find_live(&old.id, now).await.unwrap().is_none());
        assert!(sessions.find_live(&fresh.id, now).await.unwrap().is_some());
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn session_ids_are_unique_and_opaque() {
        let (sessions, path) = setup("sessions-ids").await;
        let now = Utc::now();
        let a = sessions.create("alice", Duration::hours(1), now).await.unwrap();
        let b = sessions.create("alice", Duration::hours(1), now).await.unwrap();
        assert_ne!(a.id, b.id);
        assert!(!a.id.contains("alice"));
        assert_eq!(a.id.len(), 43);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn unknown_session_id_resolves_to_nothing() {
        let (sessions, path) = setup("sessions-unknown").await;
        assert!(sessions.find_live("nope", Utc::now()).await.unwrap().is_none());
        let _ = std::fs::remove_file(&path);
    }
}
