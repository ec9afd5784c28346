use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::auth::Principal;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbSession {
    pub id: String,
    pub username: String,
    pub created_at: i64,
    pub expires_at: i64,
}

impl DbSession {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now.timestamp()
    }
}

impl From<DbUser> for Principal {
    fn from(u: DbUser) -> Self {
        Principal {
            username: u.username,
        }
    }
}

impl From<DbSession> for Principal {
    fn from(s: DbSession) -> Self {
        Principal {
            username: s.username,
        }
    }
}
