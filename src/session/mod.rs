//! Cookie-backed sessions. The cookie carries only the session id; the
//! username it maps to lives in the `sessions` table.

pub mod flash;

use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use chrono::{Duration, Utc};
use tracing::{debug, info};

use crate::auth::Principal;
use crate::db::SessionsStorage;
use crate::error::PorticoError;

pub const SESSION_COOKIE: &str = "sid";

#[derive(Clone)]
pub struct SessionManager {
    storage: SessionsStorage,
    ttl: Duration,
    insecure_cookie: bool,
}

impl SessionManager {
    pub fn new(storage: SessionsStorage, ttl: Duration, insecure_cookie: bool) -> Self {
        Self {
            storage,
            ttl,
            insecure_cookie,
        }
    }

    pub fn storage(&self) -> &SessionsStorage {
        &self.storage
    }

    /// Start a session for `principal`. Any session named by the incoming
    /// cookie is revoked first so an old id is never reused after login.
    pub async fn start(
        &self,
        jar: PrivateCookieJar,
        principal: &Principal,
    ) -> Result<PrivateCookieJar, PorticoError> {
        if let Some(previous) = jar.get(SESSION_COOKIE) {
            self.storage.delete(previous.value()).await?;
        }
        let session = self
            .storage
            .create(&principal.username, self.ttl, Utc::now())
            .await?;
        info!(username = %principal.username, "session started");
        Ok(jar.add(self.session_cookie(session.id)))
    }

    /// Resolve the request's cookie to a principal, if it names a live session.
    pub async fn principal(
        &self,
        jar: &PrivateCookieJar,
    ) -> Result<Option<Principal>, PorticoError> {
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(None);
        };
        let session = self.storage.find_live(cookie.value(), Utc::now()).await?;
        if session.is_none() {
            debug!("session cookie does not resolve to a live session");
        }
        Ok(session.map(Principal::from))
    }

    pub async fn is_authenticated(&self, jar: &PrivateCookieJar) -> Result<bool, PorticoError> {
        Ok(self.principal(jar).await?.is_some())
    }

    /// Revoke the current session (if any) and clear the cookie.
    pub async fn end(&self, jar: PrivateCookieJar) -> Result<PrivateCookieJar, PorticoError> {
        if let Some(cookie) = jar.get(SESSION_COOKIE)
            && self.storage.delete(cookie.value()).await?
        {
            info!("session ended");
        }
        Ok(clear_session_cookie(jar))
    }

    fn session_cookie(&self, id: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, id))
            .path("/")
            .http_only(true)
            .secure(!self.insecure_cookie)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(self.ttl.num_seconds()))
            .build()
    }
}

/// Remove the session cookie if the client sent one.
pub fn clear_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    if jar.get(SESSION_COOKIE).is_none() {
        return jar;
    }
    jar.remove(Cookie::build(SESSION_COOKIE).path("/").build())
}
