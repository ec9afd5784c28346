use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::error;

use crate::auth::Principal;
use crate::router::AppState;
use crate::session::clear_session_cookie;

pub const LOGIN_PATH: &str = "/login";

/// Access check for every protected route.
/// - live session: the `Principal` is stored in request extensions
/// - anything else: redirect to `/login`, dropping a stale session cookie
/// - store failure: generic error page
pub async fn require_session(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match state.sessions.principal(&jar).await {
        Ok(Some(principal)) => {
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Ok(None) => (clear_session_cookie(jar), Redirect::to(LOGIN_PATH)).into_response(),
        Err(e) => {
            error!(error = %e, path = %req.uri().path(), "session lookup failed");
            e.into_response()
        }
    }
}

/// The principal placed by [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| Redirect::to(LOGIN_PATH).into_response())
    }
}
