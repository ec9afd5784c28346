use axum::{Router, extract::FromRef, middleware, routing::get};
use axum_extra::extract::cookie::Key;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::{SessionsStorage, SqlitePool, UsersStorage};
use crate::error::PorticoError;
use crate::handlers::{account, pages};
use crate::middleware::require_session;
use crate::session::SessionManager;

/// Shared handles for every handler; built once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub users: UsersStorage,
    pub sessions: SessionManager,
    cookie_key: Key,
}

impl AppState {
    pub fn new(pool: SqlitePool, cfg: &Config) -> Result<Self, PorticoError> {
        let cookie_key = cfg.cookie_key()?;
        Ok(Self {
            users: UsersStorage::new(pool.clone()),
            sessions: SessionManager::new(
                SessionsStorage::new(pool),
                cfg.session_ttl(),
                cfg.insecure_cookie,
            ),
            cookie_key,
        })
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

pub fn portico_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/gallery", get(pages::gallery))
        .route("/contact", get(pages::contact))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route(
            "/login",
            get(account::login_form).post(account::login),
        )
        .route(
            "/register",
            get(account::register_form).post(account::register),
        )
        .route("/logout", get(account::logout))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
