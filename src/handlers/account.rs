use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::{error, info};

use crate::auth::{self, AuthOutcome, Registration, RegistrationForm};
use crate::middleware::LOGIN_PATH;
use crate::router::AppState;
use crate::session::flash::{self, Flash};
use crate::views;

const LOGIN_REJECTED: &str = "Invalid username or password.";
const TRY_AGAIN: &str = "Something went wrong. Please try again.";
const HOME_PATH: &str = "/";
const REGISTER_PATH: &str = "/register";

/// Absent fields read as empty and are rejected like bad credentials.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// GET /login; a visitor who is already signed in goes straight to `/`.
pub async fn login_form(State(state): State<AppState>, jar: PrivateCookieJar) -> Response {
    match state.sessions.is_authenticated(&jar).await {
        Ok(true) => return Redirect::to(HOME_PATH).into_response(),
        Ok(false) => {}
        Err(e) => error!(error = %e, "session lookup failed on login page"),
    }
    let (jar, pending) = flash::take(jar);
    (jar, Html(views::login_page(pending.as_ref()))).into_response()
}

/// POST /login -> `/` with a fresh session, or back to `/login` with a flash.
pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    if auth::normalize_username(&form.username).is_empty() || form.password.is_empty() {
        info!("login rejected: missing credentials");
        return back_to(LOGIN_PATH, jar, Flash::error(LOGIN_REJECTED));
    }

    let outcome = match auth::authenticate(&state.users, &form.username, &form.password).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "login failed on store error");
            return back_to(LOGIN_PATH, jar, Flash::error(TRY_AGAIN));
        }
    };

    let principal = match outcome {
        AuthOutcome::Authenticated(principal) => principal,
        AuthOutcome::Rejected(reason) => {
            info!(reason = ?reason, "login rejected");
            return back_to(LOGIN_PATH, jar, Flash::error(LOGIN_REJECTED));
        }
    };

    match state.sessions.start(jar.clone(), &principal).await {
        Ok(jar) => (jar, Redirect::to(HOME_PATH)).into_response(),
        Err(e) => {
            error!(error = %e, "failed to start session");
            back_to(LOGIN_PATH, jar, Flash::error(TRY_AGAIN))
        }
    }
}

/// GET /register
pub async fn register_form(jar: PrivateCookieJar) -> impl IntoResponse {
    let (jar, pending) = flash::take(jar);
    (jar, Html(views::register_page(pending.as_ref())))
}

/// POST /register -> `/login` on success, back to `/register` otherwise.
pub async fn register(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegistrationForm>,
) -> Response {
    match auth::register(&state.users, form).await {
        Ok(Registration::Registered) => back_to(
            LOGIN_PATH,
            jar,
            Flash::success(Registration::Registered.message()),
        ),
        Ok(rejected) => back_to(REGISTER_PATH, jar, Flash::error(rejected.message())),
        Err(e) => {
            error!(error = %e, "registration failed");
            back_to(REGISTER_PATH, jar, Flash::error(TRY_AGAIN))
        }
    }
}

/// GET /logout
pub async fn logout(State(state): State<AppState>, jar: PrivateCookieJar) -> Response {
    match state.sessions.end(jar.clone()).await {
        Ok(jar) => (jar, Redirect::to(LOGIN_PATH)).into_response(),
        Err(e) => {
            // The row may survive until the sweeper runs; the client cookie is still dropped.
            error!(error = %e, "failed to revoke session on logout");
            (
                crate::session::clear_session_cookie(jar),
                Redirect::to(LOGIN_PATH),
            )
                .into_response()
        }
    }
}

fn back_to(path: &str, jar: PrivateCookieJar, message: Flash) -> Response {
    (flash::push(jar, message), Redirect::to(path)).into_response()
}
