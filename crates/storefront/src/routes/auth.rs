//! Authentication route handlers.
//!
//! Password login and signup against the in-memory credential registry.
//! The session carries only the identity; the cart lives under its own key.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::state::AppState;

/// Login and signup body.
///
/// Missing fields deserialize as empty strings so they fail validation with
/// the usual messages instead of a body-shape rejection.
#[derive(Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Authenticate the session as `user`.
///
/// The session id is cycled first so a pre-login id cannot be fixated.
async fn start_session(session: &Session, user: User) -> Result<CurrentUser> {
    session.cycle_id().await?;

    let current = CurrentUser::new(user.email);
    set_current_user(session, &current).await?;
    set_sentry_user(current.email.as_str());

    Ok(current)
}

/// `POST /api/auth/login`
///
/// # Errors
///
/// 401 "Invalid credentials" for a malformed email, an unknown email, or a
/// wrong password.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<Credentials>,
) -> Result<Json<Value>> {
    let user = state
        .auth()
        .login_with_password(&form.email, &form.password)
        .inspect_err(|e| tracing::warn!(error = %e, "login failed"))?;

    let current = start_session(&session, user).await?;
    add_breadcrumb("auth", "Logged in", None);
    tracing::info!(user = %current.email, "user logged in");

    Ok(Json(json!({ "success": true, "user": current.email })))
}

/// `POST /api/auth/signup`
///
/// # Errors
///
/// 400 for an invalid email, an already registered email, or a short
/// password.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<Credentials>,
) -> Result<(StatusCode, Json<Value>)> {
    let user = state
        .auth()
        .register_with_password(&form.email, &form.password)?;

    let current = start_session(&session, user).await?;
    add_breadcrumb("auth", "Signed up", None);
    tracing::info!(user = %current.email, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "user": current.email })),
    ))
}

/// `POST /api/auth/logout`
///
/// Drops the identity only; the cart survives.
///
/// # Errors
///
/// 500 if the session store fails.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<Value>> {
    clear_current_user(&session).await?;
    clear_sentry_user();

    Ok(Json(json!({ "success": true })))
}

/// `GET /api/auth/user`
pub async fn current_user(OptionalAuth(user): OptionalAuth) -> Json<Value> {
    Json(json!({ "user": user.map(|u| u.email) }))
}
