// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password authentication routes.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::models::{User, UserData};
use crate::services::ProfileStatus;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    #[validate(range(min = 0.0, max = 150.0))]
    pub age: Option<f64>,
    #[validate(range(min = 0.0))]
    pub weight: Option<f64>,
    #[validate(range(min = 0.0))]
    pub height: Option<f64>,
    #[validate(length(max = 500))]
    pub goal: Option<String>,
}

impl RegisterRequest {
    fn profile_fields(&self) -> UserData {
        UserData {
            display_name: self
                .display_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            email: Some(self.email.trim().to_string()),
            age: self.age,
            weight: self.weight,
            height: self.height,
            goal: self.goal.clone(),
            profile_image: None,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Session issued on register or login.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthResponse {
    pub user: User,
    /// Bearer token for the `Authorization` header
    pub token: String,
    /// False when the account exists but its profile could not be saved
    pub profile_complete: bool,
}

/// Session cookie. `Secure` is set unless the frontend is served over
/// plain HTTP (local development).
fn session_cookie(value: String, frontend_url: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(frontend_url.starts_with("https://"))
        .same_site(SameSite::Lax)
        .build()
}

pub(crate) fn validate_body<T: Validate>(body: &T) -> Result<()> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Create an account, store its profile and start a session.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>)> {
    validate_body(&body)?;

    let registration = state
        .auth_gateway()
        .register(body.email.trim(), &body.password, body.profile_fields())
        .await?;

    let user = registration.user().clone();
    let token = create_jwt(&user.uid, &state.config.jwt_signing_key)?;
    let profile_complete = registration.profile == ProfileStatus::Complete;

    tracing::info!(uid = %user.uid, profile_complete, "User registered");

    Ok((
        StatusCode::CREATED,
        jar.add(session_cookie(token.clone(), &state.config.frontend_url)),
        Json(AuthResponse {
            user,
            token,
            profile_complete,
        }),
    ))
}

/// Sign in with email and password.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    validate_body(&body)?;

    let session = state
        .auth_gateway()
        .login(body.email.trim(), &body.password)
        .await?;

    let token = create_jwt(&session.user.uid, &state.config.jwt_signing_key)?;
    tracing::info!(uid = %session.user.uid, "User logged in");

    Ok((
        jar.add(session_cookie(token.clone(), &state.config.frontend_url)),
        Json(AuthResponse {
            user: session.user,
            token,
            profile_complete: true,
        }),
    ))
}

/// End the session by clearing the cookie. Bearer tokens are discarded by
/// the client.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (StatusCode, CookieJar) {
    let removal = session_cookie(String::new(), &state.config.frontend_url);
    (StatusCode::NO_CONTENT, jar.remove(removal))
}
