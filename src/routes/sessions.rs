// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout session routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::stats::session_calendar;
use crate::models::{ExerciseSession, ExerciseSets, MeasureText, Serie, Weekday};
use crate::routes::auth::validate_body;
use crate::time_utils::{format_utc_rfc3339, now_rfc3339};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/sessions", get(list_sessions).post(create_session))
        .route("/api/sessions/latest", get(get_latest_session))
        .route("/api/sessions/{id}", get(get_session))
        .route("/api/calendar", get(get_calendar))
}

/// Session as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub id: String,
    pub routine_id: String,
    pub routine_name: Option<String>,
    pub name: String,
    pub date: String,
    pub exercises: BTreeMap<String, Vec<Serie>>,
    pub routine_days: Option<Vec<Weekday>>,
}

impl From<ExerciseSession> for SessionResponse {
    fn from(session: ExerciseSession) -> Self {
        Self {
            id: session.id.unwrap_or_default(),
            routine_id: session.routine_id,
            routine_name: session.routine_name,
            name: session.name,
            date: session.date,
            exercises: session.exercises,
            routine_days: session.routine_days,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[validate(length(min = 1))]
    pub routine_id: String,
    /// Defaults to the routine name
    #[validate(length(max = 100))]
    pub name: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`; defaults to now
    pub date: Option<String>,
    #[serde(default)]
    pub exercises: ExerciseSets,
}

/// Normalize a client-supplied session date to the stored format.
fn normalize_date(date: Option<&str>) -> Result<String> {
    let Some(raw) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(now_rfc3339());
    };

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(format_utc_rfc3339(dt.with_timezone(&chrono::Utc)));
    }
    if let Ok(day) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(format_utc_rfc3339(day.and_time(chrono::NaiveTime::MIN).and_utc()));
    }

    Err(AppError::BadRequest(format!(
        "Invalid 'date': {:?} is neither RFC 3339 nor YYYY-MM-DD",
        raw
    )))
}

/// Re-validate every reps/weight value and drop exercises without sets.
fn validate_sets(exercises: ExerciseSets) -> Result<ExerciseSets> {
    let mut validated = ExerciseSets::new();

    for (name, series) in exercises {
        let name = name.trim().to_string();
        if name.is_empty() || series.is_empty() {
            continue;
        }

        let checked = series
            .into_iter()
            .map(|serie| {
                let check = |field: &str, value: &MeasureText| {
                    MeasureText::parse(value.as_str()).map_err(|e| {
                        AppError::BadRequest(format!("{} {} of {}: {}", field, value.as_str(), name, e))
                    })
                };
                Ok(Serie {
                    reps: check("reps", &serie.reps)?,
                    weight: check("weight", &serie.weight)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        validated.entry(name).or_default().extend(checked);
    }

    Ok(validated)
}

/// Record a session against one of the caller's routines.
///
/// The routine name and schedule are copied onto the session.
async fn create_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    validate_body(&body)?;
    let date = normalize_date(body.date.as_deref())?;
    let exercises = validate_sets(body.exercises)?;

    let routine = state
        .db
        .get_routine_for_user(&body.routine_id, &user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Routine {} not found", body.routine_id)))?;

    let name = body
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| routine.name.clone());

    let mut session = ExerciseSession {
        id: None,
        user_id: user.user_id.clone(),
        routine_id: body.routine_id,
        routine_name: Some(routine.name),
        name,
        date,
        exercises,
        routine_days: Some(routine.days),
    };

    let id = state.db.create_session(&session).await?;
    session.id = Some(id);

    Ok((StatusCode::CREATED, Json(session.into())))
}

/// All of the caller's sessions, most recent first.
async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<SessionResponse>>> {
    let sessions = state.db.list_sessions_for_user(&user.user_id).await?;
    Ok(Json(sessions.into_iter().map(SessionResponse::from).collect()))
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LatestSessionResponse {
    pub session: Option<SessionResponse>,
}

async fn get_latest_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LatestSessionResponse>> {
    let session = state.db.get_most_recent_session(&user.user_id).await?;
    Ok(Json(LatestSessionResponse {
        session: session.map(SessionResponse::from),
    }))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>> {
    let mut session = state
        .db
        .get_session(&id)
        .await?
        .filter(|s| s.user_id == user.user_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?;

    session.id.get_or_insert(id);
    Ok(Json(session.into()))
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CalendarResponse {
    /// Distinct "YYYY-MM-DD" dates with at least one session, ascending
    pub dates: Vec<String>,
}

async fn get_calendar(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<CalendarResponse>> {
    let sessions = state.db.list_sessions_for_user(&user.user_id).await?;
    Ok(Json(CalendarResponse {
        dates: session_calendar(&sessions).into_iter().collect(),
    }))
}
