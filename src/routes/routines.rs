// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Routine routes: CRUD, per-routine sessions and progress.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::routine::normalize_days;
use crate::models::stats::routine_progress;
use crate::models::{ExerciseSeries, ProgressPoint, Routine, Weekday};
use crate::routes::auth::validate_body;
use crate::routes::sessions::SessionResponse;
use crate::time_utils::today_weekday;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/routines", get(list_routines).post(create_routine))
        .route("/api/routines/{id}", get(get_routine).delete(delete_routine))
        .route("/api/routines/{id}/sessions", get(get_routine_sessions))
        .route("/api/routines/{id}/progress", get(get_routine_progress))
}

/// Routine as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RoutineResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub exercises: Vec<String>,
    pub days: Vec<Weekday>,
}

impl From<Routine> for RoutineResponse {
    fn from(routine: Routine) -> Self {
        Self {
            id: routine.id.unwrap_or_default(),
            name: routine.name,
            description: routine.description,
            exercises: routine.exercises,
            days: routine.days,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoutineRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub exercises: Vec<String>,
    #[validate(length(min = 1, message = "Select at least one day"))]
    pub days: Vec<Weekday>,
}

impl CreateRoutineRequest {
    /// Normalized routine owned by `user_id`.
    fn into_routine(self, user_id: &str) -> Result<Routine> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("Routine name is required".to_string()));
        }

        let exercises = self
            .exercises
            .iter()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Routine {
            id: None,
            name,
            description: self.description.trim().to_string(),
            exercises,
            days: normalize_days(&self.days),
            user_id: user_id.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RoutinesQuery {
    /// Weekday name (English or Spanish) or "today"
    day: Option<String>,
}

fn parse_day_filter(day: Option<&str>) -> Result<Option<Weekday>> {
    match day.map(str::trim).filter(|d| !d.is_empty()) {
        None => Ok(None),
        Some(d) if d.eq_ignore_ascii_case("today") => Ok(Some(today_weekday())),
        Some(d) => d
            .parse()
            .map(Some)
            .map_err(|e: crate::models::routine::UnknownWeekday| {
                AppError::BadRequest(e.to_string())
            }),
    }
}

/// List the caller's routines, optionally only those scheduled on a day.
async fn list_routines(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<RoutinesQuery>,
) -> Result<Json<Vec<RoutineResponse>>> {
    let day = parse_day_filter(params.day.as_deref())?;

    let routines = state.db.list_routines_for_user(&user.user_id).await?;

    Ok(Json(
        routines
            .into_iter()
            .filter(|r| day.map_or(true, |d| r.is_scheduled_on(d)))
            .map(RoutineResponse::from)
            .collect(),
    ))
}

async fn create_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateRoutineRequest>,
) -> Result<(StatusCode, Json<RoutineResponse>)> {
    validate_body(&body)?;
    let mut routine = body.into_routine(&user.user_id)?;

    let id = state.db.create_routine(&routine).await?;
    routine.id = Some(id);

    Ok((StatusCode::CREATED, Json(routine.into())))
}

/// Fetch a routine the caller owns, or fail with not found.
async fn owned_routine(state: &AppState, routine_id: &str, user_id: &str) -> Result<Routine> {
    state
        .db
        .get_routine_for_user(routine_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Routine {} not found", routine_id)))
}

async fn get_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<RoutineResponse>> {
    let mut routine = owned_routine(&state, &id, &user.user_id).await?;
    routine.id.get_or_insert(id);
    Ok(Json(routine.into()))
}

#[derive(Debug, Deserialize)]
struct DeleteParams {
    #[serde(default)]
    confirm: bool,
}

/// Permanently delete a routine. Requires `?confirm=true`.
///
/// Missing and foreign routines also answer 204; only the caller's own
/// routines are ever deleted.
async fn delete_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode> {
    if !params.confirm {
        return Err(AppError::BadRequest(
            "Deleting a routine is permanent; repeat with confirm=true".to_string(),
        ));
    }

    match state.db.get_routine_for_user(&id, &user.user_id).await? {
        Some(_) => state.db.delete_routine(&id).await?,
        None => tracing::debug!(routine_id = %id, user_id = %user.user_id, "Nothing to delete"),
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Sessions recorded against one of the caller's routines, oldest first.
async fn get_routine_sessions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Vec<SessionResponse>>> {
    owned_routine(&state, &id, &user.user_id).await?;

    let mut sessions = state.db.list_sessions_for_routine(&id).await?;
    sessions.retain(|s| s.user_id == user.user_id);

    Ok(Json(sessions.into_iter().map(SessionResponse::from).collect()))
}

/// Progress series of one exercise.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SeriesResponse {
    pub exercise: String,
    pub has_data: bool,
    /// "DD-MM" axis labels, parallel to `points`
    pub labels: Vec<String>,
    pub points: Vec<ProgressPoint>,
}

impl From<ExerciseSeries> for SeriesResponse {
    fn from(series: ExerciseSeries) -> Self {
        Self {
            has_data: series.has_data(),
            labels: series.labels(),
            exercise: series.exercise,
            points: series.points,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgressResponse {
    pub routine_id: String,
    pub session_count: usize,
    /// One entry per distinct exercise, in routine order. Empty when the
    /// routine has no sessions.
    pub series: Vec<SeriesResponse>,
}

/// Weight-over-time series for every exercise of a routine.
async fn get_routine_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ProgressResponse>> {
    let routine = owned_routine(&state, &id, &user.user_id).await?;

    let mut sessions = state.db.list_sessions_for_routine(&id).await?;
    sessions.retain(|s| s.user_id == user.user_id);

    let series = routine_progress(&sessions, &routine.exercises);
    tracing::debug!(
        routine_id = %id,
        sessions = sessions.len(),
        series = series.len(),
        "Routine progress computed"
    );

    Ok(Json(ProgressResponse {
        routine_id: id,
        session_count: sessions.len(),
        series: series.into_iter().map(SeriesResponse::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_filter_parsing() {
        assert_eq!(parse_day_filter(None).unwrap(), None);
        assert_eq!(parse_day_filter(Some(" ")).unwrap(), None);
        assert_eq!(
            parse_day_filter(Some("Lunes")).unwrap(),
            Some(Weekday::Monday)
        );
        assert_eq!(
            parse_day_filter(Some("TODAY")).unwrap(),
            Some(today_weekday())
        );
        assert!(parse_day_filter(Some("someday")).is_err());
    }

    #[test]
    fn test_create_request_normalizes() {
        let request = CreateRoutineRequest {
            name: "  Pierna ".to_string(),
            description: " heavy ".to_string(),
            exercises: vec!["Squat".to_string(), " ".to_string(), " Lunge".to_string()],
            days: vec![Weekday::Friday, Weekday::Monday, Weekday::Friday],
        };

        let routine = request.into_routine("u1").unwrap();
        assert_eq!(routine.name, "Pierna");
        assert_eq!(routine.description, "heavy");
        assert_eq!(routine.exercises, vec!["Squat", "Lunge"]);
        assert_eq!(routine.days, vec![Weekday::Monday, Weekday::Friday]);
        assert_eq!(routine.user_id, "u1");
    }

    #[test]
    fn test_blank_name_rejected() {
        let request = CreateRoutineRequest {
            name: "   ".to_string(),
            description: String::new(),
            exercises: vec![],
            days: vec![Weekday::Monday],
        };
        assert!(request.into_routine("u1").is_err());
    }
}
