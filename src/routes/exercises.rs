// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise catalog search.

use crate::middleware::auth::AuthUser;
use crate::models::Exercise;
use crate::services::CatalogQuery;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/exercises", get(search_exercises))
}

#[derive(Debug, Default, Deserialize)]
struct ExercisesQuery {
    /// Free text matched against name, muscle and type
    #[serde(default)]
    search: String,
    name: Option<String>,
    muscle: Option<String>,
    #[serde(rename = "type")]
    exercise_type: Option<String>,
    difficulty: Option<String>,
}

/// Search the catalog. A catalog failure yields an empty list.
async fn search_exercises(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ExercisesQuery>,
) -> Json<Vec<Exercise>> {
    let query = CatalogQuery {
        name: params.name,
        muscle: params.muscle,
        exercise_type: params.exercise_type,
        difficulty: params.difficulty,
    };

    match state.catalog.search(&query, &params.search).await {
        Ok(exercises) => Json(exercises),
        Err(e) => {
            tracing::warn!(user_id = %user.user_id, error = %e, "Exercise catalog unavailable");
            Json(Vec::new())
        }
    }
}
