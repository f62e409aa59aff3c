// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile routes: extended attributes and profile image.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::UserData;
use crate::routes::auth::validate_body;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Largest accepted profile image upload.
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profile", get(get_profile).put(update_profile))
        .route(
            "/api/profile/image",
            get(get_profile_image)
                .put(upload_profile_image)
                .delete(delete_profile_image)
                .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES)),
        )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileResponse {
    pub profile: UserData,
    /// Current image URL from storage, falling back to the stored field
    pub profile_image: Option<String>,
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let (profile, image) = state.profiles.profile_with_image(&user.user_id).await?;
    let profile = profile.unwrap_or_default();
    let profile_image = image.or_else(|| profile.profile_image.clone());

    Ok(Json(ProfileResponse {
        profile,
        profile_image,
    }))
}

/// Editable profile fields. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
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

impl From<UpdateProfileRequest> for UserData {
    fn from(body: UpdateProfileRequest) -> Self {
        UserData {
            display_name: body
                .display_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            age: body.age,
            weight: body.weight,
            height: body.height,
            goal: body.goal,
            ..Default::default()
        }
    }
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UserData>> {
    validate_body(&body)?;
    let patch = UserData::from(body);

    let mut profile = state
        .db
        .get_user_profile(&user.user_id)
        .await?
        .unwrap_or_default();
    if patch.is_empty() {
        return Ok(Json(profile));
    }

    state.db.merge_user_profile(&user.user_id, &patch).await?;
    profile.merge(&patch);
    Ok(Json(profile))
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ImageResponse {
    pub url: Option<String>,
}

async fn get_profile_image(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ImageResponse>> {
    let url = state.profiles.profile_image_url(&user.user_id).await?;
    Ok(Json(ImageResponse { url }))
}

/// Content type of an image upload, or a bad request.
fn image_content_type(headers: &HeaderMap) -> Result<String> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if content_type.starts_with("image/") {
        Ok(content_type)
    } else {
        Err(AppError::BadRequest(
            "Content-Type must be an image type".to_string(),
        ))
    }
}

/// Upload the raw request body as the caller's profile image.
async fn upload_profile_image(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ImageResponse>> {
    let content_type = image_content_type(&headers)?;
    if body.is_empty() {
        return Err(AppError::BadRequest("Image body is empty".to_string()));
    }

    let url = state
        .profiles
        .upload_profile_image(&user.user_id, body.to_vec(), &content_type)
        .await?;

    Ok(Json(ImageResponse { url: Some(url) }))
}

async fn delete_profile_image(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode> {
    state.profiles.delete_profile_image(&user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
