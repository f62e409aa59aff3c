// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage and exercise catalog client tests against in-process mocks.

use axum::{
    body::{Body, Bytes},
    extract::{Path, Query, State},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use gymplus_tracker::config::Config;
use gymplus_tracker::error::AppError;
use gymplus_tracker::services::{CatalogQuery, ExerciseCatalog, ProfileService, StorageGateway};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

mod common;

// ─── Storage mock ────────────────────────────────────────────

#[derive(Default)]
struct MockStorage {
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
    required_token: Option<String>,
}

impl MockStorage {
    fn authorized(&self, headers: &HeaderMap) -> bool {
        match &self.required_token {
            None => true,
            Some(token) => headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                == Some(format!("Bearer {}", token).as_str()),
        }
    }

    fn metadata(name: &str) -> Value {
        json!({"name": name, "bucket": "bucket", "downloadTokens": format!("tok-{}", name.len())})
    }
}

#[derive(Deserialize)]
struct UploadParams {
    name: String,
}

async fn upload(
    State(mock): State<Arc<MockStorage>>,
    Path(_bucket): Path<String>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !mock.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    mock.objects
        .lock()
        .unwrap()
        .insert(params.name.clone(), (body.to_vec(), content_type));
    Json(MockStorage::metadata(&params.name)).into_response()
}

async fn metadata(
    State(mock): State<Arc<MockStorage>>,
    Path((_bucket, object)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if !mock.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if mock.objects.lock().unwrap().contains_key(&object) {
        Json(MockStorage::metadata(&object)).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn remove(
    State(mock): State<Arc<MockStorage>>,
    Path((_bucket, object)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if !mock.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match mock.objects.lock().unwrap().remove(&object) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_storage(required_token: Option<&str>) -> (String, Arc<MockStorage>) {
    let mock = Arc::new(MockStorage {
        required_token: required_token.map(str::to_string),
        ..Default::default()
    });
    let router = Router::new()
        .route("/v0/b/{bucket}/o", axum::routing::post(upload))
        .route("/v0/b/{bucket}/o/{object}", get(metadata).delete(remove))
        .with_state(mock.clone());

    (
        format!("{}/v0", common::spawn_mock_server(router).await),
        mock,
    )
}

#[tokio::test]
async fn test_storage_upload_url_and_delete() {
    let (base, mock) = spawn_storage(None).await;
    let storage = StorageGateway::new(&base, "bucket", None);

    let url = storage
        .upload("profileImages/u1", vec![1, 2, 3], "image/png")
        .await
        .unwrap();
    assert_eq!(
        url,
        format!("{}/b/bucket/o/profileImages%2Fu1?alt=media&token=tok-16", base)
    );
    assert_eq!(
        mock.objects.lock().unwrap()["profileImages/u1"],
        (vec![1, 2, 3], "image/png".to_string())
    );

    assert_eq!(
        storage.download_url("profileImages/u1").await.unwrap(),
        Some(url)
    );

    storage.delete("profileImages/u1").await.unwrap();
    assert_eq!(storage.download_url("profileImages/u1").await.unwrap(), None);

    // Deleting again is not an error.
    storage.delete("profileImages/u1").await.unwrap();
}

#[tokio::test]
async fn test_storage_reupload_overwrites() {
    let (base, mock) = spawn_storage(None).await;
    let storage = StorageGateway::new(&base, "bucket", None);

    storage
        .upload("profileImages/u1", vec![1], "image/png")
        .await
        .unwrap();
    storage
        .upload("profileImages/u1", vec![2, 2], "image/jpeg")
        .await
        .unwrap();

    let objects = mock.objects.lock().unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects["profileImages/u1"].0, vec![2, 2]);
}

#[tokio::test]
async fn test_storage_sends_auth_token() {
    let (base, _mock) = spawn_storage(Some("secret")).await;

    let anonymous = StorageGateway::new(&base, "bucket", None);
    let result = anonymous
        .upload("profileImages/u1", vec![1], "image/png")
        .await;
    assert!(matches!(result, Err(AppError::Upstream(_))));

    let authorized = StorageGateway::new(&base, "bucket", Some("secret".to_string()));
    authorized
        .upload("profileImages/u1", vec![1], "image/png")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_profile_image_upload_then_profile_write() {
    let (base, mock) = spawn_storage(None).await;
    let profiles = ProfileService::new(
        common::test_db_offline(),
        StorageGateway::new(&base, "bucket", None),
    );

    // The object is stored; recording the URL fails on the offline database.
    let result = profiles
        .upload_profile_image("u1", vec![9, 9], "image/png")
        .await;
    assert!(matches!(result, Err(AppError::Write(_))));
    assert!(mock.objects.lock().unwrap().contains_key("profileImages/u1"));

    assert!(profiles.profile_image_url("u1").await.unwrap().is_some());
    assert!(profiles.profile_image_url("u2").await.unwrap().is_none());

    // Profile read is required even though the image lookup succeeds.
    assert!(matches!(
        profiles.profile_with_image("u1").await,
        Err(AppError::Read(_))
    ));
}

// ─── Catalog mock ────────────────────────────────────────────

fn catalog() -> Vec<Value> {
    vec![
        json!({"name": "Barbell Curl", "type": "strength", "muscle": "biceps",
               "equipment": "barbell", "difficulty": "beginner", "instructions": "Curl."}),
        json!({"name": "Hammer Curl", "type": "strength", "muscle": "biceps",
               "equipment": "dumbbell", "difficulty": "beginner", "instructions": "Curl."}),
        json!({"name": "Rowing", "type": "cardio", "muscle": "lats",
               "equipment": "machine", "difficulty": "intermediate", "instructions": "Row."}),
    ]
}

async fn exercises(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Response {
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("test_exercise_key") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid API Key."})),
        )
            .into_response();
    }

    let list: Vec<Value> = catalog()
        .into_iter()
        .filter(|e| params.get("muscle").map_or(true, |m| e["muscle"] == m.as_str()))
        .filter(|e| params.get("type").map_or(true, |t| e["type"] == t.as_str()))
        .collect();
    Json(list).into_response()
}

async fn spawn_catalog() -> String {
    let router = Router::new().route("/v1/exercises", get(exercises));
    format!("{}/v1/exercises", common::spawn_mock_server(router).await)
}

#[tokio::test]
async fn test_catalog_fetch_with_filters() {
    let catalog = ExerciseCatalog::new(spawn_catalog().await, "test_exercise_key");

    let all = catalog.fetch(&CatalogQuery::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    let biceps = catalog
        .fetch(&CatalogQuery {
            muscle: Some("biceps".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(biceps.len(), 2);
    assert_eq!(biceps[0].exercise_type, "strength");
}

#[tokio::test]
async fn test_catalog_search_filters_locally() {
    let catalog = ExerciseCatalog::new(spawn_catalog().await, "test_exercise_key");

    let hammer = catalog
        .search(&CatalogQuery::default(), "HAMMER")
        .await
        .unwrap();
    assert_eq!(hammer.len(), 1);
    assert_eq!(hammer[0].name, "Hammer Curl");

    let cardio = catalog
        .search(&CatalogQuery::default(), "cardio")
        .await
        .unwrap();
    assert_eq!(cardio.len(), 1);
}

#[tokio::test]
async fn test_catalog_rejects_bad_key() {
    let catalog = ExerciseCatalog::new(spawn_catalog().await, "wrong");
    let result = catalog.fetch(&CatalogQuery::default()).await;
    assert!(matches!(result, Err(AppError::Upstream(_))));
}

async fn get_exercises(config: Config, uri: &str) -> (StatusCode, Value) {
    let (app, state) = common::create_test_app_with(config);
    let token = common::create_test_jwt("user-1", &state.config.jwt_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_exercises_route_searches_catalog() {
    let config = Config {
        exercise_api_url: spawn_catalog().await,
        ..Config::test_default()
    };

    let (status, json) = get_exercises(config, "/api/exercises?muscle=biceps&search=barbell").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "Barbell Curl");
}

#[tokio::test]
async fn test_exercises_route_falls_back_to_empty_list() {
    let config = Config {
        exercise_api_url: spawn_catalog().await,
        exercise_api_key: "wrong".to_string(),
        ..Config::test_default()
    };

    let (status, json) = get_exercises(config, "/api/exercises?search=curl").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!([]));
}
