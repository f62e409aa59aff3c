// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request validation tests.
//!
//! All of these are rejected before any backend is contacted, so they run
//! against the offline app.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;
use common::{create_test_app, create_test_jwt};

async fn send(method: &str, uri: &str, body: Option<Value>) -> Response {
    let (app, state) = create_test_app();
    let token = create_test_jwt("user-1", &state.config.jwt_signing_key);

    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_routine_requires_name_and_days() {
    let blank_name = send(
        "POST",
        "/api/routines",
        Some(json!({"name": "   ", "exercises": ["Squat"], "days": ["Monday"]})),
    )
    .await;
    assert_eq!(blank_name.status(), StatusCode::BAD_REQUEST);

    let no_days = send(
        "POST",
        "/api/routines",
        Some(json!({"name": "Pierna", "exercises": ["Squat"], "days": []})),
    )
    .await;
    assert_eq!(no_days.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_routine_rejects_unknown_weekday() {
    let response = send(
        "POST",
        "/api/routines",
        Some(json!({"name": "Pierna", "days": ["Funday"]})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_routine_reaches_database() {
    // Legacy Spanish labels are accepted; offline the write then fails.
    let response = send(
        "POST",
        "/api/routines",
        Some(json!({"name": "Pierna", "exercises": ["Squat"], "days": ["Lunes", "Viernes"]})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = json_body(response).await;
    assert_eq!(json["error"], "write_error");
    assert!(json.get("details").is_none(), "backend details must not leak");
}

#[tokio::test]
async fn test_delete_routine_requires_confirmation() {
    let missing = send("DELETE", "/api/routines/abc", None).await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let declined = send("DELETE", "/api/routines/abc?confirm=false", None).await;
    assert_eq!(declined.status(), StatusCode::BAD_REQUEST);

    // Confirmed: passes validation and fails on the offline ownership check.
    let confirmed = send("DELETE", "/api/routines/abc?confirm=true", None).await;
    assert_eq!(confirmed.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_routine_day_filter_validated() {
    let response = send("GET", "/api/routines?day=Funday", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_session_validates_measures() {
    let response = send(
        "POST",
        "/api/sessions",
        Some(json!({
            "routineId": "r1",
            "exercises": {"Squat": [{"reps": "5", "weight": "1e3"}]}
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let too_long = send(
        "POST",
        "/api/sessions",
        Some(json!({
            "routineId": "r1",
            "exercises": {"Squat": [{"reps": "5", "weight": "12345678901234567"}]}
        })),
    )
    .await;
    assert_eq!(too_long.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_session_validates_date() {
    let response = send(
        "POST",
        "/api/sessions",
        Some(json!({"routineId": "r1", "date": "yesterday"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let no_routine = send("POST", "/api/sessions", Some(json!({"routineId": ""}))).await;
    assert_eq!(no_routine.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_profile_validates_ranges() {
    let response = send("PUT", "/api/profile", Some(json!({"age": -1}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_image_upload_validation() {
    let (app, state) = create_test_app();
    let token = create_test_jwt("user-1", &state.config.jwt_signing_key);

    let not_image = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/profile/image")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "text/plain")
                .body(Body::from("hello"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(not_image.status(), StatusCode::BAD_REQUEST);

    let empty = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/profile/image")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "image/png")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_latest_session_offline_is_read_error() {
    let response = send("GET", "/api/sessions/latest", None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "read_error");
}

#[tokio::test]
async fn test_register_validation() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"email": "not-an-email", "password": "secret1"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (app, _) = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"email": "ana@example.com", "password": "123"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
