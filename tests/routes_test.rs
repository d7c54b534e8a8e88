// ABOUTME: Route tests driving the axum router in process with tower's oneshot
// ABOUTME: Status codes, JSON shapes, and error envelopes for every endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use keyturn::{models::UserRole, routes};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn test_app() -> Router {
    routes::router(common::create_test_resources().await)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_with_token(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn register(app: &Router, email: &str) -> Value {
    let (status, body) = send(
        app,
        post_json(
            "/api/auth/register",
            &json!({ "email": email, "password": "secret1", "name": "Route Tester" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = test_app().await;
    let (status, body) = send(&app, get_with_token("/api/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_register_response_shape() {
    let app = test_app().await;
    let body = register(&app, "shape@example.com").await;

    assert_eq!(body["user"]["email"], "shape@example.com");
    assert_eq!(body["user"]["role"], "USER");
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());
    assert!(body["access_expires_at"].is_string());
    assert!(body["refresh_expires_at"].is_string());
}

#[tokio::test]
async fn test_register_errors() {
    let app = test_app().await;
    register(&app, "taken@example.com").await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/register",
            &json!({ "email": "taken@example.com", "password": "secret1" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "RESOURCE_ALREADY_EXISTS");

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/register",
            &json!({ "email": "short@example.com", "password": "123" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_INPUT");

    let (status, body) = send(&app, post_json("/api/auth/register", &json!({ "email": 7 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_INPUT");
}

#[tokio::test]
async fn test_login() {
    let app = test_app().await;
    register(&app, "login@example.com").await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/login",
            &json!({ "email": "login@example.com", "password": "secret1" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "login@example.com");

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/login",
            &json!({ "email": "login@example.com", "password": "wrong-password" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "AUTH_INVALID");
    assert_eq!(body["error"]["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_refresh_rotates_once() {
    let app = test_app().await;
    let session = register(&app, "rotate@example.com").await;
    let refresh_token = session["refresh_token"].as_str().unwrap();

    let (status, rotated) = send(
        &app,
        post_json("/api/auth/refresh", &json!({ "refresh_token": refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(rotated["refresh_token"].as_str().unwrap(), refresh_token);

    let (status, body) = send(
        &app,
        post_json("/api/auth/refresh", &json!({ "refresh_token": refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "AUTH_INVALID");
    assert_eq!(body["error"]["message"], "Invalid refresh token");

    let (status, body) = send(&app, post_json("/api/auth/refresh", &json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_INPUT");
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let app = test_app().await;
    let session = register(&app, "logout@example.com").await;
    let refresh_token = session["refresh_token"].as_str().unwrap();
    let access_token = session["access_token"].as_str().unwrap();

    let (status, _) = send(
        &app,
        post_json("/api/auth/logout", &json!({ "refresh_token": refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        post_json("/api/auth/refresh", &json!({ "refresh_token": refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Logging out again, or without a body, still succeeds
    let (status, _) = send(
        &app,
        post_json("/api/auth/logout", &json!({ "refresh_token": refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let empty = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/logout")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, empty).await;
    assert_eq!(status, StatusCode::OK);

    // The access token outlives logout until its own expiry
    let (status, _) = send(&app, get_with_token("/api/auth/profile", Some(access_token))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_profile_requires_access_token() {
    let app = test_app().await;
    let session = register(&app, "profile@example.com").await;

    let (status, body) = send(&app, get_with_token("/api/auth/profile", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "AUTH_REQUIRED");

    let refresh_token = session["refresh_token"].as_str().unwrap();
    let (status, _) = send(&app, get_with_token("/api/auth/profile", Some(refresh_token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let access_token = session["access_token"].as_str().unwrap();
    let (status, body) = send(&app, get_with_token("/api/auth/profile", Some(access_token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "profile@example.com");
}

#[tokio::test]
async fn test_user_listing_is_admin_only() {
    let resources = common::create_test_resources().await;
    let app = routes::router(resources.clone());

    resources
        .accounts
        .create_account("boss@example.com", "secret1", Some("Boss"), UserRole::Admin)
        .await
        .unwrap();
    let user_session = register(&app, "worker@example.com").await;

    let (status, admin_session) = send(
        &app,
        post_json(
            "/api/auth/login",
            &json!({ "email": "boss@example.com", "password": "secret1" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let admin_token = admin_session["access_token"].as_str().unwrap();

    let user_token = user_session["access_token"].as_str().unwrap();
    let (status, body) = send(&app, get_with_token("/api/auth/users", Some(user_token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "PERMISSION_DENIED");

    let (status, body) = send(&app, get_with_token("/api/auth/users", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "AUTH_REQUIRED");

    let (status, body) = send(&app, get_with_token("/api/auth/users", Some(admin_token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total_count"], 2);
    assert_eq!(body["users"].as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        get_with_token("/api/auth/users?role=admin&limit=5", Some(admin_token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"][0]["email"], "boss@example.com");
    assert_eq!(body["pagination"]["limit"], 5);

    let (status, body) = send(
        &app,
        get_with_token("/api/auth/users?role=owner", Some(admin_token)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_INPUT");
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let app = test_app().await;
    let (status, body) = send(&app, get_with_token("/api/nope", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "RESOURCE_NOT_FOUND");
}
