// ABOUTME: Authentication route handlers for registration, login, refresh, logout, and profile
// ABOUTME: Thin axum handlers delegating to the account service and the token lifecycle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Authentication routes
//!
//! Refresh and logout take the refresh token in the JSON body. Profile needs a
//! bearer access token; nothing here consults the refresh store for it.

use super::authorization_header;
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::services::{LoginRequest, RegisterRequest};
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Body of `POST /api/auth/refresh` and `POST /api/auth/logout`
#[derive(Debug, Default, Deserialize)]
pub struct RefreshTokenRequest {
    /// Refresh token to rotate or revoke
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/register", post(Self::handle_register))
            .route("/api/auth/login", post(Self::handle_login))
            .route("/api/auth/refresh", post(Self::handle_refresh))
            .route("/api/auth/logout", post(Self::handle_logout))
            .route("/api/auth/profile", get(Self::handle_profile))
            .with_state(resources)
    }

    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<RegisterRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let Json(request) = payload.map_err(rejection_to_error)?;
        let session = resources.accounts.register(request).await?;
        Ok((StatusCode::CREATED, Json(session)).into_response())
    }

    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<LoginRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let Json(request) = payload.map_err(rejection_to_error)?;
        let session = resources.accounts.login(request).await?;
        Ok((StatusCode::OK, Json(session)).into_response())
    }

    async fn handle_refresh(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let Json(request) = payload.map_err(rejection_to_error)?;
        let token = request
            .refresh_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::invalid_input("Refresh token is required"))?;

        let pair = resources.lifecycle.rotate(&token).await?;
        Ok((StatusCode::OK, Json(pair)).into_response())
    }

    /// Logout is accepted with or without a body
    async fn handle_logout(
        State(resources): State<Arc<ServerResources>>,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let request = if body.iter().all(u8::is_ascii_whitespace) {
            RefreshTokenRequest::default()
        } else {
            serde_json::from_slice::<RefreshTokenRequest>(&body)
                .map_err(|e| AppError::invalid_input(format!("Invalid request body: {e}")))?
        };

        if let Some(token) = request.refresh_token.filter(|t| !t.trim().is_empty()) {
            resources.lifecycle.revoke(&token).await?;
        }

        Ok((
            StatusCode::OK,
            Json(json!({ "message": "Logged out successfully" })),
        )
            .into_response())
    }

    async fn handle_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources
            .lifecycle
            .gate()
            .authenticate_request(authorization_header(&headers))?;

        let profile = resources.accounts.profile(auth.user_id).await?;
        Ok((StatusCode::OK, Json(json!({ "user": profile }))).into_response())
    }
}

pub(crate) fn rejection_to_error(rejection: JsonRejection) -> AppError {
    AppError::invalid_input(format!("Invalid request body: {}", rejection.body_text()))
}
