// ABOUTME: Route module organization for the keyturn HTTP endpoints
// ABOUTME: Assembles health, authentication, and user directory routes into one axum router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for keyturn
//!
//! Each domain module contains only route definitions and thin handlers that
//! delegate to the token lifecycle or the account service. Failures render as
//! the `{"error": {"code", "message"}}` envelope produced by `AppError`.

/// Registration, login, refresh, logout, and profile routes
pub mod auth;
/// Liveness route
pub mod health;
/// Admin-only user directory routes
pub mod users;

pub use auth::AuthRoutes;
pub use health::HealthRoutes;
pub use users::UserRoutes;

use crate::errors::AppError;
use crate::resources::ServerResources;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the full application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes())
        .merge(AuthRoutes::routes(Arc::clone(&resources)))
        .merge(UserRoutes::routes(resources))
        .fallback(handle_not_found)
        .layer(TraceLayer::new_for_http())
}

async fn handle_not_found() -> AppError {
    AppError::not_found("Route")
}

/// Raw `Authorization` header value, if present and valid UTF-8
pub(crate) fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok())
}
