// ABOUTME: User directory route handlers restricted to administrators
// ABOUTME: Paginated listing with optional role filter and name/email search
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::authorization_header;
use crate::errors::AppError;
use crate::models::{UserListFilter, UserRole};
use crate::resources::ServerResources;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;

/// Raw query string of `GET /api/auth/users`
#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
    /// Role name, case-insensitive
    pub role: Option<String>,
    /// Name or email fragment
    pub search: Option<String>,
}

impl TryFrom<UserListQuery> for UserListFilter {
    type Error = AppError;

    fn try_from(query: UserListQuery) -> Result<Self, Self::Error> {
        let role = query
            .role
            .filter(|r| !r.trim().is_empty())
            .map(|r| r.parse::<UserRole>())
            .transpose()
            .map_err(AppError::invalid_input)?;
        Ok(Self {
            page: query.page,
            limit: query.limit,
            role,
            search: query.search,
        })
    }
}

/// User directory routes
pub struct UserRoutes;

impl UserRoutes {
    /// Create the user directory routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/users", get(Self::handle_list_users))
            .with_state(resources)
    }

    async fn handle_list_users(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        query: Result<Query<UserListQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        resources
            .lifecycle
            .gate()
            .authorize_with_roles(authorization_header(&headers), &[UserRole::Admin])?;

        let Query(query) = query
            .map_err(|e| AppError::invalid_input(format!("Invalid query: {}", e.body_text())))?;
        let filter = UserListFilter::try_from(query)?;

        let page = resources.accounts.list_users(&filter).await?;
        Ok((StatusCode::OK, Json(page)).into_response())
    }
}
