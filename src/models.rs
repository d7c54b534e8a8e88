// ABOUTME: Domain models for the user directory and user listing
// ABOUTME: Re-exports identity and token types from keyturn-core alongside User and UserProfile
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! `User` is the stored account (including its password digest).
//! `UserProfile` is the public projection returned over HTTP; it never carries
//! the digest.

use crate::constants::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use keyturn_core::models::{
    AuthContext, Identity, RefreshRecord, TokenClass, TokenPair, UserRole,
};

/// Stored account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Stable identity id
    pub id: Uuid,
    /// Unique login email
    pub email: String,
    /// Optional display name
    pub name: Option<String>,
    /// bcrypt digest of the password
    pub password_hash: String,
    /// Role embedded in issued tokens
    pub role: UserRole,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a new account with a fresh id and the given digest
    #[must_use]
    pub fn new(email: String, name: Option<String>, password_hash: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// The part of this account the token lifecycle reads
    #[must_use]
    pub const fn identity(&self) -> Identity {
        Identity::new(self.id, self.role)
    }
}

/// Public view of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identity id
    pub id: Uuid,
    /// Login email
    pub email: String,
    /// Display name
    pub name: Option<String>,
    /// Role
    pub role: UserRole,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Query for the user listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListFilter {
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
    /// Only users with this role
    pub role: Option<UserRole>,
    /// Case-insensitive substring of name or email
    pub search: Option<String>,
}

impl UserListFilter {
    /// Page number, at least 1
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size clamped to `1..=MAX_PAGE_SIZE`
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Number of rows to skip
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page() - 1) * u64::from(self.limit())
    }

    /// Trimmed search term, `None` when blank
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Pagination metadata for a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Page that was returned
    pub current_page: u32,
    /// Number of pages for the filter
    pub total_pages: u64,
    /// Number of matching users
    pub total_count: u64,
    /// Page size used
    pub limit: u32,
    /// Whether a later page exists
    pub has_next: bool,
    /// Whether an earlier page exists
    pub has_prev: bool,
}

impl Pagination {
    /// Compute metadata for `total_count` rows
    #[must_use]
    pub fn new(page: u32, limit: u32, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(u64::from(limit.max(1)));
        Self {
            current_page: page,
            total_pages,
            total_count,
            limit,
            has_next: u64::from(page) < total_pages,
            has_prev: page > 1,
        }
    }
}

/// One page of users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPage {
    /// Users on this page, newest first
    pub users: Vec<UserProfile>,
    /// Pagination metadata
    pub pagination: Pagination,
}
