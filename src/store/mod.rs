// ABOUTME: Refresh record store abstraction with pluggable backends
// ABOUTME: Defines the atomic put/take/delete contract and the store error type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Refresh Record Store
//!
//! Maps an opaque refresh token to `{identity, expiry}` and holds at most one
//! record per identity. Every mutation is a single atomic step with respect to
//! other callers:
//!
//! - `put` replaces whatever record the identity had and installs the new one
//! - `take_if_valid` removes the matching record and hands it back; an expired
//!   record is removed too and reported as [`StoreError::Expired`]
//! - `delete_by_token` removes a record if present and never fails on absence
//!
//! Two concurrent `take_if_valid` calls for the same token therefore resolve
//! with exactly one winner; the other sees [`StoreError::NotFound`].

/// Backend selection from configuration
pub mod factory;
/// In-memory backend
pub mod memory;
/// `SQLite` backend
pub mod sqlite;

pub use factory::RefreshStore;
pub use memory::InMemoryRefreshStore;
pub use sqlite::SqliteRefreshStore;

use crate::errors::{AppError, AuthError};
use crate::models::RefreshRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Failures reported by a refresh record store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record for the token (never issued, rotated away, revoked, or superseded)
    #[error("refresh record not found")]
    NotFound,
    /// A record existed but had expired; it has been removed
    #[error("refresh record expired at {expired_at}")]
    Expired {
        /// Expiry of the removed record
        expired_at: DateTime<Utc>,
    },
    /// The storage engine failed
    #[error("refresh store backend failure: {0}")]
    Backend(String),
}

impl From<AppError> for StoreError {
    fn from(error: AppError) -> Self {
        Self::Backend(error.to_string())
    }
}

impl From<StoreError> for AuthError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::InvalidRefreshToken,
            StoreError::Expired { .. } => Self::ExpiredRefreshToken,
            StoreError::Backend(detail) => Self::Internal(detail),
        }
    }
}

/// Persistent single-use refresh record bookkeeping
#[async_trait]
pub trait RefreshRecordStore: Send + Sync {
    /// Install the only record for `user_id`, removing any prior one in the same step
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the storage engine fails
    async fn put(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Remove and return the record for `token` if present and unexpired
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] when no record matches
    /// - [`StoreError::Expired`] when the record had expired (it is removed anyway)
    /// - [`StoreError::Backend`] if the storage engine fails
    async fn take_if_valid(&self, token: &str) -> Result<RefreshRecord, StoreError>;

    /// Remove the record for `token`; absence is not an error
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the storage engine fails
    async fn delete_by_token(&self, token: &str) -> Result<(), StoreError>;

    /// Records currently held by `user_id` (zero or one)
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the storage engine fails
    async fn records_for_identity(&self, user_id: Uuid) -> Result<Vec<RefreshRecord>, StoreError>;

    /// Backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// Judge a just-removed record against `now`
pub(crate) fn ensure_unexpired(
    record: RefreshRecord,
    now: DateTime<Utc>,
) -> Result<RefreshRecord, StoreError> {
    if record.is_expired_at(now) {
        Err(StoreError::Expired {
            expired_at: record.expires_at,
        })
    } else {
        Ok(record)
    }
}
