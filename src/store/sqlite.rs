// ABOUTME: SQLite-backed refresh record store using single-statement upsert and take
// ABOUTME: Delegates to the refresh_tokens table operations on Database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{ensure_unexpired, RefreshRecordStore, StoreError};
use crate::database::Database;
use crate::models::RefreshRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Durable refresh record store
///
/// `put` is one `INSERT … ON CONFLICT(user_id) DO UPDATE` and `take_if_valid`
/// is one `DELETE … RETURNING`, so neither can be observed half-applied.
#[derive(Debug, Clone)]
pub struct SqliteRefreshStore {
    database: Database,
}

impl SqliteRefreshStore {
    /// Wrap a migrated database
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl RefreshRecordStore for SqliteRefreshStore {
    async fn put(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        Ok(self
            .database
            .upsert_refresh_token(user_id, token, expires_at)
            .await?)
    }

    async fn take_if_valid(&self, token: &str) -> Result<RefreshRecord, StoreError> {
        let record = self
            .database
            .take_refresh_token(token)
            .await?
            .ok_or(StoreError::NotFound)?;
        ensure_unexpired(record, Utc::now())
    }

    async fn delete_by_token(&self, token: &str) -> Result<(), StoreError> {
        self.database.delete_refresh_token(token).await?;
        Ok(())
    }

    async fn records_for_identity(&self, user_id: Uuid) -> Result<Vec<RefreshRecord>, StoreError> {
        Ok(self.database.get_refresh_tokens_for_user(user_id).await?)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
