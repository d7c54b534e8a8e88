// ABOUTME: In-memory refresh record store guarded by a single async RwLock
// ABOUTME: Keeps a token-to-record map and an identity-to-token index in one critical section
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{ensure_unexpired, RefreshRecordStore, StoreError};
use crate::models::RefreshRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Records {
    by_token: HashMap<String, RefreshRecord>,
    by_identity: HashMap<Uuid, String>,
}

impl Records {
    fn remove_token(&mut self, token: &str) -> Option<RefreshRecord> {
        let record = self.by_token.remove(token)?;
        if self
            .by_identity
            .get(&record.user_id)
            .is_some_and(|indexed| indexed == token)
        {
            self.by_identity.remove(&record.user_id);
        }
        Some(record)
    }
}

/// Process-local refresh record store
///
/// Both maps sit behind one lock, so each operation observes and leaves a
/// consistent pair of maps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRefreshStore {
    records: Arc<RwLock<Records>>,
}

impl InMemoryRefreshStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, expired ones included
    pub async fn len(&self) -> usize {
        self.records.read().await.by_token.len()
    }

    /// Whether the store holds no records
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.by_token.is_empty()
    }
}

#[async_trait]
impl RefreshRecordStore for InMemoryRefreshStore {
    async fn put(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;

        if let Some(previous) = records.by_identity.get(&user_id).cloned() {
            records.remove_token(&previous);
        }
        // A token value belongs to one identity only
        records.remove_token(token);

        records
            .by_identity
            .insert(user_id, token.to_owned());
        records.by_token.insert(
            token.to_owned(),
            RefreshRecord::new(token.to_owned(), user_id, expires_at),
        );
        drop(records);
        Ok(())
    }

    async fn take_if_valid(&self, token: &str) -> Result<RefreshRecord, StoreError> {
        let record = self
            .records
            .write()
            .await
            .remove_token(token)
            .ok_or(StoreError::NotFound)?;
        ensure_unexpired(record, Utc::now())
    }

    async fn delete_by_token(&self, token: &str) -> Result<(), StoreError> {
        self.records.write().await.remove_token(token);
        Ok(())
    }

    async fn records_for_identity(&self, user_id: Uuid) -> Result<Vec<RefreshRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .by_identity
            .get(&user_id)
            .and_then(|token| records.by_token.get(token))
            .cloned()
            .into_iter()
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
