// ABOUTME: Refresh store factory for configuration-based backend selection
// ABOUTME: Produces a shared trait object injected into issuance and rotation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{InMemoryRefreshStore, RefreshRecordStore, SqliteRefreshStore};
use crate::config::environment::StoreBackend;
use crate::database::Database;
use std::sync::Arc;

/// Constructors for the configured refresh store
pub struct RefreshStore;

impl RefreshStore {
    /// Build the backend named by `backend`
    ///
    /// The database backend shares `database`'s pool; the memory backend
    /// ignores it.
    #[must_use]
    pub fn new(backend: StoreBackend, database: &Database) -> Arc<dyn RefreshRecordStore> {
        let store: Arc<dyn RefreshRecordStore> = match backend {
            StoreBackend::Database => Arc::new(SqliteRefreshStore::new(database.clone())),
            StoreBackend::Memory => {
                tracing::warn!("Refresh records are held in memory and will not survive a restart");
                Arc::new(InMemoryRefreshStore::new())
            }
        };
        tracing::info!(store.backend = store.backend_name(), "Refresh store initialized");
        store
    }
}
