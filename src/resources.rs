// ABOUTME: Centralized resource container shared by every route handler
// ABOUTME: Wires configuration, database, refresh store, token lifecycle, and account service once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources
//!
//! Built once at startup and shared as `Arc<ServerResources>`, so handlers
//! never recreate the signer, the pool, or the store.

use crate::auth::TokenSigner;
use crate::config::environment::ServerConfig;
use crate::database::Database;
use crate::errors::AppResult;
use crate::services::AccountService;
use crate::store::RefreshStore;
use crate::tokens::TokenLifecycle;
use std::sync::Arc;

/// Resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// User directory and refresh record tables
    pub database: Database,
    /// Issuance, rotation, revocation, and authorization
    pub lifecycle: TokenLifecycle,
    /// Registration, login, and directory queries
    pub accounts: AccountService,
    /// Effective configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Assemble resources from already-built components
    #[must_use]
    pub fn new(database: Database, lifecycle: TokenLifecycle, config: ServerConfig) -> Self {
        let accounts = AccountService::new(
            database.clone(),
            lifecycle.clone(),
            config.auth.bcrypt_cost,
        );
        Self {
            database,
            lifecycle,
            accounts,
            config: Arc::new(config),
        }
    }

    /// Open storage and build the lifecycle described by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated, or the
    /// signing configuration is rejected
    pub async fn from_config(config: ServerConfig) -> AppResult<Self> {
        let database = Database::new(&config.database.url).await?;
        let store = RefreshStore::new(config.database.refresh_store, &database);
        let signer = TokenSigner::from_config(&config.auth)?;
        let lifecycle = TokenLifecycle::new(signer, store);
        Ok(Self::new(database, lifecycle, config))
    }
}
