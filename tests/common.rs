// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, in-memory databases, signers, lifecycles, and server resources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `keyturn`

use chrono::Duration;
use keyturn::{
    auth::TokenSigner,
    config::environment::{
        AuthConfig, DatabaseConfig, Environment, ServerConfig, SigningSecret, StoreBackend,
    },
    constants::passwords::MIN_BCRYPT_COST,
    database::Database,
    models::{Identity, UserRole},
    resources::ServerResources,
    store::{InMemoryRefreshStore, RefreshRecordStore, SqliteRefreshStore},
    tokens::TokenLifecycle,
};
use std::sync::{Arc, Once};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

pub const ACCESS_SECRET: &[u8] = b"test-access-secret-0123456789abcdef";
pub const REFRESH_SECRET: &[u8] = b"test-refresh-secret-0123456789abcdef";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        // Another test binary harness may already own the global subscriber
        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Fresh in-memory database with migrations applied
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::new("sqlite::memory:").await.unwrap()
}

/// Signer with 15 minute access and 7 day refresh lifetimes
pub fn create_test_signer() -> TokenSigner {
    create_test_signer_with_ttls(Duration::minutes(15), Duration::days(7))
}

pub fn create_test_signer_with_ttls(access_ttl: Duration, refresh_ttl: Duration) -> TokenSigner {
    TokenSigner::new(ACCESS_SECRET, REFRESH_SECRET, access_ttl, refresh_ttl).unwrap()
}

/// Which refresh store a test runs against
#[derive(Debug, Clone, Copy)]
pub enum TestBackend {
    Memory,
    Sqlite,
}

pub const ALL_BACKENDS: [TestBackend; 2] = [TestBackend::Memory, TestBackend::Sqlite];

pub async fn create_test_store(backend: TestBackend) -> Arc<dyn RefreshRecordStore> {
    match backend {
        TestBackend::Memory => {
            init_test_logging();
            Arc::new(InMemoryRefreshStore::new())
        }
        TestBackend::Sqlite => Arc::new(SqliteRefreshStore::new(create_test_database().await)),
    }
}

pub async fn create_test_lifecycle(backend: TestBackend) -> TokenLifecycle {
    TokenLifecycle::new(create_test_signer(), create_test_store(backend).await)
}

pub fn user_identity() -> Identity {
    Identity::new(Uuid::new_v4(), UserRole::User)
}

pub fn admin_identity() -> Identity {
    Identity::new(Uuid::new_v4(), UserRole::Admin)
}

/// Configuration suitable for in-process servers
pub fn create_test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        host: "127.0.0.1".into(),
        environment: Environment::Testing,
        database: DatabaseConfig {
            url: "sqlite::memory:".into(),
            refresh_store: StoreBackend::Database,
        },
        auth: AuthConfig {
            access_secret: SigningSecret::new(ACCESS_SECRET),
            refresh_secret: SigningSecret::new(REFRESH_SECRET),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(7),
            bcrypt_cost: MIN_BCRYPT_COST,
        },
    }
}

/// Full resource container over an in-memory database
pub async fn create_test_resources() -> Arc<ServerResources> {
    init_test_logging();
    Arc::new(ServerResources::from_config(create_test_config()).await.unwrap())
}
