// ABOUTME: Main library entry point for the keyturn credential service
// ABOUTME: Token signing, refresh record storage, rotation, authorization, and the HTTP surface
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Keyturn
//!
//! Issues, validates, and rotates paired access/refresh tokens so a client can
//! prove identity across stateless HTTP requests without re-sending a password.
//!
//! ## Architecture
//!
//! Leaf-first:
//! - **auth**: `TokenSigner`, stateless signing and verification per token class
//! - **store**: `RefreshRecordStore` trait with in-memory and `SQLite` backends
//! - **tokens**: issuance, rotation, revocation, and the `TokenLifecycle` facade
//! - **middleware**: `AuthorizationGate` for bearer access tokens and role checks
//!
//! Around the core:
//! - **config** / **logging**: environment-driven configuration and tracing setup
//! - **database**: `SQLite` schema for users and refresh records
//! - **services**: registration, login, profile, and user listing
//! - **routes**: axum router exposing the `/api` endpoints
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use keyturn::config::environment::ServerConfig;
//! use keyturn::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("keyturn configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Credential signer for access and refresh tokens
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// Application constants re-exported from `keyturn-core`
pub mod constants;

/// `SQLite` persistence for users and refresh records
pub mod database;

/// Unified error handling re-exported from `keyturn-core`
pub mod errors;

/// Logging configuration and structured event helpers
pub mod logging;

/// Authorization gate for protected requests
pub mod middleware;

/// Domain models (users, identities, token pairs)
pub mod models;

/// Shared server resources handed to route handlers
pub mod resources;

/// `HTTP` routes
pub mod routes;

/// Password digest primitives
pub mod security;

/// Account operations built on the token lifecycle
pub mod services;

/// Refresh record storage backends
pub mod store;

/// Token issuance, rotation, and revocation
pub mod tokens;
