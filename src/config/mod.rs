// ABOUTME: Configuration management module for server, storage, and token settings
// ABOUTME: Environment-only configuration with typed sub-configs and validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for keyturn
//!
//! - **Environment**: server, database, and token configuration from environment variables

/// Environment and server configuration
pub mod environment;

pub use environment::{
    parse_duration, AuthConfig, DatabaseConfig, Environment, ServerConfig, SigningSecret,
    StoreBackend,
};
