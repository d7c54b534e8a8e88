// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Default token lifetimes, environment variable names, and service identifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Service identifiers used in logs and token claims
pub mod service_names {
    /// Name of the HTTP service
    pub const KEYTURN_SERVER: &str = "keyturn-server";
    /// Issuer written into every signed token
    pub const TOKEN_ISSUER: &str = "keyturn";
}

/// Token lifetimes and secret sizes
pub mod tokens {
    /// Default access token lifetime (`JWT_EXPIRES_IN`)
    pub const DEFAULT_ACCESS_TTL: &str = "15m";
    /// Default refresh token lifetime (`JWT_REFRESH_EXPIRES_IN`)
    pub const DEFAULT_REFRESH_TTL: &str = "7d";
    /// Size in bytes of generated signing secrets
    pub const GENERATED_SECRET_BYTES: usize = 64;
}

/// Password digest parameters
pub mod passwords {
    /// Default bcrypt cost
    pub const DEFAULT_BCRYPT_COST: u32 = 12;
    /// Lowest bcrypt cost accepted by the library
    pub const MIN_BCRYPT_COST: u32 = 4;
    /// Highest bcrypt cost accepted by the library
    pub const MAX_BCRYPT_COST: u32 = 31;
    /// Minimum accepted password length at registration
    pub const MIN_PASSWORD_LENGTH: usize = 6;
}

/// User listing limits
pub mod pagination {
    /// Page size used when none is requested
    pub const DEFAULT_PAGE_SIZE: u32 = 10;
    /// Largest page size a caller may request
    pub const MAX_PAGE_SIZE: u32 = 100;
}

/// Network defaults
pub mod network {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 3000;
    /// Default bind address
    pub const DEFAULT_HOST: &str = "127.0.0.1";
    /// Default SQLite location
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/keyturn.db";
}

/// Environment variable names
pub mod env_vars {
    /// Listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Bind address
    pub const HOST: &str = "HOST";
    /// sqlx database URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Refresh record store backend selector
    pub const REFRESH_STORE_BACKEND: &str = "REFRESH_STORE_BACKEND";
    /// Access token signing secret
    pub const JWT_SECRET: &str = "JWT_SECRET";
    /// Refresh token signing secret
    pub const JWT_REFRESH_SECRET: &str = "JWT_REFRESH_SECRET";
    /// Access token lifetime
    pub const JWT_EXPIRES_IN: &str = "JWT_EXPIRES_IN";
    /// Refresh token lifetime
    pub const JWT_REFRESH_EXPIRES_IN: &str = "JWT_REFRESH_EXPIRES_IN";
    /// bcrypt cost
    pub const BCRYPT_COST: &str = "BCRYPT_COST";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}
