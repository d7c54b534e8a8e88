// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses ports, database URL, store backend, signing secrets, and token lifetimes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management

use crate::auth::generate_jwt_secret;
use crate::constants::{env_vars, network, passwords, tokens};
use crate::errors::{AppError, AppResult};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// Environment type for security and other configurations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment (default)
    #[default]
    Development,
    /// Production environment with stricter security
    Production,
    /// Testing environment for automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Which backend holds refresh records
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// `refresh_tokens` table in the configured database
    #[default]
    Database,
    /// Process-local map; records are lost on restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "database" | "db" | "sqlite" => Ok(Self::Database),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(AppError::config_invalid(format!(
                "Invalid {}: {other} (expected database or memory)",
                env_vars::REFRESH_STORE_BACKEND
            ))),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database => write!(f, "database"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Signing secret bytes; never printed
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Wrap raw secret bytes
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw bytes for key construction
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether the secret holds no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningSecret([REDACTED; {} bytes])", self.0.len())
    }
}

/// Token signing and password digest configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret for access tokens
    pub access_secret: SigningSecret,
    /// Secret for refresh tokens
    pub refresh_secret: SigningSecret,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_ttl: Duration,
    /// bcrypt cost factor
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    /// Load token configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a secret is missing in production, a lifetime is
    /// unparsable, or the resulting configuration fails [`Self::validate`]
    pub fn from_env(environment: Environment) -> AppResult<Self> {
        let config = Self {
            access_secret: resolve_secret(env_vars::JWT_SECRET, environment)?,
            refresh_secret: resolve_secret(env_vars::JWT_REFRESH_SECRET, environment)?,
            access_ttl: parse_duration(&env_var_or(
                env_vars::JWT_EXPIRES_IN,
                tokens::DEFAULT_ACCESS_TTL,
            ))
            .map_err(|e| ttl_error(env_vars::JWT_EXPIRES_IN, &e))?,
            refresh_ttl: parse_duration(&env_var_or(
                env_vars::JWT_REFRESH_EXPIRES_IN,
                tokens::DEFAULT_REFRESH_TTL,
            ))
            .map_err(|e| ttl_error(env_vars::JWT_REFRESH_EXPIRES_IN, &e))?,
            bcrypt_cost: env_var_or(
                env_vars::BCRYPT_COST,
                &passwords::DEFAULT_BCRYPT_COST.to_string(),
            )
            .parse()
            .map_err(|e| {
                AppError::config_invalid(format!("Invalid {}: {e}", env_vars::BCRYPT_COST))
            })?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants between the two token classes
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_INVALID` when a secret is empty, both classes share a
    /// secret, a lifetime is not positive, the refresh lifetime does not exceed
    /// the access lifetime, or the bcrypt cost is out of range
    pub fn validate(&self) -> AppResult<()> {
        if self.access_secret.is_empty() || self.refresh_secret.is_empty() {
            return Err(AppError::config_invalid("Signing secrets must not be empty"));
        }
        if self.access_secret == self.refresh_secret {
            return Err(AppError::config_invalid(format!(
                "{} and {} must differ",
                env_vars::JWT_SECRET,
                env_vars::JWT_REFRESH_SECRET
            )));
        }
        if self.access_ttl <= Duration::zero() || self.refresh_ttl <= Duration::zero() {
            return Err(AppError::config_invalid("Token lifetimes must be positive"));
        }
        if self.refresh_ttl <= self.access_ttl {
            return Err(AppError::config_invalid(format!(
                "{} must be longer than {}",
                env_vars::JWT_REFRESH_EXPIRES_IN,
                env_vars::JWT_EXPIRES_IN
            )));
        }
        if !(passwords::MIN_BCRYPT_COST..=passwords::MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(AppError::config_invalid(format!(
                "{} must be between {} and {}",
                env_vars::BCRYPT_COST,
                passwords::MIN_BCRYPT_COST,
                passwords::MAX_BCRYPT_COST
            )));
        }
        Ok(())
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx `SQLite` URL
    pub url: String,
    /// Backend for refresh records
    pub refresh_store: StoreBackend,
}

impl DatabaseConfig {
    /// Load storage configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the store backend name is unknown
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            url: env_var_or(env_vars::DATABASE_URL, network::DEFAULT_DATABASE_URL),
            refresh_store: env_var_or(env_vars::REFRESH_STORE_BACKEND, "database").parse()?,
        })
    }

    /// Whether the URL points at a transient in-memory database
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Bind address
    pub host: String,
    /// Deployment environment
    pub environment: Environment,
    /// Storage configuration
    pub database: DatabaseConfig,
    /// Token configuration
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is present but invalid, or a required
    /// secret is missing in production
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let environment =
            Environment::from_str_or_default(&env_var_or(env_vars::ENVIRONMENT, "development"));

        let http_port = env_var_or(
            env_vars::HTTP_PORT,
            &network::DEFAULT_HTTP_PORT.to_string(),
        )
        .parse()
        .map_err(|e| AppError::config_invalid(format!("Invalid {}: {e}", env_vars::HTTP_PORT)))?;

        let config = Self {
            http_port,
            host: env_var_or(env_vars::HOST, network::DEFAULT_HOST),
            environment,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env(environment)?,
        };

        info!("{}", config.summary());
        Ok(config)
    }

    /// `host:port` string for the listener
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    /// Human-readable summary without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "keyturn configuration: environment={}, http={}, refresh_store={}, access_ttl={}s, refresh_ttl={}s, bcrypt_cost={}",
            self.environment,
            self.bind_address(),
            self.database.refresh_store,
            self.auth.access_ttl.num_seconds(),
            self.auth.refresh_ttl.num_seconds(),
            self.auth.bcrypt_cost
        )
    }
}

/// Parse a lifetime such as `15m`, `7d`, `3600s`, `12h`, or a bare number of seconds
///
/// # Errors
///
/// Returns `CONFIG_INVALID` for an empty string, an unknown unit, a
/// non-numeric amount, zero, or an overflowing value
pub fn parse_duration(value: &str) -> AppResult<Duration> {
    let value = value.trim();
    let (amount, unit) = match value.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&value[..idx], Some(c)),
        Some(_) => (value, None),
        None => return Err(AppError::config_invalid("Duration must not be empty")),
    };

    let amount: i64 = amount
        .trim()
        .parse()
        .map_err(|_| AppError::config_invalid(format!("Invalid duration: {value}")))?;
    if amount <= 0 {
        return Err(AppError::config_invalid(format!(
            "Duration must be positive: {value}"
        )));
    }

    let seconds_per_unit = match unit.map(|c| c.to_ascii_lowercase()) {
        None | Some('s') => 1,
        Some('m') => 60,
        Some('h') => 3600,
        Some('d') => 86_400,
        Some(other) => {
            return Err(AppError::config_invalid(format!(
                "Unknown duration unit '{other}' in {value}"
            )))
        }
    };

    amount
        .checked_mul(seconds_per_unit)
        .and_then(Duration::try_seconds)
        .ok_or_else(|| AppError::config_invalid(format!("Duration out of range: {value}")))
}

/// Read a signing secret, generating one outside production
fn resolve_secret(key: &str, environment: Environment) -> AppResult<SigningSecret> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Ok(SigningSecret::new(value.into_bytes())),
        _ if environment.is_production() => Err(AppError::config_missing(format!(
            "{key} must be set in production"
        ))),
        _ => {
            warn!(
                config.key = %key,
                "Signing secret not set; generated an ephemeral one (tokens will not survive a restart)"
            );
            Ok(SigningSecret::new(generate_jwt_secret()?.to_vec()))
        }
    }
}

fn ttl_error(key: &str, error: &AppError) -> AppError {
    AppError::config_invalid(format!("Invalid {key}: {}", error.message))
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
