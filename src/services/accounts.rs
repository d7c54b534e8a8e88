// ABOUTME: Account service creating users, checking passwords, and issuing token pairs
// ABOUTME: Keeps login failures indistinguishable and never exposes password digests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::passwords::MIN_PASSWORD_LENGTH;
use crate::database::Database;
use crate::errors::{AppError, AppResult, AuthError};
use crate::logging::AppLogger;
use crate::models::{Pagination, TokenPair, User, UserListFilter, UserPage, UserProfile, UserRole};
use crate::security::password::{hash_password, verify_password};
use crate::tokens::TokenLifecycle;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};
use uuid::Uuid;

/// Registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Login email; trimmed and lowercased before use
    pub email: String,
    /// Plain password
    pub password: String,
    /// Optional display name
    #[serde(default)]
    pub name: Option<String>,
}

/// Password login payload
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Plain password
    pub password: String,
}

/// Result of a successful registration or login
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    /// Public profile of the authenticated account
    pub user: UserProfile,
    /// Freshly issued credentials
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Password checked against the stand-in digest for unknown emails
const UNKNOWN_ACCOUNT_PASSWORD: &str = "keyturn-unknown-account";

/// Account operations over the user directory and the token lifecycle
#[derive(Clone)]
pub struct AccountService {
    database: Database,
    lifecycle: TokenLifecycle,
    bcrypt_cost: u32,
    unknown_account_digest: Arc<OnceCell<String>>,
}

impl AccountService {
    /// Create the service
    #[must_use]
    pub fn new(database: Database, lifecycle: TokenLifecycle, bcrypt_cost: u32) -> Self {
        Self {
            database,
            lifecycle,
            bcrypt_cost,
            unknown_account_digest: Arc::new(OnceCell::new()),
        }
    }

    /// Digest at the configured cost, hashed once on first use
    async fn unknown_account_digest(&self) -> AppResult<&str> {
        self.unknown_account_digest
            .get_or_try_init(|| hash_password(UNKNOWN_ACCOUNT_PASSWORD, self.bcrypt_cost))
            .await
            .map(String::as_str)
    }

    /// Create a `USER` account without issuing credentials
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` for a malformed email or short password,
    /// `RESOURCE_ALREADY_EXISTS` for a taken email, or a database error
    pub async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
        role: UserRole,
    ) -> AppResult<User> {
        let email = normalize_email(email);
        validate_email(&email)?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        if self.database.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::already_exists(
                "User with this email already exists",
            ));
        }

        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(ToOwned::to_owned);
        let digest = hash_password(password, self.bcrypt_cost).await?;
        let user = User::new(email, name, digest, role);
        self.database.create_user(&user).await?;

        info!(user.id = %user.id, user.role = %user.role, "Account created");
        Ok(user)
    }

    /// Register a new `USER` account and sign it in
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_account`], plus an internal error if the pair
    /// cannot be issued
    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthSession> {
        let user = self
            .create_account(
                &request.email,
                &request.password,
                request.name.as_deref(),
                UserRole::User,
            )
            .await?;

        let tokens = self.lifecycle.issue_for_identity(&user.identity()).await?;
        AppLogger::log_auth_event(&user.id.to_string(), "registration", true, None);

        Ok(AuthSession {
            user: user.into(),
            tokens,
        })
    }

    /// Check a password and issue a pair, superseding any earlier refresh token
    ///
    /// An unknown email still pays for one bcrypt verification.
    ///
    /// # Errors
    ///
    /// Returns `AUTH_INVALID` with one message for both an unknown email and a
    /// wrong password
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthSession> {
        let email = normalize_email(&request.email);

        let Some(user) = self.database.get_user_by_email(&email).await? else {
            // Same bcrypt work as a wrong password, so timing does not reveal the account
            let digest = self.unknown_account_digest().await?;
            let _matched = verify_password(&request.password, digest).await?;
            AppLogger::log_auth_event("unknown", "login", false, Some("unknown email"));
            return Err(AuthError::InvalidCredentials.into());
        };

        if !verify_password(&request.password, &user.password_hash).await? {
            AppLogger::log_auth_event(&user.id.to_string(), "login", false, Some("bad password"));
            return Err(AuthError::InvalidCredentials.into());
        }

        let tokens = self.lifecycle.issue_for_identity(&user.identity()).await?;
        AppLogger::log_auth_event(&user.id.to_string(), "login", true, None);

        Ok(AuthSession {
            user: user.into(),
            tokens,
        })
    }

    /// Public profile of `user_id`
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the account no longer exists
    pub async fn profile(&self, user_id: Uuid) -> AppResult<UserProfile> {
        self.database
            .get_user(user_id)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| {
                warn!(user.id = %user_id, "Authenticated user not found in directory");
                AppError::not_found("User")
            })
    }

    /// One page of the user directory
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails
    pub async fn list_users(&self, filter: &UserListFilter) -> AppResult<UserPage> {
        let (users, total) = self.database.list_users(filter).await?;
        Ok(UserPage {
            users: users.into_iter().map(UserProfile::from).collect(),
            pagination: Pagination::new(filter.page(), filter.limit(), total),
        })
    }

    /// Token lifecycle used for issuance
    #[must_use]
    pub const fn lifecycle(&self) -> &TokenLifecycle {
        &self.lifecycle
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> AppResult<()> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(AppError::invalid_input("A valid email is required")),
    }
}
