// ABOUTME: Typed failure taxonomy for credential issuance, rotation, and authorization
// ABOUTME: Maps each failure to a coarse user-visible AppError without leaking internals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AppError, ErrorCode};
use thiserror::Error;

/// Failure outcomes of the token lifecycle operations
///
/// Every variant is terminal for the current request. Callers branch on the
/// variant; none of them is retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Unknown identity or failed digest check (deliberately indistinguishable)
    #[error("invalid email or password")]
    InvalidCredentials,
    /// Refresh token unknown, already rotated, revoked, or failing verification
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    /// Refresh token record found past its expiry; the record has been removed
    #[error("refresh token expired")]
    ExpiredRefreshToken,
    /// Access token missing, malformed, forged, or expired
    #[error("unauthorized")]
    Unauthorized,
    /// Valid identity without an allowed role
    #[error("forbidden")]
    Forbidden,
    /// Storage or signing failure; the detail is for logs only
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Error code reported to callers for this failure
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidCredentials | Self::InvalidRefreshToken => ErrorCode::AuthInvalid,
            Self::ExpiredRefreshToken => ErrorCode::AuthExpired,
            Self::Unauthorized => ErrorCode::AuthRequired,
            Self::Forbidden => ErrorCode::PermissionDenied,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Message safe to show to the caller
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Invalid email or password",
            Self::InvalidRefreshToken => "Invalid refresh token",
            Self::ExpiredRefreshToken => "Refresh token expired",
            Self::Unauthorized => "Invalid or missing access token",
            Self::Forbidden => "Insufficient permissions",
            Self::Internal(_) => "Internal server error",
        }
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> Self {
        if let AuthError::Internal(detail) = &error {
            tracing::error!(error.detail = %detail, "Credential operation failed internally");
        }
        Self::new(error.code(), error.public_message())
    }
}

impl From<AppError> for AuthError {
    fn from(error: AppError) -> Self {
        Self::Internal(error.to_string())
    }
}
