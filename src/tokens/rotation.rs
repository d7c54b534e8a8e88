// ABOUTME: Rotation protocol exchanging a refresh token for a new pair exactly once
// ABOUTME: Consumes the stored record before verifying and re-issuing; also handles revocation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::issuance::TokenIssuer;
use crate::auth::TokenSigner;
use crate::errors::AuthError;
use crate::logging::AppLogger;
use crate::models::{Identity, TokenClass, TokenPair};
use crate::store::{RefreshRecordStore, StoreError};
use std::sync::Arc;

/// Single-use refresh token exchange
#[derive(Clone)]
pub struct TokenRotator {
    signer: Arc<TokenSigner>,
    store: Arc<dyn RefreshRecordStore>,
    issuer: TokenIssuer,
}

impl TokenRotator {
    /// Create a rotator; `issuer` must write to the same `store`
    #[must_use]
    pub fn new(
        signer: Arc<TokenSigner>,
        store: Arc<dyn RefreshRecordStore>,
        issuer: TokenIssuer,
    ) -> Self {
        Self {
            signer,
            store,
            issuer,
        }
    }

    /// Exchange `refresh_token` for a new pair
    ///
    /// The stored record is removed before anything else happens, so the same
    /// token can succeed at most once even under concurrent presentation.
    ///
    /// The new pair carries the role from the refresh claims. The user
    /// directory is not consulted, so a role change made there applies from
    /// the next login, or after a revoke forces one.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidRefreshToken`] when no record matches (never issued,
    ///   already rotated, revoked, superseded) or the token fails verification
    ///   or names another identity than its record
    /// - [`AuthError::ExpiredRefreshToken`] when the record or the token has
    ///   expired; the record is gone afterwards
    /// - [`AuthError::Internal`] on store or signing failure
    pub async fn rotate(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let record = match self.store.take_if_valid(refresh_token).await {
            Ok(record) => record,
            Err(StoreError::NotFound) => {
                AppLogger::log_security_event(
                    "refresh_token_unknown",
                    "medium",
                    "refresh token presented with no live record (replay, revoked, or superseded)",
                    None,
                );
                return Err(AuthError::InvalidRefreshToken);
            }
            Err(e) => return Err(e.into()),
        };
        let user_id = record.user_id.to_string();

        let verified = match self.signer.verify(refresh_token, TokenClass::Refresh) {
            Ok(verified) => verified,
            Err(e) if e.is_expired() => {
                AppLogger::log_auth_event(&user_id, "token_rotate", false, Some("token expired"));
                return Err(AuthError::ExpiredRefreshToken);
            }
            Err(e) => {
                AppLogger::log_security_event(
                    "refresh_token_invalid",
                    "high",
                    &e.to_string(),
                    Some(&user_id),
                );
                return Err(AuthError::InvalidRefreshToken);
            }
        };

        if verified.user_id != record.user_id {
            AppLogger::log_security_event(
                "refresh_token_identity_mismatch",
                "high",
                "token subject differs from stored record owner",
                Some(&user_id),
            );
            return Err(AuthError::InvalidRefreshToken);
        }

        let pair = self
            .issuer
            .issue(&Identity::new(record.user_id, verified.role))
            .await?;

        AppLogger::log_auth_event(&user_id, "token_rotate", true, None);
        Ok(pair)
    }

    /// Remove the record for `refresh_token`; succeeds whether or not it existed
    ///
    /// Access tokens already handed out stay valid until their own expiry.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] only if the store fails
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.store.delete_by_token(refresh_token).await?;
        tracing::debug!(auth.event = "token_revoke", "Refresh token revoked");
        Ok(())
    }
}
