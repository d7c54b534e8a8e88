// ABOUTME: Token issuance minting an access/refresh pair and persisting the refresh record
// ABOUTME: Supersedes any prior refresh record of the identity; store failure discards the pair
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::auth::TokenSigner;
use crate::errors::AuthError;
use crate::logging::AppLogger;
use crate::models::{Identity, TokenClass, TokenPair};
use crate::store::RefreshRecordStore;
use std::sync::Arc;

/// Mints token pairs and records the refresh half
#[derive(Clone)]
pub struct TokenIssuer {
    signer: Arc<TokenSigner>,
    store: Arc<dyn RefreshRecordStore>,
}

impl TokenIssuer {
    /// Create an issuer over a signer and an injected store
    #[must_use]
    pub fn new(signer: Arc<TokenSigner>, store: Arc<dyn RefreshRecordStore>) -> Self {
        Self { signer, store }
    }

    /// Sign a new pair for `identity` and make its refresh token the identity's only record
    ///
    /// Any refresh token previously issued to the identity stops working.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if signing or the store write fails; no
    /// pair is returned in that case
    pub async fn issue(&self, identity: &Identity) -> Result<TokenPair, AuthError> {
        let access = self.signer.issue(identity, TokenClass::Access)?;
        let refresh = self.signer.issue(identity, TokenClass::Refresh)?;

        if let Err(e) = self
            .store
            .put(identity.id, &refresh.token, refresh.expires_at)
            .await
        {
            AppLogger::log_auth_event(
                &identity.id.to_string(),
                "token_issue",
                false,
                Some("refresh record write failed"),
            );
            return Err(e.into());
        }

        AppLogger::log_auth_event(&identity.id.to_string(), "token_issue", true, None);

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
            access_expires_at: access.expires_at,
            refresh_expires_at: refresh.expires_at,
        })
    }
}
