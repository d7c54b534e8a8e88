// ABOUTME: Token lifecycle facade binding issuance, rotation, revocation, and authorization
// ABOUTME: Owns the signer and the injected refresh store shared by all four operations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Token Lifecycle
//!
//! The operations the request layer binds to:
//!
//! - [`TokenLifecycle::issue_for_identity`] on login and registration
//! - [`TokenLifecycle::rotate`] on refresh requests
//! - [`TokenLifecycle::revoke`] on logout
//! - [`TokenLifecycle::authorize`] on every protected request
//!
//! The store is an explicit dependency; nothing here is a process global.

/// Pair minting and refresh record installation
pub mod issuance;
/// Single-use refresh token exchange and revocation
pub mod rotation;

pub use issuance::TokenIssuer;
pub use rotation::TokenRotator;

use crate::auth::TokenSigner;
use crate::errors::AuthError;
use crate::middleware::auth::AuthorizationGate;
use crate::models::{AuthContext, Identity, TokenPair};
use crate::store::RefreshRecordStore;
use std::sync::Arc;

/// Entry point for every credential operation
#[derive(Clone)]
pub struct TokenLifecycle {
    signer: Arc<TokenSigner>,
    store: Arc<dyn RefreshRecordStore>,
    issuer: TokenIssuer,
    rotator: TokenRotator,
    gate: AuthorizationGate,
}

impl TokenLifecycle {
    /// Wire the components around one signer and one store
    #[must_use]
    pub fn new(signer: TokenSigner, store: Arc<dyn RefreshRecordStore>) -> Self {
        let signer = Arc::new(signer);
        let issuer = TokenIssuer::new(Arc::clone(&signer), Arc::clone(&store));
        let rotator = TokenRotator::new(Arc::clone(&signer), Arc::clone(&store), issuer.clone());
        let gate = AuthorizationGate::new(Arc::clone(&signer));
        Self {
            signer,
            store,
            issuer,
            rotator,
            gate,
        }
    }

    /// Mint a pair for `identity`, superseding its previous refresh token
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] on signing or store failure
    pub async fn issue_for_identity(&self, identity: &Identity) -> Result<TokenPair, AuthError> {
        self.issuer.issue(identity).await
    }

    /// Exchange a refresh token for a new pair, at most once per token
    ///
    /// # Errors
    ///
    /// See [`TokenRotator::rotate`]
    pub async fn rotate(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        self.rotator.rotate(refresh_token).await
    }

    /// Forget a refresh token; idempotent
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] only on store failure
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.rotator.revoke(refresh_token).await
    }

    /// Verify an access token and expose its identity
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] for any invalid or expired token
    pub fn authorize(&self, access_token: &str) -> Result<AuthContext, AuthError> {
        self.gate.authorize(access_token)
    }

    /// The signer shared by all operations
    #[must_use]
    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    /// The injected refresh store
    #[must_use]
    pub fn store(&self) -> &Arc<dyn RefreshRecordStore> {
        &self.store
    }

    /// The authorization gate for request handlers
    #[must_use]
    pub const fn gate(&self) -> &AuthorizationGate {
        &self.gate
    }
}
