// ABOUTME: Authorization gate verifying bearer access tokens for protected requests
// ABOUTME: Resolves identity and role from the token alone and enforces role allow-lists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::auth::TokenSigner;
use crate::errors::AuthError;
use crate::logging::AppLogger;
use crate::models::{AuthContext, TokenClass, UserRole};
use std::sync::Arc;
use tracing::field::Empty;
use tracing::Span;

/// Per-request access token check
///
/// Never consults the refresh store: an access token stays valid until its own
/// expiry even after logout or rotation.
#[derive(Clone)]
pub struct AuthorizationGate {
    signer: Arc<TokenSigner>,
}

impl AuthorizationGate {
    /// Create a gate over the shared signer
    #[must_use]
    pub const fn new(signer: Arc<TokenSigner>) -> Self {
        Self { signer }
    }

    /// Verify an access token and return the identity it carries
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] if the token is malformed, signed
    /// with another key (a refresh token included), or expired
    pub fn authorize(&self, access_token: &str) -> Result<AuthContext, AuthError> {
        let verified = self
            .signer
            .verify(access_token, TokenClass::Access)
            .map_err(|e| {
                tracing::debug!(error = %e, "Access token rejected");
                AuthError::Unauthorized
            })?;

        Ok(AuthContext {
            user_id: verified.user_id,
            role: verified.role,
        })
    }

    /// Authenticate from an `Authorization` header value
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] if the header is missing, not a
    /// `Bearer` credential, empty, or carries an invalid access token
    #[tracing::instrument(
        skip(self, auth_header),
        fields(user_id = Empty, success = Empty)
    )]
    pub fn authenticate_request(&self, auth_header: Option<&str>) -> Result<AuthContext, AuthError> {
        // Security: do not log header content
        let Some(header) = auth_header else {
            tracing::debug!("Authentication failed: missing authorization header");
            Span::current().record("success", false);
            return Err(AuthError::Unauthorized);
        };

        let token = match header.trim().split_once(' ') {
            Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token.trim(),
            _ => {
                tracing::debug!("Authentication failed: authorization header is not a bearer token");
                Span::current().record("success", false);
                return Err(AuthError::Unauthorized);
            }
        };
        if token.is_empty() {
            Span::current().record("success", false);
            return Err(AuthError::Unauthorized);
        }

        match self.authorize(token) {
            Ok(context) => {
                Span::current()
                    .record("user_id", context.user_id.to_string())
                    .record("success", true);
                Ok(context)
            }
            Err(e) => {
                Span::current().record("success", false);
                Err(e)
            }
        }
    }

    /// Ensure the resolved role is one of `allowed`
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Forbidden`] when it is not
    pub fn require_role(context: &AuthContext, allowed: &[UserRole]) -> Result<(), AuthError> {
        if context.has_any_role(allowed) {
            return Ok(());
        }
        AppLogger::log_security_event(
            "role_denied",
            "low",
            &format!("role {} not in allowed set", context.role),
            Some(&context.user_id.to_string()),
        );
        Err(AuthError::Forbidden)
    }

    /// Authenticate from a header and require one of `allowed` roles
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] for a bad credential and
    /// [`AuthError::Forbidden`] for a valid one without an allowed role
    pub fn authorize_with_roles(
        &self,
        auth_header: Option<&str>,
        allowed: &[UserRole],
    ) -> Result<AuthContext, AuthError> {
        let context = self.authenticate_request(auth_header)?;
        Self::require_role(&context, allowed)?;
        Ok(context)
    }
}
