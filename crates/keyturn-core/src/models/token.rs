// ABOUTME: Token class, issued token pair, and persisted refresh record types
// ABOUTME: RefreshRecord is the only durable structure owned by the token lifecycle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Which kind of credential a token is; each class signs with its own secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenClass {
    /// Short-lived, self-verifying credential
    Access,
    /// Long-lived, store-backed, single-use credential
    Refresh,
}

impl TokenClass {
    /// Claim representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Freshly minted access/refresh pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,
    /// Signed refresh token (also the refresh record key)
    pub refresh_token: String,
    /// Expiry of the access token
    pub access_expires_at: DateTime<Utc>,
    /// Expiry of the refresh token and its record
    pub refresh_expires_at: DateTime<Utc>,
}

/// Persisted refresh token bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRecord {
    /// Opaque refresh token value (primary key)
    pub token: String,
    /// Owning identity
    pub user_id: Uuid,
    /// Moment the record stops being redeemable
    pub expires_at: DateTime<Utc>,
}

impl RefreshRecord {
    /// Create a record
    #[must_use]
    pub const fn new(token: String, user_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            token,
            user_id,
            expires_at,
        }
    }

    /// Whether the record is past its expiry at `now`
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
