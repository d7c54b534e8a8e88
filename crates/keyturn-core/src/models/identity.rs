// ABOUTME: Identity and role types embedded in claims and exposed to protected handlers
// ABOUTME: UserRole parses and renders the USER/ADMIN strings used in storage and tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role attribute of an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Regular account
    #[default]
    User,
    /// Administrative account
    Admin,
}

impl UserRole {
    /// Storage and claim representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// The part of an identity the token lifecycle needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// Stable identity id
    pub id: Uuid,
    /// Role embedded into issued tokens
    pub role: UserRole,
}

impl Identity {
    /// Create an identity reference
    #[must_use]
    pub const fn new(id: Uuid, role: UserRole) -> Self {
        Self { id, role }
    }
}

/// Read-only context handed to handlers after a successful access token check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuthContext {
    /// Resolved identity id
    pub user_id: Uuid,
    /// Role carried by the access token
    pub role: UserRole,
}

impl AuthContext {
    /// Whether the resolved role is one of `allowed`
    #[must_use]
    pub fn has_any_role(&self, allowed: &[UserRole]) -> bool {
        allowed.contains(&self.role)
    }
}
