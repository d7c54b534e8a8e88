// ABOUTME: Core data models for identities, roles, and credential records
// ABOUTME: Re-exports UserRole, Identity, AuthContext, TokenClass, TokenPair, RefreshRecord
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Identity data is owned by the user directory; these types only carry the
//! parts the token lifecycle reads (the stable id and the role). Token types
//! describe what is handed to callers and what the refresh store persists.

mod identity;
mod token;

pub use identity::{AuthContext, Identity, UserRole};
pub use token::{RefreshRecord, TokenClass, TokenPair};
