// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Account registration, login, and directory queries reusable outside HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! This module contains protocol-agnostic business logic extracted from route
//! handlers, so the seed binary and the HTTP routes apply the same rules.

/// Account registration, password login, and user directory queries
pub mod accounts;

pub use accounts::{AccountService, AuthSession, LoginRequest, RegisterRequest};
