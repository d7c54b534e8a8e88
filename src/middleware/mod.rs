// ABOUTME: Request middleware for authenticating callers
// ABOUTME: Exposes the bearer access token authorization gate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Bearer access token verification and role checks
pub mod auth;

pub use auth::AuthorizationGate;
