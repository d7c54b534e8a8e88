// ABOUTME: Core types and constants for the keyturn token lifecycle service
// ABOUTME: Foundation crate with error handling, identity/token models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Keyturn Core
//!
//! Foundation crate providing shared types and constants for the keyturn
//! credential service. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and the `AuthError` taxonomy
//! - **models**: Identity, role, token class, token pair, and refresh record types
//! - **constants**: Default lifetimes, environment variable names, and service identifiers

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Core data models (identity, roles, token classes, refresh records)
pub mod models;

/// Application constants organized by domain
pub mod constants;
