// ABOUTME: Security primitives used around the token lifecycle
// ABOUTME: Currently the bcrypt password digest helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// bcrypt password hashing and verification off the async executor
pub mod password;

pub use password::{hash_password, verify_password};
