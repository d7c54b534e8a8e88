// ABOUTME: Application constants re-exported from keyturn-core
// ABOUTME: Token lifetimes, password parameters, network defaults, and env var names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use keyturn_core::constants::*;
