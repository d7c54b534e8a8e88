// ABOUTME: Unified error handling re-exported from keyturn-core
// ABOUTME: Keeps crate::errors paths stable for every module in the service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use keyturn_core::errors::*;
