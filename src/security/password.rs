// ABOUTME: One-way password digest primitive backed by bcrypt
// ABOUTME: Runs hashing and verification on the blocking pool to keep the executor free
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use tokio::task;

/// Hash `password` with bcrypt at `cost`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the cost is rejected or the blocking task fails
pub async fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    let password = password.to_owned();
    task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password hashing error: {e}")))
}

/// Check `password` against a stored bcrypt digest
///
/// A malformed digest counts as a mismatch.
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` only if the blocking task itself fails
pub async fn verify_password(password: &str, digest: &str) -> AppResult<bool> {
    let password = password.to_owned();
    let digest = digest.to_owned();
    task::spawn_blocking(move || match bcrypt::verify(&password, &digest) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password digest could not be parsed");
            false
        }
    })
    .await
    .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))
}
