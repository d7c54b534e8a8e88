// ABOUTME: Refresh record table with one-row-per-identity and single-statement mutations
// ABOUTME: Upsert replaces an identity's record; take deletes and returns a record atomically
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::RefreshRecord;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the `refresh_tokens` table
    ///
    /// `user_id` is UNIQUE: the schema itself allows at most one record per
    /// identity.
    pub(super) async fn migrate_refresh_tokens(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS refresh_tokens (
                token TEXT PRIMARY KEY,
                user_id TEXT NOT NULL UNIQUE,
                expires_at INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create refresh_tokens table: {e}")))?;

        Ok(())
    }

    /// Install `token` as the only refresh record for `user_id`
    ///
    /// One statement: any prior record of the identity is overwritten in place.
    ///
    /// # Errors
    ///
    /// Returns `DATABASE_ERROR` if the statement fails (including a token
    /// value already held by another identity)
    pub async fn upsert_refresh_token(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO refresh_tokens (token, user_id, expires_at, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(user_id) DO UPDATE SET
                token = excluded.token,
                expires_at = excluded.expires_at,
                created_at = excluded.created_at
            ",
        )
        .bind(token)
        .bind(user_id.to_string())
        .bind(expires_at.timestamp())
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to store refresh token: {e}")))?;

        Ok(())
    }

    /// Delete the record keyed by `token` and return it, if it existed
    ///
    /// The read and the delete are one statement, so two callers racing on the
    /// same token cannot both receive the row.
    ///
    /// # Errors
    ///
    /// Returns `DATABASE_ERROR` if the statement fails or the row is corrupt
    pub async fn take_refresh_token(&self, token: &str) -> AppResult<Option<RefreshRecord>> {
        let row = sqlx::query(
            r"
            DELETE FROM refresh_tokens
            WHERE token = $1
            RETURNING token, user_id, expires_at
            ",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to consume refresh token: {e}")))?;

        row.as_ref().map(Self::row_to_refresh_record).transpose()
    }

    /// Delete the record keyed by `token`; returns whether a row was removed
    ///
    /// # Errors
    ///
    /// Returns `DATABASE_ERROR` if the statement fails
    pub async fn delete_refresh_token(&self, token: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete refresh token: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Records currently held by `user_id`
    ///
    /// # Errors
    ///
    /// Returns `DATABASE_ERROR` if the query fails or a row is corrupt
    pub async fn get_refresh_tokens_for_user(&self, user_id: Uuid) -> AppResult<Vec<RefreshRecord>> {
        let rows = sqlx::query(
            r"
            SELECT token, user_id, expires_at
            FROM refresh_tokens
            WHERE user_id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list refresh tokens: {e}")))?;

        rows.iter().map(Self::row_to_refresh_record).collect()
    }

    fn row_to_refresh_record(row: &SqliteRow) -> AppResult<RefreshRecord> {
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| AppError::database(format!("Failed to read user_id: {e}")))?;
        let expires_at: i64 = row
            .try_get("expires_at")
            .map_err(|e| AppError::database(format!("Failed to read expires_at: {e}")))?;

        Ok(RefreshRecord {
            token: row
                .try_get("token")
                .map_err(|e| AppError::database(format!("Failed to read token: {e}")))?,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| AppError::database(format!("Failed to parse user_id UUID: {e}")))?,
            expires_at: DateTime::from_timestamp(expires_at, 0).ok_or_else(|| {
                AppError::database(format!("Refresh token expiry out of range: {expires_at}"))
            })?,
        })
    }
}
