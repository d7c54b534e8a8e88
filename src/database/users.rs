// ABOUTME: User directory database operations
// ABOUTME: Handles account creation, lookup by id or email, and filtered paginated listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{User, UserListFilter, UserRole};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// Columns selected for every user query
const USER_COLUMNS: &str = "id, email, name, password_hash, role, created_at, updated_at";

/// Filter shared by the listing and its count; `?1` role, `?2` LIKE pattern
const USER_FILTER: &str = r"
    WHERE (?1 IS NULL OR role = ?1)
      AND (?2 IS NULL
           OR LOWER(email) LIKE ?2 ESCAPE '\'
           OR LOWER(COALESCE(name, '')) LIKE ?2 ESCAPE '\')
";

impl Database {
    /// Create the users table
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                name TEXT,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'USER' CHECK (role IN ('USER', 'ADMIN')),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create users table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_created_at ON users(created_at)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create users index: {e}")))?;

        Ok(())
    }

    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` if the email is taken, or
    /// `DATABASE_ERROR` if the insert fails otherwise
    pub async fn create_user(&self, user: &User) -> AppResult<Uuid> {
        sqlx::query(
            r"
            INSERT INTO users (id, email, name, password_hash, role, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(user.name.as_deref())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e
                .as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation())
            {
                AppError::already_exists("User with this email already exists")
            } else {
                AppError::database(format!("Failed to create user: {e}"))
            }
        })?;

        Ok(user.id)
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns `DATABASE_ERROR` if the query fails or the row is corrupt
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    /// Get a user by email
    ///
    /// # Errors
    ///
    /// Returns `DATABASE_ERROR` if the query fails or the row is corrupt
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user by email: {e}")))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    /// One page of users matching `filter`, newest first, with the total match count
    ///
    /// # Errors
    ///
    /// Returns `DATABASE_ERROR` if a query fails or a row is corrupt
    pub async fn list_users(&self, filter: &UserListFilter) -> AppResult<(Vec<User>, u64)> {
        let role = filter.role.map(UserRole::as_str);
        let pattern = filter.search_term().map(like_pattern);
        let limit = i64::from(filter.limit());
        let offset = i64::try_from(filter.offset())
            .map_err(|e| AppError::invalid_input(format!("Page out of range: {e}")))?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users {USER_FILTER}"))
            .bind(role)
            .bind(pattern.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count users: {e}")))?;

        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users {USER_FILTER} \
             ORDER BY created_at DESC, rowid DESC LIMIT ?3 OFFSET ?4"
        ))
        .bind(role)
        .bind(pattern.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list users: {e}")))?;

        let users = rows
            .iter()
            .map(Self::row_to_user)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((users, u64::try_from(total).unwrap_or(0)))
    }

    fn row_to_user(row: &SqliteRow) -> AppResult<User> {
        let id: String = row
            .try_get("id")
            .map_err(|e| AppError::database(format!("Failed to read user id: {e}")))?;
        let role: String = row
            .try_get("role")
            .map_err(|e| AppError::database(format!("Failed to read user role: {e}")))?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| AppError::database(format!("Failed to read created_at: {e}")))?;
        let updated_at: DateTime<Utc> = row
            .try_get("updated_at")
            .map_err(|e| AppError::database(format!("Failed to read updated_at: {e}")))?;

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::database(format!("Failed to parse user id UUID: {e}")))?,
            email: row
                .try_get("email")
                .map_err(|e| AppError::database(format!("Failed to read email: {e}")))?,
            name: row
                .try_get("name")
                .map_err(|e| AppError::database(format!("Failed to read name: {e}")))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| AppError::database(format!("Failed to read password_hash: {e}")))?,
            role: role.parse().map_err(AppError::database)?,
            created_at,
            updated_at,
        })
    }
}

/// Lowercased `%term%` with LIKE wildcards escaped
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
