//! # Session Repository
//!
//! Small key/value store standing in for browser local storage. The
//! storefront keeps the signed-in user name under
//! [`USER_NAME_KEY`](shelf_core::USER_NAME_KEY).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use shelf_core::USER_NAME_KEY;

/// Repository for session values.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SessionRepository { pool }
    }

    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value = sqlx::query_scalar("SELECT value FROM session_values WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO session_values (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        debug!(key = %key, "Session value stored");
        Ok(())
    }

    /// Removes `key`. Returns `false` if it was not set.
    pub async fn remove(&self, key: &str) -> DbResult<bool> {
        let removed = sqlx::query("DELETE FROM session_values WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(removed > 0)
    }

    /// The stored user name, ignoring an empty value.
    pub async fn stored_user_name(&self) -> DbResult<Option<String>> {
        Ok(self.get(USER_NAME_KEY).await?.filter(|name| !name.is_empty()))
    }

    pub async fn store_user_name(&self, name: &str) -> DbResult<()> {
        self.set(USER_NAME_KEY, name).await
    }

    pub async fn forget_user_name(&self) -> DbResult<bool> {
        self.remove(USER_NAME_KEY).await
    }
}
