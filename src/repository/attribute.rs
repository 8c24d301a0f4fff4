//! Per-account attribute store

use crate::domain::AccountId;
use crate::error::StoreResult;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::MySqlPool;

/// Key/value attributes attached to an account. Names are stored as given;
/// callers apply any namespacing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttributeStore: Send + Sync {
    async fn get(&self, id: AccountId, name: &str) -> StoreResult<Option<Value>>;
    async fn set(&self, id: AccountId, name: &str, value: &Value) -> StoreResult<()>;
}

pub struct MySqlAttributeStore {
    pool: MySqlPool,
}

impl MySqlAttributeStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttributeStore for MySqlAttributeStore {
    async fn get(&self, id: AccountId, name: &str) -> StoreResult<Option<Value>> {
        let row: Option<(Json<Value>,)> = sqlx::query_as(
            "SELECT value FROM account_attributes WHERE account_id = ? AND name = ?",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(Json(value),)| value))
    }

    async fn set(&self, id: AccountId, name: &str, value: &Value) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO account_attributes (account_id, name, value, updated_at)
            VALUES (?, ?, ?, NOW())
            ON DUPLICATE KEY UPDATE value = VALUES(value), updated_at = NOW()
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(Json(value))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
