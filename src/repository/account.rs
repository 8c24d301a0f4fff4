//! Account store

use crate::domain::{Account, AccountId, NewAccount};
use crate::error::{StoreError, StoreResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use sqlx::{FromRow, MySqlPool};
use std::collections::BTreeSet;
use validator::Validate;

const GENERATED_PASSWORD_LEN: usize = 24;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>>;
    async fn find_by_id(&self, id: AccountId) -> StoreResult<Option<Account>>;
    /// Must return `StoreError::Conflict` when the email or login is already taken.
    async fn create(&self, input: &NewAccount) -> StoreResult<AccountId>;
    /// Granting a capability the account already holds is a no-op.
    async fn grant_capability(&self, id: AccountId, capability: &str) -> StoreResult<()>;
}

#[derive(FromRow)]
struct AccountRow {
    id: AccountId,
    email: String,
    login: String,
    display_name: String,
    first_name: Option<String>,
    last_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self, capabilities: BTreeSet<String>) -> Account {
        Account {
            id: self.id,
            email: self.email,
            login: self.login,
            display_name: self.display_name,
            first_name: self.first_name,
            last_name: self.last_name,
            capabilities,
            created_at: self.created_at,
        }
    }
}

pub struct MySqlAccountStore {
    pool: MySqlPool,
}

impl MySqlAccountStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn capabilities(&self, id: AccountId) -> StoreResult<BTreeSet<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT capability FROM account_capabilities WHERE account_id = ?",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(capability,)| capability).collect())
    }

    async fn hydrate(&self, row: Option<AccountRow>) -> StoreResult<Option<Account>> {
        match row {
            Some(row) => {
                let capabilities = self.capabilities(row.id).await?;
                Ok(Some(row.into_account(capabilities)))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl AccountStore for MySqlAccountStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, login, display_name, first_name, last_name, created_at
            FROM accounts
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        self.hydrate(row).await
    }

    async fn find_by_id(&self, id: AccountId) -> StoreResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, login, display_name, first_name, last_name, created_at
            FROM accounts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.hydrate(row).await
    }

    async fn create(&self, input: &NewAccount) -> StoreResult<AccountId> {
        input.validate()?;

        let id = AccountId::new_v4();
        let password = input.password.clone().unwrap_or_else(generate_password);
        let password_hash = hash_password(&password)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, login, password_hash, display_name, first_name, last_name, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, NOW())
            "#,
        )
        .bind(id)
        .bind(&input.email)
        .bind(&input.login)
        .bind(&password_hash)
        .bind(&input.login)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .execute(&mut *tx)
        .await
        .map_err(StoreError::from_write)?;

        sqlx::query("INSERT INTO account_capabilities (account_id, capability) VALUES (?, ?)")
            .bind(id)
            .bind(&input.role)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::from_write)?;

        tx.commit().await?;
        Ok(id)
    }

    async fn grant_capability(&self, id: AccountId, capability: &str) -> StoreResult<()> {
        sqlx::query("INSERT IGNORE INTO account_capabilities (account_id, capability) VALUES (?, ?)")
            .bind(id)
            .bind(capability)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Password used when a submission does not carry one
fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

fn hash_password(password: &str) -> StoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StoreError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))
}
