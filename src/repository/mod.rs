//! Collaborator stores (Repository pattern)

pub mod account;
pub mod attribute;
pub mod donation;
pub mod query;

pub use account::{AccountStore, MySqlAccountStore};
pub use attribute::{AttributeStore, MySqlAttributeStore};
pub use donation::{DonationStore, MySqlDonationStore};
pub use query::QueryEngine;

use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

use crate::config::DatabaseConfig;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DbPool {
    pool: MySqlPool,
}

impl DbPool {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;
        Ok(Self { pool })
    }

    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn inner(&self) -> &MySqlPool {
        &self.pool
    }

    pub fn account_store(&self) -> MySqlAccountStore {
        MySqlAccountStore::new(self.pool.clone())
    }

    pub fn attribute_store(&self) -> MySqlAttributeStore {
        MySqlAttributeStore::new(self.pool.clone())
    }

    pub fn donation_store(&self) -> MySqlDonationStore {
        MySqlDonationStore::new(self.pool.clone())
    }
}

impl std::ops::Deref for DbPool {
    type Target = MySqlPool;

    fn deref(&self) -> &Self::Target {
        &self.pool
    }
}
