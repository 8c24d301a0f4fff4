//! Donation record store

use crate::domain::{AccountId, DonationRecord};
use crate::error::StoreResult;
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonationStore: Send + Sync {
    async fn list_by_donor(&self, donor_id: AccountId) -> StoreResult<Vec<DonationRecord>>;
    /// With `distinct`, donations to the same campaign count once.
    async fn count_by_donor(&self, donor_id: AccountId, distinct: bool) -> StoreResult<u64>;
    /// `None` when the donor has no donations.
    async fn sum_by_donor(&self, donor_id: AccountId) -> StoreResult<Option<f64>>;
}

pub struct MySqlDonationStore {
    pool: MySqlPool,
}

impl MySqlDonationStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DonationStore for MySqlDonationStore {
    async fn list_by_donor(&self, donor_id: AccountId) -> StoreResult<Vec<DonationRecord>> {
        let records = sqlx::query_as::<_, DonationRecord>(
            r#"
            SELECT campaign_donation_id, donation_id, donor_id, campaign_id, campaign_name,
                   CAST(amount AS DOUBLE) AS amount
            FROM campaign_donations
            WHERE donor_id = ?
            ORDER BY campaign_donation_id
            "#,
        )
        .bind(donor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn count_by_donor(&self, donor_id: AccountId, distinct: bool) -> StoreResult<u64> {
        let sql = if distinct {
            "SELECT COUNT(DISTINCT campaign_id) FROM campaign_donations WHERE donor_id = ?"
        } else {
            "SELECT COUNT(*) FROM campaign_donations WHERE donor_id = ?"
        };

        let row: (i64,) = sqlx::query_as(sql)
            .bind(donor_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0.max(0) as u64)
    }

    async fn sum_by_donor(&self, donor_id: AccountId) -> StoreResult<Option<f64>> {
        let row: (Option<f64>,) = sqlx::query_as(
            "SELECT CAST(SUM(amount) AS DOUBLE) FROM campaign_donations WHERE donor_id = ?",
        )
        .bind(donor_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }
}
