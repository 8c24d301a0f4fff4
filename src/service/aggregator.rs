//! Donation aggregates for a donor

use crate::domain::{DonationRecord, Donor};
use crate::error::Result;
use crate::repository::DonationStore;
use crate::telemetry::metrics::AGGREGATE_QUERY_DURATION_SECONDS;
use metrics::histogram;
use std::sync::Arc;
use std::time::Instant;

/// Read-only projections over the donation store. Nothing is cached; every
/// call goes back to the store.
pub struct DonationAggregator<D: DonationStore> {
    donations: Arc<D>,
}

impl<D: DonationStore> DonationAggregator<D> {
    pub fn new(donations: Arc<D>) -> Self {
        Self { donations }
    }

    /// Number of donations; with `distinct_campaigns`, repeat donations to
    /// one campaign count once.
    pub async fn donation_count(&self, donor: &Donor, distinct_campaigns: bool) -> Result<u64> {
        let started = Instant::now();
        let count = self
            .donations
            .count_by_donor(donor.id(), distinct_campaigns)
            .await?;
        record_duration("count", started);
        Ok(count)
    }

    /// Sum of donation amounts, `0.0` when the donor has none.
    pub async fn total_donated(&self, donor: &Donor) -> Result<f64> {
        let started = Instant::now();
        let total = self.donations.sum_by_donor(donor.id()).await?;
        record_duration("sum", started);
        Ok(total.unwrap_or(0.0))
    }

    pub async fn donations(&self, donor: &Donor) -> Result<Vec<DonationRecord>> {
        let started = Instant::now();
        let records = self.donations.list_by_donor(donor.id()).await?;
        record_duration("list", started);
        Ok(records)
    }
}

fn record_duration(query: &'static str, started: Instant) {
    histogram!(AGGREGATE_QUERY_DURATION_SECONDS, "query" => query)
        .record(started.elapsed().as_secs_f64());
}
