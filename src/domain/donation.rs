//! Donation record domain model

use super::common::AccountId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row linking a donation to a campaign for a donor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DonationRecord {
    pub campaign_donation_id: u64,
    pub donation_id: u64,
    pub donor_id: AccountId,
    pub campaign_id: u64,
    pub campaign_name: String,
    pub amount: f64,
}
