//! Account domain model

use super::common::AccountId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

/// Capability marker held by every donor
pub const DONOR_CAPABILITY: &str = "donor";

/// Account as seen through the account store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub login: String,
    pub display_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub capabilities: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            id: AccountId::ANONYMOUS,
            email: String::new(),
            login: String::new(),
            display_name: String::new(),
            first_name: None,
            last_name: None,
            capabilities: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }
}

impl Account {
    pub fn has_capability(&self, name: &str) -> bool {
        self.capabilities.contains(name)
    }
}

/// Input for creating a new account
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct NewAccount {
    #[validate(length(min = 1, max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 60))]
    pub login: String,
    /// `None` lets the store pick its default (a generated password)
    pub password: Option<String>,
    #[validate(length(max = 255))]
    pub first_name: Option<String>,
    #[validate(length(max = 255))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub role: String,
}
