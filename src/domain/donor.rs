//! Donor identity

use super::account::{Account, DONOR_CAPABILITY};
use super::common::AccountId;
use serde::Serialize;

/// Prefix applied to donor attribute names in the attribute store
pub const ATTRIBUTE_PREFIX: &str = "donor_";

/// Name under which attribute `name` is persisted
pub fn attribute_key(name: &str) -> String {
    format!("{ATTRIBUTE_PREFIX}{name}")
}

/// Canonical postal address attribute names, in display order
pub const ADDRESS_FIELDS: [&str; 6] = ["address", "address_2", "city", "state", "postcode", "country"];

/// A person identity backed by exactly one account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Donor {
    account: Account,
}

impl Donor {
    pub fn new(account: Account) -> Self {
        Self { account }
    }

    /// Donor standing in for a visitor with no account
    pub fn anonymous() -> Self {
        Self::new(Account::default())
    }

    pub fn id(&self) -> AccountId {
        self.account.id
    }

    pub fn email(&self) -> &str {
        &self.account.email
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn is_authenticated(&self) -> bool {
        !self.account.id.is_anonymous()
    }

    pub fn has_donor_capability(&self) -> bool {
        self.account.has_capability(DONOR_CAPABILITY)
    }

    pub fn display_label(&self) -> &str {
        &self.account.display_name
    }
}

impl From<Account> for Donor {
    fn from(account: Account) -> Self {
        Self::new(account)
    }
}
