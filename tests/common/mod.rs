//! Common test utilities
//!
//! In-memory stores standing in for the account, attribute and donation
//! adapters, so the services can be exercised without a database.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use donor_core::domain::{Account, AccountId, DonationRecord, NewAccount};
use donor_core::error::{StoreError, StoreResult};
use donor_core::repository::{AccountStore, AttributeStore, DonationStore};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap, HashSet};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct TestAccountStore {
    accounts: RwLock<Vec<Account>>,
    passwords: RwLock<HashMap<AccountId, Option<String>>>,
    grants: RwLock<Vec<(AccountId, String)>>,
}

impl TestAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_account(&self, email: &str, capabilities: &[&str]) -> AccountId {
        let account = Account {
            id: AccountId::new_v4(),
            email: email.to_string(),
            login: email.to_string(),
            display_name: email.to_string(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        };
        let id = account.id;
        self.accounts.write().await.push(account);
        id
    }

    pub async fn get(&self, id: AccountId) -> Option<Account> {
        self.accounts.read().await.iter().find(|a| a.id == id).cloned()
    }

    pub async fn count(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn password_of(&self, id: AccountId) -> Option<String> {
        self.passwords.read().await.get(&id).cloned().flatten()
    }

    pub async fn grant_calls(&self) -> usize {
        self.grants.read().await.len()
    }
}

#[async_trait]
impl AccountStore for TestAccountStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> StoreResult<Option<Account>> {
        Ok(self.get(id).await)
    }

    async fn create(&self, input: &NewAccount) -> StoreResult<AccountId> {
        let mut accounts = self.accounts.write().await;
        if accounts
            .iter()
            .any(|a| a.email == input.email || a.login == input.login)
        {
            return Err(StoreError::Conflict(format!(
                "Duplicate entry '{}'",
                input.login
            )));
        }

        let account = Account {
            id: AccountId::new_v4(),
            email: input.email.clone(),
            login: input.login.clone(),
            display_name: input.login.clone(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            capabilities: BTreeSet::from([input.role.clone()]),
            created_at: Utc::now(),
        };
        let id = account.id;
        accounts.push(account);
        self.passwords
            .write()
            .await
            .insert(id, input.password.clone());
        Ok(id)
    }

    async fn grant_capability(&self, id: AccountId, capability: &str) -> StoreResult<()> {
        self.grants.write().await.push((id, capability.to_string()));
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("Account {} not found", id)))?;
        account.capabilities.insert(capability.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct TestAttributeStore {
    values: RwLock<HashMap<(AccountId, String), Value>>,
    failing: RwLock<HashSet<String>>,
}

impl TestAttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make writes of attribute `name` fail
    pub async fn fail_on(&self, name: &str) {
        self.failing.write().await.insert(name.to_string());
    }

    pub async fn names_for(&self, id: AccountId) -> BTreeSet<String> {
        self.values
            .read()
            .await
            .keys()
            .filter(|(owner, _)| *owner == id)
            .map(|(_, name)| name.clone())
            .collect()
    }
}

#[async_trait]
impl AttributeStore for TestAttributeStore {
    async fn get(&self, id: AccountId, name: &str) -> StoreResult<Option<Value>> {
        Ok(self
            .values
            .read()
            .await
            .get(&(id, name.to_string()))
            .cloned())
    }

    async fn set(&self, id: AccountId, name: &str, value: &Value) -> StoreResult<()> {
        if self.failing.read().await.contains(name) {
            return Err(StoreError::Internal(anyhow::anyhow!(
                "attribute store rejected {}",
                name
            )));
        }
        self.values
            .write()
            .await
            .insert((id, name.to_string()), value.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct TestDonationStore {
    records: RwLock<Vec<DonationRecord>>,
}

impl TestDonationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, donor_id: AccountId, campaign_id: u64, amount: f64) {
        let mut records = self.records.write().await;
        let next = records.len() as u64 + 1;
        records.push(DonationRecord {
            campaign_donation_id: next,
            donation_id: next,
            donor_id,
            campaign_id,
            campaign_name: format!("Campaign {}", campaign_id),
            amount,
        });
    }
}

#[async_trait]
impl DonationStore for TestDonationStore {
    async fn list_by_donor(&self, donor_id: AccountId) -> StoreResult<Vec<DonationRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.donor_id == donor_id)
            .cloned()
            .collect())
    }

    async fn count_by_donor(&self, donor_id: AccountId, distinct: bool) -> StoreResult<u64> {
        let records = self.list_by_donor(donor_id).await?;
        let count = if distinct {
            records
                .iter()
                .map(|r| r.campaign_id)
                .collect::<HashSet<_>>()
                .len()
        } else {
            records.len()
        };
        Ok(count as u64)
    }

    async fn sum_by_donor(&self, donor_id: AccountId) -> StoreResult<Option<f64>> {
        let records = self.list_by_donor(donor_id).await?;
        if records.is_empty() {
            return Ok(None);
        }
        Ok(Some(records.iter().map(|r| r.amount).sum()))
    }
}
