//! Donor registration: reconcile a submission with an account

use crate::domain::{
    attribute_key, fields, Account, AccountId, NewAccount, Submission, DONOR_CAPABILITY,
};
use crate::error::{DonorError, Result, StoreError};
use crate::repository::{AccountStore, AttributeStore};
use crate::telemetry::metrics::{
    ATTRIBUTE_WRITE_FAILURES_TOTAL, REGISTRATIONS_TOTAL, REGISTRATION_FAILURES_TOTAL,
};
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Email field names, in lookup priority order
const EMAIL_FIELDS: [&str; 2] = [fields::USER_EMAIL, fields::EMAIL];

pub struct RegistrarService<A: AccountStore, M: AttributeStore> {
    accounts: Arc<A>,
    attributes: Arc<M>,
}

impl<A: AccountStore, M: AttributeStore> RegistrarService<A, M> {
    pub fn new(accounts: Arc<A>, attributes: Arc<M>) -> Self {
        Self {
            accounts,
            attributes,
        }
    }

    /// Create a donor from `submission`, or attach it to the account already
    /// holding the submitted email. Returns the account id.
    ///
    /// Fields not consumed by account creation are stored as `donor_<field>`
    /// attributes. Those writes are independent of each other: a failed write
    /// is logged and skipped.
    pub async fn create_or_attach(&self, mut submission: Submission) -> Result<AccountId> {
        let Some(email) = submission.take_first_text(&EMAIL_FIELDS) else {
            counter!(REGISTRATION_FAILURES_TOTAL, "reason" => "missing_email").increment(1);
            return Err(DonorError::MissingEmail);
        };

        let id = match self.accounts.find_by_email(&email).await? {
            Some(account) => {
                // A submitted password neither replaces the existing account's
                // credentials nor gets stored as a donor attribute.
                submission.discard(fields::USER_PASS);
                self.attach(&account).await?;
                counter!(REGISTRATIONS_TOTAL, "outcome" => "attached").increment(1);
                info!(account_id = %account.id, "Attached donor to existing account");
                account.id
            }
            None => self.create_account(email, &mut submission).await?,
        };

        self.store_attributes(id, submission).await;
        Ok(id)
    }

    /// Grant the donor capability to an existing account. No-op when it is
    /// already a donor; nothing else on the account changes.
    pub async fn attach(&self, account: &Account) -> Result<()> {
        if account.has_capability(DONOR_CAPABILITY) {
            debug!(account_id = %account.id, "Account is already a donor");
            return Ok(());
        }
        self.accounts
            .grant_capability(account.id, DONOR_CAPABILITY)
            .await?;
        Ok(())
    }

    async fn create_account(&self, email: String, submission: &mut Submission) -> Result<AccountId> {
        let request = NewAccount {
            login: submission
                .take_text(fields::USER_LOGIN)
                .unwrap_or_else(|| email.clone()),
            password: submission.take_text(fields::USER_PASS),
            first_name: submission.take_text(fields::FIRST_NAME),
            last_name: submission.take_text(fields::LAST_NAME),
            role: DONOR_CAPABILITY.to_string(),
            email,
        };

        match self.accounts.create(&request).await {
            Ok(id) => {
                counter!(REGISTRATIONS_TOTAL, "outcome" => "created").increment(1);
                info!(account_id = %id, "Created donor account");
                Ok(id)
            }
            Err(StoreError::Conflict(reason)) => self.resolve_conflict(&request, reason).await,
            Err(err) => {
                counter!(REGISTRATION_FAILURES_TOTAL, "reason" => "account_creation_failed")
                    .increment(1);
                warn!(error = %err, "Donor account creation failed");
                Err(DonorError::AccountCreationFailed(err))
            }
        }
    }

    /// A concurrent registration may have created the account between our
    /// lookup and insert. If the email now resolves, attach to that account.
    async fn resolve_conflict(&self, request: &NewAccount, reason: String) -> Result<AccountId> {
        match self.accounts.find_by_email(&request.email).await? {
            Some(account) => {
                self.attach(&account).await?;
                counter!(REGISTRATIONS_TOTAL, "outcome" => "attached").increment(1);
                info!(account_id = %account.id, "Account created concurrently, attached donor");
                Ok(account.id)
            }
            None => {
                counter!(REGISTRATION_FAILURES_TOTAL, "reason" => "account_creation_failed")
                    .increment(1);
                warn!(reason = %reason, "Donor account creation conflicted");
                Err(DonorError::AccountCreationFailed(StoreError::Conflict(
                    reason,
                )))
            }
        }
    }

    async fn store_attributes(&self, id: AccountId, submission: Submission) {
        for (field, value) in submission.into_fields() {
            let name = attribute_key(&field);
            if let Err(err) = self.attributes.set(id, &name, &value).await {
                counter!(ATTRIBUTE_WRITE_FAILURES_TOTAL).increment(1);
                warn!(account_id = %id, attribute = %name, error = %err, "Failed to store donor attribute");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::account::MockAccountStore;
    use crate::repository::attribute::MockAttributeStore;
    use mockall::predicate::*;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn create_test_service(
        accounts: MockAccountStore,
        attributes: MockAttributeStore,
    ) -> RegistrarService<MockAccountStore, MockAttributeStore> {
        RegistrarService::new(Arc::new(accounts), Arc::new(attributes))
    }

    fn existing_account(capabilities: &[&str]) -> Account {
        Account {
            id: AccountId::new_v4(),
            email: "a@x.com".to_string(),
            login: "ann".to_string(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect::<BTreeSet<_>>(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_email_has_no_side_effects() {
        let mut accounts = MockAccountStore::new();
        accounts.expect_find_by_email().never();
        accounts.expect_create().never();
        let mut attributes = MockAttributeStore::new();
        attributes.expect_set().never();

        let service = create_test_service(accounts, attributes);
        let submission = Submission::new().with("first_name", "Ann");

        let result = service.create_or_attach(submission).await;
        assert!(matches!(result, Err(DonorError::MissingEmail)));
    }

    #[tokio::test]
    async fn test_new_email_creates_donor_account() {
        let new_id = AccountId::new_v4();
        let mut accounts = MockAccountStore::new();
        accounts
            .expect_find_by_email()
            .with(eq("a@x.com"))
            .returning(|_| Ok(None));
        accounts
            .expect_create()
            .withf(|input| {
                input.email == "a@x.com"
                    && input.login == "a@x.com"
                    && input.password.is_none()
                    && input.first_name.as_deref() == Some("Ann")
                    && input.last_name.is_none()
                    && input.role == "donor"
            })
            .times(1)
            .returning(move |_| Ok(new_id));

        let mut attributes = MockAttributeStore::new();
        attributes
            .expect_set()
            .with(eq(new_id), eq("donor_custom_field"), eq(json!("v")))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = create_test_service(accounts, attributes);
        let submission = Submission::new()
            .with("email", "a@x.com")
            .with("first_name", "Ann")
            .with("custom_field", "v");

        let id = service.create_or_attach(submission).await.unwrap();
        assert_eq!(id, new_id);
    }

    #[tokio::test]
    async fn test_user_email_takes_priority_and_email_becomes_attribute() {
        let new_id = AccountId::new_v4();
        let mut accounts = MockAccountStore::new();
        accounts
            .expect_find_by_email()
            .with(eq("primary@x.com"))
            .returning(|_| Ok(None));
        accounts
            .expect_create()
            .withf(|input| input.email == "primary@x.com" && input.login == "custom-login")
            .returning(move |_| Ok(new_id));

        let mut attributes = MockAttributeStore::new();
        attributes
            .expect_set()
            .with(eq(new_id), eq("donor_email"), eq(json!("secondary@x.com")))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = create_test_service(accounts, attributes);
        let submission = Submission::new()
            .with("user_email", "primary@x.com")
            .with("email", "secondary@x.com")
            .with("user_login", "custom-login")
            .with("user_pass", "hunter2");

        assert_eq!(service.create_or_attach(submission).await.unwrap(), new_id);
    }

    #[tokio::test]
    async fn test_password_is_passed_to_store_not_attributes() {
        let mut accounts = MockAccountStore::new();
        accounts.expect_find_by_email().returning(|_| Ok(None));
        accounts
            .expect_create()
            .withf(|input| input.password.as_deref() == Some("hunter2"))
            .returning(|_| Ok(AccountId::new_v4()));
        let mut attributes = MockAttributeStore::new();
        attributes.expect_set().never();

        let service = create_test_service(accounts, attributes);
        let submission = Submission::new()
            .with("email", "a@x.com")
            .with("user_pass", "hunter2");

        assert!(service.create_or_attach(submission).await.is_ok());
    }

    #[tokio::test]
    async fn test_existing_non_donor_is_upgraded_in_place() {
        let account = existing_account(&["subscriber"]);
        let account_id = account.id;

        let mut accounts = MockAccountStore::new();
        accounts
            .expect_find_by_email()
            .returning(move |_| Ok(Some(account.clone())));
        accounts.expect_create().never();
        accounts
            .expect_grant_capability()
            .with(eq(account_id), eq("donor"))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut attributes = MockAttributeStore::new();
        attributes
            .expect_set()
            .with(eq(account_id), eq("donor_first_name"), eq(json!("Ann")))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = create_test_service(accounts, attributes);
        let submission = Submission::new()
            .with("email", "a@x.com")
            .with("first_name", "Ann")
            .with("user_pass", "hunter2");

        assert_eq!(service.create_or_attach(submission).await.unwrap(), account_id);
    }

    #[tokio::test]
    async fn test_existing_donor_is_not_regranted() {
        let account = existing_account(&["donor"]);
        let account_id = account.id;

        let mut accounts = MockAccountStore::new();
        accounts
            .expect_find_by_email()
            .returning(move |_| Ok(Some(account.clone())));
        accounts.expect_grant_capability().never();
        let attributes = MockAttributeStore::new();

        let service = create_test_service(accounts, attributes);
        let submission = Submission::new().with("email", "a@x.com");

        assert_eq!(service.create_or_attach(submission).await.unwrap(), account_id);
    }

    #[tokio::test]
    async fn test_creation_failure_skips_attribute_writes() {
        let mut accounts = MockAccountStore::new();
        accounts.expect_find_by_email().returning(|_| Ok(None));
        accounts
            .expect_create()
            .returning(|_| Err(StoreError::Validation("login: length".to_string())));
        let mut attributes = MockAttributeStore::new();
        attributes.expect_set().never();

        let service = create_test_service(accounts, attributes);
        let submission = Submission::new()
            .with("email", "a@x.com")
            .with("custom_field", "v");

        let result = service.create_or_attach(submission).await;
        assert!(matches!(
            result,
            Err(DonorError::AccountCreationFailed(StoreError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn test_conflict_attaches_to_concurrently_created_account() {
        let winner = existing_account(&["donor"]);
        let winner_id = winner.id;

        let mut accounts = MockAccountStore::new();
        let mut lookups = 0;
        accounts.expect_find_by_email().times(2).returning(move |_| {
            lookups += 1;
            if lookups == 1 {
                Ok(None)
            } else {
                Ok(Some(winner.clone()))
            }
        });
        accounts
            .expect_create()
            .returning(|_| Err(StoreError::Conflict("Duplicate entry".to_string())));
        accounts.expect_grant_capability().never();

        let mut attributes = MockAttributeStore::new();
        attributes
            .expect_set()
            .with(eq(winner_id), eq("donor_city"), eq(json!("Durban")))
            .returning(|_, _, _| Ok(()));

        let service = create_test_service(accounts, attributes);
        let submission = Submission::new()
            .with("email", "a@x.com")
            .with("city", "Durban");

        assert_eq!(service.create_or_attach(submission).await.unwrap(), winner_id);
    }

    #[tokio::test]
    async fn test_login_conflict_without_email_owner_fails() {
        let mut accounts = MockAccountStore::new();
        accounts.expect_find_by_email().times(2).returning(|_| Ok(None));
        accounts
            .expect_create()
            .returning(|_| Err(StoreError::Conflict("login taken".to_string())));
        let mut attributes = MockAttributeStore::new();
        attributes.expect_set().never();

        let service = create_test_service(accounts, attributes);
        let submission = Submission::new()
            .with("email", "a@x.com")
            .with("user_login", "taken");

        let result = service.create_or_attach(submission).await;
        assert!(matches!(
            result,
            Err(DonorError::AccountCreationFailed(StoreError::Conflict(_)))
        ));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_adapter_unavailable() {
        let mut accounts = MockAccountStore::new();
        accounts
            .expect_find_by_email()
            .returning(|_| Err(StoreError::Internal(anyhow::anyhow!("connection refused"))));
        let attributes = MockAttributeStore::new();

        let service = create_test_service(accounts, attributes);
        let result = service
            .create_or_attach(Submission::new().with("email", "a@x.com"))
            .await;
        assert!(matches!(result, Err(DonorError::AdapterUnavailable(_))));
    }

    #[tokio::test]
    async fn test_attribute_failure_does_not_halt_remaining_writes() {
        let new_id = AccountId::new_v4();
        let mut accounts = MockAccountStore::new();
        accounts.expect_find_by_email().returning(|_| Ok(None));
        accounts.expect_create().returning(move |_| Ok(new_id));

        let mut attributes = MockAttributeStore::new();
        attributes
            .expect_set()
            .with(always(), eq("donor_city"), always())
            .times(1)
            .returning(|_, _, _| Err(StoreError::Internal(anyhow::anyhow!("timeout"))));
        attributes
            .expect_set()
            .with(always(), eq("donor_country"), always())
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = create_test_service(accounts, attributes);
        let submission = Submission::new()
            .with("email", "a@x.com")
            .with("city", "Durban")
            .with("country", "ZA");

        assert_eq!(service.create_or_attach(submission).await.unwrap(), new_id);
    }
}
