//! Donor profile: identity loading and the address/avatar projections

use crate::domain::{
    attribute_key, AccountId, AddressValues, Donor, ADDRESS_FIELDS, ADDRESS_VALUE_ATTRIBUTES,
};
use crate::error::Result;
use crate::hooks::DonorHooks;
use crate::repository::{AccountStore, AttributeStore};
use crate::service::presentation::{AddressFormatter, AvatarRenderer};
use serde_json::Value;
use std::sync::Arc;

pub struct ProfileService<A: AccountStore, M: AttributeStore> {
    accounts: Arc<A>,
    attributes: Arc<M>,
    hooks: Arc<DonorHooks>,
    formatter: Arc<dyn AddressFormatter>,
    avatars: Arc<dyn AvatarRenderer>,
}

impl<A: AccountStore, M: AttributeStore> ProfileService<A, M> {
    pub fn new(
        accounts: Arc<A>,
        attributes: Arc<M>,
        hooks: Arc<DonorHooks>,
        formatter: Arc<dyn AddressFormatter>,
        avatars: Arc<dyn AvatarRenderer>,
    ) -> Self {
        Self {
            accounts,
            attributes,
            hooks,
            formatter,
            avatars,
        }
    }

    /// Resolve the donor for `id`. The anonymous id yields an anonymous donor
    /// without touching the store; unknown ids yield `None`.
    pub async fn load(&self, id: AccountId) -> Result<Option<Donor>> {
        if id.is_anonymous() {
            return Ok(Some(Donor::anonymous()));
        }
        Ok(self.accounts.find_by_id(id).await?.map(Donor::new))
    }

    /// Read donor attribute `name` (stored as `donor_<name>`).
    pub async fn attribute(&self, donor: &Donor, name: &str) -> Result<Option<Value>> {
        Ok(self.attributes.get(donor.id(), &attribute_key(name)).await?)
    }

    pub fn address_fields(&self, donor: &Donor) -> Vec<String> {
        let defaults = ADDRESS_FIELDS.iter().map(|f| f.to_string()).collect();
        self.hooks.address_fields.apply(defaults, donor)
    }

    /// Name from the account, the rest from donor attributes, then the
    /// address-values hook.
    pub async fn address_values(&self, donor: &Donor) -> Result<AddressValues> {
        let account = donor.account();
        let mut values = AddressValues {
            first_name: account.first_name.clone().unwrap_or_default(),
            last_name: account.last_name.clone().unwrap_or_default(),
            ..Default::default()
        };

        for name in ADDRESS_VALUE_ATTRIBUTES {
            let value = self.attribute(donor, name).await?;
            if let Some(slot) = values.slot_mut(name) {
                *slot = value.as_ref().map(attribute_text).unwrap_or_default();
            }
        }

        Ok(self.hooks.address_values.apply(values, donor))
    }

    pub async fn formatted_address(&self, donor: &Donor) -> Result<String> {
        let values = self.address_values(donor).await?;
        Ok(self.formatter.format(&values))
    }

    /// Hook-supplied markup wins outright; otherwise the fallback renderer.
    pub fn avatar_markup(&self, donor: &Donor, size: u32) -> String {
        match self.hooks.avatar.apply(None, donor) {
            Some(markup) => markup,
            None => self.avatars.render(donor, size),
        }
    }
}

fn attribute_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
