//! Activity feed query descriptor

use super::common::AccountId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_PENDING_APPROVAL: &str = "pending-approval";
pub const STATUS_PUBLISHED: &str = "published";

pub const RECORD_DONATION: &str = "donation";
pub const RECORD_CAMPAIGN: &str = "campaign";

pub const ORDER_BY_DATE: &str = "date";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Parameters handed to the query engine for a donor's activity feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityQuery {
    pub author: AccountId,
    #[serde(rename = "post_status")]
    pub statuses: Vec<String>,
    #[serde(rename = "post_type")]
    pub record_types: Vec<String>,
    pub order: SortOrder,
    #[serde(rename = "orderby")]
    pub order_by: String,
    /// Engine parameters this core has no opinion on (paging, meta queries, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ActivityQuery {
    /// Completed, pending and published donations and campaigns by `author`, newest first.
    pub fn defaults_for(author: AccountId) -> Self {
        Self {
            author,
            statuses: vec![
                STATUS_COMPLETED.to_string(),
                STATUS_PENDING_APPROVAL.to_string(),
                STATUS_PUBLISHED.to_string(),
            ],
            record_types: vec![RECORD_DONATION.to_string(), RECORD_CAMPAIGN.to_string()],
            order: SortOrder::Desc,
            order_by: ORDER_BY_DATE.to_string(),
            extra: BTreeMap::new(),
        }
    }
}

/// Caller overrides; every `Some` replaces the default wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityOverrides {
    pub author: Option<AccountId>,
    #[serde(rename = "post_status")]
    pub statuses: Option<Vec<String>>,
    #[serde(rename = "post_type")]
    pub record_types: Option<Vec<String>>,
    pub order: Option<SortOrder>,
    #[serde(rename = "orderby")]
    pub order_by: Option<String>,
    /// Never holds a key that has a typed field above; see [`ActivityOverrides::param`].
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl ActivityOverrides {
    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn statuses<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statuses = Some(statuses.into_iter().map(Into::into).collect());
        self
    }

    pub fn record_types<I, S>(mut self, record_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record_types = Some(record_types.into_iter().map(Into::into).collect());
        self
    }

    /// Set an engine parameter by name. `author`, `post_status`, `post_type`,
    /// `order` and `orderby` are decoded into their typed fields and fail on a
    /// value of the wrong shape; any other key is passed through verbatim.
    pub fn param(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> serde_json::Result<Self> {
        let key = key.into();
        let value = value.into();
        match key.as_str() {
            "author" => self.author = Some(serde_json::from_value(value)?),
            "post_status" => self.statuses = Some(serde_json::from_value(value)?),
            "post_type" => self.record_types = Some(serde_json::from_value(value)?),
            "order" => self.order = Some(serde_json::from_value(value)?),
            "orderby" => self.order_by = Some(serde_json::from_value(value)?),
            _ => {
                self.extra.insert(key, value);
            }
        }
        Ok(self)
    }

    /// Engine parameters without a typed field
    pub fn params(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }

    /// Shallow, key-by-key merge over `defaults`.
    pub fn apply(self, mut defaults: ActivityQuery) -> ActivityQuery {
        if let Some(author) = self.author {
            defaults.author = author;
        }
        if let Some(statuses) = self.statuses {
            defaults.statuses = statuses;
        }
        if let Some(record_types) = self.record_types {
            defaults.record_types = record_types;
        }
        if let Some(order) = self.order {
            defaults.order = order;
        }
        if let Some(order_by) = self.order_by {
            defaults.order_by = order_by;
        }
        defaults.extra.extend(self.extra);
        defaults
    }
}
