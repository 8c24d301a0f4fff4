//! Caller-supplied donor submission

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names the registrar consumes from a submission
pub mod fields {
    pub const USER_EMAIL: &str = "user_email";
    pub const EMAIL: &str = "email";
    pub const USER_PASS: &str = "user_pass";
    pub const USER_LOGIN: &str = "user_login";
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
}

/// Field name to value mapping received from an untrusted caller.
///
/// Keys are matched exactly. A field holding `null` is treated as absent by
/// [`Submission::take_text`] and is left in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission(Map<String, Value>);

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(|value| !value.is_null())
    }

    /// Removes `key` and returns its text form, or `None` when it is absent or null.
    pub fn take_text(&mut self, key: &str) -> Option<String> {
        if !self.contains(key) {
            return None;
        }
        self.0.remove(key).map(|value| match value {
            Value::String(text) => text,
            other => other.to_string(),
        })
    }

    /// Takes the first of `keys` that is present, in order.
    pub fn take_first_text(&mut self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.take_text(key))
    }

    /// Drops `key` without reading it.
    pub fn discard(&mut self, key: &str) {
        self.0.remove(key);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_fields(self) -> impl Iterator<Item = (String, Value)> {
        self.0.into_iter()
    }
}

impl From<Map<String, Value>> for Submission {
    fn from(map: Map<String, Value>) -> Self {
        Submission(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Submission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Submission(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
