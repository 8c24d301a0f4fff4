//! Extension points
//!
//! Integrators register transforms at fixed points of the donor lifecycle.
//! Each point holds an ordered chain; the value flows through every
//! registered transform once, in registration order, and the last output wins.

use crate::domain::{ActivityQuery, AddressValues, Donor};
use std::fmt;
use std::sync::Arc;

/// Transform applied at one extension point
pub type Filter<T> = Arc<dyn Fn(T, &Donor) -> T + Send + Sync>;

pub struct FilterChain<T> {
    filters: Vec<Filter<T>>,
}

impl<T> FilterChain<T> {
    pub fn new() -> Self {
        Self { filters: vec![] }
    }

    pub fn push<F>(&mut self, filter: F)
    where
        F: Fn(T, &Donor) -> T + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(filter));
    }

    pub fn apply(&self, value: T, donor: &Donor) -> T {
        self.filters
            .iter()
            .fold(value, |value, filter| filter(value, donor))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl<T> Default for FilterChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for FilterChain<T> {
    fn clone(&self) -> Self {
        Self {
            filters: self.filters.clone(),
        }
    }
}

impl<T> fmt::Debug for FilterChain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("filters", &self.filters.len())
            .finish()
    }
}

/// Registry of every donor extension point
#[derive(Debug, Clone, Default)]
pub struct DonorHooks {
    /// Attribute names making up a postal address
    pub address_fields: FilterChain<Vec<String>>,
    /// Values handed to the address formatter
    pub address_values: FilterChain<AddressValues>,
    /// Avatar markup; `None` after the chain falls back to the default renderer
    pub avatar: FilterChain<Option<String>>,
    /// Activity feed query descriptor, after caller overrides
    pub activity_query: FilterChain<ActivityQuery>,
}

impl DonorHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_address_fields<F>(mut self, filter: F) -> Self
    where
        F: Fn(Vec<String>, &Donor) -> Vec<String> + Send + Sync + 'static,
    {
        self.address_fields.push(filter);
        self
    }

    pub fn on_address_values<F>(mut self, filter: F) -> Self
    where
        F: Fn(AddressValues, &Donor) -> AddressValues + Send + Sync + 'static,
    {
        self.address_values.push(filter);
        self
    }

    pub fn on_avatar<F>(mut self, filter: F) -> Self
    where
        F: Fn(Option<String>, &Donor) -> Option<String> + Send + Sync + 'static,
    {
        self.avatar.push(filter);
        self
    }

    pub fn on_activity_query<F>(mut self, filter: F) -> Self
    where
        F: Fn(ActivityQuery, &Donor) -> ActivityQuery + Send + Sync + 'static,
    {
        self.activity_query.push(filter);
        self
    }
}
