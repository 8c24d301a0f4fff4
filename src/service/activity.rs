//! Activity feed query composition

use crate::domain::{ActivityOverrides, ActivityQuery, Donor};
use crate::error::Result;
use crate::hooks::DonorHooks;
use crate::repository::QueryEngine;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub struct ActivityComposer {
    hooks: Arc<DonorHooks>,
}

impl ActivityComposer {
    pub fn new(hooks: Arc<DonorHooks>) -> Self {
        Self { hooks }
    }

    /// Defaults for `donor`, overridden key-by-key by `overrides`, then
    /// rewritten by the activity hook. The hook output is returned as is.
    pub fn build(&self, donor: &Donor, overrides: ActivityOverrides) -> ActivityQuery {
        let merged = overrides.apply(ActivityQuery::defaults_for(donor.id()));
        self.hooks.activity_query.apply(merged, donor)
    }

    /// Hand the composed descriptor to `engine` for one page of records.
    pub async fn fetch<Q: QueryEngine + ?Sized>(
        &self,
        engine: &Q,
        donor: &Donor,
        overrides: ActivityOverrides,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>> {
        let query = self.build(donor, overrides);
        debug!(author = %query.author, page, per_page, "Fetching donor activity");
        Ok(engine.fetch(&query, page, per_page).await?)
    }
}
