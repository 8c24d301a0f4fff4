//! Generic record query engine

use crate::domain::ActivityQuery;
use crate::error::StoreResult;
use async_trait::async_trait;
use serde_json::Value;

/// Executes composed query descriptors. Record shape and ordering belong to
/// the engine; this crate only builds the descriptor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Fetches one page (1-based) of matching records.
    async fn fetch(&self, query: &ActivityQuery, page: u32, per_page: u32)
        -> StoreResult<Vec<Value>>;
}
