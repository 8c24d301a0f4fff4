//! Donor Core - donor identity reconciliation and donation aggregation
//!
//! Layers donor semantics over external account, attribute and donation
//! stores: registering donors from submissions, projecting their profile,
//! aggregating their donations and composing their activity feed query.

pub mod config;
pub mod domain;
pub mod error;
pub mod hooks;
pub mod migration;
pub mod repository;
pub mod service;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{DonorError, Result, StoreError, StoreResult};
