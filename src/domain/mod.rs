//! Domain models for Donor Core

pub mod account;
pub mod activity;
pub mod address;
pub mod common;
pub mod donation;
pub mod donor;
pub mod submission;

pub use account::*;
pub use activity::*;
pub use address::*;
pub use common::*;
pub use donation::*;
pub use donor::*;
pub use submission::*;
