//! Business logic layer

pub mod activity;
pub mod aggregator;
pub mod presentation;
pub mod profile;
pub mod registrar;

pub use activity::ActivityComposer;
pub use aggregator::DonationAggregator;
pub use presentation::{AddressFormatter, AvatarRenderer, GravatarRenderer, LineAddressFormatter};
pub use profile::ProfileService;
pub use registrar::RegistrarService;
