//! Presentation collaborators: address formatting and avatar rendering

use crate::config::AvatarConfig;
use crate::domain::{AddressValues, Donor};
use sha2::{Digest, Sha256};

/// Turns projected address values into a display string
#[cfg_attr(test, mockall::automock)]
pub trait AddressFormatter: Send + Sync {
    fn format(&self, values: &AddressValues) -> String;
}

/// Fallback avatar markup used when no avatar hook supplies one
#[cfg_attr(test, mockall::automock)]
pub trait AvatarRenderer: Send + Sync {
    fn render(&self, donor: &Donor, size: u32) -> String;
}

/// One line per non-empty part: name, company, street lines, locality, country.
#[derive(Debug, Clone, Default)]
pub struct LineAddressFormatter;

impl AddressFormatter for LineAddressFormatter {
    fn format(&self, values: &AddressValues) -> String {
        let name = join_non_empty(&[&values.first_name, &values.last_name], " ");
        let locality = join_non_empty(&[&values.city, &values.state, &values.postcode], " ");

        [
            name.as_str(),
            values.company.as_str(),
            values.address.as_str(),
            values.address_2.as_str(),
            locality.as_str(),
            values.country.as_str(),
        ]
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
    }
}

fn join_non_empty(parts: &[&String], separator: &str) -> String {
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Gravatar image markup keyed by the SHA-256 of the normalized email
#[derive(Debug, Clone)]
pub struct GravatarRenderer {
    config: AvatarConfig,
}

impl GravatarRenderer {
    pub fn new(config: AvatarConfig) -> Self {
        Self { config }
    }

    pub fn url(&self, email: &str, size: u32) -> String {
        let hash = hex::encode(Sha256::digest(email.trim().to_lowercase().as_bytes()));
        format!(
            "{}/{}?s={}&d={}&r={}",
            self.config.base_url.trim_end_matches('/'),
            hash,
            size,
            self.config.default_image,
            self.config.rating
        )
    }
}

impl Default for GravatarRenderer {
    fn default() -> Self {
        Self::new(AvatarConfig::default())
    }
}

impl AvatarRenderer for GravatarRenderer {
    fn render(&self, donor: &Donor, size: u32) -> String {
        let size = if size == 0 {
            self.config.default_size
        } else {
            size
        };
        format!(
            "<img alt=\"\" src=\"{}\" class=\"avatar avatar-{size} photo\" height=\"{size}\" width=\"{size}\" />",
            self.url(donor.email(), size)
        )
    }
}
