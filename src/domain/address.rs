//! Address projection handed to the address formatter

use serde::{Deserialize, Serialize};

/// Field values a donor's printable address is built from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressValues {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub address: String,
    pub address_2: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub country: String,
}

impl AddressValues {
    /// Mutable slot for one attribute-backed field, by attribute name
    pub fn slot_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "company" => Some(&mut self.company),
            "address" => Some(&mut self.address),
            "address_2" => Some(&mut self.address_2),
            "city" => Some(&mut self.city),
            "state" => Some(&mut self.state),
            "postcode" => Some(&mut self.postcode),
            "country" => Some(&mut self.country),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Attribute-backed fields of [`AddressValues`], in projection order
pub const ADDRESS_VALUE_ATTRIBUTES: [&str; 7] = [
    "company",
    "address",
    "address_2",
    "city",
    "state",
    "postcode",
    "country",
];
