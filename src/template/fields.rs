use std::collections::HashMap;

use crate::error::{ AppError, Result };

/// Values printed on a property authentication certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateFields {
    pub property_address: String,
    pub year_built: String,
    pub square_footage: String,
    pub lot_size: String,
    pub inspection_date: String,
    pub authentication_number: String,
    pub registry_reference: String,
    pub signer_name: String,
    pub certification_number: String,
}

impl CertificateFields {
    /// Field names in the order they appear on the certificate.
    pub const NAMES: [&'static str; 9] = [
        "property_address",
        "year_built",
        "square_footage",
        "lot_size",
        "inspection_date",
        "authentication_number",
        "registry_reference",
        "signer_name",
        "certification_number",
    ];

    /// Build from a name/value map. Fails on the first absent field.
    pub fn from_map(values: &HashMap<String, String>) -> Result<Self> {
        let take = |name: &str| {
            values
                .get(name)
                .cloned()
                .ok_or_else(|| AppError::MissingField(name.to_string()))
        };

        Ok(Self {
            property_address: take("property_address")?,
            year_built: take("year_built")?,
            square_footage: take("square_footage")?,
            lot_size: take("lot_size")?,
            inspection_date: take("inspection_date")?,
            authentication_number: take("authentication_number")?,
            registry_reference: take("registry_reference")?,
            signer_name: take("signer_name")?,
            certification_number: take("certification_number")?,
        })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "property_address" => &self.property_address,
            "year_built" => &self.year_built,
            "square_footage" => &self.square_footage,
            "lot_size" => &self.lot_size,
            "inspection_date" => &self.inspection_date,
            "authentication_number" => &self.authentication_number,
            "registry_reference" => &self.registry_reference,
            "signer_name" => &self.signer_name,
            "certification_number" => &self.certification_number,
            _ => {
                return None;
            }
        };

        Some(value.as_str())
    }
}

/// Free-form title and body for the plain test document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicDocument {
    pub title: String,
    pub content: String,
}

impl BasicDocument {
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "title" => Some(self.title.as_str()),
            "content" => Some(self.content.as_str()),
            _ => None,
        }
    }
}
