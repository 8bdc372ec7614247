use super::field::Field;
use super::Version;
use crate::assemble::ExpandedRegister;
use serde::Serialize;

#[derive(Serialize)]
pub(super) struct Register<'a> {
    #[serde(rename = "ipxact:name")]
    name: &'a str,
    #[serde(rename = "ipxact:description", skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(rename = "ipxact:addressOffset")]
    address_offset: String,
    /// Register size in bits.
    #[serde(rename = "ipxact:size")]
    size: u64,
    /// Composite reset, only carried by 1685-2009 registers.
    #[serde(rename = "ipxact:reset", skip_serializing_if = "Option::is_none")]
    reset: Option<RegisterReset>,
    #[serde(rename = "ipxact:field")]
    fields: Vec<Field<'a>>,
}

#[derive(Serialize)]
struct RegisterReset {
    #[serde(rename = "ipxact:value")]
    value: String,
}

impl<'a> Register<'a> {
    pub(super) fn new(register: &'a ExpandedRegister, version: Version) -> Self {
        Self {
            name: &register.name,
            description: register.description.as_deref(),
            address_offset: register.address_text(),
            size: register.size(),
            reset: (version == Version::V2009)
                .then(|| RegisterReset { value: format!("{:#x}", register.reset) }),
            fields: register.fields.iter().map(|field| Field::new(field, version)).collect(),
        }
    }
}
