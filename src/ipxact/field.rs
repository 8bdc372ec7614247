use super::Version;
use crate::assemble::ExpandedField;
use serde::Serialize;

#[derive(Serialize)]
pub(super) struct Field<'a> {
    #[serde(rename = "ipxact:name")]
    name: &'a str,
    #[serde(rename = "ipxact:description", skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(rename = "ipxact:bitOffset")]
    bit_offset: u32,
    #[serde(rename = "ipxact:resets", skip_serializing_if = "Option::is_none")]
    resets: Option<Resets<'a>>,
    #[serde(rename = "ipxact:bitWidth")]
    bit_width: u32,
    #[serde(rename = "ipxact:access", skip_serializing_if = "Option::is_none")]
    access: Option<&'static str>,
    #[serde(rename = "ipxact:modifiedWriteValue", skip_serializing_if = "Option::is_none")]
    modified_write_value: Option<&'static str>,
    #[serde(rename = "ipxact:readAction", skip_serializing_if = "Option::is_none")]
    read_action: Option<&'static str>,
    #[serde(rename = "ipxact:fieldAccessPolicies", skip_serializing_if = "Option::is_none")]
    field_access_policies: Option<FieldAccessPolicies>,
}

#[derive(Serialize)]
struct Resets<'a> {
    #[serde(rename = "ipxact:reset")]
    reset: Reset<'a>,
}

#[derive(Serialize)]
struct Reset<'a> {
    #[serde(rename = "ipxact:value")]
    value: &'a str,
}

#[derive(Serialize)]
struct FieldAccessPolicies {
    #[serde(rename = "ipxact:fieldAccessPolicy")]
    field_access_policy: AccessPolicy,
}

#[derive(Default, Serialize)]
struct AccessPolicy {
    #[serde(rename = "ipxact:access", skip_serializing_if = "Option::is_none")]
    access: Option<&'static str>,
    #[serde(rename = "ipxact:modifiedWriteValue", skip_serializing_if = "Option::is_none")]
    modified_write_value: Option<&'static str>,
    #[serde(rename = "ipxact:readAction", skip_serializing_if = "Option::is_none")]
    read_action: Option<&'static str>,
}

impl<'a> Field<'a> {
    pub(super) fn new(field: &'a ExpandedField, version: Version) -> Self {
        let policy = AccessPolicy {
            access: field.access.map(|access| access.as_str()),
            modified_write_value: field.modified_write.map(|value| value.as_str()),
            read_action: field.read_action.map(|action| action.as_str()),
        };
        let (inline, field_access_policies) = match version {
            Version::V2022 => (
                AccessPolicy::default(),
                (!policy.is_empty())
                    .then_some(FieldAccessPolicies { field_access_policy: policy }),
            ),
            Version::V2009 | Version::V2014 => (policy, None),
        };
        let resets = match version {
            Version::V2009 => None,
            Version::V2014 | Version::V2022 => field
                .default_text
                .as_deref()
                .map(|value| Resets { reset: Reset { value } }),
        };
        Self {
            name: &field.name,
            description: field.description.as_deref(),
            bit_offset: field.bit_low,
            resets,
            bit_width: field.width,
            access: inline.access,
            modified_write_value: inline.modified_write_value,
            read_action: inline.read_action,
            field_access_policies,
        }
    }
}

impl AccessPolicy {
    fn is_empty(&self) -> bool {
        self.access.is_none() && self.modified_write_value.is_none() && self.read_action.is_none()
    }
}
