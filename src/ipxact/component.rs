use super::register::Register;
use super::{Version, XSI};
use crate::component::{AddressBlock as Block, ComponentIdentity};
use serde::Serialize;

/// Component layout of 1685-2014 and 1685-2022.
#[derive(Serialize)]
pub(super) struct Component<'a> {
    #[serde(rename = "@xmlns:ipxact")]
    xmlns: &'static str,
    #[serde(rename = "@xmlns:xsi")]
    xmlns_xsi: &'static str,
    #[serde(rename = "@xsi:schemaLocation")]
    schema_location: String,
    #[serde(rename = "ipxact:vendor")]
    vendor: &'a str,
    #[serde(rename = "ipxact:library")]
    library: &'a str,
    #[serde(rename = "ipxact:name")]
    name: &'a str,
    #[serde(rename = "ipxact:version")]
    version: &'a str,
    #[serde(rename = "ipxact:description", skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(rename = "ipxact:memoryMaps")]
    memory_maps: MemoryMaps<'a>,
}

/// Component layout of 1685-2009, where the description follows the memory
/// maps.
#[derive(Serialize)]
pub(super) struct LegacyComponent<'a> {
    #[serde(rename = "@xmlns:ipxact")]
    xmlns: &'static str,
    #[serde(rename = "@xmlns:xsi")]
    xmlns_xsi: &'static str,
    #[serde(rename = "@xsi:schemaLocation")]
    schema_location: String,
    #[serde(rename = "ipxact:vendor")]
    vendor: &'a str,
    #[serde(rename = "ipxact:library")]
    library: &'a str,
    #[serde(rename = "ipxact:name")]
    name: &'a str,
    #[serde(rename = "ipxact:version")]
    version: &'a str,
    #[serde(rename = "ipxact:memoryMaps")]
    memory_maps: MemoryMaps<'a>,
    #[serde(rename = "ipxact:description", skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

#[derive(Serialize)]
struct MemoryMaps<'a> {
    #[serde(rename = "ipxact:memoryMap")]
    memory_map: MemoryMap<'a>,
}

#[derive(Serialize)]
struct MemoryMap<'a> {
    #[serde(rename = "ipxact:name")]
    name: &'a str,
    #[serde(rename = "ipxact:addressBlock")]
    address_blocks: Vec<AddressBlock<'a>>,
}

#[derive(Serialize)]
struct AddressBlock<'a> {
    #[serde(rename = "ipxact:name")]
    name: &'a str,
    #[serde(rename = "ipxact:description", skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(rename = "ipxact:baseAddress")]
    base_address: &'a str,
    #[serde(rename = "ipxact:range")]
    range: &'a str,
    #[serde(rename = "ipxact:width")]
    width: u32,
    #[serde(rename = "ipxact:register")]
    registers: Vec<Register<'a>>,
}

impl<'a> Component<'a> {
    pub(super) fn new(
        identity: &'a ComponentIdentity,
        blocks: &'a [Block],
        version: Version,
    ) -> Self {
        Self {
            xmlns: version.namespace(),
            xmlns_xsi: XSI,
            schema_location: version.schema_location(),
            vendor: &identity.vendor,
            library: &identity.library,
            name: &identity.name,
            version: &identity.version,
            description: identity.description.as_deref(),
            memory_maps: MemoryMaps::new(identity, blocks, version),
        }
    }
}

impl<'a> LegacyComponent<'a> {
    pub(super) fn new(
        identity: &'a ComponentIdentity,
        blocks: &'a [Block],
        version: Version,
    ) -> Self {
        Self {
            xmlns: version.namespace(),
            xmlns_xsi: XSI,
            schema_location: version.schema_location(),
            vendor: &identity.vendor,
            library: &identity.library,
            name: &identity.name,
            version: &identity.version,
            memory_maps: MemoryMaps::new(identity, blocks, version),
            description: identity.description.as_deref(),
        }
    }
}

impl<'a> MemoryMaps<'a> {
    fn new(identity: &'a ComponentIdentity, blocks: &'a [Block], version: Version) -> Self {
        Self {
            memory_map: MemoryMap {
                name: &identity.name,
                address_blocks: blocks
                    .iter()
                    .map(|block| AddressBlock {
                        name: &block.name,
                        description: block.description.as_deref(),
                        base_address: &block.offset,
                        range: &block.range,
                        width: block.width,
                        registers: block
                            .registers
                            .iter()
                            .map(|register| Register::new(register, version))
                            .collect(),
                    })
                    .collect(),
            },
        }
    }
}
