//! IP-XACT (IEEE 1685) document emission.

mod component;
mod field;
mod register;

use self::component::{Component, LegacyComponent};
use crate::Conversion;
use eyre::{eyre, Result};
use quick_xml::se::Serializer;
use serde::Serialize;
use std::{fmt, str::FromStr};

const PREFIX: &str = "ipxact";
const ROOT: &str = "ipxact:component";
const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Revision of the IP-XACT schema to emit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Version {
    /// IEEE 1685-2009.
    V2009,
    /// IEEE 1685-2014.
    #[default]
    V2014,
    /// IEEE 1685-2022.
    V2022,
}

impl Version {
    /// Returns the standard designation, e.g. `1685-2014`.
    pub fn as_str(self) -> &'static str {
        match self {
            Version::V2009 => "1685-2009",
            Version::V2014 => "1685-2014",
            Version::V2022 => "1685-2022",
        }
    }

    fn namespace(self) -> &'static str {
        match self {
            Version::V2009 => "http://www.spiritconsortium.org/XMLSchema/SPIRIT/1685-2009",
            Version::V2014 => "http://www.accellera.org/XMLSchema/IPXACT/1685-2014",
            Version::V2022 => "http://www.accellera.org/XMLSchema/IPXACT/1685-2022",
        }
    }

    /// Returns the namespace prefix the version is conventionally written
    /// with.
    pub fn prefix(self) -> &'static str {
        match self {
            Version::V2009 => "spirit",
            Version::V2014 | Version::V2022 => "ipxact",
        }
    }

    fn schema_location(self) -> String {
        let namespace = self.namespace();
        format!("{namespace} {namespace}/index.xsd")
    }
}

impl FromStr for Version {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1685-2009" => Ok(Version::V2009),
            "1685-2014" => Ok(Version::V2014),
            "1685-2022" => Ok(Version::V2022),
            other => Err(eyre!("unsupported IP-XACT version: {other}")),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders `conversion` as an IP-XACT document.
pub(crate) fn render(conversion: &Conversion, version: Version) -> Result<String> {
    let identity = conversion
        .component
        .as_ref()
        .ok_or_else(|| eyre!("no component identity; the vendor sheet could not be processed"))?;
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    match version {
        Version::V2009 => {
            serialize(&mut xml, &LegacyComponent::new(identity, &conversion.blocks, version))?;
        }
        Version::V2014 | Version::V2022 => {
            serialize(&mut xml, &Component::new(identity, &conversion.blocks, version))?;
        }
    }
    xml.push('\n');
    Ok(rename_prefix(xml, version.prefix()))
}

/// Rebinds the `ipxact` prefix the elements are declared with to `prefix`.
///
/// Markup is the only place `<` appears unescaped, and the namespace
/// declaration sits in the root start tag.
fn rename_prefix(xml: String, prefix: &str) -> String {
    if prefix == PREFIX {
        return xml;
    }
    let xml = xml
        .replace(&format!("<{PREFIX}:"), &format!("<{prefix}:"))
        .replace(&format!("</{PREFIX}:"), &format!("</{prefix}:"));
    let root = xml.find(&format!("<{prefix}:component")).unwrap_or(0);
    let end = xml[root..].find('>').map_or(xml.len(), |end| root + end);
    let declaration = format!("xmlns:{PREFIX}=");
    let Some(start) = xml[root..end].find(&declaration).map(|start| root + start) else {
        return xml;
    };
    format!("{}xmlns:{prefix}={}", &xml[..start], &xml[start + declaration.len()..])
}

fn serialize(xml: &mut String, value: &impl Serialize) -> Result<()> {
    let mut serializer = Serializer::with_root(xml, Some(ROOT))?;
    serializer.indent(' ', 2);
    value.serialize(serializer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_round_trip() {
        for version in [Version::V2009, Version::V2014, Version::V2022] {
            assert_eq!(version.as_str().parse::<Version>().unwrap(), version);
        }
        assert!("1685-2024".parse::<Version>().is_err());
        assert_eq!(Version::default(), Version::V2014);
    }

    #[test]
    fn legacy_prefix() {
        let xml = "<?xml version=\"1.0\"?>\n\
                   <ipxact:component xmlns:ipxact=\"ns\">\n  \
                   <ipxact:name>a &lt;ipxact:b xmlns:ipxact=</ipxact:name>\n\
                   </ipxact:component>\n";
        assert_eq!(
            rename_prefix(xml.to_owned(), Version::V2009.prefix()),
            "<?xml version=\"1.0\"?>\n\
             <spirit:component xmlns:spirit=\"ns\">\n  \
             <spirit:name>a &lt;ipxact:b xmlns:ipxact=</spirit:name>\n\
             </spirit:component>\n"
        );
        assert_eq!(rename_prefix(xml.to_owned(), Version::V2014.prefix()), xml);
    }

    #[test]
    fn render_requires_identity() {
        let conversion = Conversion::default();
        let err = render(&conversion, Version::V2014).unwrap_err();
        assert!(err.to_string().contains("vendor sheet"));
    }
}
