//! Component identity and address blocks read from the vendor and
//! address-map sheets.

use crate::assemble::ExpandedRegister;
use crate::diagnostic::{emit, Context, Diagnostic, Diagnostics};
use crate::sheet::Sheet;

/// Columns every vendor sheet must have.
pub const VENDOR_COLUMNS: &[&str] = &["VENDOR", "LIBRARY", "NAME", "VERSION"];

/// Columns every address-map sheet must have.
pub const ADDRESS_MAP_COLUMNS: &[&str] = &["BLOCK", "OFFSET", "RANGE"];

/// Bus width every address block is published with.
pub const BLOCK_WIDTH: u32 = 32;

/// Vendor, library, name and version of the described component.
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentIdentity {
    /// Vendor name.
    pub vendor: String,
    /// Library name.
    pub library: String,
    /// Component name.
    pub name: String,
    /// Component version.
    pub version: String,
    /// Free-form description.
    pub description: Option<String>,
}

/// An address block and the registers it contains.
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddressBlock {
    /// Block name, also the name of its register sheet.
    pub name: String,
    /// Base address as authored.
    pub offset: String,
    /// Address range as authored.
    pub range: String,
    /// Bus width in bits.
    pub width: u32,
    /// Free-form description.
    pub description: Option<String>,
    /// Registers of the block.
    pub registers: Vec<ExpandedRegister>,
}

/// Reads the component identity from the first row of a vendor sheet.
pub fn identity(sheet: &Sheet, diagnostics: &mut Diagnostics) -> Option<ComponentIdentity> {
    let context = Context::new().and(sheet.name.clone());
    if let Err(diagnostic) = sheet.require(VENDOR_COLUMNS) {
        emit(diagnostics, diagnostic);
        return None;
    }
    let Some(row) = sheet.rows().next() else {
        emit(diagnostics, Diagnostic::empty_sheet(&sheet.name, context));
        return None;
    };
    let text = |column| row.get(column).to_string().trim().to_owned();
    Some(ComponentIdentity {
        vendor: text("VENDOR"),
        library: text("LIBRARY"),
        name: text("NAME"),
        version: text("VERSION"),
        description: row.text("DESCRIPTION"),
    })
}

/// Reads one address block per row of an address-map sheet, with no
/// registers.
pub fn address_blocks(sheet: &Sheet, diagnostics: &mut Diagnostics) -> Vec<AddressBlock> {
    if let Err(diagnostic) = sheet.require(ADDRESS_MAP_COLUMNS) {
        emit(diagnostics, diagnostic);
        return Vec::new();
    }
    sheet
        .rows()
        .map(|row| {
            let text = |column| row.get(column).to_string().trim().to_owned();
            AddressBlock {
                name: text("BLOCK"),
                offset: text("OFFSET"),
                range: text("RANGE"),
                width: BLOCK_WIDTH,
                description: row.text("DESCRIPTION"),
                registers: Vec::new(),
            }
        })
        .collect()
}
