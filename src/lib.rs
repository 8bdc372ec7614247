//! Register-map spreadsheet to IP-XACT converter.
//!
//! A register map is authored as a workbook: a vendor sheet naming the
//! component, an address-map sheet listing address blocks, and one register
//! sheet per block with one row per bit field. Register names may be
//! templates such as `CH{n}_CTRL, n=range(0,4)` that describe a family of
//! identical registers laid out at a fixed stride.
//!
//! # Usage
//!
//! Place the following to the Cargo.toml:
//!
//! ```toml
//! [dependencies]
//! regsheet = { version = "0.1.0" }
//! ```
//!
//! Then build a [`Workbook`] (or deserialize one) and run it through a
//! [`Config`]:
//!
//! ```
//! use regsheet::{ipxact::Version, Cell, Config, Sheet, Workbook};
//!
//! let workbook = Workbook::new()
//!     .sheet(
//!         Sheet::new("version", ["VENDOR", "LIBRARY", "NAME", "VERSION"])
//!             .row(["acme", "ip", "timer", "1.0"]),
//!     )
//!     .sheet(
//!         Sheet::new("address_map", ["BLOCK", "OFFSET", "RANGE"])
//!             .row(["regs", "0x0", "0x100"]),
//!     )
//!     .sheet(
//!         Sheet::new("regs", ["ADDR", "REG", "FIELD", "BIT", "WIDTH", "ATTRIBUTE", "DEFAULT"])
//!             .row([
//!                 Cell::from("0x0"),
//!                 "CH{n}_CTRL, n=range(0,2)".into(),
//!                 "EN".into(),
//!                 "[0]".into(),
//!                 Cell::Int(1),
//!                 "RW".into(),
//!                 "0".into(),
//!             ]),
//!     );
//! let conversion = Config::new().convert(&workbook);
//! assert!(conversion.diagnostics.is_empty());
//! let xml = conversion.to_xml(Version::V2014).unwrap();
//! assert!(xml.contains("<ipxact:name>CH_1</ipxact:name>"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

pub mod assemble;
pub mod attribute;
pub mod component;
pub mod diagnostic;
pub mod expand;
pub mod ipxact;
pub mod iteration;
pub mod parse;
pub mod row;
pub mod sheet;
pub mod stride;

pub use self::{
    assemble::{Assembler, ExpandedField, ExpandedRegister},
    attribute::{Access, Attribute, AttributeDecoder, ModifiedWrite, ReadAction, StandardCodes},
    component::{AddressBlock, ComponentIdentity},
    diagnostic::{Context, Diagnostic, Diagnostics, Kind, Rank},
    iteration::IterationSpec,
    row::{ExpandedFieldRow, RawFieldRow},
    sheet::{Cell, Sheet, Workbook},
};

use self::{
    diagnostic::emit,
    expand::expand_rows,
    ipxact::Version,
    row::REGISTER_COLUMNS,
};
use eyre::Result;
use std::{fs, path::Path};

/// Options to configure how a workbook is converted.
pub struct Config {
    vendor_sheet: String,
    address_sheet: String,
    version: Version,
    decoder: Box<dyn AttributeDecoder + Send + Sync>,
    blank_fields_reserved: bool,
}

/// Result of converting a workbook.
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct Conversion {
    /// Component identity, absent if the vendor sheet could not be read.
    pub component: Option<ComponentIdentity>,
    /// Address blocks in address-map order, with their registers.
    pub blocks: Vec<AddressBlock>,
    /// Everything that was skipped or could not be read.
    pub diagnostics: Diagnostics,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vendor_sheet: "version".to_owned(),
            address_sheet: "address_map".to_owned(),
            version: Version::default(),
            decoder: Box::new(StandardCodes),
            blank_fields_reserved: false,
        }
    }
}

impl Config {
    /// Creates a default set of options ready for configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name of the sheet holding the component identity.
    pub fn vendor_sheet(&mut self, name: impl Into<String>) -> &mut Self {
        self.vendor_sheet = name.into();
        self
    }

    /// Sets the name of the sheet listing address blocks.
    pub fn address_sheet(&mut self, name: impl Into<String>) -> &mut Self {
        self.address_sheet = name.into();
        self
    }

    /// Sets the IP-XACT version [`Config::generate`] emits.
    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = version;
        self
    }

    /// Replaces the attribute-code vocabulary.
    pub fn decoder(&mut self, decoder: impl AttributeDecoder + Send + Sync + 'static) -> &mut Self {
        self.decoder = Box::new(decoder);
        self
    }

    /// Treats rows with a blank field name as reserved ranges for every
    /// register, templated or not.
    pub fn blank_fields_reserved(&mut self, blank_fields_reserved: bool) -> &mut Self {
        self.blank_fields_reserved = blank_fields_reserved;
        self
    }

    /// Converts `workbook`.
    ///
    /// Problems are collected in [`Conversion::diagnostics`] and never stop
    /// the conversion.
    pub fn convert(&self, workbook: &Workbook) -> Conversion {
        let mut diagnostics = Diagnostics::new();
        let component = match workbook.get(&self.vendor_sheet) {
            Some(sheet) => component::identity(sheet, &mut diagnostics),
            None => {
                let diagnostic = Diagnostic::missing_sheet(&self.vendor_sheet, Context::new());
                emit(&mut diagnostics, diagnostic);
                None
            }
        };
        let mut blocks = match workbook.get(&self.address_sheet) {
            Some(sheet) => component::address_blocks(sheet, &mut diagnostics),
            None => {
                let diagnostic = Diagnostic::missing_sheet(&self.address_sheet, Context::new());
                emit(&mut diagnostics, diagnostic);
                Vec::new()
            }
        };
        for block in &mut blocks {
            let Some(sheet) = workbook.get(&block.name) else {
                emit(&mut diagnostics, Diagnostic::missing_sheet(&block.name, Context::new()));
                continue;
            };
            block.registers = self.registers(sheet, &mut diagnostics);
            log::debug!("{}: {} registers", block.name, block.registers.len());
        }
        Conversion { component, blocks, diagnostics }
    }

    /// Converts `workbook` and writes the configured IP-XACT version to
    /// `path`.
    pub fn generate<P: AsRef<Path>>(&self, workbook: &Workbook, path: P) -> Result<Conversion> {
        let conversion = self.convert(workbook);
        conversion.write(path, self.version)?;
        Ok(conversion)
    }

    fn registers(&self, sheet: &Sheet, diagnostics: &mut Diagnostics) -> Vec<ExpandedRegister> {
        if let Err(diagnostic) = sheet.require(REGISTER_COLUMNS) {
            emit(diagnostics, diagnostic);
            return Vec::new();
        }
        let context = Context::new().and(sheet.name.clone());
        let rows = expand_rows(&RawFieldRow::from_sheet(sheet), &context, diagnostics);
        Assembler::new(self.decoder.as_ref())
            .blank_fields_reserved(self.blank_fields_reserved)
            .assemble(&rows, &context, diagnostics)
    }
}

impl Conversion {
    /// Renders the conversion as an IP-XACT document.
    pub fn to_xml(&self, version: Version) -> Result<String> {
        ipxact::render(self, version)
    }

    /// Renders the conversion as an IP-XACT document and writes it to `path`.
    pub fn write<P: AsRef<Path>>(&self, path: P, version: Version) -> Result<()> {
        fs::write(path, self.to_xml(version)?)?;
        Ok(())
    }

    /// Returns `true` if any error-ranked diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|diagnostic| *diagnostic.rank() == Rank::Error)
    }
}
