//! Register-sheet records before and after expansion.

use crate::sheet::{Cell, Row, Sheet};

/// Columns every register sheet must have.
pub const REGISTER_COLUMNS: &[&str] = &["ADDR", "REG", "FIELD", "BIT", "WIDTH"];

/// One register-sheet record as authored.
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawFieldRow {
    /// Register address, inherited from the preceding row when blank.
    pub address: Option<String>,
    /// Register name, possibly an iteration template.
    pub register: Option<String>,
    /// Field name. `None` denotes an unnamed bit range.
    pub field: Option<String>,
    /// Bit-range notation.
    pub bit: Cell,
    /// Field width in bits.
    pub width: Cell,
    /// Attribute code.
    pub attribute: Option<String>,
    /// Default value notation.
    pub default: Cell,
    /// Free-form description.
    pub description: Option<String>,
    /// Explicit stride override in bytes.
    pub stride: Cell,
    /// Explicit register size override in bits.
    pub reg_size: Cell,
    /// 1-based position among the sheet's data rows.
    pub source_row: usize,
}

/// One field record after expansion.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct ExpandedFieldRow {
    /// Concrete register address.
    pub address: u64,
    /// Concrete register name.
    pub register: String,
    /// Field name. `None` denotes an unnamed bit range.
    pub field: Option<String>,
    /// Bit-range notation.
    pub bit: Cell,
    /// Field width in bits.
    pub width: Cell,
    /// Attribute code.
    pub attribute: Option<String>,
    /// Default value notation.
    pub default: Cell,
    /// Free-form description.
    pub description: Option<String>,
    /// Distance between register instances in bytes.
    pub stride: u64,
    /// 1-based position of the originating row among the sheet's data rows.
    pub source_row: usize,
}

impl RawFieldRow {
    /// Reads the register columns of `row`.
    pub fn from_row(row: &Row<'_>) -> Self {
        Self {
            address: row.text("ADDR"),
            register: row.text("REG"),
            field: row.text("FIELD"),
            bit: row.get("BIT").clone(),
            width: row.get("WIDTH").clone(),
            attribute: row.text("ATTRIBUTE"),
            default: row.get("DEFAULT").clone(),
            description: row.text("DESCRIPTION"),
            stride: row.get("STRIDE").clone(),
            reg_size: row.get("REG_SIZE").clone(),
            source_row: 0,
        }
    }

    /// Reads all rows of a register sheet in order.
    pub fn from_sheet(sheet: &Sheet) -> Vec<Self> {
        sheet
            .rows()
            .enumerate()
            .map(|(index, row)| Self { source_row: index + 1, ..Self::from_row(&row) })
            .collect()
    }

    /// Returns `true` if the row names a field.
    pub fn has_field(&self) -> bool {
        self.field.is_some()
    }

    /// Builds the expanded counterpart of this row.
    pub(crate) fn expand(&self, address: u64, register: String, stride: u64) -> ExpandedFieldRow {
        ExpandedFieldRow {
            address,
            register,
            field: self.field.clone(),
            bit: self.bit.clone(),
            width: self.width.clone(),
            attribute: self.attribute.clone(),
            default: self.default.clone(),
            description: self.description.clone(),
            stride,
            source_row: self.source_row,
        }
    }
}

impl ExpandedFieldRow {
    /// Returns the address in `0x` + uppercase hex notation.
    pub fn address_text(&self) -> String {
        format!("0x{:X}", self.address)
    }
}
