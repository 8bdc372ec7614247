//! Grouping of expanded rows into registers with decoded fields.

use crate::attribute::{Access, AttributeDecoder, ModifiedWrite, ReadAction};
use crate::diagnostic::{emit, Context, Diagnostic, Diagnostics};
use crate::parse::{parse_bit_range, parse_default, parse_int};
use crate::row::ExpandedFieldRow;
use indexmap::IndexMap;

/// A concrete register with its fields.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpandedRegister {
    /// Concrete register name.
    pub name: String,
    /// Register address.
    pub address: u64,
    /// Register size in bytes, also the distance between instances.
    pub stride: u64,
    /// Description of the register's first row.
    pub description: Option<String>,
    /// Fields in input order, reserved ranges excluded.
    pub fields: Vec<ExpandedField>,
    /// Union of every field default shifted into position.
    pub reset: u64,
}

/// A decoded bit field.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpandedField {
    /// Field name.
    pub name: String,
    /// Least significant bit.
    pub bit_low: u32,
    /// Most significant bit.
    pub bit_high: u32,
    /// Width in bits.
    pub width: u32,
    /// Access rights.
    pub access: Option<Access>,
    /// Write side effect.
    pub modified_write: Option<ModifiedWrite>,
    /// Read side effect.
    pub read_action: Option<ReadAction>,
    /// Reset value of the field.
    pub default: Option<i64>,
    /// Reset value as authored.
    pub default_text: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
}

/// Builds registers out of expanded rows.
pub struct Assembler<'a> {
    decoder: &'a dyn AttributeDecoder,
    blank_fields_reserved: bool,
}

impl ExpandedRegister {
    /// Register size in bits.
    pub fn size(&self) -> u64 {
        self.stride.saturating_mul(8)
    }

    /// Returns the address in `0x` + uppercase hex notation.
    pub fn address_text(&self) -> String {
        format!("0x{:X}", self.address)
    }
}

impl<'a> Assembler<'a> {
    /// Creates an assembler decoding attribute codes with `decoder`.
    pub fn new(decoder: &'a dyn AttributeDecoder) -> Self {
        Self { decoder, blank_fields_reserved: false }
    }

    /// Treats rows with a blank field name as reserved ranges.
    ///
    /// Off by default: blank rows of templated registers then become fields
    /// with an empty name.
    #[must_use]
    pub fn blank_fields_reserved(mut self, blank_fields_reserved: bool) -> Self {
        self.blank_fields_reserved = blank_fields_reserved;
        self
    }

    /// Groups `rows` by register name and builds one register per group.
    ///
    /// Registers left with no fields are omitted.
    pub fn assemble(
        &self,
        rows: &[ExpandedFieldRow],
        context: &Context,
        diagnostics: &mut Diagnostics,
    ) -> Vec<ExpandedRegister> {
        let mut groups = IndexMap::<&str, Vec<&ExpandedFieldRow>>::new();
        for row in rows {
            groups.entry(row.register.as_str()).or_default().push(row);
        }
        groups
            .into_iter()
            .filter_map(|(name, rows)| self.register(name, &rows, context, diagnostics))
            .collect()
    }

    fn register(
        &self,
        name: &str,
        rows: &[&ExpandedFieldRow],
        context: &Context,
        diagnostics: &mut Diagnostics,
    ) -> Option<ExpandedRegister> {
        let first = rows.first()?;
        let context = context.clone().and(name);
        let mut reset = 0;
        let mut fields = Vec::new();
        for row in rows {
            if self.is_reserved(row.field.as_deref()) {
                continue;
            }
            if let Some(field) = self.field(row, &context, diagnostics) {
                if let Some(default) = field.default {
                    reset |= reset_bits(default, field.width, field.bit_low);
                }
                fields.push(field);
            }
        }
        (!fields.is_empty()).then(|| ExpandedRegister {
            name: name.to_owned(),
            address: first.address,
            stride: first.stride,
            description: first.description.clone(),
            fields,
            reset,
        })
    }

    fn field(
        &self,
        row: &ExpandedFieldRow,
        context: &Context,
        diagnostics: &mut Diagnostics,
    ) -> Option<ExpandedField> {
        let name = row.field.clone().unwrap_or_default();
        let context = context.clone().and(name.as_str());
        let Some((bits, width)) = parse_bit_range(&row.bit).and_then(|bits| {
            let width = parse_int(&row.width)
                .and_then(|width| u32::try_from(width).ok())
                .filter(|&width| width > 0)
                .or_else(|| bits.width())?;
            Some((bits, width))
        }) else {
            let diagnostic =
                Diagnostic::malformed_bit_range(&name, &row.bit, row.source_row, context);
            emit(diagnostics, diagnostic);
            return None;
        };

        let code = row.attribute.as_deref().unwrap_or_default();
        let attribute = self.decoder.decode(code);
        for (category, unknown) in [
            ("access", attribute.access.is_unknown()),
            ("modified write", attribute.modified_write.is_unknown()),
            ("read action", attribute.read_action.is_unknown()),
        ] {
            if unknown {
                emit(diagnostics, Diagnostic::unknown_attribute(category, code, context.clone()));
            }
        }

        let default = parse_default(&row.default).unwrap_or_else(|_| {
            emit(diagnostics, Diagnostic::malformed_default(&row.default, context.clone()));
            None
        });

        Some(ExpandedField {
            name,
            bit_low: bits.low,
            bit_high: bits.high,
            width,
            access: attribute.access.value(),
            modified_write: attribute.modified_write.value(),
            read_action: attribute.read_action.value(),
            default,
            default_text: default.and_then(|_| row.default.text()),
            description: row.description.clone(),
        })
    }

    fn is_reserved(&self, name: Option<&str>) -> bool {
        name.map_or(self.blank_fields_reserved, is_reserved_name)
    }
}

/// Matches `rsvd` or `reserved`, optionally followed by digits.
pub fn is_reserved_name(name: &str) -> bool {
    name.strip_prefix("reserved")
        .or_else(|| name.strip_prefix("rsvd"))
        .map_or(false, |suffix| suffix.bytes().all(|b| b.is_ascii_digit()))
}

#[allow(clippy::cast_sign_loss)]
fn reset_bits(default: i64, width: u32, low: u32) -> u64 {
    let mask = 1u64.checked_shl(width).map_or(u64::MAX, |bit| bit - 1);
    (default as u64 & mask).checked_shl(low).unwrap_or(0)
}
