//! Forward fill, address grouping and template expansion of register rows.

use crate::diagnostic::{emit, Context, Diagnostic, Diagnostics};
use crate::iteration::IterationSpec;
use crate::parse::parse_literal;
use crate::row::{ExpandedFieldRow, RawFieldRow};
use crate::sheet::Cell;
use crate::stride::stride;
use indexmap::IndexMap;

/// Rows sharing one (possibly inherited) address.
#[derive(Clone, Debug, PartialEq)]
pub struct AddressGroup {
    /// Address text as authored.
    pub address: String,
    /// Member rows in input order. Never empty.
    pub rows: Vec<RawFieldRow>,
}

impl AddressGroup {
    /// Returns the first row, which carries the group's register template and
    /// overrides.
    pub fn header(&self) -> &RawFieldRow {
        &self.rows[0]
    }

    /// Returns the register-name template.
    pub fn template(&self) -> Option<&str> {
        self.header().register.as_deref()
    }
}

/// Fills blank address, register, stride and size cells from the nearest
/// preceding non-blank value of the same column.
pub fn forward_fill(rows: &[RawFieldRow]) -> Vec<RawFieldRow> {
    let mut last = RawFieldRow::default();
    let mut filled = Vec::with_capacity(rows.len());
    for row in rows {
        let mut row = row.clone();
        fill(&mut row.address, &mut last.address, Option::is_none);
        fill(&mut row.register, &mut last.register, Option::is_none);
        fill(&mut row.stride, &mut last.stride, Cell::is_blank);
        fill(&mut row.reg_size, &mut last.reg_size, Cell::is_blank);
        filled.push(row);
    }
    filled
}

fn fill<T: Clone>(value: &mut T, last: &mut T, is_blank: impl Fn(&T) -> bool) {
    if is_blank(value) {
        value.clone_from(last);
    } else {
        last.clone_from(value);
    }
}

/// Groups filled rows by address text, in order of first appearance.
///
/// Rows without an address are dropped with a warning.
pub fn group_by_address(
    rows: Vec<RawFieldRow>,
    context: &Context,
    diagnostics: &mut Diagnostics,
) -> Vec<AddressGroup> {
    let mut groups = IndexMap::<String, Vec<RawFieldRow>>::new();
    for (index, row) in rows.into_iter().enumerate() {
        match row.address.clone() {
            Some(address) => groups.entry(address).or_default().push(row),
            None => emit(diagnostics, Diagnostic::missing_address(index + 1, context.clone())),
        }
    }
    groups.into_iter().map(|(address, rows)| AddressGroup { address, rows }).collect()
}

/// Expands one address group into concrete field rows.
///
/// A group without a placeholder keeps only its named rows. A templated group
/// yields every row once per instance, instance-major, with unnamed rows kept.
pub fn expand_group(
    group: &AddressGroup,
    context: &Context,
    diagnostics: &mut Diagnostics,
) -> Vec<ExpandedFieldRow> {
    let Some(template) = group.template() else {
        emit(diagnostics, Diagnostic::missing_register_name(&group.address, context.clone()));
        return Vec::new();
    };
    let context = context.clone().and(template);
    let Some(base) = parse_address(&group.address) else {
        emit(diagnostics, Diagnostic::malformed_address(&group.address, context));
        return Vec::new();
    };
    let Some(stride) = stride(group) else {
        emit(diagnostics, Diagnostic::malformed_stride(&group.address, context));
        return Vec::new();
    };
    match IterationSpec::parse(template) {
        Ok(None) => group
            .rows
            .iter()
            .filter(|row| row.has_field())
            .map(|row| row.expand(base, template.to_owned(), stride))
            .collect(),
        Ok(Some(spec)) => {
            let mut expanded = Vec::with_capacity(spec.series.len() * group.rows.len());
            for &n in &spec.series {
                let Some(address) = instance_address(base, n, stride) else {
                    let address = format!("{} + {n} * {stride}", group.address);
                    emit(diagnostics, Diagnostic::malformed_address(&address, context.clone()));
                    continue;
                };
                let name = spec.instance_name(n);
                expanded
                    .extend(group.rows.iter().map(|row| row.expand(address, name.clone(), stride)));
            }
            expanded
        }
        Err(err) => {
            emit(diagnostics, Diagnostic::malformed_template(template, &err, context));
            Vec::new()
        }
    }
}

/// Runs forward fill, grouping and expansion over a register sheet's rows.
pub fn expand_rows(
    rows: &[RawFieldRow],
    context: &Context,
    diagnostics: &mut Diagnostics,
) -> Vec<ExpandedFieldRow> {
    let filled = forward_fill(rows);
    log::debug!("{context}: {} rows after forward fill", filled.len());
    let expanded = group_by_address(filled, context, diagnostics)
        .iter()
        .flat_map(|group| expand_group(group, context, diagnostics))
        .collect::<Vec<_>>();
    log::debug!("{context}: {} rows after expansion", expanded.len());
    expanded
}

/// Parses an address cell: an integer literal, or the first `0x` hex run in
/// the text.
pub fn parse_address(text: &str) -> Option<u64> {
    if let Ok(address) = parse_literal(text) {
        return u64::try_from(address).ok();
    }
    let (_, rest) = text.split_once("0x")?;
    let end = rest.find(|c: char| !c.is_ascii_hexdigit()).unwrap_or(rest.len());
    u64::from_str_radix(&rest[..end], 16).ok()
}

fn instance_address(base: u64, n: i64, stride: u64) -> Option<u64> {
    let address = i128::from(base) + i128::from(n) * i128::from(stride);
    u64::try_from(address).ok()
}
