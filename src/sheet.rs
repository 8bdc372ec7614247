//! Workbook input model: sheets of untyped cells.

use crate::diagnostic::{Context, Diagnostic};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use std::fmt;

static EMPTY: Cell = Cell::Empty;

/// A single spreadsheet cell value.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Cell {
    /// Integer cell.
    Int(i64),
    /// Floating point cell.
    Float(f64),
    /// Text cell.
    Text(String),
    /// Cell with no value.
    #[default]
    Empty,
}

impl Cell {
    /// Returns `true` if the cell is empty or contains only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            Cell::Int(_) | Cell::Float(_) => false,
        }
    }

    /// Returns the trimmed text of the cell, or `None` for blank cells and the
    /// `null` sentinel.
    pub fn text(&self) -> Option<String> {
        let text = match self {
            Cell::Empty => return None,
            Cell::Int(value) => value.to_string(),
            Cell::Float(value) => value.to_string(),
            Cell::Text(text) => text.trim().to_owned(),
        };
        (!text.is_empty() && !text.eq_ignore_ascii_case("null")).then_some(text)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_owned())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(value) => write!(f, "{value}"),
            Cell::Float(value) => write!(f, "{value}"),
            Cell::Text(text) => f.write_str(text),
            Cell::Empty => Ok(()),
        }
    }
}

/// A named table of cells with a header row.
#[non_exhaustive]
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Sheet {
    /// Sheet name as it appears in the workbook.
    #[serde(default)]
    pub name: String,
    /// Column names in header order.
    pub columns: Vec<String>,
    #[serde(default)]
    pub(crate) rows: Vec<Vec<Cell>>,
}

/// Borrowed view of one sheet row.
#[derive(Clone, Copy, Debug)]
pub struct Row<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl Sheet {
    /// Creates a new sheet with no rows.
    pub fn new<I>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Missing trailing cells read as empty.
    pub fn push_row<I>(&mut self, cells: I)
    where
        I: IntoIterator,
        I::Item: Into<Cell>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Appends a row and returns the sheet, for chained construction.
    #[must_use]
    pub fn row<I>(mut self, cells: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Cell>,
    {
        self.push_row(cells);
        self
    }

    /// Returns `true` if the sheet has a column named `column`.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|name| name == column)
    }

    /// Returns an iterator over the rows in input order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(|cells| Row { columns: &self.columns, cells })
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the sheet has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Checks that every column in `required` is present.
    ///
    /// The error names the sheet and the missing columns in sorted order.
    pub fn require(&self, required: &[&str]) -> Result<(), Diagnostic> {
        let mut missing =
            required.iter().copied().filter(|column| !self.has_column(column)).collect::<Vec<_>>();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort_unstable();
        Err(Diagnostic::missing_columns(
            &self.name,
            &missing,
            Context::new().and(self.name.clone()),
        ))
    }
}

impl<'a> Row<'a> {
    /// Returns the cell under `column`, or an empty cell if the sheet lacks
    /// that column.
    pub fn get(&self, column: &str) -> &'a Cell {
        self.columns
            .iter()
            .position(|name| name == column)
            .and_then(|index| self.cells.get(index))
            .unwrap_or(&EMPTY)
    }

    /// Returns the trimmed text under `column`.
    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column).text()
    }
}

/// An ordered collection of sheets keyed by name.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Workbook {
    #[serde(deserialize_with = "deserialize_sheets")]
    sheets: IndexMap<String, Sheet>,
}

impl Workbook {
    /// Creates a new empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a sheet, replacing any sheet with the same name.
    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.insert(sheet.name.clone(), sheet);
    }

    /// Inserts a sheet and returns the workbook, for chained construction.
    #[must_use]
    pub fn sheet(mut self, sheet: Sheet) -> Self {
        self.add_sheet(sheet);
        self
    }

    /// Returns the sheet named `name`.
    pub fn get(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name)
    }

    /// Returns an iterator over all sheet names.
    pub fn sheet_names(&self) -> impl Iterator<Item = &String> + '_ {
        self.sheets.keys()
    }
}

fn deserialize_sheets<'de, D>(deserializer: D) -> Result<IndexMap<String, Sheet>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut map = IndexMap::new();
    for sheet in Vec::<Sheet>::deserialize(deserializer)? {
        map.insert(sheet.name.clone(), sheet);
    }
    Ok(map)
}
