//! Recoverable conversion problems, collected and reported by context.

use colored::Colorize;
use indexmap::{IndexMap, IndexSet};
use std::fmt::{self, Display};

/// A recoverable problem found while converting a workbook.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Diagnostic {
    rank: Rank,
    kind: Kind,
    message: String,
    notes: Vec<String>,
    context: Context,
}

/// Category of a [`Diagnostic`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Kind {
    // record sets
    /// A sheet lacks one of its mandatory columns.
    MissingRequiredColumn,
    /// A sheet the conversion needs is not in the workbook.
    MissingSheet,
    /// A vendor sheet has no rows.
    EmptySheet,

    // address groups
    /// A register-name template contains `{n}` but no usable iteration form.
    MalformedTemplate = 1000,
    /// An address cell does not hold an address.
    MalformedAddress,
    /// A row has no address and no preceding row to inherit one from.
    MissingAddress,
    /// An address group has no register name.
    MissingRegisterName,
    /// An address group's stride does not fit a register size.
    MalformedStride,

    // fields
    /// A bit-range cell could not be parsed.
    MalformedBitRange = 2000,
    /// A default-value cell could not be parsed.
    MalformedDefault,
    /// An attribute code is not in the vocabulary.
    UnknownAttributeCode,
}

/// Severity of a [`Diagnostic`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Rank {
    /// Data was kept, possibly with a property left unset.
    Warning,
    /// Data was dropped.
    Error,
}

impl Diagnostic {
    /// Creates a new diagnostic with no notes.
    pub fn new(rank: Rank, kind: Kind, message: impl Into<String>, context: Context) -> Self {
        Self { rank, kind, message: message.into(), notes: Vec::new(), context }
    }

    /// Returns the severity.
    pub fn rank(&self) -> &Rank {
        &self.rank
    }

    /// Returns the category.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Returns the message without notes or context.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the sheet/register/field path the diagnostic refers to.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// missing required columns in sheet 'foo': A, B
    pub fn missing_columns(sheet: &str, missing: &[&str], context: Context) -> Self {
        Self::new(
            Rank::Error,
            Kind::MissingRequiredColumn,
            format!("missing required columns in sheet '{sheet}': {}", missing.join(", ")),
            context,
        )
        .notes(["the sheet could not be processed"])
    }

    /// sheet 'foo' not found
    pub fn missing_sheet(sheet: &str, context: Context) -> Self {
        Self::new(Rank::Error, Kind::MissingSheet, format!("sheet '{sheet}' not found"), context)
    }

    /// sheet 'foo' has no rows
    pub fn empty_sheet(sheet: &str, context: Context) -> Self {
        Self::new(Rank::Error, Kind::EmptySheet, format!("sheet '{sheet}' has no rows"), context)
    }

    /// could not parse iteration template 'foo'
    ///
    /// note: {reason}
    pub fn malformed_template(template: &str, reason: &impl Display, context: Context) -> Self {
        Self::new(
            Rank::Error,
            Kind::MalformedTemplate,
            format!("could not parse iteration template '{template}'"),
            context,
        )
        .notes([reason.to_string(), "the register group produces no rows".to_string()])
    }

    /// could not parse address 'foo'
    pub fn malformed_address(address: &str, context: Context) -> Self {
        Self::new(
            Rank::Error,
            Kind::MalformedAddress,
            format!("could not parse address '{address}'"),
            context,
        )
    }

    /// row {row} has no address
    pub fn missing_address(row: usize, context: Context) -> Self {
        Self::new(
            Rank::Warning,
            Kind::MissingAddress,
            format!("row {row} has no address and nothing to inherit one from"),
            context,
        )
    }

    /// rows at address 'foo' have no register name
    pub fn missing_register_name(address: &str, context: Context) -> Self {
        Self::new(
            Rank::Warning,
            Kind::MissingRegisterName,
            format!("skipping rows at address '{address}' with no register name"),
            context,
        )
    }

    /// stride of register group at address 'foo' is out of range
    pub fn malformed_stride(address: &str, context: Context) -> Self {
        Self::new(
            Rank::Error,
            Kind::MalformedStride,
            format!("stride of register group at address '{address}' is out of range"),
            context,
        )
        .notes(["the register group produces no rows"])
    }

    /// row {row}: could not parse bit offset from 'foo'
    pub fn malformed_bit_range(
        field: &str,
        bit: &impl Display,
        row: usize,
        context: Context,
    ) -> Self {
        Self::new(
            Rank::Error,
            Kind::MalformedBitRange,
            format!(
                "skipping invalid field '{field}' in row {row}: \
                 could not parse bit offset from '{bit}'"
            ),
            context,
        )
    }

    /// failed to parse reset value 'foo'
    pub fn malformed_default(default: &impl Display, context: Context) -> Self {
        Self::new(
            Rank::Warning,
            Kind::MalformedDefault,
            format!("failed to parse reset value '{default}'"),
            context,
        )
        .notes(["the field does not contribute to the register reset"])
    }

    /// unknown {category} attribute 'foo'
    pub fn unknown_attribute(category: &str, code: &str, context: Context) -> Self {
        Self::new(
            Rank::Warning,
            Kind::UnknownAttributeCode,
            format!("unknown {category} attribute '{code}'"),
            context,
        )
    }

    /// Attaches notes to the diagnostic.
    #[must_use]
    pub fn notes<I>(mut self, notes: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.notes.extend(notes.into_iter().map(|e| e.as_ref().to_string()));
        self
    }

    /// Emits the diagnostic through the `log` facade.
    pub fn log(&self) {
        match self.rank {
            Rank::Warning => log::warn!("{}: {}", self.context, self.message),
            Rank::Error => log::error!("{}: {}", self.context, self.message),
        }
    }

    /// Renders diagnostics grouped by context.
    pub fn report(diagnostics: &Diagnostics) -> String {
        let mut diagnostic_groups = IndexMap::new();

        for diagnostic in diagnostics {
            diagnostic_groups
                .entry(diagnostic.context.clone())
                .or_insert_with(Vec::new)
                .push(diagnostic);
        }

        diagnostic_groups
            .iter()
            .map(|(context, diagnostics)| {
                let diagnostics = diagnostics
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n");

                if context.is_empty() {
                    diagnostics
                } else {
                    format!("in {context}:\n{diagnostics}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let notes = if self.notes.is_empty() {
            String::new()
        } else {
            format!(
                "\n{}",
                self.notes
                    .iter()
                    .map(|note| format!("  {}: {note}", "note".bright_blue().bold()))
                    .collect::<Vec<_>>()
                    .join("\n")
            )
        };

        let code = format!("[E{:04}]", self.kind as u32);

        let header = match &self.rank {
            Rank::Warning => format!("warning{code}").yellow().bold(),
            Rank::Error => format!("error{code}").red().bold(),
        };

        write!(f, "{header}: {}{notes}", self.message)
    }
}

/// Ordered set of diagnostics.
pub type Diagnostics = IndexSet<Diagnostic>;

/// Records `diagnostic` into `diagnostics` and logs it.
pub(crate) fn emit(diagnostics: &mut Diagnostics, diagnostic: Diagnostic) {
    diagnostic.log();
    diagnostics.insert(diagnostic);
}

/// Path of sheet, register and field names a diagnostic refers to.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct Context {
    path: Vec<String>,
}

impl Context {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a path segment.
    #[must_use]
    pub fn and(mut self, ident: impl Into<String>) -> Self {
        self.path.push(ident.into());
        self
    }

    /// Returns the path segments.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Returns `true` if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

impl Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.path.iter().map(|segment| segment.bold().to_string()).collect::<Vec<_>>().join("/")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_groups_by_context() {
        colored::control::set_override(false);
        let sheet = Context::new().and("regs");
        let mut diagnostics = Diagnostics::new();
        diagnostics.insert(Diagnostic::missing_sheet("regs", Context::new()));
        diagnostics.insert(Diagnostic::malformed_address("zz", sheet.clone()));
        diagnostics.insert(Diagnostic::missing_register_name("0x4", sheet));
        let report = Diagnostic::report(&diagnostics);
        assert_eq!(
            report,
            "error[E0001]: sheet 'regs' not found\n\n\
             in regs:\n\
             error[E1001]: could not parse address 'zz'\n\
             warning[E1003]: skipping rows at address '0x4' with no register name"
        );
    }

    #[test]
    fn duplicates_collapse() {
        let mut diagnostics = Diagnostics::new();
        let context = Context::new().and("regs").and("CTRL");
        emit(&mut diagnostics, Diagnostic::unknown_attribute("access", "XYZ", context.clone()));
        emit(&mut diagnostics, Diagnostic::unknown_attribute("access", "XYZ", context));
        assert_eq!(diagnostics.len(), 1);
    }
}
