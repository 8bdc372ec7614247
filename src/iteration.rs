//! Register-name iteration templates such as `REG{n}, n=range(4)`.

use std::{fmt, iter};

/// Placeholder replaced by the instance number.
pub const PLACEHOLDER: &str = "{n}";

/// Concrete instances described by an iteration template.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IterationSpec {
    /// Template text before the first placeholder.
    pub base_name: String,
    /// Instance numbers in expansion order.
    pub series: Vec<i64>,
}

/// Reason an iteration template could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateError {
    /// A `range(...)` argument is not an integer.
    BadArgument(String),
    /// `range(...)` takes one to three arguments.
    ArgumentCount(usize),
    /// `range(...)` step is zero.
    ZeroStep,
    /// The template has a placeholder but none of the `n = ...` forms.
    NoIterationForm,
}

impl IterationSpec {
    /// Parses a register-name template.
    ///
    /// Returns `Ok(None)` if the template has no placeholder.
    pub fn parse(template: &str) -> Result<Option<Self>, TemplateError> {
        Ok(parse_series(template)?.map(|series| Self {
            base_name: base_name(template).to_owned(),
            series,
        }))
    }

    /// Returns the register name of instance `n`.
    pub fn instance_name(&self, n: i64) -> String {
        format!("{}_{}", self.base_name, n)
    }
}

/// Parses the instance numbers of a register-name template.
///
/// Forms are tried in order, each searched for anywhere in the template:
/// `n = range(ARGS)` (half-open, stepped), `n = A~B` (inclusive) and `n = A`
/// (same as `range(A)`).
pub fn parse_series(template: &str) -> Result<Option<Vec<i64>>, TemplateError> {
    if !template.contains(PLACEHOLDER) {
        return Ok(None);
    }
    if let Some(args) = find_assignment(template, range_args) {
        return range_series(args).map(Some);
    }
    if let Some((start, end)) = find_assignment(template, inclusive_bounds) {
        let start = parse_digits(start)?;
        let end = parse_digits(end)?;
        return Ok(Some((start..=end).collect()));
    }
    if let Some(end) = find_assignment(template, leading_digits) {
        return Ok(Some((0..parse_digits(end)?).collect()));
    }
    Err(TemplateError::NoIterationForm)
}

fn base_name(template: &str) -> &str {
    template.find(PLACEHOLDER).map_or("", |index| &template[..index])
}

/// Finds the leftmost `n = ...` whose right-hand side `rhs` accepts.
fn find_assignment<'a, T>(template: &'a str, rhs: impl Fn(&'a str) -> Option<T>) -> Option<T> {
    template.match_indices('n').find_map(|(index, _)| {
        let rest = template[index + 1..].trim_start().strip_prefix('=')?.trim_start();
        rhs(rest)
    })
}

fn range_args(rest: &str) -> Option<&str> {
    rest.strip_prefix("range(")?.split_once(')').map(|(args, _)| args)
}

fn inclusive_bounds(rest: &str) -> Option<(&str, &str)> {
    let start = leading_digits(rest)?;
    let rest = rest[start.len()..].trim_start().strip_prefix('~')?.trim_start();
    Some((start, leading_digits(rest)?))
}

fn leading_digits(rest: &str) -> Option<&str> {
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}

fn parse_digits(digits: &str) -> Result<i64, TemplateError> {
    digits.parse().map_err(|_| TemplateError::BadArgument(digits.to_owned()))
}

fn range_series(args: &str) -> Result<Vec<i64>, TemplateError> {
    let args = args.split(',').map(str::trim).filter(|arg| !arg.is_empty()).collect::<Vec<_>>();
    let (start, end, step) = match args[..] {
        [end] => (0, parse_digits(end)?, 1),
        [start, end] => (parse_digits(start)?, parse_digits(end)?, 1),
        [start, end, step] => (parse_digits(start)?, parse_digits(end)?, parse_digits(step)?),
        _ => return Err(TemplateError::ArgumentCount(args.len())),
    };
    if step == 0 {
        return Err(TemplateError::ZeroStep);
    }
    Ok(iter::successors(Some(start), |n| n.checked_add(step))
        .take_while(|&n| if step > 0 { n < end } else { n > end })
        .collect())
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::BadArgument(arg) => write!(f, "'{arg}' is not an integer"),
            TemplateError::ArgumentCount(count) => {
                write!(f, "range() takes 1 to 3 arguments, {count} given")
            }
            TemplateError::ZeroStep => f.write_str("range() step must not be zero"),
            TemplateError::NoIterationForm => {
                f.write_str("expected `n=range(..)`, `n=A~B` or `n=A` after the placeholder")
            }
        }
    }
}

impl std::error::Error for TemplateError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(template: &str) -> Vec<i64> {
        parse_series(template).unwrap().unwrap()
    }

    #[test]
    fn range_forms() {
        assert_eq!(series("{n}, n=range(3)"), [0, 1, 2]);
        assert_eq!(series("rega{n}, n=range(1,4)"), [1, 2, 3]);
        assert_eq!(series("rega{n}, n = range( 0, 4, 2 )"), [0, 2]);
        assert_eq!(series("rega{n}, n=range(5,0,-2)"), [5, 3, 1]);
        assert_eq!(series("rega{n}, n=range(3,)"), [0, 1, 2]);
        assert!(series("rega{n}, n=range(4,1)").is_empty());
    }

    #[test]
    fn inclusive_and_count_are_distinct() {
        assert_eq!(series("{n}, n=0~2"), [0, 1, 2]);
        assert_eq!(series("{n}, n=3"), [0, 1, 2]);
        assert_eq!(series("CH{n}, n = 2 ~ 4"), [2, 3, 4]);
    }

    #[test]
    fn no_placeholder_is_not_expandable() {
        assert_eq!(parse_series("CTRL"), Ok(None));
        assert_eq!(parse_series("CTRL n=range(3)"), Ok(None));
        assert_eq!(IterationSpec::parse("STATUS"), Ok(None));
    }

    #[test]
    fn malformed_templates() {
        assert_eq!(parse_series("R{n}, n=range(0,4,0)"), Err(TemplateError::ZeroStep));
        assert_eq!(
            parse_series("R{n}, n=range(a)"),
            Err(TemplateError::BadArgument("a".to_owned()))
        );
        assert_eq!(parse_series("R{n}, n=range(1,2,3,4)"), Err(TemplateError::ArgumentCount(4)));
        assert_eq!(parse_series("R{n}, n=range()"), Err(TemplateError::ArgumentCount(0)));
        assert_eq!(parse_series("R{n}"), Err(TemplateError::NoIterationForm));
        assert_eq!(parse_series("R{n}, n=range(3"), Err(TemplateError::NoIterationForm));
    }

    #[test]
    fn spec_names_instances() {
        let spec = IterationSpec::parse("DMA_CH{n}_CFG, n=range(2)").unwrap().unwrap();
        assert_eq!(spec.base_name, "DMA_CH");
        assert_eq!(spec.series, [0, 1]);
        assert_eq!(spec.instance_name(1), "DMA_CH_1");
    }
}
