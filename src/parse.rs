//! Cell-level notations: bit ranges, default values and plain integers.

use crate::sheet::Cell;
use std::num::ParseIntError;

/// Inclusive bit span of a field within its register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitRange {
    /// Most significant bit.
    pub high: u32,
    /// Least significant bit.
    pub low: u32,
}

impl BitRange {
    /// Number of bits covered, or `None` if `high < low`.
    pub fn width(self) -> Option<u32> {
        self.high.checked_sub(self.low).map(|span| span + 1)
    }
}

/// Parses `[hi:lo]`, `[hi]`, `hi:lo` or a bare bit index.
pub fn parse_bit_range(cell: &Cell) -> Option<BitRange> {
    let text = cell.text()?;
    let text = text
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(&text)
        .replace(' ', "");
    let (high, low) = text.split_once(':').unwrap_or((text.as_str(), text.as_str()));
    Some(BitRange { high: high.parse().ok()?, low: low.parse().ok()? })
}

/// Parses a default-value cell.
///
/// Blank cells and the `null` sentinel are `Ok(None)`. Text may carry a sign
/// and a `0x`, `0o` or `0b` base prefix.
pub fn parse_default(cell: &Cell) -> Result<Option<i64>, ParseIntError> {
    match cell {
        Cell::Int(value) => Ok(Some(*value)),
        #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
        Cell::Float(value) if value.is_finite() && value.trunc() == *value => {
            Ok(Some(*value as i64))
        }
        _ => cell.text().map(|text| parse_literal(&text)).transpose(),
    }
}

/// Best-effort integer coercion of a cell.
pub fn parse_int(cell: &Cell) -> Option<i64> {
    match cell {
        Cell::Int(value) => Some(*value),
        #[allow(clippy::cast_possible_truncation)]
        Cell::Float(value) if value.is_finite() => Some(value.trunc() as i64),
        Cell::Float(_) | Cell::Empty => None,
        Cell::Text(text) => text.trim().parse().ok(),
    }
}

/// Parses an integer literal with optional sign and base prefix.
///
/// Digits may be grouped with single underscores, and a prefixed literal may
/// put one right after its prefix (`0x_FF`). Decimal literals other than zero
/// must not start with `0`.
pub(crate) fn parse_literal(src: &str) -> Result<i64, ParseIntError> {
    let (negative, digits) = match src.as_bytes().first() {
        Some(b'-') => (true, &src[1..]),
        Some(b'+') => (false, &src[1..]),
        _ => (false, src),
    };
    let (radix, digits) = match digits.get(..2) {
        Some("0x" | "0X") => (16, &digits[2..]),
        Some("0o" | "0O") => (8, &digits[2..]),
        Some("0b" | "0B") => (2, &digits[2..]),
        _ => (10, digits),
    };
    let grouped = if radix == 10 { digits } else { digits.strip_prefix('_').unwrap_or(digits) };
    // from_str_radix accepts its own sign, which must not follow a prefix
    if grouped.starts_with(['+', '-', '_']) || grouped.ends_with('_') || grouped.contains("__") {
        return i64::from_str_radix("_", radix);
    }
    let digits = grouped.replace('_', "");
    if radix == 10 && digits.starts_with('0') && digits.bytes().any(|b| b != b'0') {
        return i64::from_str_radix("_", radix);
    }
    let value = i64::from_str_radix(&digits, radix)?;
    Ok(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(text: &str) -> Option<(u32, u32)> {
        parse_bit_range(&Cell::from(text)).map(|range| (range.high, range.low))
    }

    #[test]
    fn bit_range_forms() {
        assert_eq!(bits("[7:0]"), Some((7, 0)));
        assert_eq!(bits(" [ 15 : 8 ] "), Some((15, 8)));
        assert_eq!(bits("[3]"), Some((3, 3)));
        assert_eq!(bits("31:16"), Some((31, 16)));
        assert_eq!(bits("5"), Some((5, 5)));
        assert_eq!(parse_bit_range(&Cell::Int(12)).map(|r| r.low), Some(12));
    }

    #[test]
    fn bit_range_rejects() {
        assert_eq!(bits("abc"), None);
        assert_eq!(bits("NULL"), None);
        assert_eq!(bits(""), None);
        assert_eq!(bits("[7:0"), None);
        assert_eq!(bits("7:x"), None);
        assert_eq!(bits("7:3:1"), None);
        assert_eq!(parse_bit_range(&Cell::Empty), None);
    }

    #[test]
    fn defaults() {
        assert_eq!(parse_default(&Cell::from("0x10")), Ok(Some(16)));
        assert_eq!(parse_default(&Cell::from("10")), Ok(Some(10)));
        assert_eq!(parse_default(&Cell::from("0b101")), Ok(Some(5)));
        assert_eq!(parse_default(&Cell::from("0o17")), Ok(Some(15)));
        assert_eq!(parse_default(&Cell::from("-0x1")), Ok(Some(-1)));
        assert_eq!(parse_default(&Cell::from(" Null ")), Ok(None));
        assert_eq!(parse_default(&Cell::Empty), Ok(None));
        assert_eq!(parse_default(&Cell::Int(3)), Ok(Some(3)));
        assert_eq!(parse_default(&Cell::Float(2.0)), Ok(Some(2)));
        assert!(parse_default(&Cell::from("0x")).is_err());
        assert!(parse_default(&Cell::from("0x-1")).is_err());
        assert!(parse_default(&Cell::from("ten")).is_err());
        assert!(parse_default(&Cell::Float(2.5)).is_err());
    }

    #[test]
    fn default_literal_grouping() {
        assert_eq!(parse_default(&Cell::from("1_000")), Ok(Some(1000)));
        assert_eq!(parse_default(&Cell::from("0x_FF")), Ok(Some(255)));
        assert_eq!(parse_default(&Cell::from("0b1010_0101")), Ok(Some(0xA5)));
        assert_eq!(parse_default(&Cell::from("0")), Ok(Some(0)));
        assert_eq!(parse_default(&Cell::from("000")), Ok(Some(0)));
        assert_eq!(parse_default(&Cell::from("0_0")), Ok(Some(0)));
        assert!(parse_default(&Cell::from("010")).is_err());
        assert!(parse_default(&Cell::from("-007")).is_err());
        assert!(parse_default(&Cell::from("1__000")).is_err());
        assert!(parse_default(&Cell::from("_1")).is_err());
        assert!(parse_default(&Cell::from("1_")).is_err());
        assert!(parse_default(&Cell::from("0x__FF")).is_err());
        assert!(parse_default(&Cell::from("0x_")).is_err());
    }

    #[test]
    fn plain_integers() {
        assert_eq!(parse_int(&Cell::from(" 32 ")), Some(32));
        assert_eq!(parse_int(&Cell::Float(8.9)), Some(8));
        assert_eq!(parse_int(&Cell::from("0x20")), None);
        assert_eq!(parse_int(&Cell::Empty), None);
    }
}
