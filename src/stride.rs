//! Byte distance between instances of a register.

use crate::expand::AddressGroup;
use crate::parse::{parse_bit_range, parse_int};

/// Largest stride whose size in bits fits a `u64`.
pub const MAX_STRIDE: u64 = u64::MAX / 8;

/// Computes the byte stride of an address group.
///
/// Priority: `STRIDE` override, `REG_SIZE` override, highest bit of the named
/// fields, sum of the named fields' widths.
///
/// Returns `None` if the width sum overflows or the stride is too large for
/// its size in bits to fit a `u64`.
pub fn stride(group: &AddressGroup) -> Option<u64> {
    let header = group.header();
    let stride = if let Some(stride) = non_negative(parse_int(&header.stride)) {
        stride
    } else if let Some(size) = non_negative(parse_int(&header.reg_size)) {
        bytes(size)
    } else {
        let named = || group.rows.iter().filter(|row| row.has_field());
        match named().filter_map(|row| parse_bit_range(&row.bit)).map(|range| range.high).max() {
            Some(high) => bytes(u64::from(high) + 1),
            None => bytes(
                named()
                    .filter_map(|row| non_negative(parse_int(&row.width)))
                    .try_fold(0, u64::checked_add)?,
            ),
        }
    };
    (stride <= MAX_STRIDE).then_some(stride)
}

fn bytes(bits: u64) -> u64 {
    bits.div_ceil(8)
}

fn non_negative(value: Option<i64>) -> Option<u64> {
    value.and_then(|value| u64::try_from(value).ok())
}
