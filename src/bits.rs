//! Bit manipulation helpers for division and grouping values.
//!
//! Division values live in a `u64` whose low `bit_count` bits are
//! significant. Shifts by the full register width are legal here and
//! produce zero, which keeps the block arithmetic free of special cases
//! for 64-bit divisions and zero-length prefixes.

use crate::constants::BitCount;

/// Largest value of a division with the given bit count.
///
/// # Arguments
/// * `bit_count` - Division width (0-64)
///
/// # Returns
/// `2^bit_count - 1`, or 0 for a zero-width division
#[inline]
pub fn max_value(bit_count: BitCount) -> u64 {
    if bit_count == 0 {
        0
    } else {
        u64::MAX >> (64 - u32::from(bit_count))
    }
}

/// Mask covering the host bits of a division behind a prefix.
///
/// # Arguments
/// * `bit_count` - Division width
/// * `prefix_len` - Number of leading (network) bits, clamped to `bit_count`
///
/// # Returns
/// Low `bit_count - prefix_len` bits set
#[inline]
pub fn host_mask(bit_count: BitCount, prefix_len: BitCount) -> u64 {
    max_value(bit_count - prefix_len.min(bit_count))
}

/// Right shift that yields 0 instead of overflowing at 64 or more.
#[inline]
pub fn shr(value: u64, shift: u32) -> u64 {
    value.checked_shr(shift).unwrap_or(0)
}

/// Left shift that yields 0 instead of overflowing at 64 or more.
#[inline]
pub fn shl(value: u64, shift: u32) -> u64 {
    value.checked_shl(shift).unwrap_or(0)
}

/// Left shift on 128-bit accumulators that yields 0 at 128 or more.
#[inline]
pub fn shl128(value: u128, shift: u32) -> u128 {
    value.checked_shl(shift).unwrap_or(0)
}

/// Largest value of a grouping with the given bit count (0-128).
#[inline]
pub fn max_value128(bit_count: u32) -> u128 {
    if bit_count == 0 {
        0
    } else {
        u128::MAX >> (128 - bit_count.min(128))
    }
}

/// Number of trailing one bits, capped at the division width.
#[inline]
pub fn trailing_ones(value: u64, bit_count: BitCount) -> BitCount {
    (value.trailing_ones().min(u32::from(bit_count))) as BitCount
}

/// Number of trailing zero bits, capped at the division width.
#[inline]
pub fn trailing_zeros(value: u64, bit_count: BitCount) -> BitCount {
    (value.trailing_zeros().min(u32::from(bit_count))) as BitCount
}

/// Index (from the most significant end) of the first differing bit among
/// the top `len` bits of two `bit_count`-wide values.
///
/// # Arguments
/// * `one`, `two` - Values to compare
/// * `bit_count` - Width of both values
/// * `len` - Number of leading bits to compare (0 compares nothing)
///
/// # Returns
/// `Some(i)` where `i < len` is the first differing bit, or `None` when the
/// leading `len` bits agree
#[inline]
pub fn first_difference(one: u64, two: u64, bit_count: BitCount, len: BitCount) -> Option<BitCount> {
    if len == 0 {
        return None;
    }
    let shift = u32::from(bit_count - len);
    let diff = shr(one ^ two, shift);
    if diff == 0 {
        None
    } else {
        // diff occupies the low `len` bits
        let leading = diff.leading_zeros() - (64 - u32::from(len));
        Some(leading as BitCount)
    }
}

/// Reverse the low `bit_count` bits of a value.
#[inline]
pub fn reverse_bits(value: u64, bit_count: BitCount) -> u64 {
    if bit_count == 0 {
        return 0;
    }
    value.reverse_bits() >> (64 - u32::from(bit_count))
}

/// Reverse the bits inside every byte of the low `bit_count` bits.
///
/// `bit_count` must be a multiple of 8.
#[inline]
pub fn reverse_bits_per_byte(value: u64, bit_count: BitCount) -> u64 {
    // reversing every bit reverses byte order, reversing bytes restores it
    reverse_bytes(reverse_bits(value, bit_count), bit_count)
}

/// Reverse the byte order of the low `bit_count` bits.
///
/// `bit_count` must be a multiple of 8.
#[inline]
pub fn reverse_bytes(value: u64, bit_count: BitCount) -> u64 {
    if bit_count == 0 {
        return 0;
    }
    value.swap_bytes() >> (64 - u32::from(bit_count))
}
