//! Shared single-valued byte divisions.
//!
//! IPv4 and MAC addresses are built from 8-bit divisions, almost always
//! single-valued and unprefixed. Those 256 divisions are allocated once and
//! handed out by reference count, so their memoized block properties are
//! computed once per process.

use std::sync::Arc;

use crate::address::division::Division;
use crate::address::range::RangeValue;
use crate::constants::BITS_PER_BYTE;

#[cfg(not(feature = "single-threaded"))]
static BYTE_DIVISIONS: std::sync::LazyLock<Vec<Arc<Division>>> = std::sync::LazyLock::new(|| {
    (0..=u8::MAX)
        .map(|value| Arc::new(Division::from_range(RangeValue::single(u64::from(value)), BITS_PER_BYTE, None)))
        .collect()
});

/// Unprefixed single-valued 8-bit division for `value`.
///
/// Without thread-safe memoization the divisions cannot live in a shared
/// static, so each call allocates.
#[inline]
pub(crate) fn byte_division(value: u8) -> Arc<Division> {
    #[cfg(not(feature = "single-threaded"))]
    return Arc::clone(&BYTE_DIVISIONS[usize::from(value)]);

    #[cfg(feature = "single-threaded")]
    return Arc::new(Division::from_range(
        RangeValue::single(u64::from(value)),
        BITS_PER_BYTE,
        None,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_division_values() {
        for value in [0u8, 1, 127, 255] {
            let div = byte_division(value);
            assert_eq!(div.lower(), u64::from(value));
            assert!(!div.is_multiple());
            assert_eq!(div.bit_count(), 8);
            assert_eq!(div.prefix_len(), None);
        }
    }

    #[cfg(not(feature = "single-threaded"))]
    #[test]
    fn test_byte_division_shared() {
        let one = byte_division(42);
        let two = byte_division(42);
        assert!(Arc::ptr_eq(&one, &two));
    }
}
