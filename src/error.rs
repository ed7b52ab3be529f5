//! Error types.
//!
//! Two recoverable classes exist. [`AddressValueError`] rejects inputs that
//! cannot form a valid division, grouping or address. [`IncompatibleAddressError`]
//! reports an operation whose result cannot be expressed as a range in the
//! target structure. Contract violations (mismatched trie key sizes,
//! non-normalized trie keys, out-of-range indices) panic instead.

use thiserror::Error;

use crate::constants::BitCount;

/// Invalid input when constructing a division, grouping or address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressValueError {
    #[error("division bit count {0} is outside 1..=64")]
    InvalidBitCount(BitCount),

    #[error("value {value:#x} exceeds the maximum {max:#x} of a {bit_count}-bit division")]
    ValueExceedsBitCount {
        value: u64,
        max: u64,
        bit_count: BitCount,
    },

    #[error("prefix length {prefix_len} exceeds bit count {bit_count}")]
    PrefixLenExceedsBitCount {
        prefix_len: BitCount,
        bit_count: u32,
    },

    #[error("grouping of {0} bits exceeds the 128-bit maximum")]
    GroupingTooLarge(u32),

    #[error("invalid {kind} layout: {detail}")]
    InvalidLayout { kind: &'static str, detail: String },

    #[error("zone identifiers are only permitted on IPv6 addresses")]
    ZoneNotPermitted,

    #[error("a {0} grouping cannot form an address")]
    NotAnAddress(&'static str),
}

/// Result whose range cannot be represented in the target structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IncompatibleAddressError {
    #[error("range {lower:#x}-{upper:#x} cannot be reversed")]
    ReverseRange { lower: u64, upper: u64 },

    #[error("range {lower:#x}-{upper:#x} cannot be split after bit {high_bits}")]
    SplitRange {
        lower: u64,
        upper: u64,
        high_bits: BitCount,
    },

    #[error("ranges {high_lower:#x}-{high_upper:#x} and {low_lower:#x}-{low_upper:#x} cannot be joined")]
    JoinRange {
        high_lower: u64,
        high_upper: u64,
        low_lower: u64,
        low_upper: u64,
    },

    #[error("joined width of {0} bits exceeds a single division")]
    JoinTooWide(u32),

    #[error("bit count {0} is not a whole number of bytes")]
    NotByteAligned(u32),

    #[error("the range is not sequential and cannot be spanned by prefix blocks")]
    NotSequential,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_error_messages() {
        let err = AddressValueError::ValueExceedsBitCount {
            value: 0x100,
            max: 0xff,
            bit_count: 8,
        };
        assert_eq!(
            err.to_string(),
            "value 0x100 exceeds the maximum 0xff of a 8-bit division"
        );
        assert_eq!(
            AddressValueError::InvalidBitCount(65).to_string(),
            "division bit count 65 is outside 1..=64"
        );
    }

    #[test]
    fn test_incompatible_error_messages() {
        let err = IncompatibleAddressError::ReverseRange {
            lower: 0x1,
            upper: 0x3,
        };
        assert_eq!(err.to_string(), "range 0x1-0x3 cannot be reversed");
        assert_eq!(
            IncompatibleAddressError::NotSequential.to_string(),
            "the range is not sequential and cannot be spanned by prefix blocks"
        );
    }
}
