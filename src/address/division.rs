//! Address division (segment): a bounded range of values plus its width.

use core::fmt;
use core::hash::{Hash, Hasher};

use crate::address::range::RangeValue;
use crate::bits;
use crate::constants::{BitCount, BITS_PER_BYTE, MAX_DIVISION_BITS};
use crate::error::{AddressValueError, IncompatibleAddressError};
use crate::memo::Memo;

/// A range of values occupying `bit_count` bits of an address.
///
/// Divisions are immutable. The block-related properties
/// ([`min_prefix_len_for_block`](Self::min_prefix_len_for_block) and
/// [`prefix_len_for_single_block`](Self::prefix_len_for_single_block)) are
/// computed on first use and memoized for the lifetime of the instance.
///
/// Equality and hashing consider the values and the width only. The
/// per-division prefix length is a property of the owning grouping.
///
/// # Example
/// ```rust
/// use addr_trie::Division;
///
/// // 0x10-0x1f is the block of all values sharing the top nibble 0x1
/// let div = Division::new(0x10, 0x1f, 8).unwrap();
/// assert_eq!(div.min_prefix_len_for_block(), 4);
/// assert_eq!(div.prefix_len_for_single_block(), Some(4));
/// assert!(div.contains_single_prefix_block(4));
/// ```
#[derive(Clone)]
pub struct Division {
    range: RangeValue,
    bit_count: BitCount,

    /// Per-division prefix length, assigned by IP groupings.
    prefix_len: Option<BitCount>,

    min_prefix: Memo<BitCount>,
    single_block_prefix: Memo<Option<BitCount>>,
}

/// Prefix length of one division given how many of its bits fall inside
/// the grouping prefix.
///
/// # Arguments
/// * `bit_count` - Division width
/// * `prefixed_bits` - Grouping prefix length minus the division's bit offset
///   (may be negative or exceed the width)
///
/// # Returns
/// - `Some(0)` when none of the division's bits are network bits
/// - `Some(n)` when the prefix ends inside (or exactly at the end of) the division
/// - `None` when the prefix ends after the division
pub(crate) fn division_prefix(bit_count: BitCount, prefixed_bits: i32) -> Option<BitCount> {
    if prefixed_bits <= 0 {
        Some(0)
    } else if prefixed_bits <= i32::from(bit_count) {
        Some(prefixed_bits as BitCount)
    } else {
        None
    }
}

impl Division {
    /// Create a division from two bounds in either order.
    ///
    /// # Errors
    /// - [`AddressValueError::InvalidBitCount`] if `bit_count` is outside `1..=64`
    /// - [`AddressValueError::ValueExceedsBitCount`] if a bound does not fit
    pub fn new(one: u64, two: u64, bit_count: BitCount) -> Result<Self, AddressValueError> {
        if bit_count == 0 || bit_count > MAX_DIVISION_BITS {
            return Err(AddressValueError::InvalidBitCount(bit_count));
        }
        let range = RangeValue::new(one, two);
        let max = bits::max_value(bit_count);
        if range.upper() > max {
            return Err(AddressValueError::ValueExceedsBitCount {
                value: range.upper(),
                max,
                bit_count,
            });
        }
        Ok(Self::from_range(range, bit_count, None))
    }

    /// Create a single-valued division.
    pub fn single(value: u64, bit_count: BitCount) -> Result<Self, AddressValueError> {
        Self::new(value, value, bit_count)
    }

    /// Create a division spanning every value of its width.
    pub fn full_range(bit_count: BitCount) -> Result<Self, AddressValueError> {
        Self::new(0, bits::max_value(bit_count.min(MAX_DIVISION_BITS)), bit_count)
    }

    /// Build from an already validated range.
    pub(crate) fn from_range(range: RangeValue, bit_count: BitCount, prefix_len: Option<BitCount>) -> Self {
        debug_assert!(bit_count >= 1 && bit_count <= MAX_DIVISION_BITS);
        debug_assert!(range.upper() <= bits::max_value(bit_count));
        Division {
            range,
            bit_count,
            prefix_len: prefix_len.map(|p| p.min(bit_count)),
            min_prefix: Memo::new(),
            single_block_prefix: Memo::new(),
        }
    }

    /// Copy of this division carrying a different per-division prefix.
    ///
    /// The memoized block properties depend only on the values and are kept.
    pub(crate) fn with_division_prefix(&self, prefix_len: Option<BitCount>) -> Self {
        Division {
            range: self.range,
            bit_count: self.bit_count,
            prefix_len: prefix_len.map(|p| p.min(self.bit_count)),
            min_prefix: self.min_prefix.clone(),
            single_block_prefix: self.single_block_prefix.clone(),
        }
    }

    #[inline]
    pub fn lower(&self) -> u64 {
        self.range.lower()
    }

    #[inline]
    pub fn upper(&self) -> u64 {
        self.range.upper()
    }

    #[inline]
    pub fn range(&self) -> RangeValue {
        self.range
    }

    #[inline]
    pub fn bit_count(&self) -> BitCount {
        self.bit_count
    }

    /// Per-division prefix length, if the owning family assigns one.
    #[inline]
    pub fn prefix_len(&self) -> Option<BitCount> {
        self.prefix_len
    }

    #[inline]
    pub fn is_multiple(&self) -> bool {
        self.range.is_multiple()
    }

    /// Number of values in the division.
    #[inline]
    pub fn count(&self) -> u128 {
        self.range.count()
    }

    /// Largest value representable in this division's width.
    #[inline]
    pub fn max_value(&self) -> u64 {
        bits::max_value(self.bit_count)
    }

    /// Whether the division spans `0..=max_value()`.
    #[inline]
    pub fn is_full_range(&self) -> bool {
        self.lower() == 0 && self.upper() == self.max_value()
    }

    /// Test the bit at `index`, counted from the most significant bit of
    /// the lower value.
    ///
    /// # Panics
    /// Panics if `index >= bit_count`.
    #[inline]
    pub fn is_one_bit(&self, index: BitCount) -> bool {
        assert!(
            index < self.bit_count,
            "bit index {} out of range for a {}-bit division",
            index,
            self.bit_count
        );
        let shift = u32::from(self.bit_count - 1 - index);
        (self.lower() >> shift) & 1 == 1
    }

    /// Whether the host bits behind `prefix_len` span their full range.
    ///
    /// Multiplicity within the network bits is allowed: `1-2` followed by
    /// a full-range host part contains two prefix blocks.
    ///
    /// # Arguments
    /// * `prefix_len` - Clamped to `0..=bit_count`
    pub fn contains_prefix_block(&self, prefix_len: BitCount) -> bool {
        let mask = bits::host_mask(self.bit_count, prefix_len);
        self.lower() & mask == 0 && self.upper() & mask == mask
    }

    /// Like [`contains_prefix_block`](Self::contains_prefix_block) but the
    /// network bits must also be a single value, so the division is exactly
    /// one prefix block.
    pub fn contains_single_prefix_block(&self, prefix_len: BitCount) -> bool {
        if !self.contains_prefix_block(prefix_len) {
            return false;
        }
        let shift = u32::from(self.bit_count - prefix_len.min(self.bit_count));
        bits::shr(self.lower(), shift) == bits::shr(self.upper(), shift)
    }

    /// Smallest prefix length for which the division contains prefix blocks.
    ///
    /// Scans the trailing bits: the widest run that is zero in the lower
    /// value and one in the upper value is free, everything before it is
    /// network. Single values yield `bit_count`, the full range yields 0.
    pub fn min_prefix_len_for_block(&self) -> BitCount {
        *self.min_prefix.get_or_init(|| {
            let (lower, upper, bit_count) = (self.lower(), self.upper(), self.bit_count);
            if lower == upper {
                bit_count
            } else if lower == 0 && upper == bits::max_value(bit_count) {
                0
            } else {
                let lower_zeros = bits::trailing_zeros(lower, bit_count);
                let upper_ones = bits::trailing_ones(upper, bit_count);
                bit_count - lower_zeros.min(upper_ones)
            }
        })
    }

    /// The prefix length for which the division is exactly one prefix
    /// block, or `None` if the range does not factor into a single network
    /// value followed by full-range host bits.
    pub fn prefix_len_for_single_block(&self) -> Option<BitCount> {
        *self.single_block_prefix.get_or_init(|| {
            let prefix_len = self.min_prefix_len_for_block();
            if prefix_len == self.bit_count {
                (!self.is_multiple()).then_some(prefix_len)
            } else {
                let shift = u32::from(self.bit_count - prefix_len);
                (bits::shr(self.lower(), shift) == bits::shr(self.upper(), shift)).then_some(prefix_len)
            }
        })
    }

    /// Whether the division has a prefix length and is a block for it.
    pub fn is_prefix_block(&self) -> bool {
        self.prefix_len
            .is_some_and(|prefix_len| self.contains_prefix_block(prefix_len))
    }

    /// Whether the division has a prefix length and is exactly one block for it.
    pub fn is_single_prefix_block(&self) -> bool {
        self.prefix_len
            .is_some_and(|prefix_len| self.contains_single_prefix_block(prefix_len))
    }

    /// Whether every value of `other` is in this division.
    ///
    /// Divisions of different widths never contain each other.
    pub fn contains(&self, other: &Division) -> bool {
        self.bit_count == other.bit_count && self.range.contains(&other.range)
    }

    /// Whether the two divisions share a value.
    pub fn overlaps(&self, other: &Division) -> bool {
        self.bit_count == other.bit_count && self.range.overlaps(&other.range)
    }

    /// The prefix block(s) for `prefix_len` covering this division.
    pub fn to_prefix_block(&self, prefix_len: BitCount) -> Division {
        let prefix_len = prefix_len.min(self.bit_count);
        let mask = bits::host_mask(self.bit_count, prefix_len);
        let range = RangeValue::new(self.lower() & !mask, self.upper() | mask);
        Self::from_range(range, self.bit_count, Some(prefix_len))
    }

    /// Single-valued division holding the lower value.
    pub fn to_lower(&self) -> Division {
        Self::from_range(RangeValue::single(self.lower()), self.bit_count, self.prefix_len)
    }

    /// Single-valued division holding the upper value.
    pub fn to_upper(&self) -> Division {
        Self::from_range(RangeValue::single(self.upper()), self.bit_count, self.prefix_len)
    }

    /// Split into a division of the top `high_bits` bits and one of the rest.
    ///
    /// # Errors
    /// [`IncompatibleAddressError::SplitRange`] when the upper part is
    /// multiple but the lower part is not full range; the value set would
    /// then not be a product of two ranges.
    ///
    /// # Panics
    /// Panics unless `0 < high_bits < bit_count`.
    pub fn split(&self, high_bits: BitCount) -> Result<(Division, Division), IncompatibleAddressError> {
        assert!(
            high_bits > 0 && high_bits < self.bit_count,
            "split point {} out of range for a {}-bit division",
            high_bits,
            self.bit_count
        );
        let low_bits = self.bit_count - high_bits;
        let low_mask = bits::max_value(low_bits);
        let shift = u32::from(low_bits);
        let high = RangeValue::new(self.lower() >> shift, self.upper() >> shift);
        let low = if high.is_multiple() {
            if self.lower() & low_mask != 0 || self.upper() & low_mask != low_mask {
                return Err(IncompatibleAddressError::SplitRange {
                    lower: self.lower(),
                    upper: self.upper(),
                    high_bits,
                });
            }
            RangeValue::new(0, low_mask)
        } else {
            RangeValue::new(self.lower() & low_mask, self.upper() & low_mask)
        };

        let (high_prefix, low_prefix) = match self.prefix_len {
            Some(prefix_len) => (
                division_prefix(high_bits, i32::from(prefix_len)),
                division_prefix(low_bits, i32::from(prefix_len) - i32::from(high_bits)),
            ),
            None => (None, None),
        };
        Ok((
            Self::from_range(high, high_bits, high_prefix),
            Self::from_range(low, low_bits, low_prefix),
        ))
    }

    /// Concatenate two divisions into one.
    ///
    /// # Errors
    /// - [`IncompatibleAddressError::JoinTooWide`] if the result exceeds 64 bits
    /// - [`IncompatibleAddressError::JoinRange`] if `high` is multiple and
    ///   `low` is not full range
    pub fn join(high: &Division, low: &Division) -> Result<Division, IncompatibleAddressError> {
        let bit_count = u32::from(high.bit_count) + u32::from(low.bit_count);
        if bit_count > u32::from(MAX_DIVISION_BITS) {
            return Err(IncompatibleAddressError::JoinTooWide(bit_count));
        }
        if high.is_multiple() && !low.is_full_range() {
            return Err(IncompatibleAddressError::JoinRange {
                high_lower: high.lower(),
                high_upper: high.upper(),
                low_lower: low.lower(),
                low_upper: low.upper(),
            });
        }
        let shift = u32::from(low.bit_count);
        let range = RangeValue::new(
            bits::shl(high.lower(), shift) | low.lower(),
            bits::shl(high.upper(), shift) | low.upper(),
        );
        let prefix_len = match (high.prefix_len, low.prefix_len) {
            (Some(p), _) if p < high.bit_count => Some(p),
            (_, Some(q)) => Some(high.bit_count + q),
            (p, None) => p,
        };
        Ok(Self::from_range(range, bit_count as BitCount, prefix_len))
    }

    /// Reverse the bit order, either across the whole division or within
    /// each byte.
    ///
    /// A multivalued division can only be reversed when the reversed value
    /// set is still a range: the full range for whole-division reversal,
    /// or a single block on a byte boundary for per-byte reversal.
    ///
    /// The result carries no prefix length.
    pub fn reverse_bits(&self, per_byte: bool) -> Result<Division, IncompatibleAddressError> {
        if per_byte && self.bit_count % BITS_PER_BYTE != 0 {
            return Err(IncompatibleAddressError::NotByteAligned(u32::from(self.bit_count)));
        }
        let reverse = |value| {
            if per_byte {
                bits::reverse_bits_per_byte(value, self.bit_count)
            } else {
                bits::reverse_bits(value, self.bit_count)
            }
        };
        if !self.is_multiple() {
            let value = reverse(self.lower());
            return Ok(Self::from_range(RangeValue::single(value), self.bit_count, None));
        }
        if self.is_full_range() {
            return Ok(self.with_division_prefix(None));
        }
        if per_byte {
            if let Some(prefix_len) = self.prefix_len_for_single_block() {
                if prefix_len % BITS_PER_BYTE == 0 {
                    let range = RangeValue::new(reverse(self.lower()), reverse(self.upper()));
                    return Ok(Self::from_range(range, self.bit_count, None));
                }
            }
        }
        Err(IncompatibleAddressError::ReverseRange {
            lower: self.lower(),
            upper: self.upper(),
        })
    }

    /// Reverse the byte order.
    ///
    /// Multivalued divisions must span their full range unless they are a
    /// single byte wide.
    pub fn reverse_bytes(&self) -> Result<Division, IncompatibleAddressError> {
        if self.bit_count % BITS_PER_BYTE != 0 {
            return Err(IncompatibleAddressError::NotByteAligned(u32::from(self.bit_count)));
        }
        if !self.is_multiple() {
            let value = bits::reverse_bytes(self.lower(), self.bit_count);
            return Ok(Self::from_range(RangeValue::single(value), self.bit_count, None));
        }
        if self.bit_count == BITS_PER_BYTE || self.is_full_range() {
            return Ok(self.with_division_prefix(None));
        }
        Err(IncompatibleAddressError::ReverseRange {
            lower: self.lower(),
            upper: self.upper(),
        })
    }
}

impl PartialEq for Division {
    fn eq(&self, other: &Self) -> bool {
        self.bit_count == other.bit_count && self.range == other.range
    }
}

impl Eq for Division {}

impl Hash for Division {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bit_count.hash(state);
        self.range.hash(state);
    }
}

impl fmt::Debug for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Division")
            .field("lower", &self.lower())
            .field("upper", &self.upper())
            .field("bit_count", &self.bit_count)
            .field("prefix_len", &self.prefix_len)
            .finish()
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_multiple() {
            write!(f, "{}-{}", self.lower(), self.upper())
        } else {
            write!(f, "{}", self.lower())
        }
    }
}
