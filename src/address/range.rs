//! Immutable `[lower, upper]` value pair.

/// Inclusive range of division values.
///
/// The atomic unit of multiplicity: a single value when `lower == upper`,
/// otherwise every integer in between. Bounds are sorted on construction
/// and never change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeValue {
    lower: u64,
    upper: u64,
}

impl RangeValue {
    /// Create a range from two bounds in either order.
    ///
    /// # Example
    /// ```rust
    /// use addr_trie::RangeValue;
    ///
    /// let range = RangeValue::new(9, 3);
    /// assert_eq!((range.lower(), range.upper()), (3, 9));
    /// ```
    #[inline]
    pub const fn new(one: u64, two: u64) -> Self {
        if one <= two {
            RangeValue {
                lower: one,
                upper: two,
            }
        } else {
            RangeValue {
                lower: two,
                upper: one,
            }
        }
    }

    /// Create a range holding exactly one value.
    #[inline]
    pub const fn single(value: u64) -> Self {
        RangeValue {
            lower: value,
            upper: value,
        }
    }

    #[inline]
    pub const fn lower(&self) -> u64 {
        self.lower
    }

    #[inline]
    pub const fn upper(&self) -> u64 {
        self.upper
    }

    /// Whether the range holds more than one value.
    #[inline]
    pub const fn is_multiple(&self) -> bool {
        self.lower != self.upper
    }

    /// Number of values in the range.
    ///
    /// A full 64-bit range holds 2^64 values, so the result is a `u128`.
    #[inline]
    pub const fn count(&self) -> u128 {
        (self.upper - self.lower) as u128 + 1
    }

    /// Whether every value of `other` is also in this range.
    #[inline]
    pub const fn contains(&self, other: &RangeValue) -> bool {
        self.lower <= other.lower && self.upper >= other.upper
    }

    /// Whether the two ranges share at least one value.
    #[inline]
    pub const fn overlaps(&self, other: &RangeValue) -> bool {
        self.lower <= other.upper && other.lower <= self.upper
    }
}
