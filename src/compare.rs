//! Total orders over address items for sorting collections.
//!
//! These orders are independent of the trie order in [`crate::key`]. Two
//! strategies are provided:
//! - [`CountComparator`]: fewer values first, then by value
//! - [`ValueComparator`]: by the upper or lower bound first, then the other
//!
//! Each has a "reverse secondary" variant that inverts the tie-break.
//!
//! Items of different kinds are ordered by a fixed rank: divisions before
//! groupings before addresses. Groupings and addresses of different
//! families are ordered by [`GroupingKind`] rank
//! (`Zero < Section < Mac < Ip < Ipv4 < Ipv6`).
//!
//! # Example
//! ```rust
//! use std::net::Ipv4Addr;
//! use addr_trie::{Address, AddressComparator, COUNT_COMPARATOR};
//!
//! let mut addrs = vec![
//!     Address::from(Ipv4Addr::new(10, 0, 0, 9)).to_prefix_block_len(24),
//!     Address::from(Ipv4Addr::new(10, 0, 0, 9)),
//!     Address::from(Ipv4Addr::new(10, 0, 0, 1)),
//! ];
//! addrs.sort_by(|a, b| COUNT_COMPARATOR.compare_addresses(a, b));
//! assert_eq!(addrs[0].to_string(), "10.0.0.1");
//! assert_eq!(addrs[2].to_string(), "10.0.0.0/24");
//! ```

use core::cmp::Ordering;
use std::sync::Arc;

use crate::address::{Address, AddressCount, Division, Grouping};
use crate::bits;
use crate::constants::BitCount;

/// Any item the comparators can order.
#[derive(Debug, Clone, Copy)]
pub enum AddressItem<'a> {
    Address(&'a Address),
    Grouping(&'a Grouping),
    Division(&'a Division),
}

impl AddressItem<'_> {
    /// Cross-kind rank: division < grouping < address.
    fn rank(&self) -> u8 {
        match self {
            AddressItem::Division(_) => 0,
            AddressItem::Grouping(_) => 1,
            AddressItem::Address(_) => 2,
        }
    }
}

impl<'a> From<&'a Address> for AddressItem<'a> {
    fn from(address: &'a Address) -> Self {
        AddressItem::Address(address)
    }
}

impl<'a> From<&'a Grouping> for AddressItem<'a> {
    fn from(grouping: &'a Grouping) -> Self {
        AddressItem::Grouping(grouping)
    }
}

impl<'a> From<&'a Division> for AddressItem<'a> {
    fn from(division: &'a Division) -> Self {
        AddressItem::Division(division)
    }
}

/// A total order over address items.
///
/// Implementors supply the section and value comparisons; dispatch across
/// item kinds, families and zones is shared.
pub trait AddressComparator {
    /// Compare two groupings of any family by bits alone.
    fn compare_sections(&self, one: &Grouping, two: &Grouping) -> Ordering;

    /// Compare two division sequences whose layouts may differ.
    ///
    /// The sequences are walked in aligned windows: each window is the
    /// largest run of bits that lies within a single division on both sides.
    fn compare_division_series(&self, one: &[Arc<Division>], two: &[Arc<Division>]) -> Ordering;

    /// Compare two ranges of at most 64 bits given as `(upper, lower)`.
    fn compare_u64_values(&self, one_upper: u64, one_lower: u64, two_upper: u64, two_lower: u64) -> Ordering;

    /// Compare two ranges of at most 128 bits given as `(upper, lower)`.
    fn compare_large_values(&self, one_upper: u128, one_lower: u128, two_upper: u128, two_lower: u128) -> Ordering;

    /// Compare two segment ranges.
    #[inline]
    fn compare_segment_values(&self, one_upper: u64, one_lower: u64, two_upper: u64, two_lower: u64) -> Ordering {
        self.compare_u64_values(one_upper, one_lower, two_upper, two_lower)
    }

    /// Compare any two items.
    fn compare(&self, one: AddressItem<'_>, two: AddressItem<'_>) -> Ordering {
        match (one, two) {
            (AddressItem::Address(one), AddressItem::Address(two)) => self.compare_addresses(one, two),
            (AddressItem::Grouping(one), AddressItem::Grouping(two)) => self.compare_groupings(one, two),
            (AddressItem::Division(one), AddressItem::Division(two)) => self.compare_divisions(one, two),
            (one, two) => one.rank().cmp(&two.rank()),
        }
    }

    /// Family rank, then bits, then zone (no zone first).
    fn compare_addresses(&self, one: &Address, two: &Address) -> Ordering {
        self.compare_groupings(one.section(), two.section())
            .then_with(|| one.zone().cmp(&two.zone()))
    }

    /// Family rank, then bits.
    fn compare_groupings(&self, one: &Grouping, two: &Grouping) -> Ordering {
        one.kind()
            .cmp(&two.kind())
            .then_with(|| self.compare_sections(one, two))
    }

    /// Width, then values.
    fn compare_divisions(&self, one: &Division, two: &Division) -> Ordering {
        one.bit_count()
            .cmp(&two.bit_count())
            .then_with(|| self.compare_segment_values(one.upper(), one.lower(), two.upper(), two.lower()))
    }
}

/// Aligned slice of both division sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    one_lower: u64,
    one_upper: u64,
    two_lower: u64,
    two_upper: u64,
}

/// Iterator over aligned windows of two division sequences.
///
/// Stops when either sequence is exhausted.
struct AlignedWindows<'a> {
    one: &'a [Arc<Division>],
    two: &'a [Arc<Division>],
    one_index: usize,
    two_index: usize,
    one_used: BitCount,
    two_used: BitCount,
}

impl<'a> AlignedWindows<'a> {
    fn new(one: &'a [Arc<Division>], two: &'a [Arc<Division>]) -> Self {
        AlignedWindows {
            one,
            two,
            one_index: 0,
            two_index: 0,
            one_used: 0,
            two_used: 0,
        }
    }
}

/// Bits `[start, start + width)`, counted from the top, of both bounds.
#[inline]
fn chunk(div: &Division, start: BitCount, width: BitCount) -> (u64, u64) {
    let shift = u32::from(div.bit_count() - start - width);
    let mask = bits::max_value(width);
    (
        bits::shr(div.lower(), shift) & mask,
        bits::shr(div.upper(), shift) & mask,
    )
}

impl Iterator for AlignedWindows<'_> {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        let one = self.one.get(self.one_index)?;
        let two = self.two.get(self.two_index)?;
        let width = (one.bit_count() - self.one_used).min(two.bit_count() - self.two_used);
        let (one_lower, one_upper) = chunk(one, self.one_used, width);
        let (two_lower, two_upper) = chunk(two, self.two_used, width);

        self.one_used += width;
        if self.one_used == one.bit_count() {
            self.one_index += 1;
            self.one_used = 0;
        }
        self.two_used += width;
        if self.two_used == two.bit_count() {
            self.two_index += 1;
            self.two_used = 0;
        }
        Some(Window {
            one_lower,
            one_upper,
            two_lower,
            two_upper,
        })
    }
}

fn total_bits(series: &[Arc<Division>]) -> u32 {
    series.iter().map(|div| u32::from(div.bit_count())).sum()
}

/// Product of the division counts, saturating at 2^128.
fn series_count(series: &[Arc<Division>]) -> AddressCount {
    series
        .iter()
        .try_fold(1u128, |acc, div| acc.checked_mul(div.count()))
        .map_or(AddressCount::TwoPow128, AddressCount::Exact)
}

/// Orders by the number of values first, then by value.
///
/// Equal counts are ordered by the whole lower value, then the whole upper
/// value. Both are ascending, or descending when `reverse_secondary` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CountComparator {
    pub reverse_secondary: bool,
}

impl CountComparator {
    #[inline]
    fn secondary(&self, ordering: Ordering) -> Ordering {
        if self.reverse_secondary {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

impl AddressComparator for CountComparator {
    fn compare_sections(&self, one: &Grouping, two: &Grouping) -> Ordering {
        one.bit_count()
            .cmp(&two.bit_count())
            .then_with(|| one.count().cmp(&two.count()))
            .then_with(|| self.secondary(one.value().cmp(&two.value())))
            .then_with(|| self.secondary(one.upper_value().cmp(&two.upper_value())))
    }

    fn compare_division_series(&self, one: &[Arc<Division>], two: &[Arc<Division>]) -> Ordering {
        total_bits(one)
            .cmp(&total_bits(two))
            .then_with(|| series_count(one).cmp(&series_count(two)))
            .then_with(|| {
                // whole lower values before whole upper values
                let lower = AlignedWindows::new(one, two)
                    .map(|w| w.one_lower.cmp(&w.two_lower))
                    .find(|ordering| ordering.is_ne());
                let ordering = lower.or_else(|| {
                    AlignedWindows::new(one, two)
                        .map(|w| w.one_upper.cmp(&w.two_upper))
                        .find(|ordering| ordering.is_ne())
                });
                self.secondary(ordering.unwrap_or(Ordering::Equal))
            })
    }

    fn compare_u64_values(&self, one_upper: u64, one_lower: u64, two_upper: u64, two_lower: u64) -> Ordering {
        one_upper
            .abs_diff(one_lower)
            .cmp(&two_upper.abs_diff(two_lower))
            .then_with(|| self.secondary(one_lower.cmp(&two_lower)))
            .then_with(|| self.secondary(one_upper.cmp(&two_upper)))
    }

    fn compare_large_values(&self, one_upper: u128, one_lower: u128, two_upper: u128, two_lower: u128) -> Ordering {
        one_upper
            .abs_diff(one_lower)
            .cmp(&two_upper.abs_diff(two_lower))
            .then_with(|| self.secondary(one_lower.cmp(&two_lower)))
            .then_with(|| self.secondary(one_upper.cmp(&two_upper)))
    }
}

/// Orders by one bound first, then by the other.
///
/// With `compare_high_value` the upper bound is primary, otherwise the
/// lower bound. `reverse_secondary` inverts the tie-break on the other bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValueComparator {
    pub compare_high_value: bool,
    pub reverse_secondary: bool,
}

impl ValueComparator {
    /// Split a `(upper, lower)` pair into `(primary, secondary)`.
    #[inline]
    fn keys<T>(&self, upper: T, lower: T) -> (T, T) {
        if self.compare_high_value {
            (upper, lower)
        } else {
            (lower, upper)
        }
    }

    #[inline]
    fn secondary(&self, ordering: Ordering) -> Ordering {
        if self.reverse_secondary {
            ordering.reverse()
        } else {
            ordering
        }
    }

    fn compare_keys<T: Ord>(&self, one_upper: T, one_lower: T, two_upper: T, two_lower: T) -> Ordering {
        let (one_primary, one_secondary) = self.keys(one_upper, one_lower);
        let (two_primary, two_secondary) = self.keys(two_upper, two_lower);
        one_primary
            .cmp(&two_primary)
            .then_with(|| self.secondary(one_secondary.cmp(&two_secondary)))
    }
}

impl AddressComparator for ValueComparator {
    fn compare_sections(&self, one: &Grouping, two: &Grouping) -> Ordering {
        one.bit_count()
            .cmp(&two.bit_count())
            .then_with(|| self.compare_large_values(one.upper_value(), one.value(), two.upper_value(), two.value()))
    }

    fn compare_division_series(&self, one: &[Arc<Division>], two: &[Arc<Division>]) -> Ordering {
        total_bits(one).cmp(&total_bits(two)).then_with(|| {
            // primary bound across every window before the secondary bound
            let primary = AlignedWindows::new(one, two)
                .map(|w| {
                    let (one_key, _) = self.keys(w.one_upper, w.one_lower);
                    let (two_key, _) = self.keys(w.two_upper, w.two_lower);
                    one_key.cmp(&two_key)
                })
                .find(|ordering| ordering.is_ne());
            if let Some(ordering) = primary {
                return ordering;
            }
            AlignedWindows::new(one, two)
                .map(|w| {
                    let (_, one_key) = self.keys(w.one_upper, w.one_lower);
                    let (_, two_key) = self.keys(w.two_upper, w.two_lower);
                    self.secondary(one_key.cmp(&two_key))
                })
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        })
    }

    fn compare_u64_values(&self, one_upper: u64, one_lower: u64, two_upper: u64, two_lower: u64) -> Ordering {
        self.compare_keys(one_upper, one_lower, two_upper, two_lower)
    }

    fn compare_large_values(&self, one_upper: u128, one_lower: u128, two_upper: u128, two_lower: u128) -> Ordering {
        self.compare_keys(one_upper, one_lower, two_upper, two_lower)
    }
}

/// Smaller ranges first, then ascending lower value.
pub const COUNT_COMPARATOR: CountComparator = CountComparator {
    reverse_secondary: false,
};

/// Smaller ranges first, then descending lower value.
pub const REVERSE_COUNT_COMPARATOR: CountComparator = CountComparator {
    reverse_secondary: true,
};

/// Ascending upper value, then ascending lower value.
pub const HIGH_VALUE_COMPARATOR: ValueComparator = ValueComparator {
    compare_high_value: true,
    reverse_secondary: false,
};

/// Ascending lower value, then ascending upper value.
pub const LOW_VALUE_COMPARATOR: ValueComparator = ValueComparator {
    compare_high_value: false,
    reverse_secondary: false,
};

/// Ascending upper value, then descending lower value.
pub const REVERSE_HIGH_VALUE_COMPARATOR: ValueComparator = ValueComparator {
    compare_high_value: true,
    reverse_secondary: true,
};

/// Ascending lower value, then descending upper value.
pub const REVERSE_LOW_VALUE_COMPARATOR: ValueComparator = ValueComparator {
    compare_high_value: false,
    reverse_secondary: true,
};

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, Ipv6Addr};

    use super::*;
    use crate::address::GroupingKind;

    fn v4(a: u8, b: u8, c: u8, d: u8) -> Address {
        Address::from(Ipv4Addr::new(a, b, c, d))
    }

    fn div(lower: u64, upper: u64, bit_count: BitCount) -> Division {
        Division::new(lower, upper, bit_count).unwrap()
    }

    #[test]
    fn test_item_rank() {
        let address = v4(1, 2, 3, 4);
        let grouping = Grouping::ipv4([1, 2, 3, 4]);
        let division = div(1, 1, 8);
        let cmp = COUNT_COMPARATOR;
        assert_eq!(cmp.compare((&division).into(), (&grouping).into()), Ordering::Less);
        assert_eq!(cmp.compare((&address).into(), (&grouping).into()), Ordering::Greater);
        assert_eq!(cmp.compare((&address).into(), (&address).into()), Ordering::Equal);
    }

    #[test]
    fn test_family_rank() {
        let ipv4 = v4(255, 255, 255, 255);
        let ipv6 = Address::from(Ipv6Addr::UNSPECIFIED);
        let mac = Address::mac([0xff; 6]);
        for cmp in [&COUNT_COMPARATOR as &dyn AddressComparator, &LOW_VALUE_COMPARATOR] {
            assert_eq!(cmp.compare_addresses(&ipv4, &ipv6), Ordering::Less);
            assert_eq!(cmp.compare_addresses(&mac, &ipv4), Ordering::Less);
        }
    }

    #[test]
    fn test_count_first() {
        let single = v4(10, 0, 0, 200);
        let block = v4(10, 0, 0, 0).to_prefix_block_len(24);
        let smaller_block = v4(10, 0, 1, 0).to_prefix_block_len(25);
        assert_eq!(COUNT_COMPARATOR.compare_addresses(&single, &block), Ordering::Less);
        assert_eq!(COUNT_COMPARATOR.compare_addresses(&smaller_block, &block), Ordering::Less);

        let low = v4(10, 0, 0, 1);
        let high = v4(10, 0, 0, 2);
        assert_eq!(COUNT_COMPARATOR.compare_addresses(&low, &high), Ordering::Less);
        assert_eq!(REVERSE_COUNT_COMPARATOR.compare_addresses(&low, &high), Ordering::Greater);
        assert_eq!(REVERSE_COUNT_COMPARATOR.compare_addresses(&single, &block), Ordering::Less);
    }

    #[test]
    fn test_value_first() {
        // 10.0.0.0-10.0.0.255 vs 10.0.0.0-10.0.0.127
        let wide = v4(10, 0, 0, 0).to_prefix_block_len(24);
        let narrow = v4(10, 0, 0, 0).to_prefix_block_len(25);
        assert_eq!(LOW_VALUE_COMPARATOR.compare_addresses(&narrow, &wide), Ordering::Less);
        assert_eq!(REVERSE_LOW_VALUE_COMPARATOR.compare_addresses(&narrow, &wide), Ordering::Greater);
        assert_eq!(HIGH_VALUE_COMPARATOR.compare_addresses(&narrow, &wide), Ordering::Less);

        // same upper, different lower
        let tail = v4(10, 0, 0, 128).to_prefix_block_len(25);
        assert_eq!(HIGH_VALUE_COMPARATOR.compare_addresses(&wide, &tail), Ordering::Less);
        assert_eq!(REVERSE_HIGH_VALUE_COMPARATOR.compare_addresses(&wide, &tail), Ordering::Greater);
    }

    #[test]
    fn test_zone_tie_break() {
        let base = Address::from("fe80::1".parse::<Ipv6Addr>().unwrap());
        let eth0 = base.with_zone("eth0").unwrap();
        let eth1 = base.with_zone("eth1").unwrap();
        assert_eq!(LOW_VALUE_COMPARATOR.compare_addresses(&base, &eth0), Ordering::Less);
        assert_eq!(LOW_VALUE_COMPARATOR.compare_addresses(&eth0, &eth1), Ordering::Less);
        assert_eq!(LOW_VALUE_COMPARATOR.compare_addresses(&eth1, &eth1), Ordering::Equal);
    }

    #[test]
    fn test_divisions() {
        assert_eq!(
            LOW_VALUE_COMPARATOR.compare_divisions(&div(1, 1, 8), &div(0, 0, 16)),
            Ordering::Less
        );
        assert_eq!(
            COUNT_COMPARATOR.compare_divisions(&div(5, 9, 8), &div(0, 1, 8)),
            Ordering::Greater
        );
        assert_eq!(
            HIGH_VALUE_COMPARATOR.compare_divisions(&div(5, 9, 8), &div(0, 10, 8)),
            Ordering::Less
        );
    }

    #[test]
    fn test_windowed_series_across_layouts() {
        // one 16-bit division against two 8-bit divisions holding the same bits
        let wide = vec![Arc::new(div(0x1234, 0x1234, 16))];
        let narrow = vec![Arc::new(div(0x12, 0x12, 8)), Arc::new(div(0x34, 0x34, 8))];
        let bigger = vec![Arc::new(div(0x12, 0x12, 8)), Arc::new(div(0x35, 0x35, 8))];
        for cmp in [
            &COUNT_COMPARATOR as &dyn AddressComparator,
            &LOW_VALUE_COMPARATOR,
            &HIGH_VALUE_COMPARATOR,
        ] {
            assert_eq!(cmp.compare_division_series(&wide, &narrow), Ordering::Equal);
            assert_eq!(cmp.compare_division_series(&wide, &bigger), Ordering::Less);
            assert_eq!(cmp.compare_division_series(&bigger, &wide), Ordering::Greater);
        }
        let short = vec![Arc::new(div(0xff, 0xff, 8))];
        assert_eq!(
            LOW_VALUE_COMPARATOR.compare_division_series(&short, &wide),
            Ordering::Less
        );
    }

    #[test]
    fn test_value_series_matches_sections() {
        let one = Grouping::ipv4([10, 1, 0, 0]).to_prefix_block_len(16);
        let two = Grouping::ipv4([10, 1, 0, 0]).to_prefix_block_len(20);
        for cmp in [
            LOW_VALUE_COMPARATOR,
            HIGH_VALUE_COMPARATOR,
            REVERSE_LOW_VALUE_COMPARATOR,
            REVERSE_HIGH_VALUE_COMPARATOR,
        ] {
            assert_eq!(
                cmp.compare_sections(&one, &two),
                cmp.compare_division_series(one.divisions(), two.divisions())
            );
        }
    }

    fn section(divisions: &[(u64, u64, BitCount)]) -> Grouping {
        let divisions = divisions
            .iter()
            .map(|&(lower, upper, bit_count)| div(lower, upper, bit_count))
            .collect();
        Grouping::from_divisions(GroupingKind::Section, divisions, None).unwrap()
    }

    #[test]
    fn test_count_tie_orders_by_whole_lower_value() {
        // 0-1:9 covers 0x009 and 0x109, 1:0-1 covers 0x100 and 0x101
        let one = section(&[(0, 1, 8), (9, 9, 8)]);
        let two = section(&[(1, 1, 8), (0, 1, 8)]);
        assert_eq!(one.count(), two.count());
        assert_eq!(COUNT_COMPARATOR.compare_groupings(&one, &two), Ordering::Less);
        assert_eq!(REVERSE_COUNT_COMPARATOR.compare_groupings(&one, &two), Ordering::Greater);
        assert_eq!(
            COUNT_COMPARATOR.compare_division_series(one.divisions(), two.divisions()),
            Ordering::Less
        );

        // same lower value, upper value decides
        let narrow = section(&[(1, 1, 8), (0, 1, 8)]);
        let split = section(&[(1, 2, 8), (0, 0, 8)]);
        assert_eq!(COUNT_COMPARATOR.compare_groupings(&narrow, &split), Ordering::Less);
        assert_eq!(REVERSE_COUNT_COMPARATOR.compare_groupings(&narrow, &split), Ordering::Greater);
    }

    #[test]
    fn test_count_order_is_transitive_across_layouts() {
        let a = section(&[(0x3f, 0x40, 8)]);
        let b = section(&[(0x40, 0x41, 8)]);
        let x = section(&[(1, 1, 2), (0, 1, 6)]);
        for cmp in [COUNT_COMPARATOR, REVERSE_COUNT_COMPARATOR] {
            let a_b = cmp.compare_groupings(&a, &b);
            assert_eq!(cmp.compare_groupings(&b, &x), Ordering::Equal);
            assert_eq!(cmp.compare_groupings(&a, &x), a_b);
            assert_eq!(
                cmp.compare_division_series(a.divisions(), x.divisions()),
                cmp.compare_groupings(&a, &x)
            );
        }

        let high = section(&[(0xb8, 0xf5, 8)]);
        let low = section(&[(0, 0x3d, 8)]);
        let low_split = section(&[(0, 0, 2), (0, 0x3d, 6)]);
        let cmp = REVERSE_COUNT_COMPARATOR;
        assert_eq!(cmp.compare_groupings(&high, &low), Ordering::Less);
        assert_eq!(cmp.compare_groupings(&low, &low_split), Ordering::Equal);
        assert_eq!(cmp.compare_groupings(&high, &low_split), Ordering::Less);
    }

    #[test]
    fn test_generic_kinds() {
        let section = Grouping::new(GroupingKind::Section, Grouping::ipv4([1, 2, 3, 4]).divisions().to_vec(), None)
            .unwrap();
        let ipv4 = Grouping::ipv4([0, 0, 0, 0]);
        assert_eq!(COUNT_COMPARATOR.compare_groupings(&section, &ipv4), Ordering::Less);
        assert_eq!(COUNT_COMPARATOR.compare_groupings(&Grouping::zero(), &section), Ordering::Less);
    }
}
