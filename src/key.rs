//! Trait for trie key types (addresses and groupings).

use core::cmp::Ordering;
use core::fmt;
use std::sync::Arc;

use crate::address::{Address, Division, Grouping};
use crate::bits;
use crate::constants::BitCount;

/// Outcome of matching a key against an existing node key.
///
/// Produced by [`TrieKey::match_bits`] while descending the trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitsMatch {
    /// Same bits and same prefix length.
    Equal,
    /// The node key is a shorter prefix of the key. Descend into the child
    /// selected by the key's bit at the given index (the node's prefix length).
    Descend(BitCount),
    /// The key is a shorter prefix of the node key, so its block contains
    /// the node.
    Contains,
    /// The keys first differ at the given bit index.
    Diverge(BitCount),
}

/// Trait for address-like values stored in the trie.
///
/// Exposes exactly the bit-level primitives the trie needs: the bit count,
/// single-bit tests, trailing runs, the key's own prefix length, and
/// conversions to the boundary keys of a prefix block.
///
/// Trie keys are normalized: a single value without prefix length, or
/// exactly one prefix block carrying its block prefix length. The
/// effective prefix of a key is its prefix length, or the bit count for a
/// single value.
///
/// # Trie order
/// [`compare`](TrieKey::compare) places every prefix block between the
/// keys whose first host bit is 0 and those whose first host bit is 1:
///
/// ```text
/// 10.0.0.0 < ... < 10.127.255.255 < 10.0.0.0/8 < 10.128.0.0 < ... < 10.255.255.255
/// ```
///
/// Containing blocks therefore never interleave with the keys they contain.
pub trait TrieKey: Clone + fmt::Debug + fmt::Display + Sized {
    /// Total number of bits.
    fn bit_count(&self) -> BitCount;

    /// The key's own prefix length, `None` for a single value.
    fn prefix_len(&self) -> Option<BitCount>;

    /// Divisions holding the key bits, most significant first.
    fn divisions(&self) -> &[Arc<Division>];

    /// Highest key in the lower half of this prefix block (prefix stripped).
    fn to_max_lower(&self) -> Self;

    /// Lowest key in the upper half of this prefix block (prefix stripped).
    fn to_min_upper(&self) -> Self;

    /// The prefix block of the given length containing this key.
    fn to_prefix_block_len(&self, prefix_len: BitCount) -> Self;

    /// Normalize to a single value or a single prefix block.
    ///
    /// # Returns
    /// `None` if the value is multiple and not exactly one prefix block
    fn to_single_prefix_block_or_address(&self) -> Option<Self>;

    /// Prefix length, or the bit count when there is none.
    #[inline]
    fn effective_prefix_len(&self) -> BitCount {
        self.prefix_len().unwrap_or_else(|| self.bit_count())
    }

    /// Test the bit at `index`, counted from the most significant bit.
    ///
    /// # Panics
    /// Panics if `index >= bit_count()`.
    fn is_one_bit(&self, index: BitCount) -> bool {
        assert!(
            index < self.bit_count(),
            "bit index {} out of range for a {}-bit key",
            index,
            self.bit_count()
        );
        let mut offset = 0;
        for div in self.divisions() {
            if index < offset + div.bit_count() {
                return div.is_one_bit(index - offset);
            }
            offset += div.bit_count();
        }
        unreachable!("division widths sum to the bit count")
    }

    /// Length of the trailing run of `ones` (or zeros) in the lower value.
    fn trailing_bit_count(&self, ones: bool) -> BitCount {
        let mut total = 0;
        for div in self.divisions().iter().rev() {
            let run = if ones {
                bits::trailing_ones(div.lower(), div.bit_count())
            } else {
                bits::trailing_zeros(div.lower(), div.bit_count())
            };
            total += run;
            if run < div.bit_count() {
                break;
            }
        }
        total
    }

    /// Trie total order.
    ///
    /// Let `m` be the shorter effective prefix. The first `m` bits decide
    /// when they differ. Otherwise equal prefixes mean equal keys, and the
    /// longer key sorts after the shorter one when its bit at `m` is 1 and
    /// before it when that bit is 0.
    ///
    /// # Panics
    /// Panics when the keys have different bit counts or division layouts.
    fn compare(&self, other: &Self) -> Ordering {
        assert_eq!(
            self.bit_count(),
            other.bit_count(),
            "cannot compare trie keys of different bit counts"
        );
        let self_prefix = self.effective_prefix_len();
        let other_prefix = other.effective_prefix_len();
        let shorter = self_prefix.min(other_prefix);
        if let Some(index) = first_difference(self.divisions(), other.divisions(), 0, shorter) {
            return if self.is_one_bit(index) {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }
        match self_prefix.cmp(&other_prefix) {
            Ordering::Equal => Ordering::Equal,
            Ordering::Greater => {
                if self.is_one_bit(shorter) {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            Ordering::Less => {
                if other.is_one_bit(shorter) {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
        }
    }

    /// Match this key against `existing`, a node key whose leading
    /// `bit_index` bits are already known to match.
    ///
    /// Walks the divisions from `bit_index` up to the shorter effective
    /// prefix. Per division, the existing key's prefix may end inside it,
    /// this key's prefix may end inside it, both may, or neither does (the
    /// whole division is compared and matching continues).
    ///
    /// # Panics
    /// Panics when the keys have different bit counts or division layouts.
    fn match_bits(&self, existing: &Self, bit_index: BitCount) -> BitsMatch {
        assert_eq!(
            self.bit_count(),
            existing.bit_count(),
            "cannot match trie keys of different bit counts"
        );
        let new_prefix = self.effective_prefix_len();
        let existing_prefix = existing.effective_prefix_len();
        let shorter = new_prefix.min(existing_prefix);
        if let Some(index) = first_difference(self.divisions(), existing.divisions(), bit_index, shorter) {
            return BitsMatch::Diverge(index);
        }
        match existing_prefix.cmp(&new_prefix) {
            Ordering::Equal => BitsMatch::Equal,
            Ordering::Less => BitsMatch::Descend(existing_prefix),
            Ordering::Greater => BitsMatch::Contains,
        }
    }

    /// Whether this key's block contains `other` (or equals it).
    fn contains_key(&self, other: &Self) -> bool {
        matches!(other.match_bits(self, 0), BitsMatch::Equal | BitsMatch::Descend(_))
    }
}

/// First bit index in `[from, to)` at which the lower values differ.
///
/// # Panics
/// Panics if the division layouts differ.
fn first_difference(
    one: &[Arc<Division>],
    two: &[Arc<Division>],
    from: BitCount,
    to: BitCount,
) -> Option<BitCount> {
    assert_eq!(one.len(), two.len(), "mismatched division layouts");
    let mut offset: BitCount = 0;
    for (mine, theirs) in one.iter().zip(two.iter()) {
        let width = mine.bit_count();
        assert_eq!(width, theirs.bit_count(), "mismatched division layouts");
        if offset >= to {
            break;
        }
        let end = offset + width;
        if end > from {
            // bits before `from` are masked out so they compare equal
            let mask = bits::host_mask(width, from.saturating_sub(offset));
            let len = (to - offset).min(width);
            if let Some(index) = bits::first_difference(mine.lower() & mask, theirs.lower() & mask, width, len) {
                return Some(offset + index);
            }
        }
        offset = end;
    }
    None
}

impl TrieKey for Grouping {
    #[inline]
    fn bit_count(&self) -> BitCount {
        Grouping::bit_count(self)
    }

    #[inline]
    fn prefix_len(&self) -> Option<BitCount> {
        Grouping::prefix_len(self)
    }

    #[inline]
    fn divisions(&self) -> &[Arc<Division>] {
        Grouping::divisions(self)
    }

    fn to_max_lower(&self) -> Self {
        Grouping::to_max_lower(self)
    }

    fn to_min_upper(&self) -> Self {
        Grouping::to_min_upper(self)
    }

    fn to_prefix_block_len(&self, prefix_len: BitCount) -> Self {
        Grouping::to_prefix_block_len(self, prefix_len)
    }

    fn to_single_prefix_block_or_address(&self) -> Option<Self> {
        Grouping::to_single_prefix_block_or_address(self)
    }
}

/// Zones are dropped on normalization; the trie orders by bits only.
impl TrieKey for Address {
    #[inline]
    fn bit_count(&self) -> BitCount {
        Address::bit_count(self)
    }

    #[inline]
    fn prefix_len(&self) -> Option<BitCount> {
        Address::prefix_len(self)
    }

    #[inline]
    fn divisions(&self) -> &[Arc<Division>] {
        Address::divisions(self)
    }

    fn to_max_lower(&self) -> Self {
        Address::to_max_lower(self)
    }

    fn to_min_upper(&self) -> Self {
        Address::to_min_upper(self)
    }

    fn to_prefix_block_len(&self, prefix_len: BitCount) -> Self {
        Address::to_prefix_block_len(self, prefix_len)
    }

    fn to_single_prefix_block_or_address(&self) -> Option<Self> {
        Address::to_single_prefix_block_or_address(&self.without_zone())
    }
}
