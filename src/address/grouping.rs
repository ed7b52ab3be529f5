//! Grouping (section): an ordered sequence of divisions with an optional
//! prefix length.

use core::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::address::division::{division_prefix, Division};
use crate::address::intern::byte_division;
use crate::address::range::RangeValue;
use crate::bits;
use crate::constants::{
    BitCount, BITS_PER_BYTE, IPV4_BITS_PER_SEGMENT, IPV4_SEGMENT_COUNT, IPV6_BITS_PER_SEGMENT,
    IPV6_SEGMENT_COUNT, MAC_BITS_PER_SEGMENT, MAC_EXTENDED_SEGMENT_COUNT, MAC_SEGMENT_COUNT,
    MAX_GROUPING_BITS,
};
use crate::error::{AddressValueError, IncompatibleAddressError};
use crate::memo::Memo;

/// Family tag of a grouping.
///
/// Declaration order is the cross-family rank used by the comparators:
/// `Ipv6 > Ipv4 > Ip > Mac > Section > Zero`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupingKind {
    /// The distinguished empty grouping.
    Zero,
    /// Generic section with no family semantics.
    Section,
    Mac,
    /// Generic IP section (per-division prefixes, no fixed layout).
    Ip,
    Ipv4,
    Ipv6,
}

impl GroupingKind {
    /// IP kinds assign prefix lengths to individual divisions.
    #[inline]
    pub fn is_ip(self) -> bool {
        matches!(self, GroupingKind::Ip | GroupingKind::Ipv4 | GroupingKind::Ipv6)
    }

    pub fn name(self) -> &'static str {
        match self {
            GroupingKind::Zero => "zero",
            GroupingKind::Section => "section",
            GroupingKind::Mac => "MAC",
            GroupingKind::Ip => "IP",
            GroupingKind::Ipv4 => "IPv4",
            GroupingKind::Ipv6 => "IPv6",
        }
    }
}

/// Number of values represented by a grouping.
///
/// A full 128-bit range holds 2^128 values, one more than `u128::MAX`.
/// The derived ordering is numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddressCount {
    Exact(u128),
    TwoPow128,
}

impl AddressCount {
    /// The count as an integer, unless it is 2^128.
    #[inline]
    pub fn exact(self) -> Option<u128> {
        match self {
            AddressCount::Exact(count) => Some(count),
            AddressCount::TwoPow128 => None,
        }
    }

    #[inline]
    pub fn is_multiple(self) -> bool {
        self != AddressCount::Exact(1)
    }
}

/// Ordered, fixed-length sequence of divisions of one family.
///
/// Groupings are immutable. Operations that change the prefix or the values
/// return new groupings that share every unchanged division with the
/// original through reference counting.
///
/// Equality and hashing compare the kind and the division values. The
/// prefix length is not part of equality.
///
/// # Example
/// ```rust
/// use addr_trie::{Division, Grouping, GroupingKind};
///
/// let divisions = vec![
///     Division::single(10, 8).unwrap(),
///     Division::single(1, 8).unwrap(),
///     Division::full_range(8).unwrap(),
///     Division::full_range(8).unwrap(),
/// ];
/// let section = Grouping::from_divisions(GroupingKind::Ipv4, divisions, None).unwrap();
/// assert_eq!(section.prefix_len_for_single_block(), Some(16));
/// assert!(section.contains_prefix_block(16));
/// assert!(!section.contains_prefix_block(17));
/// ```
#[derive(Clone)]
pub struct Grouping {
    kind: GroupingKind,
    divisions: Vec<Arc<Division>>,
    prefix_len: Option<BitCount>,
    bit_count: BitCount,

    /// Any division multiple; fixed at construction.
    is_multiple: bool,

    min_prefix: Memo<BitCount>,
    single_block_prefix: Memo<Option<BitCount>>,
}

impl Grouping {
    /// Build a grouping from shared divisions.
    ///
    /// # Arguments
    /// * `kind` - Family tag; fixed-layout families are validated
    /// * `divisions` - Divisions in most-significant-first order
    /// * `prefix_len` - Optional prefix length, at most the total bit count
    ///
    /// # Errors
    /// - [`AddressValueError::GroupingTooLarge`] above 128 bits
    /// - [`AddressValueError::InvalidLayout`] when the divisions do not
    ///   match the family (IPv4 4x8, IPv6 8x16, MAC 6x8 or 8x8, zero empty)
    /// - [`AddressValueError::PrefixLenExceedsBitCount`]
    pub fn new(
        kind: GroupingKind,
        divisions: Vec<Arc<Division>>,
        prefix_len: Option<BitCount>,
    ) -> Result<Self, AddressValueError> {
        let bit_count: u32 = divisions.iter().map(|div| u32::from(div.bit_count())).sum();
        if bit_count > MAX_GROUPING_BITS {
            return Err(AddressValueError::GroupingTooLarge(bit_count));
        }
        check_layout(kind, &divisions)?;
        if let Some(prefix_len) = prefix_len {
            if u32::from(prefix_len) > bit_count {
                return Err(AddressValueError::PrefixLenExceedsBitCount { prefix_len, bit_count });
            }
        }
        Ok(Self::build(kind, divisions, prefix_len))
    }

    /// Build a grouping from owned divisions.
    pub fn from_divisions(
        kind: GroupingKind,
        divisions: Vec<Division>,
        prefix_len: Option<BitCount>,
    ) -> Result<Self, AddressValueError> {
        Self::new(kind, divisions.into_iter().map(Arc::new).collect(), prefix_len)
    }

    /// The distinguished empty grouping.
    pub fn zero() -> Self {
        Self::build(GroupingKind::Zero, Vec::new(), None)
    }

    /// Single-valued IPv4 section.
    pub fn ipv4(octets: [u8; 4]) -> Self {
        let divisions = octets.iter().map(|&octet| byte_division(octet)).collect();
        Self::build(GroupingKind::Ipv4, divisions, None)
    }

    /// Single-valued IPv6 section.
    pub fn ipv6(segments: [u16; 8]) -> Self {
        let divisions = segments
            .iter()
            .map(|&segment| single_division(u64::from(segment), IPV6_BITS_PER_SEGMENT))
            .collect();
        Self::build(GroupingKind::Ipv6, divisions, None)
    }

    /// Single-valued MAC section (6 or 8 bytes).
    pub fn mac(bytes: &[u8]) -> Result<Self, AddressValueError> {
        let divisions = bytes.iter().map(|&byte| byte_division(byte)).collect();
        Self::new(GroupingKind::Mac, divisions, None)
    }

    /// Assemble without validation. Assigns per-division prefixes for IP
    /// kinds and caches the multiplicity summary.
    pub(crate) fn build(kind: GroupingKind, divisions: Vec<Arc<Division>>, prefix_len: Option<BitCount>) -> Self {
        let bit_count = divisions.iter().map(|div| div.bit_count()).sum();
        let divisions = assign_division_prefixes(kind, divisions, prefix_len);
        let is_multiple = divisions.iter().any(|div| div.is_multiple());
        Grouping {
            kind,
            divisions,
            prefix_len,
            bit_count,
            is_multiple,
            min_prefix: Memo::new(),
            single_block_prefix: Memo::new(),
        }
    }

    /// Same values with a new prefix; the value-derived memos carry over.
    fn rebuild_prefix(&self, prefix_len: Option<BitCount>) -> Self {
        let mut grouping = Self::build(self.kind, self.divisions.clone(), prefix_len);
        grouping.min_prefix = self.min_prefix.clone();
        grouping.single_block_prefix = self.single_block_prefix.clone();
        grouping
    }

    /// Single-valued grouping with the layout, kind and prefix of `template`.
    ///
    /// Bits of `value` above the template's bit count are ignored.
    pub fn from_value(template: &Grouping, value: u128) -> Grouping {
        let mut shift = u32::from(template.bit_count);
        let divisions = template
            .divisions
            .iter()
            .map(|div| {
                shift -= u32::from(div.bit_count());
                let part = (value >> shift) as u64 & bits::max_value(div.bit_count());
                single_division(part, div.bit_count())
            })
            .collect();
        Self::build(template.kind, divisions, template.prefix_len)
    }

    #[inline]
    pub fn kind(&self) -> GroupingKind {
        self.kind
    }

    #[inline]
    pub fn divisions(&self) -> &[Arc<Division>] {
        &self.divisions
    }

    /// Division at `index`.
    ///
    /// # Panics
    /// Panics if `index >= division_count()`.
    #[inline]
    pub fn division(&self, index: usize) -> &Division {
        &self.divisions[index]
    }

    #[inline]
    pub fn division_count(&self) -> usize {
        self.divisions.len()
    }

    #[inline]
    pub fn bit_count(&self) -> BitCount {
        self.bit_count
    }

    #[inline]
    pub fn prefix_len(&self) -> Option<BitCount> {
        self.prefix_len
    }

    #[inline]
    pub fn is_multiple(&self) -> bool {
        self.is_multiple
    }

    /// Whether the kind is [`GroupingKind::Zero`].
    #[inline]
    pub fn is_zero_grouping(&self) -> bool {
        self.kind == GroupingKind::Zero
    }

    /// Divisions paired with the bit offset at which each starts.
    fn offsets(&self) -> impl Iterator<Item = (BitCount, &Arc<Division>)> {
        self.divisions.iter().scan(0, |offset: &mut BitCount, div| {
            let start = *offset;
            *offset += div.bit_count();
            Some((start, div))
        })
    }

    /// Same kind and identical division widths.
    pub(crate) fn same_layout(&self, other: &Grouping) -> bool {
        self.kind == other.kind
            && self.divisions.len() == other.divisions.len()
            && self
                .divisions
                .iter()
                .zip(other.divisions.iter())
                .all(|(one, two)| one.bit_count() == two.bit_count())
    }

    /// Number of values, as the product of the division counts.
    pub fn count(&self) -> AddressCount {
        if !self.is_multiple {
            return AddressCount::Exact(1);
        }
        self.divisions
            .iter()
            .try_fold(1u128, |acc, div| acc.checked_mul(div.count()))
            .map_or(AddressCount::TwoPow128, AddressCount::Exact)
    }

    /// Lower value as an unsigned integer of `bit_count` bits.
    pub fn value(&self) -> u128 {
        self.divisions.iter().fold(0u128, |acc, div| {
            bits::shl128(acc, u32::from(div.bit_count())) | u128::from(div.lower())
        })
    }

    /// Upper value as an unsigned integer of `bit_count` bits.
    pub fn upper_value(&self) -> u128 {
        self.divisions.iter().fold(0u128, |acc, div| {
            bits::shl128(acc, u32::from(div.bit_count())) | u128::from(div.upper())
        })
    }

    /// Big-endian bytes of the lower value.
    ///
    /// # Errors
    /// [`IncompatibleAddressError::NotByteAligned`] when the bit count is
    /// not a multiple of 8.
    pub fn bytes(&self) -> Result<Vec<u8>, IncompatibleAddressError> {
        self.value_bytes(self.value())
    }

    /// Big-endian bytes of the upper value.
    pub fn upper_bytes(&self) -> Result<Vec<u8>, IncompatibleAddressError> {
        self.value_bytes(self.upper_value())
    }

    fn value_bytes(&self, value: u128) -> Result<Vec<u8>, IncompatibleAddressError> {
        if self.bit_count % BITS_PER_BYTE != 0 {
            return Err(IncompatibleAddressError::NotByteAligned(u32::from(self.bit_count)));
        }
        let byte_count = usize::from(self.bit_count / BITS_PER_BYTE);
        Ok(value.to_be_bytes()[16 - byte_count..].to_vec())
    }

    /// Whether every division spans its full range.
    pub fn is_full_range(&self) -> bool {
        self.divisions.iter().all(|div| div.is_full_range())
    }

    /// Whether the value set is one contiguous interval.
    ///
    /// Once a division is multiple, every later division must be full range.
    pub fn is_sequential(&self) -> bool {
        match self.divisions.iter().position(|div| div.is_multiple()) {
            None => true,
            Some(index) => self.divisions[index + 1..].iter().all(|div| div.is_full_range()),
        }
    }

    /// Whether the bits from `prefix_len` onward span their full range.
    ///
    /// Divisions before the prefix boundary are unconstrained, the boundary
    /// division must contain the block for its local prefix and every later
    /// division must be full range.
    ///
    /// # Arguments
    /// * `prefix_len` - Clamped to `0..=bit_count`
    pub fn contains_prefix_block(&self, prefix_len: BitCount) -> bool {
        let prefix_len = prefix_len.min(self.bit_count);
        for (index, (offset, div)) in self.offsets().enumerate() {
            if prefix_len < offset + div.bit_count() {
                return div.contains_prefix_block(prefix_len - offset)
                    && self.divisions[index + 1..].iter().all(|div| div.is_full_range());
            }
        }
        true
    }

    /// Whether the grouping is exactly one prefix block for `prefix_len`.
    ///
    /// Like [`contains_prefix_block`](Self::contains_prefix_block) but every
    /// division before the boundary must be single-valued.
    pub fn contains_single_prefix_block(&self, prefix_len: BitCount) -> bool {
        let prefix_len = prefix_len.min(self.bit_count);
        for (index, (offset, div)) in self.offsets().enumerate() {
            if prefix_len < offset + div.bit_count() {
                return div.contains_single_prefix_block(prefix_len - offset)
                    && self.divisions[index + 1..].iter().all(|div| div.is_full_range());
            }
            if div.is_multiple() {
                return false;
            }
        }
        true
    }

    /// Smallest prefix length for which the grouping contains prefix blocks.
    ///
    /// Walks from the last division towards the first, releasing each fully
    /// free division and stopping at the first one with network bits.
    pub fn min_prefix_len_for_block(&self) -> BitCount {
        *self.min_prefix.get_or_init(|| {
            let mut total = self.bit_count;
            for div in self.divisions.iter().rev() {
                let div_prefix = div.min_prefix_len_for_block();
                total -= div.bit_count() - div_prefix;
                if div_prefix != 0 {
                    break;
                }
            }
            total
        })
    }

    /// The prefix length for which the grouping is exactly one prefix
    /// block, if there is one.
    pub fn prefix_len_for_single_block(&self) -> Option<BitCount> {
        *self.single_block_prefix.get_or_init(|| {
            let mut total: BitCount = 0;
            for (index, div) in self.divisions.iter().enumerate() {
                let div_prefix = div.prefix_len_for_single_block()?;
                total += div_prefix;
                if div_prefix < div.bit_count() {
                    return self.divisions[index + 1..]
                        .iter()
                        .all(|div| div.is_full_range())
                        .then_some(total);
                }
            }
            Some(total)
        })
    }

    /// Whether the grouping has a prefix length and is a block for it.
    pub fn is_prefix_block(&self) -> bool {
        self.prefix_len
            .is_some_and(|prefix_len| self.contains_prefix_block(prefix_len))
    }

    /// Whether the grouping has a prefix length and is exactly one block for it.
    pub fn is_single_prefix_block(&self) -> bool {
        self.prefix_len
            .is_some_and(|prefix_len| self.contains_single_prefix_block(prefix_len))
    }

    /// Whether every value of `other` is a value of this grouping.
    ///
    /// Groupings of different kinds or layouts never contain each other.
    pub fn contains(&self, other: &Grouping) -> bool {
        self.same_layout(other)
            && self
                .divisions
                .iter()
                .zip(other.divisions.iter())
                .all(|(mine, theirs)| mine.contains(theirs))
    }

    /// Whether the two groupings share at least one value.
    pub fn overlaps(&self, other: &Grouping) -> bool {
        self.same_layout(other)
            && self
                .divisions
                .iter()
                .zip(other.divisions.iter())
                .all(|(mine, theirs)| mine.overlaps(theirs))
    }

    /// Whether the network bits of this grouping contain the corresponding
    /// bits of `other`.
    ///
    /// Only the leading `prefix_len` bits are compared (all bits when
    /// unprefixed), so `10.0.0.0/8` prefix-contains `10.1.2.3` and
    /// `10.1.0.0/16`.
    pub fn prefix_contains(&self, other: &Grouping) -> bool {
        if !self.same_layout(other) {
            return false;
        }
        let prefix_len = self.prefix_len.unwrap_or(self.bit_count);
        for ((offset, mine), theirs) in self.offsets().zip(other.divisions.iter()) {
            let width = mine.bit_count();
            if offset + width <= prefix_len {
                if !mine.contains(theirs) {
                    return false;
                }
                continue;
            }
            if offset >= prefix_len {
                return true;
            }
            let shift = u32::from(width - (prefix_len - offset));
            return (theirs.lower() >> shift) >= (mine.lower() >> shift)
                && (theirs.upper() >> shift) <= (mine.upper() >> shift);
        }
        true
    }

    /// Copy with the given prefix length (clamped to the bit count).
    pub fn with_prefix_len(&self, prefix_len: BitCount) -> Grouping {
        self.rebuild_prefix(Some(prefix_len.min(self.bit_count)))
    }

    /// Copy with no prefix length.
    pub fn without_prefix_len(&self) -> Grouping {
        if self.prefix_len.is_none() {
            return self.clone();
        }
        self.rebuild_prefix(None)
    }

    /// The prefix block(s) for this grouping's own prefix length, or an
    /// unchanged copy when unprefixed.
    pub fn to_prefix_block(&self) -> Grouping {
        match self.prefix_len {
            Some(prefix_len) => self.to_prefix_block_len(prefix_len),
            None => self.clone(),
        }
    }

    /// The prefix block(s) for `prefix_len` covering this grouping.
    ///
    /// Host bits are widened to their full range and the result carries
    /// `prefix_len`. Network bits keep their multiplicity.
    pub fn to_prefix_block_len(&self, prefix_len: BitCount) -> Grouping {
        let prefix_len = prefix_len.min(self.bit_count);
        if self.contains_prefix_block(prefix_len) {
            return self.rebuild_prefix(Some(prefix_len));
        }
        let divisions = self
            .offsets()
            .map(|(offset, div)| {
                if offset + div.bit_count() <= prefix_len {
                    Arc::clone(div)
                } else {
                    Arc::new(div.to_prefix_block(prefix_len.saturating_sub(offset)))
                }
            })
            .collect();
        Self::build(self.kind, divisions, Some(prefix_len))
    }

    /// Copy prefixed with [`min_prefix_len_for_block`](Self::min_prefix_len_for_block).
    pub fn assign_min_prefix_for_block(&self) -> Grouping {
        self.with_prefix_len(self.min_prefix_len_for_block())
    }

    /// Copy prefixed with the single-block prefix length, if there is one.
    pub fn assign_prefix_for_single_block(&self) -> Option<Grouping> {
        self.prefix_len_for_single_block()
            .map(|prefix_len| self.with_prefix_len(prefix_len))
    }

    /// Normalize to a single unprefixed value or to exactly one prefix block
    /// carrying its block prefix length.
    ///
    /// # Returns
    /// `None` when the grouping is multiple and not a single prefix block
    pub fn to_single_prefix_block_or_address(&self) -> Option<Grouping> {
        if !self.is_multiple {
            return Some(self.without_prefix_len());
        }
        self.assign_prefix_for_single_block()
    }

    /// Single-valued grouping of the lower values; keeps the prefix.
    pub fn lower(&self) -> Grouping {
        if !self.is_multiple {
            return self.clone();
        }
        let divisions = self
            .divisions
            .iter()
            .map(|div| single_division(div.lower(), div.bit_count()))
            .collect();
        Self::build(self.kind, divisions, self.prefix_len)
    }

    /// Single-valued grouping of the upper values; keeps the prefix.
    pub fn upper(&self) -> Grouping {
        if !self.is_multiple {
            return self.clone();
        }
        let divisions = self
            .divisions
            .iter()
            .map(|div| single_division(div.upper(), div.bit_count()))
            .collect();
        Self::build(self.kind, divisions, self.prefix_len)
    }

    /// Highest value of the lower half of the prefix block: the network
    /// bits, a zero at the first host bit, ones after it. Unprefixed.
    ///
    /// Without a prefix (or with a full-length one) this is the lower value.
    pub fn to_max_lower(&self) -> Grouping {
        self.host_boundary(false)
    }

    /// Lowest value of the upper half of the prefix block: the network
    /// bits, a one at the first host bit, zeros after it. Unprefixed.
    pub fn to_min_upper(&self) -> Grouping {
        self.host_boundary(true)
    }

    fn host_boundary(&self, upper_half: bool) -> Grouping {
        let template = self.without_prefix_len();
        let host_bits = match self.prefix_len {
            Some(prefix_len) if prefix_len < self.bit_count => u32::from(self.bit_count - prefix_len),
            _ => return template.lower(),
        };
        let network = self.value() & !bits::max_value128(host_bits);
        let first_host_bit = 1u128 << (host_bits - 1);
        let value = if upper_half {
            network | first_host_bit
        } else {
            network | (first_host_bit - 1)
        };
        Grouping::from_value(&template, value)
    }

    /// Reverse the division order. The result is unprefixed.
    pub fn reverse_segments(&self) -> Grouping {
        let divisions = self.divisions.iter().rev().cloned().collect();
        Self::build(self.kind, divisions, None)
    }

    /// Reverse the bit order of the whole grouping, or of each byte.
    ///
    /// # Errors
    /// [`IncompatibleAddressError`] when a multivalued division cannot be
    /// reversed into a range.
    pub fn reverse_bits(&self, per_byte: bool) -> Result<Grouping, IncompatibleAddressError> {
        let reversed: Result<Vec<_>, _> = if per_byte {
            self.divisions
                .iter()
                .map(|div| div.reverse_bits(true).map(Arc::new))
                .collect()
        } else {
            self.divisions
                .iter()
                .rev()
                .map(|div| div.reverse_bits(false).map(Arc::new))
                .collect()
        };
        Ok(Self::build(self.kind, reversed?, None))
    }

    /// Reverse the byte order of the whole grouping.
    pub fn reverse_bytes(&self) -> Result<Grouping, IncompatibleAddressError> {
        let reversed = self
            .divisions
            .iter()
            .rev()
            .map(|div| div.reverse_bytes().map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::build(self.kind, reversed, None))
    }

    /// Minimal list of prefix blocks, in ascending order, whose union is
    /// this grouping's range.
    ///
    /// # Errors
    /// [`IncompatibleAddressError::NotSequential`] when the grouping is not
    /// one contiguous interval.
    pub fn span_with_prefix_blocks(&self) -> Result<Vec<Grouping>, IncompatibleAddressError> {
        if !self.is_sequential() {
            return Err(IncompatibleAddressError::NotSequential);
        }
        if !self.is_multiple {
            return Ok(vec![self.without_prefix_len()]);
        }
        if let Some(prefix_len) = self.prefix_len_for_single_block() {
            return Ok(vec![self.with_prefix_len(prefix_len)]);
        }

        let bit_count = u32::from(self.bit_count);
        let template = self.without_prefix_len();
        let upper = self.upper_value();
        let mut lower = self.value();
        let mut blocks = Vec::new();
        loop {
            let mut host_bits = lower.trailing_zeros().min(bit_count);
            let mut end = lower | bits::max_value128(host_bits);
            while end > upper {
                host_bits -= 1;
                end = lower | bits::max_value128(host_bits);
            }
            let block = Grouping::from_value(&template, lower);
            blocks.push(block.to_prefix_block_len((bit_count - host_bits) as BitCount));
            if end >= upper {
                break;
            }
            lower = end + 1;
        }
        Ok(blocks)
    }
}

/// Check the division widths against the family layout.
fn check_layout(kind: GroupingKind, divisions: &[Arc<Division>]) -> Result<(), AddressValueError> {
    let (counts, width): (&[usize], BitCount) = match kind {
        GroupingKind::Ipv4 => (&[IPV4_SEGMENT_COUNT], IPV4_BITS_PER_SEGMENT),
        GroupingKind::Ipv6 => (&[IPV6_SEGMENT_COUNT], IPV6_BITS_PER_SEGMENT),
        GroupingKind::Mac => (&[MAC_SEGMENT_COUNT, MAC_EXTENDED_SEGMENT_COUNT], MAC_BITS_PER_SEGMENT),
        GroupingKind::Zero if !divisions.is_empty() => {
            return Err(AddressValueError::InvalidLayout {
                kind: kind.name(),
                detail: format!("expected no divisions, found {}", divisions.len()),
            });
        }
        GroupingKind::Zero | GroupingKind::Ip | GroupingKind::Section => return Ok(()),
    };
    if !counts.contains(&divisions.len()) {
        return Err(AddressValueError::InvalidLayout {
            kind: kind.name(),
            detail: format!("expected {:?} divisions, found {}", counts, divisions.len()),
        });
    }
    if let Some(div) = divisions.iter().find(|div| div.bit_count() != width) {
        return Err(AddressValueError::InvalidLayout {
            kind: kind.name(),
            detail: format!("expected {}-bit divisions, found {}", width, div.bit_count()),
        });
    }
    Ok(())
}

/// Give each division of an IP grouping the share of the prefix that falls
/// inside it. Other kinds keep unprefixed divisions.
fn assign_division_prefixes(
    kind: GroupingKind,
    divisions: Vec<Arc<Division>>,
    prefix_len: Option<BitCount>,
) -> Vec<Arc<Division>> {
    let mut offset = 0i32;
    divisions
        .into_iter()
        .map(|div| {
            let wanted = match prefix_len {
                Some(prefix_len) if kind.is_ip() => division_prefix(div.bit_count(), i32::from(prefix_len) - offset),
                _ => None,
            };
            offset += i32::from(div.bit_count());
            if div.prefix_len() == wanted {
                div
            } else {
                Arc::new(div.with_division_prefix(wanted))
            }
        })
        .collect()
}

/// Single-valued unprefixed division, shared for byte values.
pub(crate) fn single_division(value: u64, bit_count: BitCount) -> Arc<Division> {
    if bit_count == BITS_PER_BYTE {
        byte_division(value as u8)
    } else {
        Arc::new(Division::from_range(RangeValue::single(value), bit_count, None))
    }
}

impl PartialEq for Grouping {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.divisions.len() == other.divisions.len()
            && self
                .divisions
                .iter()
                .zip(other.divisions.iter())
                .all(|(one, two)| one == two)
    }
}

impl Eq for Grouping {}

impl Hash for Grouping {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        for div in &self.divisions {
            div.hash(state);
        }
    }
}

impl core::fmt::Debug for Grouping {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Grouping")
            .field("kind", &self.kind)
            .field("value", &format_args!("{}", self))
            .field("prefix_len", &self.prefix_len)
            .finish()
    }
}
