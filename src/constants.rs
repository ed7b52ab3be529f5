//! Core constants and type definitions for addr-trie.

/// Bit count or prefix length of a division, grouping or trie key.
///
/// Groupings never exceed [`MAX_GROUPING_BITS`], so a byte is enough.
pub type BitCount = u8;

/// Sentinel value for empty/null arena index.
///
/// Used to indicate:
/// - Empty child slot in a trie node
/// - Missing parent of the root node
/// - Empty root in a trie that has never been written
pub const EMPTY: u32 = u32::MAX;

/// Widest division supported (values are held in a `u64`).
pub const MAX_DIVISION_BITS: BitCount = 64;

/// Widest grouping supported (values are assembled into a `u128`).
pub const MAX_GROUPING_BITS: u32 = 128;

/// Bits per byte, the granularity of byte-level conversions and reversal.
pub const BITS_PER_BYTE: BitCount = 8;

/// Number of segments in an IPv4 address
pub const IPV4_SEGMENT_COUNT: usize = 4;

/// Bits per IPv4 segment
pub const IPV4_BITS_PER_SEGMENT: BitCount = 8;

/// Number of segments in an IPv6 address
pub const IPV6_SEGMENT_COUNT: usize = 8;

/// Bits per IPv6 segment
pub const IPV6_BITS_PER_SEGMENT: BitCount = 16;

/// Number of segments in a MAC-48 address
pub const MAC_SEGMENT_COUNT: usize = 6;

/// Number of segments in an EUI-64 MAC address
pub const MAC_EXTENDED_SEGMENT_COUNT: usize = 8;

/// Bits per MAC segment
pub const MAC_BITS_PER_SEGMENT: BitCount = 8;
