//! # addr-trie
//!
//! Range-aware IP and MAC address values and a compact binary trie for
//! subnet containment and longest-prefix match.
//!
//! ## Features
//! - Divisions, groupings and addresses whose values are ranges, with
//!   prefix-block predicates memoized once per value
//! - Total orders for sorting mixed address items (count and value based)
//! - A path-compressed binary trie keyed on single addresses and prefix
//!   blocks: O(bit count) insert, remove, contains and longest-prefix match
//! - Sorted, block-size, containing-first and contained-first traversal
//!
//! ## Example
//! ```rust
//! use std::net::Ipv4Addr;
//! use addr_trie::{Address, Trie};
//!
//! let net = |s: &str| Address::from(s.parse::<ipnet::IpNet>().unwrap());
//! let mut routes = Trie::new();
//! routes.put(net("10.0.0.0/8"), "core");
//! routes.put(net("10.1.0.0/16"), "branch");
//!
//! let hop = routes
//!     .longest_prefix_match_node(&Address::from(Ipv4Addr::new(10, 1, 2, 3)))
//!     .and_then(|node| node.value().copied());
//! assert_eq!(hop, Some("branch"));
//! ```
//!
//! ## Features flags
//! - `single-threaded`: memoized fields use `OnceCell` instead of
//!   `OnceLock` and byte divisions are not interned. Values become `!Sync`.

pub mod address;
pub mod arena;
mod bits;
pub mod compare;
pub mod constants;
pub mod error;
pub mod key;
mod memo;
pub mod trie;

pub use address::{Address, AddressCount, AddressFamily, Division, Grouping, GroupingKind, RangeValue};
pub use compare::{
    AddressComparator, AddressItem, CountComparator, ValueComparator, COUNT_COMPARATOR, HIGH_VALUE_COMPARATOR,
    LOW_VALUE_COMPARATOR, REVERSE_COUNT_COMPARATOR, REVERSE_HIGH_VALUE_COMPARATOR, REVERSE_LOW_VALUE_COMPARATOR,
};
pub use constants::BitCount;
pub use error::{AddressValueError, IncompatibleAddressError};
pub use key::{BitsMatch, TrieKey};
pub use trie::{BlockSizeIter, ContainedFirstIter, ContainingFirstIter, Iter, Keys, NodeIter, NodeRef, Trie};
