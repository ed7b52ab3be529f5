//! Slab storage for trie nodes.
//!
//! Nodes link to each other by `u32` arena index rather than by pointer, so
//! parent and child links form no reference cycles and a freed slot is
//! reused by the next allocation.

#[allow(clippy::module_inception)]
mod arena;

pub use arena::Arena;
