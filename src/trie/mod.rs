//! Trie node structures and main API.

mod basic;
mod dump;
mod iter;
mod node;
mod node_ref;
mod search;
mod state;
#[allow(clippy::module_inception)]
mod trie;

pub use iter::{BlockSizeIter, ContainedFirstIter, ContainingFirstIter, Iter, Keys, NodeIter};
pub use node::Node;
pub use node_ref::NodeRef;
pub use trie::Trie;
