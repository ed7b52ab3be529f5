//! Read-only cursor over a trie node.

use core::fmt;

use crate::constants::EMPTY;
use crate::key::TrieKey;
use crate::trie::iter::{ContainedFirstIter, ContainingFirstIter, NodeIter};
use crate::trie::node::Node;
use crate::trie::trie::Trie;

/// Borrowed view of one node in a [`Trie`].
///
/// Holds the trie reference and the node's arena index, so navigation to
/// parents, children and in-order neighbours is O(1) or O(depth) without
/// any back-pointers in the key type.
pub struct NodeRef<'a, K, V> {
    trie: &'a Trie<K, V>,
    index: u32,
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<'a, K: TrieKey, V> NodeRef<'a, K, V> {
    #[inline]
    pub(crate) fn new(trie: &'a Trie<K, V>, index: u32) -> Self {
        NodeRef { trie, index }
    }

    #[inline(always)]
    fn node(&self) -> &'a Node<K, V> {
        self.trie.nodes.get(self.index)
    }

    #[inline]
    fn wrap(&self, index: u32) -> Option<NodeRef<'a, K, V>> {
        (index != EMPTY).then(|| NodeRef::new(self.trie, index))
    }

    /// Arena index of the node; stable until the node is removed.
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn key(&self) -> &'a K {
        &self.node().key
    }

    /// Associated value, `None` for junctions and keys added without one.
    #[inline]
    pub fn value(&self) -> Option<&'a V> {
        self.node().value.as_ref()
    }

    #[inline]
    pub fn is_added(&self) -> bool {
        self.node().added
    }

    /// Whether this is the trie's root.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.index == self.trie.root
    }

    /// Number of added nodes in this subtree, this node included.
    #[inline]
    pub fn size(&self) -> usize {
        self.node().size
    }

    pub fn parent(&self) -> Option<NodeRef<'a, K, V>> {
        self.wrap(self.node().parent)
    }

    /// Child whose keys have a zero at the bit after this node's prefix.
    pub fn lower_sub_node(&self) -> Option<NodeRef<'a, K, V>> {
        self.wrap(self.node().get_child(false))
    }

    /// Child whose keys have a one at the bit after this node's prefix.
    pub fn upper_sub_node(&self) -> Option<NodeRef<'a, K, V>> {
        self.wrap(self.node().get_child(true))
    }

    /// Next node in ascending order, junctions included.
    pub fn next_node(&self) -> Option<NodeRef<'a, K, V>> {
        self.wrap(self.trie.next_in_order(self.index, false))
    }

    /// Previous node in ascending order, junctions included.
    pub fn previous_node(&self) -> Option<NodeRef<'a, K, V>> {
        self.wrap(self.trie.prev_in_order(self.index, false))
    }

    /// Next added node in ascending order.
    pub fn next_added_node(&self) -> Option<NodeRef<'a, K, V>> {
        self.wrap(self.trie.next_in_order(self.index, true))
    }

    /// Previous added node in ascending order.
    pub fn previous_added_node(&self) -> Option<NodeRef<'a, K, V>> {
        self.wrap(self.trie.prev_in_order(self.index, true))
    }

    /// Smallest added node of this subtree.
    pub fn first_added_node(&self) -> Option<NodeRef<'a, K, V>> {
        self.wrap(self.trie.first_added_in(self.index))
    }

    /// Largest added node of this subtree.
    pub fn last_added_node(&self) -> Option<NodeRef<'a, K, V>> {
        self.wrap(self.trie.last_added_in(self.index))
    }

    /// Nodes of this subtree in ascending or descending order.
    ///
    /// # Arguments
    /// * `forward` - ascending when `true`
    /// * `added_only` - skip junctions when `true`
    pub fn node_iter(&self, forward: bool, added_only: bool) -> NodeIter<'a, K, V> {
        NodeIter::subtree(self.trie, self.index, forward, added_only)
    }

    /// Pre-order walk of this subtree: containing blocks before contained ones.
    pub fn containing_first_iter<C: Clone>(
        &self,
        forward: bool,
        added_only: bool,
    ) -> ContainingFirstIter<'a, K, V, C> {
        ContainingFirstIter::new(self.trie, self.index, forward, added_only)
    }

    /// Post-order walk of this subtree: contained blocks before containing ones.
    pub fn contained_first_iter(&self, forward: bool, added_only: bool) -> ContainedFirstIter<'a, K, V> {
        ContainedFirstIter::new(self.trie, self.index, forward, added_only)
    }

    /// Render this subtree, see [`Trie::to_tree_string`].
    pub fn to_tree_string(&self, with_non_added: bool, with_sizes: bool) -> String
    where
        V: fmt::Debug,
    {
        crate::trie::dump::tree_string(self.trie, self.index, with_non_added, with_sizes)
    }
}

impl<K: TrieKey, V: fmt::Debug> fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", &format_args!("{}", self.key()))
            .field("added", &self.is_added())
            .field("value", &self.value())
            .field("size", &self.size())
            .finish()
    }
}

impl<K: TrieKey, V> fmt::Display for NodeRef<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.key(), f)
    }
}
