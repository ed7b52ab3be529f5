//! Iterator support for Trie traversal.
//!
//! Five traversal families:
//! - sorted order, ascending or descending ([`NodeIter`], [`Keys`], [`Iter`])
//! - node order over all nodes, junctions included (`added_only = false`)
//! - block-size order, largest blocks first ([`BlockSizeIter`])
//! - containing-first pre-order with parent to child caching
//!   ([`ContainingFirstIter`])
//! - contained-first post-order ([`ContainedFirstIter`])
//!
//! # Performance
//! - Sorted iteration: O(1) amortized per node, O(depth) worst case
//! - Block-size iteration: O(log n) per node (binary heap)
//! - Pre/post-order: O(1) amortized per node, explicit stack of O(depth)

use core::cmp::Ordering;
use core::iter::FusedIterator;
use std::collections::BinaryHeap;

use crate::constants::EMPTY;
use crate::key::TrieKey;
use crate::trie::node_ref::NodeRef;
use crate::trie::trie::Trie;

/// Iterator over the nodes of a subtree in sorted order.
///
/// # Algorithm
/// 1. Start at the first (or last) node of the subtree
/// 2. Step with the in-order successor (or predecessor)
/// 3. Stop at the neighbour just outside the subtree, computed up front
///
/// # Example
/// ```rust
/// use addr_trie::{Address, Trie};
///
/// let net = |s: &str| Address::from(s.parse::<ipnet::IpNet>().unwrap());
/// let mut trie: Trie<Address> = Trie::new();
/// trie.add(net("10.0.0.0/8"));
/// trie.add(net("10.0.0.0/16"));
/// trie.add(net("10.128.0.0/16"));
///
/// let keys: Vec<String> = trie.node_iter(true).map(|node| node.to_string()).collect();
/// assert_eq!(keys, vec!["10.0.0.0/16", "10.0.0.0/8", "10.128.0.0/16"]);
/// ```
pub struct NodeIter<'a, K, V> {
    trie: &'a Trie<K, V>,

    /// Next node to yield, `EMPTY` when exhausted.
    current: u32,

    /// First node past the end of the subtree, `EMPTY` for the trie end.
    stop: u32,

    forward: bool,
    added_only: bool,
}

impl<'a, K: TrieKey, V> NodeIter<'a, K, V> {
    /// Iterate the subtree rooted at `idx`.
    pub(crate) fn subtree(trie: &'a Trie<K, V>, idx: u32, forward: bool, added_only: bool) -> Self {
        let (start, end) = if forward {
            (trie.first_in(idx, added_only), trie.last_in(idx, added_only))
        } else {
            (trie.last_in(idx, added_only), trie.first_in(idx, added_only))
        };
        let stop = match end {
            EMPTY => EMPTY,
            end if forward => trie.next_in_order(end, added_only),
            end => trie.prev_in_order(end, added_only),
        };
        NodeIter {
            trie,
            current: start,
            stop,
            forward,
            added_only,
        }
    }
}

impl<'a, K: TrieKey, V> Iterator for NodeIter<'a, K, V> {
    type Item = NodeRef<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == EMPTY || self.current == self.stop {
            return None;
        }
        let idx = self.current;
        self.current = if self.forward {
            self.trie.next_in_order(idx, self.added_only)
        } else {
            self.trie.prev_in_order(idx, self.added_only)
        };
        Some(NodeRef::new(self.trie, idx))
    }
}

impl<K: TrieKey, V> FusedIterator for NodeIter<'_, K, V> {}

/// Iterator over added keys in sorted order.
pub struct Keys<'a, K, V> {
    inner: NodeIter<'a, K, V>,
}

impl<'a, K: TrieKey, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|node| node.key())
    }
}

impl<K: TrieKey, V> FusedIterator for Keys<'_, K, V> {}

/// Iterator over added keys and their values in ascending order.
pub struct Iter<'a, K, V> {
    inner: NodeIter<'a, K, V>,
}

impl<'a, K: TrieKey, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, Option<&'a V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|node| (node.key(), node.value()))
    }
}

impl<K: TrieKey, V> FusedIterator for Iter<'_, K, V> {}

/// Heap entry for block-size order.
///
/// `BinaryHeap` pops the greatest entry, so "greater" here means "comes
/// first": shorter prefix, then the configured tie-break.
struct BlockEntry<'a, K> {
    key: &'a K,
    idx: u32,
    lower_first: bool,
}

impl<K: TrieKey> Ord for BlockEntry<'_, K> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .effective_prefix_len()
            .cmp(&self.key.effective_prefix_len())
            .then_with(|| {
                if self.lower_first {
                    other.key.compare(self.key)
                } else {
                    self.key.compare(other.key)
                }
            })
    }
}

impl<K: TrieKey> PartialOrd for BlockEntry<'_, K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: TrieKey> PartialEq for BlockEntry<'_, K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: TrieKey> Eq for BlockEntry<'_, K> {}

/// Iterator in block-size order: shorter prefixes (larger blocks) first,
/// equal prefixes broken by the trie order, lower or upper first.
///
/// A node's children always have longer prefixes than the node itself, so
/// a best-first walk over a heap seeded with the root yields the nodes in
/// globally sorted order.
pub struct BlockSizeIter<'a, K, V> {
    trie: &'a Trie<K, V>,
    heap: BinaryHeap<BlockEntry<'a, K>>,
    lower_first: bool,
    added_only: bool,
}

impl<'a, K: TrieKey, V> BlockSizeIter<'a, K, V> {
    pub(crate) fn new(trie: &'a Trie<K, V>, idx: u32, lower_first: bool, added_only: bool) -> Self {
        let mut iter = BlockSizeIter {
            trie,
            heap: BinaryHeap::new(),
            lower_first,
            added_only,
        };
        iter.push(idx);
        iter
    }

    fn push(&mut self, idx: u32) {
        if idx != EMPTY {
            let trie = self.trie;
            self.heap.push(BlockEntry {
                key: &trie.nodes.get(idx).key,
                idx,
                lower_first: self.lower_first,
            });
        }
    }
}

impl<'a, K: TrieKey, V> Iterator for BlockSizeIter<'a, K, V> {
    type Item = NodeRef<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(entry) = self.heap.pop() {
            let node = self.trie.nodes.get(entry.idx);
            let children = node.children;
            let added = node.added;
            for child in children {
                self.push(child);
            }
            if added || !self.added_only {
                return Some(NodeRef::new(self.trie, entry.idx));
            }
        }
        None
    }
}

impl<K: TrieKey, V> FusedIterator for BlockSizeIter<'_, K, V> {}

/// Pre-order iterator: every node before the nodes it contains.
///
/// While a node is the current one, a value may be attached to either of
/// its sub-nodes with [`cache_with_lower_sub_node`] or
/// [`cache_with_upper_sub_node`]; it is returned by [`cached`] when that
/// sub-node is visited. When junctions are skipped, a value attached to a
/// junction passes on to both of its sub-nodes.
///
/// [`cache_with_lower_sub_node`]: ContainingFirstIter::cache_with_lower_sub_node
/// [`cache_with_upper_sub_node`]: ContainingFirstIter::cache_with_upper_sub_node
/// [`cached`]: ContainingFirstIter::cached
///
/// # Example
/// ```rust
/// use addr_trie::{Address, Trie};
///
/// let net = |s: &str| Address::from(s.parse::<ipnet::IpNet>().unwrap());
/// let mut trie: Trie<Address> = Trie::new();
/// for text in ["10.0.0.0/8", "10.1.0.0/16", "10.1.1.0/24"] {
///     trie.add(net(text));
/// }
///
/// // record each block's depth in the containment hierarchy
/// let mut iter = trie.containing_first_iter::<usize>(true, true);
/// let mut depths = Vec::new();
/// while let Some(node) = iter.next() {
///     let depth = iter.cached().copied().unwrap_or(0);
///     depths.push((node.to_string(), depth));
///     iter.cache_with_lower_sub_node(depth + 1);
///     iter.cache_with_upper_sub_node(depth + 1);
/// }
/// assert_eq!(depths[2], ("10.1.1.0/24".to_string(), 2));
/// ```
pub struct ContainingFirstIter<'a, K, V, C> {
    trie: &'a Trie<K, V>,
    stack: Vec<(u32, Option<C>)>,
    forward: bool,
    added_only: bool,

    /// Cache handed to the current node.
    cached: Option<C>,

    /// Stack positions of the current node's sub-nodes.
    lower_slot: Option<usize>,
    upper_slot: Option<usize>,
}

impl<'a, K: TrieKey, V, C: Clone> ContainingFirstIter<'a, K, V, C> {
    pub(crate) fn new(trie: &'a Trie<K, V>, idx: u32, forward: bool, added_only: bool) -> Self {
        let mut stack = Vec::new();
        if idx != EMPTY {
            stack.push((idx, None));
        }
        ContainingFirstIter {
            trie,
            stack,
            forward,
            added_only,
            cached: None,
            lower_slot: None,
            upper_slot: None,
        }
    }

    /// Value attached to the current node by its containing node.
    pub fn cached(&self) -> Option<&C> {
        self.cached.as_ref()
    }

    /// Attach a value to the current node's lower sub-node.
    ///
    /// # Returns
    /// `false` if the current node has no lower sub-node
    pub fn cache_with_lower_sub_node(&mut self, value: C) -> bool {
        self.cache_at(self.lower_slot, value)
    }

    /// Attach a value to the current node's upper sub-node.
    ///
    /// # Returns
    /// `false` if the current node has no upper sub-node
    pub fn cache_with_upper_sub_node(&mut self, value: C) -> bool {
        self.cache_at(self.upper_slot, value)
    }

    fn cache_at(&mut self, slot: Option<usize>, value: C) -> bool {
        match slot.and_then(|slot| self.stack.get_mut(slot)) {
            Some(entry) => {
                entry.1 = Some(value);
                true
            }
            None => false,
        }
    }
}

impl<'a, K: TrieKey, V, C: Clone> Iterator for ContainingFirstIter<'a, K, V, C> {
    type Item = NodeRef<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, cache)) = self.stack.pop() {
            let node = self.trie.nodes.get(idx);
            let skip = self.added_only && !node.added;
            let inherited = if skip { cache.clone() } else { None };

            self.lower_slot = None;
            self.upper_slot = None;
            // push the side visited second first
            for upper in [self.forward, !self.forward] {
                let child = node.get_child(upper);
                if child == EMPTY {
                    continue;
                }
                self.stack.push((child, inherited.clone()));
                let slot = Some(self.stack.len() - 1);
                if upper {
                    self.upper_slot = slot;
                } else {
                    self.lower_slot = slot;
                }
            }

            if skip {
                continue;
            }
            self.cached = cache;
            return Some(NodeRef::new(self.trie, idx));
        }
        self.cached = None;
        self.lower_slot = None;
        self.upper_slot = None;
        None
    }
}

impl<K: TrieKey, V, C: Clone> FusedIterator for ContainingFirstIter<'_, K, V, C> {}

/// Post-order iterator: every node after the nodes it contains.
pub struct ContainedFirstIter<'a, K, V> {
    trie: &'a Trie<K, V>,

    /// `(index, children_pushed)`
    stack: Vec<(u32, bool)>,
    forward: bool,
    added_only: bool,
}

impl<'a, K: TrieKey, V> ContainedFirstIter<'a, K, V> {
    pub(crate) fn new(trie: &'a Trie<K, V>, idx: u32, forward: bool, added_only: bool) -> Self {
        let mut stack = Vec::new();
        if idx != EMPTY {
            stack.push((idx, false));
        }
        ContainedFirstIter {
            trie,
            stack,
            forward,
            added_only,
        }
    }
}

impl<'a, K: TrieKey, V> Iterator for ContainedFirstIter<'a, K, V> {
    type Item = NodeRef<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, expanded)) = self.stack.pop() {
            let node = self.trie.nodes.get(idx);
            if !expanded {
                self.stack.push((idx, true));
                for upper in [self.forward, !self.forward] {
                    let child = node.get_child(upper);
                    if child != EMPTY {
                        self.stack.push((child, false));
                    }
                }
                continue;
            }
            if node.added || !self.added_only {
                return Some(NodeRef::new(self.trie, idx));
            }
        }
        None
    }
}

impl<K: TrieKey, V> FusedIterator for ContainedFirstIter<'_, K, V> {}

impl<K: TrieKey, V> Trie<K, V> {
    /// Added keys with their values in ascending order.
    ///
    /// # Example
    /// ```rust
    /// use std::net::Ipv4Addr;
    /// use addr_trie::{Address, Trie};
    ///
    /// let mut trie = Trie::new();
    /// trie.put(Address::from(Ipv4Addr::new(10, 0, 0, 2)), "b");
    /// trie.put(Address::from(Ipv4Addr::new(10, 0, 0, 1)), "a");
    ///
    /// let values: Vec<_> = trie.iter().filter_map(|(_, value)| value.copied()).collect();
    /// assert_eq!(values, vec!["a", "b"]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.node_iter(true),
        }
    }

    /// Added keys in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.node_iter(true),
        }
    }

    /// Added keys in descending order.
    pub fn descending_keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.descending_node_iter(true),
        }
    }

    /// Nodes in ascending order.
    ///
    /// # Arguments
    /// * `added_only` - skip junctions when `true`
    pub fn node_iter(&self, added_only: bool) -> NodeIter<'_, K, V> {
        NodeIter::subtree(self, self.root, true, added_only)
    }

    /// Nodes in descending order.
    pub fn descending_node_iter(&self, added_only: bool) -> NodeIter<'_, K, V> {
        NodeIter::subtree(self, self.root, false, added_only)
    }

    /// Nodes in block-size order.
    ///
    /// # Arguments
    /// * `lower_first` - among blocks of equal size, visit the lower one first
    /// * `added_only` - skip junctions when `true`
    pub fn block_size_node_iter(&self, lower_first: bool, added_only: bool) -> BlockSizeIter<'_, K, V> {
        BlockSizeIter::new(self, self.root, lower_first, added_only)
    }

    /// Pre-order walk: containing blocks before the blocks they contain.
    ///
    /// # Arguments
    /// * `forward` - visit lower sub-nodes before upper ones when `true`
    /// * `added_only` - skip junctions when `true`
    pub fn containing_first_iter<C: Clone>(
        &self,
        forward: bool,
        added_only: bool,
    ) -> ContainingFirstIter<'_, K, V, C> {
        ContainingFirstIter::new(self, self.root, forward, added_only)
    }

    /// Post-order walk: contained blocks before the blocks containing them.
    pub fn contained_first_iter(&self, forward: bool, added_only: bool) -> ContainedFirstIter<'_, K, V> {
        ContainedFirstIter::new(self, self.root, forward, added_only)
    }
}

impl<'a, K: TrieKey, V> IntoIterator for &'a Trie<K, V> {
    type Item = (&'a K, Option<&'a V>);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use crate::address::Address;
    use crate::trie::Trie;

    fn net(text: &str) -> Address {
        Address::from(text.parse::<ipnet::IpNet>().unwrap())
    }

    fn sample() -> Trie<Address> {
        let mut trie = Trie::new();
        for text in [
            "10.0.0.0/8",
            "10.1.0.0/16",
            "10.1.1.0/24",
            "10.1.2.0/24",
            "10.200.0.0/16",
            "192.168.0.0/24",
        ] {
            trie.add(net(text));
        }
        trie
    }

    fn strings<'a>(nodes: impl Iterator<Item = crate::trie::NodeRef<'a, Address, ()>>) -> Vec<String> {
        nodes.map(|node| node.key().to_string()).collect()
    }

    #[test]
    fn test_empty_trie_iterators() {
        let trie: Trie<Address> = Trie::new();
        assert_eq!(trie.iter().count(), 0);
        assert_eq!(trie.node_iter(false).count(), 0);
        assert_eq!(trie.block_size_node_iter(true, true).count(), 0);
        assert_eq!(trie.containing_first_iter::<()>(true, false).count(), 0);
        assert_eq!(trie.contained_first_iter(true, false).count(), 0);
    }

    #[test]
    fn test_sorted_order() {
        let trie = sample();
        let forward = strings(trie.node_iter(true));
        assert_eq!(
            forward,
            vec![
                "10.1.1.0/24",
                "10.1.2.0/24",
                "10.1.0.0/16",
                "10.0.0.0/8",
                "10.200.0.0/16",
                "192.168.0.0/24",
            ]
        );
        let mut backward = strings(trie.descending_node_iter(true));
        backward.reverse();
        assert_eq!(forward, backward);

        let keys: Vec<String> = trie.keys().map(|key| key.to_string()).collect();
        assert_eq!(keys, forward);
        assert_eq!(trie.descending_keys().next(), Some(&net("192.168.0.0/24")));
    }

    #[test]
    fn test_all_nodes_include_junctions() {
        let trie = sample();
        let all = strings(trie.node_iter(false));
        // junctions: 10.1.0.0/22 under 10.1/16 and the /0 root
        assert_eq!(all.len(), trie.node_count());
        assert_eq!(all[1], "10.1.0.0/22");
        assert_eq!(all[all.len() - 2], "0.0.0.0/0");
        assert_eq!(all[all.len() - 1], "192.168.0.0/24");
    }

    #[test]
    fn test_block_size_order() {
        let trie = sample();
        let lower_first = strings(trie.block_size_node_iter(true, true));
        assert_eq!(
            lower_first,
            vec![
                "10.0.0.0/8",
                "10.1.0.0/16",
                "10.200.0.0/16",
                "10.1.1.0/24",
                "10.1.2.0/24",
                "192.168.0.0/24",
            ]
        );
        let upper_first = strings(trie.block_size_node_iter(false, true));
        assert_eq!(upper_first[1], "10.200.0.0/16");
        assert_eq!(upper_first[3], "192.168.0.0/24");
    }

    #[test]
    fn test_containing_first() {
        let trie = sample();
        let order = strings(trie.containing_first_iter::<()>(true, true));
        assert_eq!(
            order,
            vec![
                "10.0.0.0/8",
                "10.1.0.0/16",
                "10.1.1.0/24",
                "10.1.2.0/24",
                "10.200.0.0/16",
                "192.168.0.0/24",
            ]
        );
        let reverse = strings(trie.containing_first_iter::<()>(false, true));
        assert_eq!(reverse[0], "192.168.0.0/24");
        assert_eq!(reverse[1], "10.0.0.0/8");
    }

    #[test]
    fn test_containing_first_cache_passes_through_junctions() {
        let trie = sample();
        let mut iter = trie.containing_first_iter::<String>(true, true);
        let mut parents = Vec::new();
        while let Some(node) = iter.next() {
            parents.push((node.key().to_string(), iter.cached().cloned()));
            let name = node.key().to_string();
            iter.cache_with_lower_sub_node(name.clone());
            iter.cache_with_upper_sub_node(name);
        }
        // 10.1.1.0/24 hangs below the 10.1.0.0/22 junction
        assert!(parents.contains(&("10.1.1.0/24".to_string(), Some("10.1.0.0/16".to_string()))));
        assert!(parents.contains(&("10.1.2.0/24".to_string(), Some("10.1.0.0/16".to_string()))));
        assert!(parents.contains(&("10.0.0.0/8".to_string(), None)));
    }

    #[test]
    fn test_cache_without_sub_node() {
        let mut trie: Trie<Address> = Trie::new();
        trie.add(Address::from(Ipv4Addr::new(1, 2, 3, 4)));
        let mut iter = trie.containing_first_iter::<u8>(true, true);
        assert!(iter.next().is_some());
        assert!(!iter.cache_with_lower_sub_node(1));
        assert!(!iter.cache_with_upper_sub_node(1));
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
        assert_eq!(iter.cached(), None);
    }

    #[test]
    fn test_contained_first() {
        let trie = sample();
        let order = strings(trie.contained_first_iter(true, true));
        assert_eq!(
            order,
            vec![
                "10.1.1.0/24",
                "10.1.2.0/24",
                "10.1.0.0/16",
                "10.200.0.0/16",
                "10.0.0.0/8",
                "192.168.0.0/24",
            ]
        );
        let all = trie.contained_first_iter(false, false).count();
        assert_eq!(all, trie.node_count());
    }

    #[test]
    fn test_into_iterator() {
        let mut trie = Trie::new();
        trie.put(net("10.0.0.0/8"), 1);
        trie.add(net("11.0.0.0/8"));
        let mut seen = Vec::new();
        for (key, value) in &trie {
            seen.push((key.to_string(), value.copied()));
        }
        assert_eq!(seen, vec![("10.0.0.0/8".to_string(), Some(1)), ("11.0.0.0/8".to_string(), None)]);
    }
}
