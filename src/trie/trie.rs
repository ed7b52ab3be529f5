//! Main Trie structure for address and prefix-block keys.

use core::cmp::Ordering;
use core::fmt;

use tracing::{debug, trace};

use crate::arena::Arena;
use crate::constants::{BitCount, EMPTY};
use crate::key::{BitsMatch, TrieKey};
use crate::trie::node::Node;
use crate::trie::node_ref::NodeRef;

/// Compact binary trie of addresses and prefix blocks.
///
/// Works as a set (`Trie<K>`) or as a map (`Trie<K, V>`). Keys are
/// normalized on entry to a single address or exactly one prefix block;
/// any other key is a contract violation and panics.
///
/// # Architecture
/// - Binary branching on the first bit after each node's prefix
/// - Path compression: a node exists only for an added key, or as a
///   junction where two added branches meet
/// - Arena allocation with `u32` links (no reference cycles)
/// - Per-node subtree sizes for O(depth) order queries
///
/// The root is created on first insertion as the `/0` block of the key's
/// family and stays until [`clear`](Trie::clear).
///
/// # Performance Characteristics
/// - Insert / remove / contains / longest-prefix match: O(bit count)
/// - Lower / floor / higher / ceiling: O(bit count)
/// - Memory: one node per added key plus at most one junction per key
///
/// # Concurrency
/// No internal locking. Share behind a `RwLock` (single writer, many
/// readers) or similar.
///
/// # Example
/// ```rust
/// use std::net::Ipv4Addr;
/// use addr_trie::{Address, Trie};
///
/// let net = |s: &str| Address::from(s.parse::<ipnet::IpNet>().unwrap());
/// let mut trie = Trie::new();
/// trie.put(net("192.168.0.0/16"), 1);
/// trie.put(net("192.168.1.0/24"), 2);
/// trie.put(net("192.168.1.128/25"), 3);
///
/// let lookup = |trie: &Trie<Address, i32>, a: [u8; 4]| {
///     trie.longest_prefix_match_node(&Address::from(Ipv4Addr::from(a)))
///         .and_then(|node| node.value().copied())
/// };
/// assert_eq!(lookup(&trie, [192, 168, 1, 200]), Some(3));
/// assert_eq!(lookup(&trie, [192, 168, 2, 1]), Some(1));
///
/// trie.remove(&net("192.168.1.0/24"));
/// assert_eq!(lookup(&trie, [192, 168, 1, 1]), Some(1));
/// ```
#[derive(Clone)]
pub struct Trie<K, V = ()> {
    /// Node storage.
    pub(crate) nodes: Arena<Node<K, V>>,

    /// Root index, `EMPTY` until the first insertion.
    pub(crate) root: u32,
}

/// Where a normalized key lands relative to the existing nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Location {
    /// Node whose key equals the key.
    Found(u32),
    /// No node; the key belongs below `parent` on the given side.
    Vacant { parent: u32, upper: bool },
    /// The key's block contains this node and its subtree.
    Containing(u32),
    /// The key and this node's key first differ at the given bit.
    Diverging(u32, BitCount),
}

/// Normalize a key for trie use.
///
/// # Panics
/// Panics if the key is neither a single value nor a single prefix block.
pub(crate) fn normalize<K: TrieKey>(key: &K) -> K {
    key.to_single_prefix_block_or_address()
        .unwrap_or_else(|| panic!("{} is neither a single address nor a prefix block", key))
}

impl<K: TrieKey, V> Trie<K, V> {
    /// Create a new empty trie.
    ///
    /// # Performance
    /// O(1) - no nodes are allocated until the first insertion
    pub fn new() -> Self {
        Trie {
            nodes: Arena::new(),
            root: EMPTY,
        }
    }

    /// Number of added keys.
    ///
    /// # Performance
    /// O(1) - read from the root's subtree size
    #[inline]
    pub fn len(&self) -> usize {
        if self.root == EMPTY {
            0
        } else {
            self.nodes.get(self.root).size
        }
    }

    /// Alias of [`len`](Trie::len).
    #[inline]
    pub fn size(&self) -> usize {
        self.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes, junctions and the root included.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Remove every node, the root included.
    pub fn clear(&mut self) {
        debug!(nodes = self.nodes.len(), "clearing trie");
        self.nodes.clear();
        self.root = EMPTY;
    }

    /// Root node, if any key was ever inserted since the last clear.
    pub fn root_node(&self) -> Option<NodeRef<'_, K, V>> {
        (self.root != EMPTY).then(|| NodeRef::new(self, self.root))
    }

    /// Descend towards a normalized key.
    ///
    /// # Returns
    /// `None` for a trie without root
    ///
    /// # Performance
    /// O(bit count) - each step consumes at least one bit
    pub(crate) fn locate(&self, key: &K) -> Option<Location> {
        let mut current = self.root;
        if current == EMPTY {
            return None;
        }
        let mut bit_index = 0;
        loop {
            let node = self.nodes.get(current);
            trace!(key = %key, node = %node.key, bit_index, "descend");
            match key.match_bits(&node.key, bit_index) {
                BitsMatch::Equal => return Some(Location::Found(current)),
                BitsMatch::Descend(prefix_len) => {
                    let upper = key.is_one_bit(prefix_len);
                    let child = node.get_child(upper);
                    if child == EMPTY {
                        return Some(Location::Vacant { parent: current, upper });
                    }
                    bit_index = prefix_len + 1;
                    current = child;
                }
                BitsMatch::Contains => return Some(Location::Containing(current)),
                BitsMatch::Diverge(bit) => return Some(Location::Diverging(current, bit)),
            }
        }
    }

    /// Add one to the sizes from `idx` up to the root.
    fn increment_sizes(&mut self, mut idx: u32) {
        while idx != EMPTY {
            let node = self.nodes.get_mut(idx);
            node.size += 1;
            idx = node.parent;
        }
    }

    /// Subtract `amount` from the sizes from `idx` up to the root.
    fn decrement_sizes(&mut self, mut idx: u32, amount: usize) {
        while idx != EMPTY {
            let node = self.nodes.get_mut(idx);
            node.size -= amount;
            idx = node.parent;
        }
    }

    /// Insert the structure for `key` and mark its node added.
    ///
    /// # Returns
    /// `(index, newly_added)`
    ///
    /// # Algorithm
    /// 1. Create the `/0` root on first use
    /// 2. Descend with [`TrieKey::match_bits`]
    /// 3. Depending on where the descent stops:
    ///    - equal node: mark it added
    ///    - empty child slot: attach a new leaf
    ///    - node contained by the key: insert the key above it
    ///    - divergence inside an edge: split the edge with a junction
    /// 4. Increment subtree sizes up to the root
    pub(crate) fn add_impl(&mut self, key: &K) -> (u32, bool) {
        let key = normalize(key);
        if self.root == EMPTY {
            let root_key = key.to_prefix_block_len(0);
            debug!(root = %root_key, "creating root");
            self.root = self.nodes.alloc(Node::junction(root_key, EMPTY));
        }
        let location = match self.locate(&key) {
            Some(location) => location,
            None => unreachable!("root exists"),
        };
        match location {
            Location::Found(idx) => {
                if self.nodes.get(idx).added {
                    return (idx, false);
                }
                trace!(key = %key, "marking junction added");
                self.nodes.get_mut(idx).added = true;
                self.increment_sizes(idx);
                (idx, true)
            }
            Location::Vacant { parent, upper } => {
                let idx = self.nodes.alloc(Node::leaf(key, None, parent));
                self.nodes.get_mut(parent).set_child(upper, idx);
                self.increment_sizes(parent);
                (idx, true)
            }
            Location::Containing(existing) => {
                let parent = self.nodes.get(existing).parent;
                let side = self.nodes.get(existing).key.is_one_bit(key.effective_prefix_len());
                debug!(key = %key, contained = %self.nodes.get(existing).key, "inserting containing node");

                let mut node = Node::leaf(key, None, parent);
                node.size += self.nodes.get(existing).size;
                node.set_child(side, existing);
                let idx = self.nodes.alloc(node);

                self.nodes.get_mut(existing).parent = idx;
                self.nodes.get_mut(parent).replace_child(existing, idx);
                self.increment_sizes(parent);
                (idx, true)
            }
            Location::Diverging(existing, bit) => {
                let parent = self.nodes.get(existing).parent;
                let existing_side = self.nodes.get(existing).key.is_one_bit(bit);
                let junction_key = key.to_prefix_block_len(bit);
                debug!(key = %key, junction = %junction_key, "splitting edge");

                let mut junction = Node::junction(junction_key, parent);
                junction.size = self.nodes.get(existing).size;
                junction.set_child(existing_side, existing);
                let junction_idx = self.nodes.alloc(junction);

                let idx = self.nodes.alloc(Node::leaf(key, None, junction_idx));
                self.nodes.get_mut(junction_idx).set_child(!existing_side, idx);
                self.nodes.get_mut(existing).parent = junction_idx;
                self.nodes.get_mut(parent).replace_child(existing, junction_idx);
                self.increment_sizes(junction_idx);
                (idx, true)
            }
        }
    }

    /// Add a key.
    ///
    /// # Returns
    /// * `true` if the key was newly added
    /// * `false` if it was already present
    ///
    /// # Panics
    /// Panics if the key is neither a single address nor a prefix block, or
    /// its bit count differs from the keys already in the trie.
    pub fn add(&mut self, key: K) -> bool {
        self.add_impl(&key).1
    }

    /// Add a key and return its node, whether new or existing.
    pub fn add_node(&mut self, key: K) -> NodeRef<'_, K, V> {
        let (idx, _) = self.add_impl(&key);
        NodeRef::new(self, idx)
    }

    /// Add a key with a value, replacing any existing value.
    ///
    /// # Returns
    /// The previous value, if the key was present with one
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let (idx, _) = self.add_impl(&key);
        self.nodes.get_mut(idx).value.replace(value)
    }

    /// Add a key with a value only if the key is absent.
    ///
    /// # Returns
    /// `true` if the key was added
    pub fn put_new(&mut self, key: K, value: V) -> bool {
        let (idx, added) = self.add_impl(&key);
        if added {
            self.nodes.get_mut(idx).value = Some(value);
        }
        added
    }

    /// Remove an added key.
    ///
    /// # Returns
    /// `true` if the key was present
    ///
    /// # Compaction
    /// The node is unlinked when it has no children, spliced out when it
    /// has one, and kept as a junction when it has two. Junction ancestors
    /// left with fewer than two children are pruned the same way.
    pub fn remove(&mut self, key: &K) -> bool {
        self.remove_impl(key).is_some()
    }

    /// Remove an added key and return its value.
    pub fn remove_value(&mut self, key: &K) -> Option<V> {
        self.remove_impl(key).flatten()
    }

    fn remove_impl(&mut self, key: &K) -> Option<Option<V>> {
        let key = normalize(key);
        let idx = match self.locate(&key) {
            Some(Location::Found(idx)) if self.nodes.get(idx).added => idx,
            _ => return None,
        };
        let node = self.nodes.get_mut(idx);
        node.added = false;
        let value = node.value.take();
        self.decrement_sizes(idx, 1);
        self.prune(idx);
        Some(value)
    }

    /// Remove structure that is no longer needed, starting at `idx`.
    ///
    /// Added nodes, the root and junctions with two children stay. A
    /// junction with one child is replaced by that child. A junction with
    /// no children is unlinked and its parent checked in turn.
    fn prune(&mut self, mut idx: u32) {
        loop {
            if idx == self.root {
                return;
            }
            let node = self.nodes.get(idx);
            if !node.is_junction() {
                return;
            }
            let parent = node.parent;
            if node.is_leaf() {
                trace!(key = %node.key, "unlinking leaf");
                self.nodes.get_mut(parent).replace_child(idx, EMPTY);
                self.nodes.free(idx);
                idx = parent;
                continue;
            }
            let child = node.only_child();
            if child == EMPTY {
                debug!(key = %node.key, "keeping junction");
                return;
            }
            debug!(key = %node.key, "splicing out junction");
            self.nodes.get_mut(parent).replace_child(idx, child);
            self.nodes.get_mut(child).parent = parent;
            self.nodes.free(idx);
            return;
        }
    }

    /// Detach every key contained by `key`'s block.
    ///
    /// # Returns
    /// A trie holding the removed keys and values, or `None` if no node
    /// lies within the block
    pub fn remove_elements_contained_by(&mut self, key: &K) -> Option<Trie<K, V>> {
        let key = normalize(key);
        let idx = match self.locate(&key)? {
            Location::Found(idx) | Location::Containing(idx) => idx,
            _ => return None,
        };
        if idx == self.root {
            if self.is_empty() {
                return None;
            }
            debug!(key = %key, size = self.len(), "detaching whole trie");
            return Some(core::mem::take(self));
        }

        let parent = self.nodes.get(idx).parent;
        let removed_size = self.nodes.get(idx).size;
        debug!(key = %key, size = removed_size, "detaching subtree");
        self.nodes.get_mut(parent).replace_child(idx, EMPTY);
        self.decrement_sizes(parent, removed_size);

        let mut removed = Trie::new();
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            let node = self.nodes.free(current);
            stack.extend(node.children.iter().copied().filter(|&child| child != EMPTY));
            if node.added {
                let (new_idx, _) = removed.add_impl(&node.key);
                removed.nodes.get_mut(new_idx).value = node.value;
            }
        }
        self.prune(parent);
        Some(removed)
    }

    /// Root of the subtree holding every node contained by `key`'s block.
    pub fn elements_contained_by(&self, key: &K) -> Option<NodeRef<'_, K, V>> {
        let key = normalize(key);
        match self.locate(&key)? {
            Location::Found(idx) | Location::Containing(idx) => Some(NodeRef::new(self, idx)),
            _ => None,
        }
    }

    /// Walk the added nodes whose keys contain `key`, shortest prefix first.
    ///
    /// `visit` returns `false` to stop early.
    fn walk_containing<F>(&self, key: &K, mut visit: F)
    where
        F: FnMut(u32) -> bool,
    {
        let key = normalize(key);
        let mut current = self.root;
        let mut bit_index = 0;
        while current != EMPTY {
            let node = self.nodes.get(current);
            match key.match_bits(&node.key, bit_index) {
                BitsMatch::Equal => {
                    if node.added {
                        visit(current);
                    }
                    return;
                }
                BitsMatch::Descend(prefix_len) => {
                    if node.added && !visit(current) {
                        return;
                    }
                    current = node.get_child(key.is_one_bit(prefix_len));
                    bit_index = prefix_len + 1;
                }
                BitsMatch::Contains | BitsMatch::Diverge(_) => return,
            }
        }
    }

    /// Added nodes whose blocks contain `key`, shortest prefix first.
    pub fn elements_containing(&self, key: &K) -> Vec<NodeRef<'_, K, V>> {
        let mut path = Vec::new();
        self.walk_containing(key, |idx| {
            path.push(NodeRef::new(self, idx));
            true
        });
        path
    }

    /// The most specific added node containing `key`.
    pub fn longest_prefix_match_node(&self, key: &K) -> Option<NodeRef<'_, K, V>> {
        let mut best = EMPTY;
        self.walk_containing(key, |idx| {
            best = idx;
            true
        });
        (best != EMPTY).then(|| NodeRef::new(self, best))
    }

    /// The most specific added key containing `key`.
    pub fn longest_prefix_match(&self, key: &K) -> Option<&K> {
        self.longest_prefix_match_node(key).map(|node| node.key())
    }

    /// The least specific added node containing `key`.
    pub fn shortest_prefix_match_node(&self, key: &K) -> Option<NodeRef<'_, K, V>> {
        let mut first = EMPTY;
        self.walk_containing(key, |idx| {
            first = idx;
            false
        });
        (first != EMPTY).then(|| NodeRef::new(self, first))
    }

    /// The least specific added key containing `key`.
    pub fn shortest_prefix_match(&self, key: &K) -> Option<&K> {
        self.shortest_prefix_match_node(key).map(|node| node.key())
    }

    /// Whether some added key contains `key`.
    pub fn element_contains(&self, key: &K) -> bool {
        self.shortest_prefix_match_node(key).is_some()
    }

    /// Whether `key` is added.
    ///
    /// # Performance
    /// O(bit count), independent of the number of keys
    pub fn contains(&self, key: &K) -> bool {
        self.get_added_node(key).is_some()
    }

    /// Node for `key`, added or junction.
    pub fn get_node(&self, key: &K) -> Option<NodeRef<'_, K, V>> {
        match self.locate(&normalize(key))? {
            Location::Found(idx) => Some(NodeRef::new(self, idx)),
            _ => None,
        }
    }

    /// Node for `key` if it is added.
    pub fn get_added_node(&self, key: &K) -> Option<NodeRef<'_, K, V>> {
        self.get_node(key).filter(|node| node.is_added())
    }

    /// Value of an added key.
    pub fn get(&self, key: &K) -> Option<&V> {
        match self.locate(&normalize(key))? {
            Location::Found(idx) => {
                let node = self.nodes.get(idx);
                if node.added {
                    node.value.as_ref()
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Mutable value of an added key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.locate(&normalize(key))? {
            Location::Found(idx) => {
                let node = self.nodes.get_mut(idx);
                if node.added {
                    node.value.as_mut()
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Check the structural invariants, panicking on the first violation.
    ///
    /// Verifies parent links, subtree sizes, that every node is normalized
    /// and contained by its parent on the side given by the parent's prefix
    /// bit, and that every non-root junction has two children.
    #[doc(hidden)]
    pub fn assert_consistent(&self) {
        if self.root == EMPTY {
            assert!(self.nodes.is_empty(), "nodes without a root");
            return;
        }
        let root = self.nodes.get(self.root);
        assert_eq!(root.parent, EMPTY, "root has a parent");
        assert_eq!(root.key.effective_prefix_len(), 0, "root is not the /0 block");

        let mut visited = 0;
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            visited += 1;
            let node = self.nodes.get(idx);
            if idx != self.root {
                let normalized = normalize(&node.key);
                assert!(
                    normalized.compare(&node.key) == Ordering::Equal
                        && normalized.prefix_len() == node.key.prefix_len(),
                    "{} is not normalized",
                    node.key
                );
                if node.is_junction() {
                    assert_eq!(node.child_count(), 2, "junction {} without two children", node.key);
                }
            }

            let prefix_len = node.key.effective_prefix_len();
            let mut size = usize::from(node.added);
            for upper in [false, true] {
                let child = node.get_child(upper);
                if child == EMPTY {
                    continue;
                }
                let child_node = self.nodes.get(child);
                assert_eq!(child_node.parent, idx, "bad parent link at {}", child_node.key);
                assert!(
                    child_node.key.effective_prefix_len() > prefix_len && node.key.contains_key(&child_node.key),
                    "{} does not contain {}",
                    node.key,
                    child_node.key
                );
                assert_eq!(child_node.key.is_one_bit(prefix_len), upper, "{} on wrong side", child_node.key);
                let expected = if upper {
                    (node.key.to_max_lower(), Ordering::Greater)
                } else {
                    (node.key.to_min_upper(), Ordering::Less)
                };
                assert_eq!(child_node.key.compare(&expected.0), expected.1, "{} out of order", child_node.key);
                size += child_node.size;
                stack.push(child);
            }
            assert_eq!(node.size, size, "bad size at {}", node.key);
        }
        assert_eq!(visited, self.nodes.len(), "unreachable nodes");
    }
}

impl<K: TrieKey, V> Default for Trie<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TrieKey, V: PartialEq> PartialEq for Trie<K, V> {
    /// Tries are equal when they hold the same keys with the same values.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .node_iter(true)
                .zip(other.node_iter(true))
                .all(|(one, two)| one.key().compare(two.key()) == Ordering::Equal && one.value() == two.value())
    }
}

impl<K: TrieKey, V> FromIterator<(K, V)> for Trie<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut trie = Trie::new();
        trie.extend(iter);
        trie
    }
}

impl<K: TrieKey, V> Extend<(K, V)> for Trie<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K: TrieKey, V: fmt::Debug> fmt::Debug for Trie<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.node_iter(true).map(|node| (node.key(), node.value())))
            .finish()
    }
}
