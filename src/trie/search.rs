//! Ordered navigation: in-order neighbours and guided nearest-key search.
//!
//! The trie's total order places every prefix block between the two halves
//! it splits into, so an in-order walk (lower subtree, node, upper subtree)
//! visits the keys in ascending order.

use tracing::trace;

use crate::constants::EMPTY;
use crate::key::{BitsMatch, TrieKey};
use crate::trie::node_ref::NodeRef;
use crate::trie::trie::{normalize, Trie};

impl<K: TrieKey, V> Trie<K, V> {
    #[inline]
    fn subtree_size(&self, idx: u32) -> usize {
        if idx == EMPTY {
            0
        } else {
            self.nodes.get(idx).size
        }
    }

    /// First node of a subtree in ascending order.
    pub(crate) fn first_node_in(&self, mut idx: u32) -> u32 {
        if idx == EMPTY {
            return EMPTY;
        }
        loop {
            let lower = self.nodes.get(idx).get_child(false);
            if lower == EMPTY {
                return idx;
            }
            idx = lower;
        }
    }

    /// Last node of a subtree in ascending order.
    pub(crate) fn last_node_in(&self, mut idx: u32) -> u32 {
        if idx == EMPTY {
            return EMPTY;
        }
        loop {
            let upper = self.nodes.get(idx).get_child(true);
            if upper == EMPTY {
                return idx;
            }
            idx = upper;
        }
    }

    /// First added node of a subtree, or `EMPTY`.
    ///
    /// # Performance
    /// O(depth) - subtree sizes steer the descent away from empty branches
    pub(crate) fn first_added_in(&self, mut idx: u32) -> u32 {
        if self.subtree_size(idx) == 0 {
            return EMPTY;
        }
        loop {
            let node = self.nodes.get(idx);
            let lower = node.get_child(false);
            if self.subtree_size(lower) > 0 {
                idx = lower;
            } else if node.added {
                return idx;
            } else {
                idx = node.get_child(true);
            }
        }
    }

    /// Last added node of a subtree, or `EMPTY`.
    pub(crate) fn last_added_in(&self, mut idx: u32) -> u32 {
        if self.subtree_size(idx) == 0 {
            return EMPTY;
        }
        loop {
            let node = self.nodes.get(idx);
            let upper = node.get_child(true);
            if self.subtree_size(upper) > 0 {
                idx = upper;
            } else if node.added {
                return idx;
            } else {
                idx = node.get_child(false);
            }
        }
    }

    #[inline]
    pub(crate) fn first_in(&self, idx: u32, added_only: bool) -> u32 {
        if added_only {
            self.first_added_in(idx)
        } else {
            self.first_node_in(idx)
        }
    }

    #[inline]
    pub(crate) fn last_in(&self, idx: u32, added_only: bool) -> u32 {
        if added_only {
            self.last_added_in(idx)
        } else {
            self.last_node_in(idx)
        }
    }

    /// In-order successor of `idx`, or `EMPTY`.
    ///
    /// # Algorithm
    /// 1. The first node of the upper subtree, if there is one
    /// 2. Otherwise climb: each ancestor reached from its lower side comes
    ///    next, followed by its own upper subtree
    pub(crate) fn next_in_order(&self, idx: u32, added_only: bool) -> u32 {
        let node = self.nodes.get(idx);
        let next = self.first_in(node.get_child(true), added_only);
        if next != EMPTY {
            return next;
        }
        let mut child = idx;
        let mut parent = node.parent;
        while parent != EMPTY {
            let parent_node = self.nodes.get(parent);
            if parent_node.get_child(false) == child {
                if !added_only || parent_node.added {
                    return parent;
                }
                let next = self.first_added_in(parent_node.get_child(true));
                if next != EMPTY {
                    return next;
                }
            }
            child = parent;
            parent = parent_node.parent;
        }
        EMPTY
    }

    /// In-order predecessor of `idx`, or `EMPTY`.
    pub(crate) fn prev_in_order(&self, idx: u32, added_only: bool) -> u32 {
        let node = self.nodes.get(idx);
        let prev = self.last_in(node.get_child(false), added_only);
        if prev != EMPTY {
            return prev;
        }
        let mut child = idx;
        let mut parent = node.parent;
        while parent != EMPTY {
            let parent_node = self.nodes.get(parent);
            if parent_node.get_child(true) == child {
                if !added_only || parent_node.added {
                    return parent;
                }
                let prev = self.last_added_in(parent_node.get_child(false));
                if prev != EMPTY {
                    return prev;
                }
            }
            child = parent;
            parent = parent_node.parent;
        }
        EMPTY
    }

    /// Nearest added node strictly or inclusively below or above `key`.
    ///
    /// # Algorithm
    /// Descends towards `key` keeping the best candidate seen so far:
    /// - going up past a node, the node (or the top of its lower subtree)
    ///   is the best candidate below the key
    /// - going down past a node, the node (or the bottom of its upper
    ///   subtree) is the best candidate above the key
    /// - when the key contains or diverges from a node, that whole subtree
    ///   lies on one side of the key and the search ends
    ///
    /// # Performance
    /// O(bit count) - one descent plus one subtree walk
    fn nearest(&self, key: &K, below: bool, inclusive: bool) -> u32 {
        let key = normalize(key);
        let mut best = EMPTY;
        let mut current = self.root;
        let mut bit_index = 0;
        while current != EMPTY {
            let node = self.nodes.get(current);
            trace!(key = %key, node = %node.key, below, "nearest search step");
            match key.match_bits(&node.key, bit_index) {
                BitsMatch::Equal => {
                    if inclusive && node.added {
                        return current;
                    }
                    let found = if below {
                        self.last_added_in(node.get_child(false))
                    } else {
                        self.first_added_in(node.get_child(true))
                    };
                    return if found != EMPTY { found } else { best };
                }
                BitsMatch::Descend(prefix_len) => {
                    let upper = key.is_one_bit(prefix_len);
                    if below == upper {
                        let candidate = if node.added {
                            current
                        } else if below {
                            self.last_added_in(node.get_child(false))
                        } else {
                            self.first_added_in(node.get_child(true))
                        };
                        if candidate != EMPTY {
                            best = candidate;
                        }
                    }
                    current = node.get_child(upper);
                    bit_index = prefix_len + 1;
                }
                BitsMatch::Contains => {
                    let subtree_above = node.key.is_one_bit(key.effective_prefix_len());
                    return self.pick_subtree(current, subtree_above, below, best);
                }
                BitsMatch::Diverge(bit) => {
                    let subtree_above = !key.is_one_bit(bit);
                    return self.pick_subtree(current, subtree_above, below, best);
                }
            }
        }
        best
    }

    fn pick_subtree(&self, idx: u32, subtree_above: bool, below: bool, best: u32) -> u32 {
        let found = match (below, subtree_above) {
            (true, false) => self.last_added_in(idx),
            (false, true) => self.first_added_in(idx),
            _ => EMPTY,
        };
        if found != EMPTY {
            found
        } else {
            best
        }
    }

    fn node_at(&self, idx: u32) -> Option<NodeRef<'_, K, V>> {
        (idx != EMPTY).then(|| NodeRef::new(self, idx))
    }

    /// Greatest added node strictly below `key`.
    pub fn lower_added_node(&self, key: &K) -> Option<NodeRef<'_, K, V>> {
        self.node_at(self.nearest(key, true, false))
    }

    /// Greatest added node at or below `key`.
    pub fn floor_added_node(&self, key: &K) -> Option<NodeRef<'_, K, V>> {
        self.node_at(self.nearest(key, true, true))
    }

    /// Least added node strictly above `key`.
    pub fn higher_added_node(&self, key: &K) -> Option<NodeRef<'_, K, V>> {
        self.node_at(self.nearest(key, false, false))
    }

    /// Least added node at or above `key`.
    pub fn ceiling_added_node(&self, key: &K) -> Option<NodeRef<'_, K, V>> {
        self.node_at(self.nearest(key, false, true))
    }

    /// Greatest added key strictly below `key`.
    pub fn lower(&self, key: &K) -> Option<&K> {
        self.lower_added_node(key).map(|node| node.key())
    }

    /// Greatest added key at or below `key`.
    pub fn floor(&self, key: &K) -> Option<&K> {
        self.floor_added_node(key).map(|node| node.key())
    }

    /// Least added key strictly above `key`.
    pub fn higher(&self, key: &K) -> Option<&K> {
        self.higher_added_node(key).map(|node| node.key())
    }

    /// Least added key at or above `key`.
    pub fn ceiling(&self, key: &K) -> Option<&K> {
        self.ceiling_added_node(key).map(|node| node.key())
    }

    /// Smallest added node.
    pub fn first_added_node(&self) -> Option<NodeRef<'_, K, V>> {
        self.node_at(self.first_added_in(self.root))
    }

    /// Largest added node.
    pub fn last_added_node(&self) -> Option<NodeRef<'_, K, V>> {
        self.node_at(self.last_added_in(self.root))
    }

    /// Smallest node, junctions included.
    pub fn first_node(&self) -> Option<NodeRef<'_, K, V>> {
        self.node_at(self.first_node_in(self.root))
    }

    /// Largest node, junctions included.
    pub fn last_node(&self) -> Option<NodeRef<'_, K, V>> {
        self.node_at(self.last_node_in(self.root))
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

    fn v4(text: &str) -> Address {
        Address::from(text.parse::<Ipv4Addr>().unwrap())
    }

    fn sample() -> Trie<Address> {
        let mut trie = Trie::new();
        for text in ["10.0.0.0/8", "10.0.0.1/32", "10.128.0.0/9", "192.168.0.0/16", "192.168.255.1/32"] {
            trie.add(net(text));
        }
        trie
    }

    fn keys(trie: &Trie<Address>) -> Vec<String> {
        trie.keys().map(|key| key.to_string()).collect()
    }

    #[test]
    fn test_first_last() {
        let trie = sample();
        assert_eq!(trie.first_added_node().unwrap().key(), &v4("10.0.0.1"));
        assert_eq!(trie.last_added_node().unwrap().key(), &v4("192.168.255.1"));

        let empty: Trie<Address> = Trie::new();
        assert!(empty.first_added_node().is_none());
        assert!(empty.last_node().is_none());
    }

    #[test]
    fn test_in_order_keys() {
        // a block sorts between its lower and upper halves
        assert_eq!(
            keys(&sample()),
            vec!["10.0.0.1", "10.0.0.0/8", "10.128.0.0/9", "192.168.0.0/16", "192.168.255.1"]
        );
    }

    #[test]
    fn test_floor_and_ceiling_on_present_key() {
        let trie = sample();
        let key = net("10.0.0.0/8");
        assert_eq!(trie.floor(&key), Some(&key));
        assert_eq!(trie.ceiling(&key), Some(&key));
        assert_eq!(trie.lower(&key), Some(&v4("10.0.0.1")));
        assert_eq!(trie.higher(&key), Some(&net("10.128.0.0/9")));
    }

    #[test]
    fn test_nearest_of_absent_keys() {
        let trie = sample();
        assert_eq!(trie.lower(&v4("10.0.0.0")), None);
        assert_eq!(trie.higher(&v4("10.0.0.0")), Some(&v4("10.0.0.1")));
        assert_eq!(trie.floor(&v4("11.0.0.0")), Some(&net("10.128.0.0/9")));
        assert_eq!(trie.ceiling(&v4("11.0.0.0")), Some(&net("192.168.0.0/16")));
        assert_eq!(trie.lower(&v4("192.168.200.1")), Some(&net("192.168.0.0/16")));
        assert_eq!(trie.higher(&v4("192.168.200.1")), Some(&v4("192.168.255.1")));
        assert_eq!(trie.higher(&v4("200.0.0.0")), None);
        assert_eq!(trie.floor(&v4("1.1.1.1")), None);
        assert_eq!(trie.ceiling(&v4("1.1.1.1")), Some(&v4("10.0.0.1")));
    }

    #[test]
    fn test_nearest_of_containing_block() {
        let trie = sample();
        // 10.0.0.0/7 contains the 10/8 subtree in its lower half
        let key = net("10.0.0.0/7");
        assert_eq!(trie.lower(&key), Some(&net("10.128.0.0/9")));
        assert_eq!(trie.higher(&key), Some(&net("192.168.0.0/16")));
    }

    #[test]
    fn test_nearest_matches_linear_scan() {
        let trie = sample();
        let all: Vec<Address> = trie.keys().cloned().collect();
        let probes = ["0.0.0.0", "10.0.0.0", "10.0.0.2", "10.64.0.0", "10.200.0.0", "100.0.0.0", "192.168.1.0"];
        for probe in probes.iter().map(|text| v4(text)) {
            use crate::key::TrieKey;
            use core::cmp::Ordering;

            let expected_lower = all.iter().rev().find(|key| key.compare(&probe) == Ordering::Less);
            let expected_higher = all.iter().find(|key| key.compare(&probe) == Ordering::Greater);
            assert_eq!(trie.lower(&probe), expected_lower, "lower of {}", probe);
            assert_eq!(trie.higher(&probe), expected_higher, "higher of {}", probe);
        }
    }

    #[test]
    fn test_next_previous_across_junctions() {
        let mut trie: Trie<Address> = Trie::new();
        for text in ["1.0.0.1", "1.0.0.2", "1.0.0.4", "200.0.0.1"] {
            trie.add(v4(text));
        }
        let first = trie.first_added_node().unwrap();
        let second = first.next_added_node().unwrap();
        let third = second.next_added_node().unwrap();
        let fourth = third.next_added_node().unwrap();
        assert_eq!(fourth.key(), &v4("200.0.0.1"));
        assert!(fourth.next_added_node().is_none());
        assert_eq!(fourth.previous_added_node().unwrap().key(), &v4("1.0.0.4"));
        assert_eq!(second.previous_added_node().unwrap().key(), &v4("1.0.0.1"));
        assert!(first.previous_added_node().is_none());
    }
}
