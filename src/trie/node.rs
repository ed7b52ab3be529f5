//! Node structure for the compact binary trie.

use crate::constants::EMPTY;

/// Trie node with two-way branching.
///
/// A node holds a normalized key: a single address or exactly one prefix
/// block. Its children sit on either side of the first bit after the
/// node's prefix, so every key in the subtree is contained by the node key.
///
/// # Memory Layout
/// - `key`: the normalized key
/// - `value`: optional associated value
/// - `parent`, `children`: arena indices, `EMPTY` when absent
/// - `size`: added nodes in the subtree, this node included
///
/// # States
/// - junction: `added == false`, kept only to branch towards added
///   descendants (every junction except the root has two children)
/// - added: `added == true`, counted by the trie size
#[derive(Debug, Clone)]
pub struct Node<K, V> {
    /// Normalized key.
    pub key: K,

    /// Associated value (associative use only).
    pub value: Option<V>,

    /// Whether the key was explicitly added.
    pub added: bool,

    /// Index of parent node in arena, `EMPTY` for the root.
    pub parent: u32,

    /// Child indices: `children[0]` below the node prefix bit, `children[1]` above.
    pub children: [u32; 2],

    /// Number of added nodes in this subtree, this node included.
    pub size: usize,
}

impl<K, V> Node<K, V> {
    /// Create an unattached junction node.
    ///
    /// # Arguments
    /// * `key` - Normalized key
    /// * `parent` - Arena index of the parent, or `EMPTY`
    #[inline]
    pub fn junction(key: K, parent: u32) -> Self {
        Node {
            key,
            value: None,
            added: false,
            parent,
            children: [EMPTY; 2],
            size: 0,
        }
    }

    /// Create an added leaf node.
    #[inline]
    pub fn leaf(key: K, value: Option<V>, parent: u32) -> Self {
        Node {
            key,
            value,
            added: true,
            parent,
            children: [EMPTY; 2],
            size: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_junction() {
        let node: Node<&str, u8> = Node::junction("k", EMPTY);
        assert!(!node.added);
        assert_eq!(node.size, 0);
        assert_eq!(node.children, [EMPTY, EMPTY]);
        assert_eq!(node.parent, EMPTY);
    }

    #[test]
    fn test_leaf() {
        let node = Node::leaf("k", Some(7), 3);
        assert!(node.added);
        assert_eq!(node.size, 1);
        assert_eq!(node.value, Some(7));
        assert_eq!(node.parent, 3);
    }
}
