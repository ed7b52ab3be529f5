//! Node state checking operations.

use crate::constants::EMPTY;
use crate::trie::node::Node;

impl<K, V> Node<K, V> {
    /// Check if node has no children.
    #[inline(always)]
    pub fn is_leaf(&self) -> bool {
        self.children == [EMPTY, EMPTY]
    }

    /// Get number of children in this node.
    ///
    /// # Returns
    /// Count of existing children (0-2)
    #[inline(always)]
    pub fn child_count(&self) -> u32 {
        self.children.iter().filter(|&&child| child != EMPTY).count() as u32
    }

    /// Check if node is a structural junction (not added).
    #[inline(always)]
    pub fn is_junction(&self) -> bool {
        !self.added
    }

    /// The only child of a node with exactly one child.
    ///
    /// # Returns
    /// Arena index of the child, or `EMPTY` if the node has zero or two children
    #[inline]
    pub fn only_child(&self) -> u32 {
        match self.children {
            [EMPTY, upper] => upper,
            [lower, EMPTY] => lower,
            _ => EMPTY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_leaf_new_node() {
        let node: Node<u8, ()> = Node::junction(0, EMPTY);
        assert!(node.is_leaf());
        assert_eq!(node.child_count(), 0);
        assert_eq!(node.only_child(), EMPTY);
    }

    #[test]
    fn test_child_count() {
        let mut node: Node<u8, ()> = Node::junction(0, EMPTY);
        node.set_child(true, 3);
        assert!(!node.is_leaf());
        assert_eq!(node.child_count(), 1);
        assert_eq!(node.only_child(), 3);

        node.set_child(false, 2);
        assert_eq!(node.child_count(), 2);
        assert_eq!(node.only_child(), EMPTY);
    }

    #[test]
    fn test_is_junction() {
        let junction: Node<u8, ()> = Node::junction(0, EMPTY);
        let leaf: Node<u8, ()> = Node::leaf(0, None, EMPTY);
        assert!(junction.is_junction());
        assert!(!leaf.is_junction());
    }
}
