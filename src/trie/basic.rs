//! Basic child operations for Node.

use crate::constants::EMPTY;
use crate::trie::node::Node;

impl<K, V> Node<K, V> {
    /// Get child index on the given side.
    ///
    /// # Returns
    /// Arena index of child, or `EMPTY` if no child exists
    #[inline(always)]
    pub fn get_child(&self, upper: bool) -> u32 {
        self.children[upper as usize]
    }

    /// Set child on the given side.
    #[inline(always)]
    pub fn set_child(&mut self, upper: bool, child_idx: u32) {
        self.children[upper as usize] = child_idx;
    }

    /// Side on which `child_idx` hangs.
    ///
    /// # Returns
    /// `Some(true)` for upper, `Some(false)` for lower, `None` if not a child
    #[inline]
    pub fn side_of(&self, child_idx: u32) -> Option<bool> {
        if child_idx == EMPTY {
            None
        } else if self.children[1] == child_idx {
            Some(true)
        } else if self.children[0] == child_idx {
            Some(false)
        } else {
            None
        }
    }

    /// Replace a child link, keeping its side.
    ///
    /// # Panics
    /// Panics if `old_idx` is not a child of this node.
    #[inline]
    pub fn replace_child(&mut self, old_idx: u32, new_idx: u32) {
        let side = self
            .side_of(old_idx)
            .unwrap_or_else(|| panic!("node {} is not a child", old_idx));
        self.set_child(side, new_idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> Node<u8, ()> {
        Node::junction(0, EMPTY)
    }

    #[test]
    fn test_get_child() {
        let mut node = node();
        assert_eq!(node.get_child(false), EMPTY);

        node.set_child(false, 10);
        node.set_child(true, 11);
        assert_eq!(node.get_child(false), 10);
        assert_eq!(node.get_child(true), 11);
    }

    #[test]
    fn test_set_child_to_empty() {
        let mut node = node();
        node.set_child(false, 10);
        node.set_child(false, EMPTY);
        assert_eq!(node.get_child(false), EMPTY);
        assert!(node.is_leaf());
    }

    #[test]
    fn test_side_of_and_replace() {
        let mut node = node();
        node.set_child(false, 10);
        node.set_child(true, 11);
        assert_eq!(node.side_of(10), Some(false));
        assert_eq!(node.side_of(11), Some(true));
        assert_eq!(node.side_of(12), None);
        assert_eq!(node.side_of(EMPTY), None);

        node.replace_child(11, 20);
        assert_eq!(node.get_child(true), 20);
    }

    #[test]
    #[should_panic(expected = "is not a child")]
    fn test_replace_missing_child() {
        node().replace_child(5, 6);
    }
}
