//! Tree rendering for debugging and `Display`.

use core::fmt::{self, Write as _};

use crate::constants::EMPTY;
use crate::key::TrieKey;
use crate::trie::trie::Trie;

const ADDED: &str = "●";
const JUNCTION: &str = "○";

/// Render the subtree rooted at `idx`, one node per line.
///
/// Children are listed lower first under box-drawing connectors. Junctions
/// are shown only when `with_non_added` is set; otherwise their children
/// are lifted to the nearest shown ancestor.
pub(crate) fn tree_string<K: TrieKey, V: fmt::Debug>(
    trie: &Trie<K, V>,
    idx: u32,
    with_non_added: bool,
    with_sizes: bool,
) -> String {
    let mut out = String::new();
    if idx == EMPTY {
        return out;
    }
    let dumper = Dumper {
        trie,
        with_non_added,
        with_sizes,
    };
    // the subtree root is always shown so the output has one top line
    dumper.line(&mut out, idx, "");
    let children = dumper.shown_children(idx);
    dumper.children(&mut out, &children, "");
    out
}

struct Dumper<'a, K, V> {
    trie: &'a Trie<K, V>,
    with_non_added: bool,
    with_sizes: bool,
}

impl<K: TrieKey, V: fmt::Debug> Dumper<'_, K, V> {
    fn line(&self, out: &mut String, idx: u32, prefix: &str) {
        let node = self.trie.nodes.get(idx);
        let marker = if node.added { ADDED } else { JUNCTION };
        // writing into a String cannot fail
        let _ = write!(out, "{}{} {}", prefix, marker, node.key);
        if let Some(value) = &node.value {
            let _ = write!(out, " = {:?}", value);
        }
        if self.with_sizes {
            let _ = write!(out, " ({})", node.size);
        }
        out.push('\n');
    }

    /// Children to print under `idx`, lower first, skipping hidden junctions.
    fn shown_children(&self, idx: u32) -> Vec<u32> {
        let mut shown = Vec::new();
        let mut pending: Vec<u32> = self.trie.nodes.get(idx).children.iter().rev().copied().collect();
        while let Some(child) = pending.pop() {
            if child == EMPTY {
                continue;
            }
            let node = self.trie.nodes.get(child);
            if node.added || self.with_non_added {
                shown.push(child);
            } else {
                pending.extend(node.children.iter().rev().copied());
            }
        }
        shown
    }

    fn children(&self, out: &mut String, children: &[u32], indent: &str) {
        for (position, &child) in children.iter().enumerate() {
            let last = position + 1 == children.len();
            let connector = if last { "└─" } else { "├─" };
            self.line(out, child, &format!("{}{}", indent, connector));

            let grandchildren = self.shown_children(child);
            let next_indent = format!("{}{}", indent, if last { "  " } else { "│ " });
            self.children(out, &grandchildren, &next_indent);
        }
    }
}

impl<K: TrieKey, V: fmt::Debug> Trie<K, V> {
    /// Render the trie as an indented tree.
    ///
    /// # Arguments
    /// * `with_non_added` - include junction nodes (`○`) next to added ones (`●`)
    /// * `with_sizes` - append each node's subtree size in parentheses
    ///
    /// # Example
    /// ```rust
    /// use addr_trie::{Address, Trie};
    ///
    /// let net = |s: &str| Address::from(s.parse::<ipnet::IpNet>().unwrap());
    /// let mut trie: Trie<Address> = Trie::new();
    /// trie.add(net("10.0.0.0/8"));
    /// trie.add(net("10.1.0.0/16"));
    ///
    /// assert_eq!(
    ///     trie.to_tree_string(true, true),
    ///     "○ 0.0.0.0/0 (2)\n└─● 10.0.0.0/8 (2)\n  └─● 10.1.0.0/16 (1)\n"
    /// );
    /// ```
    pub fn to_tree_string(&self, with_non_added: bool, with_sizes: bool) -> String {
        tree_string(self, self.root, with_non_added, with_sizes)
    }
}

impl<K: TrieKey, V: fmt::Debug> fmt::Display for Trie<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_tree_string(true, false))
    }
}
