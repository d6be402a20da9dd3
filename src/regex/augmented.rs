//! Augmented tree annotations (SPEC_FULL.md §4.3): `nullable`, `firstpos`,
//! `lastpos` by node id, `followpos` by leaf index. Three post-order passes,
//! grounded line-for-line on `original_source/regex_tree.cpp`'s
//! `calc_nullable`/`calc_first_last_pos`/`calc_followpos`.

use std::collections::BTreeSet;

use super::tree::{close_index, parse_range, RegexTree};
use super::AugmentedRegex;
use crate::error::RegexError;
use crate::symbol::Symbol;

/// A [`RegexTree`] parsed from an [`AugmentedRegex`], with firstpos/lastpos/
/// followpos/nullable annotations attached.
#[derive(Debug, Clone)]
pub struct AugmentedRegexTree {
    tree: RegexTree,
    nullable: Vec<bool>,
    firstpos: Vec<BTreeSet<usize>>,
    lastpos: Vec<BTreeSet<usize>>,
    followpos: Vec<BTreeSet<usize>>,
}

impl AugmentedRegexTree {
    pub fn new(regex: &AugmentedRegex) -> Result<Self, RegexError> {
        let symbols = regex.symbols();
        let close = close_index(symbols)?;
        let mut nodes = Vec::new();
        let mut leaves = Vec::new();
        let root = parse_range(symbols, &close, 0, symbols.len(), &mut nodes, &mut leaves)?;
        let tree = RegexTree { nodes, leaves, root };

        let node_count = tree.nodes.len();
        let leaf_count = tree.leaves.len();
        let mut nullable = vec![false; node_count];
        let mut firstpos = vec![BTreeSet::new(); node_count];
        let mut lastpos = vec![BTreeSet::new(); node_count];
        let mut followpos = vec![BTreeSet::new(); leaf_count];

        compute_nullable(&tree, tree.root, &mut nullable)?;
        compute_first_last_pos(&tree, tree.root, &nullable, &mut firstpos, &mut lastpos)?;
        compute_followpos(&tree, tree.root, &firstpos, &lastpos, &mut followpos)?;

        Ok(Self { tree, nullable, firstpos, lastpos, followpos })
    }

    pub fn firstpos_root(&self) -> &BTreeSet<usize> {
        &self.firstpos[self.tree.root]
    }

    pub fn followpos(&self, leaf: usize) -> &BTreeSet<usize> {
        &self.followpos[leaf]
    }

    /// The symbol labelling leaf position `leaf` (leaf positions are indices
    /// 0..leaf_count in left-to-right discovery order, the same space
    /// `firstpos`/`lastpos`/`followpos` sets live in).
    pub fn leaf_symbol(&self, leaf: usize) -> Symbol {
        let node = self.tree.leaves[leaf];
        self.tree
            .label(node)
            .expect("leaves vector only ever holds leaf node ids")
    }

    pub fn leaf_count(&self) -> usize {
        self.tree.leaf_count()
    }

    /// The alphabet used by this tree: every non-`EndMarker` symbol
    /// labelling a leaf, in left-to-right discovery order.
    pub fn alphabet(&self) -> Vec<Symbol> {
        let mut seen = Vec::new();
        for leaf in 0..self.leaf_count() {
            let sym = self.leaf_symbol(leaf);
            if !sym.is_end_marker() && !seen.contains(&sym) {
                seen.push(sym);
            }
        }
        seen
    }

    /// If `positions` contains a leaf labelled with an `EndMarker`, its tag
    /// (the token-id that should make a DFA state built from this position
    /// set accepting). When more than one `EndMarker` is present in the set
    /// (overlapping tagged alternatives), the smallest tag wins, matching
    /// leftmost-alternative priority in `AugmentedRegex::union_tagged`.
    pub fn end_marker_tag(&self, positions: &BTreeSet<usize>) -> Option<u32> {
        positions
            .iter()
            .filter_map(|&p| match self.leaf_symbol(p) {
                Symbol::EndMarker(tag) => Some(tag),
                _ => None,
            })
            .min()
    }
}

fn compute_nullable(tree: &RegexTree, id: usize, nullable: &mut [bool]) -> Result<(), RegexError> {
    if tree.is_leaf(id) {
        nullable[id] = false;
    } else if tree.is_star(id) {
        nullable[id] = true;
    } else if tree.is_union(id) || tree.is_concat(id) {
        let left = tree.left(id)?;
        let right = tree.right(id)?;
        compute_nullable(tree, left, nullable)?;
        compute_nullable(tree, right, nullable)?;
        nullable[id] = if tree.is_union(id) {
            nullable[left] || nullable[right]
        } else {
            nullable[left] && nullable[right]
        };
    } else {
        return Err(RegexError::InvalidNodeType);
    }
    Ok(())
}

fn compute_first_last_pos(
    tree: &RegexTree,
    id: usize,
    nullable: &[bool],
    firstpos: &mut [BTreeSet<usize>],
    lastpos: &mut [BTreeSet<usize>],
) -> Result<(), RegexError> {
    if tree.is_leaf(id) {
        let leaf_pos = leaf_position(tree, id);
        firstpos[id].insert(leaf_pos);
        lastpos[id].insert(leaf_pos);
    } else if tree.is_union(id) || tree.is_concat(id) {
        let left = tree.left(id)?;
        let right = tree.right(id)?;
        compute_first_last_pos(tree, left, nullable, firstpos, lastpos)?;
        compute_first_last_pos(tree, right, nullable, firstpos, lastpos)?;

        firstpos[id] = if tree.is_union(id) || nullable[left] {
            firstpos[left].union(&firstpos[right]).copied().collect()
        } else {
            firstpos[left].clone()
        };
        lastpos[id] = if tree.is_union(id) || nullable[right] {
            lastpos[left].union(&lastpos[right]).copied().collect()
        } else {
            lastpos[right].clone()
        };
    } else if tree.is_star(id) {
        let child = tree.child(id)?;
        compute_first_last_pos(tree, child, nullable, firstpos, lastpos)?;
        firstpos[id] = firstpos[child].clone();
        lastpos[id] = lastpos[child].clone();
    } else {
        return Err(RegexError::InvalidNodeType);
    }
    Ok(())
}

fn compute_followpos(
    tree: &RegexTree,
    id: usize,
    firstpos: &[BTreeSet<usize>],
    lastpos: &[BTreeSet<usize>],
    followpos: &mut [BTreeSet<usize>],
) -> Result<(), RegexError> {
    if tree.is_union(id) {
        let left = tree.left(id)?;
        let right = tree.right(id)?;
        compute_followpos(tree, left, firstpos, lastpos, followpos)?;
        compute_followpos(tree, right, firstpos, lastpos, followpos)?;
    } else if tree.is_concat(id) {
        let left = tree.left(id)?;
        let right = tree.right(id)?;
        for &lpos in &lastpos[left] {
            followpos[lpos].extend(firstpos[right].iter().copied());
        }
        compute_followpos(tree, left, firstpos, lastpos, followpos)?;
        compute_followpos(tree, right, firstpos, lastpos, followpos)?;
    } else if tree.is_star(id) {
        let child = tree.child(id)?;
        for &lpos in &lastpos[child] {
            followpos[lpos].extend(firstpos[child].iter().copied());
        }
        compute_followpos(tree, child, firstpos, lastpos, followpos)?;
    }
    Ok(())
}

fn leaf_position(tree: &RegexTree, node_id: usize) -> usize {
    tree.leaves
        .iter()
        .position(|&n| n == node_id)
        .expect("node_id passed to leaf_position must be a leaf node")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::Regex;

    #[test]
    fn single_leaf_nullable_false_firstpos_is_itself() {
        let regex = Regex::parse("a").unwrap();
        let aug = AugmentedRegex::new(&regex);
        let tree = AugmentedRegexTree::new(&aug).unwrap();
        assert_eq!(tree.firstpos_root().len(), 1);
    }

    #[test]
    fn star_makes_followpos_loop_back_to_firstpos() {
        let regex = Regex::parse("a*").unwrap();
        let aug = AugmentedRegex::new(&regex);
        let tree = AugmentedRegexTree::new(&aug).unwrap();
        // leaves: 0 -> 'a', 1 -> '#'
        assert!(tree.followpos(0).contains(&0));
        assert!(tree.followpos(0).contains(&1));
    }

    #[test]
    fn end_marker_tag_present_only_at_accepting_positions() {
        let regex = Regex::parse("ab").unwrap();
        let aug = AugmentedRegex::new(&regex);
        let tree = AugmentedRegexTree::new(&aug).unwrap();
        assert_eq!(tree.end_marker_tag(tree.firstpos_root()), None);
    }
}
