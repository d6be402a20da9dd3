//! Arena-based regex parse tree (SPEC_FULL.md §4.2), grounded line-for-line
//! on `original_source/regex_tree.h/.cpp`'s `calc_close_index` and templated
//! `init<T>`. Nodes are addressed by dense index into a `Vec` rather than
//! owned through `Box`, since the downstream firstpos/lastpos/followpos
//! algebra (`regex/augmented.rs`) needs stable integer handles into the tree,
//! the same "owned vector, integer index" discipline the teacher crate
//! applies to NFA/DFA state graphs, applied here one layer up.

use crate::error::RegexError;
use crate::symbol::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TreeNode {
    Concat(usize, usize),
    Union(usize, usize),
    Star(usize),
    Leaf(Symbol),
}

/// A parsed regex expression tree. Leaves are numbered in left-to-right
/// discovery order; `leaves[i]` is the arena index of the `i`-th leaf.
#[derive(Debug, Clone)]
pub struct RegexTree {
    pub(crate) nodes: Vec<TreeNode>,
    pub(crate) leaves: Vec<usize>,
    pub(crate) root: usize,
}

impl RegexTree {
    /// Parses the symbol sequence of a [`crate::regex::Regex`] into a tree.
    pub fn parse(regex: &super::Regex) -> Result<RegexTree, RegexError> {
        let symbols = regex.symbols();
        let close = close_index(symbols)?;
        let mut nodes = Vec::new();
        let mut leaves = Vec::new();
        let root = parse_range(symbols, &close, 0, symbols.len(), &mut nodes, &mut leaves)?;
        Ok(RegexTree { nodes, leaves, root })
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    fn node(&self, id: usize) -> TreeNode {
        self.nodes[id]
    }

    pub(crate) fn is_leaf(&self, id: usize) -> bool {
        matches!(self.node(id), TreeNode::Leaf(_))
    }

    pub(crate) fn is_union(&self, id: usize) -> bool {
        matches!(self.node(id), TreeNode::Union(_, _))
    }

    pub(crate) fn is_concat(&self, id: usize) -> bool {
        matches!(self.node(id), TreeNode::Concat(_, _))
    }

    pub(crate) fn is_star(&self, id: usize) -> bool {
        matches!(self.node(id), TreeNode::Star(_))
    }

    pub(crate) fn left(&self, id: usize) -> Result<usize, RegexError> {
        match self.node(id) {
            TreeNode::Concat(l, _) | TreeNode::Union(l, _) => Ok(l),
            _ => Err(RegexError::InvalidTreeChildAccess),
        }
    }

    pub(crate) fn right(&self, id: usize) -> Result<usize, RegexError> {
        match self.node(id) {
            TreeNode::Concat(_, r) | TreeNode::Union(_, r) => Ok(r),
            _ => Err(RegexError::InvalidTreeChildAccess),
        }
    }

    pub(crate) fn child(&self, id: usize) -> Result<usize, RegexError> {
        match self.node(id) {
            TreeNode::Star(c) => Ok(c),
            _ => Err(RegexError::InvalidTreeChildAccess),
        }
    }

    pub(crate) fn label(&self, id: usize) -> Result<Symbol, RegexError> {
        match self.node(id) {
            TreeNode::Leaf(sym) => Ok(sym),
            _ => Err(RegexError::InvalidTreeChildAccess),
        }
    }
}

/// For every open paren, the index of its matching close paren, via a
/// single left-to-right stack pass. Mirrors
/// `RegexTree::calc_close_index`.
pub(crate) fn close_index(symbols: &[Symbol]) -> Result<Vec<usize>, RegexError> {
    let mut close = vec![symbols.len(); symbols.len()];
    let mut stack = Vec::new();
    for (i, sym) in symbols.iter().enumerate() {
        if sym.is_open_paren() {
            stack.push(i);
        } else if sym.is_close_paren() {
            let open = stack.pop().ok_or(RegexError::UnbalancedParen)?;
            close[open] = i;
        }
    }
    if !stack.is_empty() {
        return Err(RegexError::UnbalancedParen);
    }
    Ok(close)
}

/// Recursive-descent realisation of the grammar in SPEC_FULL.md §4.2, a
/// direct translation of `RegexTree::init<T>`.
pub(crate) fn parse_range(
    symbols: &[Symbol],
    close: &[usize],
    begin: usize,
    end: usize,
    nodes: &mut Vec<TreeNode>,
    leaves: &mut Vec<usize>,
) -> Result<usize, RegexError> {
    if begin >= end {
        return Err(RegexError::EmptyExpression);
    }

    if begin + 1 == end {
        let id = nodes.len();
        nodes.push(TreeNode::Leaf(symbols[begin]));
        leaves.push(id);
        return Ok(id);
    }

    if symbols[begin].is_open_paren() {
        let close_paren = close[begin];
        if close_paren + 1 < end && symbols[close_paren + 1].is_kleene_star() {
            return if close_paren + 2 < end {
                let left = parse_range(symbols, close, begin, close_paren + 2, nodes, leaves)?;
                let right = parse_range(symbols, close, close_paren + 2, end, nodes, leaves)?;
                let id = nodes.len();
                nodes.push(TreeNode::Concat(left, right));
                Ok(id)
            } else {
                let inner = parse_range(symbols, close, begin + 1, close_paren, nodes, leaves)?;
                let id = nodes.len();
                nodes.push(TreeNode::Star(inner));
                Ok(id)
            };
        }
        return if close_paren + 1 < end {
            let left = parse_range(symbols, close, begin + 1, close_paren, nodes, leaves)?;
            let right = parse_range(symbols, close, close_paren + 1, end, nodes, leaves)?;
            let id = nodes.len();
            nodes.push(TreeNode::Concat(left, right));
            Ok(id)
        } else {
            parse_range(symbols, close, begin + 1, close_paren, nodes, leaves)
        };
    }

    let mut depth = 0i64;
    for i in begin..end {
        if symbols[i].is_open_paren() {
            depth += 1;
        } else if symbols[i].is_close_paren() {
            depth -= 1;
        } else if symbols[i].is_union_op() && depth == 0 {
            let left = parse_range(symbols, close, begin, i, nodes, leaves)?;
            let right = parse_range(symbols, close, i + 1, end, nodes, leaves)?;
            let id = nodes.len();
            nodes.push(TreeNode::Union(left, right));
            return Ok(id);
        }
    }

    if begin + 1 < end && symbols[begin + 1].is_kleene_star() {
        return if begin + 2 < end {
            let left = parse_range(symbols, close, begin, begin + 2, nodes, leaves)?;
            let right = parse_range(symbols, close, begin + 2, end, nodes, leaves)?;
            let id = nodes.len();
            nodes.push(TreeNode::Concat(left, right));
            Ok(id)
        } else {
            let inner = parse_range(symbols, close, begin, begin + 1, nodes, leaves)?;
            let id = nodes.len();
            nodes.push(TreeNode::Star(inner));
            Ok(id)
        };
    }

    let left = parse_range(symbols, close, begin, begin + 1, nodes, leaves)?;
    let right = parse_range(symbols, close, begin + 1, end, nodes, leaves)?;
    let id = nodes.len();
    nodes.push(TreeNode::Concat(left, right));
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::Regex;

    #[test]
    fn single_literal_is_a_leaf() {
        let regex = Regex::parse("a").unwrap();
        let tree = RegexTree::parse(&regex).unwrap();
        assert!(tree.is_leaf(tree.root()));
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn concatenation_and_star() {
        let regex = Regex::parse("a(b|c)*").unwrap();
        let tree = RegexTree::parse(&regex).unwrap();
        assert!(tree.is_concat(tree.root()));
        let right = tree.right(tree.root()).unwrap();
        assert!(tree.is_star(right));
        let union = tree.child(right).unwrap();
        assert!(tree.is_union(union));
    }

    #[test]
    fn unbalanced_paren_is_an_error() {
        let regex = Regex::parse("(a").unwrap();
        assert_eq!(RegexTree::parse(&regex), Err(RegexError::UnbalancedParen));
        let regex = Regex::parse("a)").unwrap();
        assert_eq!(RegexTree::parse(&regex), Err(RegexError::UnbalancedParen));
    }

    #[test]
    fn redundant_parens_collapse() {
        let regex = Regex::parse("(a)").unwrap();
        let tree = RegexTree::parse(&regex).unwrap();
        assert!(tree.is_leaf(tree.root()));
    }
}
