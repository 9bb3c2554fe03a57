//! Tree walks
//!
//! Both iterators borrow the tree and never allocate more than the DFS stack.

use super::{NodeId, NodeTree};

/// Pre-order walk over the strict descendants of a node
#[derive(Debug)]
pub struct Descendants<'a> {
    tree: &'a NodeTree,
    stack: Vec<NodeId>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(tree: &'a NodeTree, origin: NodeId) -> Self {
        let stack = tree.node(origin).children.iter().rev().copied().collect();
        Self { tree, stack }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let next = self.stack.pop()?;
        self.stack
            .extend(self.tree.node(next).children.iter().rev().copied());
        Some(next)
    }
}

/// Walk down the active path below a node, following active children
///
/// The origin itself is not yielded.
#[derive(Debug)]
pub struct ActivePath<'a> {
    tree: &'a NodeTree,
    current: Option<NodeId>,
}

impl<'a> ActivePath<'a> {
    pub(crate) fn new(tree: &'a NodeTree, origin: NodeId) -> Self {
        Self {
            tree,
            current: Some(origin),
        }
    }
}

impl Iterator for ActivePath<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let next = self.tree.active_child(self.current?);
        self.current = next;
        next
    }
}
