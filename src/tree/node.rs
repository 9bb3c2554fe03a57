//! Tree node representation
//!
//! Structure and derived flags only; geometry lives in the offset ledger.

use std::fmt;

use super::NodeId;

/// A node of the content tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub(crate) id: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) index: usize,
    pub(crate) level: usize,
    pub(crate) active_child_index: Option<usize>,
    pub(crate) is_focal_parent: bool,
    pub(crate) is_children_visible: bool,
    pub(crate) is_in_inspect_mode: bool,
}

impl TreeNode {
    pub(crate) fn new(
        id: String,
        parent: Option<NodeId>,
        index: usize,
        level: usize,
        active_child_index: Option<usize>,
    ) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            index,
            level,
            active_child_index,
            is_focal_parent: false,
            is_children_visible: false,
            is_in_inspect_mode: false,
        }
    }

    /// Stable identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Parent handle; `None` only for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ordered children
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Position among siblings
    pub fn index(&self) -> usize {
        self.index
    }

    /// Depth from the root (root = 0)
    pub fn level(&self) -> usize {
        self.level
    }

    /// Index of the child on the active path; `None` iff childless
    pub fn active_child_index(&self) -> Option<usize> {
        self.active_child_index
    }

    /// Check if this node has no children
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Check if this is the root sentinel
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Whether this node's children form the focal branch
    pub fn is_focal_parent(&self) -> bool {
        self.is_focal_parent
    }

    /// Whether this node's child branch is shown
    pub fn is_children_visible(&self) -> bool {
        self.is_children_visible
    }

    /// Whether this node is the focal node under inspection
    pub fn is_in_inspect_mode(&self) -> bool {
        self.is_in_inspect_mode
    }

    /// Handle of the active child, if any
    pub(crate) fn active_child(&self) -> Option<NodeId> {
        self.active_child_index
            .and_then(|index| self.children.get(index).copied())
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.active_child_index {
            Some(active) => write!(
                f,
                "{} (level {}, {} children, active {})",
                self.id,
                self.level,
                self.children.len(),
                active
            ),
            None => write!(f, "{} (level {})", self.id, self.level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_leaf() {
        let node = TreeNode::new("n".to_string(), None, 0, 0, None);

        assert!(node.is_leaf());
        assert!(node.is_root());
        assert_eq!(node.active_child(), None);
        assert_eq!(node.to_string(), "n (level 0)");
    }
}
