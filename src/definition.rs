//! Plain node definitions
//!
//! A definition is the content-free description of a subtree: identifiers,
//! children and the initially active child. It is the input of
//! [`Navigator::new`](crate::Navigator::new) and
//! [`Navigator::insert_children`](crate::Navigator::insert_children), and the
//! output of removals. Definitions are a projection of the live tree, never a
//! second mutable copy of it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Template for a node and its descendants
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeDefinition {
    /// Unique identifier; generated (`_<n>`) when absent
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub id: Option<String>,

    /// Ordered children
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<NodeDefinition>,

    /// Initially active child; defaults to the first child
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub active_child_index: Option<usize>,
}

impl NodeDefinition {
    /// Empty definition with a generated identifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Childless definition with the given identifier
    pub fn leaf(id: impl Into<String>) -> Self {
        Self::new().with_id(id)
    }

    /// Set the identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Replace the children
    pub fn with_children(mut self, children: Vec<NodeDefinition>) -> Self {
        self.children = children;
        self
    }

    /// Set the initially active child
    pub fn with_active_child(mut self, index: usize) -> Self {
        self.active_child_index = Some(index);
        self
    }

    /// Number of nodes in this subtree, including itself
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }
}
