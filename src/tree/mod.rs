//! Arena-backed content tree
//!
//! Nodes live in a [`SlotMap`] keyed by [`NodeId`]. Parent and child links are
//! plain keys, so there are no owning cycles; string identifiers from
//! [`NodeDefinition`]s resolve to keys through a side registry.
//!
//! The tree only knows structure. Offsets live in the
//! [`OffsetLedger`](crate::ledger::OffsetLedger) and are patched by the
//! navigator around every structural edit.
//!
//! Methods that take a [`NodeId`] and return a plain value expect a live
//! handle and panic on a removed one. Use [`NodeTree::contains`] or
//! [`NodeTree::get`] first when the handle may be stale.

mod node;
mod traversal;

pub use node::TreeNode;
pub use traversal::{ActivePath, Descendants};

use std::collections::{HashMap, HashSet};

use slotmap::{new_key_type, SlotMap};

use crate::definition::NodeDefinition;
use crate::NavError;

new_key_type! {
    /// Stable handle to a node. Survives insertions and removals elsewhere.
    pub struct NodeId;
}

/// Content tree with a permanent root sentinel
#[derive(Debug)]
pub struct NodeTree {
    nodes: SlotMap<NodeId, TreeNode>,
    registry: HashMap<String, NodeId>,
    root: NodeId,
    id_count: u64,
}

impl NodeTree {
    /// Build a tree from the root definition
    pub fn from_definition(root: &NodeDefinition) -> Result<Self, NavError> {
        let mut tree = Self {
            nodes: SlotMap::with_key(),
            registry: HashMap::new(),
            root: NodeId::default(),
            id_count: 0,
        };
        tree.validate_definitions(std::slice::from_ref(root))?;
        tree.root = tree.build(root, None, 0, 0);
        Ok(tree)
    }

    /// Root sentinel
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root sentinel exists for the tree's lifetime
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    /// Check if the handle refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Resolve a string identifier
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.registry.get(id).copied()
    }

    /// Resolve a path of child indices starting at the root
    pub fn find_by_path(&self, path: &[usize]) -> Option<NodeId> {
        path.iter().try_fold(self.root, |current, &index| {
            self.node(current).children.get(index).copied()
        })
    }

    /// Child indices leading from the root to `id`
    pub fn path_of(&self, id: NodeId) -> Vec<usize> {
        let mut path = Vec::with_capacity(self.node(id).level);
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            path.push(self.node(current).index);
            current = parent;
        }
        path.reverse();
        path
    }

    /// Active child of a node
    pub fn active_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).active_child()
    }

    /// Pre-order walk over the strict descendants of `origin`
    pub fn descendants(&self, origin: NodeId) -> Descendants<'_> {
        Descendants::new(self, origin)
    }

    /// Active path below `origin`
    pub fn active_path(&self, origin: NodeId) -> ActivePath<'_> {
        ActivePath::new(self, origin)
    }

    /// Check if `ancestor` is `node` or one of its ancestors
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).parent;
        }
        false
    }

    /// Project a subtree back to its definition
    pub fn extract_definition(&self, id: NodeId) -> NodeDefinition {
        let node = self.node(id);
        NodeDefinition {
            id: Some(node.id.clone()),
            children: node
                .children
                .iter()
                .map(|&child| self.extract_definition(child))
                .collect(),
            active_child_index: node.active_child_index,
        }
    }

    /// Borrow a live node
    ///
    /// Handles are only produced by this tree, so a stale handle is a bug.
    pub(crate) fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id]
    }

    /// Reject definitions that reuse identifiers or name missing active children
    ///
    /// Runs before any mutation so a failed insert leaves the tree untouched.
    pub(crate) fn validate_definitions(&self, defs: &[NodeDefinition]) -> Result<(), NavError> {
        let mut seen = HashSet::new();
        let mut stack: Vec<&NodeDefinition> = defs.iter().collect();

        while let Some(def) = stack.pop() {
            if let Some(id) = &def.id {
                if self.registry.contains_key(id) || !seen.insert(id.as_str()) {
                    return Err(NavError::DuplicateId(id.clone()));
                }
            }
            if let Some(index) = def.active_child_index {
                if index >= def.children.len() {
                    return Err(NavError::InvalidActiveChild {
                        id: def.id.clone().unwrap_or_default(),
                        index,
                        len: def.children.len(),
                    });
                }
            }
            stack.extend(def.children.iter());
        }

        Ok(())
    }

    /// Build a validated subtree and link it under `parent` at `index`
    pub(crate) fn insert_subtree(
        &mut self,
        parent: NodeId,
        index: usize,
        def: &NodeDefinition,
    ) -> NodeId {
        let level = self.node(parent).level + 1;
        let id = self.build(def, Some(parent), index, level);
        self.node_mut(parent).children.insert(index, id);
        self.reindex(parent, index + 1);
        id
    }

    /// Unlink a subtree, returning its definition and every freed handle
    pub(crate) fn detach_subtree(&mut self, id: NodeId) -> (NodeDefinition, Vec<NodeId>) {
        let definition = self.extract_definition(id);
        let mut freed = vec![id];
        freed.extend(self.descendants(id));

        if let Some(parent) = self.node(id).parent {
            let index = self.node(id).index;
            self.node_mut(parent).children.remove(index);
            self.reindex(parent, index);
        }

        for handle in &freed {
            if let Some(node) = self.nodes.remove(*handle) {
                self.registry.remove(&node.id);
            }
        }

        (definition, freed)
    }

    fn build(
        &mut self,
        def: &NodeDefinition,
        parent: Option<NodeId>,
        index: usize,
        level: usize,
    ) -> NodeId {
        let name = match &def.id {
            Some(id) => id.clone(),
            None => self.generate_id(),
        };
        let active_child_index = if def.children.is_empty() {
            None
        } else {
            Some(def.active_child_index.unwrap_or(0))
        };

        let id = self
            .nodes
            .insert(TreeNode::new(name.clone(), parent, index, level, active_child_index));
        self.registry.insert(name, id);

        let children = def
            .children
            .iter()
            .enumerate()
            .map(|(i, child)| self.build(child, Some(id), i, level + 1))
            .collect();
        self.node_mut(id).children = children;

        id
    }

    fn generate_id(&mut self) -> String {
        loop {
            let candidate = format!("_{}", self.id_count);
            self.id_count += 1;
            if !self.registry.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    fn reindex(&mut self, parent: NodeId, from: usize) {
        for i in from..self.node(parent).children.len() {
            let child = self.node(parent).children[i];
            self.node_mut(child).index = i;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_level() -> NodeTree {
        NodeTree::from_definition(&NodeDefinition::leaf("root").with_children(vec![
            NodeDefinition::leaf("a"),
            NodeDefinition::leaf("b").with_children(vec![NodeDefinition::leaf("b0")]),
        ]))
        .expect("valid tree")
    }

    #[test]
    fn test_build_assigns_structure() {
        let tree = two_level();
        let b = tree.find_by_id("b").unwrap();
        let b0 = tree.find_by_id("b0").unwrap();

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.node(tree.root()).active_child_index(), Some(0));
        assert_eq!(tree.node(b).index(), 1);
        assert_eq!(tree.node(b0).level(), 2);
        assert_eq!(tree.path_of(b0), vec![1, 0]);
        assert_eq!(tree.find_by_path(&[1, 0]), Some(b0));
        assert_eq!(tree.find_by_path(&[2]), None);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let tree = two_level();
        let err = tree
            .validate_definitions(&[NodeDefinition::leaf("a")])
            .unwrap_err();
        assert_eq!(err, NavError::DuplicateId("a".to_string()));

        let err = tree
            .validate_definitions(&[NodeDefinition::leaf("x"), NodeDefinition::leaf("x")])
            .unwrap_err();
        assert_eq!(err, NavError::DuplicateId("x".to_string()));
    }

    #[test]
    fn test_invalid_active_child_rejected() {
        let def = NodeDefinition::leaf("p")
            .with_children(vec![NodeDefinition::new()])
            .with_active_child(3);

        let err = NodeTree::from_definition(&def).unwrap_err();
        assert!(matches!(err, NavError::InvalidActiveChild { index: 3, len: 1, .. }));
    }

    #[test]
    fn test_generated_ids_skip_registered() {
        let tree = NodeTree::from_definition(&NodeDefinition::leaf("_0").with_children(vec![
            NodeDefinition::new(),
        ]))
        .expect("valid tree");

        let child = tree.node(tree.root()).children()[0];
        assert_eq!(tree.node(child).id(), "_1");
    }

    #[test]
    fn test_insert_and_detach_reindex_siblings() {
        let mut tree = two_level();
        let root = tree.root();
        let c = tree.insert_subtree(root, 0, &NodeDefinition::leaf("c"));

        assert_eq!(tree.node(c).index(), 0);
        assert_eq!(tree.node(tree.find_by_id("b").unwrap()).index(), 2);

        let b = tree.find_by_id("b").unwrap();
        let (def, freed) = tree.detach_subtree(b);

        assert_eq!(def.id.as_deref(), Some("b"));
        assert_eq!(def.children.len(), 1);
        assert_eq!(freed.len(), 2);
        assert!(tree.find_by_id("b0").is_none());
        assert!(!tree.contains(b));
        assert_eq!(tree.node(root).children().len(), 2);
    }
}
