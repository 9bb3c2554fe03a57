//! Offset ledger
//!
//! Per-node cached coordinates plus the trunk position. Every other
//! component reads from and patches this ledger; nothing recomputes offsets
//! from scratch except the invariant checker.
//!
//! Coordinates along the two axes:
//! - branch axis: `branch_relative_offset` = Σ size of earlier siblings,
//!   `child_branch_offset(_aligned)` positions a node's own children
//! - trunk axis: `trunk_relative_offset` = start of a node's child branch,
//!   `trunk_offset(_aligned)` positions the whole trunk

mod invariants;

pub use invariants::{InvariantViolation, INVARIANT_TOLERANCE};
pub(crate) use invariants::check;

use slotmap::SecondaryMap;

use crate::tree::{NodeId, NodeTree};

/// Ledger entry for one node
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeOffsets {
    /// Extent along the branch axis
    pub size: f64,
    /// Extent of this node's child branch along the trunk axis
    pub branch_size: f64,
    /// Position relative to the first sibling
    pub branch_relative_offset: f64,
    /// Position of this node's child branch relative to the root
    pub trunk_relative_offset: f64,
    /// Live offset of this node's children, possibly mid-pan
    pub child_branch_offset: f64,
    /// Resting offset that centers the active child
    pub child_branch_offset_aligned: f64,
}

/// Offsets for every node plus the trunk position
#[derive(Debug, Default)]
pub struct OffsetLedger {
    entries: SecondaryMap<NodeId, NodeOffsets>,
    pub(crate) trunk_offset: f64,
    pub(crate) trunk_offset_aligned: f64,
}

impl OffsetLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger entry of a node
    pub fn get(&self, id: NodeId) -> Option<&NodeOffsets> {
        self.entries.get(id)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the ledger holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Live trunk position
    pub fn trunk_offset(&self) -> f64 {
        self.trunk_offset
    }

    /// Resting trunk position centering the focal branch
    pub fn trunk_offset_aligned(&self) -> f64 {
        self.trunk_offset_aligned
    }

    /// Trunk offset that centers the child branch of `branch_parent`
    pub fn trunk_target(&self, branch_parent: NodeId) -> f64 {
        let entry = &self.entries[branch_parent];
        -entry.trunk_relative_offset - entry.branch_size / 2.0
    }

    /// Child branch offset that centers `child` within its branch
    pub fn branch_target(&self, child: NodeId) -> f64 {
        let entry = &self.entries[child];
        -entry.branch_relative_offset - entry.size / 2.0
    }

    pub(crate) fn entry(&self, id: NodeId) -> &NodeOffsets {
        &self.entries[id]
    }

    pub(crate) fn entry_mut(&mut self, id: NodeId) -> &mut NodeOffsets {
        &mut self.entries[id]
    }

    pub(crate) fn remove(&mut self, id: NodeId) {
        self.entries.remove(id);
    }

    /// Create zero-geometry entries for `origin` and its descendants
    ///
    /// Parents are seeded before children and earlier siblings before later
    /// ones, so each entry can be derived from entries already present.
    pub(crate) fn seed(&mut self, tree: &NodeTree, origin: NodeId) {
        for id in std::iter::once(origin).chain(tree.descendants(origin)) {
            let node = tree.node(id);
            let mut entry = NodeOffsets::default();

            if let Some(parent) = node.parent() {
                let parent_entry = self.entries[parent];
                entry.trunk_relative_offset =
                    parent_entry.trunk_relative_offset + parent_entry.branch_size;

                if node.index() > 0 {
                    let previous = tree.node(parent).children()[node.index() - 1];
                    let previous_entry = self.entries[previous];
                    entry.branch_relative_offset =
                        previous_entry.branch_relative_offset + previous_entry.size;
                }
            }

            self.entries.insert(id, entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::NodeDefinition;

    #[test]
    fn test_seed_places_new_nodes_after_siblings() {
        let tree = NodeTree::from_definition(&NodeDefinition::leaf("root").with_children(vec![
            NodeDefinition::leaf("a"),
            NodeDefinition::leaf("b").with_children(vec![NodeDefinition::leaf("b0")]),
        ]))
        .expect("valid tree");
        let root = tree.root();
        let a = tree.find_by_id("a").unwrap();
        let b = tree.find_by_id("b").unwrap();
        let b0 = tree.find_by_id("b0").unwrap();

        let mut ledger = OffsetLedger::new();
        ledger.seed(&tree, root);
        ledger.entry_mut(root).branch_size = 80.0;
        ledger.entry_mut(a).size = 30.0;
        ledger.seed(&tree, b);

        assert_eq!(ledger.len(), 4);
        assert_eq!(ledger.entry(b).branch_relative_offset, 30.0);
        assert_eq!(ledger.entry(b).trunk_relative_offset, 80.0);
        assert_eq!(ledger.entry(b0).trunk_relative_offset, 80.0);
        assert_eq!(ledger.trunk_target(root), -40.0);
        assert_eq!(ledger.branch_target(b), -30.0);
    }
}
