//! Alignment engine
//!
//! Patches the offset ledger incrementally when geometry or structure
//! changes, so aligned offsets stay consistent without recomputing the
//! tree. Every adjustment that moves an aligned offset also moves the
//! matching live offset and, during a pan on that axis, the pan origin.

use tracing::trace;

use crate::pan::Axis;
use crate::tree::NodeId;
use crate::Navigator;

/// Geometry changes at or below this magnitude are ignored
pub(crate) const RESIZE_TOLERANCE: f64 = 0.01;

impl Navigator {
    /// A node's size along the branch axis changed
    pub(crate) fn align_on_node_resize(&mut self, node: NodeId, new_size: f64) {
        let diff = new_size - self.ledger.entry(node).size;
        if diff.abs() <= RESIZE_TOLERANCE {
            return;
        }
        self.ledger.entry_mut(node).size = new_size;

        if self.tree.node(node).parent().is_some() {
            self.shift_branch_after(node, diff);
        }
        trace!(node = self.tree.node(node).id(), new_size, diff, "node resized");
    }

    /// A node's child branch size along the trunk axis changed
    pub(crate) fn align_on_branch_resize(&mut self, parent: NodeId, new_branch_size: f64) {
        let diff = new_branch_size - self.ledger.entry(parent).branch_size;
        if diff.abs() <= RESIZE_TOLERANCE {
            return;
        }
        self.ledger.entry_mut(parent).branch_size = new_branch_size;

        for descendant in self.tree.descendants(parent) {
            self.ledger.entry_mut(descendant).trunk_relative_offset += diff;
        }

        let shift = if parent == self.focal_parent {
            diff / 2.0
        } else if self.tree.is_ancestor_or_self(parent, self.focal_parent) {
            diff
        } else {
            0.0
        };
        if shift != 0.0 {
            self.ledger.trunk_offset -= shift;
            self.ledger.trunk_offset_aligned -= shift;
            if self.pan.axis() == Some(Axis::Trunk) {
                self.pan.shift_origin(-shift);
            }
        }
        trace!(node = self.tree.node(parent).id(), new_branch_size, diff, "branch resized");
    }

    /// Compensate for `node` leaving its branch; runs before the unlink
    pub(crate) fn align_before_node_delete(&mut self, node: NodeId) {
        let size = self.ledger.entry(node).size;
        if self.tree.node(node).parent().is_some() && size != 0.0 {
            self.shift_branch_after(node, -size);
        }
    }

    /// Snap the trunk so the child branch of `branch_parent` is centered
    pub(crate) fn align_trunk_to_branch(&mut self, branch_parent: NodeId) {
        let target = self.ledger.trunk_target(branch_parent);
        self.ledger.trunk_offset = target;
        self.ledger.trunk_offset_aligned = target;
    }

    /// Snap a branch so its child at `index` is centered
    pub(crate) fn align_branch_to_index(&mut self, parent: NodeId, index: usize) {
        let Some(&child) = self.tree.node(parent).children().get(index) else {
            return;
        };
        let target = self.ledger.branch_target(child);
        let entry = self.ledger.entry_mut(parent);
        entry.child_branch_offset = target;
        entry.child_branch_offset_aligned = target;
    }

    /// Propagate a size change of `node` to its later siblings and parent
    fn shift_branch_after(&mut self, node: NodeId, diff: f64) {
        let index = self.tree.node(node).index();
        let Some(parent) = self.tree.node(node).parent() else {
            return;
        };
        let parent_node = self.tree.node(parent);

        for &sibling in &parent_node.children()[index + 1..] {
            self.ledger.entry_mut(sibling).branch_relative_offset += diff;
        }

        let shift = match parent_node.active_child_index() {
            Some(active) if active == index => diff / 2.0,
            Some(active) if index < active => diff,
            _ => return,
        };
        let entry = self.ledger.entry_mut(parent);
        entry.child_branch_offset -= shift;
        entry.child_branch_offset_aligned -= shift;

        if self.pan.axis() == Some(Axis::Branch) && parent == self.focal_parent {
            self.pan.shift_origin(-shift);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Navigator, NavigatorConfig, NodeDefinition};

    fn branch(sizes: &[f64], active: usize) -> Navigator {
        let children = (0..sizes.len())
            .map(|i| NodeDefinition::leaf(format!("n{i}")))
            .collect();
        let root = NodeDefinition::new()
            .with_children(children)
            .with_active_child(active);
        let mut nav = Navigator::new(root, NavigatorConfig::default()).unwrap();
        for (i, &size) in sizes.iter().enumerate() {
            let id = nav.find_by_id(&format!("n{i}")).unwrap();
            nav.align_on_node_resize(id, size);
        }
        nav
    }

    #[test]
    fn test_resize_before_active_shifts_by_full_diff() {
        let mut nav = branch(&[10.0, 20.0, 30.0], 2);
        let root = nav.root();
        let before = nav.ledger.entry(root).child_branch_offset_aligned;
        assert_eq!(before, -45.0);

        let n0 = nav.find_by_id("n0").unwrap();
        nav.align_on_node_resize(n0, 16.0);

        assert_eq!(nav.ledger.entry(root).child_branch_offset_aligned, before - 6.0);
        assert!(nav.check_invariants().is_empty());
    }

    #[test]
    fn test_resize_after_active_leaves_alignment() {
        let mut nav = branch(&[10.0, 20.0, 30.0], 0);
        let root = nav.root();
        let n2 = nav.find_by_id("n2").unwrap();
        nav.align_on_node_resize(n2, 3.0);

        assert_eq!(nav.ledger.entry(root).child_branch_offset_aligned, -5.0);
        assert!(nav.check_invariants().is_empty());
    }

    #[test]
    fn test_tiny_resize_ignored() {
        let mut nav = branch(&[10.0], 0);
        let n0 = nav.find_by_id("n0").unwrap();
        nav.align_on_node_resize(n0, 10.005);

        assert_eq!(nav.ledger.entry(n0).size, 10.0);
    }

    #[test]
    fn test_focal_branch_resize_recenters_trunk() {
        let mut nav = branch(&[10.0], 0);
        let root = nav.root();
        nav.align_on_branch_resize(root, 80.0);

        assert_eq!(nav.trunk_offset_aligned(), -40.0);
        assert_eq!(nav.trunk_offset(), -40.0);
        assert!(nav.check_invariants().is_empty());
    }
}
