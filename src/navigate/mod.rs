//! Focal and jump navigation
//!
//! Visibility follows the active path: the focal parent's children are
//! always shown, along with `visible_subtree_depth` further levels of the
//! active path below them.

mod focal;
mod jump;

use tracing::debug;

use crate::tree::NodeId;
use crate::Navigator;

impl Navigator {
    /// Show children along the active path, `depth` levels below `origin`'s
    pub(crate) fn show_active_subtree(&mut self, origin: NodeId, depth: usize) {
        let mut current = origin;
        for _ in 0..=depth {
            let node = self.tree.node_mut(current);
            if node.is_leaf() {
                break;
            }
            node.is_children_visible = true;
            match node.active_child() {
                Some(child) => current = child,
                None => break,
            }
        }
    }

    /// Hide children along the active path from `origin` down
    pub(crate) fn hide_active_subtree(&mut self, origin: NodeId) {
        let mut current = Some(origin);
        while let Some(id) = current {
            let node = self.tree.node_mut(id);
            if !node.is_children_visible {
                break;
            }
            node.is_children_visible = false;
            current = node.active_child();
        }
    }

    /// Active child of `parent` if it has a child branch of its own
    pub(crate) fn deeper_branch(&self, parent: NodeId) -> Option<NodeId> {
        let child = self.tree.active_child(parent)?;
        (!self.tree.node(child).is_leaf()).then_some(child)
    }

    /// Levels of the active path below `origin` that should be visible
    pub(crate) fn visible_depth_from(&self, origin: NodeId) -> usize {
        let limit = self.tree.node(self.focal_parent).level() + self.config.visible_subtree_depth;
        limit.saturating_sub(self.tree.node(origin).level())
    }

    /// Move the focal flag to `target`, reveal its active subtree and any
    /// hidden ancestors
    pub(crate) fn set_focal_parent(&mut self, target: NodeId) {
        let previous = self.focal_parent;
        if previous == target {
            return;
        }
        if self.tree.contains(previous) {
            self.tree.node_mut(previous).is_focal_parent = false;
        }
        self.tree.node_mut(target).is_focal_parent = true;
        self.focal_parent = target;

        let mut ancestor = self.tree.node(target).parent();
        while let Some(id) = ancestor {
            let node = self.tree.node_mut(id);
            if node.is_children_visible {
                break;
            }
            node.is_children_visible = true;
            ancestor = node.parent();
        }

        let depth = self.config.visible_subtree_depth;
        self.show_active_subtree(target, depth);
        debug!(focal_parent = self.tree.node(target).id(), "focal parent changed");
    }

    /// Record a new active child without touching visibility or offsets
    pub(crate) fn set_active_index(&mut self, parent: NodeId, index: usize) {
        self.tree.node_mut(parent).active_child_index = Some(index);
    }

    /// Switch the active child, moving visibility from the old path to the new
    pub(crate) fn change_active_child(&mut self, parent: NodeId, index: usize) {
        if let Some(previous) = self.tree.active_child(parent) {
            self.hide_active_subtree(previous);
        }
        self.set_active_index(parent, index);
        if self.tree.node(parent).is_children_visible() {
            let depth = self.visible_depth_from(parent);
            self.show_active_subtree(parent, depth);
        }
    }
}
