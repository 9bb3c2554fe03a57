//! Jumps to arbitrary nodes

use tracing::debug;

use crate::tree::NodeId;
use crate::{NavError, Navigator};

impl Navigator {
    /// Make `target` the focal node
    ///
    /// Every ancestor branch on the way is realigned onto the new active
    /// path, and the old active path below the nearest shared visible
    /// ancestor is hidden.
    pub fn jump_to(&mut self, target: NodeId) -> Result<(), NavError> {
        let node = self.tree.get(target).ok_or(NavError::UnknownNode)?;
        if node.is_root() {
            return Err(NavError::RootNotNavigable);
        }

        self.pending_clear.cancel();
        self.begin_op();
        self.exit_inspect_mode();
        self.align_on_jump(target);
        self.finish_op();
        Ok(())
    }

    /// Jump in response to a tap on `node`
    ///
    /// Ignored while tap navigation is disabled, in inspect mode or during a
    /// pan. With depth retention on, a tap on a node whose children are
    /// hidden descends its active path to keep the current focal level.
    pub fn tap(&mut self, node: NodeId) -> Result<(), NavError> {
        let tapped = self.tree.get(node).ok_or(NavError::UnknownNode)?;
        if !self.config.use_tap_navigation
            || self.is_in_inspect_mode()
            || self.pan.axis().is_some()
        {
            return Ok(());
        }

        let mut target = node;
        if self.config.retain_depth_on_tap_navigation && !tapped.is_children_visible() {
            let levels = self.focal_level().saturating_sub(tapped.level());
            for _ in 0..levels {
                match self.tree.active_child(target) {
                    Some(child) => target = child,
                    None => break,
                }
            }
        }
        self.jump_to(target)
    }

    /// Change which child of `parent` is active
    ///
    /// If `parent` lies on the path above the focal branch this is a jump.
    /// Otherwise only that branch changes.
    pub fn set_active_child(&mut self, parent: NodeId, index: usize) -> Result<(), NavError> {
        let node = self.tree.get(parent).ok_or(NavError::UnknownNode)?;
        let Some(&child) = node.children().get(index) else {
            return Err(NavError::IndexOutOfRange {
                index,
                len: node.children().len(),
            });
        };

        if self.tree.is_ancestor_or_self(parent, self.focal_parent) {
            return self.jump_to(child);
        }
        if node.active_child_index() == Some(index) {
            return Ok(());
        }
        let visible = node.is_children_visible();

        self.begin_op();
        if visible {
            self.change_active_child(parent, index);
        } else {
            self.set_active_index(parent, index);
        }
        self.align_branch_to_index(parent, index);
        self.finish_op();
        Ok(())
    }

    pub(crate) fn align_on_jump(&mut self, target: NodeId) {
        if self.pan.axis().is_some() {
            self.pan_cancel();
        }
        if self.focal_node() == Some(target) {
            return;
        }
        let Some(target_parent) = self.tree.node(target).parent() else {
            return;
        };

        let mut nearest = target_parent;
        while !self.tree.node(nearest).is_children_visible() {
            match self.tree.node(nearest).parent() {
                Some(parent) => nearest = parent,
                None => break,
            }
        }
        self.hide_active_subtree(nearest);

        let mut next_parent = target_parent;
        let mut next_index = self.tree.node(target).index();
        loop {
            if self.tree.node(next_parent).active_child_index() != Some(next_index) {
                self.set_active_index(next_parent, next_index);
                self.align_branch_to_index(next_parent, next_index);
            }
            if next_parent == nearest {
                break;
            }
            next_index = self.tree.node(next_parent).index();
            match self.tree.node(next_parent).parent() {
                Some(parent) => next_parent = parent,
                None => break,
            }
        }

        let depth = (self.tree.node(target).level() - 1 - self.tree.node(nearest).level())
            + self.config.visible_subtree_depth;
        self.show_active_subtree(nearest, depth);

        if target_parent != self.focal_parent {
            self.set_focal_parent(target_parent);
            self.align_trunk_to_branch(target_parent);
        }

        debug!(
            target = self.tree.node(target).id(),
            focal_level = self.focal_level(),
            "jumped"
        );
    }
}
