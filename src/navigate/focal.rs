//! Discrete focal steps along either axis

use tracing::debug;

use crate::boundary::Edge;
use crate::pan::Axis;
use crate::tree::NodeId;
use crate::Navigator;

/// Step count as a signed shift, saturating
fn steps(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

impl Navigator {
    /// Move the focal branch `level_diff` levels along the active path
    ///
    /// Negative values move toward the root. Movement stops at the root
    /// branch and at the deepest branch, raising the matching trunk flag
    /// when no movement was possible at all.
    pub fn shift_focal_level(&mut self, level_diff: i64) {
        self.pending_clear.cancel();
        self.begin_op();
        self.exit_inspect_mode();
        if self.pan.axis().is_some() {
            self.pan_cancel();
        }
        self.flags.clear_axis(Axis::Trunk);

        let target = self.find_new_focal_parent(level_diff);
        if target == self.focal_parent {
            if level_diff < 0 {
                self.raise_boundary(Edge::TrunkStart);
            } else if level_diff > 0 {
                self.raise_boundary(Edge::TrunkEnd);
            }
        }
        self.schedule_boundary_clear();

        self.set_focal_parent(target);
        self.align_trunk_to_branch(target);

        debug!(level_diff, focal_level = self.focal_level(), "focal level shifted");
        self.finish_op();
    }

    /// Move the focal node `index_diff` siblings within the focal branch
    ///
    /// Negative values move toward the first sibling. The index is clamped
    /// to the branch, raising the matching branch flag when no movement was
    /// possible at all.
    pub fn shift_focal_node(&mut self, index_diff: i64) {
        self.pending_clear.cancel();
        self.begin_op();
        self.exit_inspect_mode();
        if self.pan.axis().is_some() {
            self.pan_cancel();
        }
        self.flags.clear_axis(Axis::Branch);

        let parent = self.focal_parent;
        if let Some(current) = self.tree.node(parent).active_child_index() {
            let last = self.tree.node(parent).children().len() - 1;
            let target = i64::try_from(current)
                .unwrap_or(i64::MAX)
                .saturating_add(index_diff)
                .clamp(0, i64::try_from(last).unwrap_or(i64::MAX)) as usize;

            if target == current {
                if index_diff < 0 {
                    self.raise_boundary(Edge::BranchStart);
                } else if index_diff > 0 {
                    self.raise_boundary(Edge::BranchEnd);
                }
            }
            self.schedule_boundary_clear();

            if target != current {
                self.change_active_child(parent, target);
            }
            self.align_branch_to_index(parent, target);

            debug!(index_diff, index = target, "focal node shifted");
        }
        self.finish_op();
    }

    /// Move the focal branch deeper
    pub fn move_in(&mut self, levels: usize) {
        self.shift_focal_level(steps(levels));
    }

    /// Move the focal branch toward the root
    pub fn move_out(&mut self, levels: usize) {
        self.shift_focal_level(-steps(levels));
    }

    /// Move the focal node toward the last sibling
    pub fn move_forward(&mut self, siblings: usize) {
        self.shift_focal_node(steps(siblings));
    }

    /// Move the focal node toward the first sibling
    pub fn move_back(&mut self, siblings: usize) {
        self.shift_focal_node(-steps(siblings));
    }

    /// Move the focal branch to an absolute level (1 is the root's children)
    pub fn set_focal_level(&mut self, level: usize) {
        let diff = steps(level).saturating_sub(steps(self.focal_level()));
        self.shift_focal_level(diff);
    }

    /// Focal parent after moving `level_diff` levels along the active path
    pub(crate) fn find_new_focal_parent(&self, level_diff: i64) -> NodeId {
        let mut target = self.focal_parent;
        if level_diff < 0 {
            for _ in 0..level_diff.unsigned_abs() {
                match self.tree.node(target).parent() {
                    Some(parent) => target = parent,
                    None => break,
                }
            }
        } else {
            for _ in 0..level_diff {
                match self.deeper_branch(target) {
                    Some(child) => target = child,
                    None => break,
                }
            }
        }
        target
    }
}
