//! Live pan reduction
//!
//! While a drag is in progress the live offset follows the finger. Whenever
//! it crosses the midpoint between the current element and a neighbour, the
//! neighbour becomes current and the aligned offset moves with it. At the
//! ends of the structure the live offset is clamped to the aligned one and
//! a boundary flag is raised.

use tracing::trace;

use super::Axis;
use crate::boundary::Edge;
use crate::Navigator;

impl Navigator {
    /// Move the trunk to `target`, switching focal branch as midpoints pass
    pub(crate) fn pan_trunk(&mut self, mut target: f64) {
        let mut offset_diff = target - self.ledger.trunk_offset_aligned;
        let mut candidate = self.focal_parent;
        let mut aligned_diff = 0.0;

        self.flags.clear_axis(Axis::Trunk);

        if offset_diff < 0.0 {
            while let Some(next) = self.deeper_branch(candidate) {
                let half = self.ledger.entry(candidate).branch_size / 2.0;
                offset_diff += half;
                if offset_diff >= 0.0 {
                    break;
                }
                aligned_diff -= half;
                candidate = next;

                let next_half = self.ledger.entry(candidate).branch_size / 2.0;
                aligned_diff -= next_half;
                offset_diff += next_half;
            }
            if offset_diff < 0.0 {
                self.raise_boundary(Edge::TrunkEnd);
                target -= offset_diff;
            }
        } else if offset_diff > 0.0 {
            while let Some(next) = self.tree.node(candidate).parent() {
                let half = self.ledger.entry(candidate).branch_size / 2.0;
                offset_diff -= half;
                if offset_diff <= 0.0 {
                    break;
                }
                aligned_diff += half;
                candidate = next;

                let next_half = self.ledger.entry(candidate).branch_size / 2.0;
                aligned_diff += next_half;
                offset_diff -= next_half;
            }
            if offset_diff > 0.0 {
                self.raise_boundary(Edge::TrunkStart);
                target -= offset_diff;
            }
        }

        if candidate != self.focal_parent {
            self.set_focal_parent(candidate);
            self.ledger.trunk_offset_aligned += aligned_diff;
        }
        self.ledger.trunk_offset = target;

        trace!(
            target,
            aligned = self.ledger.trunk_offset_aligned,
            focal_level = self.focal_level(),
            "trunk pan"
        );
    }

    /// Move the focal branch to `target`, switching active child as
    /// midpoints pass
    pub(crate) fn pan_focal_branch(&mut self, mut target: f64) {
        let parent = self.focal_parent;
        let Some(active) = self.tree.node(parent).active_child_index() else {
            return;
        };
        let sizes: Vec<f64> = self
            .tree
            .node(parent)
            .children()
            .iter()
            .map(|&child| self.ledger.entry(child).size)
            .collect();

        let mut offset_diff = target - self.ledger.entry(parent).child_branch_offset_aligned;
        let mut index = active;
        let mut aligned_diff = 0.0;

        self.flags.clear_axis(Axis::Branch);

        if offset_diff < 0.0 {
            while index + 1 < sizes.len() {
                let half = sizes[index] / 2.0;
                offset_diff += half;
                if offset_diff >= 0.0 {
                    break;
                }
                aligned_diff -= half;
                index += 1;

                let next_half = sizes[index] / 2.0;
                aligned_diff -= next_half;
                offset_diff += next_half;
            }
            if offset_diff < 0.0 {
                self.raise_boundary(Edge::BranchEnd);
                target -= offset_diff;
            }
        } else if offset_diff > 0.0 {
            while index > 0 {
                let half = sizes[index] / 2.0;
                offset_diff -= half;
                if offset_diff <= 0.0 {
                    break;
                }
                aligned_diff += half;
                index -= 1;

                let next_half = sizes[index] / 2.0;
                aligned_diff += next_half;
                offset_diff -= next_half;
            }
            if offset_diff > 0.0 {
                self.raise_boundary(Edge::BranchStart);
                target -= offset_diff;
            }
        }

        if index != active {
            self.change_active_child(parent, index);
            self.ledger.entry_mut(parent).child_branch_offset_aligned += aligned_diff;
        }
        self.ledger.entry_mut(parent).child_branch_offset = target;

        trace!(target, index, "branch pan");
    }
}
