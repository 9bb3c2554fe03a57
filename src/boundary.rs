//! Boundary flags
//!
//! Four independent indicators raised when a pan or step tries to move past
//! a structural limit. They clear on their own after a delay; the pending
//! clear is a single deadline that every navigation call supersedes.

use std::time::Duration;

use crate::pan::Axis;

/// One of the four structural limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Trunk start: the root branch, nothing shallower
    TrunkStart,
    /// Trunk end: the deepest branch of the active path
    TrunkEnd,
    /// Branch start: the first sibling of the focal branch
    BranchStart,
    /// Branch end: the last sibling of the focal branch
    BranchEnd,
}

impl Edge {
    /// Axis the edge belongs to
    pub fn axis(self) -> Axis {
        match self {
            Edge::TrunkStart | Edge::TrunkEnd => Axis::Trunk,
            Edge::BranchStart | Edge::BranchEnd => Axis::Branch,
        }
    }
}

/// Current boundary indicator state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundaryFlags {
    /// Reached the root branch
    pub trunk_start: bool,
    /// Reached the deepest branch
    pub trunk_end: bool,
    /// Reached the first sibling
    pub branch_start: bool,
    /// Reached the last sibling
    pub branch_end: bool,
}

impl BoundaryFlags {
    /// Check a single edge
    pub fn is_set(&self, edge: Edge) -> bool {
        match edge {
            Edge::TrunkStart => self.trunk_start,
            Edge::TrunkEnd => self.trunk_end,
            Edge::BranchStart => self.branch_start,
            Edge::BranchEnd => self.branch_end,
        }
    }

    /// Check if any edge is raised
    pub fn any(&self) -> bool {
        self.trunk_start || self.trunk_end || self.branch_start || self.branch_end
    }

    /// Raise an edge, returning whether it was previously clear
    pub(crate) fn raise(&mut self, edge: Edge) -> bool {
        let slot = match edge {
            Edge::TrunkStart => &mut self.trunk_start,
            Edge::TrunkEnd => &mut self.trunk_end,
            Edge::BranchStart => &mut self.branch_start,
            Edge::BranchEnd => &mut self.branch_end,
        };
        !std::mem::replace(slot, true)
    }

    pub(crate) fn clear_axis(&mut self, axis: Axis) {
        match axis {
            Axis::Trunk => {
                self.trunk_start = false;
                self.trunk_end = false;
            }
            Axis::Branch => {
                self.branch_start = false;
                self.branch_end = false;
            }
        }
    }

    pub(crate) fn clear_all(&mut self) {
        *self = Self::default();
    }
}

/// Deferred clear of the boundary flags
///
/// Holds at most one deadline. Scheduling replaces it and cancelling drops
/// it, so the last navigation call always wins.
#[derive(Debug, Default)]
pub(crate) struct PendingClear {
    deadline: Option<Duration>,
}

impl PendingClear {
    pub(crate) fn schedule(&mut self, now: Duration, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub(crate) fn cancel(&mut self) {
        self.deadline = None;
    }

    pub(crate) fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Consume the deadline if it has passed
    pub(crate) fn fire(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
