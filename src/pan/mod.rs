//! Pan controller
//!
//! Turns a continuous drag along one axis into live offset updates and, on
//! release, into a discrete focal shift. A whole gesture from start to
//! release is a single logical operation: listeners hear about the focal
//! change once, when the gesture settles.

mod reduce;
mod snap;

pub use snap::compute_snap_count;

use tracing::{debug, warn};

use crate::Navigator;

/// Axis a pan moves along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Along tree depth
    Trunk,
    /// Along the siblings of the focal branch
    Branch,
}

/// Screen direction of a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    /// Leftwards drag
    Left,
    /// Rightwards drag
    Right,
    /// Upwards drag
    Up,
    /// Downwards drag
    Down,
}

impl PanDirection {
    /// Axis the direction locks a gesture to
    pub fn axis(self) -> Axis {
        match self {
            PanDirection::Left | PanDirection::Right => Axis::Trunk,
            PanDirection::Up | PanDirection::Down => Axis::Branch,
        }
    }
}

impl From<PanDirection> for Axis {
    fn from(direction: PanDirection) -> Self {
        direction.axis()
    }
}

/// In-progress gesture
#[derive(Debug, Default)]
pub(crate) struct PanState {
    axis: Option<Axis>,
    origin: f64,
}

impl PanState {
    pub(crate) fn begin(&mut self, axis: Axis, origin: f64) {
        self.axis = Some(axis);
        self.origin = origin;
    }

    pub(crate) fn axis(&self) -> Option<Axis> {
        self.axis
    }

    pub(crate) fn origin(&self) -> f64 {
        self.origin
    }

    /// Move the origin so live content under the finger does not jump
    pub(crate) fn shift_origin(&mut self, by: f64) {
        self.origin += by;
    }

    pub(crate) fn end(&mut self) -> Option<Axis> {
        self.axis.take()
    }
}

impl Navigator {
    /// Begin a pan along `axis`
    ///
    /// `rendered_offset` is the offset currently on screen along that axis,
    /// if the renderer was still animating toward the aligned value. Returns
    /// false when the gesture is ignored.
    pub fn pan_start(&mut self, axis: impl Into<Axis>, rendered_offset: Option<f64>) -> bool {
        let axis = axis.into();
        if !self.config.use_swipe_navigation || self.is_in_inspect_mode() {
            return false;
        }
        if self.focal_node().is_none() {
            return false;
        }
        if self.pan.axis().is_some() {
            self.pan_cancel();
        }

        self.pending_clear.cancel();
        self.begin_op();

        let rendered = rendered_offset.filter(|offset| offset.is_finite());
        let origin = match axis {
            Axis::Trunk => {
                let origin = rendered.unwrap_or(self.ledger.trunk_offset);
                self.ledger.trunk_offset = origin;
                origin
            }
            Axis::Branch => {
                let entry = self.ledger.entry_mut(self.focal_parent);
                let origin = rendered.unwrap_or(entry.child_branch_offset);
                entry.child_branch_offset = origin;
                origin
            }
        };
        self.pan.begin(axis, origin);

        debug!(?axis, origin, "pan started");
        true
    }

    /// Apply the cumulative raw delta since the gesture started
    pub fn pan_update(&mut self, delta: f64) {
        let Some(axis) = self.pan.axis() else {
            return;
        };
        if !delta.is_finite() {
            warn!(delta, "ignoring non-finite pan delta");
            return;
        }

        match axis {
            Axis::Trunk => {
                let target = self.pan.origin() + delta * self.config.swipe_multiplier_trunk;
                self.pan_trunk(target);
            }
            Axis::Branch => {
                let target = self.pan.origin() + delta * self.config.swipe_multiplier_branch;
                self.pan_focal_branch(target);
            }
        }
    }

    /// Release the gesture with a final velocity, snapping across elements
    pub fn pan_end(&mut self, velocity: f64) {
        let Some(axis) = self.pan.axis() else {
            return;
        };
        let multiplier = match axis {
            Axis::Trunk => self.config.snap_multiplier_trunk,
            Axis::Branch => self.config.snap_multiplier_branch,
        };
        let snap = compute_snap_count(velocity, multiplier);
        self.release_pan(axis, snap);
    }

    /// Abandon the gesture, settling on the nearest element
    pub fn pan_cancel(&mut self) {
        if let Some(axis) = self.pan.axis() {
            self.release_pan(axis, 0);
        }
    }

    fn release_pan(&mut self, axis: Axis, snap: i64) {
        self.pan.end();
        debug!(?axis, snap, "pan released");

        self.flags.clear_all();
        match axis {
            Axis::Trunk => self.shift_focal_level(snap),
            Axis::Branch => self.shift_focal_node(snap),
        }
        self.finish_op();
    }
}
