//! Navigator options

use std::time::Duration;

use crate::NavError;

/// Tunables for navigation and input handling
#[derive(Debug, Clone, PartialEq)]
pub struct NavigatorConfig {
    /// Levels of descendant branches shown after the focal branch
    pub visible_subtree_depth: usize,

    /// Pan distance per unit of raw trunk-axis delta
    pub swipe_multiplier_trunk: f64,

    /// Pan distance per unit of raw branch-axis delta
    pub swipe_multiplier_branch: f64,

    /// Scales how many levels a released trunk pan snaps across
    pub snap_multiplier_trunk: f64,

    /// Scales how many siblings a released branch pan snaps across
    pub snap_multiplier_branch: f64,

    /// Delay before raised boundary flags clear themselves
    pub boundary_clear_delay: Duration,

    /// Keep the focal depth when tapping a node whose children are hidden
    pub retain_depth_on_tap_navigation: bool,

    /// Accept keyboard commands
    pub use_key_navigation: bool,

    /// Accept wheel commands
    pub use_wheel_navigation: bool,

    /// Accept pan gestures
    pub use_swipe_navigation: bool,

    /// Accept tap navigation
    pub use_tap_navigation: bool,

    /// Let the inspect key toggle inspect mode
    pub use_inspect_mode_key: bool,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            visible_subtree_depth: 1,
            swipe_multiplier_trunk: 1.0,
            swipe_multiplier_branch: 1.0,
            snap_multiplier_trunk: 1.0,
            snap_multiplier_branch: 1.0,
            boundary_clear_delay: Duration::from_millis(300),
            retain_depth_on_tap_navigation: false,
            use_key_navigation: true,
            use_wheel_navigation: true,
            use_swipe_navigation: true,
            use_tap_navigation: true,
            use_inspect_mode_key: true,
        }
    }
}

impl NavigatorConfig {
    /// Set the visible subtree depth
    pub fn with_visible_subtree_depth(mut self, depth: usize) -> Self {
        self.visible_subtree_depth = depth;
        self
    }

    /// Set both swipe multipliers (trunk, branch)
    pub fn with_swipe_multipliers(mut self, trunk: f64, branch: f64) -> Self {
        self.swipe_multiplier_trunk = trunk;
        self.swipe_multiplier_branch = branch;
        self
    }

    /// Set both snap multipliers (trunk, branch)
    pub fn with_snap_multipliers(mut self, trunk: f64, branch: f64) -> Self {
        self.snap_multiplier_trunk = trunk;
        self.snap_multiplier_branch = branch;
        self
    }

    /// Set the boundary flag auto-clear delay
    pub fn with_boundary_clear_delay(mut self, delay: Duration) -> Self {
        self.boundary_clear_delay = delay;
        self
    }

    /// Enable or disable depth retention on tap navigation
    pub fn with_retain_depth_on_tap(mut self, enabled: bool) -> Self {
        self.retain_depth_on_tap_navigation = enabled;
        self
    }

    /// Enable or disable pan gestures
    pub fn with_swipe_navigation(mut self, enabled: bool) -> Self {
        self.use_swipe_navigation = enabled;
        self
    }

    /// Check multipliers are finite and non-negative
    pub fn validate(&self) -> Result<(), NavError> {
        let multipliers = [
            ("swipe_multiplier_trunk", self.swipe_multiplier_trunk),
            ("swipe_multiplier_branch", self.swipe_multiplier_branch),
            ("snap_multiplier_trunk", self.snap_multiplier_trunk),
            ("snap_multiplier_branch", self.snap_multiplier_branch),
        ];

        for (name, value) in multipliers {
            if !value.is_finite() || value < 0.0 {
                return Err(NavError::InvalidConfiguration(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }

        Ok(())
    }
}
