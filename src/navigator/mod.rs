//! Navigator: engine state shared by every component
//!
//! Owns the tree, the offset ledger and the tree-level navigation state.
//! The alignment engine, pan controller and navigators are implemented as
//! further `impl Navigator` blocks in their own modules.

mod edit;
mod inspect;

use std::time::Duration;

use tracing::{debug, warn};

use crate::boundary::{BoundaryFlags, Edge, PendingClear};
use crate::clock::{Clock, SystemClock};
use crate::config::NavigatorConfig;
use crate::definition::NodeDefinition;
use crate::events::{ChangeTracker, EventBus, FocalSnapshot, ListenerId, NavEvent};
use crate::ledger::{self, InvariantViolation, NodeOffsets, OffsetLedger};
use crate::pan::{Axis, PanState};
use crate::tree::{NodeId, NodeTree, TreeNode};
use crate::NavError;

/// Focal alignment and pan navigation engine
#[derive(Debug)]
pub struct Navigator {
    pub(crate) tree: NodeTree,
    pub(crate) ledger: OffsetLedger,
    pub(crate) focal_parent: NodeId,
    pub(crate) pan: PanState,
    pub(crate) flags: BoundaryFlags,
    pub(crate) pending_clear: PendingClear,
    pub(crate) tracker: ChangeTracker,
    pub(crate) config: NavigatorConfig,
    pub(crate) inspected: Option<NodeId>,
    events: EventBus,
    clock: Box<dyn Clock>,
}

impl Navigator {
    /// Build a navigator over the given root definition
    pub fn new(root: NodeDefinition, config: NavigatorConfig) -> Result<Self, NavError> {
        Self::with_clock(root, config, SystemClock::new())
    }

    /// Build a navigator with an explicit time source
    pub fn with_clock(
        root: NodeDefinition,
        config: NavigatorConfig,
        clock: impl Clock + 'static,
    ) -> Result<Self, NavError> {
        config.validate()?;
        let tree = NodeTree::from_definition(&root)?;
        let root_id = tree.root();

        let mut ledger = OffsetLedger::new();
        ledger.seed(&tree, root_id);

        let mut navigator = Self {
            tree,
            ledger,
            focal_parent: root_id,
            pan: PanState::default(),
            flags: BoundaryFlags::default(),
            pending_clear: PendingClear::default(),
            tracker: ChangeTracker::default(),
            config,
            inspected: None,
            events: EventBus::default(),
            clock: Box::new(clock),
        };
        navigator.tree.node_mut(root_id).is_focal_parent = true;
        let depth = navigator.config.visible_subtree_depth;
        navigator.show_active_subtree(root_id, depth);

        debug!(nodes = navigator.tree.len(), "navigator created");
        Ok(navigator)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Content tree
    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    /// Offset ledger
    pub fn ledger(&self) -> &OffsetLedger {
        &self.ledger
    }

    /// Active configuration
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Root sentinel
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Node whose children form the focal branch
    pub fn focal_parent(&self) -> NodeId {
        self.focal_parent
    }

    /// Active child of the focal parent; `None` only for an empty tree
    pub fn focal_node(&self) -> Option<NodeId> {
        self.tree.active_child(self.focal_parent)
    }

    /// Level of the focal branch (focal parent level + 1)
    pub fn focal_level(&self) -> usize {
        self.tree.node(self.focal_parent).level() + 1
    }

    /// Active path from the root's active child down to a leaf
    pub fn active_path(&self) -> Vec<NodeId> {
        self.tree.active_path(self.tree.root()).collect()
    }

    /// Number of levels on the active path
    pub fn active_tree_height(&self) -> usize {
        self.tree.active_path(self.tree.root()).count()
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.tree.get(id)
    }

    /// Ledger entry of a node
    pub fn offsets(&self, id: NodeId) -> Option<&NodeOffsets> {
        self.ledger.get(id)
    }

    /// Resolve a string identifier
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.find_by_id(id)
    }

    /// Resolve a root-relative index path
    pub fn find_by_path(&self, path: &[usize]) -> Option<NodeId> {
        self.tree.find_by_path(path)
    }

    /// Root-relative index path of a node
    pub fn path_of(&self, id: NodeId) -> Option<Vec<usize>> {
        self.tree.contains(id).then(|| self.tree.path_of(id))
    }

    /// Definition of a subtree
    pub fn definition(&self, id: NodeId) -> Option<NodeDefinition> {
        self.tree
            .contains(id)
            .then(|| self.tree.extract_definition(id))
    }

    /// Live trunk offset
    pub fn trunk_offset(&self) -> f64 {
        self.ledger.trunk_offset()
    }

    /// Resting trunk offset
    pub fn trunk_offset_aligned(&self) -> f64 {
        self.ledger.trunk_offset_aligned()
    }

    /// Current boundary flags
    pub fn boundary_flags(&self) -> BoundaryFlags {
        self.flags
    }

    /// Axis of the in-progress pan, if any
    pub fn pan_axis(&self) -> Option<Axis> {
        self.pan.axis()
    }

    /// Whether the focal node is being inspected
    pub fn is_in_inspect_mode(&self) -> bool {
        self.inspected.is_some()
    }

    /// When the pending boundary flag clear is due, on the navigator's clock
    pub fn boundary_clear_deadline(&self) -> Option<Duration> {
        self.pending_clear.deadline()
    }

    /// Recompute every invariant and report violations
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        ledger::check(
            &self.tree,
            &self.ledger,
            self.focal_parent,
            self.pan.axis().is_none(),
        )
    }

    // ------------------------------------------------------------------
    // Configuration, listeners, time
    // ------------------------------------------------------------------

    /// Replace the configuration
    ///
    /// Disabling swipe navigation settles any pan in progress.
    pub fn set_config(&mut self, config: NavigatorConfig) -> Result<(), NavError> {
        config.validate()?;
        self.config = config;
        if !self.config.use_swipe_navigation {
            self.pan_cancel();
        }
        Ok(())
    }

    /// Register a listener for navigation events
    pub fn subscribe(&mut self, listener: impl FnMut(&NavEvent) + 'static) -> ListenerId {
        self.events.subscribe(Box::new(listener))
    }

    /// Remove a listener; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Fire the boundary flag clear if it is due
    ///
    /// Returns true when the flags were cleared.
    pub fn tick(&mut self) -> bool {
        if self.pending_clear.fire(self.clock.now()) {
            self.flags.clear_all();
            true
        } else {
            false
        }
    }

    // ------------------------------------------------------------------
    // Geometry notifications
    // ------------------------------------------------------------------

    /// A node's rendered extent along the branch axis changed
    pub fn resize_node(&mut self, node: NodeId, size: f64) -> Result<(), NavError> {
        self.check_geometry(node, size)?;
        self.align_on_node_resize(node, size);
        Ok(())
    }

    /// A node's child branch extent along the trunk axis changed
    pub fn resize_branch(&mut self, node: NodeId, branch_size: f64) -> Result<(), NavError> {
        self.check_geometry(node, branch_size)?;
        self.align_on_branch_resize(node, branch_size);
        Ok(())
    }

    fn check_geometry(&self, node: NodeId, value: f64) -> Result<(), NavError> {
        let entry = self.tree.get(node).ok_or(NavError::UnknownNode)?;
        if !value.is_finite() || value < 0.0 {
            warn!(node = entry.id(), value, "rejecting invalid geometry");
            return Err(NavError::InvalidGeometry {
                id: entry.id().to_string(),
                value,
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Operation bookkeeping
    // ------------------------------------------------------------------

    fn snapshot(&self) -> FocalSnapshot {
        FocalSnapshot {
            focal_parent: self.focal_parent,
            focal_node: self.focal_node(),
        }
    }

    /// Open a logical operation
    pub(crate) fn begin_op(&mut self) {
        let snapshot = self.snapshot();
        self.tracker.open(snapshot);
    }

    /// Close a logical operation, emitting its diff if it was the outermost
    pub(crate) fn finish_op(&mut self) {
        let snapshot = self.snapshot();
        for event in self.tracker.close(snapshot) {
            debug!(?event, "emitting navigation event");
            self.events.emit(event);
        }
    }

    pub(crate) fn emit(&mut self, event: NavEvent) {
        debug!(?event, "emitting navigation event");
        self.events.emit(event);
    }

    /// Raise a boundary flag and report it with the current operation
    pub(crate) fn raise_boundary(&mut self, edge: Edge) {
        self.flags.raise(edge);
        if self.tracker.is_open() {
            self.tracker.record_edge(edge);
        } else {
            self.emit(NavEvent::BoundaryReached(edge));
        }
    }

    pub(crate) fn schedule_boundary_clear(&mut self) {
        let now = self.clock.now();
        self.pending_clear
            .schedule(now, self.config.boundary_clear_delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navigator() -> Navigator {
        let root = NodeDefinition::new().with_children(vec![
            NodeDefinition::leaf("a").with_children(vec![NodeDefinition::leaf("a0")]),
            NodeDefinition::leaf("b"),
        ]);
        Navigator::new(root, NavigatorConfig::default()).expect("valid tree")
    }

    #[test]
    fn test_initial_state() {
        let nav = navigator();
        let a = nav.find_by_id("a").unwrap();
        let a0 = nav.find_by_id("a0").unwrap();

        assert_eq!(nav.focal_parent(), nav.root());
        assert_eq!(nav.focal_node(), Some(a));
        assert_eq!(nav.focal_level(), 1);
        assert_eq!(nav.active_path(), vec![a, a0]);
        assert_eq!(nav.active_tree_height(), 2);
        assert!(nav.node(nav.root()).unwrap().is_children_visible());
        assert!(nav.node(a).unwrap().is_children_visible());
        assert!(nav.check_invariants().is_empty());
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let mut nav = navigator();
        let a = nav.find_by_id("a").unwrap();

        assert!(matches!(
            nav.resize_node(a, f64::NAN),
            Err(NavError::InvalidGeometry { .. })
        ));
        assert!(nav.resize_branch(a, -1.0).is_err());
        assert_eq!(nav.offsets(a).unwrap().size, 0.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut nav = navigator();
        let bad = NavigatorConfig::default().with_swipe_multipliers(f64::INFINITY, 1.0);
        assert!(nav.set_config(bad).is_err());
        assert_eq!(nav.config(), &NavigatorConfig::default());
    }
}
