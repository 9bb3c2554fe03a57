//! Ledger consistency checks
//!
//! Recomputes every cached offset from stored sizes and compares. Used by
//! tests and available to callers that want to assert a healthy engine.

use thiserror::Error;

use super::OffsetLedger;
use crate::tree::{NodeId, NodeTree};

/// Absolute tolerance for offset comparisons
pub const INVARIANT_TOLERANCE: f64 = 1e-6;

/// A broken ledger or tree invariant
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    /// Stored sibling index disagrees with the parent's child order
    #[error("node {id}: stored index {stored}, actual position {actual}")]
    Index {
        /// Node identifier
        id: String,
        /// Index stored on the node
        stored: usize,
        /// Position in the parent's children
        actual: usize,
    },

    /// Stored level disagrees with depth
    #[error("node {id}: stored level {stored}, actual depth {actual}")]
    Level {
        /// Node identifier
        id: String,
        /// Level stored on the node
        stored: usize,
        /// Depth from the root
        actual: usize,
    },

    /// Active child index missing, dangling or set on a leaf
    #[error("node {id}: active child index {index:?} invalid for {len} children")]
    ActiveChild {
        /// Node identifier
        id: String,
        /// Stored active index
        index: Option<usize>,
        /// Number of children
        len: usize,
    },

    /// Branch-relative offset is not the sum of earlier sibling sizes
    #[error("node {id}: branch relative offset {actual}, expected {expected}")]
    BranchRelative {
        /// Node identifier
        id: String,
        /// Recomputed value
        expected: f64,
        /// Ledger value
        actual: f64,
    },

    /// Trunk-relative offset does not follow the parent's branch
    #[error("node {id}: trunk relative offset {actual}, expected {expected}")]
    TrunkRelative {
        /// Node identifier
        id: String,
        /// Recomputed value
        expected: f64,
        /// Ledger value
        actual: f64,
    },

    /// Aligned child branch offset does not center the active child
    #[error("node {id}: aligned child branch offset {actual}, expected {expected}")]
    BranchAlignment {
        /// Node identifier
        id: String,
        /// Recomputed value
        expected: f64,
        /// Ledger value
        actual: f64,
    },

    /// Aligned trunk offset does not center the focal branch
    #[error("aligned trunk offset {actual}, expected {expected}")]
    TrunkAlignment {
        /// Recomputed value
        expected: f64,
        /// Ledger value
        actual: f64,
    },

    /// A live offset differs from its aligned value while no pan is active
    #[error("{axis} live offset {live} differs from aligned {aligned} at rest")]
    Unreconciled {
        /// `trunk` or the identifier of the branch parent
        axis: String,
        /// Live value
        live: f64,
        /// Aligned value
        aligned: f64,
    },

    /// Focal parent flag set on the wrong nodes
    #[error("focal parent flag inconsistent on node {id}")]
    FocalFlag {
        /// Node identifier
        id: String,
    },

    /// An ancestor of the focal branch has its children hidden
    #[error("node {id}: children hidden but on the path to the focal branch")]
    HiddenAncestor {
        /// Node identifier
        id: String,
    },
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= INVARIANT_TOLERANCE
}

/// Check every structural and offset invariant
///
/// Live offsets are only compared against aligned ones when `at_rest`.
pub(crate) fn check(
    tree: &NodeTree,
    ledger: &OffsetLedger,
    focal_parent: NodeId,
    at_rest: bool,
) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let root = tree.root();

    for id in std::iter::once(root).chain(tree.descendants(root)) {
        let node = tree.node(id);
        let entry = ledger.entry(id);
        let name = || node.id().to_string();

        if node.is_focal_parent() != (id == focal_parent) {
            violations.push(InvariantViolation::FocalFlag { id: name() });
        }

        let active_ok = match node.active_child_index() {
            None => node.is_leaf(),
            Some(index) => index < node.children().len(),
        };
        if !active_ok {
            violations.push(InvariantViolation::ActiveChild {
                id: name(),
                index: node.active_child_index(),
                len: node.children().len(),
            });
        }

        let mut expected_branch_relative = 0.0;
        for (position, &child) in node.children().iter().enumerate() {
            let child_node = tree.node(child);
            let child_entry = ledger.entry(child);

            if child_node.index() != position {
                violations.push(InvariantViolation::Index {
                    id: child_node.id().to_string(),
                    stored: child_node.index(),
                    actual: position,
                });
            }
            if child_node.level() != node.level() + 1 {
                violations.push(InvariantViolation::Level {
                    id: child_node.id().to_string(),
                    stored: child_node.level(),
                    actual: node.level() + 1,
                });
            }
            if !close(child_entry.branch_relative_offset, expected_branch_relative) {
                violations.push(InvariantViolation::BranchRelative {
                    id: child_node.id().to_string(),
                    expected: expected_branch_relative,
                    actual: child_entry.branch_relative_offset,
                });
            }

            let expected_trunk = entry.trunk_relative_offset + entry.branch_size;
            if !close(child_entry.trunk_relative_offset, expected_trunk) {
                violations.push(InvariantViolation::TrunkRelative {
                    id: child_node.id().to_string(),
                    expected: expected_trunk,
                    actual: child_entry.trunk_relative_offset,
                });
            }

            expected_branch_relative += child_entry.size;
        }

        if let Some(active) = node.active_child().filter(|_| active_ok) {
            let expected = ledger.branch_target(active);
            if !close(entry.child_branch_offset_aligned, expected) {
                violations.push(InvariantViolation::BranchAlignment {
                    id: name(),
                    expected,
                    actual: entry.child_branch_offset_aligned,
                });
            }
            if at_rest && !close(entry.child_branch_offset, entry.child_branch_offset_aligned) {
                violations.push(InvariantViolation::Unreconciled {
                    axis: name(),
                    live: entry.child_branch_offset,
                    aligned: entry.child_branch_offset_aligned,
                });
            }
        }
    }

    if !close(ledger.entry(root).trunk_relative_offset, 0.0) {
        violations.push(InvariantViolation::TrunkRelative {
            id: tree.node(root).id().to_string(),
            expected: 0.0,
            actual: ledger.entry(root).trunk_relative_offset,
        });
    }

    let expected_trunk = ledger.trunk_target(focal_parent);
    if !close(ledger.trunk_offset_aligned(), expected_trunk) {
        violations.push(InvariantViolation::TrunkAlignment {
            expected: expected_trunk,
            actual: ledger.trunk_offset_aligned(),
        });
    }
    if at_rest && !close(ledger.trunk_offset(), ledger.trunk_offset_aligned()) {
        violations.push(InvariantViolation::Unreconciled {
            axis: "trunk".to_string(),
            live: ledger.trunk_offset(),
            aligned: ledger.trunk_offset_aligned(),
        });
    }

    let mut ancestor = Some(focal_parent);
    while let Some(id) = ancestor {
        let node = tree.node(id);
        if !node.is_leaf() && !node.is_children_visible() {
            violations.push(InvariantViolation::HiddenAncestor {
                id: node.id().to_string(),
            });
        }
        ancestor = node.parent();
    }

    violations
}
