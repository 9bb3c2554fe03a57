//! # Focal alignment and pan navigation
//!
//! This library drives a hierarchical content tree laid out along two
//! perpendicular axes:
//!
//! - the **trunk** axis runs along tree depth; scrolling it changes which
//!   branch is focal,
//! - the **branch** axis runs along the siblings of one branch; scrolling it
//!   changes which sibling is active.
//!
//! Exactly one root-to-leaf path is active at any time and the focal branch
//! on that path is kept centered.
//!
//! ## Components
//!
//! 1. **Tree model** ([`tree`]): arena of nodes with parent/child links
//! 2. **Offset ledger** ([`ledger`]): cached relative and aligned offsets
//! 3. **Alignment engine** (`align`): patches the ledger on insert/resize/delete
//! 4. **Pan controller** ([`pan`]): continuous drag to structural change
//! 5. **Focal and jump navigators** (`navigate`): discrete steps and jumps
//!
//! ## Usage Example
//!
//! ```
//! use focal_tree::{Navigator, NavigatorConfig, NodeDefinition};
//!
//! let root = NodeDefinition::new().with_children(vec![
//!     NodeDefinition::leaf("a"),
//!     NodeDefinition::leaf("b"),
//! ]);
//! let mut nav = Navigator::new(root, NavigatorConfig::default())?;
//! let a = nav.find_by_id("a").unwrap();
//! nav.resize_node(a, 40.0)?;
//! nav.move_forward(1);
//! assert_eq!(nav.focal_node(), nav.find_by_id("b"));
//! # Ok::<(), focal_tree::NavError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

pub mod boundary;   // Boundary flags and their deferred clear
pub mod clock;      // Time source for deferred callbacks
pub mod command;    // Discrete commands and input mapping
pub mod config;     // Navigator options
pub mod definition; // Plain node definitions
pub mod events;     // Change notifications
pub mod ledger;     // Offset ledger and invariant checks
pub mod pan;        // Gesture axis, reduction and snapping
pub mod tree;       // Arena-backed content tree

mod align;          // Alignment engine
mod navigate;       // Focal and jump navigation
mod navigator;      // Engine state and structural edits

// Re-exports for convenience
pub use boundary::{BoundaryFlags, Edge};
pub use clock::{Clock, ManualClock, SystemClock};
pub use command::{wheel_command, Command, Key, KeyInput};
pub use config::NavigatorConfig;
pub use definition::NodeDefinition;
pub use events::{ListenerId, NavEvent};
pub use ledger::{InvariantViolation, NodeOffsets, OffsetLedger};
pub use navigator::Navigator;
pub use pan::{compute_snap_count, Axis, PanDirection};
pub use tree::{NodeId, NodeTree, TreeNode};

use thiserror::Error;

/// Errors raised by structural edits, geometry notifications and setup
///
/// Navigation past a structural limit is never an error; it is clamped and
/// reported through [`BoundaryFlags`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavError {
    /// A definition reused an identifier that is already registered
    #[error("duplicate node identifier: {0}")]
    DuplicateId(String),

    /// Insert or remove position outside the parent's children
    #[error("index {index} out of range for {len} children")]
    IndexOutOfRange {
        /// Requested index (or end of the requested range)
        index: usize,
        /// Number of children of the parent
        len: usize,
    },

    /// A definition named an active child that does not exist
    #[error("invalid active child index {index} for node {id} with {len} children")]
    InvalidActiveChild {
        /// Identifier of the offending definition
        id: String,
        /// Requested active child index
        index: usize,
        /// Number of children in the definition
        len: usize,
    },

    /// The node handle does not refer to a live node
    #[error("unknown node")]
    UnknownNode,

    /// The root sentinel is not a navigation target
    #[error("the root node cannot be navigated to")]
    RootNotNavigable,

    /// Size reported by a collaborator is negative or not finite
    #[error("invalid geometry {value} reported for node {id}")]
    InvalidGeometry {
        /// Identifier of the node the size was reported for
        id: String,
        /// Rejected value
        value: f64,
    },

    /// Configuration rejected by [`NavigatorConfig::validate`]
    #[error("invalid navigator configuration: {0}")]
    InvalidConfiguration(String),
}
