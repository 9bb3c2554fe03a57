//! Inspect mode
//!
//! While inspecting, the focal node captures input: keys other than the
//! inspect toggle, wheel and pan gestures are ignored. Any navigation call
//! leaves inspect mode first.

use tracing::debug;

use super::Navigator;
use crate::events::NavEvent;

impl Navigator {
    /// Start inspecting the focal node
    pub fn enter_inspect_mode(&mut self) {
        if self.inspected.is_some() {
            return;
        }
        let Some(focal) = self.focal_node() else {
            return;
        };
        self.pan_cancel();

        self.tree.node_mut(focal).is_in_inspect_mode = true;
        self.inspected = Some(focal);
        debug!(node = self.tree.node(focal).id(), "entered inspect mode");
        self.emit(NavEvent::InspectModeEntered(focal));
    }

    /// Stop inspecting
    pub fn exit_inspect_mode(&mut self) {
        let Some(node) = self.inspected.take() else {
            return;
        };
        if self.tree.contains(node) {
            self.tree.node_mut(node).is_in_inspect_mode = false;
        }
        debug!("exited inspect mode");
        self.emit(NavEvent::InspectModeExited(node));
    }

    /// Flip inspect mode
    pub fn toggle_inspect_mode(&mut self) {
        if self.inspected.is_some() {
            self.exit_inspect_mode();
        } else {
            self.enter_inspect_mode();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::{NavEvent, Navigator, NavigatorConfig, NodeDefinition};

    #[test]
    fn test_navigation_leaves_inspect_mode() {
        let root = NodeDefinition::new()
            .with_children(vec![NodeDefinition::leaf("a"), NodeDefinition::leaf("b")]);
        let mut nav = Navigator::new(root, NavigatorConfig::default()).unwrap();
        let a = nav.find_by_id("a").unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        nav.subscribe(move |event| sink.borrow_mut().push(*event));

        nav.toggle_inspect_mode();
        assert!(nav.is_in_inspect_mode());
        assert!(nav.node(a).unwrap().is_in_inspect_mode());

        nav.move_forward(1);
        assert!(!nav.is_in_inspect_mode());
        assert!(!nav.node(a).unwrap().is_in_inspect_mode());

        let events = seen.borrow();
        assert_eq!(events[0], NavEvent::InspectModeEntered(a));
        assert_eq!(events[1], NavEvent::InspectModeExited(a));
        assert!(matches!(events[2], NavEvent::FocalNodeChanged { .. }));
    }
}
