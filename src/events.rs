//! Change notifications
//!
//! Listeners are plain callbacks registered on the navigator. Focal and
//! boundary notifications are batched per logical operation: the tracker
//! records a baseline when the outermost operation opens and emits the diff
//! when it closes, however many intermediate steps ran in between.

use std::fmt;

use crate::boundary::Edge;
use crate::tree::NodeId;

/// Notification delivered to listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    /// The active child of the focal parent changed
    FocalNodeChanged {
        /// Focal node before the operation
        prev: Option<NodeId>,
        /// Focal node after the operation
        current: Option<NodeId>,
    },
    /// The focal branch moved to another parent
    FocalParentChanged {
        /// Focal parent before the operation
        prev: NodeId,
        /// Focal parent after the operation
        current: NodeId,
    },
    /// A navigation attempt hit a structural limit
    BoundaryReached(Edge),
    /// The focal node entered inspect mode
    InspectModeEntered(NodeId),
    /// The focal node left inspect mode
    InspectModeExited(NodeId),
}

/// Handle returned by [`Navigator::subscribe`](crate::Navigator::subscribe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&NavEvent)>;

/// Registered listeners
#[derive(Default)]
pub(crate) struct EventBus {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl EventBus {
    pub(crate) fn subscribe(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub(crate) fn emit(&mut self, event: NavEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

/// Baseline of one logical operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FocalSnapshot {
    pub(crate) focal_parent: NodeId,
    pub(crate) focal_node: Option<NodeId>,
}

/// Nesting-aware operation tracker
#[derive(Debug, Default)]
pub(crate) struct ChangeTracker {
    depth: usize,
    baseline: Option<FocalSnapshot>,
    edges: Vec<Edge>,
}

impl ChangeTracker {
    /// Open an operation; only the outermost one records a baseline
    pub(crate) fn open(&mut self, snapshot: FocalSnapshot) {
        if self.depth == 0 {
            self.baseline = Some(snapshot);
            self.edges.clear();
        }
        self.depth += 1;
    }

    /// Remember an edge raised inside the current operation
    pub(crate) fn record_edge(&mut self, edge: Edge) {
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.depth > 0
    }

    /// Close an operation; returns the events to emit once the outermost closes
    pub(crate) fn close(&mut self, current: FocalSnapshot) -> Vec<NavEvent> {
        self.depth = self.depth.saturating_sub(1);
        if self.depth > 0 {
            return Vec::new();
        }

        let mut events = Vec::new();
        if let Some(baseline) = self.baseline.take() {
            if baseline.focal_parent != current.focal_parent {
                events.push(NavEvent::FocalParentChanged {
                    prev: baseline.focal_parent,
                    current: current.focal_parent,
                });
            }
            if baseline.focal_node != current.focal_node {
                events.push(NavEvent::FocalNodeChanged {
                    prev: baseline.focal_node,
                    current: current.focal_node,
                });
            }
        }
        events.extend(self.edges.drain(..).map(NavEvent::BoundaryReached));
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ids() -> (NodeId, NodeId) {
        let mut map: SlotMap<NodeId, ()> = SlotMap::with_key();
        (map.insert(()), map.insert(()))
    }

    #[test]
    fn test_nested_operations_emit_once() {
        let (a, b) = ids();
        let mut tracker = ChangeTracker::default();
        let start = FocalSnapshot { focal_parent: a, focal_node: Some(a) };
        let end = FocalSnapshot { focal_parent: a, focal_node: Some(b) };

        tracker.open(start);
        tracker.open(end);
        tracker.record_edge(Edge::BranchEnd);
        tracker.record_edge(Edge::BranchEnd);
        assert!(tracker.close(end).is_empty());
        assert!(tracker.is_open());

        let events = tracker.close(end);
        assert_eq!(
            events,
            vec![
                NavEvent::FocalNodeChanged { prev: Some(a), current: Some(b) },
                NavEvent::BoundaryReached(Edge::BranchEnd),
            ]
        );
        assert!(!tracker.is_open());
    }

    #[test]
    fn test_bus_delivers_until_unsubscribed() {
        let (a, _) = ids();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut bus = EventBus::default();
        let id = bus.subscribe(Box::new(move |event| sink.borrow_mut().push(*event)));

        bus.emit(NavEvent::InspectModeEntered(a));
        assert!(bus.unsubscribe(id));
        bus.emit(NavEvent::InspectModeExited(a));

        assert_eq!(seen.borrow().as_slice(), &[NavEvent::InspectModeEntered(a)]);
        assert!(!bus.unsubscribe(id));
    }
}
