#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use focal_tree::{ManualClock, NavEvent, Navigator, NavigatorConfig, NodeDefinition, NodeId};

/// Resolve an identifier that the fixture is known to contain
pub fn id(nav: &Navigator, name: &str) -> NodeId {
    nav.find_by_id(name)
        .unwrap_or_else(|| panic!("fixture has no node '{name}'"))
}

/// Single branch under the root with the given sibling sizes
pub fn branch(sizes: &[f64], active: usize) -> Navigator {
    let children = (0..sizes.len())
        .map(|i| NodeDefinition::leaf(format!("n{i}")))
        .collect();
    let root = NodeDefinition::new()
        .with_children(children)
        .with_active_child(active);
    let mut nav = Navigator::new(root, NavigatorConfig::default()).expect("valid fixture");
    for (i, &size) in sizes.iter().enumerate() {
        let node = id(&nav, &format!("n{i}"));
        nav.resize_node(node, size).expect("valid size");
    }
    nav
}

/// Three levels, three children per inner node
///
/// Identifiers are the index path joined by nothing: `a`, `b`, `c` at level
/// one, `a0`..`c2` at level two, `a00`..`c22` at level three.
pub fn grid_definition() -> NodeDefinition {
    let top = ["a", "b", "c"].map(|name| {
        let middle = (0..3)
            .map(|i| {
                let name = format!("{name}{i}");
                let leaves = (0..3)
                    .map(|j| NodeDefinition::leaf(format!("{name}{j}")))
                    .collect();
                NodeDefinition::leaf(name).with_children(leaves)
            })
            .collect();
        NodeDefinition::leaf(name).with_children(middle)
    });
    NodeDefinition::new().with_children(top.to_vec())
}

/// Grid with every node sized `node_size` and every branch `branch_size`
pub fn sized_grid(node_size: f64, branch_size: f64) -> (Navigator, ManualClock) {
    sized(grid_definition(), NavigatorConfig::default(), node_size, branch_size)
}

/// Build a navigator on a manual clock and report uniform geometry
pub fn sized(
    definition: NodeDefinition,
    config: NavigatorConfig,
    node_size: f64,
    branch_size: f64,
) -> (Navigator, ManualClock) {
    let clock = ManualClock::new();
    let mut nav = Navigator::with_clock(definition, config, clock.clone()).expect("valid fixture");
    let root = nav.root();
    size_subtree(&mut nav, root, node_size, branch_size);
    (nav, clock)
}

/// Report geometry for `origin` and everything below it
pub fn size_subtree(nav: &mut Navigator, origin: NodeId, node_size: f64, branch_size: f64) {
    let nodes: Vec<NodeId> = std::iter::once(origin)
        .chain(nav.tree().descendants(origin))
        .collect();
    for node in nodes {
        if node != nav.root() {
            nav.resize_node(node, node_size).expect("valid size");
        }
        if !nav.node(node).expect("live node").is_leaf() {
            nav.resize_branch(node, branch_size).expect("valid size");
        }
    }
}

/// Capture every event the navigator emits from now on
pub fn record(nav: &mut Navigator) -> Rc<RefCell<Vec<NavEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    nav.subscribe(move |event| sink.borrow_mut().push(*event));
    events
}

/// Identifiers along the active path
pub fn path_names(nav: &Navigator) -> Vec<String> {
    nav.active_path()
        .into_iter()
        .map(|node| nav.node(node).expect("live node").id().to_string())
        .collect()
}

/// Panic with every violation if the navigator is inconsistent
pub fn assert_consistent(nav: &Navigator) {
    let violations = nav.check_invariants();
    assert!(violations.is_empty(), "invariant violations: {violations:#?}");
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
