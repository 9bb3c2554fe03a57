//! Property tests: arbitrary operation sequences keep every invariant

mod common;

use common::*;
use focal_tree::{Axis, Navigator, NodeDefinition, NodeId};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    In(usize),
    Out(usize),
    Forward(usize),
    Back(usize),
    Jump(usize),
    ResizeNode(usize, f64),
    ResizeBranch(usize, f64),
    Pan { trunk: bool, delta: f64, velocity: f64 },
    Insert(usize, usize, usize),
    Remove(usize, usize),
    Inspect,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4).prop_map(Op::In),
        (0usize..4).prop_map(Op::Out),
        (0usize..4).prop_map(Op::Forward),
        (0usize..4).prop_map(Op::Back),
        any::<usize>().prop_map(Op::Jump),
        (any::<usize>(), 0.0f64..60.0).prop_map(|(n, s)| Op::ResizeNode(n, s)),
        (any::<usize>(), 0.0f64..200.0).prop_map(|(n, s)| Op::ResizeBranch(n, s)),
        (any::<bool>(), -300.0f64..300.0, -20.0f64..20.0)
            .prop_map(|(trunk, delta, velocity)| Op::Pan { trunk, delta, velocity }),
        (any::<usize>(), any::<usize>(), 1usize..3).prop_map(|(n, i, c)| Op::Insert(n, i, c)),
        (any::<usize>(), any::<usize>()).prop_map(|(n, i)| Op::Remove(n, i)),
        Just(Op::Inspect),
    ]
}

fn pick(nav: &Navigator, n: usize) -> NodeId {
    let nodes: Vec<NodeId> = nav.tree().descendants(nav.root()).collect();
    if nodes.is_empty() {
        nav.root()
    } else {
        nodes[n % nodes.len()]
    }
}

fn apply(nav: &mut Navigator, op: &Op, fresh: &mut usize) {
    match *op {
        Op::In(n) => nav.move_in(n),
        Op::Out(n) => nav.move_out(n),
        Op::Forward(n) => nav.move_forward(n),
        Op::Back(n) => nav.move_back(n),
        Op::Jump(n) => {
            let target = pick(nav, n);
            if target != nav.root() {
                nav.jump_to(target).expect("live node");
            }
        }
        Op::ResizeNode(n, size) => {
            let target = pick(nav, n);
            nav.resize_node(target, size).expect("valid size");
        }
        Op::ResizeBranch(n, size) => {
            let target = std::iter::once(nav.root())
                .chain(nav.tree().descendants(nav.root()))
                .filter(|&node| !nav.node(node).expect("live node").is_leaf())
                .nth(n % 4)
                .unwrap_or(nav.root());
            nav.resize_branch(target, size).expect("valid size");
        }
        Op::Pan { trunk, delta, velocity } => {
            let axis = if trunk { Axis::Trunk } else { Axis::Branch };
            if nav.pan_start(axis, None) {
                nav.pan_update(delta / 2.0);
                nav.pan_update(delta);
                nav.pan_end(velocity);
            }
        }
        Op::Insert(n, index, count) => {
            let parent = if n % 3 == 0 { nav.root() } else { pick(nav, n) };
            let len = nav.node(parent).expect("live node").children().len();
            let definitions: Vec<NodeDefinition> = (0..count)
                .map(|_| {
                    *fresh += 1;
                    NodeDefinition::leaf(format!("p{fresh}"))
                })
                .collect();
            nav.insert_children(parent, index % (len + 1), &definitions)
                .expect("fresh identifiers");
        }
        Op::Remove(n, index) => {
            let parent = if n % 3 == 0 { nav.root() } else { pick(nav, n) };
            let len = nav.node(parent).expect("live node").children().len();
            if len > 0 {
                nav.remove_children(parent, index % len, 1).expect("in range");
            }
        }
        Op::Inspect => nav.toggle_inspect_mode(),
    }
}

proptest! {
    #[test]
    fn operations_preserve_invariants(ops in proptest::collection::vec(op(), 1..40)) {
        let (mut nav, _clock) = sized_grid(20.0, 100.0);
        let mut fresh = 0;

        for op in &ops {
            apply(&mut nav, op, &mut fresh);
            let violations = nav.check_invariants();
            prop_assert!(violations.is_empty(), "after {:?}: {:#?}", op, violations);
            prop_assert_eq!(nav.pan_axis(), None);
        }
    }

    #[test]
    fn stepping_past_an_edge_changes_nothing(
        sizes in proptest::collection::vec(1.0f64..50.0, 1..6),
        extra in 1usize..5,
    ) {
        let last = sizes.len() - 1;
        let mut nav = branch(&sizes, last);
        let root = nav.root();
        let before = *nav.offsets(root).expect("root entry");

        for _ in 0..extra {
            nav.move_forward(1);
            prop_assert!(nav.boundary_flags().branch_end);
            prop_assert_eq!(*nav.offsets(root).expect("root entry"), before);
        }
    }

    #[test]
    fn released_pan_leaves_no_residual(
        sizes in proptest::collection::vec(1.0f64..50.0, 1..8),
        active in 0usize..8,
        delta in -400.0f64..400.0,
    ) {
        let mut nav = branch(&sizes, active % sizes.len());
        let root = nav.root();

        nav.pan_start(Axis::Branch, None);
        nav.pan_update(delta);
        let entry = *nav.offsets(root).expect("root entry");
        let flags = nav.boundary_flags();
        if flags.branch_start || flags.branch_end {
            prop_assert!(approx_eq(entry.child_branch_offset, entry.child_branch_offset_aligned));
        }
        nav.pan_end(0.0);

        let entry = *nav.offsets(root).expect("root entry");
        prop_assert_eq!(entry.child_branch_offset, entry.child_branch_offset_aligned);
        assert_consistent(&nav);
    }

    #[test]
    fn released_trunk_pan_leaves_no_residual(
        depth in 0usize..3,
        delta in -600.0f64..600.0,
    ) {
        let (mut nav, _clock) = sized_grid(20.0, 100.0);
        nav.move_in(depth);

        nav.pan_start(Axis::Trunk, None);
        nav.pan_update(delta);
        let flags = nav.boundary_flags();
        if flags.trunk_start || flags.trunk_end {
            prop_assert!(approx_eq(nav.trunk_offset(), nav.trunk_offset_aligned()));
        }
        nav.pan_end(0.0);

        prop_assert_eq!(nav.trunk_offset(), nav.trunk_offset_aligned());
        assert_consistent(&nav);
    }
}
