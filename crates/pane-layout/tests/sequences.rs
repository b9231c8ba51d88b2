// ABOUTME: Property tests driving the pane tree through random operation sequences.
// ABOUTME: Checks structure, registry, host dividers and empty notifications stay in step.

use std::cell::Cell;
use std::rc::Rc;

use pane_core::{clamp_divider, LayoutSettings};
use pane_layout::{
    ContentId, PaneCommand, PaneEvent, PaneHost, PaneTree, Position, RecordingHost, Size,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add {
        near: usize,
        position: usize,
        prev: Option<i32>,
        curr: Option<i32>,
    },
    Remove(usize),
    Drag {
        split: usize,
        position: i32,
    },
    Flip(usize),
    Resize {
        width: i32,
        height: i32,
    },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (
            0usize..12,
            0usize..4,
            proptest::option::of(0i32..1300),
            proptest::option::of(0i32..1300),
        )
            .prop_map(|(near, position, prev, curr)| Op::Add { near, position, prev, curr }),
        3 => (0usize..12).prop_map(Op::Remove),
        1 => (0usize..8, -100i32..1400).prop_map(|(split, position)| Op::Drag { split, position }),
        1 => (0usize..8).prop_map(Op::Flip),
        1 => (0i32..1600, 0i32..1200).prop_map(|(width, height)| Op::Resize { width, height }),
    ]
}

fn new_tree() -> PaneTree<RecordingHost> {
    PaneTree::new(RecordingHost::new(Size::new(1200, 900)), LayoutSettings::default())
}

/// First divider lying outside the container the host reports for it
fn misplaced_divider(tree: &PaneTree<RecordingHost>) -> Option<String> {
    tree.splits().into_iter().find_map(|id| {
        let node = tree.split(id)?;
        let slot = tree.slot_of(id)?;
        let extent = node.orientation.extent(tree.host().query_size(slot));
        let fitted = clamp_divider(node.divider_position, node.min_size, extent);
        let synced = node
            .divider
            .and_then(|divider| tree.host().divider(divider))
            .is_some_and(|state| state.position == node.divider_position);
        (fitted != node.divider_position || extent != node.extent || !synced).then(|| {
            format!(
                "split {id}: position {} extent {} but host container {extent}, host synced {synced}",
                node.divider_position, node.extent
            )
        })
    })
}

/// Out-of-range picks become an id the tree never issued
fn pick(live: &[ContentId], index: usize) -> ContentId {
    live.get(index).copied().unwrap_or(ContentId::from_raw(u64::MAX))
}

proptest! {
    #[test]
    fn invariants_hold_for_any_sequence(ops in proptest::collection::vec(op(), 1..60)) {
        let mut tree = new_tree();
        let emptied = Rc::new(Cell::new(0usize));
        let sink = emptied.clone();
        tree.subscribe(move |_, event| {
            if *event == PaneEvent::AllPanesRemoved {
                sink.set(sink.get() + 1);
            }
        });

        let mut live: Vec<ContentId> = Vec::new();
        let mut expected_empties = 0;
        for op in ops {
            match op {
                Op::Add { near, position, prev, curr } => {
                    let content = tree.issue_content_id();
                    let near = pick(&live, near);
                    tree.add_near(content, Some(near), Position::all()[position], prev, curr).unwrap();
                    live.push(content);
                }
                Op::Remove(index) => {
                    if live.is_empty() {
                        prop_assert!(!tree.remove(ContentId::from_raw(u64::MAX)).unwrap());
                        continue;
                    }
                    let content = live.remove(index % live.len());
                    prop_assert!(tree.remove(content).unwrap());
                    if live.is_empty() {
                        expected_empties += 1;
                    }
                }
                Op::Drag { split, position } => {
                    let splits = tree.splits();
                    if !splits.is_empty() {
                        tree.notify_divider_moved(splits[split % splits.len()], position).unwrap();
                    }
                }
                Op::Flip(split) => {
                    let splits = tree.splits();
                    if !splits.is_empty() {
                        tree.execute(PaneCommand::FlipOrientation(splits[split % splits.len()])).unwrap();
                    }
                }
                Op::Resize { width, height } => {
                    tree.host_mut().set_root_size(Size::new(width, height));
                    tree.relayout().unwrap();
                }
            }

            if let Err(err) = tree.check_invariants() {
                return Err(TestCaseError::fail(err.to_string()));
            }
            if let Some(err) = misplaced_divider(&tree) {
                return Err(TestCaseError::fail(err));
            }
            let mut held: Vec<ContentId> = tree.panes().collect();
            held.sort();
            let mut want = live.clone();
            want.sort();
            prop_assert_eq!(held, want);
            prop_assert_eq!(tree.splits().len(), live.len().saturating_sub(1));
            prop_assert_eq!(tree.host().divider_count(), tree.splits().len());
        }
        prop_assert_eq!(emptied.get(), expected_empties);
    }

    #[test]
    fn add_then_remove_restores_shape(
        setup in proptest::collection::vec((0usize..8, 0usize..4), 0..12),
        near in 0usize..12,
        position in 0usize..4,
        curr in proptest::option::of(0i32..1300),
    ) {
        let mut tree = new_tree();
        let mut live: Vec<ContentId> = Vec::new();
        for (index, side) in setup {
            let content = tree.issue_content_id();
            let anchor = live.get(index).copied();
            tree.add_near(content, anchor, Position::all()[side], None, None).unwrap();
            live.push(content);
        }
        let before = tree.shape();

        let extra = tree.issue_content_id();
        tree.add_near(extra, Some(pick(&live, near)), Position::all()[position], None, curr).unwrap();
        tree.remove(extra).unwrap();

        prop_assert_eq!(tree.shape(), before);
    }
}

#[test]
fn shape_dump_is_json() {
    let mut tree = new_tree();
    let a = tree.issue_content_id();
    let b = tree.issue_content_id();
    tree.add_first(a).unwrap();
    tree.add_near(b, Some(a), Position::Bottom, None, Some(300)).unwrap();

    let json = serde_json::to_value(tree.shape().unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "kind": "split",
            "orientation": "vertical",
            "position": 600,
            "first": { "kind": "leaf", "content": 1 },
            "second": { "kind": "leaf", "content": 2 },
        })
    );
}
