// ABOUTME: Structural consistency check for the pane tree.
// ABOUTME: Verifies split arity, parent links, registry agreement and divider clamping.

use std::collections::HashSet;

use pane_core::clamp_divider;

use crate::error::LayoutError;
use crate::host::PaneHost;
use crate::node::{NodeId, NodeKind};
use crate::tree::PaneTree;

impl<H: PaneHost> PaneTree<H> {
    /// Walk the whole tree and report the first inconsistency found
    pub fn check_invariants(&self) -> Result<(), LayoutError> {
        let fail = |msg: String| Err(LayoutError::Invariant(msg));

        let Some(root) = self.root else {
            if !self.nodes.is_empty() || !self.registry.is_empty() || !self.dividers.is_empty() {
                return fail(format!(
                    "empty tree still holds {} nodes, {} panes, {} dividers",
                    self.nodes.len(),
                    self.registry.len(),
                    self.dividers.len()
                ));
            }
            return Ok(());
        };

        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut leaves = 0;
        let mut stack: Vec<(NodeId, Option<NodeId>)> = vec![(root, None)];
        while let Some((id, expected_parent)) = stack.pop() {
            if !seen.insert(id) {
                return fail(format!("node {id} is reachable twice"));
            }
            let Some(record) = self.nodes.get(&id) else {
                return fail(format!("node {id} is referenced but missing"));
            };
            if record.parent != expected_parent {
                return fail(format!(
                    "node {id} has parent {:?}, expected {:?}",
                    record.parent, expected_parent
                ));
            }
            match &record.kind {
                NodeKind::Leaf { content } => {
                    leaves += 1;
                    match self.registry.get(content) {
                        Some(entry) if entry.leaf == id => {}
                        Some(entry) => {
                            return fail(format!(
                                "{content} registered at {} but held by {id}",
                                entry.leaf
                            ))
                        }
                        None => return fail(format!("{content} in leaf {id} is not registered")),
                    }
                }
                NodeKind::Split(split) => {
                    if split.first == split.second {
                        return fail(format!("split {id} has the same child twice"));
                    }
                    let clamped = clamp_divider(split.divider_position, split.min_size, split.extent);
                    if clamped != split.divider_position {
                        return fail(format!(
                            "split {id} divider at {} outside its range (extent {}, min {})",
                            split.divider_position, split.extent, split.min_size
                        ));
                    }
                    if let Some(divider) = split.divider {
                        if self.dividers.get(&divider) != Some(&id) {
                            return fail(format!("divider {divider} of split {id} is not indexed"));
                        }
                    }
                    stack.push((split.second, Some(id)));
                    stack.push((split.first, Some(id)));
                }
            }
        }

        if seen.len() != self.nodes.len() {
            return fail(format!(
                "{} nodes stored but only {} reachable",
                self.nodes.len(),
                seen.len()
            ));
        }
        if leaves != self.registry.len() {
            return fail(format!(
                "{} leaves but {} registered panes",
                leaves,
                self.registry.len()
            ));
        }
        for (divider, split) in &self.dividers {
            if self.split(*split).and_then(|s| s.divider) != Some(*divider) {
                return fail(format!("divider {divider} points at stale split {split}"));
            }
        }
        Ok(())
    }
}
