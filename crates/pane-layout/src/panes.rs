// ABOUTME: Lazy depth-first iterator over pane contents in visual reading order.

use std::collections::HashMap;

use crate::node::{ContentId, NodeId, NodeKind, NodeRecord};

/// Pane contents, first child before second. Clone it to restart.
#[derive(Debug, Clone)]
pub struct Panes<'a> {
    nodes: &'a HashMap<NodeId, NodeRecord>,
    stack: Vec<NodeId>,
}

impl<'a> Panes<'a> {
    pub(crate) fn new(nodes: &'a HashMap<NodeId, NodeRecord>, root: Option<NodeId>) -> Self {
        Self {
            nodes,
            stack: root.into_iter().collect(),
        }
    }
}

impl Iterator for Panes<'_> {
    type Item = ContentId;

    fn next(&mut self) -> Option<ContentId> {
        while let Some(id) = self.stack.pop() {
            match &self.nodes.get(&id)?.kind {
                NodeKind::Leaf { content } => return Some(*content),
                NodeKind::Split(split) => {
                    self.stack.push(split.second);
                    self.stack.push(split.first);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::host::RecordingHost;
    use crate::tree::PaneTree;
    use pane_core::{LayoutSettings, Position, Size};

    #[test]
    fn panes_follow_reading_order() {
        let mut tree = PaneTree::new(RecordingHost::new(Size::new(800, 600)), LayoutSettings::default());
        let a = tree.issue_content_id();
        let b = tree.issue_content_id();
        let c = tree.issue_content_id();
        tree.add_first(a).unwrap();
        tree.add_near(b, Some(a), Position::Right, None, None).unwrap();
        tree.add_near(c, Some(a), Position::Top, None, None).unwrap();

        let panes = tree.panes();
        assert_eq!(panes.clone().collect::<Vec<_>>(), vec![c, a, b]);
        // Restartable
        assert_eq!(panes.count(), 3);
        assert_eq!(tree.panes().next(), Some(c));
    }

    #[test]
    fn empty_tree_has_no_panes() {
        let tree = PaneTree::new(RecordingHost::default(), LayoutSettings::default());
        assert_eq!(tree.panes().next(), None);
    }
}
