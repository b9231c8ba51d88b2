// ABOUTME: Presentation-layer commands (close pane, flip divider) mapped onto tree operations.

use pane_core::Side;

use crate::error::LayoutError;
use crate::host::PaneHost;
use crate::node::{ContentId, NodeId};
use crate::panes::Panes;
use crate::tree::PaneTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneCommand {
    Close(ContentId),
    /// Close the first pane on one side of a divider
    CloseSide { split: NodeId, side: Side },
    FlipOrientation(NodeId),
}

impl<H: PaneHost> PaneTree<H> {
    pub fn execute(&mut self, command: PaneCommand) -> Result<(), LayoutError> {
        tracing::trace!("execute {:?}", command);
        match command {
            PaneCommand::Close(content) => {
                self.remove(content)?;
            }
            PaneCommand::CloseSide { split, side } => {
                let Some(node) = self.split(split) else {
                    return Ok(());
                };
                let start = node.child(side);
                let first = self.subtree_panes(start).next();
                if let Some(content) = first {
                    self.remove(content)?;
                }
            }
            PaneCommand::FlipOrientation(split) => {
                if let Some(node) = self.split(split) {
                    let flipped = node.orientation.flipped();
                    self.set_orientation(split, flipped)?;
                }
            }
        }
        Ok(())
    }

    fn subtree_panes(&self, start: NodeId) -> Panes<'_> {
        Panes::new(&self.nodes, Some(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;
    use crate::node::Shape;
    use pane_core::{LayoutSettings, Orientation, Position, Size};

    fn tree_abc() -> (PaneTree<RecordingHost>, ContentId, ContentId, ContentId) {
        let mut tree = PaneTree::new(RecordingHost::new(Size::new(800, 600)), LayoutSettings::default());
        let a = tree.issue_content_id();
        let b = tree.issue_content_id();
        let c = tree.issue_content_id();
        tree.add_first(a).unwrap();
        tree.add_near(b, Some(a), Position::Right, None, None).unwrap();
        tree.add_near(c, Some(b), Position::Bottom, None, None).unwrap();
        (tree, a, b, c)
    }

    #[test]
    fn close_side_removes_first_pane_of_subtree() {
        let (mut tree, a, b, c) = tree_abc();
        let root = tree.root().unwrap();
        tree.execute(PaneCommand::CloseSide {
            split: root,
            side: Side::Second,
        })
        .unwrap();
        assert!(!tree.contains(b));
        assert_eq!(tree.panes().collect::<Vec<_>>(), vec![a, c]);
    }

    #[test]
    fn flip_toggles_axis() {
        let (mut tree, _, b, _) = tree_abc();
        let inner = tree.split_of(b).unwrap();
        tree.execute(PaneCommand::FlipOrientation(inner)).unwrap();
        assert_eq!(tree.split(inner).unwrap().orientation, Orientation::Horizontal);
        tree.execute(PaneCommand::FlipOrientation(inner)).unwrap();
        assert_eq!(tree.split(inner).unwrap().orientation, Orientation::Vertical);
    }

    #[test]
    fn close_removes_named_pane() {
        let (mut tree, a, b, c) = tree_abc();
        tree.execute(PaneCommand::Close(a)).unwrap();
        tree.execute(PaneCommand::Close(c)).unwrap();
        assert_eq!(tree.shape(), Some(Shape::leaf(b)));
    }
}
