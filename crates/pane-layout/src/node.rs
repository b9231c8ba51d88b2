// ABOUTME: Node model for the pane tree: leaves hold content, splits hold two children.
// ABOUTME: Nodes live in an arena keyed by NodeId; parents are stored as ids.

use std::fmt;

use pane_core::{Orientation, Side, SizePolicy};
use serde::Serialize;

use crate::host::DividerId;

/// Identity token for an externally owned content widget.
///
/// Two ids are equal only when they were issued for the same widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ContentId(u64);

impl ContentId {
    /// Wrap a host's own stable identifier
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Arena key for a node. Never reused within a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A container location the host can put a widget or divider into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The root container handed to the engine
    Root,
    /// One of the two regions of a split
    Child { split: NodeId, side: Side },
}

impl Slot {
    pub fn child(split: NodeId, side: Side) -> Self {
        Slot::Child { split, side }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitNode {
    pub orientation: Orientation,
    pub first: NodeId,
    pub second: NodeId,
    pub divider_position: i32,
    pub min_size: i32,
    pub size_policy: SizePolicy,
    /// Container length along the split axis when the position was last set
    pub extent: i32,
    /// Host divider, once the host has created it
    pub divider: Option<DividerId>,
}

impl SplitNode {
    pub fn child(&self, side: Side) -> NodeId {
        match side {
            Side::First => self.first,
            Side::Second => self.second,
        }
    }

    pub(crate) fn child_mut(&mut self, side: Side) -> &mut NodeId {
        match side {
            Side::First => &mut self.first,
            Side::Second => &mut self.second,
        }
    }

    pub fn side_of(&self, node: NodeId) -> Option<Side> {
        if self.first == node {
            Some(Side::First)
        } else if self.second == node {
            Some(Side::Second)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Leaf { content: ContentId },
    Split(SplitNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl NodeRecord {
    pub(crate) fn leaf(parent: Option<NodeId>, content: ContentId) -> Self {
        Self {
            parent,
            kind: NodeKind::Leaf { content },
        }
    }

    pub fn as_split(&self) -> Option<&SplitNode> {
        match &self.kind {
            NodeKind::Split(split) => Some(split),
            NodeKind::Leaf { .. } => None,
        }
    }

    pub(crate) fn as_split_mut(&mut self) -> Option<&mut SplitNode> {
        match &mut self.kind {
            NodeKind::Split(split) => Some(split),
            NodeKind::Leaf { .. } => None,
        }
    }

    pub fn content(&self) -> Option<ContentId> {
        match self.kind {
            NodeKind::Leaf { content } => Some(content),
            NodeKind::Split(_) => None,
        }
    }
}

/// Owned snapshot of the tree structure, for comparisons and dumps
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Leaf {
        content: ContentId,
    },
    Split {
        orientation: Orientation,
        position: i32,
        first: Box<Shape>,
        second: Box<Shape>,
    },
}

impl Shape {
    pub fn leaf(content: ContentId) -> Self {
        Shape::Leaf { content }
    }

    /// Compare structure and contents, ignoring divider positions
    pub fn same_layout(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Leaf { content: a }, Shape::Leaf { content: b }) => a == b,
            (
                Shape::Split {
                    orientation: oa,
                    first: fa,
                    second: sa,
                    ..
                },
                Shape::Split {
                    orientation: ob,
                    first: fb,
                    second: sb,
                    ..
                },
            ) => oa == ob && fa.same_layout(fb) && sa.same_layout(sb),
            _ => false,
        }
    }

    pub fn render(&self, names: &dyn Fn(ContentId) -> String) -> String {
        let mut out = String::new();
        render_into(self, names, 0, &mut out);
        out
    }
}

fn render_into(shape: &Shape, names: &dyn Fn(ContentId) -> String, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match shape {
        Shape::Leaf { content } => {
            out.push_str(&format!("{indent}{}\n", names(*content)));
        }
        Shape::Split {
            orientation,
            position,
            first,
            second,
        } => {
            out.push_str(&format!("{indent}split {} @{position}\n", orientation.label()));
            render_into(first, names, depth + 1, out);
            render_into(second, names, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(orientation: Orientation, first: Shape, second: Shape) -> Shape {
        Shape::Split {
            orientation,
            position: 0,
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    #[test]
    fn same_layout_ignores_positions() {
        let a = ContentId::from_raw(1);
        let b = ContentId::from_raw(2);
        let left = split(Orientation::Horizontal, Shape::leaf(a), Shape::leaf(b));
        let mut right = left.clone();
        if let Shape::Split { position, .. } = &mut right {
            *position = 300;
        }
        assert!(left.same_layout(&right));
        assert_ne!(left, right);
    }

    #[test]
    fn same_layout_checks_order_and_axis() {
        let a = ContentId::from_raw(1);
        let b = ContentId::from_raw(2);
        let ab = split(Orientation::Horizontal, Shape::leaf(a), Shape::leaf(b));
        let ba = split(Orientation::Horizontal, Shape::leaf(b), Shape::leaf(a));
        let ab_stacked = split(Orientation::Vertical, Shape::leaf(a), Shape::leaf(b));
        assert!(!ab.same_layout(&ba));
        assert!(!ab.same_layout(&ab_stacked));
    }

    #[test]
    fn render_indents_children() {
        let a = ContentId::from_raw(1);
        let b = ContentId::from_raw(2);
        let shape = split(Orientation::Vertical, Shape::leaf(a), Shape::leaf(b));
        let text = shape.render(&|id| format!("pane{}", id.raw()));
        assert_eq!(text, "split vertical @0\n  pane1\n  pane2\n");
    }
}
