// ABOUTME: Structural change notifications delivered to subscribed listeners.
// ABOUTME: Events are queued and drained in order so reentrant listeners stay safe.

use pane_core::Orientation;

use crate::node::ContentId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneEvent {
    PaneAdded(ContentId),
    PaneRemoved(ContentId),
    /// The last pane left; fired once per transition to empty
    AllPanesRemoved,
    /// `first`/`second` are set only when that child of the split is a pane
    SplitterPositionChanged {
        first: Option<ContentId>,
        second: Option<ContentId>,
        orientation: Orientation,
        position: i32,
    },
    SplitterOrientationChanged {
        first: Option<ContentId>,
        second: Option<ContentId>,
        orientation: Orientation,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);
