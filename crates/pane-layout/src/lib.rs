// ABOUTME: Pane layout management: a split tree that grows and collapses as panes come and go.
// ABOUTME: Drives a host toolkit through the PaneHost trait and reports changes as events.

pub mod ancestry;
mod command;
mod error;
mod event;
mod host;
mod invariants;
mod node;
mod panes;
mod tree;

pub use command::PaneCommand;
pub use error::LayoutError;
pub use event::{ListenerId, PaneEvent};
pub use host::{DividerId, DividerState, HostCall, HostError, PaneHost, RecordingHost};
pub use node::{ContentId, NodeId, NodeKind, NodeRecord, Shape, Slot, SplitNode};
pub use panes::Panes;
pub use tree::{Listener, PaneTree};

pub use pane_core::{Orientation, Position, Side, Size, SizePolicy};
