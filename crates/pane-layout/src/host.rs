// ABOUTME: Host-side hooks the layout engine drives: attach, detach, dividers, sizes.
// ABOUTME: Includes RecordingHost, a headless host that logs every call it receives.

use std::collections::HashMap;
use std::fmt;

use pane_core::{Orientation, Side, Size};

use crate::node::{ContentId, NodeId, Slot};

/// Host handle for a divider widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DividerId(pub u64);

impl fmt::Display for DividerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.0)
    }
}

/// Everything a host needs to configure a divider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DividerState {
    pub orientation: Orientation,
    pub min_size: i32,
    pub position: i32,
    pub width: i32,
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct HostError {
    message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Widget operations the engine needs from its presentation layer.
///
/// The engine calls these only after its own structure is already
/// updated. Errors are passed straight back to the engine's caller.
pub trait PaneHost {
    /// Place a content widget into a slot
    fn attach(&mut self, slot: Slot, content: ContentId) -> Result<(), HostError>;

    /// Take a content widget out of a slot
    fn detach(&mut self, slot: Slot, content: ContentId) -> Result<(), HostError>;

    /// Build the divider for `split`, filling `slot`. Its two regions are
    /// addressed afterwards as `Slot::Child { split, side }`.
    fn create_divider(
        &mut self,
        slot: Slot,
        split: NodeId,
        state: &DividerState,
    ) -> Result<DividerId, HostError>;

    fn destroy_divider(&mut self, divider: DividerId) -> Result<(), HostError>;

    /// Move an existing divider, with everything inside it, into another slot
    fn reparent_divider(&mut self, divider: DividerId, slot: Slot) -> Result<(), HostError>;

    /// Apply a new position or orientation to an existing divider
    fn update_divider(&mut self, divider: DividerId, state: &DividerState) -> Result<(), HostError>;

    fn query_size(&self, slot: Slot) -> Size;
}

/// A hook invocation seen by [`RecordingHost`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Attach(Slot, ContentId),
    Detach(Slot, ContentId),
    CreateDivider(Slot, NodeId, DividerState, DividerId),
    DestroyDivider(DividerId),
    ReparentDivider(DividerId, Slot),
    UpdateDivider(DividerId, DividerState),
}

#[derive(Debug, Clone, Copy)]
struct PlacedDivider {
    split: NodeId,
    slot: Slot,
    state: DividerState,
}

/// Headless host: records calls and tracks divider geometry.
///
/// The root slot has the root size. A split region gets its length along
/// the divider axis from the divider position; the divider width is not
/// subtracted. Explicit per-slot sizes override the computed ones.
#[derive(Debug, Default)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
    root_size: Size,
    sizes: HashMap<Slot, Size>,
    dividers: HashMap<DividerId, PlacedDivider>,
    next_divider: u64,
    fail_next: Option<String>,
}

impl RecordingHost {
    pub fn new(root_size: Size) -> Self {
        Self {
            root_size,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn set_root_size(&mut self, size: Size) {
        self.root_size = size;
    }

    pub fn set_size(&mut self, slot: Slot, size: Size) {
        self.sizes.insert(slot, size);
    }

    pub fn divider_count(&self) -> usize {
        self.dividers.len()
    }

    /// Last state the engine gave a divider
    pub fn divider(&self, divider: DividerId) -> Option<&DividerState> {
        self.dividers.get(&divider).map(|placed| &placed.state)
    }

    fn region_size(&self, slot: Slot, depth: usize) -> Size {
        if let Some(size) = self.sizes.get(&slot) {
            return *size;
        }
        let Slot::Child { split, side } = slot else {
            return self.root_size;
        };
        // Dividers form a tree, but a broken call sequence could loop
        let placed = self.dividers.values().find(|d| d.split == split);
        let Some(placed) = placed.filter(|_| depth < 256) else {
            return Size::default();
        };
        let outer = self.region_size(placed.slot, depth + 1);
        let extent = placed.state.orientation.extent(outer);
        let along = match side {
            Side::First => placed.state.position,
            Side::Second => extent - placed.state.position,
        }
        .max(0);
        match placed.state.orientation {
            Orientation::Horizontal => Size::new(along, outer.height),
            Orientation::Vertical => Size::new(outer.width, along),
        }
    }

    /// Make the next fallible hook fail with `message`
    pub fn fail_next(&mut self, message: impl Into<String>) {
        self.fail_next = Some(message.into());
    }

    fn check(&mut self) -> Result<(), HostError> {
        match self.fail_next.take() {
            Some(message) => Err(HostError::new(message)),
            None => Ok(()),
        }
    }
}

impl PaneHost for RecordingHost {
    fn attach(&mut self, slot: Slot, content: ContentId) -> Result<(), HostError> {
        self.check()?;
        self.calls.push(HostCall::Attach(slot, content));
        Ok(())
    }

    fn detach(&mut self, slot: Slot, content: ContentId) -> Result<(), HostError> {
        self.check()?;
        self.calls.push(HostCall::Detach(slot, content));
        Ok(())
    }

    fn create_divider(
        &mut self,
        slot: Slot,
        split: NodeId,
        state: &DividerState,
    ) -> Result<DividerId, HostError> {
        self.check()?;
        let id = DividerId(self.next_divider);
        self.next_divider += 1;
        self.dividers.insert(
            id,
            PlacedDivider {
                split,
                slot,
                state: *state,
            },
        );
        self.calls.push(HostCall::CreateDivider(slot, split, *state, id));
        Ok(id)
    }

    fn destroy_divider(&mut self, divider: DividerId) -> Result<(), HostError> {
        self.check()?;
        if self.dividers.remove(&divider).is_none() {
            return Err(HostError::new(format!("unknown divider {divider}")));
        }
        self.calls.push(HostCall::DestroyDivider(divider));
        Ok(())
    }

    fn reparent_divider(&mut self, divider: DividerId, slot: Slot) -> Result<(), HostError> {
        self.check()?;
        let placed = self
            .dividers
            .get_mut(&divider)
            .ok_or_else(|| HostError::new(format!("unknown divider {divider}")))?;
        placed.slot = slot;
        self.calls.push(HostCall::ReparentDivider(divider, slot));
        Ok(())
    }

    fn update_divider(&mut self, divider: DividerId, state: &DividerState) -> Result<(), HostError> {
        self.check()?;
        let placed = self
            .dividers
            .get_mut(&divider)
            .ok_or_else(|| HostError::new(format!("unknown divider {divider}")))?;
        placed.state = *state;
        self.calls.push(HostCall::UpdateDivider(divider, *state));
        Ok(())
    }

    fn query_size(&self, slot: Slot) -> Size {
        self.region_size(slot, 0)
    }
}
