// ABOUTME: Split-pane tree: adds panes next to each other, collapses splits on removal.
// ABOUTME: Owns the node arena, the content registry, the host and event listeners.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use pane_core::{clamp_divider, LayoutSettings, Orientation, Position, Side, SizePolicy};

use crate::error::LayoutError;
use crate::event::{ListenerId, PaneEvent};
use crate::host::{DividerId, DividerState, PaneHost};
use crate::node::{ContentId, NodeId, NodeKind, NodeRecord, Shape, Slot, SplitNode};
use crate::panes::Panes;

pub type Listener<H> = Box<dyn FnMut(&mut PaneTree<H>, &PaneEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RegistryEntry {
    pub(crate) leaf: NodeId,
    /// Insertion order, used to find the most recently added pane
    pub(crate) sequence: u64,
}

/// Host-side effects of a removal, computed before the structure changes
enum Collapse {
    Emptied,
    Promoted {
        sibling: NodeId,
        from: Slot,
        to: Slot,
        dead_divider: Option<DividerId>,
    },
}

pub struct PaneTree<H> {
    host: H,
    settings: LayoutSettings,
    pub(crate) root: Option<NodeId>,
    pub(crate) nodes: HashMap<NodeId, NodeRecord>,
    pub(crate) registry: HashMap<ContentId, RegistryEntry>,
    pub(crate) dividers: HashMap<DividerId, NodeId>,
    next_node: u64,
    next_content: u64,
    next_sequence: u64,
    listeners: Vec<(ListenerId, Listener<H>)>,
    unsubscribed: HashSet<ListenerId>,
    next_listener: u64,
    pending: VecDeque<PaneEvent>,
    dispatching: bool,
}

impl<H: PaneHost> PaneTree<H> {
    pub fn new(host: H, settings: LayoutSettings) -> Self {
        Self {
            host,
            settings,
            root: None,
            nodes: HashMap::new(),
            registry: HashMap::new(),
            dividers: HashMap::new(),
            next_node: 0,
            next_content: 1,
            next_sequence: 0,
            listeners: Vec::new(),
            unsubscribed: HashSet::new(),
            next_listener: 0,
            pending: VecDeque::new(),
            dispatching: false,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    /// Issue a fresh identity for a content widget.
    ///
    /// Do not mix issued ids with `ContentId::from_raw` values in one tree.
    pub fn issue_content_id(&mut self) -> ContentId {
        let id = ContentId::from_raw(self.next_content);
        self.next_content += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn contains(&self, content: ContentId) -> bool {
        self.registry.contains_key(&content)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(&id)
    }

    pub fn split(&self, id: NodeId) -> Option<&SplitNode> {
        self.nodes.get(&id).and_then(NodeRecord::as_split)
    }

    fn split_mut(&mut self, id: NodeId) -> Option<&mut SplitNode> {
        self.nodes.get_mut(&id).and_then(|r| r.as_split_mut())
    }

    /// Leaf node holding `content`
    pub fn leaf_of(&self, content: ContentId) -> Option<NodeId> {
        self.registry.get(&content).map(|entry| entry.leaf)
    }

    /// Split directly enclosing `content`, if it is not the whole tree
    pub fn split_of(&self, content: ContentId) -> Option<NodeId> {
        let leaf = self.leaf_of(content)?;
        self.nodes.get(&leaf)?.parent
    }

    /// Split owning a host divider
    pub fn divider_split(&self, divider: DividerId) -> Option<NodeId> {
        self.dividers.get(&divider).copied()
    }

    /// Where a node currently sits, as the host sees it
    pub fn slot_of(&self, node: NodeId) -> Option<Slot> {
        let record = self.nodes.get(&node)?;
        match record.parent {
            None => Some(Slot::Root),
            Some(parent) => {
                let side = self.split(parent)?.side_of(node)?;
                Some(Slot::child(parent, side))
            }
        }
    }

    /// All pane contents, first-before-second depth first
    pub fn panes(&self) -> Panes<'_> {
        Panes::new(&self.nodes, self.root)
    }

    /// All split ids, parents before children
    pub fn splits(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            if let Some(split) = self.split(id) {
                out.push(id);
                stack.push(split.second);
                stack.push(split.first);
            }
        }
        out
    }

    /// Immediate child contents of a split; `None` on a side holding a split
    pub fn pair_of(&self, split: NodeId) -> (Option<ContentId>, Option<ContentId>) {
        let Some(node) = self.split(split) else {
            return (None, None);
        };
        let content = |id: NodeId| self.nodes.get(&id).and_then(NodeRecord::content);
        (content(node.first), content(node.second))
    }

    pub fn shape(&self) -> Option<Shape> {
        self.root.and_then(|root| self.shape_of(root))
    }

    fn shape_of(&self, id: NodeId) -> Option<Shape> {
        let record = self.nodes.get(&id)?;
        Some(match &record.kind {
            NodeKind::Leaf { content } => Shape::Leaf { content: *content },
            NodeKind::Split(split) => Shape::Split {
                orientation: split.orientation,
                position: split.divider_position,
                first: Box::new(self.shape_of(split.first)?),
                second: Box::new(self.shape_of(split.second)?),
            },
        })
    }

    /// Make `content` the only pane of an empty tree.
    ///
    /// On a non-empty tree the pane is appended next to the most recently
    /// added one at the configured fallback position.
    pub fn add_first(&mut self, content: ContentId) -> Result<(), LayoutError> {
        if self.root.is_some() {
            tracing::warn!("add_first({}) on a non-empty layout, appending instead", content);
            let position = self.settings.fallback_position;
            return self.add_near(content, None, position, None, None);
        }
        self.ensure_new(content)?;
        self.insert_root(content)
    }

    /// Insert `content` beside `near`, splitting the slot `near` occupies.
    ///
    /// An absent or unknown `near` falls back to the most recently added
    /// pane. Size hints are lengths along the split axis: `curr_size_hint`
    /// for the new pane, `prev_size_hint` for the existing one.
    pub fn add_near(
        &mut self,
        content: ContentId,
        near: Option<ContentId>,
        position: Position,
        prev_size_hint: Option<i32>,
        curr_size_hint: Option<i32>,
    ) -> Result<(), LayoutError> {
        self.ensure_new(content)?;

        let anchor = match near.filter(|id| self.registry.contains_key(id)) {
            Some(id) => id,
            None => match self.most_recent() {
                Some(last) => {
                    if let Some(unknown) = near {
                        tracing::warn!("Unknown neighbour {} for {}, using {}", unknown, content, last);
                    }
                    last
                }
                None => return self.insert_root(content),
            },
        };

        let near_leaf = self.leaf_of(anchor).ok_or_else(|| missing("registered leaf", anchor))?;
        let slot = self
            .slot_of(near_leaf)
            .ok_or_else(|| LayoutError::Invariant(format!("leaf {near_leaf} has no slot")))?;

        let orientation = position.orientation();
        let new_side = position.new_side();
        let extent = orientation.extent(self.host.query_size(slot));
        let min_size = self.settings.min_pane_size;
        let requested = match (curr_size_hint, prev_size_hint) {
            (Some(curr), _) => offset_from_start(new_side, curr, extent),
            (None, Some(prev)) => offset_from_start(new_side.other(), prev, extent),
            (None, None) => extent / 2,
        };
        let divider_position = clamp_divider(requested, min_size, extent);

        // Structure first: split takes over the neighbour's slot
        let split_id = self.alloc_id();
        let new_leaf = self.alloc_id();
        self.nodes.insert(new_leaf, NodeRecord::leaf(Some(split_id), content));
        let (first, second) = match new_side {
            Side::First => (new_leaf, near_leaf),
            Side::Second => (near_leaf, new_leaf),
        };
        self.nodes.insert(
            split_id,
            NodeRecord {
                parent: None,
                kind: NodeKind::Split(SplitNode {
                    orientation,
                    first,
                    second,
                    divider_position,
                    min_size,
                    size_policy: self.settings.size_policy,
                    extent,
                    divider: None,
                }),
            },
        );
        self.place(slot, split_id)?;
        if let Some(record) = self.nodes.get_mut(&near_leaf) {
            record.parent = Some(split_id);
        }
        self.register(content, new_leaf);
        self.debug_validate();

        let state = DividerState {
            orientation,
            min_size,
            position: divider_position,
            width: self.settings.divider_width,
        };
        tracing::trace!("detach {} from {:?}", anchor, slot);
        self.host.detach(slot, anchor)?;
        let divider = self.host.create_divider(slot, split_id, &state)?;
        if let Some(split) = self.split_mut(split_id) {
            split.divider = Some(divider);
        }
        self.dividers.insert(divider, split_id);
        self.host.attach(Slot::child(split_id, new_side.other()), anchor)?;
        self.host.attach(Slot::child(split_id, new_side), content)?;

        tracing::debug!(
            "Added pane {} {:?} of {} ({} split at {}), total panes: {}",
            content,
            position,
            anchor,
            orientation.label(),
            divider_position,
            self.len()
        );
        self.queue(PaneEvent::PaneAdded(content));
        self.flush_events();
        Ok(())
    }

    /// Remove a pane, collapsing its parent split into the sibling.
    ///
    /// Returns `false` for content that is not in the tree.
    pub fn remove(&mut self, content: ContentId) -> Result<bool, LayoutError> {
        let Some(leaf) = self.leaf_of(content) else {
            tracing::trace!("remove({}) ignored, not in layout", content);
            return Ok(false);
        };
        let leaf_slot = self
            .slot_of(leaf)
            .ok_or_else(|| LayoutError::Invariant(format!("leaf {leaf} has no slot")))?;

        let collapse = match leaf_slot {
            Slot::Root => {
                self.root = None;
                Collapse::Emptied
            }
            Slot::Child { split, side } => {
                let target = self
                    .slot_of(split)
                    .ok_or_else(|| LayoutError::Invariant(format!("split {split} has no slot")))?;
                let record = self
                    .nodes
                    .remove(&split)
                    .ok_or_else(|| LayoutError::Invariant(format!("split {split} missing")))?;
                let NodeKind::Split(dead) = record.kind else {
                    return Err(LayoutError::Invariant(format!("parent {split} is a leaf")));
                };
                let sibling = dead.child(side.other());
                self.place(target, sibling)?;
                if let Some(divider) = dead.divider {
                    self.dividers.remove(&divider);
                }
                Collapse::Promoted {
                    sibling,
                    from: Slot::child(split, side.other()),
                    to: target,
                    dead_divider: dead.divider,
                }
            }
        };
        self.nodes.remove(&leaf);
        self.registry.remove(&content);
        self.debug_validate();

        self.host.detach(leaf_slot, content)?;
        let emptied = match collapse {
            Collapse::Emptied => true,
            Collapse::Promoted {
                sibling,
                from,
                to,
                dead_divider,
            } => {
                let promoted = self
                    .nodes
                    .get(&sibling)
                    .map(|r| (r.content(), r.as_split().and_then(|s| s.divider)));
                match promoted {
                    Some((Some(moved), _)) => {
                        self.host.detach(from, moved)?;
                        self.host.attach(to, moved)?;
                    }
                    Some((None, Some(divider))) => {
                        self.host.reparent_divider(divider, to)?;
                    }
                    _ => {}
                }
                if let Some(divider) = dead_divider {
                    self.host.destroy_divider(divider)?;
                }
                // A promoted split now fills a larger region
                self.reflow(vec![sibling])?;
                self.debug_validate();
                false
            }
        };

        tracing::debug!("Removed pane {}, remaining panes: {}", content, self.len());
        self.queue(PaneEvent::PaneRemoved(content));
        if emptied {
            self.queue(PaneEvent::AllPanesRemoved);
        }
        self.flush_events();
        Ok(true)
    }

    /// Remove every pane whose widget the host no longer has
    pub fn prune<F>(&mut self, mut is_alive: F) -> Result<usize, LayoutError>
    where
        F: FnMut(ContentId) -> bool,
    {
        let dead: Vec<ContentId> = self.panes().filter(|id| !is_alive(*id)).collect();
        let mut removed = 0;
        for content in dead {
            if self.remove(content)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Move the divider of `split` to `new_position` on the caller's behalf.
    ///
    /// The host divider is updated whenever the stored position changes.
    pub fn notify_divider_moved(&mut self, split: NodeId, new_position: i32) -> Result<(), LayoutError> {
        self.move_divider(split, new_position, false)
    }

    /// Host entry point for a divider drag. The host already shows the
    /// dragged position, so it only hears back when clamping moved it.
    pub fn on_divider_dragged(&mut self, divider: DividerId, new_position: i32) -> Result<(), LayoutError> {
        match self.divider_split(divider) {
            Some(split) => self.move_divider(split, new_position, true),
            None => Ok(()),
        }
    }

    fn move_divider(&mut self, split: NodeId, new_position: i32, host_dragged: bool) -> Result<(), LayoutError> {
        let Some(node) = self.split(split) else {
            return Ok(());
        };
        let (orientation, min_size, old_position) = (node.orientation, node.min_size, node.divider_position);
        let slot = self
            .slot_of(split)
            .ok_or_else(|| LayoutError::Invariant(format!("split {split} has no slot")))?;
        let extent = orientation.extent(self.host.query_size(slot));
        let position = clamp_divider(new_position, min_size, extent);

        let Some(node) = self.split_mut(split) else {
            return Ok(());
        };
        node.divider_position = position;
        node.extent = extent;
        let (divider, first, second) = (node.divider, node.first, node.second);

        let host_stale = if host_dragged {
            position != new_position
        } else {
            position != old_position || position != new_position
        };
        if host_stale {
            if let Some(divider) = divider {
                let state = self.divider_state(split);
                self.host.update_divider(divider, &state)?;
            }
        }
        self.reflow(vec![second, first])?;
        self.debug_validate();

        let (first, second) = self.pair_of(split);
        tracing::debug!("Divider of {} moved to {} (asked {})", split, position, new_position);
        self.queue(PaneEvent::SplitterPositionChanged {
            first,
            second,
            orientation,
            position,
        });
        self.flush_events();
        Ok(())
    }

    /// Flip the divider axis of `split` without touching its children
    pub fn set_orientation(&mut self, split: NodeId, orientation: Orientation) -> Result<(), LayoutError> {
        let Some(node) = self.split(split) else {
            return Ok(());
        };
        if node.orientation == orientation {
            return Ok(());
        }
        let (old_position, old_extent, min_size) = (node.divider_position, node.extent, node.min_size);
        let slot = self
            .slot_of(split)
            .ok_or_else(|| LayoutError::Invariant(format!("split {split} has no slot")))?;
        let extent = orientation.extent(self.host.query_size(slot));
        let carried = SizePolicy::Proportional.carry(old_position, old_extent, extent);
        let position = clamp_divider(carried, min_size, extent);

        let Some(node) = self.split_mut(split) else {
            return Ok(());
        };
        node.orientation = orientation;
        node.divider_position = position;
        node.extent = extent;
        let (divider, first, second) = (node.divider, node.first, node.second);

        if let Some(divider) = divider {
            let state = self.divider_state(split);
            self.host.update_divider(divider, &state)?;
        }
        self.reflow(vec![second, first])?;
        self.debug_validate();

        let (first, second) = self.pair_of(split);
        tracing::debug!("Split {} is now {}", split, orientation.label());
        self.queue(PaneEvent::SplitterOrientationChanged {
            first,
            second,
            orientation,
        });
        self.flush_events();
        Ok(())
    }

    /// Re-read container sizes after a resize and move dividers per their policy
    pub fn relayout(&mut self) -> Result<(), LayoutError> {
        self.reflow(self.root.into_iter().collect())?;
        self.debug_validate();
        Ok(())
    }

    /// Carry every split under `start` to its current container size.
    /// Leaves in `start` are skipped. Emits no events.
    fn reflow(&mut self, start: Vec<NodeId>) -> Result<(), LayoutError> {
        let mut stack = start;
        while let Some(id) = stack.pop() {
            let Some(node) = self.split(id) else {
                continue;
            };
            let node = node.clone();
            let slot = self
                .slot_of(id)
                .ok_or_else(|| LayoutError::Invariant(format!("split {id} has no slot")))?;
            let extent = node.orientation.extent(self.host.query_size(slot));
            let carried = node.size_policy.carry(node.divider_position, node.extent, extent);
            let position = clamp_divider(carried, node.min_size, extent);

            if let Some(split) = self.split_mut(id) {
                split.divider_position = position;
                split.extent = extent;
            }
            if position != node.divider_position {
                if let Some(divider) = node.divider {
                    let state = self.divider_state(id);
                    self.host.update_divider(divider, &state)?;
                }
            }
            // Children see the updated parent geometry
            stack.push(node.second);
            stack.push(node.first);
        }
        Ok(())
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&mut PaneTree<H>, &PaneEvent) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.retain(|(listener, _)| *listener != id);
        if self.dispatching {
            self.unsubscribed.insert(id);
        }
    }

    fn queue(&mut self, event: PaneEvent) {
        self.pending.push_back(event);
    }

    /// Deliver queued events in order. A reentrant call only queues; the
    /// outermost caller keeps draining until the queue is empty.
    fn flush_events(&mut self) {
        if self.dispatching {
            return;
        }
        self.dispatching = true;
        while let Some(event) = self.pending.pop_front() {
            let mut active = std::mem::take(&mut self.listeners);
            for (id, listener) in active.iter_mut() {
                if !self.unsubscribed.contains(id) {
                    listener(self, &event);
                }
            }
            active.append(&mut self.listeners);
            let gone = std::mem::take(&mut self.unsubscribed);
            active.retain(|(id, _)| !gone.contains(id));
            self.listeners = active;
        }
        self.dispatching = false;
    }

    fn insert_root(&mut self, content: ContentId) -> Result<(), LayoutError> {
        let leaf = self.alloc_id();
        self.nodes.insert(leaf, NodeRecord::leaf(None, content));
        self.root = Some(leaf);
        self.register(content, leaf);
        self.debug_validate();

        self.host.attach(Slot::Root, content)?;
        tracing::debug!("Added first pane {}", content);
        self.queue(PaneEvent::PaneAdded(content));
        self.flush_events();
        Ok(())
    }

    fn ensure_new(&self, content: ContentId) -> Result<(), LayoutError> {
        if self.registry.contains_key(&content) {
            return Err(LayoutError::DuplicateContent(content));
        }
        Ok(())
    }

    fn most_recent(&self) -> Option<ContentId> {
        self.registry
            .iter()
            .max_by_key(|(_, entry)| entry.sequence)
            .map(|(content, _)| *content)
    }

    fn register(&mut self, content: ContentId, leaf: NodeId) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.registry.insert(content, RegistryEntry { leaf, sequence });
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    /// Put `node` into `slot`, fixing both the slot owner and the node's parent link
    fn place(&mut self, slot: Slot, node: NodeId) -> Result<(), LayoutError> {
        let parent = match slot {
            Slot::Root => {
                self.root = Some(node);
                None
            }
            Slot::Child { split, side } => {
                let owner = self
                    .split_mut(split)
                    .ok_or_else(|| LayoutError::Invariant(format!("slot owner {split} is not a split")))?;
                *owner.child_mut(side) = node;
                Some(split)
            }
        };
        let record = self
            .nodes
            .get_mut(&node)
            .ok_or_else(|| LayoutError::Invariant(format!("node {node} missing")))?;
        record.parent = parent;
        Ok(())
    }

    fn divider_state(&self, split: NodeId) -> DividerState {
        let node = self.split(split);
        DividerState {
            orientation: node.map_or(Orientation::Horizontal, |n| n.orientation),
            min_size: node.map_or(self.settings.min_pane_size, |n| n.min_size),
            position: node.map_or(0, |n| n.divider_position),
            width: self.settings.divider_width,
        }
    }

    fn debug_validate(&self) {
        if cfg!(debug_assertions) {
            if let Err(err) = self.check_invariants() {
                panic!("{err}");
            }
        }
    }
}

impl<H: PaneHost> fmt::Debug for PaneTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaneTree")
            .field("root", &self.root)
            .field("panes", &self.registry.len())
            .field("nodes", &self.nodes.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Divider offset from the start of the container that gives the pane on
/// `side` a length of `length`
fn offset_from_start(side: Side, length: i32, extent: i32) -> i32 {
    match side {
        Side::First => length,
        Side::Second => extent.saturating_sub(length),
    }
}

fn missing(what: &str, content: ContentId) -> LayoutError {
    LayoutError::Invariant(format!("{what} for {content} missing"))
}
