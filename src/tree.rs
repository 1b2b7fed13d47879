//! Arena-based visual tree.
//!
//! The Tree owns every node that can take part in a transition, using a
//! sparse-set layout with generational indices:
//!
//! - **Generational Indices**: `NodeId` contains index + generation so a stale
//!   id never resolves to a node that was later allocated in the same slot.
//! - **Dense Storage**: nodes are stored contiguously; `node_count` and
//!   iteration never touch holes.
//! - **Sparse Map**: O(1) lookup from a stable `NodeId` to its dense slot.
//! - **Swap-Remove**: O(1) removal of a slot.
//! - **Attached State**: each slot carries the node's optional
//!   [`TransitionState`], so the record is found in O(1) and is dropped
//!   together with its node.

use std::sync::Arc;

use bitflags::bitflags;
use image::RgbaImage;

use crate::geometry::{Color, Point, Rect, Size};
use crate::state::TransitionState;
use crate::transform::Transform;

/// Unique identifier for a node in the tree.
///
/// - `index`: position in the sparse array (reusable after removal)
/// - `generation`: bumped every time the slot is reused
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// Closed classification of nodes.
///
/// Only the container kinds matter to hierarchy flattening: children of a
/// recycling list or a stack, and list cells themselves, have a `hidden`
/// state that reflects reuse bookkeeping rather than intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    /// Ordinary container or leaf
    #[default]
    Plain,
    /// Displays bitmap or vector content
    Image,
    /// Virtualized list that recycles its cells
    RecyclingList,
    /// Linear stack that hides children to collapse them
    Stack,
    /// A reusable cell of a recycling list
    ListCell,
}

impl NodeKind {
    /// Containers whose children's hidden flag is transient.
    pub fn is_managed_container(self) -> bool {
        matches!(self, NodeKind::RecyclingList | NodeKind::Stack)
    }

    pub fn is_recyclable_cell(self) -> bool {
        matches!(self, NodeKind::ListCell)
    }
}

bitflags! {
    /// Per-node boolean properties.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct NodeFlags: u8 {
        /// Not drawn; may also exclude the node from transitions
        const HIDDEN = 0b01;
        /// Fully covers its bounds, snapshots start from an opaque surface
        const OPAQUE = 0b10;
    }
}

/// What a node draws inside its own bounds, before its children.
#[derive(Clone, Debug, Default)]
pub enum NodeContent {
    #[default]
    None,
    /// Solid fill of the whole bounds
    Fill(Color),
    /// SVG document scaled to the bounds
    Svg(Arc<[u8]>),
    /// Straight-alpha bitmap scaled to the bounds
    Bitmap(Arc<RgbaImage>),
}

/// A visual node as supplied by the caller.
///
/// `position` is the top-left corner in parent coordinates. `transform` is
/// applied around the node's center, after positioning.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub flags: NodeFlags,
    pub position: Point,
    pub size: Size,
    pub transform: Transform,
    pub opacity: f32,
    pub content: NodeContent,
}

impl Node {
    /// Create a node of the given kind at the origin, with zero size, full opacity and no content
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            flags: NodeFlags::empty(),
            position: Point::ZERO,
            size: Size::zero(),
            transform: Transform::IDENTITY,
            opacity: 1.0,
            content: NodeContent::None,
        }
    }

    /// Create a `Plain` node
    pub fn plain() -> Self {
        Self::new(NodeKind::Plain)
    }

    /// Set position and size from a frame in parent coordinates
    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.position = frame.origin();
        self.size = frame.size();
        self
    }

    /// Set the top-left corner in parent coordinates
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Point::new(x, y);
        self
    }

    /// Set width and height in logical pixels
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Size::new(width, height);
        self
    }

    /// Set the transform applied around the node center
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the opacity, multiplied into every descendant when drawn
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Set what the node draws before its children
    pub fn with_content(mut self, content: NodeContent) -> Self {
        self.content = content;
        self
    }

    /// Fill the whole bounds with a solid color
    pub fn with_fill(self, color: Color) -> Self {
        self.with_content(NodeContent::Fill(color))
    }

    /// Mark the node hidden
    pub fn hidden(mut self) -> Self {
        self.flags.insert(NodeFlags::HIDDEN);
        self
    }

    /// Mark the node as fully covering its bounds
    pub fn opaque(mut self) -> Self {
        self.flags.insert(NodeFlags::OPAQUE);
        self
    }

    pub fn is_hidden(&self) -> bool {
        self.flags.contains(NodeFlags::HIDDEN)
    }

    /// Frame in parent coordinates, ignoring `transform`.
    pub fn frame(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Bounds in local coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }

    /// Maps local coordinates into the parent's coordinate space.
    pub fn local_transform(&self) -> Transform {
        let placement = Transform::translate(self.position.x, self.position.y);
        if self.transform.is_identity() {
            return placement;
        }
        let center = self.size.center();
        placement.then(&self.transform.center_at(center.x, center.y))
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::plain()
    }
}

struct SparseEntry {
    dense_index: usize,
    generation: u32,
}

/// A node in the arena plus its structural metadata.
pub(crate) struct Slot {
    pub(crate) node: Node,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Lazily allocated on first access
    pub(crate) transition: Option<Box<TransitionState>>,
    /// Back-pointer to sparse array index (for swap-remove fixup)
    sparse_index: u32,
}

/// Arena of visual nodes.
pub struct Tree {
    dense: Vec<Slot>,
    sparse: Vec<Option<SparseEntry>>,
    /// Generation to use the next time a free sparse index is reused
    free_indices: Vec<(u32, u32)>,
}

impl Tree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            sparse: Vec::new(),
            free_indices: Vec::new(),
        }
    }

    /// Store a detached node and return its id.
    pub fn insert(&mut self, node: Node) -> NodeId {
        let (sparse_index, generation) = match self.free_indices.pop() {
            Some(reused) => reused,
            None => {
                let idx = self.sparse.len() as u32;
                self.sparse.push(None);
                (idx, 0)
            }
        };

        let dense_index = self.dense.len();
        self.dense.push(Slot {
            node,
            parent: None,
            children: Vec::new(),
            transition: None,
            sparse_index,
        });
        self.sparse[sparse_index as usize] = Some(SparseEntry {
            dense_index,
            generation,
        });

        NodeId::new(sparse_index, generation)
    }

    /// Remove a node and its whole subtree.
    ///
    /// Every removed node's transition state is dropped with it. Stale or
    /// unknown ids are ignored.
    pub fn remove(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        self.detach(id);

        let mut pending = vec![id];
        let mut removed = 0usize;
        let mut released = 0usize;
        while let Some(current) = pending.pop() {
            if let Some(slot) = self.remove_slot(current) {
                pending.extend(slot.children.iter().copied());
                removed += 1;
                if slot.transition.is_some() {
                    released += 1;
                }
            }
        }
        log::debug!(
            "Removed {} node(s) under {:?}, released {} transition state(s)",
            removed,
            id,
            released
        );
    }

    /// Swap-remove a single slot without touching its relatives.
    fn remove_slot(&mut self, id: NodeId) -> Option<Slot> {
        let dense_index = self.get_dense_index(id)?;
        let last_dense_index = self.dense.len() - 1;
        let removed = self.dense.swap_remove(dense_index);

        if dense_index != last_dense_index {
            let moved_sparse_idx = self.dense[dense_index].sparse_index;
            if let Some(entry) = self.sparse[moved_sparse_idx as usize].as_mut() {
                entry.dense_index = dense_index;
            }
        }

        self.sparse[id.index as usize] = None;
        self.free_indices
            .push((id.index, id.generation.wrapping_add(1)));
        Some(removed)
    }

    fn get_dense_index(&self, id: NodeId) -> Option<usize> {
        self.sparse
            .get(id.index as usize)
            .and_then(|e| e.as_ref())
            .filter(|e| e.generation == id.generation)
            .map(|e| e.dense_index)
    }

    pub(crate) fn slot(&self, id: NodeId) -> Option<&Slot> {
        self.get_dense_index(id).map(|idx| &self.dense[idx])
    }

    pub(crate) fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot> {
        let idx = self.get_dense_index(id)?;
        Some(&mut self.dense[idx])
    }

    /// Check whether `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.get_dense_index(id).is_some()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slot(id).map(|slot| &slot.node)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slot_mut(id).map(|slot| &mut slot.node)
    }

    /// Append `child` to `parent`'s children, detaching it from any previous parent.
    ///
    /// Returns `false` (and changes nothing) if either id is stale or the
    /// move would create a cycle.
    ///
    /// Attaching a leaf is O(1). Attaching a node that has children walks
    /// `parent`'s ancestor chain to rule out a cycle, so it costs O(depth).
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(parent) || !self.contains(child) {
            return false;
        }
        let has_children = !self.children(child).is_empty();
        if child == parent || (has_children && self.is_ancestor_or_self(child, parent)) {
            log::warn!("Refusing to attach {:?} under its own descendant {:?}", child, parent);
            return false;
        }

        self.detach(child);
        if let Some(slot) = self.slot_mut(child) {
            slot.parent = Some(parent);
        }
        if let Some(slot) = self.slot_mut(parent) {
            slot.children.push(child);
        }
        true
    }

    /// Unlink a node from its parent, keeping its own subtree intact.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.slot_mut(id).and_then(|slot| slot.parent.take()) else {
            return;
        };
        if let Some(slot) = self.slot_mut(parent) {
            slot.children.retain(|&c| c != id);
        }
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).and_then(|slot| slot.parent)
    }

    /// Children in sibling order. Empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slot(id)
            .map(|slot| slot.children.as_slice())
            .unwrap_or(&[])
    }

    /// Kind of the node, `None` for unknown ids
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(|node| node.kind)
    }

    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.node(id).map(Node::is_hidden).unwrap_or(false)
    }

    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
        if let Some(node) = self.node_mut(id) {
            node.flags.set(NodeFlags::HIDDEN, hidden);
        }
    }

    /// Transform from this node's local space to root space.
    pub fn world_transform(&self, id: NodeId) -> Option<Transform> {
        let mut chain = vec![self.slot(id)?];
        while let Some(parent) = chain.last().and_then(|slot| slot.parent) {
            chain.push(self.slot(parent)?);
        }
        let world = chain
            .iter()
            .rev()
            .fold(Transform::IDENTITY, |world, slot| {
                world.then(&slot.node.local_transform())
            });
        Some(world)
    }

    /// The node's center in root coordinates.
    ///
    /// Like an anchor point, this is where the node sits in its parent and
    /// is unaffected by the node's own transform.
    pub fn global_position(&self, id: NodeId) -> Option<Point> {
        let node = self.node(id)?;
        let parent_world = match self.parent(id) {
            Some(parent) => self.world_transform(parent)?,
            None => Transform::IDENTITY,
        };
        Some(parent_world.transform_point(node.frame().center()))
    }

    /// Rotation of the node's own transform, in degrees.
    pub fn rotation_angle(&self, id: NodeId) -> Option<f32> {
        self.node(id).map(|node| node.transform.rotation_degrees())
    }

    /// Replace the node's transform with a pure rotation.
    pub fn set_rotation_angle(&mut self, id: NodeId, degrees: f32) {
        if let Some(node) = self.node_mut(id) {
            node.transform = Transform::rotate_degrees(degrees);
        }
    }

    pub fn scale_x(&self, id: NodeId) -> Option<f32> {
        self.node(id).map(|node| node.transform.scale_x())
    }

    pub fn scale_y(&self, id: NodeId) -> Option<f32> {
        self.node(id).map(|node| node.transform.scale_y())
    }

    /// Drop every node and every transition state.
    ///
    /// Ids handed out before the call stay invalid afterwards.
    pub fn clear(&mut self) {
        let live = self
            .sparse
            .iter_mut()
            .enumerate()
            .filter_map(|(index, entry)| {
                entry
                    .take()
                    .map(|e| (index as u32, e.generation.wrapping_add(1)))
            });
        self.free_indices.extend(live);
        self.dense.clear();
    }

    pub fn node_count(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
