//! Hierarchy flattening: which nodes take part in a transition.
//!
//! Walks the tree depth-first in pre-order (a node before its children,
//! children in sibling order). Before descending into a node:
//!
//! 1. a node with transitions disabled is dropped with its whole subtree;
//! 2. a hidden node is dropped with its subtree when its parent is a managed
//!    container or the node is a recyclable list cell;
//! 3. otherwise the node is emitted and its children are visited.
//!
//! Hidden nodes elsewhere in the tree still participate: they may be about
//! to fade in.

use crate::tree::{NodeId, NodeKind, Tree};

/// Why a node was left out of the flattened hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Transitions are disabled on the node
    Disabled,
    /// Hidden inside a recycling container, or a hidden list cell
    RecycledHidden,
}

/// Flatten the participating nodes under `root` (inclusive).
///
/// Unknown roots and disabled roots yield an empty list.
pub fn flatten_hierarchy(tree: &Tree, root: NodeId) -> Vec<NodeId> {
    let mut nodes = Vec::new();
    flatten_hierarchy_into(tree, root, &mut nodes);
    nodes
}

/// Flatten into an existing buffer (clears and reuses capacity).
pub fn flatten_hierarchy_into(tree: &Tree, root: NodeId, out: &mut Vec<NodeId>) {
    out.clear();
    if !tree.contains(root) {
        return;
    }
    let parent_kind = tree.parent(root).and_then(|parent| tree.kind(parent));
    flatten_node(tree, root, parent_kind, out);
    log::trace!("Flattened {} participating node(s) under {:?}", out.len(), root);
}

/// Check the exclusion rules for a single node, given its parent's kind.
pub fn exclusion(tree: &Tree, id: NodeId, parent_kind: Option<NodeKind>) -> Option<Exclusion> {
    if !tree.is_motion_enabled(id) {
        return Some(Exclusion::Disabled);
    }
    let node = tree.node(id)?;
    let recycled = parent_kind.is_some_and(NodeKind::is_managed_container)
        || node.kind.is_recyclable_cell();
    if node.is_hidden() && recycled {
        return Some(Exclusion::RecycledHidden);
    }
    None
}

fn flatten_node(tree: &Tree, root: NodeId, parent_kind: Option<NodeKind>, out: &mut Vec<NodeId>) {
    // (node, kind of its parent)
    let mut stack = vec![(root, parent_kind)];
    while let Some((id, parent_kind)) = stack.pop() {
        let Some(kind) = tree.kind(id) else {
            continue;
        };
        if let Some(reason) = exclusion(tree, id, parent_kind) {
            log::trace!("Pruning {:?}: {:?}", id, reason);
            continue;
        }

        out.push(id);
        // reversed so the first sibling is popped first
        stack.extend(tree.children(id).iter().rev().map(|&child| (child, Some(kind))));
    }
}
