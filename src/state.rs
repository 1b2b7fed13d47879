//! Per-node transition state.
//!
//! Each node can carry a [`TransitionState`] describing how it takes part in
//! transitions. The record lives in the node's arena slot: it is created the
//! first time it is requested through [`Tree::transition_state`] or written,
//! and it is dropped when the node is removed. Reading a node that never had
//! a record yields the defaults without allocating one.

use crate::animation::{AnimationSpec, TransitionSpec};
use crate::flatten::flatten_hierarchy;
use crate::tree::{NodeId, Tree};

/// Transition configuration attached to a single node.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionState {
    /// Disabled nodes and their whole subtrees are left out of transitions.
    pub enabled: bool,
    /// Correlates this node with a node of another tree.
    /// Uniqueness is up to the caller.
    pub identifier: Option<String>,
    /// Animations to run on the node.
    pub animations: Option<Vec<AnimationSpec>>,
    /// Instructions that only apply during a cross-screen transition.
    pub transitions: Option<Vec<TransitionSpec>>,
    /// Opacity override.
    pub alpha: Option<f32>,
}

impl TransitionState {
    pub const DEFAULT: TransitionState = TransitionState {
        enabled: true,
        identifier: None,
        animations: None,
        transitions: None,
        alpha: Some(1.0),
    };
}

impl Default for TransitionState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

static DEFAULT_STATE: TransitionState = TransitionState::DEFAULT;

impl Tree {
    /// Get the node's transition state, creating the default record on first access.
    ///
    /// Returns `None` only if `id` is not in the tree.
    pub fn transition_state(&mut self, id: NodeId) -> Option<&mut TransitionState> {
        let slot = self.slot_mut(id)?;
        let state = slot.transition.get_or_insert_with(|| {
            log::trace!("Attaching transition state to {:?}", id);
            Box::default()
        });
        Some(&mut **state)
    }

    /// Read the node's transition state without allocating one.
    ///
    /// Nodes that never had a record read as [`TransitionState::DEFAULT`].
    pub fn peek_transition_state(&self, id: NodeId) -> Option<&TransitionState> {
        let slot = self.slot(id)?;
        Some(slot.transition.as_deref().unwrap_or(&DEFAULT_STATE))
    }

    /// Replace the node's whole record. Unknown ids are ignored.
    pub fn set_transition_state(&mut self, id: NodeId, state: TransitionState) {
        match self.slot_mut(id) {
            Some(slot) => slot.transition = Some(Box::new(state)),
            None => log::debug!("Ignoring transition state for unknown node {:?}", id),
        }
    }

    /// Whether a record has been attached to the node.
    pub fn has_transition_state(&self, id: NodeId) -> bool {
        self.slot(id)
            .map(|slot| slot.transition.is_some())
            .unwrap_or(false)
    }

    fn read_state(&self, id: NodeId) -> &TransitionState {
        self.peek_transition_state(id).unwrap_or(&DEFAULT_STATE)
    }

    fn update_state(&mut self, id: NodeId, f: impl FnOnce(&mut TransitionState)) {
        if let Some(state) = self.transition_state(id) {
            f(state);
        }
    }

    pub fn is_motion_enabled(&self, id: NodeId) -> bool {
        self.read_state(id).enabled
    }

    pub fn set_motion_enabled(&mut self, id: NodeId, enabled: bool) {
        self.update_state(id, |state| state.enabled = enabled);
    }

    pub fn motion_identifier(&self, id: NodeId) -> Option<&str> {
        self.read_state(id).identifier.as_deref()
    }

    pub fn set_motion_identifier(&mut self, id: NodeId, identifier: Option<String>) {
        self.update_state(id, |state| state.identifier = identifier);
    }

    pub fn motion_animations(&self, id: NodeId) -> Option<&[AnimationSpec]> {
        self.read_state(id).animations.as_deref()
    }

    pub fn set_motion_animations(&mut self, id: NodeId, animations: Option<Vec<AnimationSpec>>) {
        self.update_state(id, |state| state.animations = animations);
    }

    pub fn motion_transitions(&self, id: NodeId) -> Option<&[TransitionSpec]> {
        self.read_state(id).transitions.as_deref()
    }

    pub fn set_motion_transitions(
        &mut self,
        id: NodeId,
        transitions: Option<Vec<TransitionSpec>>,
    ) {
        self.update_state(id, |state| state.transitions = transitions);
    }

    pub fn motion_alpha(&self, id: NodeId) -> Option<f32> {
        self.read_state(id).alpha
    }

    pub fn set_motion_alpha(&mut self, id: NodeId, alpha: Option<f32>) {
        self.update_state(id, |state| state.alpha = alpha);
    }

    /// First participating node under `root` (pre-order) carrying `identifier`.
    pub fn find_by_identifier(&self, root: NodeId, identifier: &str) -> Option<NodeId> {
        flatten_hierarchy(self, root)
            .into_iter()
            .find(|&id| self.motion_identifier(id) == Some(identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::TimingFunctionKind;
    use crate::tree::Node;

    #[test]
    fn test_fresh_node_reads_defaults() {
        let mut tree = Tree::new();
        let id = tree.insert(Node::plain());

        assert!(tree.is_motion_enabled(id));
        assert_eq!(tree.motion_identifier(id), None);
        assert_eq!(tree.motion_animations(id), None);
        assert_eq!(tree.motion_transitions(id), None);
        assert_eq!(tree.motion_alpha(id), Some(1.0));
        assert!(!tree.has_transition_state(id));

        let state = tree.transition_state(id).unwrap().clone();
        assert_eq!(
            state,
            TransitionState {
                enabled: true,
                identifier: None,
                animations: None,
                transitions: None,
                alpha: Some(1.0),
            }
        );
        assert!(tree.has_transition_state(id));
    }

    #[test]
    fn test_get_or_init_keeps_one_record() {
        let mut tree = Tree::new();
        let id = tree.insert(Node::plain());

        tree.transition_state(id).unwrap().identifier = Some("card".into());
        // second access sees the first record, not a fresh default
        assert_eq!(
            tree.transition_state(id).unwrap().identifier.as_deref(),
            Some("card")
        );
    }

    #[test]
    fn test_field_setters() {
        let mut tree = Tree::new();
        let id = tree.insert(Node::plain());

        tree.set_motion_enabled(id, false);
        tree.set_motion_identifier(id, Some("avatar".into()));
        tree.set_motion_animations(
            id,
            Some(vec![AnimationSpec::TimingFunction(TimingFunctionKind::Sharp)]),
        );
        tree.set_motion_transitions(id, Some(vec![TransitionSpec::Fade]));
        tree.set_motion_alpha(id, Some(0.25));

        assert!(!tree.is_motion_enabled(id));
        assert_eq!(tree.motion_identifier(id), Some("avatar"));
        assert_eq!(tree.motion_animations(id).map(|a| a.len()), Some(1));
        assert_eq!(tree.motion_transitions(id), Some(&[TransitionSpec::Fade][..]));
        assert_eq!(tree.motion_alpha(id), Some(0.25));

        tree.set_motion_alpha(id, None);
        assert_eq!(tree.motion_alpha(id), None);
    }

    #[test]
    fn test_set_replaces_whole_record() {
        let mut tree = Tree::new();
        let id = tree.insert(Node::plain());
        tree.set_motion_identifier(id, Some("old".into()));
        tree.set_motion_alpha(id, Some(0.5));

        tree.set_transition_state(
            id,
            TransitionState {
                enabled: false,
                ..TransitionState::default()
            },
        );

        assert!(!tree.is_motion_enabled(id));
        assert_eq!(tree.motion_identifier(id), None);
        assert_eq!(tree.motion_alpha(id), Some(1.0));
    }

    #[test]
    fn test_state_released_with_node() {
        let mut tree = Tree::new();
        let id = tree.insert(Node::plain());
        tree.set_motion_identifier(id, Some("gone".into()));
        tree.remove(id);

        assert!(tree.peek_transition_state(id).is_none());
        assert!(tree.transition_state(id).is_none());

        // a recycled slot starts without a record
        let reused = tree.insert(Node::plain());
        assert!(!tree.has_transition_state(reused));
        assert_eq!(tree.motion_identifier(reused), None);
    }

    #[test]
    fn test_unknown_node_reads_defaults_and_ignores_writes() {
        let mut tree = Tree::new();
        let id = tree.insert(Node::plain());
        tree.remove(id);

        tree.set_motion_enabled(id, false);
        assert!(tree.is_motion_enabled(id));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_find_by_identifier() {
        let mut tree = Tree::new();
        let root = tree.insert(Node::plain());
        let a = tree.insert(Node::plain());
        let b = tree.insert(Node::plain());
        let disabled = tree.insert(Node::plain());
        tree.add_child(root, a);
        tree.add_child(root, disabled);
        tree.add_child(root, b);

        tree.set_motion_identifier(b, Some("hero".into()));
        tree.set_motion_identifier(disabled, Some("ghost".into()));
        tree.set_motion_enabled(disabled, false);

        assert_eq!(tree.find_by_identifier(root, "hero"), Some(b));
        assert_eq!(tree.find_by_identifier(root, "ghost"), None);
        assert_eq!(tree.find_by_identifier(root, "missing"), None);
    }
}
