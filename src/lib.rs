//! Transition metadata for visual trees.
//!
//! Decides, for every node of a tree, whether and how it takes part in an
//! animated transition between two screen states:
//!
//! - [`tree`] - arena visual tree with generational node ids
//! - [`state`] - per-node transition state (identifier, enabled, animations, alpha)
//! - [`animation`] - animation/transition instructions and the named timing curve catalog
//! - [`flatten`] - which nodes participate, in pre-order
//! - [`duration`] - recommended durations from the geometric distance traveled
//! - [`snapshot`] - rasterized proxies for nodes that cannot stay in the tree
//!
//! Playback, interpolation and screen choreography are left to the caller.
//!
//! ```
//! use guido_motion::prelude::*;
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(Node::plain().with_size(400.0, 300.0));
//! let card = tree.insert(Node::plain().with_position(20.0, 20.0).with_size(100.0, 50.0));
//! tree.add_child(root, card);
//! tree.set_motion_identifier(card, Some("card".into()));
//!
//! assert_eq!(flatten_hierarchy(&tree, root), vec![root, card]);
//!
//! let from = tree.geometry_snapshot(card).unwrap();
//! let to = GeometrySnapshot {
//!     position: Point::new(from.position.x + 300.0, from.position.y),
//!     ..from
//! };
//! let seconds = estimate_duration(&from, Some(&to));
//! assert!((seconds - 0.308).abs() < 1e-6);
//! ```

pub mod animation;
pub mod duration;
pub mod flatten;
pub mod geometry;
pub mod snapshot;
pub mod state;
pub mod transform;
pub mod tree;

pub mod prelude {
    pub use crate::animation::{
        AnimationSpec, TimingCurve, TimingFunctionKind, TransitionSpec, UnknownTimingFunction,
    };
    pub use crate::duration::{
        estimate_duration, DurationConfig, DurationEstimator, GeometrySnapshot,
    };
    pub use crate::flatten::{flatten_hierarchy, flatten_hierarchy_into};
    pub use crate::geometry::{Color, Point, Rect, Size};
    pub use crate::snapshot::{
        render_snapshot, snapshot_node, Snapshot, SnapshotConfig, SnapshotError,
    };
    pub use crate::state::TransitionState;
    pub use crate::transform::Transform;
    pub use crate::tree::{Node, NodeContent, NodeFlags, NodeId, NodeKind, Tree};
}
