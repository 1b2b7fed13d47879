//! Transition duration heuristic.
//!
//! The estimate grows linearly with how far a node travels between two
//! geometry states: `base + min(distance, cap) / rate`. With the default
//! configuration that is 0.208s for no movement and about 0.375s at or above
//! 500 points.
//!
//! "Distance" sums two terms:
//! - how far the node's origin moves, after applying each state's transform
//!   (translation baked into a transform counts as movement), and
//! - how far the bottom-right corner of the transformed size moves (growth,
//!   shrinking, scaling and rotation all count).

use std::time::Duration;

use crate::geometry::{Point, Size};
use crate::transform::Transform;
use crate::tree::{NodeId, Tree};

/// Where a node is, how big it is and how it is transformed at one moment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeometrySnapshot {
    pub position: Point,
    pub size: Size,
    pub transform: Transform,
}

impl GeometrySnapshot {
    pub fn new(position: Point, size: Size) -> Self {
        Self {
            position,
            size,
            transform: Transform::IDENTITY,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Origin mapped through the transform's planar part, plus position.
    fn real_position(&self) -> Point {
        self.transform.affine_part().transform_point(Point::ZERO) + self.position
    }

    /// Size mapped through the transform's linear part.
    fn real_size(&self) -> Size {
        self.transform.transform_size(self.size)
    }
}

/// Tuning for [`DurationEstimator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationConfig {
    /// Duration for zero movement, in seconds
    pub base_seconds: f64,
    /// Distances above this saturate
    pub max_distance: f32,
    /// Points of movement that add one second
    pub distance_per_second: f64,
}

impl DurationConfig {
    pub fn base_seconds(mut self, seconds: f64) -> Self {
        self.base_seconds = seconds;
        self
    }

    pub fn max_distance(mut self, distance: f32) -> Self {
        self.max_distance = distance;
        self
    }

    pub fn distance_per_second(mut self, rate: f64) -> Self {
        self.distance_per_second = rate;
        self
    }

    /// The duration reached once movement saturates.
    pub fn max_seconds(&self) -> f64 {
        self.base_seconds + self.max_distance.max(0.0) as f64 / self.distance_per_second
    }
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            base_seconds: 0.208,
            max_distance: 500.0,
            distance_per_second: 3000.0,
        }
    }
}

/// Maps geometric movement to a recommended transition duration.
#[derive(Debug, Clone, Default)]
pub struct DurationEstimator {
    config: DurationConfig,
}

impl DurationEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DurationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DurationConfig {
        &self.config
    }

    /// Distance traveled between two states. `to` defaults to `from`.
    pub fn move_distance(from: &GeometrySnapshot, to: Option<&GeometrySnapshot>) -> f32 {
        let to = to.unwrap_or(from);

        let position_delta = from.real_position().distance(to.real_position());
        let corner_delta = from
            .real_size()
            .bottom_right()
            .distance(to.real_size().bottom_right());

        position_delta + corner_delta
    }

    /// Seconds for an already computed distance.
    ///
    /// NaN distances count as no movement; infinite ones saturate.
    pub fn seconds_for_distance(&self, distance: f32) -> f64 {
        let cap = self.config.max_distance.max(0.0);
        let clamped = if distance.is_nan() {
            log::warn!("Non-finite geometry in duration estimate, assuming no movement");
            0.0
        } else {
            distance.clamp(0.0, cap)
        };
        if clamped == 0.0 {
            return self.config.base_seconds;
        }
        self.config.base_seconds + clamped as f64 / self.config.distance_per_second
    }

    /// Recommended duration in seconds for moving from `from` to `to`.
    pub fn estimate(&self, from: &GeometrySnapshot, to: Option<&GeometrySnapshot>) -> f64 {
        self.seconds_for_distance(Self::move_distance(from, to))
    }

    /// [`estimate`](Self::estimate) as a [`Duration`].
    ///
    /// Negative or NaN estimates become zero. Estimates too large for a
    /// `Duration` (for example with a zero `distance_per_second`) saturate
    /// at [`Duration::MAX`].
    pub fn estimate_duration(
        &self,
        from: &GeometrySnapshot,
        to: Option<&GeometrySnapshot>,
    ) -> Duration {
        let seconds = self.estimate(from, to).max(0.0);
        Duration::try_from_secs_f64(seconds).unwrap_or_else(|_| {
            log::warn!("Duration estimate of {} s is out of range, saturating", seconds);
            Duration::MAX
        })
    }
}

/// [`DurationEstimator::estimate`] with the default configuration.
pub fn estimate_duration(from: &GeometrySnapshot, to: Option<&GeometrySnapshot>) -> f64 {
    DurationEstimator::new().estimate(from, to)
}

impl Tree {
    /// The node's current geometry, with its position in root coordinates.
    pub fn geometry_snapshot(&self, id: NodeId) -> Option<GeometrySnapshot> {
        let node = self.node(id)?;
        Some(GeometrySnapshot {
            position: self.global_position(id)?,
            size: node.size,
            transform: node.transform,
        })
    }

    /// Estimate how long moving the node to a new state should take.
    ///
    /// The current state is read from the node; any target component left as
    /// `None` keeps the current value.
    pub fn optimized_duration(
        &self,
        id: NodeId,
        to_position: Option<Point>,
        to_size: Option<Size>,
        to_transform: Option<Transform>,
    ) -> Option<f64> {
        let from = self.geometry_snapshot(id)?;
        let to = GeometrySnapshot {
            position: to_position.unwrap_or(from.position),
            size: to_size.unwrap_or(from.size),
            transform: to_transform.unwrap_or(from.transform),
        };
        Some(estimate_duration(&from, Some(&to)))
    }
}
