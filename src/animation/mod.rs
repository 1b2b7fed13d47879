//! Animation and transition instructions attached to nodes.
//!
//! These are plain data: this crate stores them per node and hands them to
//! whatever engine plays them back. The only interpretation done here is
//! resolving named timing functions against the catalog.

mod timing;

use std::time::Duration;

pub use timing::{TimingCurve, TimingFunctionKind, UnknownTimingFunction};

use crate::geometry::{Color, Point, Size};
use crate::transform::Transform;

/// One step of an animation to run on a node.
#[derive(Clone, Debug, PartialEq)]
pub enum AnimationSpec {
    /// Wait before starting
    Delay(Duration),
    /// Total animation duration
    Duration(Duration),
    /// Easing curve for the steps that follow
    TimingFunction(TimingFunctionKind),
    /// Target opacity
    Opacity(f32),
    /// Target position in parent coordinates
    Position(Point),
    /// Target size
    Size(Size),
    /// Relative translation
    Translate { x: f32, y: f32 },
    /// Target scale factors
    Scale { x: f32, y: f32 },
    /// Target rotation in degrees
    Rotate(f32),
    /// Full target transform
    Transform(Transform),
    /// Target background fill
    BackgroundColor(Color),
}

impl AnimationSpec {
    /// A timing-function step built from a configuration name.
    ///
    /// Unknown names produce `None` so data-driven callers can drop the step
    /// or substitute their own curve.
    pub fn timing_function_named(name: &str) -> Option<Self> {
        TimingFunctionKind::from_name(name).map(AnimationSpec::TimingFunction)
    }

    pub fn scale(s: f32) -> Self {
        AnimationSpec::Scale { x: s, y: s }
    }

    pub fn translate(x: f32, y: f32) -> Self {
        AnimationSpec::Translate { x, y }
    }
}

/// An instruction that only applies while a node takes part in a
/// cross-screen transition.
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionSpec {
    /// Fade in or out
    Fade,
    /// Scale from or to this factor
    Scale(f32),
    /// Translate from or to this offset
    Translate { x: f32, y: f32 },
    /// Match geometry with the node carrying this identifier in the other tree
    Source(String),
    /// Substitute a rasterized snapshot for the live node
    UseSnapshot,
    /// Keep the node above everything else while transitioning
    ZPosition(f32),
    /// Run the transition with an explicit duration instead of the estimate
    Duration(Duration),
    /// Delay before the transition starts
    Delay(Duration),
    /// Easing curve for the transition
    TimingFunction(TimingFunctionKind),
    /// Animation steps to run during the transition
    Animations(Vec<AnimationSpec>),
}

impl TransitionSpec {
    pub fn timing_function_named(name: &str) -> Option<Self> {
        TimingFunctionKind::from_name(name).map(TransitionSpec::TimingFunction)
    }

    pub fn source(identifier: impl Into<String>) -> Self {
        TransitionSpec::Source(identifier.into())
    }
}

/// The curve in effect after all steps ran: the last timing-function step wins.
pub fn effective_timing(animations: &[AnimationSpec]) -> Option<&'static TimingCurve> {
    animations.iter().rev().find_map(|spec| match spec {
        AnimationSpec::TimingFunction(kind) => Some(kind.curve()),
        _ => None,
    })
}

/// The curve a set of transition instructions asks for, if any.
pub fn effective_transition_timing(transitions: &[TransitionSpec]) -> Option<&'static TimingCurve> {
    transitions.iter().rev().find_map(|spec| match spec {
        TransitionSpec::TimingFunction(kind) => Some(kind.curve()),
        TransitionSpec::Animations(steps) => effective_timing(steps),
        _ => None,
    })
}

/// An explicit duration requested by transition instructions, overriding the estimate.
pub fn explicit_transition_duration(transitions: &[TransitionSpec]) -> Option<Duration> {
    transitions.iter().rev().find_map(|spec| match spec {
        TransitionSpec::Duration(duration) => Some(*duration),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_timing_steps() {
        assert_eq!(
            AnimationSpec::timing_function_named("sharp"),
            Some(AnimationSpec::TimingFunction(TimingFunctionKind::Sharp))
        );
        assert_eq!(AnimationSpec::timing_function_named("SHARP"), None);
        assert_eq!(TransitionSpec::timing_function_named("nope"), None);
    }

    #[test]
    fn test_effective_timing_last_wins() {
        let steps = vec![
            AnimationSpec::TimingFunction(TimingFunctionKind::EaseIn),
            AnimationSpec::Opacity(0.0),
            AnimationSpec::TimingFunction(TimingFunctionKind::EaseOutBack),
            AnimationSpec::scale(1.2),
        ];
        let curve = effective_timing(&steps).unwrap();
        assert_eq!(curve.kind, TimingFunctionKind::EaseOutBack);

        assert!(effective_timing(&[AnimationSpec::Opacity(1.0)]).is_none());
    }

    #[test]
    fn test_transition_timing_looks_into_animations() {
        let transitions = vec![
            TransitionSpec::Fade,
            TransitionSpec::Animations(vec![AnimationSpec::TimingFunction(
                TimingFunctionKind::Deceleration,
            )]),
        ];
        let curve = effective_transition_timing(&transitions).unwrap();
        assert_eq!(curve.kind, TimingFunctionKind::Deceleration);
    }

    #[test]
    fn test_explicit_duration() {
        let transitions = vec![
            TransitionSpec::Duration(Duration::from_millis(100)),
            TransitionSpec::source("hero"),
            TransitionSpec::Duration(Duration::from_millis(250)),
        ];
        assert_eq!(
            explicit_transition_duration(&transitions),
            Some(Duration::from_millis(250))
        );
        assert_eq!(explicit_transition_duration(&[TransitionSpec::Fade]), None);
    }
}
