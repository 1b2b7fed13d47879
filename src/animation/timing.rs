//! Named timing curves (easing functions) for transitions.
//!
//! Every curve is a CSS-style cubic Bézier `(x1, y1, x2, y2)` with implicit
//! end points `(0, 0)` and `(1, 1)`. The set is closed: nine names, nine
//! [`TimingFunctionKind`] variants, one static table.
//!
//! ## Built-in Curves
//!
//! - [`TimingFunctionKind::Linear`], [`TimingFunctionKind::EaseIn`],
//!   [`TimingFunctionKind::EaseOut`], [`TimingFunctionKind::EaseInOut`] -
//!   the platform default curves
//! - [`TimingFunctionKind::Standard`], [`TimingFunctionKind::Deceleration`],
//!   [`TimingFunctionKind::Acceleration`], [`TimingFunctionKind::Sharp`] -
//!   Material motion curves
//! - [`TimingFunctionKind::EaseOutBack`] - overshooting ease-out
//!
//! ## Example
//!
//! ```
//! use guido_motion::animation::{TimingCurve, TimingFunctionKind};
//!
//! let curve = TimingCurve::from_name("standard").unwrap();
//! assert_eq!(curve.kind, TimingFunctionKind::Standard);
//! assert_eq!(curve.control_points(), (0.4, 0.0, 0.2, 1.0));
//!
//! assert!(TimingCurve::from_name("Standard").is_none());
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The closed set of named timing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingFunctionKind {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Standard,
    Deceleration,
    Acceleration,
    Sharp,
    EaseOutBack,
}

impl TimingFunctionKind {
    /// All kinds in catalog order.
    pub const ALL: [TimingFunctionKind; 9] = [
        TimingFunctionKind::Linear,
        TimingFunctionKind::EaseIn,
        TimingFunctionKind::EaseOut,
        TimingFunctionKind::EaseInOut,
        TimingFunctionKind::Standard,
        TimingFunctionKind::Deceleration,
        TimingFunctionKind::Acceleration,
        TimingFunctionKind::Sharp,
        TimingFunctionKind::EaseOutBack,
    ];

    /// The external (configuration) name of this curve.
    pub fn name(self) -> &'static str {
        match self {
            TimingFunctionKind::Linear => "linear",
            TimingFunctionKind::EaseIn => "easeIn",
            TimingFunctionKind::EaseOut => "easeOut",
            TimingFunctionKind::EaseInOut => "easeInOut",
            TimingFunctionKind::Standard => "standard",
            TimingFunctionKind::Deceleration => "deceleration",
            TimingFunctionKind::Acceleration => "acceleration",
            TimingFunctionKind::Sharp => "sharp",
            TimingFunctionKind::EaseOutBack => "easeOutBack",
        }
    }

    /// Exact, case-sensitive reverse of [`TimingFunctionKind::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "linear" => TimingFunctionKind::Linear,
            "easeIn" => TimingFunctionKind::EaseIn,
            "easeOut" => TimingFunctionKind::EaseOut,
            "easeInOut" => TimingFunctionKind::EaseInOut,
            "standard" => TimingFunctionKind::Standard,
            "deceleration" => TimingFunctionKind::Deceleration,
            "acceleration" => TimingFunctionKind::Acceleration,
            "sharp" => TimingFunctionKind::Sharp,
            "easeOutBack" => TimingFunctionKind::EaseOutBack,
            _ => return None,
        };
        Some(kind)
    }

    /// The curve this kind maps to.
    pub fn curve(self) -> &'static TimingCurve {
        TimingCurve::for_kind(self)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TimingFunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing a timing function name that is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown timing function: {0:?}")]
pub struct UnknownTimingFunction(pub String);

impl FromStr for TimingFunctionKind {
    type Err = UnknownTimingFunction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownTimingFunction(s.to_string()))
    }
}

/// A cubic Bézier easing curve from the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingCurve {
    pub kind: TimingFunctionKind,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

const fn curve(kind: TimingFunctionKind, x1: f32, y1: f32, x2: f32, y2: f32) -> TimingCurve {
    TimingCurve {
        kind,
        x1,
        y1,
        x2,
        y2,
    }
}

// Indexed by `TimingFunctionKind as usize`; order must follow the enum.
static CATALOG: [TimingCurve; 9] = [
    // platform defaults
    curve(TimingFunctionKind::Linear, 0.0, 0.0, 1.0, 1.0),
    curve(TimingFunctionKind::EaseIn, 0.42, 0.0, 1.0, 1.0),
    curve(TimingFunctionKind::EaseOut, 0.0, 0.0, 0.58, 1.0),
    curve(TimingFunctionKind::EaseInOut, 0.42, 0.0, 0.58, 1.0),
    // material
    curve(TimingFunctionKind::Standard, 0.4, 0.0, 0.2, 1.0),
    curve(TimingFunctionKind::Deceleration, 0.0, 0.0, 0.2, 1.0),
    curve(TimingFunctionKind::Acceleration, 0.4, 0.0, 1.0, 1.0),
    curve(TimingFunctionKind::Sharp, 0.4, 0.0, 0.6, 1.0),
    // easings.net
    curve(TimingFunctionKind::EaseOutBack, 0.175, 0.885, 0.32, 1.75),
];

impl TimingCurve {
    /// Look up a curve by its configuration name.
    ///
    /// Returns `None` for anything that is not exactly one of the nine names;
    /// callers pick their own fallback.
    pub fn from_name(name: &str) -> Option<&'static TimingCurve> {
        TimingFunctionKind::from_name(name).map(Self::for_kind)
    }

    pub fn for_kind(kind: TimingFunctionKind) -> &'static TimingCurve {
        &CATALOG[kind.index()]
    }

    /// The whole catalog, in [`TimingFunctionKind::ALL`] order.
    pub fn catalog() -> &'static [TimingCurve] {
        &CATALOG
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// `(x1, y1, x2, y2)`
    pub fn control_points(&self) -> (f32, f32, f32, f32) {
        (self.x1, self.y1, self.x2, self.y2)
    }
}

impl Default for TimingCurve {
    fn default() -> Self {
        *Self::for_kind(TimingFunctionKind::Linear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_control_points() {
        let expected = [
            (TimingFunctionKind::Linear, (0.0, 0.0, 1.0, 1.0)),
            (TimingFunctionKind::EaseIn, (0.42, 0.0, 1.0, 1.0)),
            (TimingFunctionKind::EaseOut, (0.0, 0.0, 0.58, 1.0)),
            (TimingFunctionKind::EaseInOut, (0.42, 0.0, 0.58, 1.0)),
            (TimingFunctionKind::Standard, (0.4, 0.0, 0.2, 1.0)),
            (TimingFunctionKind::Deceleration, (0.0, 0.0, 0.2, 1.0)),
            (TimingFunctionKind::Acceleration, (0.4, 0.0, 1.0, 1.0)),
            (TimingFunctionKind::Sharp, (0.4, 0.0, 0.6, 1.0)),
            (TimingFunctionKind::EaseOutBack, (0.175, 0.885, 0.32, 1.75)),
        ];
        for (kind, points) in expected {
            let curve = TimingCurve::for_kind(kind);
            assert_eq!(curve.kind, kind);
            assert_eq!(curve.control_points(), points, "{kind}");
        }
    }

    #[test]
    fn test_table_order_matches_enum() {
        assert_eq!(TimingCurve::catalog().len(), TimingFunctionKind::ALL.len());
        for (curve, kind) in TimingCurve::catalog().iter().zip(TimingFunctionKind::ALL) {
            assert_eq!(curve.kind, kind);
        }
    }

    #[test]
    fn test_name_round_trip() {
        for kind in TimingFunctionKind::ALL {
            let curve = TimingCurve::from_name(kind.name()).expect("catalog name");
            assert_eq!(curve.kind, kind);
            assert_eq!(kind.name().parse::<TimingFunctionKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn test_unknown_names() {
        for name in ["bogus", "", "Linear", "ease_in", "easein", " linear", "linear "] {
            assert!(TimingCurve::from_name(name).is_none(), "{name:?}");
        }
        assert_eq!(
            "Sharp".parse::<TimingFunctionKind>(),
            Err(UnknownTimingFunction("Sharp".to_string()))
        );
    }

    #[test]
    fn test_kind_curve_shortcut() {
        assert!(std::ptr::eq(
            TimingFunctionKind::Sharp.curve(),
            TimingCurve::for_kind(TimingFunctionKind::Sharp)
        ));
    }
}
