//! Contains the [`Easing`] enum which names the standard easings available to style tweens, as
//! well as an [`EasingFunction`] trait for defining custom easings.

use dyn_clone::{clone_trait_object, DynClone};
use enum_map::{enum_map, Enum, EnumMap};
use lazy_static::lazy_static;
use lyon_geom::{CubicBezierSegment, Point};
use std::fmt::{self, Debug};
use std::str::FromStr;
use thiserror::Error;

/// Provides an easing function, AKA animation timing function, for non-linear interpolation of
/// values.
///
/// Easing functions and [`Lerp`](crate::interpolation::Lerp) are complementary. `Lerp` determines
/// the value of a property at a given `x`, and the easing function decides which `x` the lerp will
/// see for a given point in time.
pub trait EasingFunction: Debug + DynClone {
    /// Computes the `y` value along the curve for a given `x` position.
    ///
    /// Expects `x` to be normalized (from 0 to 1) and returns a normalized y-value which is
    /// typically between 0 and 1, but may be outside that range (e.g. [EasingName::BackOut]).
    fn calc(&self, x: f32) -> f32;
}

clone_trait_object!(EasingFunction);

/// Names of the predefined easing curves.
///
/// The set is fixed; anything that does not parse to one of these names is treated as
/// [`Linear`](EasingName::Linear) by [`Easing::named`].
#[derive(Clone, Copy, Debug, Enum, Eq, Hash, PartialEq)]
pub enum EasingName {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    CircIn,
    CircOut,
    CircInOut,
    BackIn,
    BackOut,
    BackInOut,
    Anticipate,
    BounceIn,
    BounceOut,
    BounceInOut,
}

impl EasingName {
    /// Iterates every predefined easing, in declaration order.
    pub fn all() -> impl Iterator<Item = EasingName> {
        (0..<EasingName as Enum>::LENGTH).map(<EasingName as Enum>::from_usize)
    }

    /// The identifier used in declarative definitions, e.g. `"circInOut"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "easeIn",
            Self::EaseOut => "easeOut",
            Self::EaseInOut => "easeInOut",
            Self::CircIn => "circIn",
            Self::CircOut => "circOut",
            Self::CircInOut => "circInOut",
            Self::BackIn => "backIn",
            Self::BackOut => "backOut",
            Self::BackInOut => "backInOut",
            Self::Anticipate => "anticipate",
            Self::BounceIn => "bounceIn",
            Self::BounceOut => "bounceOut",
            Self::BounceInOut => "bounceInOut",
        }
    }
}

impl fmt::Display for EasingName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a string that is not one of the predefined easing names.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown easing '{0}'")]
pub struct UnknownEasing(pub String);

impl FromStr for EasingName {
    type Err = UnknownEasing;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EasingName::all()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownEasing(s.to_string()))
    }
}

/// Specifies a predefined or custom [`EasingFunction`].
///
/// Predefined curves follow the classic tweening set: power-2 `ease*`, circular `circ*`, the
/// overshooting `back*` family with `anticipate`, and `bounce*`. Any other curve, such as an
/// ad-hoc [`CubicBezierEasing`], can be supplied via [`Custom`](Easing::Custom) and is used
/// unchanged.
#[derive(Clone, Debug)]
pub enum Easing {
    /// One of the fixed, named curves.
    Named(EasingName),
    /// User-defined easing.
    Custom(Box<dyn EasingFunction>),
}

impl Default for Easing {
    fn default() -> Self {
        Self::Named(EasingName::Linear)
    }
}

impl From<EasingName> for Easing {
    fn from(value: EasingName) -> Self {
        Self::Named(value)
    }
}

impl Easing {
    pub const LINEAR: Easing = Easing::Named(EasingName::Linear);

    /// Resolves an easing by name, falling back to linear easing if the name is not recognized.
    pub fn named(name: &str) -> Self {
        match name.parse::<EasingName>() {
            Ok(name) => Self::Named(name),
            Err(err) => {
                tracing::warn!(easing = name, "{err}; falling back to linear");
                Self::LINEAR
            }
        }
    }

    /// Resolves an optional easing, where an absent easing means linear.
    pub fn resolve(easing: Option<&Easing>) -> Easing {
        easing.cloned().unwrap_or_default()
    }

    /// Wraps a custom easing function.
    pub fn custom(function: impl EasingFunction + 'static) -> Self {
        Self::Custom(Box::new(function))
    }

    /// Gets the name of a predefined easing, or `None` for custom easings.
    pub fn name(&self) -> Option<EasingName> {
        match self {
            Self::Named(name) => Some(*name),
            Self::Custom(_) => None,
        }
    }
}

impl EasingFunction for Easing {
    fn calc(&self, x: f32) -> f32 {
        match self {
            Self::Named(name) => EASINGS[*name](x),
            Self::Custom(custom) => custom.calc(x),
        }
    }
}

lazy_static! {
    static ref EASINGS: EnumMap<EasingName, fn(f32) -> f32> = enum_map! {
        EasingName::Linear => linear,
        EasingName::EaseIn => ease_in,
        EasingName::EaseOut => ease_out,
        EasingName::EaseInOut => ease_in_out,
        EasingName::CircIn => circ_in,
        EasingName::CircOut => circ_out,
        EasingName::CircInOut => circ_in_out,
        EasingName::BackIn => back_in,
        EasingName::BackOut => back_out,
        EasingName::BackInOut => back_in_out,
        EasingName::Anticipate => anticipate,
        EasingName::BounceIn => bounce_in,
        EasingName::BounceOut => bounce_out,
        EasingName::BounceInOut => bounce_in_out,
    };
}

const BACK_POWER: f32 = 1.525;

fn linear(x: f32) -> f32 {
    x
}

fn reversed(f: fn(f32) -> f32, x: f32) -> f32 {
    1.0 - f(1.0 - x)
}

fn mirrored(f: fn(f32) -> f32, x: f32) -> f32 {
    if x <= 0.5 {
        f(2.0 * x) / 2.0
    } else {
        (2.0 - f(2.0 * (1.0 - x))) / 2.0
    }
}

fn ease_in(x: f32) -> f32 {
    x * x
}

fn ease_out(x: f32) -> f32 {
    reversed(ease_in, x)
}

fn ease_in_out(x: f32) -> f32 {
    mirrored(ease_in, x)
}

fn circ_in(x: f32) -> f32 {
    1.0 - (1.0 - x * x).max(0.0).sqrt()
}

fn circ_out(x: f32) -> f32 {
    reversed(circ_in, x)
}

fn circ_in_out(x: f32) -> f32 {
    mirrored(circ_in, x)
}

fn back_in(x: f32) -> f32 {
    x * x * ((BACK_POWER + 1.0) * x - BACK_POWER)
}

fn back_out(x: f32) -> f32 {
    reversed(back_in, x)
}

fn back_in_out(x: f32) -> f32 {
    mirrored(back_in, x)
}

fn anticipate(x: f32) -> f32 {
    let x = x * 2.0;
    if x < 1.0 {
        0.5 * back_in(x)
    } else {
        0.5 * (2.0 - 2f32.powf(-10.0 * (x - 1.0)))
    }
}

fn bounce_out(x: f32) -> f32 {
    const FIRST: f32 = 4.0 / 11.0;
    const SECOND: f32 = 8.0 / 11.0;
    const THIRD: f32 = 9.0 / 10.0;
    const CA: f32 = 4356.0 / 361.0;
    const CB: f32 = 35442.0 / 1805.0;
    const CC: f32 = 16061.0 / 1805.0;

    if x == 0.0 || x == 1.0 {
        return x;
    }
    let x2 = x * x;
    if x < FIRST {
        7.5625 * x2
    } else if x < SECOND {
        9.075 * x2 - 9.9 * x + 3.4
    } else if x < THIRD {
        CA * x2 - CB * x + CC
    } else {
        10.8 * x2 - 20.52 * x + 10.72
    }
}

fn bounce_in(x: f32) -> f32 {
    reversed(bounce_out, x)
}

fn bounce_in_out(x: f32) -> f32 {
    if x < 0.5 {
        0.5 * (1.0 - bounce_out(1.0 - x * 2.0))
    } else {
        0.5 * bounce_out(x * 2.0 - 1.0) + 0.5
    }
}

/// Easing backed by a plain function pointer.
#[derive(Clone, Copy)]
pub struct FnEasing(pub fn(f32) -> f32);

impl Debug for FnEasing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnEasing")
    }
}

impl EasingFunction for FnEasing {
    fn calc(&self, x: f32) -> f32 {
        (self.0)(x)
    }
}

/// Easing function defined by a cubic bezier curve with the start and end points fixed at `(0, 0)`
/// and `(1, 1)`, i.e. only the control points are specified. Equivalent to CSS `cubic-bezier()`.
#[derive(Clone, Debug)]
pub struct CubicBezierEasing {
    segment: CubicBezierSegment<f32>,
}

impl CubicBezierEasing {
    /// Creates a new [CubicBezierEasing] with control points `(x1, y1)` and `(x2, y2)`.
    ///
    /// To experiment with different curves, see: <https://cubic-bezier.com/>
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            segment: CubicBezierSegment {
                from: Point::new(0.0, 0.0),
                to: Point::new(1.0, 1.0),
                ctrl1: Point::new(x1.clamp(0.0, 1.0), y1),
                ctrl2: Point::new(x2.clamp(0.0, 1.0), y2),
            },
        }
    }

    // The curve is parameterized by `t`, not by `x`, so the parameter for the requested `x` has to
    // be found first. Newton's method converges in a few steps for sane control points; bisection
    // covers the flat spots where the derivative vanishes.
    fn solve_t(&self, x: f32) -> f32 {
        let mut t = x;
        for _ in 0..8 {
            let error = self.segment.x(t) - x;
            if error.abs() < 1e-6 {
                return t;
            }
            let slope = self.segment.dx(t);
            if slope.abs() < 1e-6 {
                break;
            }
            t -= error / slope;
        }
        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        t = x;
        for _ in 0..32 {
            let value = self.segment.x(t);
            if (value - x).abs() < 1e-6 {
                break;
            }
            if value < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }
}

impl EasingFunction for CubicBezierEasing {
    fn calc(&self, x: f32) -> f32 {
        if x <= 0.0 || x >= 1.0 {
            return x;
        }
        self.segment.y(self.solve_t(x))
    }
}

// Definitions store easings by name. Unknown names resolve to linear, like `Easing::named`.
#[cfg(feature = "serde")]
impl serde::Serialize for Easing {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Named(name) => serializer.serialize_str(name.as_str()),
            Self::Custom(_) => Err(serde::ser::Error::custom(
                "custom easing functions cannot be serialized",
            )),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Easing {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = <String as serde::Deserialize>::deserialize(deserializer)?;
        Ok(Self::named(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn every_named_easing_starts_at_zero_and_ends_at_one() {
        for name in EasingName::all() {
            let easing = Easing::from(name);
            assert_relative_eq!(easing.calc(0.0), 0.0, epsilon = 1e-3);
            // `anticipate` settles exponentially and lands a hair short of 1.
            assert_relative_eq!(easing.calc(1.0), 1.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn names_round_trip_through_parse() {
        for name in EasingName::all() {
            assert_eq!(name.as_str().parse::<EasingName>(), Ok(name));
        }
        assert_eq!(EasingName::all().count(), 14);
    }

    #[test]
    fn unknown_name_fails_to_parse() {
        let err = "wobble".parse::<EasingName>().unwrap_err();

        assert_eq!(err, UnknownEasing("wobble".to_string()));
        assert_eq!(err.to_string(), "unknown easing 'wobble'");
    }

    #[test]
    fn unknown_name_falls_back_to_linear() {
        let easing = Easing::named("wobble");

        assert_eq!(easing.name(), Some(EasingName::Linear));
        assert_eq!(easing.calc(0.3), 0.3);
    }

    #[test]
    fn absent_easing_resolves_to_linear() {
        assert_eq!(Easing::resolve(None).name(), Some(EasingName::Linear));
        assert_eq!(
            Easing::resolve(Some(&EasingName::CircOut.into())).name(),
            Some(EasingName::CircOut)
        );
    }

    #[test]
    fn custom_easing_is_used_unchanged() {
        let easing = Easing::custom(FnEasing(|x| x * x * x));

        assert_eq!(easing.name(), None);
        assert_relative_eq!(easing.calc(0.5), 0.125);
    }

    #[test]
    fn power_family_matches_reference_points() {
        assert_relative_eq!(Easing::from(EasingName::EaseIn).calc(0.5), 0.25);
        assert_relative_eq!(Easing::from(EasingName::EaseOut).calc(0.5), 0.75);
        assert_relative_eq!(Easing::from(EasingName::EaseInOut).calc(0.25), 0.125);
        assert_relative_eq!(Easing::from(EasingName::EaseInOut).calc(0.5), 0.5);
    }

    #[test]
    fn back_easings_overshoot() {
        assert!(Easing::from(EasingName::BackIn).calc(0.2) < 0.0);
        assert!(Easing::from(EasingName::BackOut).calc(0.8) > 1.0);
    }

    #[test]
    fn bounce_out_is_continuous_at_thresholds() {
        let bounce = Easing::from(EasingName::BounceOut);
        for threshold in [4.0 / 11.0, 8.0 / 11.0, 0.9f32] {
            assert_relative_eq!(
                bounce.calc(threshold - 1e-4),
                bounce.calc(threshold + 1e-4),
                epsilon = 1e-2
            );
        }
    }

    #[test]
    fn cubic_bezier_solves_for_x() {
        let ease = CubicBezierEasing::new(0.42, 0.0, 0.58, 1.0);

        assert_relative_eq!(ease.calc(0.5), 0.5, epsilon = 1e-4);
        assert!(ease.calc(0.25) < 0.25);
        assert!(ease.calc(0.75) > 0.75);
    }
}
