//! Numeric interpolation shared by colors, lengths and every other blendable style token.

use num_traits::{Bounded, FromPrimitive};

/// Linear interpolation between two values of the same type, at a normalized position `x` where
/// `0.0` is `self` and `1.0` is `y1`.
///
/// Easings may push `x` slightly outside of `0..=1` (overshoot); implementations must accept that
/// and produce an extrapolated value rather than fail.
pub trait Lerp {
    /// ```
    /// use kinetic_core::interpolation::Lerp;
    ///
    /// assert_eq!(0.0f32.lerp(&200.0, 0.25), 50.0);
    /// assert_eq!(0u8.lerp(&255, 1.0), 255);
    /// ```
    fn lerp(&self, y1: &Self, x: f32) -> Self;
}

// `tb + (1 - t)a` keeps the arithmetic in floating point, so narrow integer ranges such as an u8
// color channel cannot overflow mid-computation. Results that land outside the target type (from
// overshooting easings) saturate at the type's bounds.
macro_rules! impl_lerp_for_integer_types {
    ($($t:ty),*) => {
        $( impl Lerp for $t {
            fn lerp(&self, y1: &Self, x: f32) -> Self {
                let result = (*self as f32).lerp(&(*y1 as f32), x).round();
                Self::from_f32(result).unwrap_or_else(|| {
                    if result < 0.0 { <$t as Bounded>::min_value() } else { <$t as Bounded>::max_value() }
                })
            }
        }) *
    }
}

impl_lerp_for_integer_types! { i8, i16, i32, u8, u16, u32 }

impl Lerp for f32 {
    fn lerp(&self, y1: &Self, x: f32) -> Self {
        self * (1.0 - x) + y1 * x
    }
}

impl Lerp for f64 {
    fn lerp(&self, y1: &Self, x: f32) -> Self {
        let x = x as f64;
        self * (1.0 - x) + y1 * x
    }
}
