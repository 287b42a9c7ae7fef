//! Core types for Kinetic.
//!
//! This is an internal crate that exists primarily to support Kinetic's proc macros, and should not
//! be used directly. All important types are re-exported by Kinetic.

pub mod animation;
pub mod clock;
pub mod definition;
pub mod easing;
pub mod error;
pub mod helpers;
pub mod interpolation;
pub mod registry;
pub mod target;
pub mod time_scale;
pub mod timeline;
pub mod track;
pub mod tween;
pub mod value;
