//! Declarative style-property animation for UI components.
//!
//! Component types declare named [`AnimationGroup`]s in an [`AnimationRegistry`]. Each instance
//! resolves them lazily into [`Animation`]s: groups of [`Tween`]s that drive one style property
//! each, blending continuous properties such as `width` or `color` and switching discrete ones such
//! as `display` in one step. Everything runs on a single-threaded [`FrameClock`] that the host
//! advances once per frame.
//!
//! ```
//! use kinetic::prelude::*;
//! use std::rc::Rc;
//!
//! #[derive(StyleContext)]
//! struct Button {
//!     #[root]
//!     style: Rc<InlineStyle>,
//!     #[clock]
//!     clock: FrameClock,
//!     #[animations]
//!     animations: AnimationSet,
//! }
//!
//! let registry = AnimationRegistry::new();
//! registry.register(
//!     "Button",
//!     AnimationTable::from([(
//!         "fadeToRed".to_string(),
//!         AnimationGroup::new([PrimitiveAnimation::new("color", "red").duration(200.0)]),
//!     )]),
//! );
//!
//! let button = Button {
//!     style: InlineStyle::with([("color", "#000")]),
//!     clock: FrameClock::new(),
//!     animations: AnimationSet::new(registry.clone()),
//! };
//! button.animations("fadeToRed")?.start();
//! button.clock.advance(200.0);
//!
//! assert_eq!(button.style.get_style("color").as_deref(), Some("red"));
//! # Ok::<(), kinetic::AnimationError>(())
//! ```

pub mod prelude;

pub use kinetic_core::{
    animation::Animation,
    clock::{FrameClock, FrameControl, FrameListener},
    definition::{AnimationGroup, AnimationTable, FallbackDefinition, PrimitiveAnimation, TrackSpec},
    easing::{CubicBezierEasing, Easing, EasingFunction, EasingName},
    error::{AnimationError, Result},
    helpers::{
        animate, animate_async, animate_with, fade_in, fade_in_async, fade_out, fade_out_async,
        FadeOptions,
    },
    interpolation::Lerp,
    registry::{Animated, AnimationRegistry, AnimationSet},
    target::{resolve_target, InlineStyle, SharedStyle, StyleContext, StyleTarget, Styleable},
    timeline::{Repeat, RepeatMode},
    track::{is_interpolatable, TrackKind},
    tween::{Completion, Tween, TweenState},
    value::StyleValue,
};
pub use kinetic_macros::StyleContext;
