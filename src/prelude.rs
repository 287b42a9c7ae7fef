//! Includes the types commonly used for declaring and running animations.

pub use crate::{
    animate, fade_in, fade_out, Animated, Animation, AnimationGroup, AnimationRegistry,
    AnimationSet, AnimationTable, Easing, EasingName, FadeOptions, FrameClock, InlineStyle,
    PrimitiveAnimation, Repeat, SharedStyle, StyleContext, StyleTarget, Styleable, Tween,
};
