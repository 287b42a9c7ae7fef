//! One-off animations that bypass the named tables: single tracks and opacity fades.

use crate::animation::Animation;
use crate::definition::{AnimationGroup, FallbackDefinition, PrimitiveAnimation};
use crate::easing::Easing;
use crate::error::Result;
use crate::target::StyleContext;
use crate::tween::{Completion, Tween};

/// Starts a single-track animation on a component. Unset timing fields use the built-in defaults.
///
/// The returned tween can be kept to control the animation, or dropped; the clock keeps it running
/// either way.
pub fn animate<C: StyleContext + ?Sized>(ctx: &C, animation: PrimitiveAnimation) -> Result<Tween> {
    let tween = build_tween(ctx, animation)?;
    tween.start();
    Ok(tween)
}

/// Like [`animate`], calling `on_complete` once the animation completes.
pub fn animate_with<C: StyleContext + ?Sized>(
    ctx: &C,
    animation: PrimitiveAnimation,
    on_complete: impl FnOnce() + 'static,
) -> Result<Tween> {
    let tween = build_tween(ctx, animation)?;
    tween.start_with(on_complete);
    Ok(tween)
}

/// Like [`animate`], returning a future that resolves once the animation completes.
pub fn animate_async<C: StyleContext + ?Sized>(
    ctx: &C,
    animation: PrimitiveAnimation,
) -> Result<Completion> {
    Ok(build_tween(ctx, animation)?.start_async())
}

fn build_tween<C: StyleContext + ?Sized>(ctx: &C, animation: PrimitiveAnimation) -> Result<Tween> {
    let spec = animation.resolve(&FallbackDefinition::default())?;
    Tween::new(ctx, spec, 0.0)
}

/// Options for [`fade_in`] and [`fade_out`].
#[derive(Clone, Debug)]
pub struct FadeOptions {
    /// Length of the fade, in milliseconds.
    pub duration: f32,
    pub ease: Easing,
}

impl Default for FadeOptions {
    fn default() -> Self {
        Self {
            duration: 250.0,
            ease: Easing::LINEAR,
        }
    }
}

impl FadeOptions {
    pub fn duration(mut self, duration_ms: f32) -> Self {
        self.duration = duration_ms;
        self
    }

    pub fn ease(mut self, ease: impl Into<Easing>) -> Self {
        self.ease = ease.into();
        self
    }
}

const FADE_IN_OPACITY: &str = "1.0";
const FADE_OUT_OPACITY: &str = "0";

/// Starts fading the component in, from its current opacity.
pub fn fade_in<C: StyleContext + ?Sized>(ctx: &C, options: FadeOptions) -> Result<Animation> {
    let animation = fade(ctx, FADE_IN_OPACITY, options)?;
    animation.start();
    Ok(animation)
}

/// Starts fading the component in and returns a future that resolves once it is fully opaque.
pub fn fade_in_async<C: StyleContext + ?Sized>(ctx: &C, options: FadeOptions) -> Result<Completion> {
    Ok(fade(ctx, FADE_IN_OPACITY, options)?.start_async())
}

/// Starts fading the component out, from its current opacity.
pub fn fade_out<C: StyleContext + ?Sized>(ctx: &C, options: FadeOptions) -> Result<Animation> {
    let animation = fade(ctx, FADE_OUT_OPACITY, options)?;
    animation.start();
    Ok(animation)
}

/// Starts fading the component out and returns a future that resolves once it is fully
/// transparent.
pub fn fade_out_async<C: StyleContext + ?Sized>(ctx: &C, options: FadeOptions) -> Result<Completion> {
    Ok(fade(ctx, FADE_OUT_OPACITY, options)?.start_async())
}

fn fade<C: StyleContext + ?Sized>(ctx: &C, to: &str, options: FadeOptions) -> Result<Animation> {
    let track = PrimitiveAnimation::new("opacity", to)
        .duration(options.duration)
        .ease(options.ease);
    Animation::new(ctx, &AnimationGroup::new([track]))
}
