//! Declarative animation definitions, as authored per component type.
//!
//! A component type declares an [`AnimationTable`]: named [`AnimationGroup`]s, each a list of
//! single-property [`PrimitiveAnimation`]s. Timing fields that a track leaves unset fall back to
//! those of its group, and then to [`FallbackDefinition::builtin`].

use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::timeline::{Repeat, RepeatMode};
use crate::value::StyleValue;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Named animation groups of one component type.
pub type AnimationTable = BTreeMap<String, AnimationGroup>;

/// Timing and targeting fields shared by groups and tracks. Every field is optional.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "camelCase"))]
pub struct FallbackDefinition {
    /// Named sub-target of the component; absent or empty for the component itself.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub target: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub ease: Option<Easing>,
    /// Length of the transition, in milliseconds.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub duration: Option<f32>,
    /// Pre-roll before the transition, in milliseconds.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub delay: Option<f32>,
    /// Offset to seek to when started, in milliseconds.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub elapsed: Option<f32>,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "loop", default, skip_serializing_if = "Option::is_none")
    )]
    pub loop_count: Option<Repeat>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub flip: Option<Repeat>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub yoyo: Option<Repeat>,
}

impl FallbackDefinition {
    /// The defaults every track ends up with: linear, 300 ms, no delay, no seek, no repeat.
    pub fn builtin() -> Self {
        Self {
            target: None,
            ease: Some(Easing::LINEAR),
            duration: Some(300.0),
            delay: Some(0.0),
            elapsed: Some(0.0),
            loop_count: Some(Repeat::None),
            flip: Some(Repeat::None),
            yoyo: Some(Repeat::None),
        }
    }

    /// Fills every field left unset here with the one from `fallback`.
    pub fn or(&self, fallback: &FallbackDefinition) -> FallbackDefinition {
        FallbackDefinition {
            target: self.target.clone().or_else(|| fallback.target.clone()),
            ease: self.ease.clone().or_else(|| fallback.ease.clone()),
            duration: self.duration.or(fallback.duration),
            delay: self.delay.or(fallback.delay),
            elapsed: self.elapsed.or(fallback.elapsed),
            loop_count: self.loop_count.or(fallback.loop_count),
            flip: self.flip.or(fallback.flip),
            yoyo: self.yoyo.or(fallback.yoyo),
        }
    }

    /// The repeat policy in effect. When more than one of `loop`, `flip` and `yoyo` is set, they
    /// take precedence in that order.
    pub fn repeat(&self) -> (Repeat, RepeatMode) {
        [
            (self.loop_count, RepeatMode::Loop),
            (self.flip, RepeatMode::Flip),
            (self.yoyo, RepeatMode::Yoyo),
        ]
        .into_iter()
        .find_map(|(repeat, mode)| repeat.filter(|r| !r.is_none()).map(|r| (r, mode)))
        .unwrap_or((Repeat::None, RepeatMode::Loop))
    }

    fn timing_mut(&mut self) -> &mut FallbackDefinition {
        self
    }
}

macro_rules! impl_timing_builders {
    ($t:ty) => {
        impl $t {
            /// Sets the sub-target to animate.
            pub fn target(mut self, target: impl Into<String>) -> Self {
                self.timing_mut().target = Some(target.into());
                self
            }

            pub fn ease(mut self, ease: impl Into<Easing>) -> Self {
                self.timing_mut().ease = Some(ease.into());
                self
            }

            pub fn duration(mut self, duration_ms: f32) -> Self {
                self.timing_mut().duration = Some(duration_ms);
                self
            }

            pub fn delay(mut self, delay_ms: f32) -> Self {
                self.timing_mut().delay = Some(delay_ms);
                self
            }

            pub fn elapsed(mut self, elapsed_ms: f32) -> Self {
                self.timing_mut().elapsed = Some(elapsed_ms);
                self
            }

            /// Repeats from the start.
            pub fn looping(mut self, repeat: Repeat) -> Self {
                self.timing_mut().loop_count = Some(repeat);
                self
            }

            /// Repeats, reversing direction every cycle.
            pub fn flip(mut self, repeat: Repeat) -> Self {
                self.timing_mut().flip = Some(repeat);
                self
            }

            /// Repeats back and forth.
            pub fn yoyo(mut self, repeat: Repeat) -> Self {
                self.timing_mut().yoyo = Some(repeat);
                self
            }
        }
    };
}

impl_timing_builders!(FallbackDefinition);
impl_timing_builders!(PrimitiveAnimation);
impl_timing_builders!(AnimationGroup);

/// Animation of a single style property ("track").
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "camelCase"))]
pub struct PrimitiveAnimation {
    #[cfg_attr(feature = "serde", serde(default))]
    pub track: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub to: Option<StyleValue>,
    /// Pinned start value. When absent, the live value is sampled every time the track starts.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub from: Option<StyleValue>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub timing: FallbackDefinition,
}

impl PrimitiveAnimation {
    pub fn new(track: impl Into<String>, to: impl Into<StyleValue>) -> Self {
        Self {
            track: track.into(),
            to: Some(to.into()),
            from: None,
            timing: FallbackDefinition::default(),
        }
    }

    /// Pins the start value.
    pub fn from(mut self, from: impl Into<StyleValue>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Validates the track and merges its timing with `defaults`, then the built-in fallback.
    pub fn resolve(&self, defaults: &FallbackDefinition) -> Result<TrackSpec> {
        if self.track.trim().is_empty() {
            return Err(AnimationError::MissingTrack);
        }
        let to = self.to.clone().ok_or_else(|| AnimationError::MissingTo {
            track: self.track.clone(),
        })?;
        let timing = self.timing.or(defaults).or(&FallbackDefinition::builtin());
        let (repeat, mode) = timing.repeat();
        Ok(TrackSpec {
            target: timing.target.clone().filter(|target| !target.is_empty()),
            track: self.track.clone(),
            to,
            from: self.from.clone(),
            ease: Easing::resolve(timing.ease.as_ref()),
            duration: sanitize_time(&self.track, "duration", timing.duration),
            delay: sanitize_time(&self.track, "delay", timing.delay),
            elapsed: timing.elapsed.filter(|elapsed| elapsed.is_finite()).unwrap_or(0.0),
            repeat,
            mode,
        })
    }

    fn timing_mut(&mut self) -> &mut FallbackDefinition {
        &mut self.timing
    }
}

fn sanitize_time(track: &str, field: &str, value: Option<f32>) -> f32 {
    match value {
        Some(value) if value.is_finite() && value >= 0.0 => value,
        None => 0.0,
        Some(value) => {
            tracing::warn!(track, field, value, "invalid animation timing; using 0");
            0.0
        }
    }
}

/// A named set of tracks that start, stop, and end together.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "camelCase"))]
pub struct AnimationGroup {
    #[cfg_attr(feature = "serde", serde(default))]
    pub animations: Vec<PrimitiveAnimation>,
    /// Defaults for every track of the group.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub defaults: FallbackDefinition,
}

impl AnimationGroup {
    pub fn new(animations: impl IntoIterator<Item = PrimitiveAnimation>) -> Self {
        Self {
            animations: animations.into_iter().collect(),
            defaults: FallbackDefinition::default(),
        }
    }

    /// Resolves every track against the group defaults.
    pub fn resolve(&self) -> Result<Vec<TrackSpec>> {
        self.animations
            .iter()
            .map(|animation| animation.resolve(&self.defaults))
            .collect()
    }

    fn timing_mut(&mut self) -> &mut FallbackDefinition {
        &mut self.defaults
    }
}

/// A fully resolved and validated track, ready to be bound to a style target.
#[derive(Clone, Debug)]
pub struct TrackSpec {
    pub target: Option<String>,
    pub track: String,
    pub to: StyleValue,
    pub from: Option<StyleValue>,
    pub ease: Easing,
    pub duration: f32,
    pub delay: f32,
    pub elapsed: f32,
    pub repeat: Repeat,
    pub mode: RepeatMode,
}

impl TrackSpec {
    /// Time from start until the transition ends, excluding repeats.
    pub fn total(&self) -> f32 {
        self.delay + self.duration
    }
}
