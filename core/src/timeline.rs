//! Creation and consumption of [`KeyframeTimeline`] instances.

use crate::easing::{Easing, EasingFunction};
use crate::interpolation::Lerp;
use crate::time_scale::{TimeScale, TimeScalePosition};
use std::fmt::Debug;

/// Timing of a single track within its group, in milliseconds.
///
/// The `total` is the time span the track's timeline covers: at least its own `delay + duration`,
/// padded to the longest track of the group so that every track of the group reaches its last
/// keyframe together.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Schedule {
    pub delay: f32,
    pub duration: f32,
    pub total: f32,
}

impl Schedule {
    /// Creates a schedule for a track, padded to the group's minimum total duration.
    pub fn new(delay: f32, duration: f32, group_minimum_total: f32) -> Self {
        Self {
            delay,
            duration,
            total: (delay + duration).max(group_minimum_total),
        }
    }

    /// Normalized times of the four keyframes: start, end of pre-roll, end of transition, end of
    /// padding.
    ///
    /// An empty schedule collapses into a single jump at the midpoint, so that it never divides by
    /// zero.
    pub fn boundary_times(&self) -> [f32; 4] {
        if self.total <= 0.0 {
            return [0.0, 0.0, 1.0, 1.0];
        }
        [
            0.0,
            self.delay / self.total,
            (self.delay + self.duration) / self.total,
            1.0,
        ]
    }
}

/// A single frame of a [`KeyframeTimeline`], holding the value at a given point in time and the
/// easing of the segment that begins there.
#[derive(Clone, Debug)]
pub struct Keyframe<Data: Clone> {
    pub(super) data: Data,
    pub(super) easing: Option<Easing>,
    pub(super) normalized_time: f32,
}

impl<Data: Clone> Keyframe<Data> {
    /// Creates a new keyframe.
    ///
    /// # Arguments
    ///
    /// * `normalized_time` - Position of the keyframe on a normalized time scale from `0.0` (0%) to
    ///   `1.0` (100%).
    /// * `data` - Value at this keyframe.
    /// * `easing` - Easing function to use between this keyframe and the next, and for subsequent
    ///   keyframes that do not provide their own `easing`. Specifying `None` will cause the keyframe
    ///   to use the easing of the previous keyframe, or linear if there is none.
    pub fn new(normalized_time: f32, data: Data, easing: Option<Easing>) -> Self {
        Self {
            normalized_time,
            data,
            easing,
        }
    }

    pub fn data(&self) -> &Data {
        &self.data
    }
}

/// Timeline for a single value, interpolating between keyframes.
#[derive(Clone, Debug)]
pub struct KeyframeTimeline<V: Clone + Debug + Lerp> {
    boundary_times: Vec<f32>,
    keyframes: Vec<Keyframe<V>>,
    timescale: TimeScale,
}

impl<V: Clone + Debug + Lerp> KeyframeTimeline<V> {
    /// Creates a timeline from a sequence of keyframes.
    ///
    /// Keyframes are sorted by time. Easings left unspecified inherit from the preceding keyframe.
    /// Timelines with less than two keyframes have no segments and produce no values.
    pub fn new(mut keyframes: Vec<Keyframe<V>>, timescale: TimeScale) -> Self {
        keyframes.sort_by(|a, b| a.normalized_time.total_cmp(&b.normalized_time));
        let mut current_easing = Easing::default();
        for keyframe in keyframes.iter_mut() {
            match &keyframe.easing {
                Some(easing) => current_easing = easing.clone(),
                None => keyframe.easing = Some(current_easing.clone()),
            }
        }
        Self {
            boundary_times: keyframes.iter().map(|k| k.normalized_time).collect(),
            keyframes,
            timescale,
        }
    }

    /// Creates the four-keyframe timeline of a tween: holds at `from` during the delay, eases to
    /// `to` over the duration, then holds at `to` for any remaining padding.
    pub fn transition(schedule: &Schedule, from: V, to: V, easing: Easing, timescale: TimeScale) -> Self {
        let [t0, t1, t2, t3] = schedule.boundary_times();
        Self::new(
            vec![
                Keyframe::new(t0, from.clone(), Some(Easing::LINEAR)),
                Keyframe::new(t1, from, Some(easing)),
                Keyframe::new(t2, to.clone(), Some(Easing::LINEAR)),
                Keyframe::new(t3, to, None),
            ],
            timescale,
        )
    }

    pub fn keyframes(&self) -> &[Keyframe<V>] {
        &self.keyframes
    }

    pub fn timescale(&self) -> &TimeScale {
        &self.timescale
    }

    /// Computes the value at a playhead `time`, or `None` if the timeline has no segments.
    pub fn value_at(&self, time: f32) -> Option<V> {
        let (normalized_time, frame_index) =
            prepare_frame(time, &self.boundary_times, &self.timescale)?;
        let start = &self.keyframes[frame_index];
        let end = &self.keyframes[frame_index + 1];
        let width = end.normalized_time - start.normalized_time;
        let x = if width > 0.0 {
            ((normalized_time - start.normalized_time) / width).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let eased = start.easing.as_ref().map_or(x, |easing| easing.calc(x));
        Some(start.data.lerp(&end.data, eased))
    }
}

/// Describes the looping behavior of an animation timeline.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Repeat {
    /// Animation does not repeat; it plays once and then ends.
    #[default]
    None,
    /// Animation repeats for a given number of cycles after the first, looping or reversing back to
    /// the beginning each time. Ends after the last cycle is completed.
    Times(u32),
    /// Animation repeats infinitely and never ends.
    Infinite,
}

impl Repeat {
    /// Total number of cycles, including the first; [u64::MAX] stands in for infinity.
    pub fn cycles(&self) -> u64 {
        match self {
            Repeat::None => 1,
            Repeat::Times(times) => *times as u64 + 1,
            Repeat::Infinite => u64::MAX,
        }
    }

    pub fn is_none(&self) -> bool {
        *self == Repeat::None
    }

    /// Converts a repeat count, where any count that does not fit a `u32` (including infinity)
    /// repeats forever and anything not positive does not repeat.
    pub fn from_count(count: f64) -> Self {
        if count.is_nan() || count < 1.0 {
            Repeat::None
        } else if count >= u32::MAX as f64 {
            Repeat::Infinite
        } else {
            Repeat::Times(count as u32)
        }
    }
}

// Counts are plain numbers, except that JSON has no infinity, so that one is written "Infinity".
#[cfg(feature = "serde")]
impl serde::Serialize for Repeat {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Repeat::None => serializer.serialize_u32(0),
            Repeat::Times(times) => serializer.serialize_u32(*times),
            Repeat::Infinite => serializer.serialize_str("Infinity"),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Repeat {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum RepeatCount {
            Count(f64),
            Text(String),
        }

        match <RepeatCount as serde::Deserialize>::deserialize(deserializer)? {
            RepeatCount::Count(count) => Ok(Repeat::from_count(count)),
            RepeatCount::Text(text) => match text.trim() {
                "Infinity" | "infinity" | "infinite" | "Infinite" => Ok(Repeat::Infinite),
                other => other
                    .parse::<f64>()
                    .map(Repeat::from_count)
                    .map_err(|_| serde::de::Error::custom(format!("invalid repeat count `{other}`"))),
            },
        }
    }
}

/// How a repeating timeline begins each new cycle.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RepeatMode {
    /// Every cycle plays from the start.
    #[default]
    Loop,
    /// Every other cycle plays backwards, from the end.
    Flip,
    /// Ping-pong between the start and the end. Over a single linear base timeline this is the same
    /// motion as [`Flip`](Self::Flip).
    Yoyo,
}

impl RepeatMode {
    /// Whether odd-numbered cycles run in reverse.
    pub fn alternates(&self) -> bool {
        !matches!(self, RepeatMode::Loop)
    }
}

/// Performs the lookup tasks common to all timelines, converting a playhead time to normalized time
/// and finding the keyframe at which the active segment begins.
///
/// When several keyframes share a time (a zero-width segment), the last of them is chosen, so that
/// empty segments are skipped rather than divided by. The index is clamped such that a following
/// keyframe always exists.
pub fn prepare_frame(
    time: f32,
    boundary_times: &[f32],
    timescale: &TimeScale,
) -> Option<(f32, usize)> {
    if boundary_times.len() < 2 {
        return None;
    }
    let normalized_time = match timescale.get_position(time) {
        TimeScalePosition::Active(t, _) | TimeScalePosition::Ended(t) => t,
        TimeScalePosition::NotStarted => 0.0,
    };
    let frame_index = boundary_times
        .partition_point(|t| *t <= normalized_time)
        .saturating_sub(1)
        .min(boundary_times.len() - 2);
    Some((normalized_time, frame_index))
}
