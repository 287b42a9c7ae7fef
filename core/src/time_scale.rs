use crate::timeline::{Repeat, RepeatMode};

/// Describes the time scale of a [KeyframeTimeline](crate::timeline::KeyframeTimeline).
///
/// Time scales handle the conversion between the playhead of a running tween (milliseconds since it
/// was started, plus any seek offset) and the normalized positions used by keyframes.
///
/// Pre-roll delays are not part of the time scale; they are baked into the keyframe times, so that
/// every cycle of a repeating tween replays its delay as well.
#[derive(Clone, Debug)]
pub struct TimeScale {
    duration: f32,
    repeat: Repeat,
    mode: RepeatMode,
}

impl Default for TimeScale {
    fn default() -> Self {
        Self {
            duration: 1.0,
            repeat: Repeat::None,
            mode: RepeatMode::Loop,
        }
    }
}

impl TimeScale {
    /// Creates a time scale whose cycles last `duration` time units.
    ///
    /// A zero (or negative) duration describes an instantaneous timeline, which is
    /// [ended](TimeScalePosition::Ended) at any non-negative time.
    pub fn new(duration: f32, repeat: Repeat, mode: RepeatMode) -> Self {
        Self {
            duration: duration.max(0.0),
            repeat,
            mode,
        }
    }

    /// Duration of a single cycle.
    pub fn cycle_duration(&self) -> f32 {
        self.duration
    }

    /// Duration of all cycles combined; [f32::INFINITY] for infinite repeats of a non-empty cycle.
    pub fn total_duration(&self) -> f32 {
        match self.repeat {
            _ if self.duration == 0.0 => 0.0,
            Repeat::Infinite => f32::INFINITY,
            repeat => self.duration * repeat.cycles() as f32,
        }
    }

    /// Maps a playhead of any length onto an equivalent time on this scale.
    ///
    /// Infinite repeats fold the playhead into at most two periods (one period being a full
    /// forward-and-back round trip for alternating modes), so their position stays exact however
    /// long they run. Every other time is passed through.
    pub fn wrap(&self, time: f64) -> f32 {
        if self.repeat != Repeat::Infinite || self.duration == 0.0 || time < 0.0 || time.is_nan() {
            return time as f32;
        }
        let period = self.duration as f64 * if self.mode.alternates() { 2.0 } else { 1.0 };
        if time < period {
            return time as f32;
        }
        (period + time % period) as f32
    }

    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    pub fn mode(&self) -> RepeatMode {
        self.mode
    }

    /// Computes the normalized time or "timeline position" for some playhead time.
    ///
    /// # Arguments
    ///
    /// * `time` - Playhead time in the same units as the timescale's duration. Negative times have
    ///   not started yet.
    ///
    /// # Returns
    ///
    /// The position on the timeline, described in terms of keyframe times between `0.0` (0%) and
    /// `1.0` (100%).
    ///
    /// * If the mode [alternates](RepeatMode::alternates), then odd-numbered cycles run from `1.0`
    ///   back down to `0.0`.
    /// * Otherwise, the normalized time increases monotonically from `0.0` to `1.0` until either the
    ///   animation fully ends (remains at the final position) or the next loop begins (resets to
    ///   `0.0`).
    pub fn get_position(&self, time: f32) -> TimeScalePosition {
        if time < 0.0 || time.is_nan() {
            return TimeScalePosition::NotStarted;
        }
        if self.duration == 0.0 || time >= self.total_duration() {
            return TimeScalePosition::Ended(self.final_position());
        }
        // Simple modulo arithmetic would never produce 1.0 at the end of a cycle, it would reset to
        // 0.0 instead, so a looping animation would never actually reach its terminal value. Hold
        // the value at the full duration whenever at least one full cycle has completed.
        let (quot, rem) = (time / self.duration, time % self.duration);
        let (index, cycle_time) = if rem == 0.0 && quot >= 1.0 {
            (quot as u32 - 1, self.duration)
        } else {
            (quot as u32, rem)
        };
        let t = cycle_time / self.duration;
        let is_reversing = self.is_reversed_cycle(index);
        let normalized_time = if is_reversing { 1.0 - t } else { t };
        TimeScalePosition::Active(
            normalized_time,
            CycleState {
                index,
                is_reversing,
            },
        )
    }

    /// Computes the forward fraction of the current cycle, regardless of direction.
    ///
    /// Returns `0.0` before the time scale starts and `1.0` once it has ended.
    pub fn get_progress(&self, time: f32) -> f32 {
        match self.get_position(time) {
            TimeScalePosition::NotStarted => 0.0,
            TimeScalePosition::Active(t, cycle) if cycle.is_reversing => 1.0 - t,
            TimeScalePosition::Active(t, _) => t,
            TimeScalePosition::Ended(_) => 1.0,
        }
    }

    fn final_position(&self) -> f32 {
        match self.repeat {
            Repeat::Times(times) if self.is_reversed_cycle(times) => 0.0,
            _ => 1.0,
        }
    }

    fn is_reversed_cycle(&self, index: u32) -> bool {
        self.mode.alternates() && index % 2 == 1
    }
}

/// Position on a timeline, produced by [`TimeScale::get_position`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimeScalePosition {
    /// The playhead is still before the first cycle, e.g. because of a negative seek offset. When
    /// determining values, this is equivalent to a normalized time of `0.0`.
    NotStarted,
    /// The timeline is running, at the specified normalized time within the current cycle.
    Active(f32, CycleState),
    /// The timeline has ended and rests at the specified normalized time: `1.0` for forward
    /// endings, `0.0` if the last cycle ran in reverse.
    Ended(f32),
}

/// Which cycle an active timeline is in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CycleState {
    /// Zero-based index of the cycle; `0` is the initial run, `1` the first repetition, and so on.
    pub index: u32,
    /// Whether the cycle runs from the end back to the start.
    pub is_reversing: bool,
}
