//! Primitive tweens: one style property of one target, driven by a frame clock.

use crate::clock::{FrameClock, FrameControl, FrameListener};
use crate::definition::TrackSpec;
use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::target::{resolve_target, SharedStyle, StyleContext};
use crate::time_scale::{TimeScale, TimeScalePosition};
use crate::timeline::{Keyframe, KeyframeTimeline, Schedule};
use crate::track::TrackKind;
use crate::value::MixValue;
use futures::channel::oneshot;
use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use tracing::{debug, trace, warn};

/// Callback invoked once when an animation completes.
pub type CompletionCallback = Box<dyn FnOnce()>;

/// Lifecycle of a [`Tween`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TweenState {
    /// Constructed but never started.
    #[default]
    Idle,
    /// Running on the clock.
    Scheduled,
    /// Stopped before completion. Starting again replays from the beginning.
    Paused,
    /// Reached its natural end and fired its completion callback.
    Completed,
}

/// Drives a single track on a single target from a start value to an end value.
///
/// A tween holds one schedule of four keyframes, `[start, end of delay, end of transition, end of
/// group]`. Continuous tracks hold at `from`, ease to `to` and hold again, while discrete tracks
/// jump straight from `from` to `to` when the delay has passed.
///
/// Handles are cheap to clone and all refer to the same tween. A started tween is kept alive by its
/// clock until it completes or is stopped, so it is fine to drop every handle right after starting.
#[derive(Clone)]
pub struct Tween {
    inner: Rc<TweenInner>,
}

struct TweenInner {
    spec: TrackSpec,
    kind: TrackKind,
    style: SharedStyle,
    clock: FrameClock,
    group_minimum_total: f32,
    run: RefCell<TweenRun>,
    on_complete: RefCell<Option<CompletionCallback>>,
}

#[derive(Default)]
struct TweenRun {
    state: TweenState,
    timeline: Option<TrackTimeline>,
    playhead: f64,
    started_frame: u64,
    subscribed: bool,
}

enum TrackTimeline {
    Continuous(KeyframeTimeline<MixValue>),
    Discrete {
        curve: KeyframeTimeline<f32>,
        from: String,
        to: String,
    },
}

impl TrackTimeline {
    fn build(spec: &TrackSpec, kind: TrackKind, from: String, group_minimum_total: f32) -> Self {
        let schedule = Schedule::new(spec.delay, spec.duration, group_minimum_total);
        let timescale = TimeScale::new(schedule.total, spec.repeat, spec.mode);
        let to = spec.to.to_css();
        match kind {
            TrackKind::Continuous => {
                let (from, to) = (MixValue::parse(from), MixValue::parse(to));
                if !from.can_blend(&to) {
                    warn!(
                        track = %spec.track,
                        from = from.as_str(),
                        to = to.as_str(),
                        "values cannot be blended; switching at the midpoint"
                    );
                }
                Self::Continuous(KeyframeTimeline::transition(
                    &schedule,
                    from,
                    to,
                    spec.ease.clone(),
                    timescale,
                ))
            }
            TrackKind::Discrete => {
                let [t0, t1, t2, t3] = schedule.boundary_times();
                let curve = KeyframeTimeline::new(
                    vec![
                        Keyframe::new(t0, 0.0, Some(Easing::LINEAR)),
                        Keyframe::new(t1, 1.0, None),
                        Keyframe::new(t2, 2.0, None),
                        Keyframe::new(t3, 2.0, None),
                    ],
                    timescale,
                );
                Self::Discrete { curve, from, to }
            }
        }
    }

    fn timescale(&self) -> &TimeScale {
        match self {
            Self::Continuous(timeline) => timeline.timescale(),
            Self::Discrete { curve, .. } => curve.timescale(),
        }
    }

    fn value_at(&self, playhead: f64) -> Option<String> {
        let time = self.timescale().wrap(playhead);
        match self {
            Self::Continuous(timeline) => timeline
                .value_at(time)
                .map(|value| value.as_str().to_string()),
            Self::Discrete { curve, from, to } => curve
                .value_at(time)
                .map(|step| if step >= 1.0 { to.clone() } else { from.clone() }),
        }
    }

    fn is_ended(&self, playhead: f64) -> bool {
        let timescale = self.timescale();
        matches!(
            timescale.get_position(timescale.wrap(playhead)),
            TimeScalePosition::Ended(_)
        )
    }
}

impl Tween {
    /// Creates a tween for a track of a component, resolving its target immediately.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Component that owns the target.
    /// * `spec` - The resolved track.
    /// * `group_minimum_total` - Time span of the longest track of the group, in milliseconds. The
    ///   tween's timeline is padded to at least this length.
    pub fn new<C: StyleContext + ?Sized>(
        ctx: &C,
        spec: TrackSpec,
        group_minimum_total: f32,
    ) -> Result<Self> {
        let style = resolve_target(ctx, spec.target.as_deref())?;
        Ok(Self::bind(style, ctx.clock(), spec, group_minimum_total))
    }

    /// Creates a tween for a style handle that is already known.
    pub fn bind(
        style: SharedStyle,
        clock: FrameClock,
        spec: TrackSpec,
        group_minimum_total: f32,
    ) -> Self {
        let kind = TrackKind::of(&spec.track);
        Self {
            inner: Rc::new(TweenInner {
                spec,
                kind,
                style,
                clock,
                group_minimum_total,
                run: RefCell::new(TweenRun::default()),
                on_complete: RefCell::new(None),
            }),
        }
    }

    pub fn spec(&self) -> &TrackSpec {
        &self.inner.spec
    }

    pub fn kind(&self) -> TrackKind {
        self.inner.kind
    }

    pub fn state(&self) -> TweenState {
        self.inner.run.borrow().state
    }

    /// Starts the tween from the beginning.
    ///
    /// Tracks without a pinned `from` sample the live value of the property on every start. Calling
    /// this on a running or paused tween always replays it from the beginning; it never resumes.
    pub fn start(&self) {
        self.inner.start(None);
    }

    /// Starts the tween, calling `on_complete` once it completes.
    ///
    /// A callback from an earlier start that has not fired yet is dropped.
    pub fn start_with(&self, on_complete: impl FnOnce() + 'static) {
        self.inner.start(Some(Box::new(on_complete)));
    }

    /// Starts the tween and returns a future that resolves when it completes.
    pub fn start_async(&self) -> Completion {
        let (on_complete, completion) = Completion::channel();
        self.inner.start(Some(on_complete));
        completion
    }

    /// Pauses the tween. Has no effect unless it is running.
    pub fn stop(&self) {
        let mut run = self.inner.run.borrow_mut();
        if run.state == TweenState::Scheduled {
            run.state = TweenState::Paused;
            debug!(track = %self.inner.spec.track, playhead = run.playhead, "tween paused");
        }
    }

    /// Writes the pinned `from` value, if there is one.
    ///
    /// Tracks whose start value is sampled from the live property have no fixed beginning, so for
    /// those this does nothing.
    pub fn to_beginning(&self) {
        if let Some(from) = &self.inner.spec.from {
            debug!(track = %self.inner.spec.track, "snapping to beginning");
            self.inner.write(&from.to_css());
        }
    }

    /// Writes the `to` value.
    pub fn to_end(&self) {
        debug!(track = %self.inner.spec.track, "snapping to end");
        self.inner.write(&self.inner.spec.to.to_css());
    }

    /// Playhead position in milliseconds, including any initial seek; `0` if never started.
    pub fn elapsed(&self) -> f32 {
        let run = self.inner.run.borrow();
        match run.timeline {
            Some(_) => run.playhead as f32,
            None => 0.0,
        }
    }

    /// Fraction of the current cycle that has played, from `0` to `1`; `0` if never started.
    pub fn progress(&self) -> f32 {
        let run = self.inner.run.borrow();
        match (&run.timeline, run.state) {
            (None, _) => 0.0,
            (Some(_), TweenState::Completed) => 1.0,
            (Some(timeline), _) => {
                let timescale = timeline.timescale();
                timescale.get_progress(timescale.wrap(run.playhead))
            }
        }
    }
}

impl TweenInner {
    fn start(self: &Rc<Self>, on_complete: Option<CompletionCallback>) {
        // Replacing the callback drops any earlier one that never fired.
        *self.on_complete.borrow_mut() = on_complete;
        let (value, completed, subscribe) = {
            let mut run = self.run.borrow_mut();
            if run.timeline.is_none() || self.spec.from.is_none() {
                let from = self.sample_from();
                debug!(track = %self.spec.track, from = %from, to = %self.spec.to, "tween started");
                run.timeline = Some(TrackTimeline::build(
                    &self.spec,
                    self.kind,
                    from,
                    self.group_minimum_total,
                ));
            } else {
                debug!(track = %self.spec.track, "tween restarted");
            }
            run.playhead = self.spec.elapsed as f64;
            run.started_frame = self.clock.frame();
            let playhead = run.playhead;
            let (value, completed) = match &run.timeline {
                Some(timeline) => (timeline.value_at(playhead), timeline.is_ended(playhead)),
                None => (None, true),
            };
            run.state = if completed {
                TweenState::Completed
            } else {
                TweenState::Scheduled
            };
            let subscribe = !completed && !run.subscribed;
            if subscribe {
                run.subscribed = true;
            }
            (value, completed, subscribe)
        };
        if let Some(value) = value {
            self.write(&value);
        }
        if subscribe {
            self.clock.schedule(self.clone());
        }
        if completed {
            self.complete();
        }
    }

    fn sample_from(&self) -> String {
        if let Some(from) = &self.spec.from {
            return from.to_css();
        }
        self.style.get_style(&self.spec.track).unwrap_or_else(|| {
            warn!(track = %self.spec.track, "no live value to start from; using an empty value");
            String::new()
        })
    }

    fn write(&self, value: &str) {
        self.style.set_style(&self.spec.track, value);
    }

    fn complete(&self) {
        debug!(track = %self.spec.track, "tween completed");
        let on_complete = self.on_complete.borrow_mut().take();
        if let Some(on_complete) = on_complete {
            on_complete();
        }
    }
}

impl FrameListener for TweenInner {
    fn on_frame(&self, elapsed_ms: f32) -> FrameControl {
        let (value, completed) = {
            let mut run = self.run.borrow_mut();
            if run.state != TweenState::Scheduled {
                run.subscribed = false;
                return FrameControl::Detach;
            }
            if run.started_frame == self.clock.frame() {
                // (Re)started by another listener during this frame; time runs from the next one.
                return FrameControl::Continue;
            }
            run.playhead += elapsed_ms as f64;
            let playhead = run.playhead;
            let (value, completed) = match &run.timeline {
                Some(timeline) => (timeline.value_at(playhead), timeline.is_ended(playhead)),
                None => (None, true),
            };
            if completed {
                run.state = TweenState::Completed;
                run.subscribed = false;
            }
            (value, completed)
        };
        if let Some(value) = value {
            trace!(track = %self.spec.track, value = %value, "frame");
            self.write(&value);
        }
        if completed {
            self.complete();
            FrameControl::Detach
        } else {
            FrameControl::Continue
        }
    }
}

impl fmt::Debug for Tween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let run = self.inner.run.borrow();
        f.debug_struct("Tween")
            .field("track", &self.inner.spec.track)
            .field("kind", &self.inner.kind)
            .field("state", &run.state)
            .field("playhead", &run.playhead)
            .finish()
    }
}

/// Future returned by the async start variants, resolving once the animation completes.
///
/// Resolves to [`AnimationError::Cancelled`] if the animation is started again before it completes,
/// which replaces its completion callback. Stopping an animation does not resolve the future; it
/// stays pending until the animation is started again.
///
/// Running tweens are owned by their clock, so dropping every handle of a running animation does
/// not cancel it. The future is only cancelled by a drop once nothing holds the tween any more:
/// after it has been stopped and has detached from its clock, or when the clock itself is dropped.
#[derive(Debug)]
pub struct Completion {
    receiver: oneshot::Receiver<()>,
}

impl Completion {
    /// Creates a completion future along with the callback that resolves it.
    pub fn channel() -> (CompletionCallback, Completion) {
        let (sender, receiver) = oneshot::channel();
        let on_complete: CompletionCallback = Box::new(move || {
            // The receiver may already be gone; nobody is waiting then.
            let _ = sender.send(());
        });
        (on_complete, Completion { receiver })
    }
}

impl Future for Completion {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| result.map_err(|_| AnimationError::Cancelled))
    }
}
