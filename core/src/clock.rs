//! The frame clock that drives every running tween.
//!
//! Tweens never run on their own thread or timer. Instead, each running tween subscribes to a
//! [`FrameClock`], and the host's frame loop (a window's redraw callback, a game loop, or a test)
//! calls [`FrameClock::advance`] once per frame with the time elapsed since the previous one.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Returned by a [`FrameListener`] to decide whether it should receive the next frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FrameControl {
    Continue,
    Detach,
}

/// Receives frame ticks from a [`FrameClock`].
pub trait FrameListener {
    /// Called once per frame with the milliseconds elapsed since the previous frame.
    fn on_frame(&self, elapsed_ms: f32) -> FrameControl;
}

/// Cheaply clonable handle to a shared, single-threaded frame clock.
///
/// Listeners are held strongly until they [detach](FrameControl::Detach), so a running tween keeps
/// playing even if the caller that started it has dropped every other handle.
#[derive(Clone, Default)]
pub struct FrameClock {
    inner: Rc<ClockInner>,
}

#[derive(Default)]
struct ClockInner {
    listeners: RefCell<Vec<Rc<dyn FrameListener>>>,
    now_ms: Cell<f64>,
    frame: Cell<u64>,
}

thread_local! {
    static CURRENT: FrameClock = FrameClock::new();
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the default clock of the calling thread.
    pub fn current() -> Self {
        CURRENT.with(Clone::clone)
    }

    /// Total time, in milliseconds, that this clock has been advanced.
    pub fn now_ms(&self) -> f64 {
        self.inner.now_ms.get()
    }

    /// Number of frames advanced so far. While listeners are being notified, this is the number of
    /// the frame in progress.
    pub fn frame(&self) -> u64 {
        self.inner.frame.get()
    }

    /// Number of listeners currently subscribed.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Whether the clock has no listeners, i.e. advancing it would have no effect.
    pub fn is_idle(&self) -> bool {
        self.listener_count() == 0
    }

    /// Subscribes a listener, starting with the next call to [`advance`](Self::advance).
    pub fn schedule(&self, listener: Rc<dyn FrameListener>) {
        self.inner.listeners.borrow_mut().push(listener);
    }

    /// Advances the clock by one frame, notifying every subscribed listener.
    ///
    /// Listeners may freely start, stop, or schedule other listeners from within
    /// [`on_frame`](FrameListener::on_frame); anything scheduled during the frame first runs on the
    /// following one.
    pub fn advance(&self, elapsed_ms: f32) {
        let elapsed_ms = if elapsed_ms.is_finite() { elapsed_ms.max(0.0) } else { 0.0 };
        self.inner.now_ms.set(self.now_ms() + elapsed_ms as f64);
        self.inner.frame.set(self.frame() + 1);
        let listeners = std::mem::take(&mut *self.inner.listeners.borrow_mut());
        let mut retained = Vec::with_capacity(listeners.len());
        for listener in listeners {
            if listener.on_frame(elapsed_ms) == FrameControl::Continue {
                retained.push(listener);
            }
        }
        let mut listeners = self.inner.listeners.borrow_mut();
        let added = std::mem::take(&mut *listeners);
        *listeners = retained;
        listeners.extend(added);
    }

    /// Advances the clock in fixed steps until no listeners remain or `max_ms` has elapsed.
    ///
    /// Returns the time actually advanced. Useful to drive finite animations to completion, e.g. in
    /// headless hosts and tests.
    pub fn run_until_idle(&self, step_ms: f32, max_ms: f32) -> f32 {
        let step_ms = if step_ms > 0.0 { step_ms } else { 16.0 };
        let mut advanced = 0.0;
        while !self.is_idle() && advanced < max_ms {
            self.advance(step_ms);
            advanced += step_ms;
        }
        advanced
    }

    /// Whether both handles refer to the same clock.
    pub fn ptr_eq(&self, other: &FrameClock) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameClock")
            .field("now_ms", &self.now_ms())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
