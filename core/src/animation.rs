//! Composite animations: groups of tweens that start, stop, and end together.

use crate::definition::{AnimationGroup, PrimitiveAnimation, TrackSpec};
use crate::error::Result;
use crate::target::StyleContext;
use crate::tween::{Completion, CompletionCallback, Tween};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// A group of [`Tween`]s resolved against one component instance.
///
/// Every tween's timeline is padded to the longest `delay + duration` of the group, so all tracks
/// reach their final keyframe at the same time.
///
/// Completion is reported once, when the *first* tween completes. With equal padding this is the
/// same moment for every track that does not repeat, but a group that mixes finite and infinite
/// repeats reports completion while the infinite tracks keep running.
#[derive(Debug)]
pub struct Animation {
    tweens: Vec<Tween>,
    minimum_total: f32,
}

impl Animation {
    /// Resolves a group definition against a component: merges the group defaults into every track,
    /// resolves their targets, and builds one tween per track.
    pub fn new<C: StyleContext + ?Sized>(ctx: &C, group: &AnimationGroup) -> Result<Self> {
        Self::from_tracks(ctx, group.resolve()?)
    }

    /// Creates an animation of a single track, with the built-in defaults.
    pub fn single<C: StyleContext + ?Sized>(ctx: &C, animation: PrimitiveAnimation) -> Result<Self> {
        Self::new(ctx, &AnimationGroup::new([animation]))
    }

    fn from_tracks<C: StyleContext + ?Sized>(ctx: &C, tracks: Vec<TrackSpec>) -> Result<Self> {
        let minimum_total = tracks.iter().map(TrackSpec::total).fold(0.0, f32::max);
        let tweens = tracks
            .into_iter()
            .map(|spec| Tween::new(ctx, spec, minimum_total))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            tweens,
            minimum_total,
        })
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    /// The time span all tweens are padded to, in milliseconds.
    pub fn minimum_total(&self) -> f32 {
        self.minimum_total
    }

    pub fn start(&self) {
        self.start_tweens(None);
    }

    /// Starts every tween, calling `on_complete` once, when the first of them completes.
    pub fn start_with(&self, on_complete: impl FnOnce() + 'static) {
        self.start_tweens(Some(Box::new(on_complete)));
    }

    /// Starts every tween and returns a future that resolves when the first of them completes.
    pub fn start_async(&self) -> Completion {
        let (on_complete, completion) = Completion::channel();
        self.start_tweens(Some(on_complete));
        completion
    }

    fn start_tweens(&self, on_complete: Option<CompletionCallback>) {
        debug!(tracks = self.tweens.len(), total = self.minimum_total, "animation started");
        if self.tweens.is_empty() {
            if let Some(on_complete) = on_complete {
                on_complete();
            }
            return;
        }
        let shared = Rc::new(RefCell::new(on_complete));
        for tween in &self.tweens {
            let shared = shared.clone();
            tween.start_with(move || {
                let on_complete = shared.borrow_mut().take();
                if let Some(on_complete) = on_complete {
                    on_complete();
                }
            });
        }
    }

    pub fn stop(&self) {
        self.tweens.iter().for_each(Tween::stop);
    }

    pub fn to_beginning(&self) {
        self.tweens.iter().for_each(Tween::to_beginning);
    }

    pub fn to_end(&self) {
        self.tweens.iter().for_each(Tween::to_end);
    }

    /// Elapsed time of the first tween; `0` for an empty group.
    pub fn elapsed(&self) -> f32 {
        self.tweens.first().map_or(0.0, Tween::elapsed)
    }

    /// Progress of the first tween; `0` for an empty group.
    pub fn progress(&self) -> f32 {
        self.tweens.first().map_or(0.0, Tween::progress)
    }
}
