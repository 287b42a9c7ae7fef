//! Interfaces between the animation engine and the components whose styles it animates.

use crate::clock::FrameClock;
use crate::error::{AnimationError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A styleable handle: anything whose style properties can be read and written by name.
///
/// Property names are passed through as given, so implementations decide whether they accept
/// kebab-case, camelCase, or both.
pub trait StyleTarget {
    /// Reads the current (live) value of a style property, or `None` if it has no value.
    fn get_style(&self, track: &str) -> Option<String>;

    /// Writes a style property.
    fn set_style(&self, track: &str, value: &str);
}

/// Shared handle to a [`StyleTarget`], as held by running tweens.
pub type SharedStyle = Rc<dyn StyleTarget>;

/// Anything that can hand out a [`SharedStyle`] for itself.
///
/// Fields of a component tagged `#[root]` or `#[target]` in a
/// [`StyleContext`](derive.StyleContext.html) derive must implement this.
pub trait Styleable {
    fn style(&self) -> SharedStyle;
}

impl<T: StyleTarget + 'static> Styleable for Rc<T> {
    fn style(&self) -> SharedStyle {
        self.clone()
    }
}

impl Styleable for SharedStyle {
    fn style(&self) -> SharedStyle {
        self.clone()
    }
}

/// A component instance that animations can be resolved against.
///
/// Provides the root style handle and a lookup from sub-target names to their handles. This is
/// normally implemented with `#[derive(StyleContext)]`.
pub trait StyleContext {
    /// Name of the component type, which keys its animation table in an
    /// [`AnimationRegistry`](crate::registry::AnimationRegistry).
    fn component_name(&self) -> &str;

    /// Style handle of the component itself.
    fn root_style(&self) -> SharedStyle;

    /// Style handle of a named sub-target, or `None` if there is no such target.
    fn target_style(&self, name: &str) -> Option<SharedStyle>;

    /// Clock that drives the component's animations. Defaults to the thread's clock.
    fn clock(&self) -> FrameClock {
        FrameClock::current()
    }
}

/// Resolves the optional `target` of a track against a context.
///
/// An absent or empty target refers to the context itself; a target the context does not have is
/// an error.
pub fn resolve_target<C: StyleContext + ?Sized>(ctx: &C, target: Option<&str>) -> Result<SharedStyle> {
    match target {
        None | Some("") => Ok(ctx.root_style()),
        Some(name) => ctx
            .target_style(name)
            .ok_or_else(|| AnimationError::UnknownTarget {
                component: ctx.component_name().to_string(),
                target: name.to_string(),
            }),
    }
}

/// In-memory [`StyleTarget`], a plain property map.
///
/// Serves headless hosts that only need the resulting values, and tests.
#[derive(Default)]
pub struct InlineStyle {
    properties: RefCell<HashMap<String, String>>,
}

impl InlineStyle {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Creates a style with some properties already set.
    pub fn with<'a>(properties: impl IntoIterator<Item = (&'a str, &'a str)>) -> Rc<Self> {
        let style = Self::default();
        for (track, value) in properties {
            style.set_style(track, value);
        }
        Rc::new(style)
    }

    /// Removes a property, returning its previous value.
    pub fn remove(&self, track: &str) -> Option<String> {
        self.properties.borrow_mut().remove(track)
    }
}

impl StyleTarget for InlineStyle {
    fn get_style(&self, track: &str) -> Option<String> {
        self.properties.borrow().get(track).cloned()
    }

    fn set_style(&self, track: &str, value: &str) {
        self.properties
            .borrow_mut()
            .insert(track.to_string(), value.to_string());
    }
}

impl fmt::Debug for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.properties.borrow().iter()).finish()
    }
}
