//! Error types for animation lookup and construction.

use thiserror::Error;

/// Result type for animation operations.
pub type Result<T> = std::result::Result<T, AnimationError>;

/// Errors that can occur while resolving, building or awaiting animations.
///
/// All but [`Cancelled`](AnimationError::Cancelled) are configuration errors: they are raised
/// synchronously, before any style is touched.
#[derive(Error, Debug)]
pub enum AnimationError {
    /// The component type declares no animation with this name.
    #[error("component `{component}` has no animation named `{name}`")]
    UnknownAnimation { component: String, name: String },

    /// A track refers to a sub-target that the component does not have.
    #[error("component `{component}` has no animation target named `{target}`")]
    UnknownTarget { component: String, target: String },

    /// A track was declared without a property name.
    #[error("animation track is missing its property name")]
    MissingTrack,

    /// A track was declared without an end value.
    #[error("animation track `{track}` is missing its `to` value")]
    MissingTo { track: String },

    /// A definition table could not be read or written.
    #[cfg(feature = "serde")]
    #[error("invalid animation definition: {0}")]
    Definition(#[from] serde_json::Error),

    /// The animation was restarted or dropped before it completed.
    #[error("animation was cancelled before it completed")]
    Cancelled,
}
