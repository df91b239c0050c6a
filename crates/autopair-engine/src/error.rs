//! Error types for the input engine.
//!
//! None of these ever leave a public entry point. They exist so internal
//! steps can use `?` and so the reason an event degraded to a no-op ends up
//! in the logs.

use thiserror::Error;

use crate::actions::SurfaceId;
use crate::platform::PlatformError;

/// Reasons an event was left alone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputError {
    /// No surface is registered under the id.
    #[error("surface `{0}` not found")]
    Unresolved(SurfaceId),

    /// The surface exists but is hidden or disabled.
    #[error("surface `{0}` is not editable")]
    NotEditable(SurfaceId),

    /// The host rejected a read or write.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// The event did not carry what its kind promises.
    #[error("malformed event: {0}")]
    MalformedEvent(&'static str),
}

impl InputError {
    /// Resolution failures are expected outside of edit mode and only worth
    /// a trace line.
    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::Unresolved(_) | Self::NotEditable(_))
    }
}
