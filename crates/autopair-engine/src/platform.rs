//! Platform abstraction traits for the input engine.
//!
//! These traits define the interface between the engine and the host that
//! owns the real editing surface (a browser `<textarea>`, a native text
//! field, or the in-memory surface in [`crate::headless`]). The engine never
//! touches a platform API directly; everything goes through here.

use std::time::Duration;

use crate::actions::{InputType, Range, SurfaceId};

/// Error type for platform operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct PlatformError(pub String);

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}

/// Handle to a task scheduled on the host's event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

/// A single-line or multi-line plain-text editing surface.
///
/// Offsets are char offsets. Reads are infallible; writes report failure so
/// the engine can fall back or give up without panicking.
pub trait Surface {
    /// Current text.
    fn value(&self) -> String;

    /// Current selection, ordered.
    fn selection(&self) -> Range;

    /// Move the selection. Implementations clamp to the text length.
    fn set_selection(&mut self, range: Range) -> Result<(), PlatformError>;

    /// Whether the surface is laid out (not `display: none`).
    fn is_displayed(&self) -> bool;

    /// Whether the surface is visible (not `visibility: hidden`).
    fn is_visible(&self) -> bool;

    /// Whether the surface is disabled.
    fn is_disabled(&self) -> bool;

    /// Give the surface keyboard focus before issuing a native command.
    fn focus(&mut self) {}

    /// Native text insertion that replaces the current selection and is
    /// recorded in the host's undo history.
    fn exec_insert_text(&mut self, text: &str) -> Result<(), PlatformError>;

    /// Native deletion of the selection, or of one char before a collapsed
    /// caret, recorded in the host's undo history.
    fn exec_delete(&mut self) -> Result<(), PlatformError>;

    /// Replace `range` directly, bypassing undo history. The selection ends up
    /// collapsed after the inserted text.
    fn set_range_text(&mut self, range: Range, text: &str) -> Result<(), PlatformError>;

    /// Synthesize an input notification so other listeners observe a direct
    /// write the same way they observe a native edit.
    fn dispatch_input(
        &mut self,
        input_type: InputType,
        data: Option<&str>,
    ) -> Result<(), PlatformError>;
}

/// The host environment the engine is attached to.
///
/// Resolves surfaces by their stable identifier and runs deferred work. The
/// host calls [`crate::InputEngine::run_task`] when a scheduled task fires;
/// cancelled tasks must not be delivered.
pub trait EditorHost {
    type Surface: Surface;

    /// Look up the surface registered under `id` for reading.
    fn lookup(&self, id: &SurfaceId) -> Option<&Self::Surface>;

    /// Look up the surface registered under `id` for editing.
    fn resolve(&mut self, id: &SurfaceId) -> Option<&mut Self::Surface>;

    /// Schedule a task to fire after `delay`.
    fn schedule(&mut self, delay: Duration) -> TaskId;

    /// Cancel a scheduled task. Unknown or already-fired ids are ignored.
    fn cancel(&mut self, task: TaskId);
}
