//! IME composition guard.
//!
//! While an input method is composing, the text in the surface is
//! provisional. Rewriting it breaks the candidate window, so every handler
//! checks [`is_composing`] (or the engine's own session tracking) first and
//! defers to composition end.

use crate::actions::InputEvent;

/// Whether `event` belongs to an in-progress composition.
///
/// True when the host flags the event as composing, or when it carries data
/// and its input kind names a composition.
pub fn is_composing(event: &InputEvent) -> bool {
    event.is_composing || (event.text().is_some() && event.input_type.is_composition())
}

/// An open composition session on the surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositionState {
    /// Character offset where composition started
    pub start_offset: usize,
    /// Current composition text (uncommitted)
    pub text: String,
}

impl CompositionState {
    pub fn new(start_offset: usize, text: String) -> Self {
        Self { start_offset, text }
    }

    /// Get the end offset of the composition.
    pub fn end_offset(&self) -> usize {
        self.start_offset + self.text.chars().count()
    }
}
