//! Input event model.
//!
//! Platform-agnostic description of the notifications the engine consumes.
//! `InputType` carries the semantic intent of an input operation, modelled on
//! the W3C Input Events `inputType` vocabulary so a browser host can pass its
//! strings straight through `InputType::parse`.

use smol_str::SmolStr;

/// A range in the document, measured in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalize range so start <= end.
    pub fn normalize(self) -> Self {
        if self.start <= self.end {
            self
        } else {
            Self {
                start: self.end,
                end: self.start,
            }
        }
    }

    /// Clamp both ends to `len`.
    pub fn clamp(self, len: usize) -> Self {
        Self {
            start: self.start.min(len),
            end: self.end.min(len),
        }
    }
}

impl From<std::ops::Range<usize>> for Range {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl From<Range> for std::ops::Range<usize> {
    fn from(r: Range) -> Self {
        r.start..r.end
    }
}

/// Semantic input types from input events.
///
/// Only the kinds the engine reasons about get their own variant. Everything
/// else is preserved verbatim in `Unknown` so it can be logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputType {
    // === Insertion ===
    /// Insert typed text.
    InsertText,
    /// Insert provisional text from an IME composition.
    InsertCompositionText,
    /// Insert the committed result of an IME composition.
    InsertFromComposition,
    /// Insert a line break (Shift+Enter).
    InsertLineBreak,
    /// Insert a paragraph break (Enter).
    InsertParagraph,
    /// Insert from paste operation.
    InsertFromPaste,
    /// Insert from drop operation.
    InsertFromDrop,
    /// Insert replacement text (e.g., spell check correction).
    InsertReplacementText,

    // === Deletion ===
    /// Delete content backward (Backspace).
    DeleteContentBackward,
    /// Delete content forward (Delete key).
    DeleteContentForward,
    /// Delete by cut operation.
    DeleteByCut,
    /// Generic content deletion.
    DeleteContent,

    // === History ===
    HistoryUndo,
    HistoryRedo,

    // === Unknown ===
    /// Unrecognized input type.
    Unknown(String),
}

impl InputType {
    /// Parse a W3C `inputType` string.
    pub fn parse(s: &str) -> Self {
        match s {
            "insertText" => Self::InsertText,
            "insertCompositionText" => Self::InsertCompositionText,
            "insertFromComposition" => Self::InsertFromComposition,
            "insertLineBreak" => Self::InsertLineBreak,
            "insertParagraph" => Self::InsertParagraph,
            "insertFromPaste" => Self::InsertFromPaste,
            "insertFromDrop" => Self::InsertFromDrop,
            "insertReplacementText" => Self::InsertReplacementText,
            "deleteContentBackward" => Self::DeleteContentBackward,
            "deleteContentForward" => Self::DeleteContentForward,
            "deleteByCut" => Self::DeleteByCut,
            "deleteContent" => Self::DeleteContent,
            "historyUndo" => Self::HistoryUndo,
            "historyRedo" => Self::HistoryRedo,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The W3C name for this input type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::InsertText => "insertText",
            Self::InsertCompositionText => "insertCompositionText",
            Self::InsertFromComposition => "insertFromComposition",
            Self::InsertLineBreak => "insertLineBreak",
            Self::InsertParagraph => "insertParagraph",
            Self::InsertFromPaste => "insertFromPaste",
            Self::InsertFromDrop => "insertFromDrop",
            Self::InsertReplacementText => "insertReplacementText",
            Self::DeleteContentBackward => "deleteContentBackward",
            Self::DeleteContentForward => "deleteContentForward",
            Self::DeleteByCut => "deleteByCut",
            Self::DeleteContent => "deleteContent",
            Self::HistoryUndo => "historyUndo",
            Self::HistoryRedo => "historyRedo",
            Self::Unknown(s) => s,
        }
    }

    /// Whether this is one of the text insertions the interceptor rewrites:
    /// plain typing or text arriving from a composition.
    pub fn is_text_insertion(&self) -> bool {
        matches!(
            self,
            Self::InsertText | Self::InsertCompositionText | Self::InsertFromComposition
        )
    }

    /// Whether the kind names an IME composition.
    pub fn is_composition(&self) -> bool {
        match self {
            Self::InsertCompositionText | Self::InsertFromComposition => true,
            Self::Unknown(s) => s.contains("Composition"),
            _ => false,
        }
    }
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of an editable surface, stable across the host's lifetime.
pub type SurfaceId = SmolStr;

/// One "about to insert" or "value changed" notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    /// Surface the event was dispatched on.
    pub target: SurfaceId,
    /// Text carried by the event, if any.
    pub data: Option<String>,
    pub input_type: InputType,
    /// The host's own composing flag.
    pub is_composing: bool,
}

impl InputEvent {
    pub fn new(target: impl Into<SurfaceId>, input_type: InputType, data: Option<&str>) -> Self {
        Self {
            target: target.into(),
            data: data.map(str::to_string),
            input_type,
            is_composing: false,
        }
    }

    /// Plain typed text.
    pub fn insert_text(target: impl Into<SurfaceId>, data: &str) -> Self {
        Self::new(target, InputType::InsertText, Some(data))
    }

    /// Mark the event as part of a composition session.
    pub fn composing(mut self) -> Self {
        self.is_composing = true;
        self
    }

    /// Event data, treating an empty string as absent.
    pub fn text(&self) -> Option<&str> {
        self.data.as_deref().filter(|data| !data.is_empty())
    }
}
