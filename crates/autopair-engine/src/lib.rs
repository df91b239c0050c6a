//! autopair-engine: IME-safe auto-pairing for plain-text editing surfaces.
//!
//! This crate provides:
//! - `InputEngine<H>` - before/after input handlers attached to one surface
//! - `EditorHost` / `Surface` - the seam to the host that owns the real widget
//! - `classify` - the single pure rule set both input channels share
//! - `TildeMachine` - debounced `~~` strike-through pairing
//! - `HeadlessHost` - an in-memory host backed by `EditorRope`, for tests and
//!   non-DOM embedders
//!
//! All offsets are char offsets.

pub mod accessor;
pub mod actions;
pub mod collapse;
pub mod composition;
pub mod config;
pub mod engine;
pub mod error;
pub mod headless;
pub mod mutation;
pub mod pairs;
pub mod platform;
pub mod snapshot;
pub mod text;
pub mod tilde;
pub mod transform;
pub mod undo;

pub use accessor::{is_editable, resolve_editable};
pub use actions::{InputEvent, InputType, Range, SurfaceId};
pub use collapse::find_duplicate_pair;
pub use composition::{CompositionState, is_composing};
pub use config::EngineConfig;
pub use engine::{Handling, InputEngine, Reconcile};
pub use error::InputError;
pub use headless::{HeadlessHost, HeadlessSurface, Notification};
pub use mutation::{MutationOutcome, Strategy, apply_rewrite, delete_selection_or_backward, insert_at};
pub use pairs::{PAIRS, PairEntry, closing_for, is_distinct_closer, is_opener};
pub use platform::{EditorHost, PlatformError, Surface, TaskId};
pub use smol_str::SmolStr;
pub use snapshot::{EditorSnapshot, TextDiff};
pub use text::{EditorRope, TextBuffer};
pub use tilde::{TildeCommit, TildeMachine, TildeState, TildeStep};
pub use transform::{EditContext, Rewrite, RewriteKind, TildeKey, Transform, classify};
pub use undo::{UndoManager, UndoableBuffer};
