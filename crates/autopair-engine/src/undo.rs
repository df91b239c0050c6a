//! Undo/redo history for the headless surface.
//!
//! Stands in for the host's native undo stack: edits issued through the
//! surface's native commands are recorded here, direct writes are not.

use std::ops::Range;

use smol_str::{SmolStr, ToSmolStr};

use crate::text::TextBuffer;

/// Trait for managing undo/redo operations.
pub trait UndoManager {
    fn can_undo(&self) -> bool;

    fn can_redo(&self) -> bool;

    /// Perform undo. Returns the char range of the restored text, or None if
    /// there was nothing to undo.
    fn undo(&mut self) -> Option<Range<usize>>;

    /// Perform redo. Returns the char range of the re-inserted text.
    fn redo(&mut self) -> Option<Range<usize>>;

    fn clear_history(&mut self);
}

/// A recorded edit operation.
#[derive(Debug, Clone)]
struct EditOperation {
    /// Character position where edit occurred
    pos: usize,
    /// Text that was deleted (empty for pure insertions)
    deleted: SmolStr,
    /// Text that was inserted (empty for pure deletions)
    inserted: SmolStr,
}

/// A TextBuffer wrapper that records edits for undo/redo.
///
/// A `replace` is one step, the way a native insertion over a selection is
/// one step in a browser's history.
#[derive(Clone)]
pub struct UndoableBuffer<T> {
    buffer: T,
    undo_stack: Vec<EditOperation>,
    redo_stack: Vec<EditOperation>,
    max_steps: usize,
}

impl<T: TextBuffer> UndoableBuffer<T> {
    pub fn new(buffer: T, max_steps: usize) -> Self {
        Self {
            buffer,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_steps,
        }
    }

    /// Get a mutable reference to the inner buffer.
    /// WARNING: Edits made directly bypass undo tracking!
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.buffer
    }

    fn record_op(&mut self, pos: usize, deleted: &str, inserted: &str) {
        if deleted.is_empty() && inserted.is_empty() {
            return;
        }
        self.redo_stack.clear();
        self.undo_stack.push(EditOperation {
            pos,
            deleted: deleted.to_smolstr(),
            inserted: inserted.to_smolstr(),
        });
        if self.undo_stack.len() > self.max_steps {
            let excess = self.undo_stack.len() - self.max_steps;
            self.undo_stack.drain(..excess);
        }
    }

    fn swap(&mut self, pos: usize, remove: &str, insert: &str) -> Range<usize> {
        let remove_len = remove.chars().count();
        self.buffer.delete(pos..pos + remove_len);
        self.buffer.insert(pos, insert);
        pos..pos + insert.chars().count()
    }
}

impl<T: TextBuffer> TextBuffer for UndoableBuffer<T> {
    fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        self.record_op(char_offset, "", text);
        self.buffer.insert(char_offset, text);
    }

    fn delete(&mut self, char_range: Range<usize>) {
        let deleted = self
            .buffer
            .slice(char_range.clone())
            .map(|s| s.to_string())
            .unwrap_or_default();
        self.record_op(char_range.start, &deleted, "");
        self.buffer.delete(char_range);
    }

    fn replace(&mut self, char_range: Range<usize>, text: &str) {
        let deleted = self
            .buffer
            .slice(char_range.clone())
            .map(|s| s.to_string())
            .unwrap_or_default();
        self.record_op(char_range.start, &deleted, text);
        self.buffer.delete(char_range.clone());
        self.buffer.insert(char_range.start, text);
    }

    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        self.buffer.slice(char_range)
    }

    fn char_at(&self, char_offset: usize) -> Option<char> {
        self.buffer.char_at(char_offset)
    }

    fn to_string(&self) -> String {
        self.buffer.to_string()
    }
}

impl<T: TextBuffer> UndoManager for UndoableBuffer<T> {
    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn undo(&mut self) -> Option<Range<usize>> {
        let op = self.undo_stack.pop()?;
        let restored = self.swap(op.pos, &op.inserted, &op.deleted);
        self.redo_stack.push(op);
        Some(restored)
    }

    fn redo(&mut self) -> Option<Range<usize>> {
        let op = self.redo_stack.pop()?;
        let restored = self.swap(op.pos, &op.deleted, &op.inserted);
        self.undo_stack.push(op);
        Some(restored)
    }

    fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
