//! In-memory host for tests and non-DOM embedders.
//!
//! `HeadlessSurface` behaves like a `<textarea>`: native commands go through
//! an undo history, direct writes bypass (and invalidate) it, and synthesized
//! input notifications are recorded instead of dispatched. `HeadlessHost`
//! pairs one surface with a virtual-clock scheduler.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::actions::{InputType, Range, SurfaceId};
use crate::platform::{EditorHost, PlatformError, Surface, TaskId};
use crate::text::{EditorRope, TextBuffer};
use crate::undo::{UndoManager, UndoableBuffer};

const MAX_UNDO_STEPS: usize = 100;

/// A synthesized input notification captured by the headless surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub input_type: InputType,
    pub data: Option<String>,
}

/// A plain-text surface held in memory.
#[derive(Clone)]
pub struct HeadlessSurface {
    buffer: UndoableBuffer<EditorRope>,
    selection: Range,
    displayed: bool,
    visible: bool,
    disabled: bool,
    native_commands: bool,
    direct_writes: bool,
    deliver_notifications: bool,
    notifications: Vec<Notification>,
}

impl HeadlessSurface {
    /// A surface holding `text` with the caret at the end.
    pub fn new(text: &str) -> Self {
        let buffer = UndoableBuffer::new(EditorRope::from_str(text), MAX_UNDO_STEPS);
        let end = buffer.len_chars();
        Self {
            buffer,
            selection: Range::caret(end),
            displayed: true,
            visible: true,
            disabled: false,
            native_commands: true,
            direct_writes: true,
            deliver_notifications: true,
            notifications: Vec::new(),
        }
    }

    /// Parse `|` as the caret and `[`/`]` as selection bounds.
    ///
    /// `"a(|)"` is a caret between the parens, `"say [hi]"` selects `hi`.
    /// The markers themselves are not part of the text.
    pub fn from_marked(marked: &str) -> Self {
        let (text, selection) = parse_marked(marked);
        let mut surface = Self::new(&text);
        surface.selection = selection;
        surface
    }

    /// Render text with the same markers [`Self::from_marked`] accepts.
    pub fn marked(&self) -> String {
        render_marked(&self.buffer.to_string(), self.selection)
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn set_displayed(&mut self, displayed: bool) {
        self.displayed = displayed;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Make `exec_insert_text`/`exec_delete` fail, forcing the fallback path.
    pub fn set_native_commands(&mut self, enabled: bool) {
        self.native_commands = enabled;
    }

    /// Make direct writes fail too.
    pub fn set_direct_writes(&mut self, enabled: bool) {
        self.direct_writes = enabled;
    }

    /// Make `dispatch_input` fail without recording anything.
    pub fn set_deliver_notifications(&mut self, enabled: bool) {
        self.deliver_notifications = enabled;
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn can_undo(&self) -> bool {
        self.buffer.can_undo()
    }

    /// Undo the last native edit, selecting the restored text.
    pub fn undo(&mut self) -> bool {
        match self.buffer.undo() {
            Some(restored) => {
                self.selection = Range::new(restored.start, restored.end);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone edit, placing the caret after it.
    pub fn redo(&mut self) -> bool {
        match self.buffer.redo() {
            Some(restored) => {
                self.selection = Range::caret(restored.end);
                true
            }
            None => false,
        }
    }

    /// Type `text` the way the host would without any interception: replace
    /// the selection natively and leave the caret after it.
    pub fn type_native(&mut self, text: &str) {
        let sel = self.selection;
        self.buffer.replace(sel.start..sel.end, text);
        self.selection = Range::caret(sel.start + text.chars().count());
    }

    /// Backspace the way the host would without any interception.
    pub fn backspace_native(&mut self) {
        let sel = self.selection;
        if !sel.is_caret() {
            self.buffer.delete(sel.start..sel.end);
            self.selection = Range::caret(sel.start);
        } else if sel.start > 0 {
            self.buffer.delete(sel.start - 1..sel.start);
            self.selection = Range::caret(sel.start - 1);
        }
    }

    fn check_direct(&self) -> Result<(), PlatformError> {
        if self.direct_writes {
            Ok(())
        } else {
            Err("direct writes rejected".into())
        }
    }

    fn check_native(&self) -> Result<(), PlatformError> {
        if self.native_commands {
            Ok(())
        } else {
            Err("native editing commands unavailable".into())
        }
    }
}

impl std::fmt::Debug for HeadlessSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessSurface")
            .field("text", &self.marked())
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

impl Surface for HeadlessSurface {
    fn value(&self) -> String {
        self.buffer.to_string()
    }

    fn selection(&self) -> Range {
        self.selection
    }

    fn set_selection(&mut self, range: Range) -> Result<(), PlatformError> {
        self.selection = range.normalize().clamp(self.buffer.len_chars());
        Ok(())
    }

    fn is_displayed(&self) -> bool {
        self.displayed
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn exec_insert_text(&mut self, text: &str) -> Result<(), PlatformError> {
        self.check_native()?;
        self.type_native(text);
        Ok(())
    }

    fn exec_delete(&mut self) -> Result<(), PlatformError> {
        self.check_native()?;
        self.backspace_native();
        Ok(())
    }

    fn set_range_text(&mut self, range: Range, text: &str) -> Result<(), PlatformError> {
        self.check_direct()?;
        let range = range.normalize().clamp(self.buffer.len_chars());
        self.buffer.inner_mut().replace(range.start..range.end, text);
        self.buffer.clear_history();
        self.selection = Range::caret(range.start + text.chars().count());
        Ok(())
    }

    fn dispatch_input(
        &mut self,
        input_type: InputType,
        data: Option<&str>,
    ) -> Result<(), PlatformError> {
        if !self.deliver_notifications {
            return Err("input notification rejected".into());
        }
        self.notifications.push(Notification {
            input_type,
            data: data.map(str::to_string),
        });
        Ok(())
    }
}

/// One surface plus a deterministic scheduler.
#[derive(Debug)]
pub struct HeadlessHost {
    id: SurfaceId,
    surface: HeadlessSurface,
    attached: bool,
    now: Duration,
    next_task: u64,
    tasks: BTreeMap<TaskId, Duration>,
}

impl HeadlessHost {
    pub fn new(id: impl Into<SurfaceId>, surface: HeadlessSurface) -> Self {
        Self {
            id: id.into(),
            surface,
            attached: true,
            now: Duration::ZERO,
            next_task: 1,
            tasks: BTreeMap::new(),
        }
    }

    /// The surface, whether or not it is still attached.
    pub fn surface(&self) -> &HeadlessSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut HeadlessSurface {
        &mut self.surface
    }

    /// Tear the surface down; later lookups resolve to nothing.
    pub fn remove_surface(&mut self) {
        self.attached = false;
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Tasks scheduled and not yet fired or cancelled.
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Move the clock forward and return the tasks now due, earliest first.
    pub fn advance(&mut self, by: Duration) -> Vec<TaskId> {
        self.now += by;
        let mut due: Vec<(Duration, TaskId)> = self
            .tasks
            .iter()
            .filter(|(_, at)| **at <= self.now)
            .map(|(task, at)| (*at, *task))
            .collect();
        due.sort();
        for (_, task) in &due {
            self.tasks.remove(task);
        }
        due.into_iter().map(|(_, task)| task).collect()
    }
}

impl EditorHost for HeadlessHost {
    type Surface = HeadlessSurface;

    fn lookup(&self, id: &SurfaceId) -> Option<&HeadlessSurface> {
        (self.attached && *id == self.id).then_some(&self.surface)
    }

    fn resolve(&mut self, id: &SurfaceId) -> Option<&mut HeadlessSurface> {
        if self.attached && *id == self.id {
            Some(&mut self.surface)
        } else {
            None
        }
    }

    fn schedule(&mut self, delay: Duration) -> TaskId {
        let task = TaskId(self.next_task);
        self.next_task += 1;
        self.tasks.insert(task, self.now + delay);
        task
    }

    fn cancel(&mut self, task: TaskId) {
        self.tasks.remove(&task);
    }
}

fn parse_marked(marked: &str) -> (String, Range) {
    let mut text = String::with_capacity(marked.len());
    let mut start = None;
    let mut end = None;
    let mut offset = 0;
    for ch in marked.chars() {
        match ch {
            '|' => {
                start = Some(offset);
                end = Some(offset);
            }
            '[' if start.is_none() => start = Some(offset),
            ']' if start.is_some() && end.is_none() => end = Some(offset),
            _ => {
                text.push(ch);
                offset += 1;
            }
        }
    }
    let start = start.unwrap_or(offset);
    let end = end.unwrap_or(start);
    (text, Range::new(start, end))
}

fn render_marked(text: &str, selection: Range) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    let len = text.chars().count();
    for (i, ch) in text.chars().enumerate() {
        push_marker(&mut out, i, selection);
        out.push(ch);
    }
    push_marker(&mut out, len, selection);
    out
}

fn push_marker(out: &mut String, offset: usize, selection: Range) {
    if selection.is_caret() {
        if offset == selection.start {
            out.push('|');
        }
    } else if offset == selection.start {
        out.push('[');
    } else if offset == selection.end {
        out.push(']');
    }
}
