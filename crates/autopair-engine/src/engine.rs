//! The input engine.
//!
//! One `InputEngine` is attached per editable surface and owns all state the
//! handlers share: the last snapshot, the tilde gesture, the open
//! composition session and the pending post-composition tasks. The host
//! forwards its input notifications to the `handle_*` methods and calls
//! [`InputEngine::run_task`] when a task it scheduled fires.
//!
//! Two channels apply the same classification:
//!
//! - before input: the edit has not happened yet. A match is applied through
//!   the undo-friendly mutation primitive and the host is told to prevent
//!   the native edit.
//! - after input: the edit already happened. The engine diffs against its
//!   snapshot, classifies the diff, and writes the compensating change
//!   directly.
//!
//! Every entry point is infallible. Failures are logged and the event is left
//! to the host.

use std::time::Duration;

use crate::accessor::{is_editable, resolve_editable};
use crate::actions::{InputEvent, InputType, Range};
use crate::collapse::find_duplicate_pair;
use crate::composition::{CompositionState, is_composing};
use crate::config::EngineConfig;
use crate::error::InputError;
use crate::headless::HeadlessHost;
use crate::mutation::apply_rewrite;
use crate::platform::{EditorHost, PlatformError, Surface, TaskId};
use crate::snapshot::{EditorSnapshot, TextDiff, diff};
use crate::tilde::{TildeCommit, TildeMachine, TildeState, TildeStep};
use crate::transform::{EditContext, TildeKey, Transform, char_slice, classify};

/// What the host should do with a before-input notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handling {
    /// The engine applied (or deferred) the edit itself. Prevent the native
    /// edit.
    Handled,
    /// Let the native edit proceed.
    PassThrough,
}

/// What the after-input pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    /// A compensating change was written.
    Rewritten,
    /// The edit needed no correction.
    Unchanged,
    /// The event was not for us, or arrived mid-composition.
    Ignored,
}

pub struct InputEngine<H: EditorHost> {
    host: H,
    config: EngineConfig,
    snapshot: EditorSnapshot,
    tilde: TildeMachine,
    composition: Option<CompositionState>,
    settle_tasks: Vec<TaskId>,
}

impl<H: EditorHost> InputEngine<H> {
    /// Attach to `host`, capturing the surface's current state.
    pub fn attach(host: H, config: EngineConfig) -> Self {
        let snapshot = host
            .lookup(&config.surface_id)
            .map(|surface| EditorSnapshot::capture(&*surface))
            .unwrap_or_default();
        tracing::debug!(surface = %config.surface_id, "input engine attached");
        Self {
            host,
            config,
            snapshot,
            tilde: TildeMachine::new(),
            composition: None,
            settle_tasks: Vec::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The state the next after-input pass will diff against.
    pub fn snapshot(&self) -> &EditorSnapshot {
        &self.snapshot
    }

    pub fn tilde_state(&self) -> &TildeState {
        self.tilde.state()
    }

    pub fn composition(&self) -> Option<&CompositionState> {
        self.composition.as_ref()
    }

    /// Whether the engine currently owns pairing on its surface.
    ///
    /// Hosts with their own bracket handling on key events check this and
    /// stand down so the same keystroke is not paired twice.
    pub fn is_active(&self) -> bool {
        self.host
            .lookup(&self.config.surface_id)
            .is_some_and(|surface| is_editable(surface))
    }

    /// Handle a notification fired before the host applies an edit.
    pub fn handle_before_input(&mut self, event: &InputEvent) -> Handling {
        match self.before_input(event) {
            Ok(handling) => handling,
            Err(err) => {
                log_skip(&err, "before input");
                Handling::PassThrough
            }
        }
    }

    /// Handle a notification fired after the host applied an edit.
    pub fn handle_input(&mut self, event: &InputEvent) -> Reconcile {
        if event.target != self.config.surface_id {
            return Reconcile::Ignored;
        }
        if is_composing(event) || self.composition.is_some() {
            if let (Some(session), Some(data)) = (self.composition.as_mut(), event.text()) {
                session.text = data.to_string();
            }
            return Reconcile::Ignored;
        }
        match self.reconcile() {
            Ok(outcome) => outcome,
            Err(err) => {
                log_skip(&err, "input");
                Reconcile::Ignored
            }
        }
    }

    pub fn handle_composition_start(&mut self, event: &InputEvent) {
        if event.target != self.config.surface_id {
            return;
        }
        let Some(surface) = self.host.lookup(&self.config.surface_id) else {
            return;
        };
        let start = surface.selection().start;
        tracing::trace!(start, "composition started");
        self.composition = Some(CompositionState::new(start, String::new()));
    }

    /// Close the composition session and schedule the settle pass, which
    /// reconciles the committed text and collapses duplicate pairs.
    pub fn handle_composition_end(&mut self, event: &InputEvent) {
        if event.target != self.config.surface_id {
            return;
        }
        if let Some(session) = self.composition.take() {
            tracing::trace!(
                start = session.start_offset,
                end = session.end_offset(),
                "composition ended"
            );
        }
        let task = self.host.schedule(self.config.composition_settle());
        self.settle_tasks.push(task);
    }

    /// The caret moved without an edit.
    pub fn handle_selection_change(&mut self) {
        if self.composition.is_some() {
            return;
        }
        if let Some(surface) = self.host.lookup(&self.config.surface_id) {
            let current = EditorSnapshot::capture(surface);
            sync_selection(&mut self.snapshot, current);
        }
    }

    /// A task scheduled through [`EditorHost::schedule`] fired.
    pub fn run_task(&mut self, task: TaskId) {
        if let Some(pos) = self.settle_tasks.iter().position(|t| *t == task) {
            self.settle_tasks.swap_remove(pos);
            self.settle_composition();
        } else if let Some(commit) = self.tilde.fire(task) {
            self.commit_tilde(commit);
        } else {
            tracing::trace!(?task, "stale task ignored");
        }
    }

    fn before_input(&mut self, event: &InputEvent) -> Result<Handling, InputError> {
        if event.target != self.config.surface_id {
            return Ok(Handling::PassThrough);
        }
        let surface = resolve_editable(&mut self.host, &self.config.surface_id)?;
        if is_composing(event) || self.composition.is_some() {
            return Ok(Handling::PassThrough);
        }

        let current = EditorSnapshot::capture(&*surface);
        sync_selection(&mut self.snapshot, current.clone());

        let transform = if event.input_type.is_text_insertion() {
            let data = event
                .text()
                .ok_or(InputError::MalformedEvent("insertion without data"))?;
            let sel = current.selection;
            let ctx = EditContext::insertion(
                data,
                sel,
                char_slice(&current.text, sel),
                current.text.chars().nth(sel.end),
            );
            classify(&ctx, &self.config)
        } else if event.input_type == InputType::DeleteContentBackward {
            classify_backspace(&current, &self.config)
        } else {
            Transform::None
        };

        match transform {
            Transform::None => Ok(Handling::PassThrough),
            Transform::Tilde(key) => {
                self.press_tilde(key, current.selection);
                Ok(Handling::Handled)
            }
            Transform::Rewrite(rewrite) => {
                let outcome = apply_rewrite(surface, &rewrite);
                if outcome.is_failed() {
                    return Ok(Handling::PassThrough);
                }
                tracing::debug!(kind = ?rewrite.kind, ?outcome, "rewrote before input");
                self.snapshot = EditorSnapshot::capture(&*surface);
                Ok(Handling::Handled)
            }
        }
    }

    /// Diff, correct, and always leave the snapshot matching the surface.
    fn reconcile(&mut self) -> Result<Reconcile, InputError> {
        let outcome = self.reconcile_edit();
        if let Some(surface) = self.host.lookup(&self.config.surface_id) {
            self.snapshot = EditorSnapshot::capture(surface);
        }
        outcome
    }

    fn reconcile_edit(&mut self) -> Result<Reconcile, InputError> {
        let surface = resolve_editable(&mut self.host, &self.config.surface_id)?;
        let current = surface.value();
        let edit = self.snapshot.diff_to(&current);
        tracing::trace!(
            start = edit.start,
            removed = %edit.removed,
            inserted = %edit.inserted,
            "input diff"
        );
        if edit.is_empty() {
            return Ok(Reconcile::Unchanged);
        }

        match classify_edit(&self.snapshot, &edit, &self.config) {
            Transform::None => Ok(Reconcile::Unchanged),
            Transform::Rewrite(rewrite) => {
                let target = rewrite.apply_to(&self.snapshot.text);
                overwrite(surface, &current, &target, rewrite.selection)?;
                tracing::debug!(kind = ?rewrite.kind, "rewrote after input");
                Ok(Reconcile::Rewritten)
            }
            Transform::Tilde(key) => {
                // Undo the raw tilde so the gesture is applied exactly once.
                overwrite(
                    surface,
                    &current,
                    &self.snapshot.text,
                    self.snapshot.selection,
                )?;
                self.press_tilde(key, edit.removed_range());
                Ok(Reconcile::Rewritten)
            }
        }
    }

    fn press_tilde(&mut self, key: TildeKey, selection: Range) {
        match self.tilde.press(key, selection) {
            TildeStep::Commit { commit, cancel } => {
                if let Some(task) = cancel {
                    self.host.cancel(task);
                }
                self.commit_tilde(commit);
            }
            TildeStep::Wait { cancel } => {
                if let Some(task) = cancel {
                    self.host.cancel(task);
                }
                let task = self.host.schedule(self.config.tilde_debounce());
                self.tilde.arm(task);
                tracing::debug!(?task, "tilde gesture pending");
            }
        }
    }

    fn commit_tilde(&mut self, commit: TildeCommit) {
        if let Err(err) = self.try_commit_tilde(commit) {
            log_skip(&err, "tilde commit");
        }
    }

    fn try_commit_tilde(&mut self, commit: TildeCommit) -> Result<(), InputError> {
        // The surface may have been hidden or removed since the gesture began.
        let surface = resolve_editable(&mut self.host, &self.config.surface_id)?;
        let text = surface.value();
        let selection = commit.selection.clamp(text.chars().count());
        let commit = TildeCommit { selection, ..commit };
        let rewrite = commit.rewrite(char_slice(&text, selection));
        let outcome = apply_rewrite(surface, &rewrite);
        tracing::debug!(count = commit.count, ?outcome, "tilde gesture committed");
        self.snapshot = EditorSnapshot::capture(&*surface);
        Ok(())
    }

    fn settle_composition(&mut self) {
        if self.composition.is_some() {
            tracing::trace!("new composition open, settle skipped");
            return;
        }
        if let Err(err) = self.reconcile() {
            log_skip(&err, "composition settle");
        }
        if self.config.collapse_duplicates {
            if let Err(err) = self.collapse_at_caret() {
                log_skip(&err, "collapse");
            }
        }
    }

    fn collapse_at_caret(&mut self) -> Result<bool, InputError> {
        let surface = resolve_editable(&mut self.host, &self.config.surface_id)?;
        let sel = surface.selection();
        if !sel.is_caret() {
            return Ok(false);
        }
        let text = surface.value();
        let Some(rewrite) = find_duplicate_pair(&text, sel.start) else {
            return Ok(false);
        };
        overwrite(surface, &text, &rewrite.apply_to(&text), rewrite.selection)?;
        tracing::debug!(at = sel.start, "collapsed duplicate pair");
        self.snapshot = EditorSnapshot::capture(&*surface);
        Ok(true)
    }
}

impl InputEngine<HeadlessHost> {
    /// Move the headless clock forward, running every task that comes due,
    /// including zero-delay tasks scheduled by the ones that ran.
    pub fn advance(&mut self, by: Duration) {
        let mut due = self.host.advance(by);
        while !due.is_empty() {
            for task in due {
                self.run_task(task);
            }
            due = self.host.advance(Duration::ZERO);
        }
    }

    /// Type `text` the way a browser would: before-input first, then the
    /// native edit and after-input only if the engine passed.
    pub fn type_text(&mut self, text: &str) -> Handling {
        let event = InputEvent::insert_text(self.config.surface_id.clone(), text);
        let handling = self.handle_before_input(&event);
        if handling == Handling::PassThrough {
            self.host.surface_mut().type_native(text);
            self.handle_input(&event);
        }
        handling
    }

    /// Type `text` on a host that never fires before-input, so only the
    /// after-input pass can correct it.
    pub fn type_raw(&mut self, text: &str) -> Reconcile {
        let event = InputEvent::insert_text(self.config.surface_id.clone(), text);
        self.host.surface_mut().type_native(text);
        self.handle_input(&event)
    }

    pub fn backspace(&mut self) -> Handling {
        let event = InputEvent::new(
            self.config.surface_id.clone(),
            InputType::DeleteContentBackward,
            None,
        );
        let handling = self.handle_before_input(&event);
        if handling == Handling::PassThrough {
            self.host.surface_mut().backspace_native();
            self.handle_input(&event);
        }
        handling
    }

    pub fn backspace_raw(&mut self) -> Reconcile {
        let event = InputEvent::new(
            self.config.surface_id.clone(),
            InputType::DeleteContentBackward,
            None,
        );
        self.host.surface_mut().backspace_native();
        self.handle_input(&event)
    }

    /// Run a whole IME session that commits `text`. The settle pass is
    /// scheduled but not run; call [`Self::advance`] for that.
    pub fn compose(&mut self, text: &str) {
        let id = self.config.surface_id.clone();
        self.handle_composition_start(&InputEvent::new(
            id.clone(),
            InputType::InsertCompositionText,
            None,
        ));
        let update = InputEvent::new(id.clone(), InputType::InsertCompositionText, Some(text))
            .composing();
        self.handle_before_input(&update);
        self.host.surface_mut().type_native(text);
        self.handle_input(&update);
        let end = InputEvent::new(id, InputType::InsertFromComposition, Some(text));
        self.handle_composition_end(&end);
    }
}

fn classify_backspace(current: &EditorSnapshot, config: &EngineConfig) -> Transform {
    let sel = current.selection;
    if !sel.is_caret() || sel.start == 0 {
        return Transform::None;
    }
    let range = Range::new(sel.start - 1, sel.start);
    let removed = char_slice(&current.text, range);
    let next_char = current.text.chars().nth(sel.start);
    classify(&EditContext::backspace(removed, range, next_char), config)
}

/// Classify an edit the host already applied, in pre-edit coordinates.
fn classify_edit(prev: &EditorSnapshot, edit: &TextDiff, config: &EngineConfig) -> Transform {
    let range = edit.removed_range();
    let next_char = prev.text.chars().nth(range.end);

    if edit.inserted.is_empty() {
        let backspace =
            range.len() == 1 && !prev.had_selection() && prev.selection.start == range.end;
        if !backspace {
            return Transform::None;
        }
        return classify(&EditContext::backspace(&edit.removed, range, next_char), config);
    }

    let ctx = EditContext {
        inserted: &edit.inserted,
        range,
        selected: &edit.removed,
        had_selection: prev.had_selection() || !edit.removed.is_empty(),
        next_char,
        backspace: false,
    };
    classify(&ctx, config)
}

/// Directly rewrite `current` into `target` with one range write.
fn overwrite<S: Surface + ?Sized>(
    surface: &mut S,
    current: &str,
    target: &str,
    selection: Range,
) -> Result<(), PlatformError> {
    let fix = diff(current, target);
    if !fix.is_empty() {
        surface.set_range_text(fix.removed_range(), &fix.inserted)?;
    }
    surface.set_selection(selection)
}

/// Take the caret from `current` if the text still matches, so an edit not
/// yet reconciled is not lost.
fn sync_selection(snapshot: &mut EditorSnapshot, current: EditorSnapshot) {
    if current.text == snapshot.text {
        *snapshot = current;
    }
}

fn log_skip(err: &InputError, stage: &'static str) {
    if err.is_resolution() {
        tracing::trace!(error = %err, stage, "event skipped");
    } else {
        tracing::debug!(error = %err, stage, "event skipped");
    }
}
