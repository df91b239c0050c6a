//! Debounced strike-through pairing.
//!
//! Some keyboards and input methods deliver `~~` as one two-char insertion,
//! others as two separate `~` insertions. The machine accumulates tilde
//! keystrokes and commits either immediately (a double key) or once the
//! debounce task fires:
//!
//! ```text
//! Idle --key--> Pending(count, selection, task) --key--> Pending(count+n, ..)
//!                       |                                     |
//!                       +---- task fired / double key --------+--> Idle
//! ```
//!
//! On commit, two or more tildes become a strike-through pair around the
//! originally selected text; a lone tilde is inserted as-is.
//!
//! The selection captured by the first keystroke is used at commit time even
//! if the caret has moved since.

use web_time::Instant;

use crate::actions::Range;
use crate::platform::TaskId;
use crate::transform::{Rewrite, RewriteKind, TildeKey};

/// A gesture in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTilde {
    /// Tildes seen so far.
    pub count: u32,
    /// Selection when the gesture started.
    pub selection: Range,
    /// Width chosen by the first keystroke.
    pub full_width: bool,
    /// Debounce task currently armed, if any.
    pub task: Option<TaskId>,
    started: Instant,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum TildeState {
    #[default]
    Idle,
    Pending(PendingTilde),
}

/// What the engine should do after a keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TildeStep {
    /// Commit now.
    Commit {
        commit: TildeCommit,
        cancel: Option<TaskId>,
    },
    /// Cancel the previous debounce task (if any) and arm a new one with
    /// [`TildeMachine::arm`].
    Wait { cancel: Option<TaskId> },
}

/// A finished gesture, ready to be turned into a rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TildeCommit {
    pub count: u32,
    pub selection: Range,
    pub full_width: bool,
}

impl TildeCommit {
    pub fn is_pair(&self) -> bool {
        self.count >= 2
    }

    /// The delimiter inserted on each side.
    pub fn token(&self) -> &'static str {
        match (self.is_pair(), self.full_width) {
            (true, false) => "~~",
            (true, true) => "～～",
            (false, false) => "~",
            (false, true) => "～",
        }
    }

    /// Build the rewrite given the text currently inside the captured
    /// selection.
    pub fn rewrite(&self, selected: &str) -> Rewrite {
        let token = self.token();
        let start = self.selection.start;
        let token_len = token.chars().count();

        if !self.is_pair() {
            return Rewrite {
                kind: RewriteKind::Tilde,
                range: self.selection,
                text: token.to_string(),
                selection: Range::caret(start + token_len),
            };
        }

        let inner = start + token_len;
        if self.selection.is_caret() {
            Rewrite {
                kind: RewriteKind::Tilde,
                range: self.selection,
                text: format!("{token}{token}"),
                selection: Range::caret(inner),
            }
        } else {
            Rewrite {
                kind: RewriteKind::Tilde,
                range: self.selection,
                text: format!("{token}{selected}{token}"),
                selection: Range::new(inner, inner + selected.chars().count()),
            }
        }
    }
}

/// The pairing state machine. One per engine, scoped to its surface.
#[derive(Debug, Default)]
pub struct TildeMachine {
    state: TildeState,
}

impl TildeMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TildeState {
        &self.state
    }

    /// Feed one qualifying keystroke. `selection` is only used when this
    /// keystroke starts a new gesture.
    pub fn press(&mut self, key: TildeKey, selection: Range) -> TildeStep {
        let mut pending = match std::mem::take(&mut self.state) {
            TildeState::Pending(p) => p,
            TildeState::Idle => PendingTilde {
                count: 0,
                selection,
                full_width: key.full_width,
                task: None,
                started: Instant::now(),
            },
        };

        pending.count += u32::from(key.count);
        let cancel = pending.task.take();

        if key.is_double() {
            let commit = Self::finish(pending);
            return TildeStep::Commit { commit, cancel };
        }

        self.state = TildeState::Pending(pending);
        TildeStep::Wait { cancel }
    }

    /// Record the debounce task armed for the pending gesture.
    pub fn arm(&mut self, task: TaskId) {
        if let TildeState::Pending(p) = &mut self.state {
            p.task = Some(task);
        }
    }

    /// The debounce task fired. Returns the commit if `task` is the armed one.
    pub fn fire(&mut self, task: TaskId) -> Option<TildeCommit> {
        match &self.state {
            TildeState::Pending(p) if p.task == Some(task) => {}
            _ => return None,
        }
        match std::mem::take(&mut self.state) {
            TildeState::Pending(p) => Some(Self::finish(p)),
            TildeState::Idle => None,
        }
    }

    fn finish(pending: PendingTilde) -> TildeCommit {
        tracing::trace!(
            count = pending.count,
            elapsed_ms = pending.started.elapsed().as_millis() as u64,
            "tilde gesture complete"
        );
        TildeCommit {
            count: pending.count,
            selection: pending.selection,
            full_width: pending.full_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE: TildeKey = TildeKey {
        count: 1,
        full_width: false,
    };
    const DOUBLE: TildeKey = TildeKey {
        count: 2,
        full_width: false,
    };
    const FULL_SINGLE: TildeKey = TildeKey {
        count: 1,
        full_width: true,
    };

    #[test]
    fn test_double_key_commits_immediately() {
        let mut m = TildeMachine::new();
        let step = m.press(DOUBLE, Range::caret(3));
        let TildeStep::Commit { commit, cancel } = step else {
            panic!("expected commit");
        };
        assert_eq!(cancel, None);
        assert_eq!(commit.count, 2);
        assert_eq!(commit.token(), "~~");
        assert_eq!(m.state(), &TildeState::Idle);
    }

    #[test]
    fn test_single_key_waits_then_fires() {
        let mut m = TildeMachine::new();
        assert_eq!(m.press(SINGLE, Range::caret(0)), TildeStep::Wait { cancel: None });
        m.arm(TaskId(1));
        assert!(matches!(
            m.state(),
            TildeState::Pending(PendingTilde { task: Some(TaskId(1)), .. })
        ));

        let commit = m.fire(TaskId(1)).unwrap();
        assert_eq!(commit.count, 1);
        assert_eq!(commit.token(), "~");
        assert_eq!(m.state(), &TildeState::Idle);
    }

    #[test]
    fn test_second_key_cancels_previous_task() {
        let mut m = TildeMachine::new();
        m.press(SINGLE, Range::caret(4));
        m.arm(TaskId(7));

        let step = m.press(SINGLE, Range::caret(5));
        assert_eq!(step, TildeStep::Wait { cancel: Some(TaskId(7)) });
        m.arm(TaskId(8));

        // The stale task is ignored.
        assert_eq!(m.fire(TaskId(7)), None);
        let commit = m.fire(TaskId(8)).unwrap();
        assert_eq!(commit.count, 2);
        // The selection from the first keystroke is kept.
        assert_eq!(commit.selection, Range::caret(4));
    }

    #[test]
    fn test_first_key_decides_width() {
        let mut m = TildeMachine::new();
        m.press(FULL_SINGLE, Range::caret(0));
        m.arm(TaskId(1));
        let TildeStep::Commit { commit, cancel } = m.press(DOUBLE, Range::caret(0)) else {
            panic!("expected commit");
        };
        assert_eq!(cancel, Some(TaskId(1)));
        assert!(commit.full_width);
        assert_eq!(commit.token(), "～～");
        assert_eq!(commit.count, 3);
    }

    #[test]
    fn test_pair_rewrite_collapsed() {
        let commit = TildeCommit {
            count: 2,
            selection: Range::caret(2),
            full_width: false,
        };
        let r = commit.rewrite("");
        assert_eq!(r.text, "~~~~");
        assert_eq!(r.selection, Range::caret(4));
    }

    #[test]
    fn test_pair_rewrite_wraps_selection() {
        let commit = TildeCommit {
            count: 2,
            selection: Range::new(1, 4),
            full_width: true,
        };
        let r = commit.rewrite("abc");
        assert_eq!(r.apply_to("xabcx"), "x～～abc～～x");
        assert_eq!(r.selection, Range::new(3, 6));
    }

    #[test]
    fn test_single_rewrite() {
        let commit = TildeCommit {
            count: 1,
            selection: Range::caret(1),
            full_width: true,
        };
        let r = commit.rewrite("");
        assert_eq!(r.apply_to("ab"), "a～b");
        assert_eq!(r.selection, Range::caret(2));
    }
}
