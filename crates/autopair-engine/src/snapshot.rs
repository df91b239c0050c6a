//! Snapshot tracking and after-the-fact diffing.
//!
//! The post-input channel only sees the surface after the host has applied
//! an edit. To recover what the edit was, the engine keeps the last observed
//! `(text, selection)` and diffs against it by longest common prefix and
//! suffix.

use crate::actions::Range;
use crate::platform::Surface;

/// The last observed state of the surface.
///
/// Replaced wholesale after every handled event. `selection` is ordered and
/// within `text` at rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorSnapshot {
    pub text: String,
    pub selection: Range,
}

impl EditorSnapshot {
    pub fn new(text: impl Into<String>, selection: Range) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            text,
            selection: selection.normalize().clamp(len),
        }
    }

    /// Read the current state of `surface`.
    pub fn capture<S: Surface + ?Sized>(surface: &S) -> Self {
        Self::new(surface.value(), surface.selection())
    }

    pub fn had_selection(&self) -> bool {
        !self.selection.is_caret()
    }

    /// Diff `current` against this snapshot.
    ///
    /// The edit is first read as "the recorded selection was replaced": the
    /// common prefix may not pass the selection start and the common suffix
    /// may not reach into the selection. If that reading replaces exactly the
    /// recorded selection it is used, which puts an insertion typed next to an
    /// identical character at the caret rather than after the run. Otherwise
    /// (a programmatic edit elsewhere, a stale caret) the minimal diff is used.
    pub fn diff_to(&self, current: &str) -> TextDiff {
        let prev: Vec<char> = self.text.chars().collect();
        let cur: Vec<char> = current.chars().collect();

        let suffix_limit = prev.len().saturating_sub(self.selection.end);
        let anchored = diff_chars(&prev, &cur, self.selection.start, suffix_limit);
        if anchored.removed_range() == self.selection {
            return anchored;
        }
        diff_chars(&prev, &cur, usize::MAX, usize::MAX)
    }
}

/// A single contiguous replacement turning one text into another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextDiff {
    /// Char offset of the first differing position, in both texts.
    pub start: usize,
    /// Chars present before and gone after.
    pub removed: String,
    /// Chars present after and absent before.
    pub inserted: String,
}

impl TextDiff {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.inserted.is_empty()
    }

    /// The replaced range, in pre-edit coordinates.
    pub fn removed_range(&self) -> Range {
        Range::new(self.start, self.start + self.removed.chars().count())
    }
}

/// Minimal diff between `prev` and `cur`.
pub fn diff(prev: &str, cur: &str) -> TextDiff {
    let prev: Vec<char> = prev.chars().collect();
    let cur: Vec<char> = cur.chars().collect();
    diff_chars(&prev, &cur, usize::MAX, usize::MAX)
}

fn diff_chars(
    prev: &[char],
    cur: &[char],
    prefix_limit: usize,
    suffix_limit: usize,
) -> TextDiff {
    let min_len = prev.len().min(cur.len()).min(prefix_limit);
    let mut a = 0;
    while a < min_len && prev[a] == cur[a] {
        a += 1;
    }

    let prev_remain = prev.len() - a;
    let cur_remain = cur.len() - a;
    let mut b = 0;
    while b < prev_remain
        && b < cur_remain
        && b < suffix_limit
        && prev[prev.len() - 1 - b] == cur[cur.len() - 1 - b]
    {
        b += 1;
    }

    TextDiff {
        start: a,
        removed: prev[a..prev.len() - b].iter().collect(),
        inserted: cur[a..cur.len() - b].iter().collect(),
    }
}
