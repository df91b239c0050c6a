//! Post-composition cleanup of nested duplicate pairs.
//!
//! Committing IME text next to auto-closed brackets can leave runs such as
//! `《《《|》》》`. Once composition settles, the run around the caret is
//! collapsed back to a single pair.

use crate::actions::Range;
use crate::pairs::distinct_pairs;
use crate::transform::{Rewrite, RewriteKind};

/// Find a duplicate run around a collapsed caret at `caret` in `text`.
///
/// Only pairs with distinct open/close characters qualify, and both runs
/// must be at least two long.
pub fn find_duplicate_pair(text: &str, caret: usize) -> Option<Rewrite> {
    let chars: Vec<char> = text.chars().collect();
    if caret == 0 || caret >= chars.len() {
        return None;
    }

    let left = chars[caret - 1];
    let right = chars[caret];
    let pair = distinct_pairs().find(|pair| pair.open == left && pair.close == right)?;

    let open_run = chars[..caret]
        .iter()
        .rev()
        .take_while(|&&c| c == pair.open)
        .count();
    let close_run = chars[caret..]
        .iter()
        .take_while(|&&c| c == pair.close)
        .count();
    if open_run < 2 || close_run < 2 {
        return None;
    }

    let start = caret - open_run;
    Some(Rewrite {
        kind: RewriteKind::AutoClose,
        range: Range::new(start, caret + close_run),
        text: format!("{}{}", pair.open, pair.close),
        selection: Range::caret(start + 1),
    })
}
