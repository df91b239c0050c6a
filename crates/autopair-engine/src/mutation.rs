//! Undo-friendly text mutation.
//!
//! Every rewrite the engine makes goes through here. The native strategy
//! issues the host's own insert/delete command so the edit lands in the
//! host's undo history like a keystroke. If that is unavailable the range is
//! written directly and a synthesized input notification is dispatched, so
//! other listeners still see a consistent edit (without native undo).

use crate::actions::{InputType, Range};
use crate::platform::{PlatformError, Surface};
use crate::transform::Rewrite;

/// Which path a mutation took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The host's native editing command.
    Native,
    /// Direct write plus a synthesized notification.
    Fallback,
}

/// Result of a mutation attempt. Callers must handle all three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied(Strategy),
    /// Nothing to do.
    Skipped,
    /// Both strategies failed; the surface is as the host left it.
    Failed(PlatformError),
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Replace `range` with `text`.
pub fn insert_at<S: Surface + ?Sized>(surface: &mut S, range: Range, text: &str) -> MutationOutcome {
    if range.is_caret() && text.is_empty() {
        return MutationOutcome::Skipped;
    }

    let native_err = match native_insert(surface, range, text) {
        Ok(()) => return MutationOutcome::Applied(Strategy::Native),
        Err(e) => e,
    };
    tracing::debug!(error = %native_err, "native insert unavailable, writing directly");

    if let Err(e) = surface.set_range_text(range, text) {
        tracing::warn!(native = %native_err, fallback = %e, "insert failed on both strategies");
        return MutationOutcome::Failed(e);
    }
    notify(surface, InputType::InsertText, Some(text));
    MutationOutcome::Applied(Strategy::Fallback)
}

/// Delete the selection, or the char before a collapsed caret.
pub fn delete_selection_or_backward<S: Surface + ?Sized>(surface: &mut S) -> MutationOutcome {
    let sel = surface.selection();
    if sel.is_caret() && sel.start == 0 {
        return MutationOutcome::Skipped;
    }

    surface.focus();
    let native_err = match surface.exec_delete() {
        Ok(()) => return MutationOutcome::Applied(Strategy::Native),
        Err(e) => e,
    };
    tracing::debug!(error = %native_err, "native delete unavailable, writing directly");

    let range = if sel.is_caret() {
        Range::new(sel.start - 1, sel.start)
    } else {
        sel
    };
    if let Err(e) = surface.set_range_text(range, "") {
        tracing::warn!(native = %native_err, fallback = %e, "delete failed on both strategies");
        return MutationOutcome::Failed(e);
    }
    notify(surface, InputType::DeleteContentBackward, None);
    MutationOutcome::Applied(Strategy::Fallback)
}

/// Apply a classified rewrite and move the selection to where it says.
///
/// Pure deletions go through [`delete_selection_or_backward`], everything
/// else through [`insert_at`]. A caret-only rewrite just moves the caret.
/// On failure the selection is put back, so the host's own edit acts on
/// what the user had selected.
pub fn apply_rewrite<S: Surface + ?Sized>(surface: &mut S, rewrite: &Rewrite) -> MutationOutcome {
    let original = surface.selection();
    let outcome = if rewrite.is_caret_only() {
        MutationOutcome::Skipped
    } else if rewrite.text.is_empty() {
        match surface.set_selection(rewrite.range) {
            Ok(()) => delete_selection_or_backward(surface),
            Err(e) => MutationOutcome::Failed(e),
        }
    } else {
        insert_at(surface, rewrite.range, &rewrite.text)
    };

    let selection = if outcome.is_failed() {
        original
    } else {
        rewrite.selection
    };
    if let Err(e) = surface.set_selection(selection) {
        tracing::debug!(error = %e, "could not place selection after rewrite");
    }
    outcome
}

/// The direct write already landed; a lost notification does not undo it.
fn notify<S: Surface + ?Sized>(surface: &mut S, input_type: InputType, data: Option<&str>) {
    if let Err(e) = surface.dispatch_input(input_type.clone(), data) {
        tracing::debug!(error = %e, %input_type, "synthesized input notification not delivered");
    }
}

fn native_insert<S: Surface + ?Sized>(
    surface: &mut S,
    range: Range,
    text: &str,
) -> Result<(), PlatformError> {
    surface.set_selection(range)?;
    surface.focus();
    surface.exec_insert_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessSurface, Notification};
    use crate::transform::RewriteKind;

    #[test]
    fn test_native_insert_records_undo() {
        let mut s = HeadlessSurface::from_marked("a|b");
        let out = insert_at(&mut s, Range::caret(1), "()");
        assert_eq!(out, MutationOutcome::Applied(Strategy::Native));
        assert_eq!(s.marked(), "a()|b");
        assert!(s.notifications().is_empty());
        assert!(s.undo());
        assert_eq!(s.text(), "ab");
    }

    #[test]
    fn test_fallback_insert_notifies() {
        let mut s = HeadlessSurface::from_marked("a|b");
        s.set_native_commands(false);
        let out = insert_at(&mut s, Range::caret(1), "()");
        assert_eq!(out, MutationOutcome::Applied(Strategy::Fallback));
        assert_eq!(s.marked(), "a()|b");
        assert_eq!(
            s.notifications(),
            &[Notification {
                input_type: InputType::InsertText,
                data: Some("()".into()),
            }]
        );
    }

    #[test]
    fn test_both_strategies_fail() {
        let mut s = HeadlessSurface::from_marked("a|b");
        s.set_native_commands(false);
        s.set_direct_writes(false);
        assert!(insert_at(&mut s, Range::caret(1), "x").is_failed());
        assert_eq!(s.marked(), "a|b");
    }

    #[test]
    fn test_fallback_write_survives_lost_notification() {
        let mut s = HeadlessSurface::from_marked("a|");
        s.set_native_commands(false);
        s.set_deliver_notifications(false);
        let out = insert_at(&mut s, Range::caret(1), "()");
        assert_eq!(out, MutationOutcome::Applied(Strategy::Fallback));
        assert_eq!(s.text(), "a()");
        assert!(s.notifications().is_empty());

        let mut s = HeadlessSurface::from_marked("a[bc]d");
        s.set_native_commands(false);
        s.set_deliver_notifications(false);
        let out = delete_selection_or_backward(&mut s);
        assert_eq!(out, MutationOutcome::Applied(Strategy::Fallback));
        assert_eq!(s.marked(), "a|d");
    }

    #[test]
    fn test_empty_insert_is_skipped() {
        let mut s = HeadlessSurface::from_marked("a|b");
        assert_eq!(insert_at(&mut s, Range::caret(1), ""), MutationOutcome::Skipped);
    }

    #[test]
    fn test_delete_backward() {
        let mut s = HeadlessSurface::from_marked("ab|");
        assert!(delete_selection_or_backward(&mut s).is_applied());
        assert_eq!(s.marked(), "a|");

        let mut s = HeadlessSurface::from_marked("|ab");
        assert_eq!(delete_selection_or_backward(&mut s), MutationOutcome::Skipped);
    }

    #[test]
    fn test_fallback_delete_selection() {
        let mut s = HeadlessSurface::from_marked("a[bc]d");
        s.set_native_commands(false);
        let out = delete_selection_or_backward(&mut s);
        assert_eq!(out, MutationOutcome::Applied(Strategy::Fallback));
        assert_eq!(s.marked(), "a|d");
        assert_eq!(s.notifications()[0].input_type, InputType::DeleteContentBackward);
    }

    #[test]
    fn test_apply_rewrite_places_selection() {
        let mut s = HeadlessSurface::from_marked("say [hi]");
        let rewrite = Rewrite {
            kind: RewriteKind::Wrap,
            range: Range::new(4, 6),
            text: "(hi)".into(),
            selection: Range::new(5, 7),
        };
        assert!(apply_rewrite(&mut s, &rewrite).is_applied());
        assert_eq!(s.marked(), "say ([hi])");
    }

    #[test]
    fn test_apply_pure_deletion_rewrite() {
        let mut s = HeadlessSurface::from_marked("x(|)y");
        let rewrite = Rewrite {
            kind: RewriteKind::DeletePair,
            range: Range::new(1, 3),
            text: String::new(),
            selection: Range::caret(1),
        };
        assert!(apply_rewrite(&mut s, &rewrite).is_applied());
        assert_eq!(s.marked(), "x|y");
        assert!(s.undo());
        assert_eq!(s.text(), "x()y");
    }

    #[test]
    fn test_failed_rewrite_restores_selection() {
        let mut s = HeadlessSurface::from_marked("x(|)y");
        s.set_native_commands(false);
        s.set_direct_writes(false);
        let rewrite = Rewrite {
            kind: RewriteKind::DeletePair,
            range: Range::new(1, 3),
            text: String::new(),
            selection: Range::caret(1),
        };
        assert!(apply_rewrite(&mut s, &rewrite).is_failed());
        assert_eq!(s.marked(), "x(|)y");
    }
}
