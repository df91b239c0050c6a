//! Classification of a single edit into the rewrite it should become.
//!
//! Both input channels describe an edit the same way, as "replace `range` of
//! the pre-edit text with `inserted`", and both call [`classify`]. They only
//! differ in how the resulting [`Rewrite`] lands on the surface: the
//! pre-input channel prevents the native edit and applies the rewrite as an
//! undoable insertion, the post-input channel overwrites the edit the host
//! already applied.

use crate::actions::Range;
use crate::config::EngineConfig;
use crate::pairs::{closing_for, is_distinct_closer, pair_for_open};

/// Markdown fence delimiter.
pub const FENCE: &str = "```";

/// One qualifying keystroke of the strike-through gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TildeKey {
    /// `1` for `~`/`～`, `2` for `~~`/`～～`.
    pub count: u8,
    /// `～` rather than `~`.
    pub full_width: bool,
}

impl TildeKey {
    /// Recognize the four tilde inputs.
    pub fn parse(text: &str) -> Option<Self> {
        let (count, full_width) = match text {
            "~" => (1, false),
            "~~" => (2, false),
            "～" => (1, true),
            "～～" => (2, true),
            _ => return None,
        };
        Some(Self { count, full_width })
    }

    /// A key that already carries both delimiters commits immediately.
    pub fn is_double(&self) -> bool {
        self.count >= 2
    }
}

/// An edit as seen from the pre-edit text.
#[derive(Debug, Clone, Copy)]
pub struct EditContext<'a> {
    /// Text the edit inserts.
    pub inserted: &'a str,
    /// Pre-edit range the edit replaces.
    pub range: Range,
    /// Pre-edit text inside `range`.
    pub selected: &'a str,
    /// Whether the user had a non-empty selection when the edit started.
    pub had_selection: bool,
    /// Pre-edit char right after `range`.
    pub next_char: Option<char>,
    /// The edit is a backspace that removed the single char in `range`
    /// from in front of a collapsed caret.
    pub backspace: bool,
}

impl<'a> EditContext<'a> {
    /// An insertion of `inserted` over `range`.
    pub fn insertion(
        inserted: &'a str,
        range: Range,
        selected: &'a str,
        next_char: Option<char>,
    ) -> Self {
        Self {
            inserted,
            range,
            selected,
            had_selection: !range.is_caret(),
            next_char,
            backspace: false,
        }
    }

    /// A backspace removing `removed`, the char in `range`, in front of a
    /// caret at `range.end`.
    pub fn backspace(removed: &'a str, range: Range, next_char: Option<char>) -> Self {
        Self {
            inserted: "",
            range,
            selected: removed,
            had_selection: false,
            next_char,
            backspace: true,
        }
    }

    fn single_inserted_char(&self) -> Option<char> {
        single_char(self.inserted)
    }
}

/// What kind of rewrite fired, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteKind {
    Fence,
    SkipOver,
    AutoClose,
    Wrap,
    DeletePair,
    /// Commit of the tilde pairing gesture.
    Tilde,
}

/// Replace `range` of the pre-edit text with `text`, then select `selection`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub kind: RewriteKind,
    pub range: Range,
    pub text: String,
    pub selection: Range,
}

impl Rewrite {
    /// Whether the rewrite only moves the caret.
    pub fn is_caret_only(&self) -> bool {
        self.range.is_caret() && self.text.is_empty()
    }

    /// Apply to `text` (the pre-edit text).
    pub fn apply_to(&self, text: &str) -> String {
        splice(text, self.range, &self.text)
    }
}

/// Classification result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Hand the keystroke to the tilde pairing machine.
    Tilde(TildeKey),
    /// Replace the edit with this rewrite.
    Rewrite(Rewrite),
    /// Let the edit stand.
    None,
}

/// Decide what an edit should become. First matching rule wins.
pub fn classify(ctx: &EditContext<'_>, config: &EngineConfig) -> Transform {
    if ctx.backspace {
        return delete_pair(ctx, config).map_or(Transform::None, Transform::Rewrite);
    }

    if config.tilde {
        if let Some(key) = TildeKey::parse(ctx.inserted) {
            return Transform::Tilde(key);
        }
    }

    let rewrite = fence(ctx, config)
        .or_else(|| skip_over(ctx, config))
        .or_else(|| auto_close(ctx, config));
    rewrite.map_or(Transform::None, Transform::Rewrite)
}

fn fence(ctx: &EditContext<'_>, config: &EngineConfig) -> Option<Rewrite> {
    if !config.fence || ctx.inserted != FENCE {
        return None;
    }

    let start = ctx.range.start;
    // Caret lands on the line after the opening fence.
    let inner = start + FENCE.len() + 1;
    let rewrite = if ctx.had_selection {
        Rewrite {
            kind: RewriteKind::Fence,
            range: ctx.range,
            text: format!("{FENCE}\n{}\n{FENCE}", ctx.selected),
            selection: Range::new(inner, inner + ctx.selected.chars().count()),
        }
    } else {
        Rewrite {
            kind: RewriteKind::Fence,
            range: ctx.range,
            text: format!("{FENCE}\n\n{FENCE}"),
            selection: Range::caret(inner),
        }
    };
    Some(rewrite)
}

fn skip_over(ctx: &EditContext<'_>, config: &EngineConfig) -> Option<Rewrite> {
    if !config.skip_over || ctx.had_selection {
        return None;
    }
    let ch = ctx.single_inserted_char()?;
    if !is_distinct_closer(ch) || ctx.next_char != Some(ch) {
        return None;
    }

    let at = ctx.range.start;
    Some(Rewrite {
        kind: RewriteKind::SkipOver,
        range: Range::caret(at),
        text: String::new(),
        selection: Range::caret(at + 1),
    })
}

fn auto_close(ctx: &EditContext<'_>, config: &EngineConfig) -> Option<Rewrite> {
    if !config.auto_close {
        return None;
    }
    let open = ctx.single_inserted_char()?;
    let close = closing_for(open)?;

    let start = ctx.range.start;
    let rewrite = if ctx.had_selection {
        Rewrite {
            kind: RewriteKind::Wrap,
            range: ctx.range,
            text: format!("{open}{}{close}", ctx.selected),
            selection: Range::new(start + 1, start + 1 + ctx.selected.chars().count()),
        }
    } else {
        Rewrite {
            kind: RewriteKind::AutoClose,
            range: ctx.range,
            text: format!("{open}{close}"),
            selection: Range::caret(start + 1),
        }
    };
    Some(rewrite)
}

fn delete_pair(ctx: &EditContext<'_>, config: &EngineConfig) -> Option<Rewrite> {
    if !config.delete_pairs || ctx.range.len() != 1 {
        return None;
    }
    let open = single_char(ctx.selected)?;
    let pair = pair_for_open(open)?;
    if ctx.next_char != Some(pair.close) {
        return None;
    }

    Some(Rewrite {
        kind: RewriteKind::DeletePair,
        range: Range::new(ctx.range.start, ctx.range.end + 1),
        text: String::new(),
        selection: Range::caret(ctx.range.start),
    })
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let ch = chars.next()?;
    chars.next().is_none().then_some(ch)
}

/// Replace the char range `range` of `text` with `with`.
pub fn splice(text: &str, range: Range, with: &str) -> String {
    let start = char_to_byte(text, range.start);
    let end = char_to_byte(text, range.end.max(range.start));
    let mut out = String::with_capacity(text.len() + with.len());
    out.push_str(&text[..start]);
    out.push_str(with);
    out.push_str(&text[end..]);
    out
}

/// Byte offset of char offset `offset`, clamped to the end of `text`.
pub fn char_to_byte(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Text in the char range `range`, clamped to `text`.
pub fn char_slice(text: &str, range: Range) -> &str {
    let start = char_to_byte(text, range.start);
    let end = char_to_byte(text, range.end.max(range.start));
    &text[start..end]
}
