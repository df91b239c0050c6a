//! Delimiter pair table.
//!
//! Maps every opening delimiter the engine knows about to its closing
//! delimiter. ASCII brackets and quotes come first, followed by the CJK
//! bracket and curly-quote variants that show up when typing through an
//! input method.
//!
//! `*`, `_`, `"`, `'` and `` ` `` close with themselves. Those are Markdown
//! emphasis markers and typed quotes, and the skip-over rule treats them
//! differently from bracket-like pairs: typing one always auto-closes, it is
//! never "typed through".

/// A single opening/closing delimiter pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairEntry {
    pub open: char,
    pub close: char,
}

impl PairEntry {
    pub const fn new(open: char, close: char) -> Self {
        Self { open, close }
    }

    /// Whether the pair closes with the same character it opens with.
    pub const fn is_self_closing(&self) -> bool {
        self.open == self.close
    }
}

/// Every pair, in lookup order.
pub const PAIRS: &[PairEntry] = &[
    PairEntry::new('(', ')'),
    PairEntry::new('[', ']'),
    PairEntry::new('{', '}'),
    PairEntry::new('"', '"'),
    PairEntry::new('\'', '\''),
    PairEntry::new('`', '`'),
    PairEntry::new('*', '*'),
    PairEntry::new('_', '_'),
    // 《》
    PairEntry::new('\u{300A}', '\u{300B}'),
    // 【】
    PairEntry::new('\u{3010}', '\u{3011}'),
    // （）
    PairEntry::new('\u{FF08}', '\u{FF09}'),
    // 「」
    PairEntry::new('\u{300C}', '\u{300D}'),
    // 『』
    PairEntry::new('\u{300E}', '\u{300F}'),
    // “”
    PairEntry::new('\u{201C}', '\u{201D}'),
    // ‘’
    PairEntry::new('\u{2018}', '\u{2019}'),
];

/// Look up the pair opened by `ch`.
pub fn pair_for_open(ch: char) -> Option<&'static PairEntry> {
    PAIRS.iter().find(|pair| pair.open == ch)
}

/// The closing delimiter for `ch`, if `ch` opens a pair.
pub fn closing_for(ch: char) -> Option<char> {
    pair_for_open(ch).map(|pair| pair.close)
}

/// Whether `ch` opens some pair.
pub fn is_opener(ch: char) -> bool {
    pair_for_open(ch).is_some()
}

/// Whether `ch` only ever appears as the closing half of a pair.
///
/// These are the characters the skip-over rule applies to: `)`, `]`, `》`
/// and friends. Self-closing delimiters are openers and never qualify.
pub fn is_distinct_closer(ch: char) -> bool {
    !is_opener(ch) && PAIRS.iter().any(|pair| pair.close == ch)
}

/// Pairs whose open and close characters differ.
pub fn distinct_pairs() -> impl Iterator<Item = &'static PairEntry> {
    PAIRS.iter().filter(|pair| !pair.is_self_closing())
}
