//! Strike-through pairing through the debounced tilde gesture.

mod common;

use std::time::Duration;

use autopair_engine::{EngineConfig, Handling, Range, TildeState};
use common::{DEBOUNCE, engine, engine_with, render, state};

#[test]
fn test_two_keystrokes_match_one_double_keystroke() {
    let mut split = engine("ab|cd");
    assert_eq!(split.type_text("~"), Handling::Handled);
    assert_eq!(split.type_text("~"), Handling::Handled);
    split.advance(DEBOUNCE);

    let mut double = engine("ab|cd");
    assert_eq!(double.type_text("~~"), Handling::Handled);

    assert_eq!(state(&split), ("ab~~~~cd".to_string(), Range::caret(4)));
    assert_eq!(state(&split), state(&double));
}

#[test]
fn test_double_keystroke_commits_immediately() {
    let mut e = engine("|");
    e.type_text("～～");
    insta::assert_snapshot!(render(&e), @"～～|～～");
    assert_eq!(e.tilde_state(), &TildeState::Idle);
    assert_eq!(e.host().pending_tasks(), 0);
}

#[test]
fn test_lone_tilde_commits_after_quiet_period() {
    let mut e = engine("ab|cd");
    e.type_text("~");
    e.advance(Duration::from_millis(100));
    insta::assert_snapshot!(render(&e), @"ab|cd");
    assert!(matches!(e.tilde_state(), TildeState::Pending(_)));

    e.advance(DEBOUNCE);
    insta::assert_snapshot!(render(&e), @"ab~|cd");
    assert_eq!(e.tilde_state(), &TildeState::Idle);
}

#[test]
fn test_each_keystroke_restarts_the_window() {
    let mut e = engine("|");
    e.type_text("~");
    e.advance(Duration::from_millis(200));
    e.type_text("~");
    e.advance(Duration::from_millis(200));
    insta::assert_snapshot!(render(&e), @"|");
    assert_eq!(e.host().pending_tasks(), 1);

    e.advance(Duration::from_millis(100));
    insta::assert_snapshot!(render(&e), @"~~|~~");
}

#[test]
fn test_first_keystroke_picks_width() {
    let mut e = engine("|");
    e.type_text("～");
    e.type_text("~");
    e.advance(DEBOUNCE);
    insta::assert_snapshot!(render(&e), @"～～|～～");
}

#[test]
fn test_pair_wraps_selection() {
    let mut e = engine("say [hi]");
    e.type_text("~~");
    insta::assert_snapshot!(render(&e), @"say ~~[hi]~~");
}

#[test]
fn test_lone_tilde_replaces_selection() {
    let mut e = engine("say [hi]");
    e.type_text("~");
    e.advance(DEBOUNCE);
    insta::assert_snapshot!(render(&e), @"say ~|");
}

#[test]
fn test_commit_uses_position_captured_at_first_keystroke() {
    let mut e = engine("ab|cd");
    e.type_text("~");
    e.type_text("x");
    e.advance(DEBOUNCE);
    insta::assert_snapshot!(render(&e), @"ab~|xcd");
}

#[test]
fn test_native_commit_is_one_undo_step() {
    let mut e = engine("a|");
    e.type_text("~");
    e.type_text("~");
    e.advance(DEBOUNCE);
    insta::assert_snapshot!(render(&e), @"a~~|~~");

    let surface = e.host_mut().surface_mut();
    assert!(surface.undo());
    assert_eq!(surface.text(), "a");
    assert!(!surface.can_undo());
}

#[test]
fn test_disabled_tilde_is_plain_text() {
    let config = EngineConfig {
        tilde: false,
        ..EngineConfig::default()
    };
    let mut e = engine_with("|", config);
    assert_eq!(e.type_text("~"), Handling::PassThrough);
    insta::assert_snapshot!(render(&e), @"~|");
    assert_eq!(e.host().pending_tasks(), 0);
}
