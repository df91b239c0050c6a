//! IME composition: the guard, the settle pass and duplicate-pair collapse.

mod common;

use std::time::Duration;

use autopair_engine::{
    EngineConfig, Handling, HeadlessHost, InputEngine, InputEvent, InputType, Range, Reconcile,
};
use common::{engine, engine_at, engine_with, render};

fn all_kinds() -> Vec<InputType> {
    vec![
        InputType::InsertText,
        InputType::InsertCompositionText,
        InputType::InsertFromComposition,
        InputType::InsertReplacementText,
        InputType::InsertFromPaste,
        InputType::DeleteContentBackward,
        InputType::Unknown("deleteCompositionText".into()),
    ]
}

fn end_composition(e: &mut InputEngine<HeadlessHost>) {
    e.handle_composition_end(&InputEvent::new(
        "editor",
        InputType::InsertFromComposition,
        None,
    ));
}

#[test]
fn test_composing_events_never_transform() {
    for kind in all_kinds() {
        for data in ["(", "~~", "```", ")"] {
            let mut e = engine("a(|)");
            let event = InputEvent::new("editor", kind.clone(), Some(data)).composing();
            assert_eq!(e.handle_before_input(&event), Handling::PassThrough, "{kind}");

            e.host_mut().surface_mut().type_native(data);
            assert_eq!(e.handle_input(&event), Reconcile::Ignored, "{kind}");
            assert_eq!(render(&e), format!("a({data}|)"));
            assert_eq!(e.host().pending_tasks(), 0);
        }
    }
}

#[test]
fn test_composition_kind_with_data_counts_as_composing() {
    let mut e = engine("|");
    let event = InputEvent::new("editor", InputType::InsertCompositionText, Some("（"));
    assert_eq!(e.handle_before_input(&event), Handling::PassThrough);
    insta::assert_snapshot!(render(&e), @"|");
}

#[test]
fn test_settle_pass_pairs_committed_text() {
    let mut e = engine("a|");
    e.compose("（");
    insta::assert_snapshot!(render(&e), @"a（|");

    e.advance(Duration::ZERO);
    insta::assert_snapshot!(render(&e), @"a（|）");
}

#[test]
fn test_settle_pass_waits_for_configured_delay() {
    let config = EngineConfig {
        composition_settle_ms: 10,
        ..EngineConfig::default()
    };
    let mut e = engine_with("|", config);
    e.compose("「");
    e.advance(Duration::from_millis(5));
    insta::assert_snapshot!(render(&e), @"「|");
    e.advance(Duration::from_millis(5));
    insta::assert_snapshot!(render(&e), @"「|」");
}

#[test]
fn test_nested_duplicates_collapse_after_composition() {
    let mut e = engine("《《|》》");
    e.compose("《");
    e.advance(Duration::ZERO);
    insta::assert_snapshot!(render(&e), @"《|》");
}

#[test]
fn test_triple_run_collapses() {
    let mut e = engine("《《《|》》》");
    end_composition(&mut e);
    e.advance(Duration::ZERO);
    insta::assert_snapshot!(render(&e), @"《|》");
}

#[test]
fn test_single_pair_is_not_collapsed() {
    for marked in ["《|》", "《《|》", "x(|)y"] {
        let mut e = engine(marked);
        end_composition(&mut e);
        e.advance(Duration::ZERO);
        assert_eq!(render(&e), marked);
    }
}

#[test]
fn test_self_closing_runs_are_not_collapsed() {
    let mut e = engine_at("\"\"\"\"", Range::caret(2));
    end_composition(&mut e);
    e.advance(Duration::ZERO);
    assert_eq!(e.host().surface().text(), "\"\"\"\"");
}

#[test]
fn test_collapse_can_be_disabled() {
    let config = EngineConfig {
        collapse_duplicates: false,
        ..EngineConfig::default()
    };
    let mut e = engine_with("《《《|》》》", config);
    end_composition(&mut e);
    e.advance(Duration::ZERO);
    insta::assert_snapshot!(render(&e), @"《《《|》》》");
}

#[test]
fn test_settle_skipped_when_new_composition_opened() {
    let mut e = engine("a|");
    e.compose("（");
    let start = InputEvent::new("editor", InputType::InsertCompositionText, None);
    e.handle_composition_start(&start);
    e.advance(Duration::ZERO);
    insta::assert_snapshot!(render(&e), @"a（|");
}
