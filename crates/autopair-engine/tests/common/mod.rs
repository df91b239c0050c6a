//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use autopair_engine::{
    EngineConfig, HeadlessHost, HeadlessSurface, InputEngine, Range, Surface,
};

pub const DEBOUNCE: std::time::Duration = std::time::Duration::from_millis(300);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Engine over a surface given in marked form (`|` caret, `[..]` selection).
pub fn engine(marked: &str) -> InputEngine<HeadlessHost> {
    engine_with(marked, EngineConfig::default())
}

pub fn engine_with(marked: &str, config: EngineConfig) -> InputEngine<HeadlessHost> {
    init_tracing();
    let host = HeadlessHost::new(config.surface_id.clone(), HeadlessSurface::from_marked(marked));
    InputEngine::attach(host, config)
}

/// Engine over `text` with an explicit selection, for text that itself
/// contains marker characters.
pub fn engine_at(text: &str, selection: Range) -> InputEngine<HeadlessHost> {
    init_tracing();
    let mut surface = HeadlessSurface::new(text);
    surface
        .set_selection(selection)
        .expect("headless selection never fails");
    InputEngine::attach(HeadlessHost::new("editor", surface), EngineConfig::default())
}

pub fn render(engine: &InputEngine<HeadlessHost>) -> String {
    engine.host().surface().marked()
}

pub fn state(engine: &InputEngine<HeadlessHost>) -> (String, Range) {
    let surface = engine.host().surface();
    (surface.text(), surface.selection())
}
