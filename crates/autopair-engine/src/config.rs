//! Engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::actions::SurfaceId;

/// Which surface to watch, how long to wait, and which rewrites are on.
///
/// Deserializes from any serde format; missing fields take their defaults,
/// so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Identifier of the single editable surface the engine acts on.
    pub surface_id: SurfaceId,
    /// Quiet period after a lone tilde before it commits as a single char.
    pub tilde_debounce_ms: u64,
    /// Delay between composition end and the reconcile/collapse pass.
    pub composition_settle_ms: u64,
    /// Insert the closer when an opener is typed, wrap selections.
    pub auto_close: bool,
    /// Type through an existing closer instead of duplicating it.
    pub skip_over: bool,
    /// Expand a typed ```` ``` ```` into a fenced block.
    pub fence: bool,
    /// Pair `~`/`～` into strike-through delimiters.
    pub tilde: bool,
    /// Collapse nested duplicate pairs after composition.
    pub collapse_duplicates: bool,
    /// Backspace between an empty pair removes both halves.
    pub delete_pairs: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            surface_id: SurfaceId::new_static("editor"),
            tilde_debounce_ms: 280,
            composition_settle_ms: 0,
            auto_close: true,
            skip_over: true,
            fence: true,
            tilde: true,
            collapse_duplicates: true,
            delete_pairs: true,
        }
    }
}

impl EngineConfig {
    pub fn tilde_debounce(&self) -> Duration {
        Duration::from_millis(self.tilde_debounce_ms)
    }

    pub fn composition_settle(&self) -> Duration {
        Duration::from_millis(self.composition_settle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.surface_id, "editor");
        assert_eq!(config.tilde_debounce(), Duration::from_millis(280));
        assert_eq!(config.composition_settle(), Duration::ZERO);
        assert!(config.auto_close && config.tilde && config.delete_pairs);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "surface_id": "notes", "tilde": false }"#).unwrap();
        assert_eq!(config.surface_id, "notes");
        assert!(!config.tilde);
        assert!(config.fence);
        assert_eq!(config.tilde_debounce_ms, 280);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
