//! Engine settings.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```toml
//! currency_symbol = "$"
//! recalc = "reactive"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use etab_engine::engine::ReferencePolicy;

/// Text shown in a formula cell that failed under [`ErrorDisplay::Marker`].
pub const ERROR_MARKER: &str = "#ERR";

/// Which cells are recomputed after an edit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecalcStrategy {
    /// Only the edited cell. Dependents go stale until edited or recomputed.
    Reactive,
    /// Every registered formula, row-major, repeated until displays settle.
    #[default]
    Sweep,
}

/// How history entries are represented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// One `{cell, old, new}` record per edit.
    #[default]
    Delta,
    /// Full-grid text before and after each edit. Only sensible for small grids.
    Snapshot,
}

/// What a formula cell shows when evaluation fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorDisplay {
    /// Leave the previous display text in place.
    #[default]
    Keep,
    /// Show [`ERROR_MARKER`].
    Marker,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub currency_symbol: String,
    pub recalc: RecalcStrategy,
    pub history_depth: usize,
    pub history_mode: HistoryMode,
    pub references: ReferencePolicy,
    pub error_display: ErrorDisplay,
    pub initial_rows: usize,
    pub initial_cols: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            currency_symbol: "₺".to_string(),
            recalc: RecalcStrategy::default(),
            history_depth: 20,
            history_mode: HistoryMode::default(),
            references: ReferencePolicy::default(),
            error_display: ErrorDisplay::default(),
            initial_rows: 10,
            initial_cols: 10,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.history_depth, 20);
        assert_eq!((config.initial_rows, config.initial_cols), (10, 10));
    }

    #[test]
    fn test_partial_config_overrides() {
        let config = EngineConfig::from_toml_str(
            r#"
            currency_symbol = "$"
            recalc = "reactive"
            history_mode = "snapshot"
            references = "strict"
            error_display = "marker"
            "#,
        )
        .unwrap();
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.recalc, RecalcStrategy::Reactive);
        assert_eq!(config.history_mode, HistoryMode::Snapshot);
        assert_eq!(config.references, ReferencePolicy::Strict);
        assert_eq!(config.error_display, ErrorDisplay::Marker);
        assert_eq!(config.history_depth, 20);
    }

    #[test]
    fn test_unknown_strategy_is_an_error() {
        assert!(EngineConfig::from_toml_str("recalc = \"lazy\"").is_err());
    }
}
