//! Analysis configuration — built-in defaults, overridable by an
//! `astrograph.toml` at the analyzed root.

use serde::{Deserialize, Serialize};

fn default_min_node_count_exact() -> u32 {
    5
}

fn default_min_node_count_block() -> u32 {
    10
}

fn default_min_block_lines() -> u32 {
    3
}

fn default_include_blocks() -> bool {
    true
}

/// Significance thresholds and language scoping for one analysis run.
/// Deserialized from `astrograph.toml`; any field omitted from the file
/// falls back to its built-in default, and a missing file is equivalent
/// to an entirely empty one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Language ids to restrict analysis to. `None` means every
    /// registered plugin.
    pub languages: Option<Vec<String>>,
    #[serde(rename = "min_node_count_exact")]
    pub min_node_count_exact: u32,
    #[serde(rename = "min_node_count_block")]
    pub min_node_count_block: u32,
    #[serde(rename = "min_block_lines")]
    pub min_block_lines: u32,
    pub include_blocks: bool,
    /// Mirrors the `ASTROGRAPH_EVENT_DRIVEN` environment flag (§6); a
    /// config file can opt a project into it without setting env vars.
    pub event_driven: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            languages: None,
            min_node_count_exact: default_min_node_count_exact(),
            min_node_count_block: default_min_node_count_block(),
            min_block_lines: default_min_block_lines(),
            include_blocks: default_include_blocks(),
            event_driven: false,
        }
    }
}

/// Threshold used by the pre-create check in `write`/`edit` (§4.5, §6) —
/// fixed regardless of the configured `min_node_count_exact`.
pub const PRE_CREATE_MIN_NODE_COUNT: usize = 10;

pub const CONFIG_FILE_NAME: &str = "astrograph.toml";

/// Event-driven mode can also be toggled per-process via this variable;
/// `AnalysisConfig::event_driven` takes precedence when both are set.
pub const EVENT_DRIVEN_ENV_VAR: &str = "ASTROGRAPH_EVENT_DRIVEN";

impl AnalysisConfig {
    /// Load `astrograph.toml` from `root`, falling back to defaults when
    /// absent. A malformed file is an `io_error`-flavored failure — see
    /// `astrograph_core::error`.
    pub fn load(root: &std::path::Path) -> crate::error::Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .map_err(|e| crate::error::EngineError::io(path.clone(), e))?;
        let mut config: AnalysisConfig = toml::from_str(&text)
            .map_err(|e| crate::error::EngineError::config(path, e.to_string()))?;
        if std::env::var(EVENT_DRIVEN_ENV_VAR).is_ok() {
            config.event_driven = true;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = AnalysisConfig::default();
        assert_eq!(config.min_node_count_exact, 5);
        assert_eq!(config.min_node_count_block, 10);
        assert_eq!(config.min_block_lines, 3);
        assert!(config.include_blocks);
        assert!(!config.event_driven);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: AnalysisConfig = toml::from_str("min_node_count_exact = 8\n").unwrap();
        assert_eq!(config.min_node_count_exact, 8);
        assert_eq!(config.min_node_count_block, 10);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig::load(dir.path()).unwrap();
        assert_eq!(config.min_node_count_exact, AnalysisConfig::default().min_node_count_exact);
    }
}
