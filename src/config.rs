use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::vcs::VcsBackend;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SrConfig {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub vcs: VcsConfig,
}

/// [history] section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// How many revisions to request from the VCS
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_col_width")]
    pub col_width: u16,
    #[serde(default)]
    pub theme: Theme,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VcsConfig {
    #[serde(default)]
    pub backend: VcsBackend,
}

/// Color scheme handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    /// Black on yellow changed cells, white on blue title bar
    Classic,
}

fn default_limit() -> usize {
    20
}

fn default_col_width() -> u16 {
    20
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            col_width: default_col_width(),
            theme: Theme::default(),
        }
    }
}

/// Load config by merging global defaults with per-directory overrides.
/// Priority: `.sr-config.toml` next to the file > global `~/.config/sr/config.toml` > built-in defaults.
/// Merging is deep: individual fields within sections override independently.
pub fn load_config(dir: &Path) -> SrConfig {
    let local_path = dir.join(".sr-config.toml");
    let global_path = dirs::config_dir().map(|d| d.join("sr/config.toml"));

    let global_table = global_path
        .and_then(|p| std::fs::read_to_string(p).ok())
        .and_then(|c| parse_table(&c));

    let local_table = std::fs::read_to_string(&local_path)
        .ok()
        .and_then(|c| parse_table(&c));

    merge_tables(global_table, local_table)
}

fn parse_table(content: &str) -> Option<toml::map::Map<String, toml::Value>> {
    match content.parse::<toml::Value>().ok()? {
        toml::Value::Table(t) => Some(t),
        _ => None,
    }
}

fn merge_tables(
    global: Option<toml::map::Map<String, toml::Value>>,
    local: Option<toml::map::Map<String, toml::Value>>,
) -> SrConfig {
    let merged = match (global, local) {
        (Some(mut global), Some(local)) => {
            deep_merge(&mut global, local);
            toml::Value::Table(global)
        }
        (Some(global), None) => toml::Value::Table(global),
        (None, Some(local)) => toml::Value::Table(local),
        (None, None) => return SrConfig::default(),
    };

    merged.try_into().unwrap_or_default()
}

/// Recursively merge `overlay` into `base`. Overlay values win; nested tables are merged recursively.
fn deep_merge(
    base: &mut toml::map::Map<String, toml::Value>,
    overlay: toml::map::Map<String, toml::Value>,
) {
    for (key, value) in overlay {
        match (base.get_mut(&key), &value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                deep_merge(base_table, overlay_table.clone());
            }
            _ => {
                base.insert(key, value);
            }
        }
    }
}
