use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::connector::Marker;
use crate::diff::DEFAULT_MAX_TABLE_CELLS;
use crate::theme::{apply_overrides, Theme, ThemeOverrides};

pub const DEFAULT_SCROLL_STEP: u16 = 1;
pub const DEFAULT_TICK_MS: u64 = 50;

#[derive(Debug, Clone)]
pub struct TwindiffConfig {
    pub theme: Theme,
    /// Overrides from the `[colors]` table, reapplied when the theme changes.
    pub overrides: Option<ThemeOverrides>,
    pub marker: Marker,
    pub connectors: bool,
    pub max_table_cells: usize,
    pub scroll_step: u16,
    pub tick_ms: u64,
}

impl Default for TwindiffConfig {
    fn default() -> Self {
        Self {
            theme: Theme::from_name("one-dark"),
            overrides: None,
            marker: Marker::default(),
            connectors: true,
            max_table_cells: DEFAULT_MAX_TABLE_CELLS,
            scroll_step: DEFAULT_SCROLL_STEP,
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

impl TwindiffConfig {
    /// Switch to the named theme, keeping user color overrides on top.
    pub fn set_theme(&mut self, name: &str) {
        let mut theme = Theme::from_name(name);
        if let Some(ref overrides) = self.overrides {
            apply_overrides(&mut theme, overrides);
        }
        self.theme = theme;
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    colors: Option<ThemeOverrides>,
    #[serde(default)]
    marker: Option<Marker>,
    #[serde(default)]
    connectors: Option<bool>,
    #[serde(default)]
    max_table_cells: Option<usize>,
    #[serde(default)]
    scroll_step: Option<u16>,
    #[serde(default)]
    tick_ms: Option<u64>,
}

fn config_path() -> PathBuf {
    let mut path = dirs_home().unwrap_or_else(|| PathBuf::from("."));
    path.push(".config");
    path.push("twindiff");
    path.push("config.toml");
    path
}

pub fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Load config from `~/.config/twindiff/config.toml`, falling back to defaults.
pub fn load_config() -> TwindiffConfig {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> TwindiffConfig {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(path = %path.display(), "no config file: {e}");
            return TwindiffConfig::default();
        }
    };
    parse_config(&contents)
}

/// Parse config file contents. Invalid TOML yields the defaults.
pub fn parse_config(contents: &str) -> TwindiffConfig {
    let file: ConfigFile = match toml::from_str(contents) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("invalid config, using defaults: {e}");
            return TwindiffConfig::default();
        }
    };

    let mut config = TwindiffConfig {
        overrides: file.colors,
        ..TwindiffConfig::default()
    };
    config.set_theme(file.theme.as_deref().unwrap_or("one-dark"));
    if let Some(marker) = file.marker {
        config.marker = marker;
    }
    if let Some(connectors) = file.connectors {
        config.connectors = connectors;
    }
    if let Some(cells) = file.max_table_cells {
        config.max_table_cells = cells.max(1);
    }
    if let Some(step) = file.scroll_step {
        config.scroll_step = step.max(1);
    }
    if let Some(ms) = file.tick_ms {
        config.tick_ms = ms.max(1);
    }
    config
}

/// Persist the theme name to `~/.config/twindiff/config.toml`.
/// Reads the existing file (if any) and updates only the theme field.
pub fn save_theme(name: &str) {
    save_theme_to(&config_path(), name);
}

fn save_theme_to(path: &Path, name: &str) {
    // Read existing config as a TOML table to preserve unknown fields
    let mut table = if let Ok(contents) = std::fs::read_to_string(path) {
        contents
            .parse::<toml::Table>()
            .unwrap_or_else(|_| toml::Table::new())
    } else {
        toml::Table::new()
    };

    table.insert("theme".to_string(), toml::Value::String(name.to_string()));

    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let toml_string = toml::to_string_pretty(&table).unwrap_or_default();
    if let Err(e) = std::fs::write(path, toml_string) {
        tracing::warn!(path = %path.display(), "failed to save theme: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_full_config() {
        let config = parse_config(
            r##"
theme = "dracula"
marker = "half-block"
connectors = false
max_table_cells = 1000
scroll_step = 3
tick_ms = 20

[colors]
connector_modified = "#102030"
"##,
        );
        assert_eq!(config.theme.name, "dracula");
        assert_eq!(config.theme.connector_modified, Color::Rgb(0x10, 0x20, 0x30));
        assert_eq!(config.marker, Marker::HalfBlock);
        assert!(!config.connectors);
        assert_eq!(config.max_table_cells, 1000);
        assert_eq!(config.scroll_step, 3);
        assert_eq!(config.tick_ms, 20);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = parse_config("");
        assert_eq!(config.theme.name, "one-dark");
        assert_eq!(config.marker, Marker::Braille);
        assert!(config.connectors);
        assert_eq!(config.max_table_cells, DEFAULT_MAX_TABLE_CELLS);
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let config = parse_config("theme = [");
        assert_eq!(config.theme.name, "one-dark");
        let config = parse_config("marker = \"sparkles\"");
        assert_eq!(config.marker, Marker::Braille);
    }

    #[test]
    fn test_overrides_survive_theme_switch() {
        let mut config = parse_config("[colors]\nconnector_added = \"#000001\"\n");
        config.set_theme("tokyo-night");
        assert_eq!(config.theme.name, "tokyo-night");
        assert_eq!(config.theme.connector_added, Color::Rgb(0, 0, 1));
    }

    #[test]
    fn test_save_theme_preserves_other_keys() {
        let dir = std::env::temp_dir().join(format!("twindiff-config-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = std::fs::create_dir_all(&dir);
        std::fs::write(&path, "scroll_step = 4\ntheme = \"dracula\"\n").unwrap();
        save_theme_to(&path, "tokyo-night");
        let config = load_config_from(&path);
        assert_eq!(config.theme.name, "tokyo-night");
        assert_eq!(config.scroll_step, 4);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
