use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::KeyCode;
use serde::Deserialize;

use crate::system::group::SortKey;
use crate::system::snapshot::EnumerationDepth;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub keybinds: KeybindsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub default_sort: String,
    /// "basic" (name + PID) or "detailed" (adds memory and CPU estimate).
    pub enumeration: String,
    pub command_timeout_ms: u64,
    /// Keep the list hidden until a filter is typed.
    pub empty_start: bool,
    pub theme: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            default_sort: "memory".to_string(),
            enumeration: "detailed".to_string(),
            command_timeout_ms: 10_000,
            empty_start: false,
            theme: "dark".to_string(),
        }
    }
}

impl GeneralConfig {
    pub fn sort_key(&self) -> SortKey {
        SortKey::from_str_config(&self.default_sort)
    }

    pub fn depth(&self) -> EnumerationDepth {
        EnumerationDepth::from_str_config(&self.enumeration)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms.max(1))
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
    pub filter: String,
    pub kill: String,
    pub kill_all: String,
    pub instances: String,
    pub cycle_sort: String,
    pub refresh: String,
    pub help: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
            filter: "/".to_string(),
            kill: "x".to_string(),
            kill_all: "X".to_string(),
            instances: "Enter".to_string(),
            cycle_sort: "s".to_string(),
            refresh: "r".to_string(),
            help: "?".to_string(),
        }
    }
}

/// Parses a keybind string: a single character or a named key.
pub fn parse_key(s: &str) -> Option<KeyCode> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }
    match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "space" => Some(KeyCode::Char(' ')),
        "backspace" => Some(KeyCode::Backspace),
        "delete" | "del" => Some(KeyCode::Delete),
        _ => None,
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("taskreap").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "invalid config, using defaults");
                Config::default()
            }
        },
        Err(_) => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.general.sort_key(), SortKey::Memory);
        assert_eq!(config.general.depth(), EnumerationDepth::Detailed);
        assert_eq!(config.general.command_timeout(), Duration::from_secs(10));
        assert!(!config.general.empty_start);
        assert_eq!(config.keybinds.quit, "q");
        assert_eq!(config.keybinds.kill_all, "X");
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[general]
default_sort = "cpu"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.sort_key(), SortKey::Cpu);
        // Other fields should be defaults
        assert_eq!(config.general.enumeration, "detailed");
        assert_eq!(config.keybinds.refresh, "r");
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[general]
default_sort = "name"
enumeration = "basic"
command_timeout_ms = 2500
empty_start = true
theme = "light"

[keybinds]
quit = "Esc"
kill = "d"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.sort_key(), SortKey::Name);
        assert_eq!(config.general.depth(), EnumerationDepth::Basic);
        assert_eq!(config.general.command_timeout(), Duration::from_millis(2500));
        assert!(config.general.empty_start);
        assert_eq!(config.general.theme, "light");
        assert_eq!(parse_key(&config.keybinds.quit), Some(KeyCode::Esc));
        assert_eq!(parse_key(&config.keybinds.kill), Some(KeyCode::Char('d')));
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let general = GeneralConfig {
            command_timeout_ms: 0,
            ..GeneralConfig::default()
        };
        assert_eq!(general.command_timeout(), Duration::from_millis(1));
    }

    #[test]
    fn parse_key_named_and_unknown() {
        assert_eq!(parse_key("Enter"), Some(KeyCode::Enter));
        assert_eq!(parse_key("space"), Some(KeyCode::Char(' ')));
        assert_eq!(parse_key("F13"), None);
        assert_eq!(parse_key(""), None);
    }

    #[test]
    fn missing_file_returns_default() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(config.general.command_timeout_ms, 10_000);
    }

    #[test]
    fn invalid_toml_returns_default() {
        let temp = std::env::temp_dir().join("taskreap_test_invalid.toml");
        std::fs::write(&temp, "this is not valid toml {{{{").unwrap();
        let config = load_config_from_path(&temp);
        assert_eq!(config.general.command_timeout_ms, 10_000);
        let _ = std::fs::remove_file(&temp);
    }
}
