use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_menu_height")]
    pub menu_height: usize,
    #[serde(default = "default_input_length_limit")]
    pub input_length_limit: usize,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_log_file")]
    pub log_file: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_theme() -> String {
    "classic".to_string()
}
fn default_menu_height() -> usize {
    16
}
fn default_input_length_limit() -> usize {
    255
}
fn default_tick_ms() -> u64 {
    250
}
fn default_log_file() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hostconsole")
        .join("hostconsole.log")
        .to_string_lossy()
        .to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            menu_height: default_menu_height(),
            input_length_limit: default_input_length_limit(),
            tick_ms: default_tick_ms(),
            log_file: default_log_file(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hostconsole")
            .join("config.toml")
    }

    /// Fall back to the default theme if the configured one is unknown.
    pub fn normalize_theme(&mut self, available: &[String]) {
        if !available.contains(&self.theme) {
            self.theme = default_theme();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, "classic");
        assert_eq!(config.menu_height, 16);
        assert_eq!(config.input_length_limit, 255);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = toml::from_str("menu_height = 8\n").unwrap();
        assert_eq!(config.menu_height, 8);
        assert_eq!(config.theme, "classic");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.theme = "midnight".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.theme, "midnight");
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.tick_ms, 250);
    }

    #[test]
    fn test_broken_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "menu_height = \"tall\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_normalize_theme_unknown_resets() {
        let mut config = Config::default();
        config.theme = "neon".to_string();
        config.normalize_theme(&["classic".to_string(), "midnight".to_string()]);
        assert_eq!(config.theme, "classic");
    }
}
