//! Configuration management for Studyflow.
//!
//! Handles loading and saving configuration from TOML files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Scheduling service settings
    pub server: ServerConfig,

    /// UI/TUI settings
    pub ui: UiConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Minutes prefilled in the available-time field
    pub default_minutes: u32,
}

/// Scheduling service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the scheduling service
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// UI/TUI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Color theme name (built-in: default, light)
    pub theme: String,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.studyflow.toml` in current directory
    /// 2. `~/.config/studyflow/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        // Try local config first
        let local_config = PathBuf::from(".studyflow.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        // Try global config
        if let Some(config_dir) = dirs::config_dir() {
            let global_config = config_dir.join("studyflow").join("config.toml");
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        // Return defaults
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the global config file.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let studyflow_dir = config_dir.join("studyflow");
        std::fs::create_dir_all(&studyflow_dir)?;

        let config_path = studyflow_dir.join("config.toml");
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;

        Ok(())
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("studyflow"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { default_minutes: 120 }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { base_url: "https://study-smart-4ezm.onrender.com".to_string(), timeout_secs: 10 }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { theme: "default".to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.default_minutes, 120);
        assert_eq!(config.server.timeout_secs, 10);
        assert_eq!(config.ui.theme, "default");
        assert!(config.server.base_url.starts_with("https://"));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[ui]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            default_minutes = 90

            [server]
            base_url = "http://localhost:8000"
            timeout_secs = 5

            [ui]
            theme = "light"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.default_minutes, 90);
        assert_eq!(config.server.base_url, "http://localhost:8000");
        assert_eq!(config.server.timeout_secs, 5);
        assert_eq!(config.ui.theme, "light");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let toml_str = r#"
            [server]
            base_url = "http://localhost:8000"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.base_url, "http://localhost:8000");
        assert_eq!(config.server.timeout_secs, 10);
        assert_eq!(config.general.default_minutes, 120);
    }
}
