// ABOUTME: Application configuration handling.
// ABOUTME: Loads and saves layout and logging settings from TOML config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{Position, SizePolicy};

/// Defaults applied to every split the engine creates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Minimum length of either pane along the split axis
    pub min_pane_size: i32,

    /// Divider thickness forwarded to the host
    pub divider_width: i32,

    /// How dividers move when the container is resized
    pub size_policy: SizePolicy,

    /// Position used when a pane is added without a usable neighbour
    pub fallback_position: Position,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            min_pane_size: 25,
            divider_width: 4,
            size_policy: SizePolicy::default(),
            fallback_position: Position::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Max log level (error, warn, info, debug, trace)
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Split defaults
    pub layout: LayoutSettings,

    /// Log output
    pub logging: LoggingSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("No config directory on this platform")]
    NoConfigDir,
}

impl Config {
    /// Get the default config file path (~/.config/pane-shell/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pane-shell").join("config.toml"))
    }

    /// Load config from a path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from default path, or return default config if not found
    pub fn load_or_default() -> Self {
        Self::default_path()
            .and_then(|path| Self::load(&path).ok())
            .unwrap_or_default()
    }

    /// Save config to a path
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Write to the default location, returning where it went
    pub fn save_to_default(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        self.save(&path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [layout]
            min_pane_size = 100
            size_policy = "fixed_second"
            "#,
        )
        .unwrap();

        assert_eq!(config.layout.min_pane_size, 100);
        assert_eq!(config.layout.size_policy, SizePolicy::FixedSecond);
        assert_eq!(config.layout.divider_width, 4);
        assert_eq!(config.layout.fallback_position, Position::Right);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.layout.fallback_position = Position::Bottom;
        config.logging.level = "debug".to_string();

        let temp_path = std::env::temp_dir()
            .join("pane-shell-config-test")
            .join("config.toml");
        config.save(&temp_path).unwrap();
        let loaded = Config::load(&temp_path).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let temp_path = std::env::temp_dir().join("pane-shell-bad-config.toml");
        std::fs::write(&temp_path, "layout = [").unwrap();
        let err = Config::load(&temp_path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_default_path() {
        if let Some(p) = Config::default_path() {
            assert!(p.ends_with("pane-shell/config.toml"));
        }
    }
}
