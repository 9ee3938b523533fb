//! Configuration management for LayerKit
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats, stored by default in the platform config directory.
//!
//! Configuration is organized into logical sections:
//! - Layout service connection (endpoint, timeout, token)
//! - Arrangement defaults (spacing, target size, presets, fallback canvas)
//! - Fonts to preload

use crate::error::{ConfigError, SettingsError, SettingsResult};
use layerkit_designer::arrangement::{
    default_presets, TargetPreset, TargetSize, DEFAULT_SPACING, FALLBACK_CANVAS_SIZE,
};
use layerkit_designer::FontSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Layout service connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Arrange endpoint URL
    pub endpoint: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Bearer token sent with every request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl LayoutSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:57988/api/canvas/arrange".to_string(),
            timeout_ms: 120_000,
            auth_token: None,
        }
    }
}

/// Smart arrangement defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrangementSettings {
    /// Gap between existing content and the arranged cluster
    pub spacing: f64,
    /// Canvas width sent for an empty scene without a viewport
    pub fallback_canvas_width: f64,
    /// Canvas height sent for an empty scene without a viewport
    pub fallback_canvas_height: f64,
    /// Re-check the selection against the scene before committing
    pub verify_at_commit: bool,
    /// Target size used when none is given
    pub default_target: TargetSize,
    /// Named target sizes
    pub presets: Vec<TargetPreset>,
}

impl ArrangementSettings {
    pub fn fallback_canvas(&self) -> (f64, f64) {
        (self.fallback_canvas_width, self.fallback_canvas_height)
    }

    /// Find a preset by case-insensitive name.
    pub fn preset(&self, name: &str) -> Option<&TargetPreset> {
        self.presets
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }
}

impl Default for ArrangementSettings {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
            fallback_canvas_width: FALLBACK_CANVAS_SIZE.0,
            fallback_canvas_height: FALLBACK_CANVAS_SIZE.1,
            verify_at_commit: true,
            default_target: TargetSize::default(),
            presets: default_presets(),
        }
    }
}

/// Fonts loaded at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSettings {
    pub preload: Vec<FontSource>,
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutSettings,
    pub arrangement: ArrangementSettings,
    pub fonts: FontSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("none").to_string()).into()),
    }
}

impl Config {
    /// Default config file location: `<config dir>/layerkit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("layerkit").join("config.toml"))
            .ok_or_else(|| {
                ConfigError::UnsupportedPlatform("no configuration directory".to_string()).into()
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e)))?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Load `path`, or the default location, falling back to defaults when
    /// no file exists there.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        let path = match path {
            Some(path) => return Self::load_from_file(path),
            None => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.layout.endpoint.trim().is_empty() {
            return Err(SettingsError::invalid("layout.endpoint", "must not be empty"));
        }

        if self.layout.timeout_ms == 0 {
            return Err(SettingsError::invalid("layout.timeout_ms", "must be > 0"));
        }

        let a = &self.arrangement;
        if !(a.spacing.is_finite() && a.spacing > 0.0) {
            return Err(SettingsError::invalid("arrangement.spacing", "must be > 0"));
        }

        if a.default_target.validate().is_err()
            || a.default_target.width < 0.0
            || a.default_target.height < 0.0
        {
            return Err(SettingsError::invalid(
                "arrangement.default_target",
                "dimensions must be > 0",
            ));
        }

        if let Some(p) = a
            .presets
            .iter()
            .find(|p| !(p.width.is_finite() && p.height.is_finite() && p.width > 0.0 && p.height > 0.0))
        {
            return Err(SettingsError::invalid(
                "arrangement.presets",
                format!("preset '{}' has a non-positive size", p.name),
            ));
        }

        if !(a.fallback_canvas_width > 0.0 && a.fallback_canvas_height > 0.0) {
            return Err(SettingsError::invalid(
                "arrangement.fallback_canvas",
                "dimensions must be > 0",
            ));
        }

        if let Some(f) = self.fonts.preload.iter().find(|f| f.family.trim().is_empty()) {
            return Err(SettingsError::invalid(
                "fonts.preload",
                format!("font source '{}' has no family", f.url),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.layout.timeout(), Duration::from_secs(120));
        assert_eq!(config.arrangement.fallback_canvas(), (800.0, 600.0));
        assert!(config.arrangement.verify_at_commit);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.layout.timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.arrangement.spacing = -5.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.arrangement.default_target = TargetSize::new(-1200.0, 628.0);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.layout.endpoint = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [layout]
            endpoint = "https://layout.example/arrange"

            [arrangement]
            spacing = 40.0
            "#,
        )
        .unwrap();
        assert_eq!(config.layout.timeout_ms, 120_000);
        assert_eq!(config.arrangement.spacing, 40.0);
        assert_eq!(config.arrangement.presets.len(), 6);
    }

    #[test]
    fn test_preset_lookup() {
        let config = Config::default();
        let p = config.arrangement.preset("instagram story").unwrap();
        assert_eq!((p.width, p.height), (1080.0, 1920.0));
        assert!(config.arrangement.preset("nope").is_none());
    }
}
