//! Configuration file support for rastermark.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/rastermark/config.toml`. Settings include drawing defaults,
//! arrow appearance, export naming and keybindings.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod keybindings;
pub mod types;

// Re-export commonly used types at module level
pub use enums::ColorSpec;
pub use keybindings::{Action, KeyBinding, KeybindingsConfig};
pub use types::{ArrowConfig, DrawingConfig, ExportConfig};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_color = "#EF4444"
/// default_stroke_width = 3.0
/// default_font_size = 16.0
///
/// [arrow]
/// head_size = 15.0
///
/// [export]
/// output_directory = "~/Pictures/Edited"
///
/// [keybindings]
/// undo = ["Ctrl+Z"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Tool defaults (color, stroke width, font, mosaic size)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Arrow appearance settings
    #[serde(default)]
    pub arrow: ArrowConfig,

    /// Where and how exported images are written
    #[serde(default)]
    pub export: ExportConfig,

    /// Keyboard shortcuts
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `default_stroke_width`: 1.0 - 50.0
    /// - `default_opacity`: 0.0 - 1.0
    /// - `default_font_size`: 8.0 - 144.0
    /// - `mosaic_size`: 2 - 100
    /// - `blur_amount`: 0.0 - 50.0
    /// - `arrow.head_size`: 5.0 - 60.0
    pub fn validate_and_clamp(&mut self) {
        clamp_f64(
            "default_stroke_width",
            &mut self.drawing.default_stroke_width,
            1.0,
            50.0,
        );
        clamp_f64("default_opacity", &mut self.drawing.default_opacity, 0.0, 1.0);
        clamp_f64(
            "default_font_size",
            &mut self.drawing.default_font_size,
            8.0,
            144.0,
        );
        clamp_f64("blur_amount", &mut self.drawing.blur_amount, 0.0, 50.0);
        clamp_f64("arrow head_size", &mut self.arrow.head_size, 5.0, 60.0);

        if !(2..=100).contains(&self.drawing.mosaic_size) {
            warn!(
                "Invalid mosaic_size {}, clamping to 2-100 range",
                self.drawing.mosaic_size
            );
            self.drawing.mosaic_size = self.drawing.mosaic_size.clamp(2, 100);
        }

        if self.drawing.font_family.trim().is_empty() {
            warn!("Empty font_family, falling back to 'Arial, sans-serif'");
            self.drawing.font_family = "Arial, sans-serif".to_string();
        }

        if self.export.timestamp_format.trim().is_empty() {
            warn!("Empty export timestamp_format, falling back to '%Y%m%d_%H%M%S'");
            self.export.timestamp_format = "%Y%m%d_%H%M%S".to_string();
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/rastermark/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("rastermark");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates the configuration at `path`.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file contains invalid TOML syntax
    /// - A keybinding is malformed or bound twice
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        config.validate_and_clamp();
        config
            .keybindings
            .build_action_map()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Invalid keybindings in {}", path.display()))?;

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Saves the current configuration to the default location.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created, the config cannot
    /// be serialized or the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, config_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Writes the documented example config (`config.example.toml`) to the
    /// user's config directory and returns its path.
    ///
    /// # Errors
    /// Returns an error if a config file already exists at the target path
    /// or it cannot be written.
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let default_config = include_str!("../../config.example.toml");
        fs::write(&config_path, default_config)?;

        info!("Created default config at {}", config_path.display());
        Ok(config_path)
    }

    /// JSON schema describing the config file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

fn clamp_f64(name: &str, value: &mut f64, min: f64, max: f64) {
    if value.is_nan() {
        warn!("Invalid {} (NaN), using {:.1}", name, min);
        *value = min;
    } else if !(min..=max).contains(value) {
        warn!(
            "Invalid {} {:.2}, clamping to {:.1}-{:.1} range",
            name, value, min, max
        );
        *value = value.clamp(min, max);
    }
}
