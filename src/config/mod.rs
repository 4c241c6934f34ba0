//! Configuration file support for waysketch.
//!
//! This module handles loading and validating user settings from the
//! configuration file located at `~/.config/waysketch/config.toml`. Settings
//! cover canvas dimensions, shape placement defaults, scene colors, UI
//! preferences, and image export.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod presets;
pub mod types;

// Re-export commonly used types at module level
pub use enums::{ColorSpec, StatusPosition};
pub use presets::{ColorPreset, BUILDING_PRESETS, CANVAS_SIZES, GROUND_PRESETS, SHAPE_PRESETS};
pub use types::{
    CanvasConfig, ExportConfig, HelpOverlayStyle, SceneConfig, ShapeConfig, StatusBarStyle,
    UiConfig,
};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML
/// file. All fields have sensible defaults and will use those if not
/// specified in the config file.
///
/// # Example TOML
/// ```toml
/// [canvas]
/// width = 768
/// height = 512
///
/// [shape]
/// width = 40
/// height = 70
/// color = "#E6E6E6"
///
/// [scene]
/// ground_height = 80
/// polygon_padding = 0
/// polygon_color = "#B47878"
///
/// [ui]
/// show_status_bar = true
/// status_bar_position = "bottom-left"
/// ```
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// Canvas dimensions
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Shape placement defaults (size, fill color)
    #[serde(default)]
    pub shape: ShapeConfig,

    /// Scene colors and silhouette parameters
    #[serde(default)]
    pub scene: SceneConfig,

    /// UI display preferences
    #[serde(default)]
    pub ui: UiConfig,

    /// Image export settings
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// This method ensures that user-provided config values won't cause
    /// rendering issues. Invalid values are clamped to the nearest valid
    /// value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `canvas.width` / `canvas.height`: one of [`CANVAS_SIZES`]
    /// - `shape.width` / `shape.height`: 20 - 120
    /// - `scene.ground_height`: 40 - 200
    /// - `scene.polygon_padding`: 0 - 50
    fn validate_and_clamp(&mut self) {
        if !CANVAS_SIZES.contains(&self.canvas.width) {
            let snapped = snap_canvas_size(self.canvas.width);
            log::warn!(
                "Unsupported canvas width {}, snapping to {}",
                self.canvas.width,
                snapped
            );
            self.canvas.width = snapped;
        }

        if !CANVAS_SIZES.contains(&self.canvas.height) {
            let snapped = snap_canvas_size(self.canvas.height);
            log::warn!(
                "Unsupported canvas height {}, snapping to {}",
                self.canvas.height,
                snapped
            );
            self.canvas.height = snapped;
        }

        // Shape size: 20 - 120
        if !(20.0..=120.0).contains(&self.shape.width) {
            log::warn!(
                "Invalid shape width {:.0}, clamping to 20-120 range",
                self.shape.width
            );
            self.shape.width = self.shape.width.clamp(20.0, 120.0);
        }

        if !(20.0..=120.0).contains(&self.shape.height) {
            log::warn!(
                "Invalid shape height {:.0}, clamping to 20-120 range",
                self.shape.height
            );
            self.shape.height = self.shape.height.clamp(20.0, 120.0);
        }

        // Ground height: 40 - 200
        if !(40.0..=200.0).contains(&self.scene.ground_height) {
            log::warn!(
                "Invalid ground height {:.0}, clamping to 40-200 range",
                self.scene.ground_height
            );
            self.scene.ground_height = self.scene.ground_height.clamp(40.0, 200.0);
        }

        // Polygon padding: 0 - 50
        if !(0.0..=50.0).contains(&self.scene.polygon_padding) {
            log::warn!(
                "Invalid polygon padding {:.0}, clamping to 0-50 range",
                self.scene.polygon_padding
            );
            self.scene.polygon_padding = self.scene.polygon_padding.clamp(0.0, 50.0);
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/waysketch/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined
    /// (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("waysketch");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from file, or returns defaults if not found.
    ///
    /// Attempts to read and parse the config file at
    /// `~/.config/waysketch/config.toml`. If the file doesn't exist, returns
    /// a Config with default values. All loaded values are validated and
    /// clamped to acceptable ranges.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Saves the current configuration to file.
    ///
    /// Serializes the config to TOML format and writes it to
    /// `~/.config/waysketch/config.toml`. Creates the parent directory if it
    /// doesn't exist. This method is kept for future use (e.g., persisting
    /// settings changed at runtime).
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory cannot be created
    /// - The config cannot be serialized to TOML
    /// - The file cannot be written
    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }
}

/// Snaps an arbitrary edge length to the nearest supported canvas size.
fn snap_canvas_size(size: u32) -> u32 {
    *CANVAS_SIZES
        .iter()
        .min_by_key(|candidate| candidate.abs_diff(size))
        .expect("CANVAS_SIZES is non-empty")
}
