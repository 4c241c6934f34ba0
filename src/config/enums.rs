//! Configuration enum types.

use crate::draw::{color::BLACK, Color};
use log::warn;
use serde::{Deserialize, Serialize};

/// Status bar position on screen.
///
/// Controls where the status bar appears relative to canvas edges.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum StatusPosition {
    /// Top-left corner
    TopLeft,
    /// Top-right corner
    TopRight,
    /// Bottom-left corner
    BottomLeft,
    /// Bottom-right corner
    BottomRight,
}

/// Color specification - either a `#RRGGBB` hex string or RGB values.
///
/// # Examples
/// ```toml
/// # Hex string
/// polygon_color = "#B47878"
///
/// # Custom RGB color (0-255 per component)
/// polygon_color = [180, 120, 120]
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Hex color string such as `"#B47878"` (leading `#` optional)
    Hex(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the color specification to a [`Color`].
    ///
    /// Malformed hex strings fall back to black with a warning. RGB arrays
    /// are converted from 0-255 range to 0.0-1.0 range with full opacity.
    pub fn to_color(&self) -> Color {
        match self {
            ColorSpec::Hex(hex) => Color::try_from_hex(hex).unwrap_or_else(|| {
                warn!("Malformed color '{}', using black", hex);
                BLACK
            }),
            ColorSpec::Rgb([r, g, b]) => Color {
                r: *r as f64 / 255.0,
                g: *g as f64 / 255.0,
                b: *b as f64 / 255.0,
                a: 1.0,
            },
        }
    }

    /// Canonical `#RRGGBB` form, the key used by the render color cache.
    pub fn to_hex(&self) -> String {
        self.to_color().to_hex()
    }
}
