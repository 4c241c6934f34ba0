//! Configuration type definitions.

use super::enums::{ColorSpec, StatusPosition};
use serde::{Deserialize, Serialize};

/// Canvas dimensions.
///
/// Only the edge lengths in [`super::presets::CANVAS_SIZES`] are supported;
/// anything else is snapped during validation.
#[derive(Debug, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Canvas width in pixels (512 or 768)
    #[serde(default = "default_canvas_width")]
    pub width: u32,

    /// Canvas height in pixels (512 or 768)
    #[serde(default = "default_canvas_height")]
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
        }
    }
}

/// Defaults for newly placed shapes.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShapeConfig {
    /// Default shape width in pixels (valid range: 20 - 120).
    /// Circles use this as their diameter, triangles as the base width.
    #[serde(default = "default_shape_width")]
    pub width: f64,

    /// Default shape height in pixels (valid range: 20 - 120).
    /// Ignored by circles.
    #[serde(default = "default_shape_height")]
    pub height: f64,

    /// Fill for shapes without an individual color override
    #[serde(default = "default_shape_color")]
    pub color: ColorSpec,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            width: default_shape_width(),
            height: default_shape_height(),
            color: default_shape_color(),
        }
    }
}

/// Ambient scene colors and silhouette parameters.
#[derive(Debug, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Sky / canvas background color
    #[serde(default = "default_background_color")]
    pub background_color: ColorSpec,

    /// Ground band color
    #[serde(default = "default_ground_color")]
    pub ground_color: ColorSpec,

    /// Ground band height in pixels (valid range: 40 - 200)
    #[serde(default = "default_ground_height")]
    pub ground_height: f64,

    /// Silhouette polygon fill color
    #[serde(default = "default_polygon_color")]
    pub polygon_color: ColorSpec,

    /// Outward padding applied to shape outlines before tracing the
    /// silhouette, in pixels (valid range: 0 - 50)
    #[serde(default = "default_polygon_padding")]
    pub polygon_padding: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background_color: default_background_color(),
            ground_color: default_ground_color(),
            ground_height: default_ground_height(),
            polygon_color: default_polygon_color(),
            polygon_padding: default_polygon_padding(),
        }
    }
}

/// UI display preferences.
#[derive(Debug, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show the status bar displaying shape count, selection, and settings
    #[serde(default = "default_show_status")]
    pub show_status_bar: bool,

    /// Status bar screen position (top-left, top-right, bottom-left, bottom-right)
    #[serde(default = "default_status_position")]
    pub status_bar_position: StatusPosition,

    /// Status bar styling options
    #[serde(default)]
    pub status_bar_style: StatusBarStyle,

    /// Help overlay styling options
    #[serde(default)]
    pub help_overlay_style: HelpOverlayStyle,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_status_bar: default_show_status(),
            status_bar_position: default_status_position(),
            status_bar_style: StatusBarStyle::default(),
            help_overlay_style: HelpOverlayStyle::default(),
        }
    }
}

/// Status bar styling configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusBarStyle {
    /// Font size for status bar text
    #[serde(default = "default_status_font_size")]
    pub font_size: f64,

    /// Padding around status bar text
    #[serde(default = "default_status_padding")]
    pub padding: f64,

    /// Background color [R, G, B, A] (0.0-1.0 range)
    #[serde(default = "default_status_bg_color")]
    pub bg_color: [f64; 4],

    /// Text color [R, G, B, A] (0.0-1.0 range)
    #[serde(default = "default_status_text_color")]
    pub text_color: [f64; 4],

    /// Radius of the default-fill indicator dot
    #[serde(default = "default_status_dot_radius")]
    pub dot_radius: f64,
}

impl Default for StatusBarStyle {
    fn default() -> Self {
        Self {
            font_size: default_status_font_size(),
            padding: default_status_padding(),
            bg_color: default_status_bg_color(),
            text_color: default_status_text_color(),
            dot_radius: default_status_dot_radius(),
        }
    }
}

/// Help overlay styling configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct HelpOverlayStyle {
    /// Font size for help overlay text
    #[serde(default = "default_help_font_size")]
    pub font_size: f64,

    /// Line height for help text
    #[serde(default = "default_help_line_height")]
    pub line_height: f64,

    /// Padding around help box
    #[serde(default = "default_help_padding")]
    pub padding: f64,

    /// Background color [R, G, B, A] (0.0-1.0 range)
    #[serde(default = "default_help_bg_color")]
    pub bg_color: [f64; 4],

    /// Border color [R, G, B, A] (0.0-1.0 range)
    #[serde(default = "default_help_border_color")]
    pub border_color: [f64; 4],

    /// Border line width
    #[serde(default = "default_help_border_width")]
    pub border_width: f64,

    /// Text color [R, G, B, A] (0.0-1.0 range)
    #[serde(default = "default_help_text_color")]
    pub text_color: [f64; 4],
}

impl Default for HelpOverlayStyle {
    fn default() -> Self {
        Self {
            font_size: default_help_font_size(),
            line_height: default_help_line_height(),
            padding: default_help_padding(),
            bg_color: default_help_bg_color(),
            border_color: default_help_border_color(),
            border_width: default_help_border_width(),
            text_color: default_help_text_color(),
        }
    }
}

/// PNG export settings.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory exported images are written to (`~` expands to $HOME).
    /// Empty means `~/Pictures/Waysketch`.
    #[serde(default)]
    pub directory: String,

    /// Filename template (supports chrono format specifiers), without
    /// extension
    #[serde(default = "default_export_template")]
    pub filename_template: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: String::new(),
            filename_template: default_export_template(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_canvas_width() -> u32 {
    768
}

fn default_canvas_height() -> u32 {
    512
}

fn default_shape_width() -> f64 {
    40.0
}

fn default_shape_height() -> f64 {
    70.0
}

fn default_shape_color() -> ColorSpec {
    ColorSpec::Hex("#E6E6E6".to_string())
}

fn default_background_color() -> ColorSpec {
    ColorSpec::Hex("#06E6E6".to_string())
}

fn default_ground_color() -> ColorSpec {
    ColorSpec::Hex("#787846".to_string())
}

fn default_ground_height() -> f64 {
    80.0
}

fn default_polygon_color() -> ColorSpec {
    ColorSpec::Hex("#B47878".to_string())
}

fn default_polygon_padding() -> f64 {
    0.0
}

fn default_show_status() -> bool {
    true
}

fn default_status_position() -> StatusPosition {
    StatusPosition::BottomLeft
}

fn default_status_font_size() -> f64 {
    14.0
}

fn default_status_padding() -> f64 {
    10.0
}

fn default_status_bg_color() -> [f64; 4] {
    [0.0, 0.0, 0.0, 0.7]
}

fn default_status_text_color() -> [f64; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

fn default_status_dot_radius() -> f64 {
    5.0
}

fn default_help_font_size() -> f64 {
    14.0
}

fn default_help_line_height() -> f64 {
    20.0
}

fn default_help_padding() -> f64 {
    16.0
}

fn default_help_bg_color() -> [f64; 4] {
    [0.0, 0.0, 0.0, 0.85]
}

fn default_help_border_color() -> [f64; 4] {
    [0.3, 0.6, 1.0, 0.9]
}

fn default_help_border_width() -> f64 {
    2.0
}

fn default_help_text_color() -> [f64; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

fn default_export_template() -> String {
    "building_%Y-%m-%d_%H%M%S".to_string()
}
