//! Runtime editor settings, mutated by the keyboard collaborator layer.
//!
//! Colors are kept as canonical `#RRGGBB` strings so the render pipeline can
//! detect changes by string comparison before reparsing anything.

use crate::config::{presets, Config, CANVAS_SIZES};
use crate::scene::{CanvasBounds, SizeDefaults};

/// Process-wide editor settings.
///
/// Initialized from [`Config`] at startup; afterwards only the keybinding
/// handlers mutate it. The geometry core treats it as read-only input.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSettings {
    /// Default width for new shapes (circle diameter, triangle base).
    pub shape_width: f64,
    /// Default height for new shapes (ignored by circles).
    pub shape_height: f64,
    /// Default shape fill as `#RRGGBB`.
    pub shape_color: String,
    /// Sky color as `#RRGGBB`.
    pub background_color: String,
    /// Ground band color as `#RRGGBB`.
    pub ground_color: String,
    /// Ground band height in pixels.
    pub ground_height: f64,
    /// Silhouette polygon color as `#RRGGBB`.
    pub polygon_color: String,
    /// Outward silhouette padding in pixels.
    pub polygon_padding: f64,
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
}

impl EditorSettings {
    /// Builds runtime settings from the (already validated) config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            shape_width: config.shape.width,
            shape_height: config.shape.height,
            shape_color: config.shape.color.to_hex(),
            background_color: config.scene.background_color.to_hex(),
            ground_color: config.scene.ground_color.to_hex(),
            ground_height: config.scene.ground_height,
            polygon_color: config.scene.polygon_color.to_hex(),
            polygon_padding: config.scene.polygon_padding,
            canvas_width: config.canvas.width,
            canvas_height: config.canvas.height,
        }
    }

    /// Canvas bounds used for placement and drag clamping.
    pub fn bounds(&self) -> CanvasBounds {
        CanvasBounds {
            width: self.canvas_width as f64,
            height: self.canvas_height as f64,
        }
    }

    /// Default size for the next placed shape.
    pub fn size_defaults(&self) -> SizeDefaults {
        SizeDefaults {
            width: self.shape_width,
            height: self.shape_height,
        }
    }

    /// Adjusts the default shape width, clamped to 20-120.
    pub fn adjust_shape_width(&mut self, delta: f64) {
        self.shape_width = (self.shape_width + delta).clamp(20.0, 120.0);
        log::debug!("Shape width adjusted to {:.0}px", self.shape_width);
    }

    /// Adjusts the default shape height, clamped to 20-120.
    pub fn adjust_shape_height(&mut self, delta: f64) {
        self.shape_height = (self.shape_height + delta).clamp(20.0, 120.0);
        log::debug!("Shape height adjusted to {:.0}px", self.shape_height);
    }

    /// Adjusts the silhouette padding, clamped to 0-50.
    pub fn adjust_polygon_padding(&mut self, delta: f64) {
        self.polygon_padding = (self.polygon_padding + delta).clamp(0.0, 50.0);
        log::debug!("Polygon padding adjusted to {:.0}px", self.polygon_padding);
    }

    /// Adjusts the ground band height, clamped to 40-200.
    pub fn adjust_ground_height(&mut self, delta: f64) {
        self.ground_height = (self.ground_height + delta).clamp(40.0, 200.0);
        log::debug!("Ground height adjusted to {:.0}px", self.ground_height);
    }

    /// Advances to the next canvas size preset combination.
    ///
    /// The combinations walk the cartesian product of [`CANVAS_SIZES`] per
    /// axis in a fixed order; an unknown current size restarts at the first
    /// combination.
    pub fn cycle_canvas_size(&mut self) {
        let combos: Vec<(u32, u32)> = CANVAS_SIZES
            .iter()
            .flat_map(|w| CANVAS_SIZES.iter().map(move |h| (*w, *h)))
            .collect();
        let current = (self.canvas_width, self.canvas_height);
        let next = match combos.iter().position(|c| *c == current) {
            Some(i) => combos[(i + 1) % combos.len()],
            None => combos[0],
        };
        self.canvas_width = next.0;
        self.canvas_height = next.1;
        log::info!("Canvas size set to {}x{}", next.0, next.1);
    }

    /// Advances the default shape fill through the window/door palette.
    pub fn cycle_shape_color(&mut self) {
        self.shape_color = presets::next_preset(presets::SHAPE_PRESETS, &self.shape_color)
            .color
            .to_string();
    }

    /// Advances the ground color through the ground palette.
    pub fn cycle_ground_color(&mut self) {
        self.ground_color = presets::next_preset(presets::GROUND_PRESETS, &self.ground_color)
            .color
            .to_string();
    }

    /// Advances the polygon color through the building palette.
    pub fn cycle_polygon_color(&mut self) {
        self.polygon_color = presets::next_preset(presets::BUILDING_PRESETS, &self.polygon_color)
            .color
            .to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> EditorSettings {
        EditorSettings::from_config(&Config::default())
    }

    #[test]
    fn from_config_canonicalizes_colors() {
        let s = settings();
        assert_eq!(s.shape_color, "#E6E6E6");
        assert_eq!(s.background_color, "#06E6E6");
        assert_eq!(s.ground_color, "#787846");
        assert_eq!(s.polygon_color, "#B47878");
        assert_eq!((s.canvas_width, s.canvas_height), (768, 512));
    }

    #[test]
    fn adjustments_clamp_to_their_ranges() {
        let mut s = settings();
        s.adjust_shape_width(1000.0);
        assert_eq!(s.shape_width, 120.0);
        s.adjust_shape_width(-1000.0);
        assert_eq!(s.shape_width, 20.0);

        s.adjust_polygon_padding(-5.0);
        assert_eq!(s.polygon_padding, 0.0);
        s.adjust_polygon_padding(75.0);
        assert_eq!(s.polygon_padding, 50.0);

        s.adjust_ground_height(500.0);
        assert_eq!(s.ground_height, 200.0);
        s.adjust_ground_height(-500.0);
        assert_eq!(s.ground_height, 40.0);
    }

    #[test]
    fn canvas_cycle_visits_every_combination() {
        let mut s = settings();
        let start = (s.canvas_width, s.canvas_height);
        let mut seen = vec![start];
        for _ in 0..3 {
            s.cycle_canvas_size();
            seen.push((s.canvas_width, s.canvas_height));
        }
        s.cycle_canvas_size();
        assert_eq!((s.canvas_width, s.canvas_height), start);
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn color_cycles_draw_from_their_palettes() {
        let mut s = settings();
        s.cycle_shape_color();
        assert_eq!(s.shape_color, "#08FF33");

        // #787846 is the "Ground, Earth" preset; the next entry is Water.
        s.cycle_ground_color();
        assert_eq!(s.ground_color, "#3DE6FA");

        s.cycle_polygon_color();
        assert_eq!(s.polygon_color, "#FF290A");
    }
}
