//! Fixed color palettes cycled by the palette keybindings.
//!
//! The palette entries follow the ADE20K segmentation color conventions the
//! sketches are meant to feed: windows, doors, ground materials, and
//! building masses each keep their canonical label color.

/// A named palette entry.
#[derive(Debug, Clone, Copy)]
pub struct ColorPreset {
    /// `#RRGGBB` color value.
    pub color: &'static str,
    /// Human-readable label shown in the status bar.
    pub name: &'static str,
}

/// Palette for shape fills (windows, doors, and related openings).
pub const SHAPE_PRESETS: &[ColorPreset] = &[
    ColorPreset { color: "#E6E6E6", name: "Window" },
    ColorPreset { color: "#08FF33", name: "Door" },
    ColorPreset { color: "#DCDCDC", name: "Mirror" },
    ColorPreset { color: "#19C2C2", name: "Glass" },
];

/// Palette for the ground band.
pub const GROUND_PRESETS: &[ColorPreset] = &[
    ColorPreset { color: "#04FA07", name: "Grass" },
    ColorPreset { color: "#04C803", name: "Tree" },
    ColorPreset { color: "#0052FF", name: "Palm Tree" },
    ColorPreset { color: "#8C8C8C", name: "Road" },
    ColorPreset { color: "#787846", name: "Ground, Earth" },
    ColorPreset { color: "#3DE6FA", name: "Water" },
    ColorPreset { color: "#0907E6", name: "Sea" },
    ColorPreset { color: "#A09614", name: "Sand" },
    ColorPreset { color: "#00C2FF", name: "Soil, Land" },
    ColorPreset { color: "#0ABED4", name: "Lake" },
    ColorPreset { color: "#8FFF8C", name: "Mountain" },
];

/// Palette for the silhouette polygon.
pub const BUILDING_PRESETS: &[ColorPreset] = &[
    ColorPreset { color: "#787878", name: "Wall" },
    ColorPreset { color: "#B47878", name: "Building" },
    ColorPreset { color: "#FF290A", name: "Rock, Stone" },
    ColorPreset { color: "#FF6600", name: "Hill" },
    ColorPreset { color: "#FF09E0", name: "House" },
    ColorPreset { color: "#8C8C8C", name: "Skyscraper" },
];

/// Supported canvas edge lengths, cycled per axis by the canvas-size binding.
pub const CANVAS_SIZES: &[u32] = &[512, 768];

/// Index of `hex` in `palette`, when the current color is a preset.
pub fn preset_index(palette: &[ColorPreset], hex: &str) -> Option<usize> {
    palette.iter().position(|p| p.color.eq_ignore_ascii_case(hex))
}

/// The entry after `hex` in `palette`, wrapping around; starts at the first
/// entry when the current color is not from the palette.
pub fn next_preset(palette: &[ColorPreset], hex: &str) -> ColorPreset {
    match preset_index(palette, hex) {
        Some(i) => palette[(i + 1) % palette.len()],
        None => palette[0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_preset_cycles_and_wraps() {
        let first = next_preset(SHAPE_PRESETS, "nonsense");
        assert_eq!(first.color, "#E6E6E6");

        let second = next_preset(SHAPE_PRESETS, first.color);
        assert_eq!(second.color, "#08FF33");

        let last = SHAPE_PRESETS[SHAPE_PRESETS.len() - 1];
        assert_eq!(next_preset(SHAPE_PRESETS, last.color).color, "#E6E6E6");
    }

    #[test]
    fn preset_lookup_ignores_case() {
        assert_eq!(preset_index(BUILDING_PRESETS, "#b47878"), Some(1));
    }

    #[test]
    fn palettes_hold_valid_hex_colors() {
        for preset in SHAPE_PRESETS
            .iter()
            .chain(GROUND_PRESETS)
            .chain(BUILDING_PRESETS)
        {
            assert!(
                crate::draw::Color::try_from_hex(preset.color).is_some(),
                "bad palette entry {}",
                preset.color
            );
        }
    }
}
