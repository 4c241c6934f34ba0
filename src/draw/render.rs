//! Cairo-based rendering of the scene layers.
//!
//! Every frame paints, in fixed order: background, ground band, silhouette
//! polygon, then the shapes themselves (list order, later entries on top).
//! Fill-state modifiers darken dragged and hovered shapes and brighten the
//! selection; they apply to fill color only, never to geometry.

use super::color::Color;
use super::hull;
use super::shape::{Shape, ShapeKind};
use crate::input::{EditorSettings, InputState};

/// Hover darkens the fill by this amount (15/255, matching the original
/// product's 8-bit math).
const HOVER_DIM: f64 = 15.0 / 255.0;

/// Dragging darkens the fill slightly more than hover.
const DRAG_DIM: f64 = 25.0 / 255.0;

/// Selection brightens the fill.
const SELECT_LIGHT: f64 = 10.0 / 255.0;

/// The parsed ambient colors for one frame.
#[derive(Debug, Clone, Copy)]
pub struct SceneColors {
    /// Sky / canvas background fill
    pub background: Color,
    /// Ground band fill
    pub ground: Color,
    /// Silhouette polygon fill
    pub polygon: Color,
    /// Fill for shapes without an override
    pub default_shape: Color,
}

impl SceneColors {
    fn parse(settings: &EditorSettings) -> Self {
        Self {
            background: Color::from_hex(&settings.background_color),
            ground: Color::from_hex(&settings.ground_color),
            polygon: Color::from_hex(&settings.polygon_color),
            default_shape: Color::from_hex(&settings.shape_color),
        }
    }
}

/// Caches parsed settings colors between frames.
///
/// Parsing is keyed on the four hex strings; the cache reparses only when
/// one of them actually changed, not unconditionally every frame.
#[derive(Debug)]
pub struct ColorCache {
    key: [String; 4],
    colors: SceneColors,
}

impl ColorCache {
    /// Parses the initial colors from settings.
    pub fn new(settings: &EditorSettings) -> Self {
        Self {
            key: Self::key_of(settings),
            colors: SceneColors::parse(settings),
        }
    }

    fn key_of(settings: &EditorSettings) -> [String; 4] {
        [
            settings.background_color.clone(),
            settings.ground_color.clone(),
            settings.polygon_color.clone(),
            settings.shape_color.clone(),
        ]
    }

    /// Reparses when any configured color changed since the last frame.
    /// Returns whether a reparse happened.
    pub fn refresh(&mut self, settings: &EditorSettings) -> bool {
        let key = Self::key_of(settings);
        if key == self.key {
            return false;
        }
        self.key = key;
        self.colors = SceneColors::parse(settings);
        true
    }

    /// The cached frame colors.
    pub fn colors(&self) -> &SceneColors {
        &self.colors
    }
}

/// Renders the full scene (all four layers) to a Cairo context.
///
/// The context is expected to cover the canvas described by
/// `state.settings`; the export path reuses this on an offscreen surface.
pub fn render_scene(ctx: &cairo::Context, state: &InputState, colors: &SceneColors) {
    let settings = &state.settings;
    let width = settings.canvas_width as f64;
    let height = settings.canvas_height as f64;

    // Layer 1: background
    ctx.set_source_rgba(
        colors.background.r,
        colors.background.g,
        colors.background.b,
        colors.background.a,
    );
    let _ = ctx.paint();

    // Layer 2: ground band, anchored to the bottom edge
    ctx.set_source_rgba(
        colors.ground.r,
        colors.ground.g,
        colors.ground.b,
        colors.ground.a,
    );
    ctx.rectangle(
        0.0,
        height - settings.ground_height,
        width,
        settings.ground_height,
    );
    let _ = ctx.fill();

    // Layer 3: silhouette polygon, behind the shapes
    let outline = hull::silhouette(state.scene.shapes(), settings.polygon_padding);
    if outline.len() > 2 {
        ctx.set_source_rgba(
            colors.polygon.r,
            colors.polygon.g,
            colors.polygon.b,
            colors.polygon.a,
        );
        ctx.move_to(outline[0].x, outline[0].y);
        for point in &outline[1..] {
            ctx.line_to(point.x, point.y);
        }
        ctx.close_path();
        let _ = ctx.fill();
    }

    // Layer 4: shapes, topmost last
    let dragged = state.dragged_shape();
    let selected = state.scene.selection();
    for shape in state.scene.shapes() {
        let fill = shape_fill(shape, colors, state.hovered, dragged, selected);
        render_shape(ctx, shape, fill);
    }
}

/// Resolves the fill for one shape, applying at most one visual-state
/// modifier: hover (while not dragging), drag, or selection.
fn shape_fill(
    shape: &Shape,
    colors: &SceneColors,
    hovered: Option<u64>,
    dragged: Option<u64>,
    selected: Option<u64>,
) -> Color {
    let base = shape.color.unwrap_or(colors.default_shape);
    if hovered == Some(shape.id) && dragged.is_none() {
        base.dimmed(HOVER_DIM)
    } else if dragged == Some(shape.id) {
        base.dimmed(DRAG_DIM)
    } else if selected == Some(shape.id) {
        base.lightened(SELECT_LIGHT)
    } else {
        base
    }
}

/// Renders a single filled shape (no stroke).
pub fn render_shape(ctx: &cairo::Context, shape: &Shape, color: Color) {
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    match shape.kind {
        ShapeKind::Rectangle => {
            ctx.rectangle(shape.x, shape.y, shape.width, shape.height);
        }
        ShapeKind::Circle => {
            let center = shape.center();
            ctx.arc(
                center.x,
                center.y,
                shape.width / 2.0,
                0.0,
                std::f64::consts::TAU,
            );
        }
        ShapeKind::Triangle => {
            ctx.move_to(shape.x + shape.width / 2.0, shape.y);
            ctx.line_to(shape.x, shape.y + shape.height);
            ctx.line_to(shape.x + shape.width, shape.y + shape.height);
            ctx.close_path();
        }
    }
    let _ = ctx.fill();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn state() -> InputState {
        InputState::from_config(&Config::default())
    }

    #[test]
    fn cache_reparses_only_on_change() {
        let mut input = state();
        let mut cache = ColorCache::new(&input.settings);
        assert!(!cache.refresh(&input.settings));
        assert!(!cache.refresh(&input.settings));

        input.settings.ground_color = "#0052FF".to_string();
        assert!(cache.refresh(&input.settings));
        assert_eq!(cache.colors().ground, Color::from_hex("#0052FF"));
        assert!(!cache.refresh(&input.settings));
    }

    #[test]
    fn malformed_settings_colors_degrade_to_black() {
        let mut input = state();
        input.settings.polygon_color = "definitely not hex".to_string();
        let cache = ColorCache::new(&input.settings);
        assert_eq!(cache.colors().polygon, crate::draw::color::BLACK);
    }

    #[test]
    fn fill_modifiers_are_mutually_exclusive() {
        let shape = Shape {
            id: 7,
            x: 0.0,
            y: 0.0,
            width: 40.0,
            height: 70.0,
            kind: ShapeKind::Rectangle,
            color: None,
        };
        let input = state();
        let colors = *ColorCache::new(&input.settings).colors();
        let base = colors.default_shape;

        // Hover wins while nothing is dragged.
        let fill = shape_fill(&shape, &colors, Some(7), None, Some(7));
        assert_eq!(fill, base.dimmed(HOVER_DIM));

        // An active drag suppresses hover and selection emphasis.
        let fill = shape_fill(&shape, &colors, None, Some(7), Some(7));
        assert_eq!(fill, base.dimmed(DRAG_DIM));

        // Selection alone brightens.
        let fill = shape_fill(&shape, &colors, None, None, Some(7));
        assert_eq!(fill, base.lightened(SELECT_LIGHT));

        // Unrelated shape ids leave the fill untouched.
        let fill = shape_fill(&shape, &colors, Some(1), Some(2), Some(3));
        assert_eq!(fill, base);
    }

    #[test]
    fn override_color_feeds_the_modifiers() {
        let red = Color::rgb(1.0, 0.0, 0.0);
        let shape = Shape {
            id: 1,
            x: 0.0,
            y: 0.0,
            width: 40.0,
            height: 40.0,
            kind: ShapeKind::Circle,
            color: Some(red),
        };
        let input = state();
        let colors = *ColorCache::new(&input.settings).colors();
        let fill = shape_fill(&shape, &colors, None, None, Some(1));
        assert_eq!(fill, red.lightened(SELECT_LIGHT));
    }
}
