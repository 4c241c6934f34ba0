//! Scene model: the owned shape collection, selection state, and the
//! round-robin shape-kind rotation.
//!
//! The scene is the single owner of all placed shapes. Mutations mark the
//! scene dirty; a published snapshot is refreshed at most once per
//! [`PUBLISH_INTERVAL`] so rapid drag updates coalesce into one externally
//! observable change. Recoloring and explicit publishes bypass the interval.

use std::time::{Duration, Instant};

use crate::draw::shape::{Shape, ShapeKind};
use crate::draw::Color;

/// Minimum spacing between published snapshots for coalesced mutations
/// (one 60 Hz frame).
pub const PUBLISH_INTERVAL: Duration = Duration::from_millis(16);

/// Default dimensions for newly placed shapes, taken from settings.
///
/// Circles use `width` as their diameter and ignore `height`; triangles use
/// `width` for the base and `height` for the rise.
#[derive(Debug, Clone, Copy)]
pub struct SizeDefaults {
    pub width: f64,
    pub height: f64,
}

/// Canvas dimensions that shapes are clamped into.
#[derive(Debug, Clone, Copy)]
pub struct CanvasBounds {
    pub width: f64,
    pub height: f64,
}

/// Membership of the three shape kinds in the placement rotation.
///
/// The set is non-exclusive and may be empty; an empty set degrades to
/// always placing rectangles.
#[derive(Debug, Clone, Copy)]
pub struct EnabledKinds {
    pub rectangle: bool,
    pub circle: bool,
    pub triangle: bool,
}

impl Default for EnabledKinds {
    fn default() -> Self {
        Self {
            rectangle: true,
            circle: false,
            triangle: false,
        }
    }
}

impl EnabledKinds {
    /// Enabled kinds in fixed rectangle → circle → triangle order.
    pub fn as_list(&self) -> Vec<ShapeKind> {
        let mut kinds = Vec::with_capacity(3);
        if self.rectangle {
            kinds.push(ShapeKind::Rectangle);
        }
        if self.circle {
            kinds.push(ShapeKind::Circle);
        }
        if self.triangle {
            kinds.push(ShapeKind::Triangle);
        }
        kinds
    }

    fn toggle(&mut self, kind: ShapeKind) {
        match kind {
            ShapeKind::Rectangle => self.rectangle = !self.rectangle,
            ShapeKind::Circle => self.circle = !self.circle,
            ShapeKind::Triangle => self.triangle = !self.triangle,
        }
    }
}

/// The mutable scene: shapes, selection, and rotation cursor.
pub struct Scene {
    shapes: Vec<Shape>,
    selected: Option<u64>,
    enabled: EnabledKinds,
    rotation_index: usize,
    next_id: u64,
    published: Vec<Shape>,
    dirty: bool,
    last_publish: Option<Instant>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates an empty scene with the default enabled-kind set
    /// (rectangles only).
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            selected: None,
            enabled: EnabledKinds::default(),
            rotation_index: 0,
            next_id: 1,
            published: Vec::new(),
            dirty: false,
            last_publish: None,
        }
    }

    /// Live shapes in draw order (first = bottom layer, last = top layer).
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// The coalesced snapshot observed by UI collaborators.
    pub fn published(&self) -> &[Shape] {
        &self.published
    }

    /// Looks up a live shape by id.
    pub fn shape(&self, id: u64) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// The currently selected shape, if any.
    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selected.and_then(|id| self.shape(id))
    }

    /// The currently selected shape id, if any.
    pub fn selection(&self) -> Option<u64> {
        self.selected
    }

    /// Enabled-kind membership.
    pub fn enabled_kinds(&self) -> EnabledKinds {
        self.enabled
    }

    /// Selects a shape by id, or clears the selection with `None`.
    ///
    /// Selecting an id that is not present clears instead, so the selection
    /// can never dangle.
    pub fn select(&mut self, id: Option<u64>) {
        self.selected = id.filter(|id| self.shapes.iter().any(|s| s.id == *id));
    }

    /// Returns the topmost shape under `(x, y)`.
    ///
    /// Later list entries draw on top, so the scan runs from the end of the
    /// list backwards and stops at the first hit.
    pub fn shape_at(&self, x: f64, y: f64) -> Option<u64> {
        self.shapes
            .iter()
            .rev()
            .find(|s| s.contains(x, y))
            .map(|s| s.id)
    }

    /// Places a new shape of `kind` centered on `(x, y)`, clamped fully
    /// inside the canvas, and appends it as the topmost shape.
    ///
    /// Returns the new shape's id.
    pub fn add_shape(
        &mut self,
        kind: ShapeKind,
        x: f64,
        y: f64,
        size: SizeDefaults,
        bounds: CanvasBounds,
    ) -> u64 {
        let (width, height) = match kind {
            ShapeKind::Rectangle => (size.width, size.height),
            // Circles are sized by diameter; height mirrors width.
            ShapeKind::Circle => (size.width, size.width),
            ShapeKind::Triangle => (size.width, size.height),
        };

        let id = self.next_id;
        self.next_id += 1;

        let shape = Shape {
            id,
            x: clamp_origin(x - width / 2.0, width, bounds.width),
            y: clamp_origin(y - height / 2.0, height, bounds.height),
            width,
            height,
            kind,
            color: None,
        };
        self.shapes.push(shape);
        self.dirty = true;
        id
    }

    /// Removes a shape by id. Clears the selection in the same step when the
    /// removed shape was selected, so no intermediate state ever holds a
    /// dangling selection.
    pub fn delete_shape(&mut self, id: u64) -> bool {
        let before = self.shapes.len();
        self.shapes.retain(|s| s.id != id);
        if self.shapes.len() == before {
            return false;
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.dirty = true;
        true
    }

    /// Moves a shape to a new top-left position, clamped to the canvas
    /// exactly like placement. Draw order is untouched.
    pub fn move_shape(&mut self, id: u64, x: f64, y: f64, bounds: CanvasBounds) -> bool {
        let Some(shape) = self.shapes.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        shape.x = clamp_origin(x, shape.width, bounds.width);
        shape.y = clamp_origin(y, shape.height, bounds.height);
        self.dirty = true;
        true
    }

    /// Sets or clears a shape's fill override and publishes immediately
    /// (color edits must be visible to collaborators without coalescing).
    pub fn recolor(&mut self, id: u64, color: Option<Color>) -> bool {
        let Some(shape) = self.shapes.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        shape.color = color;
        self.publish_now();
        true
    }

    /// Advances the round-robin rotation and returns the next kind to place.
    ///
    /// With an empty enabled set this returns `Rectangle` without touching
    /// the cursor (degenerate fallback, not an error).
    pub fn next_shape_kind(&mut self) -> ShapeKind {
        let kinds = self.enabled.as_list();
        if kinds.is_empty() {
            return ShapeKind::Rectangle;
        }
        let kind = kinds[self.rotation_index % kinds.len()];
        self.rotation_index = (self.rotation_index + 1) % kinds.len();
        kind
    }

    /// Resets the rotation cursor to the start of the enabled list.
    pub fn reset_rotation(&mut self) {
        self.rotation_index = 0;
    }

    /// Toggles a kind's rotation membership and resets the cursor so it can
    /// never reference a stale index.
    pub fn toggle_kind(&mut self, kind: ShapeKind) {
        self.enabled.toggle(kind);
        self.reset_rotation();
    }

    /// Empties the scene: shapes, selection, and rotation cursor.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.selected = None;
        self.reset_rotation();
        self.publish_now();
    }

    /// Publishes the pending snapshot when the coalescing interval has
    /// elapsed. Returns whether a publish happened.
    pub fn maybe_publish(&mut self) -> bool {
        self.maybe_publish_at(Instant::now())
    }

    /// Publishes unconditionally (drag release, color edits, clear).
    pub fn publish_now(&mut self) {
        self.publish_at(Instant::now());
    }

    fn maybe_publish_at(&mut self, now: Instant) -> bool {
        if !self.dirty {
            return false;
        }
        let due = match self.last_publish {
            Some(last) => now.duration_since(last) >= PUBLISH_INTERVAL,
            None => true,
        };
        if due {
            self.publish_at(now);
        }
        due
    }

    fn publish_at(&mut self, now: Instant) {
        self.published.clear();
        self.published.extend(self.shapes.iter().cloned());
        self.dirty = false;
        self.last_publish = Some(now);
    }
}

/// Clamps a shape origin so the full extent stays inside `[0, limit]`.
///
/// Oversized shapes pin to 0 rather than being rejected.
fn clamp_origin(origin: f64, extent: f64, limit: f64) -> f64 {
    origin.min(limit - extent).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: CanvasBounds = CanvasBounds {
        width: 768.0,
        height: 512.0,
    };
    const SIZE: SizeDefaults = SizeDefaults {
        width: 40.0,
        height: 70.0,
    };

    #[test]
    fn add_shape_centers_on_the_click_point() {
        let mut scene = Scene::new();
        let id = scene.add_shape(ShapeKind::Rectangle, 100.0, 100.0, SIZE, BOUNDS);
        let shape = scene.shape(id).unwrap();
        assert_eq!((shape.x, shape.y), (80.0, 65.0));
        assert_eq!((shape.width, shape.height), (40.0, 70.0));
    }

    #[test]
    fn add_shape_clamps_to_canvas_edges() {
        let mut scene = Scene::new();
        let near_origin = scene.add_shape(ShapeKind::Rectangle, 5.0, 5.0, SIZE, BOUNDS);
        let shape = scene.shape(near_origin).unwrap();
        assert_eq!((shape.x, shape.y), (0.0, 0.0));

        let near_corner = scene.add_shape(ShapeKind::Rectangle, 766.0, 510.0, SIZE, BOUNDS);
        let shape = scene.shape(near_corner).unwrap();
        assert_eq!((shape.x, shape.y), (728.0, 442.0));
    }

    #[test]
    fn circles_duplicate_width_into_height() {
        let mut scene = Scene::new();
        let id = scene.add_shape(ShapeKind::Circle, 100.0, 100.0, SIZE, BOUNDS);
        let shape = scene.shape(id).unwrap();
        assert_eq!(shape.width, 40.0);
        assert_eq!(shape.height, 40.0);
        assert_eq!((shape.x, shape.y), (80.0, 80.0));
    }

    #[test]
    fn hit_testing_returns_the_topmost_shape() {
        let mut scene = Scene::new();
        let bottom = scene.add_shape(ShapeKind::Rectangle, 100.0, 100.0, SIZE, BOUNDS);
        let top = scene.add_shape(ShapeKind::Rectangle, 110.0, 110.0, SIZE, BOUNDS);

        // Overlap region is covered by both; the later-placed shape wins.
        assert_eq!(scene.shape_at(105.0, 105.0), Some(top));
        // A point only the first shape covers.
        assert_eq!(scene.shape_at(81.0, 66.0), Some(bottom));
        assert_eq!(scene.shape_at(500.0, 500.0), None);
    }

    #[test]
    fn deleting_the_selected_shape_clears_selection_in_the_same_step() {
        let mut scene = Scene::new();
        let id = scene.add_shape(ShapeKind::Rectangle, 100.0, 100.0, SIZE, BOUNDS);
        scene.select(Some(id));
        assert_eq!(scene.selection(), Some(id));

        assert!(scene.delete_shape(id));
        assert_eq!(scene.selection(), None);
        assert!(scene.shapes().is_empty());
    }

    #[test]
    fn selecting_a_missing_id_clears_instead_of_dangling() {
        let mut scene = Scene::new();
        scene.select(Some(42));
        assert_eq!(scene.selection(), None);
    }

    #[test]
    fn move_shape_clamps_and_preserves_draw_order() {
        let mut scene = Scene::new();
        let first = scene.add_shape(ShapeKind::Rectangle, 100.0, 100.0, SIZE, BOUNDS);
        let second = scene.add_shape(ShapeKind::Rectangle, 200.0, 200.0, SIZE, BOUNDS);

        assert!(scene.move_shape(first, 900.0, -50.0, BOUNDS));
        let shape = scene.shape(first).unwrap();
        assert_eq!((shape.x, shape.y), (728.0, 0.0));

        // Moving the bottom shape must not reorder the list.
        assert_eq!(scene.shapes()[0].id, first);
        assert_eq!(scene.shapes()[1].id, second);
    }

    #[test]
    fn rotation_with_single_kind_repeats_it() {
        let mut scene = Scene::new();
        for _ in 0..4 {
            assert_eq!(scene.next_shape_kind(), ShapeKind::Rectangle);
        }
    }

    #[test]
    fn rotation_with_empty_set_falls_back_to_rectangle() {
        let mut scene = Scene::new();
        scene.toggle_kind(ShapeKind::Rectangle);
        assert!(scene.enabled_kinds().as_list().is_empty());

        for _ in 0..3 {
            assert_eq!(scene.next_shape_kind(), ShapeKind::Rectangle);
        }

        // The cursor was never advanced while empty: enabling circle starts
        // the rotation from the head of the new list.
        scene.toggle_kind(ShapeKind::Circle);
        assert_eq!(scene.next_shape_kind(), ShapeKind::Circle);
    }

    #[test]
    fn rotation_alternates_between_two_kinds() {
        let mut scene = Scene::new();
        scene.toggle_kind(ShapeKind::Circle);
        let expected = [
            ShapeKind::Rectangle,
            ShapeKind::Circle,
            ShapeKind::Rectangle,
            ShapeKind::Circle,
            ShapeKind::Rectangle,
        ];
        for kind in expected {
            assert_eq!(scene.next_shape_kind(), kind);
        }
    }

    #[test]
    fn toggling_membership_resets_the_cursor() {
        let mut scene = Scene::new();
        scene.toggle_kind(ShapeKind::Circle);
        scene.next_shape_kind(); // cursor now points at Circle

        scene.toggle_kind(ShapeKind::Triangle);
        // Reset: rotation restarts at the head of the new list.
        assert_eq!(scene.next_shape_kind(), ShapeKind::Rectangle);
    }

    #[test]
    fn clear_empties_shapes_selection_and_rotation() {
        let mut scene = Scene::new();
        scene.toggle_kind(ShapeKind::Circle);
        let id = scene.add_shape(ShapeKind::Rectangle, 100.0, 100.0, SIZE, BOUNDS);
        scene.select(Some(id));
        scene.next_shape_kind();

        scene.clear();
        assert!(scene.shapes().is_empty());
        assert!(scene.published().is_empty());
        assert_eq!(scene.selection(), None);
        assert_eq!(scene.next_shape_kind(), ShapeKind::Rectangle);
    }

    #[test]
    fn publishing_coalesces_within_the_interval() {
        let mut scene = Scene::new();
        let t0 = Instant::now();

        let id = scene.add_shape(ShapeKind::Rectangle, 100.0, 100.0, SIZE, BOUNDS);
        assert!(scene.maybe_publish_at(t0), "first publish is immediate");
        assert_eq!(scene.published().len(), 1);

        scene.move_shape(id, 120.0, 120.0, BOUNDS);
        assert!(
            !scene.maybe_publish_at(t0 + Duration::from_millis(5)),
            "within the interval the snapshot must not refresh"
        );
        assert_eq!(scene.published()[0].x, 80.0);

        assert!(scene.maybe_publish_at(t0 + Duration::from_millis(20)));
        assert_eq!(scene.published()[0].x, 120.0);
    }

    #[test]
    fn maybe_publish_is_a_no_op_when_clean() {
        let mut scene = Scene::new();
        assert!(!scene.maybe_publish_at(Instant::now()));
    }

    #[test]
    fn recolor_publishes_immediately() {
        let mut scene = Scene::new();
        let id = scene.add_shape(ShapeKind::Rectangle, 100.0, 100.0, SIZE, BOUNDS);
        scene.publish_now();

        let red = Color::rgb(1.0, 0.0, 0.0);
        assert!(scene.recolor(id, Some(red)));
        assert_eq!(scene.published()[0].color, Some(red));

        assert!(scene.recolor(id, None));
        assert_eq!(scene.published()[0].color, None);
        assert!(!scene.recolor(9999, Some(red)));
    }

    #[test]
    fn ids_stay_unique_across_deletions() {
        let mut scene = Scene::new();
        let a = scene.add_shape(ShapeKind::Rectangle, 100.0, 100.0, SIZE, BOUNDS);
        scene.delete_shape(a);
        let b = scene.add_shape(ShapeKind::Rectangle, 100.0, 100.0, SIZE, BOUNDS);
        assert_ne!(a, b);
    }
}
