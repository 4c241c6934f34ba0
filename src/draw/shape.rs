//! Shape definitions and per-type geometry: containment and outline sampling.

use super::color::Color;

/// Number of points sampled around a circle's circumference for the
/// silhouette outline.
pub const CIRCLE_OUTLINE_SAMPLES: usize = 16;

/// Triangles with a barycentric denominator smaller than this are treated as
/// degenerate and contain no point (guards the division, see [`Shape::contains`]).
const DEGENERATE_DENOM: f64 = 1e-3;

/// A 2D point in canvas pixel coordinates.
///
/// Produced by outline sampling and consumed immediately by the hull sweep;
/// never stored beyond a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// The kind of a placed shape.
///
/// Each kind interprets the shared `(x, y, width, height)` fields with its
/// own semantics; dispatch is always a `match` on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Axis-aligned rectangle; `(x, y)` top-left, `width`/`height` literal.
    Rectangle,
    /// Circle; `(x, y)` is the bounding-box top-left and `width` is the
    /// diameter. `height` duplicates `width` for storage symmetry.
    Circle,
    /// Isoceles triangle, apex up; apex at `(x + width/2, y)`, base corners
    /// at `(x, y + height)` and `(x + width, y + height)`.
    Triangle,
}

impl ShapeKind {
    /// Human-readable kind name for the status bar and logs.
    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rect",
            ShapeKind::Circle => "circle",
            ShapeKind::Triangle => "triangle",
        }
    }
}

/// A placed shape on the canvas.
///
/// Shapes are owned exclusively by the scene; everything else refers to them
/// by `id`, which stays stable for the shape's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Stable identifier, unique within a scene.
    pub id: u64,
    /// Top-left anchor X in canvas pixels.
    pub x: f64,
    /// Top-left anchor Y in canvas pixels.
    pub y: f64,
    /// Width in pixels (circle: diameter).
    pub width: f64,
    /// Height in pixels (circle: duplicates `width`).
    pub height: f64,
    /// Shape kind tag.
    pub kind: ShapeKind,
    /// Per-shape fill override; `None` uses the settings default.
    pub color: Option<Color>,
}

impl Shape {
    /// Geometric center of the shape.
    ///
    /// The circle center derives both axes from `width`, matching its
    /// diameter-only sizing.
    pub fn center(&self) -> Point {
        match self.kind {
            ShapeKind::Circle => {
                Point::new(self.x + self.width / 2.0, self.y + self.width / 2.0)
            }
            ShapeKind::Rectangle | ShapeKind::Triangle => {
                Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
            }
        }
    }

    /// The three triangle vertices: apex, bottom-left, bottom-right.
    fn triangle_vertices(&self) -> [Point; 3] {
        [
            Point::new(self.x + self.width / 2.0, self.y),
            Point::new(self.x, self.y + self.height),
            Point::new(self.x + self.width, self.y + self.height),
        ]
    }

    /// Hit test against the shape's exact geometry (no padding).
    pub fn contains(&self, px: f64, py: f64) -> bool {
        match self.kind {
            ShapeKind::Rectangle => {
                px >= self.x
                    && px <= self.x + self.width
                    && py >= self.y
                    && py <= self.y + self.height
            }
            ShapeKind::Circle => {
                let center = self.center();
                center.distance(Point::new(px, py)) <= self.width / 2.0
            }
            ShapeKind::Triangle => {
                let [v0, v1, v2] = self.triangle_vertices();
                let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);
                if denom.abs() < DEGENERATE_DENOM {
                    return false;
                }
                let a = ((v1.y - v2.y) * (px - v2.x) + (v2.x - v1.x) * (py - v2.y)) / denom;
                let b = ((v2.y - v0.y) * (px - v2.x) + (v0.x - v2.x) * (py - v2.y)) / denom;
                let c = 1.0 - a - b;
                a >= 0.0 && b >= 0.0 && c >= 0.0
            }
        }
    }

    /// Appends the shape's outline sample to `out`, expanded outward by
    /// `padding` (which may be 0).
    ///
    /// Rectangles contribute their 4 corners, circles a
    /// [`CIRCLE_OUTLINE_SAMPLES`]-point ring, triangles their 3 vertices.
    pub fn sample_outline(&self, padding: f64, out: &mut Vec<Point>) {
        match self.kind {
            ShapeKind::Rectangle => {
                out.push(Point::new(self.x - padding, self.y - padding));
                out.push(Point::new(self.x + self.width + padding, self.y - padding));
                out.push(Point::new(
                    self.x + self.width + padding,
                    self.y + self.height + padding,
                ));
                out.push(Point::new(self.x - padding, self.y + self.height + padding));
            }
            ShapeKind::Circle => {
                let center = self.center();
                let radius = self.width / 2.0 + padding;
                for i in 0..CIRCLE_OUTLINE_SAMPLES {
                    let angle =
                        (i as f64 / CIRCLE_OUTLINE_SAMPLES as f64) * std::f64::consts::TAU;
                    out.push(Point::new(
                        center.x + angle.cos() * radius,
                        center.y + angle.sin() * radius,
                    ));
                }
            }
            ShapeKind::Triangle => {
                out.push(Point::new(self.x + self.width / 2.0, self.y - padding));
                out.push(Point::new(self.x - padding, self.y + self.height + padding));
                out.push(Point::new(
                    self.x + self.width + padding,
                    self.y + self.height + padding,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(kind: ShapeKind, x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape {
            id: 1,
            x,
            y,
            width: w,
            height: h,
            kind,
            color: None,
        }
    }

    #[test]
    fn every_kind_contains_its_own_center() {
        for kind in [ShapeKind::Rectangle, ShapeKind::Circle, ShapeKind::Triangle] {
            let s = shape(kind, 10.0, 20.0, 40.0, 70.0);
            let c = s.center();
            assert!(s.contains(c.x, c.y), "{kind:?} should contain its center");
        }
    }

    #[test]
    fn no_kind_contains_far_points() {
        for kind in [ShapeKind::Rectangle, ShapeKind::Circle, ShapeKind::Triangle] {
            let s = shape(kind, 10.0, 20.0, 40.0, 70.0);
            let c = s.center();
            let far = s.width.max(s.height) + 1.0;
            assert!(!s.contains(c.x + far, c.y));
            assert!(!s.contains(c.x, c.y + far));
            assert!(!s.contains(c.x - far, c.y - far));
        }
    }

    #[test]
    fn rectangle_bounds_are_inclusive() {
        let s = shape(ShapeKind::Rectangle, 0.0, 0.0, 40.0, 70.0);
        assert!(s.contains(0.0, 0.0));
        assert!(s.contains(40.0, 70.0));
        assert!(!s.contains(40.1, 70.0));
        assert!(!s.contains(-0.1, 0.0));
    }

    #[test]
    fn circle_ignores_height_for_hit_testing() {
        // Diameter 40, stale height 70: hit testing uses the diameter only.
        let s = shape(ShapeKind::Circle, 0.0, 0.0, 40.0, 70.0);
        assert!(s.contains(20.0, 39.9));
        assert!(!s.contains(20.0, 41.0));
    }

    #[test]
    fn degenerate_triangle_contains_nothing() {
        let s = shape(ShapeKind::Triangle, 0.0, 0.0, 40.0, 0.0);
        let c = s.center();
        assert!(!s.contains(c.x, c.y));
        assert!(!s.contains(0.0, 0.0));
    }

    #[test]
    fn rectangle_outline_is_padded_corners() {
        let s = shape(ShapeKind::Rectangle, 10.0, 20.0, 40.0, 70.0);
        let mut pts = Vec::new();
        s.sample_outline(5.0, &mut pts);
        assert_eq!(pts.len(), 4);
        assert!(pts.contains(&Point::new(5.0, 15.0)));
        assert!(pts.contains(&Point::new(55.0, 15.0)));
        assert!(pts.contains(&Point::new(55.0, 95.0)));
        assert!(pts.contains(&Point::new(5.0, 95.0)));
    }

    #[test]
    fn circle_outline_is_a_sixteen_point_ring() {
        let s = shape(ShapeKind::Circle, 0.0, 0.0, 40.0, 40.0);
        let mut pts = Vec::new();
        s.sample_outline(3.0, &mut pts);
        assert_eq!(pts.len(), CIRCLE_OUTLINE_SAMPLES);
        let center = s.center();
        for p in &pts {
            assert!((center.distance(*p) - 23.0).abs() < 1e-9);
        }
    }

    #[test]
    fn triangle_outline_pushes_vertices_outward() {
        let s = shape(ShapeKind::Triangle, 10.0, 20.0, 40.0, 70.0);
        let mut pts = Vec::new();
        s.sample_outline(2.0, &mut pts);
        assert_eq!(
            pts,
            vec![
                Point::new(30.0, 18.0),
                Point::new(8.0, 92.0),
                Point::new(52.0, 92.0),
            ]
        );
    }

    #[test]
    fn zero_padding_samples_exact_geometry() {
        let s = shape(ShapeKind::Rectangle, 0.0, 0.0, 40.0, 70.0);
        let mut pts = Vec::new();
        s.sample_outline(0.0, &mut pts);
        assert_eq!(
            pts,
            vec![
                Point::new(0.0, 0.0),
                Point::new(40.0, 0.0),
                Point::new(40.0, 70.0),
                Point::new(0.0, 70.0),
            ]
        );
    }
}
