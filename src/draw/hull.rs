//! Silhouette polygon derivation: outline sampling, dedup, and a
//! polar-angle convex-hull sweep.
//!
//! The building silhouette is the convex hull of every placed shape's padded
//! outline sample. The sweep discards exactly-collinear boundary points
//! (the pop condition is `cross <= 0`), which keeps the polygon minimal for
//! axis-aligned rectangle clusters; the dedup pass is a greedy first-wins
//! scan, not symmetric clustering. Both behaviors are load-bearing for
//! stable vertex counts and are covered by tests below.

use std::cmp::Ordering;

use super::shape::{Point, Shape};

/// Two sampled points closer than this on both axes collapse into one.
const DEDUP_TOLERANCE: f64 = 2.0;

/// Polar angles closer than this are tie-broken by distance from the pivot.
const ANGLE_TIE_EPSILON: f64 = 1e-3;

/// Derives the silhouette polygon for the given shapes.
///
/// Samples every shape's outline exactly once (expanded by `padding`),
/// deduplicates near-identical points, and sweeps the convex hull. The
/// result is an ordered boundary, returned open (callers close it when
/// drawing). Fewer than 3 points means "no polygon" and callers must skip
/// rendering it.
pub fn silhouette(shapes: &[Shape], padding: f64) -> Vec<Point> {
    if shapes.is_empty() {
        return Vec::new();
    }

    let mut points = Vec::with_capacity(shapes.len() * 4);
    for shape in shapes {
        shape.sample_outline(padding, &mut points);
    }
    if points.len() < 3 {
        return points;
    }

    convex_hull(dedup_points(&points))
}

/// Keeps the first occurrence of every near-equal point.
///
/// A point survives only when no point earlier in the input (kept or not)
/// lies within [`DEDUP_TOLERANCE`] on both axes.
fn dedup_points(points: &[Point]) -> Vec<Point> {
    let mut unique = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        let seen_earlier = points[..i].iter().any(|q| {
            (q.x - p.x).abs() < DEDUP_TOLERANCE && (q.y - p.y).abs() < DEDUP_TOLERANCE
        });
        if !seen_earlier {
            unique.push(*p);
        }
    }
    unique
}

/// Graham-scan convex hull over deduplicated points.
///
/// Pivot is the maximum-y point (ties broken by minimum x). Remaining points
/// are sorted by polar angle around the pivot, ascending, with near-equal
/// angles ordered by distance. The sweep pops while the top two stack points
/// and the candidate fail to make a strict left turn.
fn convex_hull(points: Vec<Point>) -> Vec<Point> {
    if points.len() < 3 {
        return points;
    }

    let mut pivot = points[0];
    for p in &points[1..] {
        if p.y > pivot.y || (p.y == pivot.y && p.x < pivot.x) {
            pivot = *p;
        }
    }

    // Dedup guarantees no two points compare equal, so this removes exactly
    // the pivot.
    let mut sorted: Vec<Point> = points.into_iter().filter(|p| *p != pivot).collect();
    sorted.sort_by(|a, b| {
        let angle_a = (a.y - pivot.y).atan2(a.x - pivot.x);
        let angle_b = (b.y - pivot.y).atan2(b.x - pivot.x);
        if (angle_a - angle_b).abs() < ANGLE_TIE_EPSILON {
            let dist_a = pivot.distance(*a);
            let dist_b = pivot.distance(*b);
            dist_a.partial_cmp(&dist_b).unwrap_or(Ordering::Equal)
        } else {
            angle_a.partial_cmp(&angle_b).unwrap_or(Ordering::Equal)
        }
    });

    let mut hull = vec![pivot];
    for point in sorted {
        while hull.len() > 1 {
            let top = hull[hull.len() - 1];
            let below = hull[hull.len() - 2];
            let cross = (top.x - below.x) * (point.y - below.y)
                - (top.y - below.y) * (point.x - below.x);
            if cross > 0.0 {
                break;
            }
            hull.pop();
        }
        hull.push(point);
    }
    hull
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::shape::{ShapeKind, CIRCLE_OUTLINE_SAMPLES};

    fn rect(id: u64, x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape {
            id,
            x,
            y,
            width: w,
            height: h,
            kind: ShapeKind::Rectangle,
            color: None,
        }
    }

    fn contains_point(hull: &[Point], p: Point) -> bool {
        hull.iter()
            .any(|q| (q.x - p.x).abs() < 1e-9 && (q.y - p.y).abs() < 1e-9)
    }

    #[test]
    fn empty_scene_yields_no_polygon() {
        assert!(silhouette(&[], 10.0).is_empty());
    }

    #[test]
    fn single_rectangle_hull_is_its_four_corners() {
        let hull = silhouette(&[rect(1, 0.0, 0.0, 40.0, 70.0)], 0.0);
        assert_eq!(hull.len(), 4);
        for corner in [
            Point::new(0.0, 0.0),
            Point::new(40.0, 0.0),
            Point::new(40.0, 70.0),
            Point::new(0.0, 70.0),
        ] {
            assert!(contains_point(&hull, corner), "missing corner {corner:?}");
        }
        // Consecutive edges of the sweep output must all turn the same way,
        // i.e. the quadrilateral is convex and non-self-intersecting.
        let n = hull.len();
        for i in 0..n {
            let a = hull[i];
            let b = hull[(i + 1) % n];
            let c = hull[(i + 2) % n];
            let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
            assert!(cross > 0.0, "non-left turn at vertex {i}");
        }
    }

    #[test]
    fn two_rectangle_hull_keeps_only_outer_corners() {
        let shapes = [rect(1, 0.0, 0.0, 40.0, 40.0), rect(2, 100.0, 0.0, 40.0, 40.0)];
        let hull = silhouette(&shapes, 0.0);

        // The shared-edge corners are collinear with the outer ones and are
        // discarded by the sweep.
        assert_eq!(hull.len(), 4);
        for corner in [
            Point::new(0.0, 0.0),
            Point::new(140.0, 0.0),
            Point::new(140.0, 40.0),
            Point::new(0.0, 40.0),
        ] {
            assert!(contains_point(&hull, corner), "missing corner {corner:?}");
        }
        assert!(!contains_point(&hull, Point::new(40.0, 0.0)));
        assert!(!contains_point(&hull, Point::new(100.0, 40.0)));
    }

    #[test]
    fn padding_expands_the_hull() {
        let hull = silhouette(&[rect(1, 10.0, 10.0, 40.0, 70.0)], 15.0);
        assert_eq!(hull.len(), 4);
        assert!(contains_point(&hull, Point::new(-5.0, -5.0)));
        assert!(contains_point(&hull, Point::new(65.0, 95.0)));
    }

    #[test]
    fn single_circle_keeps_all_ring_samples() {
        let circle = Shape {
            id: 1,
            x: 100.0,
            y: 100.0,
            width: 40.0,
            height: 40.0,
            kind: ShapeKind::Circle,
            color: None,
        };
        let hull = silhouette(&[circle], 0.0);
        assert_eq!(hull.len(), CIRCLE_OUTLINE_SAMPLES);
    }

    #[test]
    fn dedup_merges_close_points_and_keeps_distant_ones() {
        let merged = dedup_points(&[Point::new(10.0, 10.0), Point::new(11.0, 11.0)]);
        assert_eq!(merged, vec![Point::new(10.0, 10.0)]);

        let kept = dedup_points(&[Point::new(10.0, 10.0), Point::new(13.0, 10.0)]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn dedup_compares_against_all_earlier_points() {
        // The middle point is dropped as a duplicate of the first; the third
        // is still dropped because it sits within tolerance of the (already
        // dropped) middle one. First-wins against the raw input, by design.
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(1.5, 0.0),
            Point::new(3.0, 0.0),
        ];
        assert_eq!(dedup_points(&pts), vec![Point::new(0.0, 0.0)]);
    }

    #[test]
    fn degenerate_sample_set_is_returned_without_a_hull() {
        // A zero-sized rectangle samples four identical corners which
        // collapse to a single point; no polygon is produced.
        let hull = silhouette(&[rect(1, 50.0, 50.0, 0.0, 0.0)], 0.0);
        assert_eq!(hull.len(), 1);
    }

    #[test]
    fn hull_vertex_set_is_shape_order_independent() {
        let a = rect(1, 0.0, 0.0, 40.0, 70.0);
        let b = rect(2, 200.0, 30.0, 40.0, 70.0);
        let forward = silhouette(&[a.clone(), b.clone()], 0.0);
        let reversed = silhouette(&[b, a], 0.0);
        assert_eq!(forward.len(), reversed.len());
        for p in &forward {
            assert!(contains_point(&reversed, *p));
        }
    }
}
