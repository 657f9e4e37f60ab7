//! Pure geometry for path evaluation and hit-testing.
//!
//! Everything here is stateless: quadratic Bezier evaluation,
//! arc-length-parameterized polyline sampling, and the distance helpers the
//! canvas uses to decide what the pointer is over.

use crate::types::{Path, PathPoint, PathType};

/// Evaluates a quadratic Bezier at interpolation parameter `t ∈ [0, 1]`.
///
/// `t` is the standard curve parameter, not arc length: points are denser
/// where the curve bends. `bezier_point(0, ..) == p0` and
/// `bezier_point(1, ..) == p2`.
pub fn bezier_point(t: f32, p0: PathPoint, p1: PathPoint, p2: PathPoint) -> PathPoint {
    let t = t.clamp(0.0, 1.0);
    let u = 1.0 - t;
    PathPoint::new(
        u * u * p0.x + 2.0 * u * t * p1.x + t * t * p2.x,
        u * u * p0.y + 2.0 * u * t * p1.y + t * t * p2.y,
    )
}

/// Samples a polyline at `t ∈ [0, 1]` of its total arc length.
///
/// Walks the segments accumulating length and interpolates inside the
/// segment containing `t * total_length`, which gives constant-speed
/// traversal across segments of different lengths. Degenerate inputs fall
/// back gracefully: no points yields the origin, a single point (or zero
/// total length) yields that point.
pub fn polyline_point(t: f32, points: &[PathPoint]) -> PathPoint {
    match points {
        [] => return PathPoint::new(0.0, 0.0),
        [only] => return *only,
        _ => {}
    }

    let total: f32 = points
        .windows(2)
        .map(|w| segment_length(w[0], w[1]))
        .sum();
    if total <= f32::EPSILON {
        return points[0];
    }

    let t = t.clamp(0.0, 1.0);
    let target = t * total;
    let mut walked = 0.0;
    for w in points.windows(2) {
        let len = segment_length(w[0], w[1]);
        if walked + len >= target && len > 0.0 {
            let local = (target - walked) / len;
            return PathPoint::new(
                w[0].x + (w[1].x - w[0].x) * local,
                w[0].y + (w[1].y - w[0].y) * local,
            );
        }
        walked += len;
    }
    // Floating error can leave us just short of the end; land on it.
    points[points.len() - 1]
}

/// Evaluates a path at parameter `t`, dispatching on its type.
///
/// Curves with the wrong point count fall back to polyline sampling rather
/// than failing, keeping playback defensive against malformed data.
pub fn path_position(path: &Path, t: f32) -> PathPoint {
    match path.path_type {
        PathType::Curve if path.points.len() == 3 => {
            bezier_point(t, path.points[0], path.points[1], path.points[2])
        }
        _ => polyline_point(t, &path.points),
    }
}

/// Distance from a point to the nearest part of a path's stroke.
///
/// Linear paths measure against their segments directly; curves are measured
/// against a fixed-resolution sampling of the curve.
pub fn distance_to_path(path: &Path, x: f32, y: f32) -> f32 {
    let target = PathPoint::new(x, y);
    match path.path_type {
        PathType::Curve if path.points.len() == 3 => {
            const SAMPLES: usize = 24;
            let mut best = f32::INFINITY;
            let mut prev = path.points[0];
            for i in 1..=SAMPLES {
                let t = i as f32 / SAMPLES as f32;
                let next = bezier_point(t, path.points[0], path.points[1], path.points[2]);
                best = best.min(distance_to_segment(target, prev, next));
                prev = next;
            }
            best
        }
        _ => path
            .points
            .windows(2)
            .map(|w| distance_to_segment(target, w[0], w[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

/// Distance between two points.
pub fn segment_length(a: PathPoint, b: PathPoint) -> f32 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Distance from `p` to the closed segment `a..b`.
pub fn distance_to_segment(p: PathPoint, a: PathPoint, b: PathPoint) -> f32 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let len_sq = abx * abx + aby * aby;
    if len_sq <= f32::EPSILON {
        return segment_length(p, a);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
    segment_length(p, PathPoint::new(a.x + abx * t, a.y + aby * t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PathStyle;
    use approx::assert_relative_eq;

    fn pt(x: f32, y: f32) -> PathPoint {
        PathPoint::new(x, y)
    }

    #[test]
    fn bezier_hits_its_endpoints() {
        let (p0, p1, p2) = (pt(10.0, 20.0), pt(50.0, 90.0), pt(120.0, 30.0));
        assert_eq!(bezier_point(0.0, p0, p1, p2), p0);
        assert_eq!(bezier_point(1.0, p0, p1, p2), p2);
    }

    #[test]
    fn bezier_midpoint_bends_toward_control() {
        let mid = bezier_point(0.5, pt(0.0, 0.0), pt(50.0, 100.0), pt(100.0, 0.0));
        assert_relative_eq!(mid.x, 50.0);
        assert_relative_eq!(mid.y, 50.0);
    }

    #[test]
    fn polyline_hits_its_endpoints() {
        let pts = [pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 30.0)];
        assert_eq!(polyline_point(0.0, &pts), pts[0]);
        assert_eq!(polyline_point(1.0, &pts), pts[2]);
    }

    #[test]
    fn polyline_parameter_is_arc_length_not_per_segment() {
        // Segments of length 10 and 30: half the distance lands ten units
        // into the second segment, not at the corner.
        let pts = [pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 30.0)];
        let half = polyline_point(0.5, &pts);
        assert_relative_eq!(half.x, 10.0);
        assert_relative_eq!(half.y, 10.0);

        let quarter = polyline_point(0.25, &pts);
        assert_relative_eq!(quarter.x, 10.0);
        assert_relative_eq!(quarter.y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn polyline_degenerate_cases() {
        assert_eq!(polyline_point(0.5, &[]), pt(0.0, 0.0));
        assert_eq!(polyline_point(0.5, &[pt(7.0, 8.0)]), pt(7.0, 8.0));
        // Zero total length
        assert_eq!(polyline_point(0.7, &[pt(3.0, 3.0), pt(3.0, 3.0)]), pt(3.0, 3.0));
    }

    #[test]
    fn out_of_range_parameters_clamp() {
        let pts = [pt(0.0, 0.0), pt(100.0, 0.0)];
        assert_eq!(polyline_point(-1.0, &pts), pts[0]);
        assert_eq!(polyline_point(2.0, &pts), pts[1]);
        let (p0, p1, p2) = (pt(0.0, 0.0), pt(5.0, 5.0), pt(10.0, 0.0));
        assert_eq!(bezier_point(-0.5, p0, p1, p2), p0);
        assert_eq!(bezier_point(1.5, p0, p1, p2), p2);
    }

    #[test]
    fn distance_to_segment_handles_projection_and_endpoints() {
        let (a, b) = (pt(0.0, 0.0), pt(10.0, 0.0));
        assert_relative_eq!(distance_to_segment(pt(5.0, 4.0), a, b), 4.0);
        assert_relative_eq!(distance_to_segment(pt(-3.0, 4.0), a, b), 5.0);
        // Degenerate segment
        assert_relative_eq!(distance_to_segment(pt(3.0, 4.0), a, a), 5.0);
    }

    #[test]
    fn distance_to_path_tracks_the_curve_not_the_chord() {
        let (scene, id) = crate::types::Scene::new().add_path(
            PathType::Curve,
            vec![pt(0.0, 0.0), pt(50.0, 100.0), pt(100.0, 0.0)],
            PathStyle::default(),
        );
        let path = scene.path(id.unwrap()).unwrap().clone();
        // The curve apex is at (50, 50); the chord passes through (50, 0).
        assert!(distance_to_path(&path, 50.0, 50.0) < 3.0);
        assert!(distance_to_path(&path, 50.0, 0.0) > 30.0);
    }
}
