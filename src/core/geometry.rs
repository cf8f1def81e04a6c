// src/core/geometry.rs
//! Arc-length resampling and bounding-box normalization of point sequences.

use crate::core::types::Point;

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Linear blend from `a` towards `b` at `t` in [0, 1].
pub fn interpolate(a: Point, b: Point, t: f64) -> Point {
    Point {
        x: a.x + (b.x - a.x) * t,
        y: a.y + (b.y - a.y) * t,
    }
}

/// Total length of the polyline through `points`.
pub fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// Axis-aligned bounding box as `(min, max)` corners. `None` for an empty slice.
pub fn bounding_box(points: &[Point]) -> Option<(Point, Point)> {
    let first = *points.first()?;
    let bounds = points.iter().skip(1).fold((first, first), |(lo, hi), p| {
        (
            Point::new(lo.x.min(p.x), lo.y.min(p.y)),
            Point::new(hi.x.max(p.x), hi.y.max(p.y)),
        )
    });
    Some(bounds)
}

/// Mean of all points. `None` for an empty slice.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Resamples `trace` to `n` points spaced at equal arc length.
///
/// Total: empty input or `n == 0` gives an empty result, and a trace whose
/// points all coincide gives its first point repeated `n` times. The final
/// sample is always the source's last point.
pub fn resample(trace: &[Point], n: usize) -> Vec<Point> {
    if n < 1 || trace.is_empty() {
        return Vec::new();
    }

    let total = path_length(trace);
    if total == 0.0 || trace.len() < 2 {
        return vec![trace[0]; n];
    }

    if n == 1 {
        return vec![trace[0]];
    }

    let last = trace[trace.len() - 1];
    let interval = total / (n - 1) as f64;
    let mut result = Vec::with_capacity(n);
    result.push(trace[0]);

    let mut index = 1;
    let mut current = trace[0];
    let mut accumulated = 0.0;

    while result.len() < n - 1 && index < trace.len() {
        let next = trace[index];
        let segment = distance(current, next);

        if segment == 0.0 {
            index += 1;
            continue;
        }

        if accumulated + segment >= interval {
            let t = (interval - accumulated) / segment;
            let crossing = interpolate(current, next, t);
            result.push(crossing);
            current = crossing;
            accumulated = 0.0;
        } else {
            accumulated += segment;
            current = next;
            index += 1;
        }
    }

    result.push(last);
    while result.len() < n {
        result.push(last);
    }
    result
}

/// Resamples `trace` to `n` points, scales the result so the larger side of
/// its bounding box equals `bounding_box_side`, and moves its centroid to the
/// origin.
pub fn normalize_and_resample(trace: &[Point], n: usize, bounding_box_side: f64) -> Vec<Point> {
    let points = resample(trace, n);
    let Some((lo, hi)) = bounding_box(&points) else {
        return points;
    };

    let width = hi.x - lo.x;
    let height = hi.y - lo.y;
    let scale = if width > 0.0 || height > 0.0 {
        bounding_box_side / width.max(height)
    } else {
        1.0
    };

    let scaled: Vec<Point> = points
        .iter()
        .map(|p| Point::new(p.x * scale, p.y * scale))
        .collect();
    let center = centroid(&scaled).unwrap_or_default();

    scaled
        .into_iter()
        .map(|p| Point::new(p.x - center.x, p.y - center.y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EPS: f64 = 1e-9;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().copied().map(Point::from).collect()
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn interpolate_midpoint() {
        let mid = interpolate(Point::new(0.0, 0.0), Point::new(10.0, 20.0), 0.5);
        assert_eq!(mid, Point::new(5.0, 10.0));
    }

    #[test]
    fn resample_straight_segment_to_three() {
        let out = resample(&pts(&[(0.0, 0.0), (10.0, 0.0)]), 3);
        assert_eq!(out, pts(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]));
    }

    #[test]
    fn resample_empty_input() {
        assert!(resample(&[], 5).is_empty());
        assert!(resample(&[], 0).is_empty());
    }

    #[test]
    fn resample_zero_count() {
        assert!(resample(&pts(&[(0.0, 0.0), (1.0, 1.0)]), 0).is_empty());
    }

    #[test]
    fn resample_single_point_repeats() {
        let out = resample(&pts(&[(1.0, 1.0)]), 3);
        assert_eq!(out, pts(&[(1.0, 1.0); 3]));
    }

    #[test]
    fn resample_coincident_points_repeat() {
        let out = resample(&pts(&[(1.0, 1.0), (1.0, 1.0)]), 3);
        assert_eq!(out, pts(&[(1.0, 1.0); 3]));
    }

    #[test]
    fn resample_keeps_count_and_endpoints() {
        let trace = pts(&[
            (0.0, 0.0),
            (3.0, 0.0),
            (3.0, 0.0),
            (3.0, 7.0),
            (-2.0, 9.5),
            (-2.0, 1.0),
        ]);
        for n in 2..40 {
            let out = resample(&trace, n);
            assert_eq!(out.len(), n, "n = {n}");
            assert_eq!(out[0], trace[0]);
            assert_eq!(out[n - 1], *trace.last().unwrap());
        }
        assert_eq!(resample(&trace, 1).len(), 1);
    }

    #[test]
    fn resample_is_evenly_spaced_on_a_polyline() {
        let trace = pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]);
        let out = resample(&trace, 5);
        for w in out.windows(2) {
            assert!((distance(w[0], w[1]) - 2.0).abs() < EPS);
        }
    }

    #[test]
    fn normalize_square_to_side_ten() {
        let square = pts(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        let out = normalize_and_resample(&square, 4, 10.0);
        assert!(out
            .iter()
            .any(|p| (p.x - 5.0).abs() < 1e-3 && (p.y + 5.0).abs() < 1e-3));
        assert!(out
            .iter()
            .any(|p| (p.x + 5.0).abs() < 1e-3 && (p.y - 5.0).abs() < 1e-3));

        let (lo, hi) = bounding_box(&out).unwrap();
        assert!(((hi.x - lo.x).max(hi.y - lo.y) - 10.0).abs() < 1e-6);
        let c = centroid(&out).unwrap();
        assert!(c.x.abs() < 1e-9 && c.y.abs() < 1e-9);
    }

    #[test]
    fn normalize_line_to_five_points() {
        let out = normalize_and_resample(&pts(&[(0.0, 0.0), (1.0, 0.0)]), 5, 4.0);
        let expected = [-2.0, -1.0, 0.0, 1.0, 2.0];
        assert_eq!(out.len(), 5);
        for (p, x) in out.iter().zip(expected) {
            assert!((p.x - x).abs() < 1e-4, "{} != {}", p.x, x);
            assert!(p.y.abs() < 1e-4);
        }
    }

    #[test]
    fn normalize_degenerate_trace_centers_on_origin() {
        let out = normalize_and_resample(&pts(&[(7.0, 7.0)]), 4, 1.0);
        assert_eq!(out, pts(&[(0.0, 0.0); 4]));
    }
}
