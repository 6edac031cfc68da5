use super::intersect_2d::try_intersect;
use super::Point2;

/// Returns the minimum distance from `p` to the segment `[a, b]`, along
/// with the closest point on the segment.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> (f64, Point2) {
    let ab = b - a;
    let len_sq = ab.dot(&ab);

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return ((p - a).norm(), *a);
    }

    // Project onto the infinite line, clamp to [0, 1].
    let t = (p - a).dot(&ab) / len_sq;
    let t = t.clamp(0.0, 1.0);

    let closest = a + ab * t;
    ((p - closest).norm(), closest)
}

/// Shortest distance between two 2D segments, with the realizing
/// closest-point pair `(on_a, on_b)`.
///
/// If the segments intersect (collinear overlap included) the distance is
/// zero at the intersection point. Otherwise it is the minimum of the four
/// endpoint-to-segment distances.
#[must_use]
pub fn segment_segment_dist(
    a1: &Point2,
    a2: &Point2,
    b1: &Point2,
    b2: &Point2,
    epsilon: f64,
) -> (f64, Point2, Point2) {
    if let Some(hit) = try_intersect(a1, a2, b1, b2, epsilon) {
        return (0.0, hit, hit);
    }

    let (d1, p1) = point_to_segment_dist(b1, a1, a2);
    let (d2, p2) = point_to_segment_dist(b2, a1, a2);
    let (d3, p3) = point_to_segment_dist(a1, b1, b2);
    let (d4, p4) = point_to_segment_dist(a2, b1, b2);

    let (mut best, mut on_a, mut on_b) = (d1, p1, *b1);

    if d2 < best {
        best = d2;
        on_a = p2;
        on_b = *b2;
    }
    if d3 < best {
        best = d3;
        on_a = *a1;
        on_b = p3;
    }
    if d4 < best {
        best = d4;
        on_a = *a2;
        on_b = p4;
    }

    (best, on_a, on_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::EPSILON;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn point_dist_perpendicular_projection() {
        // Point (1, 1) to segment (0,0)->(2,0). Closest at (1,0), dist = 1.
        let (d, closest) = point_to_segment_dist(&p(1.0, 1.0), &p(0.0, 0.0), &p(2.0, 0.0));
        assert!((d - 1.0).abs() < EPSILON, "d={d}");
        assert!((closest.x - 1.0).abs() < EPSILON);
        assert!(closest.y.abs() < EPSILON);
    }

    #[test]
    fn point_dist_endpoint_closest() {
        let (d, closest) = point_to_segment_dist(&p(-1.0, 0.0), &p(0.0, 0.0), &p(2.0, 0.0));
        assert!((d - 1.0).abs() < EPSILON, "d={d}");
        assert!(closest.x.abs() < EPSILON);
    }

    #[test]
    fn point_dist_degenerate_segment() {
        let (d, _) = point_to_segment_dist(&p(3.0, 4.0), &p(0.0, 0.0), &p(0.0, 0.0));
        assert!((d - 5.0).abs() < EPSILON, "d={d}");
    }

    #[test]
    fn crossing_segments_distance_zero() {
        let (d, on_a, on_b) = segment_segment_dist(
            &p(0.0, 0.0),
            &p(2.0, 2.0),
            &p(0.0, 2.0),
            &p(2.0, 0.0),
            EPSILON,
        );
        assert!(d.abs() < EPSILON, "d={d}");
        assert!((on_a.x - 1.0).abs() < EPSILON);
        assert!((on_a.y - on_b.y).abs() < EPSILON);
    }

    #[test]
    fn collinear_overlap_distance_zero() {
        let (d, _, _) = segment_segment_dist(
            &p(-1.0, 0.0),
            &p(1.0, 0.0),
            &p(-2.0, 0.0),
            &p(2.0, 0.0),
            EPSILON,
        );
        assert!(d.abs() < EPSILON, "d={d}");
    }

    #[test]
    fn parallel_segments_distance() {
        let (d, on_a, on_b) = segment_segment_dist(
            &p(0.0, 0.0),
            &p(2.0, 0.0),
            &p(0.0, 1.0),
            &p(2.0, 1.0),
            EPSILON,
        );
        assert!((d - 1.0).abs() < EPSILON, "d={d}");
        assert!((on_a.x - on_b.x).abs() < EPSILON);
    }

    #[test]
    fn skew_disjoint_endpoint_distance() {
        // Closest pair is endpoint (2,0) of A against endpoint (3,0) of B.
        let (d, on_a, on_b) = segment_segment_dist(
            &p(0.0, 0.0),
            &p(2.0, 0.0),
            &p(3.0, 0.0),
            &p(4.0, 1.0),
            EPSILON,
        );
        assert!((d - 1.0).abs() < EPSILON, "d={d}");
        assert!((on_a.x - 2.0).abs() < EPSILON);
        assert!((on_b.x - 3.0).abs() < EPSILON);
    }
}
