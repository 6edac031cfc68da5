use super::{cross_2d, Point2, Vector2};

/// Bounded segment-segment intersection in 2D, collinear overlaps included.
///
/// Uses the parametric cross-product method: with `r = a2 - a1` and
/// `s = b2 - b1`, the segments cross where `a1 + t*r == b1 + u*s` for
/// `t, u` in `[0, 1]` (widened by `epsilon` at both ends).
///
/// For collinear overlapping segments the overlap is reduced to a single
/// representative point: the start of the overlap interval on segment A's
/// parameterization, or the touch midpoint when the overlap degenerates to
/// a point. Parallel non-collinear segments return `None`.
#[must_use]
pub fn try_intersect(
    a1: &Point2,
    a2: &Point2,
    b1: &Point2,
    b2: &Point2,
    epsilon: f64,
) -> Option<Point2> {
    let r = a2 - a1;
    let s = b2 - b1;
    let rxs = cross_2d(&r, &s);
    let qp = b1 - a1;
    let qpxr = cross_2d(&qp, &r);

    if rxs.abs() <= epsilon && qpxr.abs() <= epsilon {
        return collinear_overlap(a1, &r, b1, b2, &qp, &s, epsilon);
    }

    if rxs.abs() <= epsilon {
        // Parallel, non-intersecting.
        return None;
    }

    let t = cross_2d(&qp, &s) / rxs;
    let u = qpxr / rxs;

    if t >= -epsilon && t <= 1.0 + epsilon && u >= -epsilon && u <= 1.0 + epsilon {
        // Clamp t to [0, 1] to absorb the epsilon spill.
        let tc = t.clamp(0.0, 1.0);
        return Some(a1 + r * tc);
    }

    None
}

/// Collinear case: project `b1`, `b2` onto `r` and intersect the parameter
/// intervals on segment A.
fn collinear_overlap(
    a1: &Point2,
    r: &Vector2,
    b1: &Point2,
    b2: &Point2,
    qp: &Vector2,
    s: &Vector2,
    epsilon: f64,
) -> Option<Point2> {
    let rr = r.dot(r);

    if rr.abs() <= epsilon {
        // Segment A is a point. It intersects iff it lies on [b1, b2].
        if point_on_segment(a1, b1, b2, epsilon) {
            return Some(*a1);
        }
        return None;
    }

    let t0 = qp.dot(r) / rr;
    let t1 = t0 + s.dot(r) / rr;

    let (t_min, t_max) = if t0 < t1 { (t0, t1) } else { (t1, t0) };

    let start = t_min.max(0.0);
    let end = t_max.min(1.0);

    if start > end + epsilon {
        return None;
    }

    // Overlap reduced to a single point: segments touch at an endpoint.
    if (end - start).abs() <= epsilon {
        return Some(a1 + r * ((start + end) * 0.5));
    }

    // Representative point for a proper overlap: the start of the interval.
    Some(a1 + r * start)
}

/// Checks whether `p` lies on the segment `[a, b]` within `epsilon`.
///
/// Collinearity via cross product, bounds via dot products.
#[must_use]
pub fn point_on_segment(p: &Point2, a: &Point2, b: &Point2, epsilon: f64) -> bool {
    let ap = p - a;
    let ab = b - a;

    if cross_2d(&ap, &ab).abs() > epsilon {
        return false;
    }

    let dot = ap.dot(&ab);
    if dot < -epsilon {
        return false;
    }

    dot <= ab.dot(&ab) + epsilon
}
