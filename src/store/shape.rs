use crate::error::GeometryError;
use crate::math::polygon_2d::signed_area_2d;
use crate::math::{cross_2d, Point2, Vector2};

use super::point::PointId;
use super::GeometryStore;

slotmap::new_key_type! {
    /// Unique identifier for a shape in the geometry store.
    pub struct ShapeId;
}

/// An edge of a shape: an ordered pair of point handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Start point handle.
    pub from: PointId,
    /// End point handle.
    pub to: PointId,
}

impl Segment {
    /// Creates a new segment between two stored points.
    #[must_use]
    pub fn new(from: PointId, to: PointId) -> Self {
        Self { from, to }
    }

    /// Length of the segment.
    #[must_use]
    pub fn magnitude(&self, store: &GeometryStore) -> f64 {
        let (a, b) = store.segment_positions(self);
        (b - a).norm()
    }

    /// Midpoint of the segment.
    #[must_use]
    pub fn midpoint(&self, store: &GeometryStore) -> Point2 {
        let (a, b) = store.segment_positions(self);
        nalgebra::center(&a, &b)
    }

    /// Normalized direction from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroLengthSegment` if the endpoints
    /// coincide within [`crate::math::EPSILON`].
    pub fn direction(&self, store: &GeometryStore) -> Result<Vector2, GeometryError> {
        let (a, b) = store.segment_positions(self);
        let d = b - a;
        let len = d.norm();
        if len < crate::math::EPSILON {
            return Err(GeometryError::ZeroLengthSegment);
        }
        Ok(d / len)
    }

    /// Collinearity test: whether `p` lies on the carrier line of this
    /// segment within `epsilon` (cross product against the segment
    /// direction, no bounds check).
    #[must_use]
    pub fn is_on_seg(&self, store: &GeometryStore, p: &Point2, epsilon: f64) -> bool {
        let (a, b) = store.segment_positions(self);
        cross_2d(&(p - a), &(b - a)).abs() <= epsilon
    }
}

/// A closed polygon: an ordered ring of point handles plus the derived
/// edge list.
///
/// Invariant: `segments.len() == points.len()`, except when
/// `points.len() <= 1` where the segment list is empty. Consecutive points
/// are connected and the last point wraps back to the first. A two-point
/// shape is degenerate (both edges cover the same span) but valid.
#[derive(Debug, Clone, Default)]
pub struct ShapeData {
    points: Vec<PointId>,
    segments: Vec<Segment>,
}

impl ShapeData {
    /// Creates a shape from an ordered ring of point handles.
    #[must_use]
    pub fn new(points: Vec<PointId>) -> Self {
        let mut shape = Self {
            points,
            segments: Vec::new(),
        };
        shape.rebuild_segments();
        shape
    }

    /// Number of vertices.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Read-only view of the vertex ring.
    #[must_use]
    pub fn points(&self) -> &[PointId] {
        &self.points
    }

    /// Read-only view of the derived edges.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Vertex positions in ring order.
    #[must_use]
    pub fn positions(&self, store: &GeometryStore) -> Vec<Point2> {
        self.points.iter().map(|&id| store.position(id)).collect()
    }

    /// Rebuilds the edge list from the current vertex ring.
    pub fn rebuild_segments(&mut self) {
        self.segments.clear();
        let n = self.points.len();
        if n <= 1 {
            return;
        }
        for i in 0..n {
            let j = (i + 1) % n;
            self.segments.push(Segment::new(self.points[i], self.points[j]));
        }
    }

    /// Replaces every vertex handle through `map` and rebuilds the edges.
    ///
    /// Handles absent from the map are left alone. Consecutive duplicates
    /// produced by the remap are kept; collapsing them is the caller's
    /// decision.
    pub fn remap_points(&mut self, map: &std::collections::HashMap<PointId, PointId>) {
        for id in &mut self.points {
            if let Some(rep) = map.get(id) {
                *id = *rep;
            }
        }
        self.rebuild_segments();
    }

    /// Returns the first edge (in ring order) whose carrier line passes
    /// through `p` within `epsilon`, or `None`.
    #[must_use]
    pub fn is_on_shape(
        &self,
        store: &GeometryStore,
        p: &Point2,
        epsilon: f64,
    ) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|seg| seg.is_on_seg(store, p, epsilon))
    }

    /// Total perimeter of the ring.
    #[must_use]
    pub fn perimeter(&self, store: &GeometryStore) -> f64 {
        self.segments.iter().map(|s| s.magnitude(store)).sum()
    }

    /// Samples the ring by normalized arc length.
    ///
    /// `t` wraps modulo 1, so negative values and values above 1 are
    /// allowed; `t` within `epsilon` of an integer returns the first
    /// vertex. Arc-length targets falling on a vertex (within `epsilon`)
    /// return that vertex exactly instead of an interpolated point, so
    /// joints do not drift. Degenerate shapes (one point or zero
    /// perimeter) return the first vertex; an empty shape returns `None`.
    #[must_use]
    pub fn by_t(&self, store: &GeometryStore, t: f64, epsilon: f64) -> Option<Point2> {
        let first = self.points.first().map(|&id| store.position(id))?;
        if self.points.len() == 1 || self.segments.is_empty() {
            return Some(first);
        }

        let total = self.perimeter(store);
        if total <= epsilon {
            return Some(first);
        }

        // Normalize to [0, 1); snap near-integer parameters to the start.
        let tn = t.rem_euclid(1.0);
        if (tn - 1.0).abs() <= epsilon || (t - 1.0).abs() <= epsilon {
            return Some(first);
        }

        let target = tn * total;
        let mut accum = 0.0;

        for seg in &self.segments {
            let len = seg.magnitude(store);
            if len <= epsilon {
                continue;
            }

            let next_accum = accum + len;

            // At a joint within epsilon, return the exact vertex.
            if (target - accum).abs() <= epsilon {
                return Some(store.position(seg.from));
            }
            if (target - next_accum).abs() <= epsilon {
                return Some(store.position(seg.to));
            }

            if target < next_accum {
                let local = (target - accum) / len;
                let (a, b) = store.segment_positions(seg);
                return Some(a + (b - a) * local);
            }

            accum = next_accum;
        }

        // Unreachable for tn in [0, 1), kept as a safe default.
        Some(first)
    }

    /// Signed area via the shoelace formula. Positive for counter-clockwise
    /// rings, negative for clockwise; fewer than 3 vertices yields 0.
    #[must_use]
    pub fn signed_area(&self, store: &GeometryStore) -> f64 {
        signed_area_2d(&self.positions(store))
    }

    /// Absolute area of the ring. Always non-negative.
    #[must_use]
    pub fn area(&self, store: &GeometryStore) -> f64 {
        self.signed_area(store).abs()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::EPSILON;
    use approx::assert_relative_eq;

    fn square(store: &mut GeometryStore) -> ShapeId {
        store.add_shape_from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ])
    }

    #[test]
    fn segment_count_matches_points() {
        let mut store = GeometryStore::new();
        let id = square(&mut store);
        let shape = store.shape(id).unwrap();
        assert_eq!(shape.point_count(), 4);
        assert_eq!(shape.segments().len(), 4);
    }

    #[test]
    fn single_point_has_no_segments() {
        let mut store = GeometryStore::new();
        let id = store.add_shape_from_points(&[Point2::new(1.0, 1.0)]);
        let shape = store.shape(id).unwrap();
        assert_eq!(shape.point_count(), 1);
        assert!(shape.segments().is_empty());
    }

    #[test]
    fn two_point_shape_is_degenerate_but_valid() {
        let mut store = GeometryStore::new();
        let id = store.add_shape_from_points(&[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
        let shape = store.shape(id).unwrap();
        assert_eq!(shape.segments().len(), 2);
        assert!(shape.area(&store).abs() < EPSILON);
        // Sampling still works: half the perimeter lands on the far vertex.
        let p = shape.by_t(&store, 0.5, EPSILON).unwrap();
        assert!((p.x - 1.0).abs() < EPSILON, "x={}", p.x);
    }

    #[test]
    fn by_t_integer_boundaries_return_first_vertex() {
        let mut store = GeometryStore::new();
        let id = square(&mut store);
        let shape = store.shape(id).unwrap();
        for t in [0.0, 1.0, 2.0, -1.0] {
            let p = shape.by_t(&store, t, EPSILON).unwrap();
            assert!(p.x.abs() < EPSILON && p.y.abs() < EPSILON, "t={t} p={p}");
        }
    }

    #[test]
    fn by_t_wraps_and_interpolates() {
        let mut store = GeometryStore::new();
        let id = square(&mut store);
        let shape = store.shape(id).unwrap();

        // Perimeter 4: t=0.125 is the middle of the bottom edge.
        let p = shape.by_t(&store, 0.125, EPSILON).unwrap();
        assert!((p.x - 0.5).abs() < EPSILON && p.y.abs() < EPSILON, "p={p}");

        // t=1.125 wraps to the same point.
        let q = shape.by_t(&store, 1.125, EPSILON).unwrap();
        assert!((q.x - 0.5).abs() < EPSILON, "q={q}");

        // Negative t wraps backwards: -0.25 == 0.75, the top-left corner.
        let r = shape.by_t(&store, -0.25, EPSILON).unwrap();
        assert!(r.x.abs() < EPSILON && (r.y - 1.0).abs() < EPSILON, "r={r}");
    }

    #[test]
    fn by_t_snaps_to_vertices() {
        let mut store = GeometryStore::new();
        let id = square(&mut store);
        let shape = store.shape(id).unwrap();

        // t=0.25 falls exactly on the second vertex.
        let p = shape.by_t(&store, 0.25, EPSILON).unwrap();
        assert!((p.x - 1.0).abs() < EPSILON && p.y.abs() < EPSILON, "p={p}");
    }

    #[test]
    fn by_t_empty_and_degenerate() {
        let mut store = GeometryStore::new();
        let empty = store.add_shape_from_points(&[]);
        assert!(store.shape(empty).unwrap().by_t(&store, 0.3, EPSILON).is_none());

        let single = store.add_shape_from_points(&[Point2::new(2.0, 3.0)]);
        let p = store.shape(single).unwrap().by_t(&store, 0.7, EPSILON).unwrap();
        assert!((p.x - 2.0).abs() < EPSILON && (p.y - 3.0).abs() < EPSILON);
    }

    #[test]
    fn signed_area_orientation() {
        let mut store = GeometryStore::new();
        let ccw = square(&mut store);
        assert_relative_eq!(store.shape(ccw).unwrap().signed_area(&store), 1.0, epsilon = EPSILON);

        let cw = store.add_shape_from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ]);
        let shape = store.shape(cw).unwrap();
        assert_relative_eq!(shape.signed_area(&store), -1.0, epsilon = EPSILON);
        assert_relative_eq!(shape.area(&store), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn is_on_shape_finds_first_collinear_edge() {
        let mut store = GeometryStore::new();
        let id = square(&mut store);
        let shape = store.shape(id).unwrap();

        let seg = shape
            .is_on_shape(&store, &Point2::new(0.5, 0.0), EPSILON)
            .unwrap();
        assert_eq!(*seg, shape.segments()[0]);

        assert!(shape
            .is_on_shape(&store, &Point2::new(0.5, 0.5), EPSILON)
            .is_none());
    }

    #[test]
    fn segment_magnitude_and_midpoint() {
        let mut store = GeometryStore::new();
        let a = store.add_point(Point2::new(0.0, 0.0));
        let b = store.add_point(Point2::new(3.0, 4.0));
        let seg = Segment::new(a, b);
        assert!((seg.magnitude(&store) - 5.0).abs() < EPSILON);
        let mid = seg.midpoint(&store);
        assert!((mid.x - 1.5).abs() < EPSILON && (mid.y - 2.0).abs() < EPSILON);
    }

    #[test]
    fn segment_direction_normalizes() {
        let mut store = GeometryStore::new();
        let a = store.add_point(Point2::new(0.0, 0.0));
        let b = store.add_point(Point2::new(3.0, 4.0));
        let dir = Segment::new(a, b).direction(&store).unwrap();
        assert!((dir.x - 0.6).abs() < EPSILON);
        assert!((dir.y - 0.8).abs() < EPSILON);
    }

    #[test]
    fn zero_length_segment_has_no_direction() {
        let mut store = GeometryStore::new();
        let a = store.add_point(Point2::new(1.0, 1.0));
        assert!(Segment::new(a, a).direction(&store).is_err());
    }
}
