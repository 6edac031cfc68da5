pub mod point;
pub mod shape;

pub use point::{PointData, PointId};
pub use shape::{Segment, ShapeData, ShapeId};

use crate::error::StoreError;
use crate::math::Point2;
use slotmap::SlotMap;

/// Central arena that owns all points and shapes.
///
/// Entities reference each other via typed IDs (generational indices), so a
/// point can be shared by any number of shapes and rewritten in one place.
#[derive(Debug, Default)]
pub struct GeometryStore {
    points: SlotMap<PointId, PointData>,
    shapes: SlotMap<ShapeId, ShapeData>,
}

impl GeometryStore {
    /// Creates a new, empty geometry store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Point operations ---

    /// Inserts a point and returns its ID.
    pub fn add_point(&mut self, pos: Point2) -> PointId {
        self.points.insert(PointData::new(pos))
    }

    /// Returns a reference to the point data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn point(&self, id: PointId) -> Result<&PointData, StoreError> {
        self.points
            .get(id)
            .ok_or_else(|| StoreError::EntityNotFound("point".into()))
    }

    /// Returns a mutable reference to the point data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn point_mut(&mut self, id: PointId) -> Result<&mut PointData, StoreError> {
        self.points
            .get_mut(id)
            .ok_or_else(|| StoreError::EntityNotFound("point".into()))
    }

    /// Position of a stored point.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale. Shapes only hold handles of live
    /// points, so lookups through a shape never panic.
    #[must_use]
    pub fn position(&self, id: PointId) -> Point2 {
        self.points[id].pos
    }

    /// Endpoint positions of a segment.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    #[must_use]
    pub fn segment_positions(&self, seg: &Segment) -> (Point2, Point2) {
        (self.position(seg.from), self.position(seg.to))
    }

    // --- Shape operations ---

    /// Inserts a shape built from existing point handles and returns its ID.
    pub fn add_shape(&mut self, points: Vec<PointId>) -> ShapeId {
        self.shapes.insert(ShapeData::new(points))
    }

    /// Inserts fresh points for the given positions and builds a shape
    /// over them.
    pub fn add_shape_from_points(&mut self, positions: &[Point2]) -> ShapeId {
        let ids = positions.iter().map(|&p| self.add_point(p)).collect();
        self.add_shape(ids)
    }

    /// Returns a reference to the shape data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn shape(&self, id: ShapeId) -> Result<&ShapeData, StoreError> {
        self.shapes
            .get(id)
            .ok_or_else(|| StoreError::EntityNotFound("shape".into()))
    }

    /// Returns a mutable reference to the shape data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn shape_mut(&mut self, id: ShapeId) -> Result<&mut ShapeData, StoreError> {
        self.shapes
            .get_mut(id)
            .ok_or_else(|| StoreError::EntityNotFound("shape".into()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_entities_are_errors() {
        let mut store = GeometryStore::new();
        let p = store.add_point(Point2::new(1.0, 2.0));
        let s = store.add_shape(vec![p]);

        assert!(store.point(p).is_ok());
        assert!(store.shape(s).is_ok());
        assert!(store.point(PointId::default()).is_err());
        assert!(store.shape(ShapeId::default()).is_err());
    }

    #[test]
    fn shared_point_is_one_entry() {
        let mut store = GeometryStore::new();
        let shared = store.add_point(Point2::new(0.0, 0.0));
        let a = store.add_shape(vec![shared]);
        let b = store.add_shape(vec![shared]);

        store.point_mut(shared).unwrap().pos = Point2::new(5.0, 5.0);
        for id in [a, b] {
            let shape = store.shape(id).unwrap();
            let pos = store.position(shape.points()[0]);
            assert!((pos.x - 5.0).abs() < f64::EPSILON);
        }
    }
}
