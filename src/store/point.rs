use crate::math::Point2;

slotmap::new_key_type! {
    /// Unique identifier for a point in the geometry store.
    pub struct PointId;
}

/// Data associated with a stored point.
///
/// Points are shared: several shapes (and all of their segments) may hold
/// the same `PointId`. Identity is the handle, never the coordinates —
/// two entries at identical coordinates are distinct points until a
/// closeness merge unifies them.
#[derive(Debug, Clone, Copy)]
pub struct PointData {
    /// The 2D position of the point.
    pub pos: Point2,
}

impl PointData {
    /// Creates a new point at the given position.
    #[must_use]
    pub fn new(pos: Point2) -> Self {
        Self { pos }
    }
}
