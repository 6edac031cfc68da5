use thiserror::Error;

/// Top-level error type for the Polygraph kernel.
#[derive(Debug, Error)]
pub enum PolygraphError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("zero-length segment")]
    ZeroLengthSegment,
}

/// Errors related to the geometry store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),
}

/// Convenience type alias for results using [`PolygraphError`].
pub type Result<T> = std::result::Result<T, PolygraphError>;
