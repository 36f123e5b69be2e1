use thiserror::Error;

/// Top-level error type for the `mapmesh` crate.
#[derive(Debug, Error)]
pub enum MapMeshError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Errors related to the input map model.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("no line carries the spawn color")]
    MissingSpawn,

    #[error("invalid map data: {0}")]
    InvalidData(String),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Convenience type alias for results using [`MapMeshError`].
pub type Result<T> = std::result::Result<T, MapMeshError>;
