//! Spatial engine error types.

use thiserror::Error;

/// Result type for spatial operations.
pub type SpatialResult<T> = Result<T, SpatialError>;

/// Errors that can occur in the spatial engine.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// Piece poses no longer describe a valid cube.
    #[error("Piece geometry out of sync: {0}")]
    Desync(String),

    /// A logical-model error surfaced through the engine.
    #[error(transparent)]
    Core(#[from] cube_core::CubeError),
}
