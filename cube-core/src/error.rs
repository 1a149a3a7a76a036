//! Error types for cube operations.

use thiserror::Error;

/// Result type for cube operations.
pub type CubeResult<T> = Result<T, CubeError>;

/// Errors that can occur in cube operations.
#[derive(Debug, Error)]
pub enum CubeError {
    /// Move text that is not `<Face><Modifier>`.
    #[error("Invalid move token: {0:?}")]
    InvalidMoveToken(String),

    /// Facelet string could not be decoded.
    #[error("Facelet format error: {0}")]
    Format(#[from] FormatError),

    /// No solver is attached or the solver could not start.
    #[error("Solver unavailable: {0}")]
    SolverUnavailable(String),

    /// A solve is already in flight.
    #[error("Solver is already running")]
    SolverBusy,

    /// The solver reported a failure of its own.
    #[error("Solver failed: {0}")]
    SolverFailed(String),

    /// Snapshot serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Reasons a facelet string is rejected by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Input is not exactly 54 characters long.
    #[error("expected 54 facelets, got {len}")]
    WrongLength {
        /// Number of characters actually supplied.
        len: usize,
    },

    /// A character outside the `URFDLB` alphabet.
    #[error("invalid facelet {ch:?} at index {index}")]
    InvalidCharacter {
        /// The offending character.
        ch: char,
        /// Its character position in the input.
        index: usize,
    },
}
