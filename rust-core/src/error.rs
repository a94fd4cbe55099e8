//! Error types shared by the grid, symmetry and interaction modules

use thiserror::Error;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal failures of grid construction, symmetry handling and interaction runs.
///
/// All variants are deterministic numeric failures; none of them is retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Smith normal form failed for generating matrix {matrix:?}: {reason}")]
    GridDecompositionFailed { matrix: [[i64; 3]; 3], reason: String },

    #[error("grid symmetry is broken for mesh {mesh:?}: {reason} (use another mesh or a mesh length)")]
    SymmetryBroken { mesh: [i64; 3], reason: String },

    #[error("irreducible grid point search did not converge for mesh {mesh:?}: {reason}")]
    IrreducibleSearchFailed { mesh: [i64; 3], reason: String },

    #[error("phonon data mismatch: {0}")]
    PhononDataMismatch(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    pub(crate) fn phonon_mismatch(msg: impl Into<String>) -> Self {
        Error::PhononDataMismatch(msg.into())
    }
}
