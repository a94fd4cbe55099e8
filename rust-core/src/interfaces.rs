// Definitions that are used throughout all modules

use serde::{Deserialize, Serialize};

// Enumeration to track the space type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Space {
    Real,
    Reciprocal,
}

/// Storage order of the Brillouin-zone addresses and their mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GridLayout {
    /// Canonical block first, BZ-surface duplicates appended after it.
    #[default]
    Sparse,
    /// Translationally equivalent addresses stored contiguously per canonical point.
    Dense,
}

/// How the mesh of a grid is specified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MeshSpec {
    /// Explicit mesh numbers along the reciprocal basis vectors.
    Numbers([i64; 3]),
    /// Target real-space length; combined with a symmetry dataset this
    /// yields a generalized regular grid.
    Length(f64),
}

impl From<[i64; 3]> for MeshSpec {
    fn from(mesh: [i64; 3]) -> Self {
        MeshSpec::Numbers(mesh)
    }
}

impl From<f64> for MeshSpec {
    fn from(length: f64) -> Self {
        MeshSpec::Length(length)
    }
}

/// Rotation set used for triplet search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripletSearch {
    /// Full point group of the grid, plus time reversal when allowed.
    Symmetric,
    /// Identity only.
    Unsymmetric,
}
