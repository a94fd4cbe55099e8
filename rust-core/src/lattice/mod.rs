// Lattice module: direct/reciprocal bases, centrings and mesh numbers from lengths
// This module provides the real-space side needed to set up reciprocal-space grids

// ======================== MODULE DECLARATIONS ========================
pub mod base_matrix;
pub mod lattice_construction;
pub mod lattice_types;

// Test modules
mod _tests_lattice;

// ======================== BASES ========================
pub use base_matrix::{
    BaseMatrix,                     // struct - basis vectors as columns, tagged with their space
    length2mesh,                    // fn(length: f64, direct: &BaseMatrix) -> [i64; 3] - mesh numbers for a real-space length
};
// BaseMatrix impl methods:
//   from_base_vectors(b1, b2, b3, space) -> Result<Self>          - validates linear independence
//   from_matrix(matrix: Matrix3<f64>, space) -> Result<Self>       - same, from columns
//   reciprocal(&self) -> BaseMatrix                                - (A^-1)^T, no factor 2π
//   metric(&self) -> Matrix3<f64>                                  - G = A^T A
//   to_cartesian / to_fractional                                   - coordinate conversions

// ======================== CENTRINGS & LATTICE SYSTEMS ========================
pub use lattice_types::{
    Centering,                      // enum - P, I, F, A, C, R centrings with primitive matrices
    LatticeSystem,                  // enum - seven lattice systems
};

// ======================== LATTICE CONSTRUCTION UTILITIES ========================
pub use lattice_construction::{
    simple_cubic_lattice,           // fn(a: f64) -> Result<BaseMatrix>
    face_centered_cubic_lattice,    // fn(a: f64) -> Result<BaseMatrix> - primitive FCC basis
    body_centered_cubic_lattice,    // fn(a: f64) -> Result<BaseMatrix> - primitive BCC basis
    hexagonal_lattice,              // fn(a: f64, c: f64) -> Result<BaseMatrix>
    tetragonal_lattice,             // fn(a: f64, c: f64) -> Result<BaseMatrix>
    orthorhombic_lattice,           // fn(a: f64, b: f64, c: f64) -> Result<BaseMatrix>
};
