// Symmetries module: point-group operations acting on generalized regular grids
// This module transforms rotations into the grid basis and reduces grid points by symmetry

// ======================== MODULE DECLARATIONS ========================
pub mod irreducible;
pub mod symmetry_dataset;
pub mod symmetry_operations;
pub mod symmetry_point_groups;

// Test modules
mod _tests_symmetries;

// ======================== SYMMETRY DATASET ========================
pub use symmetry_dataset::SymmetryDataset; // struct - reciprocal rotations, time reversal, transformation matrix, centring, lattice system
// SymmetryDataset impl methods:
//   new(rotations, tmat, centering, lattice_system) -> Self        - time reversal enabled
//   from_lattice(direct: &BaseMatrix, centering, lattice_system) -> Self - holohedry of a primitive basis
//   with_time_reversal(self, bool) -> Self                         - toggles time reversal

// ======================== GRID-BASIS ROTATIONS ========================
pub use symmetry_operations::{
    transform_rotations,            // fn(rots, d_diag, q) -> Result<Vec<Matrix3<i64>>> - R' = D Q^-1 R Q D^-1, SymmetryBroken on failure
    maps_grid_onto_itself,          // fn(rot, d_diag) -> bool - bijection test on canonical addresses
    point_group_reciprocal,         // fn(rots, is_time_reversal) -> Vec<Matrix3<i64>> - R ∪ -R without duplicates
    stabilizer,                     // fn(rots, address, d_diag) -> Vec<Matrix3<i64>> - little group of an address
    rotations_keeping_direction,    // fn(rec_rots, grid_rots, dir, tol) -> Vec<Matrix3<i64>> - rotations fixing a q-direction
};

// ======================== IRREDUCIBLE GRID POINTS ========================
pub use irreducible::{
    IrreducibleGridPoints,          // struct - mapping table, representatives, weights
    ir_grid_map,                    // fn(d_diag, rots, ps, is_time_reversal) -> Result<Vec<usize>> - orbit map to minimal index
    irreducible_grid_points,        // fn(d_diag, rots, ps, is_time_reversal) -> Result<IrreducibleGridPoints>
};

// ======================== LATTICE POINT GROUPS ========================
pub use symmetry_point_groups::{
    lattice_point_group,            // fn(basis: &BaseMatrix, tol: f64) -> Vec<Matrix3<i64>> - metric-preserving integer matrices
    reciprocal_lattice_point_group, // fn(direct: &BaseMatrix) -> Vec<Matrix3<i64>> - same, acting on reciprocal coordinates
};
