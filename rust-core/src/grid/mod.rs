// Grid module: generalized regular grids and their Brillouin-zone folding
// This module decomposes generating matrices and builds the shared grid value

// ======================== MODULE DECLARATIONS ========================
pub mod bz_folding;
pub mod bz_grid;
pub mod generating_matrix;
pub mod grid_address;
pub mod snf;

// Test modules
mod _tests_bz_grid;

// ======================== SMITH NORMAL FORM ========================
pub use snf::{
    SnfDecomposition,               // struct - D = P A Q with unimodular P, Q
    snf3x3,                         // fn(a: &Matrix3<i64>) -> Result<SnfDecomposition> - full reduction
    determinant_i3,                 // fn(m: &Matrix3<i64>) -> i64 - exact integer determinant
    inverse_unimodular,             // fn(m: &Matrix3<i64>) -> Option<Matrix3<i64>> - inverse of det ±1 matrices
};
// SnfDecomposition impl methods:
//   from_mesh(mesh: [i64; 3]) -> Result<Self>                      - D = mesh, P = Q = I
//   from_generating_matrix(a, force_snf: bool) -> Result<Self>     - diagonal shortcut unless forced
//   d_diag / p / q / num_grid_points                               - accessors

// ======================== ADDRESSES ========================
pub use grid_address::{
    gr_grid_addresses,              // fn(d_diag) -> Vec<Vector3<i64>> - all canonical addresses, first index fastest
    grid_index_from_address,        // fn(address, d_diag) -> usize - canonical index, any integer address
    grid_address_from_index,        // fn(index, d_diag) -> Vector3<i64> - inverse of the above
    double_grid_address,            // fn(address, ps) -> Vector3<i64> - 2 a + PS
    double_grid_index,              // fn(address_double, d_diag, ps) -> Option<usize> - None on parity mismatch
    is_momentum_conserved,          // fn(&[Vector3<i64>; 3], d_diag) -> bool - sum ≡ 0 mod D
};

// ======================== BRILLOUIN-ZONE FOLDING ========================
pub use bz_folding::{
    BzFolding,                      // struct - BZ addresses, gp_map, bzg2grg
    relocate_bz_grid_addresses,     // fn(addresses, d_diag, q, ps, rec_lattice, layout) -> BzFolding
};

// ======================== GRID VALUE ========================
pub use bz_grid::{
    BzGrid,                         // struct - immutable grid shared by symmetry and interaction code
    GridOptions,                    // struct - shift, layout, force_snf
};
// BzGrid impl methods:
//   new(mesh: MeshSpec, direct: &BaseMatrix, dataset: Option<&SymmetryDataset>, options) -> Result<Self>
//   from_generating_matrix(a, direct, dataset, options) -> Result<Self>
//   index_from_address(&self, address) -> usize                   - BZ index via grg2bzg
//   equivalents(&self, bz_gp) -> Result<Vec<usize>>               - translationally equivalent BZ points
//   qpoint(&self, bz_gp) -> Vector3<f64>                          - Q D^-1 (a + PS / 2)
//   irreducible_grid_points(&self) -> Result<IrreducibleGridPoints>

pub use generating_matrix::grid_generating_matrix; // fn(length, direct, dataset) -> Result<Matrix3<i64>> - conventional-cell grid in the primitive basis
