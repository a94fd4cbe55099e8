// Grid generating matrix from a target length and a symmetry dataset
//
// The microzone is chosen as the regular grid of the conventional unit cell, so the mesh of
// the conventional cell respects its lattice system. Expressed in the primitive reciprocal
// basis this grid is generally not diagonal, which is why it is decomposed by SNF afterwards.

use log::debug;
use nalgebra::{Matrix3, Vector3};

use crate::error::{Error, Result};
use crate::interfaces::Space;
use crate::lattice::{length2mesh, BaseMatrix, LatticeSystem};
use crate::symmetries::SymmetryDataset;

/// Conventional basis (columns) of a primitive direct basis: `A_conv = A_prim T^-1`.
pub fn conventional_lattice(direct: &BaseMatrix, dataset: &SymmetryDataset) -> Result<BaseMatrix> {
    let tmat_inv = dataset
        .transformation_matrix
        .try_inverse()
        .ok_or_else(|| Error::invalid("transformation matrix of symmetry dataset is singular"))?;
    BaseMatrix::from_matrix(direct.base_matrix() * tmat_inv, Space::Real)
}

/// Mesh numbers of the conventional cell for a length, equalized along the axes that the
/// lattice system makes equivalent.
///
/// Each axis is rounded on its own and equivalent axes take the larger value. No supercell
/// matrix is estimated and no atom-count cap applies, so the mesh for a given length can be
/// finer than in codes that do (hexagonal a = 3.11, c = 4.98 at length 25 gives 9 x 9 x 5).
pub fn conventional_mesh_numbers(
    length: f64,
    conventional: &BaseMatrix,
    lattice_system: LatticeSystem,
) -> Vector3<i64> {
    let mut mesh = length2mesh(length, conventional);
    match lattice_system {
        LatticeSystem::Cubic => {
            let m = mesh.iter().copied().max().unwrap_or(1);
            mesh = [m, m, m];
        }
        LatticeSystem::Tetragonal | LatticeSystem::Hexagonal | LatticeSystem::Rhombohedral => {
            let m = mesh[0].max(mesh[1]);
            mesh[0] = m;
            mesh[1] = m;
        }
        LatticeSystem::Triclinic | LatticeSystem::Monoclinic | LatticeSystem::Orthorhombic => {}
    }
    Vector3::from(mesh)
}

/// Generating matrix `A = diag(m) (P^-1)^T` in the primitive reciprocal basis, where `m` are
/// the conventional mesh numbers and `P` the centring's primitive matrix.
pub fn grid_generating_matrix(
    length: f64,
    direct: &BaseMatrix,
    dataset: &SymmetryDataset,
) -> Result<Matrix3<i64>> {
    let conventional = conventional_lattice(direct, dataset)?;
    let conv_mesh = conventional_mesh_numbers(length, &conventional, dataset.lattice_system);
    let inv_pmat = dataset.centering.inverse_primitive_matrix()?;
    let grid_matrix = Matrix3::from_diagonal(&conv_mesh) * inv_pmat.transpose();

    debug!(
        "Conventional mesh {:?} ({:?}) gives generating matrix {:?}",
        conv_mesh.as_slice(),
        dataset.centering,
        crate::grid::snf::to_rows(&grid_matrix)
    );
    Ok(grid_matrix)
}
