use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use crate::lattice::{BaseMatrix, Centering, LatticeSystem};
use crate::symmetries::symmetry_point_groups::reciprocal_lattice_point_group;

/// Symmetry information supplied by a crystallography provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymmetryDataset {
    /// Point-group rotations with respect to the primitive reciprocal basis (q' = R q).
    pub reciprocal_rotations: Vec<Matrix3<i64>>,
    /// Whether time reversal may be added as a symmetry.
    pub is_time_reversal: bool,
    /// Maps the primitive basis to the conventional one: `A_conv = A_prim T^-1`.
    pub transformation_matrix: Matrix3<f64>,
    pub centering: Centering,
    pub lattice_system: LatticeSystem,
}

impl SymmetryDataset {
    pub fn new(
        reciprocal_rotations: Vec<Matrix3<i64>>,
        transformation_matrix: Matrix3<f64>,
        centering: Centering,
        lattice_system: LatticeSystem,
    ) -> Self {
        Self {
            reciprocal_rotations,
            is_time_reversal: true,
            transformation_matrix,
            centering,
            lattice_system,
        }
    }

    /// Dataset of a lattice without a basis, for a direct basis that is the standard primitive
    /// cell of its centring. The rotations are the full lattice point group.
    pub fn from_lattice(
        direct: &BaseMatrix,
        centering: Centering,
        lattice_system: LatticeSystem,
    ) -> Self {
        Self::new(
            reciprocal_lattice_point_group(direct),
            centering.primitive_matrix(),
            centering,
            lattice_system,
        )
    }

    pub fn with_time_reversal(mut self, is_time_reversal: bool) -> Self {
        self.is_time_reversal = is_time_reversal;
        self
    }
}
