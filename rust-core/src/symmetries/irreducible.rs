// Symmetry-irreducible grid points
//
// Rotations act on doubled addresses 2a + PS so that half-grid shifts stay integer. A rotated
// doubled address whose parity no longer matches PS is not a grid point of the shifted grid,
// that rotation is skipped for the point.

use log::debug;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::grid::grid_address::{double_grid_address, double_grid_index, grid_address_from_index};

/// Orbit representatives and weights of the canonical grid points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrreducibleGridPoints {
    grid_mapping_table: Vec<usize>,
    ir_grid_points: Vec<usize>,
    ir_weights: Vec<usize>,
}

impl IrreducibleGridPoints {
    /// Representatives and weights from a mapping table whose entries are their own images.
    pub fn from_mapping_table(grid_mapping_table: Vec<usize>) -> Self {
        let mut counts = vec![0_usize; grid_mapping_table.len()];
        for &rep in &grid_mapping_table {
            counts[rep] += 1;
        }
        let ir_grid_points: Vec<usize> = (0..grid_mapping_table.len())
            .filter(|&gp| grid_mapping_table[gp] == gp)
            .collect();
        let ir_weights = ir_grid_points.iter().map(|&gp| counts[gp]).collect();
        IrreducibleGridPoints {
            grid_mapping_table,
            ir_grid_points,
            ir_weights,
        }
    }

    /// Canonical index -> index of its orbit representative
    pub fn grid_mapping_table(&self) -> &[usize] {
        &self.grid_mapping_table
    }

    /// Representatives in ascending order
    pub fn ir_grid_points(&self) -> &[usize] {
        &self.ir_grid_points
    }

    /// Orbit sizes, parallel to `ir_grid_points`
    pub fn ir_weights(&self) -> &[usize] {
        &self.ir_weights
    }

    pub fn num_ir_grid_points(&self) -> usize {
        self.ir_grid_points.len()
    }
}

/// Map every canonical grid point to the smallest index in its orbit.
///
/// `rotations` are in the grid basis. With `is_time_reversal` their negatives are applied too.
pub fn ir_grid_map(
    d_diag: &Vector3<i64>,
    rotations: &[Matrix3<i64>],
    ps: &Vector3<i64>,
    is_time_reversal: bool,
) -> Result<Vec<usize>> {
    let num_gp = d_diag.iter().product::<i64>() as usize;
    let signs: &[i64] = if is_time_reversal { &[1, -1] } else { &[1] };

    let representative = |gp: usize| -> usize {
        let address_double = double_grid_address(&grid_address_from_index(gp, d_diag), ps);
        let mut rep = gp;
        for rotation in rotations {
            let rotated = rotation * address_double;
            for &sign in signs {
                if let Some(image) = double_grid_index(&rotated.map(|x| x * sign), d_diag, ps) {
                    rep = rep.min(image);
                }
            }
        }
        rep
    };

    #[cfg(feature = "parallel")]
    let mapping: Vec<usize> = (0..num_gp).into_par_iter().map(representative).collect();
    #[cfg(not(feature = "parallel"))]
    let mapping: Vec<usize> = (0..num_gp).map(representative).collect();

    if let Some(gp) = (0..num_gp).find(|&gp| mapping[mapping[gp]] != mapping[gp]) {
        return Err(Error::IrreducibleSearchFailed {
            mesh: (*d_diag).into(),
            reason: format!(
                "grid point {} maps to {} which maps further to {}; the rotations do not form a group",
                gp,
                mapping[gp],
                mapping[mapping[gp]]
            ),
        });
    }
    Ok(mapping)
}

/// Irreducible grid points with weights summing to `prod(D)`.
pub fn irreducible_grid_points(
    d_diag: &Vector3<i64>,
    rotations: &[Matrix3<i64>],
    ps: &Vector3<i64>,
    is_time_reversal: bool,
) -> Result<IrreducibleGridPoints> {
    let mapping = ir_grid_map(d_diag, rotations, ps, is_time_reversal)?;
    let irreducible = IrreducibleGridPoints::from_mapping_table(mapping);
    debug!(
        "{} irreducible grid points out of {} ({} rotations, time reversal {})",
        irreducible.num_ir_grid_points(),
        irreducible.grid_mapping_table().len(),
        rotations.len(),
        is_time_reversal
    );
    Ok(irreducible)
}
