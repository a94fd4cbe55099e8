// Point-group rotations acting on grid addresses
//
// Rotations are given with respect to the primitive reciprocal basis (q' = R q). On a
// generalized regular grid an address a stands for q = Q D^-1 a, so the same operation acts
// on addresses as R' = D Q^-1 R Q D^-1, which has to be an integer matrix mapping the grid
// onto itself.

use log::debug;
use nalgebra::{Matrix3, Vector3};

use crate::error::{Error, Result};
use crate::grid::grid_address::{gr_grid_addresses, grid_index_from_address, reduce_address};
use crate::grid::snf::{inverse_unimodular, to_rows};

/// Express reciprocal-basis rotations in the integer address basis of the grid.
pub fn transform_rotations(
    rotations: &[Matrix3<i64>],
    d_diag: &Vector3<i64>,
    q: &Matrix3<i64>,
) -> Result<Vec<Matrix3<i64>>> {
    let mesh: [i64; 3] = (*d_diag).into();
    let q_inv = inverse_unimodular(q).ok_or_else(|| Error::SymmetryBroken {
        mesh,
        reason: format!("Q = {:?} is not unimodular", to_rows(q)),
    })?;

    let mut transformed = Vec::with_capacity(rotations.len());
    for (n, rotation) in rotations.iter().enumerate() {
        let conjugated = q_inv * rotation * q;
        let mut r = Matrix3::zeros();
        for i in 0..3 {
            for j in 0..3 {
                let scaled = d_diag[i] * conjugated[(i, j)];
                if scaled % d_diag[j] != 0 {
                    return Err(Error::SymmetryBroken {
                        mesh,
                        reason: format!(
                            "rotation {} {:?} is not integer in the grid basis",
                            n,
                            to_rows(rotation)
                        ),
                    });
                }
                r[(i, j)] = scaled / d_diag[j];
            }
        }
        if !maps_grid_onto_itself(&r, d_diag) {
            return Err(Error::SymmetryBroken {
                mesh,
                reason: format!(
                    "rotation {} {:?} does not map the grid onto itself",
                    n,
                    to_rows(rotation)
                ),
            });
        }
        transformed.push(r);
    }

    debug!("{} rotations transformed to the grid basis", transformed.len());
    Ok(transformed)
}

/// `true` if the rotation permutes the canonical grid addresses.
pub fn maps_grid_onto_itself(rotation: &Matrix3<i64>, d_diag: &Vector3<i64>) -> bool {
    let addresses = gr_grid_addresses(d_diag);
    let mut hit = vec![false; addresses.len()];
    for address in &addresses {
        let gp = grid_index_from_address(&(rotation * address), d_diag);
        if hit[gp] {
            return false;
        }
        hit[gp] = true;
    }
    true
}

/// Rotations plus, with time reversal, their negatives. Duplicates are dropped keeping the
/// first occurrence.
pub fn point_group_reciprocal(rotations: &[Matrix3<i64>], is_time_reversal: bool) -> Vec<Matrix3<i64>> {
    let candidates = rotations.iter().copied().chain(
        rotations
            .iter()
            .filter(|_| is_time_reversal)
            .map(|r| -r),
    );
    let mut unique: Vec<Matrix3<i64>> = Vec::with_capacity(rotations.len() * 2);
    for r in candidates {
        if !unique.contains(&r) {
            unique.push(r);
        }
    }
    unique
}

/// Rotations that leave a grid address invariant modulo D (the little group of the point).
pub fn stabilizer(
    rotations: &[Matrix3<i64>],
    address: &Vector3<i64>,
    d_diag: &Vector3<i64>,
) -> Vec<Matrix3<i64>> {
    let reduced = reduce_address(address, d_diag);
    rotations
        .iter()
        .filter(|r| reduce_address(&(*r * address), d_diag) == reduced)
        .copied()
        .collect()
}

/// Transformed rotations whose reciprocal-basis counterpart keeps `direction` fixed.
///
/// `reciprocal_rotations[i]` and `transformed_rotations[i]` describe the same operation.
pub fn rotations_keeping_direction(
    reciprocal_rotations: &[Matrix3<i64>],
    transformed_rotations: &[Matrix3<i64>],
    direction: &Vector3<f64>,
    tolerance: f64,
) -> Vec<Matrix3<i64>> {
    let norm = direction.norm();
    if norm == 0.0 {
        return transformed_rotations.to_vec();
    }
    let dq = direction / norm;
    reciprocal_rotations
        .iter()
        .zip(transformed_rotations)
        .filter(|(r, _)| {
            let diff = r.map(|x| x as f64) * dq - dq;
            diff.iter().all(|x| x.abs() < tolerance)
        })
        .map(|(_, t)| *t)
        .collect()
}
