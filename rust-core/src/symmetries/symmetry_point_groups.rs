use nalgebra::Matrix3;

use crate::config::METRIC_TOLERANCE;
use crate::grid::snf::determinant_i3;
use crate::lattice::BaseMatrix;

/// Point group of a lattice (its holohedry) in the lattice's own basis.
///
/// Candidates are the integer matrices with entries in {-1, 0, 1} and determinant ±1; those
/// preserving the metric `G = A^T A` (`W^T G W = G`, relative tolerance) are kept. The identity
/// comes first, the rest in enumeration order.
pub fn lattice_point_group(basis: &BaseMatrix, tolerance: f64) -> Vec<Matrix3<i64>> {
    let metric = basis.metric();
    let scale = metric.abs().max();
    let mut rotations = vec![Matrix3::identity()];

    for code in 0..3_i64.pow(9) {
        let mut w = Matrix3::<i64>::zeros();
        let mut rest = code;
        for k in 0..9 {
            w[(k / 3, k % 3)] = rest % 3 - 1;
            rest /= 3;
        }
        if w == Matrix3::identity() || determinant_i3(&w).abs() != 1 {
            continue;
        }
        let wf = w.map(|x| x as f64);
        let transformed = wf.transpose() * metric * wf;
        if (transformed - metric).abs().max() < tolerance * scale {
            rotations.push(w);
        }
    }
    rotations
}

/// Point group acting on reciprocal fractional coordinates of a direct basis.
pub fn reciprocal_lattice_point_group(direct: &BaseMatrix) -> Vec<Matrix3<i64>> {
    lattice_point_group(&direct.reciprocal(), METRIC_TOLERANCE)
}
