// Smith normal form of 3x3 integer matrices
//
// A generating matrix A of a generalized regular grid is decomposed as D = P A Q with
// unimodular P, Q. The elimination below always reaches the divisibility chain
// D0 | D1 | D2, so D comes out ascending without a separate sort.

// ======================== IMPORTS ========================
use log::debug;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::config::SNF_MAX_ITERATIONS;
use crate::error::{Error, Result};

// ======================== DECOMPOSITION ========================

/// Result of `D = P A Q`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnfDecomposition {
    d_diag: Vector3<i64>,
    p: Matrix3<i64>,
    q: Matrix3<i64>,
}

impl SnfDecomposition {
    /// Decomposition of a plain regular mesh: `D` = mesh, `P = Q = I`.
    pub fn from_mesh(mesh: [i64; 3]) -> Result<Self> {
        if mesh.iter().any(|&m| m <= 0) {
            return Err(Error::GridDecompositionFailed {
                matrix: to_rows(&Matrix3::from_diagonal(&Vector3::from(mesh))),
                reason: "mesh numbers must be positive".to_string(),
            });
        }
        Ok(SnfDecomposition {
            d_diag: Vector3::from(mesh),
            p: Matrix3::identity(),
            q: Matrix3::identity(),
        })
    }

    /// Decompose a grid generating matrix.
    ///
    /// A diagonal `a` is taken as `D` directly unless `force_snf` is set, in which case the
    /// full reduction runs and `D` satisfies the divisibility chain.
    pub fn from_generating_matrix(a: &Matrix3<i64>, force_snf: bool) -> Result<Self> {
        if !force_snf && is_diagonal(a) {
            let diagonal = a.diagonal();
            if diagonal.iter().any(|&d| d <= 0) {
                return Err(Error::GridDecompositionFailed {
                    matrix: to_rows(a),
                    reason: "diagonal generating matrix must have positive entries".to_string(),
                });
            }
            debug!("Generating matrix is diagonal, SNF skipped: D = {:?}", diagonal.as_slice());
            return Ok(SnfDecomposition {
                d_diag: diagonal,
                p: Matrix3::identity(),
                q: Matrix3::identity(),
            });
        }
        snf3x3(a)
    }

    /// Diagonal elements of D
    pub fn d_diag(&self) -> &Vector3<i64> {
        &self.d_diag
    }

    /// Left unimodular matrix
    pub fn p(&self) -> &Matrix3<i64> {
        &self.p
    }

    /// Right unimodular matrix
    pub fn q(&self) -> &Matrix3<i64> {
        &self.q
    }

    pub fn num_grid_points(&self) -> usize {
        self.d_diag.iter().product::<i64>() as usize
    }
}

/// Smith normal form of a non-singular 3x3 integer matrix.
///
/// `D` is unique but `P` and `Q` are not. Other SNF routines can return different unimodular
/// factors for the same `A`, and then grid-point indices and rotations in the grid basis do not
/// line up with theirs even though `D` agrees.
pub fn snf3x3(a: &Matrix3<i64>) -> Result<SnfDecomposition> {
    if determinant_i3(a) == 0 {
        return Err(Error::GridDecompositionFailed {
            matrix: to_rows(a),
            reason: "generating matrix is singular".to_string(),
        });
    }

    let mut m = *a;
    let mut p = Matrix3::<i64>::identity();
    let mut q = Matrix3::<i64>::identity();

    for t in 0..3 {
        let mut converged = false;

        for _ in 0..SNF_MAX_ITERATIONS {
            let Some((pi, pj)) = smallest_nonzero(&m, t) else {
                break;
            };
            m.swap_rows(t, pi);
            p.swap_rows(t, pi);
            m.swap_columns(t, pj);
            q.swap_columns(t, pj);

            let pivot = m[(t, t)];
            let mut clean = true;

            for i in (t + 1)..3 {
                let factor = m[(i, t)] / pivot;
                if factor != 0 {
                    add_row(&mut m, &mut p, i, t, -factor);
                }
                if m[(i, t)] != 0 {
                    clean = false;
                }
            }
            for j in (t + 1)..3 {
                let factor = m[(t, j)] / pivot;
                if factor != 0 {
                    add_column(&mut m, &mut q, j, t, -factor);
                }
                if m[(t, j)] != 0 {
                    clean = false;
                }
            }
            if !clean {
                continue;
            }

            // Pivot has to divide the remaining block
            let offending_row = ((t + 1)..3)
                .find(|&i| ((t + 1)..3).any(|j| m[(i, j)] % pivot != 0));
            match offending_row {
                Some(i) => add_row(&mut m, &mut p, t, i, 1),
                None => {
                    converged = true;
                    break;
                }
            }
        }

        if !converged {
            return Err(Error::GridDecompositionFailed {
                matrix: to_rows(a),
                reason: format!(
                    "elimination at pivot {} did not converge within {} iterations",
                    t, SNF_MAX_ITERATIONS
                ),
            });
        }
    }

    for t in 0..3 {
        if m[(t, t)] < 0 {
            for j in 0..3 {
                m[(t, j)] = -m[(t, j)];
                p[(t, j)] = -p[(t, j)];
            }
        }
    }

    let decomposition = SnfDecomposition {
        d_diag: m.diagonal(),
        p,
        q,
    };

    if p * a * q != Matrix3::from_diagonal(&decomposition.d_diag)
        || determinant_i3(&p).abs() != 1
        || determinant_i3(&q).abs() != 1
    {
        return Err(Error::GridDecompositionFailed {
            matrix: to_rows(a),
            reason: "reduction did not reach diagonal form".to_string(),
        });
    }

    debug!(
        "SNF: D = {:?}, P = {:?}, Q = {:?}",
        decomposition.d_diag.as_slice(),
        to_rows(&decomposition.p),
        to_rows(&decomposition.q)
    );

    Ok(decomposition)
}

// ======================== INTEGER MATRIX HELPERS ========================

pub fn determinant_i3(m: &Matrix3<i64>) -> i64 {
    m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
        - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
        + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
}

/// Inverse of an integer matrix with determinant ±1.
pub fn inverse_unimodular(m: &Matrix3<i64>) -> Option<Matrix3<i64>> {
    let det = determinant_i3(m);
    if det.abs() != 1 {
        return None;
    }
    let mut inverse = Matrix3::zeros();
    for i in 0..3 {
        for j in 0..3 {
            // Cofactor of (j, i) gives the adjugate entry (i, j)
            let r0 = (j + 1) % 3;
            let r1 = (j + 2) % 3;
            let c0 = (i + 1) % 3;
            let c1 = (i + 2) % 3;
            inverse[(i, j)] = (m[(r0, c0)] * m[(r1, c1)] - m[(r0, c1)] * m[(r1, c0)]) * det;
        }
    }
    Some(inverse)
}

pub fn is_diagonal(m: &Matrix3<i64>) -> bool {
    (0..3).all(|i| (0..3).all(|j| i == j || m[(i, j)] == 0))
}

/// Row-major nested array, used in error messages and logs.
pub fn to_rows(m: &Matrix3<i64>) -> [[i64; 3]; 3] {
    let mut rows = [[0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            rows[i][j] = m[(i, j)];
        }
    }
    rows
}

fn smallest_nonzero(m: &Matrix3<i64>, t: usize) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    for i in t..3 {
        for j in t..3 {
            let value = m[(i, j)].abs();
            if value == 0 {
                continue;
            }
            match best {
                Some((bi, bj)) if m[(bi, bj)].abs() <= value => {}
                _ => best = Some((i, j)),
            }
        }
    }
    best
}

// row_target += factor * row_source, mirrored into the left transform
fn add_row(
    m: &mut Matrix3<i64>,
    p: &mut Matrix3<i64>,
    target: usize,
    source: usize,
    factor: i64,
) {
    for j in 0..3 {
        m[(target, j)] += factor * m[(source, j)];
        p[(target, j)] += factor * p[(source, j)];
    }
}

// column_target += factor * column_source, mirrored into the right transform
fn add_column(
    m: &mut Matrix3<i64>,
    q: &mut Matrix3<i64>,
    target: usize,
    source: usize,
    factor: i64,
) {
    for i in 0..3 {
        m[(i, target)] += factor * m[(i, source)];
        q[(i, target)] += factor * q[(i, source)];
    }
}
