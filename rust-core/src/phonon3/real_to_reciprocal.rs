// Fourier transform of third-order force constants to a q-point triplet
//
//   Φ_ijk(q0, q1, q2) = e^{2πi (q0+q1+q2)·r_i} Σ_{l∈j, m∈k} Φ(p2s[i], l, m) φ(q1, i, l) φ(q2, i, m)
//
// where φ(q, i, l) averages e^{2πi q·v} over the minimal images v from primitive atom i to
// supercell atom l, and r_i is the minimal image from primitive atom 0 to p2s[i].

use std::f64::consts::PI;

use nalgebra::Vector3;
use num_complex::Complex64;

use crate::phonon3::force_constants::{Fc3, MinimalImages, PrimitiveCorrespondence};

/// Slot permutations applied simultaneously to q-points, atoms and Cartesian indices.
const SLOT_PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// Reciprocal-space fc3 over primitive atoms, shape `(n, n, n, 3, 3, 3)` row-major.
#[derive(Debug, Clone)]
pub struct ReciprocalFc3 {
    num_patom: usize,
    data: Vec<Complex64>,
}

impl ReciprocalFc3 {
    fn zeros(num_patom: usize) -> Self {
        ReciprocalFc3 {
            num_patom,
            data: vec![Complex64::new(0.0, 0.0); num_patom.pow(3) * 27],
        }
    }

    pub fn num_patom(&self) -> usize {
        self.num_patom
    }

    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize, a: usize, b: usize, c: usize) -> usize {
        (((i * self.num_patom + j) * self.num_patom + k) * 27) + a * 9 + b * 3 + c
    }

    pub fn get(&self, i: usize, j: usize, k: usize, a: usize, b: usize, c: usize) -> Complex64 {
        self.data[self.index(i, j, k, a, b, c)]
    }

    pub fn data(&self) -> &[Complex64] {
        &self.data
    }
}

/// `e^{2πi q·v}` averaged over the minimal images between a primitive and a supercell atom.
pub fn phase_factor(q: &Vector3<f64>, images: &MinimalImages, satom: usize, patom: usize) -> Complex64 {
    let vectors = images.vectors(satom, patom);
    let sum: Complex64 = vectors
        .iter()
        .map(|v| Complex64::from_polar(1.0, 2.0 * PI * q.dot(v)))
        .sum();
    sum / vectors.len() as f64
}

/// Reciprocal fc3 at the q-point triplet `q` (reduced coordinates).
pub fn real_to_reciprocal(
    q: &[Vector3<f64>; 3],
    fc3: &Fc3,
    images: &MinimalImages,
    primitive: &PrimitiveCorrespondence,
) -> ReciprocalFc3 {
    let num_patom = primitive.num_patom();
    let num_satom = primitive.num_satom();
    let p2s = primitive.p2s();
    let mut fc3_rec = ReciprocalFc3::zeros(num_patom);
    let q_sum = q[0] + q[1] + q[2];

    for i in 0..num_patom {
        let r_i = images.vectors(p2s[i], 0)[0];
        let pre_phase = Complex64::from_polar(1.0, 2.0 * PI * q_sum.dot(&r_i));

        let phase1: Vec<Complex64> = (0..num_satom)
            .map(|l| phase_factor(&q[1], images, l, i))
            .collect();
        let phase2: Vec<Complex64> = (0..num_satom)
            .map(|m| phase_factor(&q[2], images, m, i))
            .collect();

        for j in 0..num_patom {
            for k in 0..num_patom {
                let mut block = [Complex64::new(0.0, 0.0); 27];
                for l in primitive.translations_of(j) {
                    for m in primitive.translations_of(k) {
                        let phase = phase1[l] * phase2[m];
                        for (value, &phi) in block.iter_mut().zip(fc3.block(p2s[i], l, m)) {
                            *value += phase * phi;
                        }
                    }
                }
                let start = fc3_rec.index(i, j, k, 0, 0, 0);
                for (target, value) in fc3_rec.data[start..start + 27].iter_mut().zip(block) {
                    *target = value * pre_phase;
                }
            }
        }
    }
    fc3_rec
}

/// Average of [`real_to_reciprocal`] over the six simultaneous permutations of the slots.
pub fn real_to_reciprocal_symmetrized(
    q: &[Vector3<f64>; 3],
    fc3: &Fc3,
    images: &MinimalImages,
    primitive: &PrimitiveCorrespondence,
) -> ReciprocalFc3 {
    let num_patom = primitive.num_patom();
    let mut averaged = ReciprocalFc3::zeros(num_patom);

    for perm in &SLOT_PERMUTATIONS {
        let q_perm = [q[perm[0]], q[perm[1]], q[perm[2]]];
        let permuted = real_to_reciprocal(&q_perm, fc3, images, primitive);
        for i in 0..num_patom {
            for j in 0..num_patom {
                for k in 0..num_patom {
                    let atoms = [i, j, k];
                    for a in 0..3 {
                        for b in 0..3 {
                            for c in 0..3 {
                                let carts = [a, b, c];
                                let value = permuted.get(
                                    atoms[perm[0]],
                                    atoms[perm[1]],
                                    atoms[perm[2]],
                                    carts[perm[0]],
                                    carts[perm[1]],
                                    carts[perm[2]],
                                );
                                let index = averaged.index(i, j, k, a, b, c);
                                averaged.data[index] += value / 6.0;
                            }
                        }
                    }
                }
            }
        }
    }
    averaged
}
