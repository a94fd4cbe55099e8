// Projection of the reciprocal fc3 onto phonon normal modes
//
//   V(b0, b1, b2) = Σ Φ_{ia,jb,kc} e0[3i+a, b0] e1[3j+b, b1] e2[3k+c, b2] / √(m_i m_j m_k)
//
// and the stored value is |V|² / (f0 f1 f2). The contraction runs one mode index at a time.

use nalgebra::DMatrix;
use num_complex::Complex64;

use crate::phonon3::real_to_reciprocal::ReciprocalFc3;

/// Phonons of the three triplet members.
pub struct TripletPhonons<'a> {
    pub frequencies: [&'a [f64]; 3],
    pub eigenvectors: [&'a DMatrix<Complex64>; 3],
}

/// Fill `values` and `mask` (shape `(band_indices.len(), nband, nband)`) for one triplet.
///
/// Entries with any frequency not above `cutoff_frequency`, or flagged in `external_mask`,
/// are exactly zero and masked.
#[allow(clippy::too_many_arguments)]
pub fn reciprocal_to_normal(
    fc3_rec: &ReciprocalFc3,
    phonons: &TripletPhonons<'_>,
    masses: &[f64],
    band_indices: &[usize],
    cutoff_frequency: f64,
    external_mask: Option<&[bool]>,
    values: &mut [f64],
    mask: &mut [bool],
) {
    let num_patom = fc3_rec.num_patom();
    let num_band = num_patom * 3;
    let inv_sqrt_mass: Vec<f64> = masses.iter().map(|m| 1.0 / m.sqrt()).collect();
    let [f0, f1, f2] = phonons.frequencies;
    let [e0, e1, e2] = phonons.eigenvectors;

    for (n, &b0) in band_indices.iter().enumerate() {
        let block = num_band * num_band;
        let values = &mut values[n * block..(n + 1) * block];
        let mask = &mut mask[n * block..(n + 1) * block];
        let external = external_mask.map(|m| &m[n * block..(n + 1) * block]);

        if f0[b0] <= cutoff_frequency {
            values.iter_mut().for_each(|v| *v = 0.0);
            mask.iter_mut().for_each(|m| *m = true);
            continue;
        }

        // First slot contracted with e0: t1[(j b), (k c)]
        let mut t1 = vec![Complex64::new(0.0, 0.0); num_band * num_band];
        for i in 0..num_patom {
            for a in 0..3 {
                let e = e0[(3 * i + a, b0)] * inv_sqrt_mass[i];
                for j in 0..num_patom {
                    for k in 0..num_patom {
                        for b in 0..3 {
                            for c in 0..3 {
                                t1[(3 * j + b) * num_band + 3 * k + c] +=
                                    fc3_rec.get(i, j, k, a, b, c) * e;
                            }
                        }
                    }
                }
            }
        }

        for b1 in 0..num_band {
            // Second slot contracted with e1: t2[(k c)]
            let mut t2 = vec![Complex64::new(0.0, 0.0); num_band];
            for jb in 0..num_band {
                let e = e1[(jb, b1)] * inv_sqrt_mass[jb / 3];
                for kc in 0..num_band {
                    t2[kc] += t1[jb * num_band + kc] * e;
                }
            }

            for b2 in 0..num_band {
                let index = b1 * num_band + b2;
                let masked = external.map_or(false, |m| m[index]);
                if masked || f1[b1] <= cutoff_frequency || f2[b2] <= cutoff_frequency {
                    values[index] = 0.0;
                    mask[index] = true;
                    continue;
                }
                let v: Complex64 = (0..num_band)
                    .map(|kc| t2[kc] * e2[(kc, b2)] * inv_sqrt_mass[kc / 3])
                    .sum();
                values[index] = v.norm_sqr() / (f0[b0] * f1[b1] * f2[b2]);
                mask[index] = false;
            }
        }
    }
}
