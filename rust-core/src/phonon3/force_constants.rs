// Inputs of the interaction kernel provided by the structure side: third-order force constants,
// minimal-image vectors and the primitive/supercell correspondence

use log::debug;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lattice::BaseMatrix;

// ======================== THIRD-ORDER FORCE CONSTANTS ========================

/// Full third-order force constants `Φ(l, m, n)_{abc}` over supercell atoms, stored row-major
/// with shape `(N, N, N, 3, 3, 3)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fc3 {
    num_satom: usize,
    data: Vec<f64>,
}

impl Fc3 {
    pub fn new(num_satom: usize, data: Vec<f64>) -> Result<Self> {
        let expected = num_satom.pow(3) * 27;
        if data.len() != expected {
            return Err(Error::invalid(format!(
                "fc3 of {} supercell atoms needs {} values, got {}",
                num_satom,
                expected,
                data.len()
            )));
        }
        Ok(Fc3 { num_satom, data })
    }

    pub fn zeros(num_satom: usize) -> Self {
        Fc3 {
            num_satom,
            data: vec![0.0; num_satom.pow(3) * 27],
        }
    }

    pub fn num_satom(&self) -> usize {
        self.num_satom
    }

    #[inline]
    pub fn index(&self, l: usize, m: usize, n: usize, a: usize, b: usize, c: usize) -> usize {
        (((l * self.num_satom + m) * self.num_satom + n) * 27) + a * 9 + b * 3 + c
    }

    pub fn get(&self, l: usize, m: usize, n: usize, a: usize, b: usize, c: usize) -> f64 {
        self.data[self.index(l, m, n, a, b, c)]
    }

    pub fn set(&mut self, l: usize, m: usize, n: usize, a: usize, b: usize, c: usize, value: f64) {
        let index = self.index(l, m, n, a, b, c);
        self.data[index] = value;
    }

    /// The 27 Cartesian components of one atom triple.
    pub fn block(&self, l: usize, m: usize, n: usize) -> &[f64] {
        let start = self.index(l, m, n, 0, 0, 0);
        &self.data[start..start + 27]
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Copy with every element multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Fc3 {
        Fc3 {
            num_satom: self.num_satom,
            data: self.data.iter().map(|x| x * factor).collect(),
        }
    }
}

// ======================== MINIMAL IMAGES ========================

/// Shortest vectors from each primitive atom to each supercell atom, in fractional coordinates
/// of the primitive basis. Atoms on the Wigner-Seitz boundary of the supercell have several
/// images of equal length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimalImages {
    num_satom: usize,
    num_patom: usize,
    vectors: Vec<Vec<Vector3<f64>>>,
}

impl MinimalImages {
    /// `vectors[l * num_patom + i]` holds the images from primitive atom `i` to supercell atom `l`.
    pub fn new(num_satom: usize, num_patom: usize, vectors: Vec<Vec<Vector3<f64>>>) -> Result<Self> {
        if vectors.len() != num_satom * num_patom {
            return Err(Error::invalid(format!(
                "minimal images need {} x {} entries, got {}",
                num_satom,
                num_patom,
                vectors.len()
            )));
        }
        if let Some(pos) = vectors.iter().position(Vec::is_empty) {
            return Err(Error::invalid(format!(
                "no image for supercell atom {} and primitive atom {}",
                pos / num_patom,
                pos % num_patom
            )));
        }
        Ok(MinimalImages {
            num_satom,
            num_patom,
            vectors,
        })
    }

    /// Search the shortest vectors by brute force over neighbouring supercells.
    ///
    /// `positions` are fractional coordinates in the supercell basis `A_s = A_p M`; `p2s` gives
    /// the supercell atom of each primitive atom. Lengths within `tolerance` count as equal.
    pub fn from_supercell(
        primitive: &BaseMatrix,
        supercell_matrix: &Matrix3<i64>,
        positions: &[Vector3<f64>],
        p2s: &[usize],
        tolerance: f64,
    ) -> Result<Self> {
        let supercell = primitive.base_matrix() * supercell_matrix.map(|x| x as f64);
        let mut vectors = Vec::with_capacity(positions.len() * p2s.len());

        for position in positions {
            for &s in p2s {
                let origin = positions.get(s).ok_or_else(|| {
                    Error::invalid(format!("p2s entry {} out of range", s))
                })?;
                let diff = (position - origin).map(|x| x - x.round());
                let mut candidates = Vec::with_capacity(27);
                for i in -1..=1 {
                    for j in -1..=1 {
                        for k in -1..=1 {
                            let cart = supercell * (diff + Vector3::new(i as f64, j as f64, k as f64));
                            candidates.push(cart);
                        }
                    }
                }
                let shortest = candidates
                    .iter()
                    .map(|v| v.norm())
                    .fold(f64::INFINITY, f64::min);
                let images = candidates
                    .iter()
                    .filter(|v| v.norm() < shortest + tolerance)
                    .map(|v| primitive.to_fractional(v))
                    .collect();
                vectors.push(images);
            }
        }

        debug!(
            "Minimal images: {} supercell atoms, {} primitive atoms",
            positions.len(),
            p2s.len()
        );
        Self::new(positions.len(), p2s.len(), vectors)
    }

    pub fn num_satom(&self) -> usize {
        self.num_satom
    }

    pub fn num_patom(&self) -> usize {
        self.num_patom
    }

    /// Images from primitive atom `patom` to supercell atom `satom`.
    pub fn vectors(&self, satom: usize, patom: usize) -> &[Vector3<f64>] {
        &self.vectors[satom * self.num_patom + patom]
    }

    pub fn multiplicity(&self, satom: usize, patom: usize) -> usize {
        self.vectors(satom, patom).len()
    }
}

// ======================== PRIMITIVE CORRESPONDENCE ========================

/// Maps between primitive and supercell atoms plus the primitive-atom masses (AMU).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimitiveCorrespondence {
    p2s: Vec<usize>,
    s2p: Vec<usize>,
    masses: Vec<f64>,
}

impl PrimitiveCorrespondence {
    /// `s2p[l]` is the supercell index of the primitive atom that `l` is a translation of.
    pub fn new(p2s: Vec<usize>, s2p: Vec<usize>, masses: Vec<f64>) -> Result<Self> {
        if masses.len() != p2s.len() {
            return Err(Error::invalid(format!(
                "{} masses for {} primitive atoms",
                masses.len(),
                p2s.len()
            )));
        }
        if masses.iter().any(|&m| m <= 0.0) {
            return Err(Error::invalid("masses must be positive"));
        }
        for (i, &s) in p2s.iter().enumerate() {
            if s2p.get(s) != Some(&s) {
                return Err(Error::invalid(format!(
                    "primitive atom {} maps to supercell atom {} which is not its own representative",
                    i, s
                )));
            }
        }
        if let Some(l) = s2p.iter().position(|s| !p2s.contains(s)) {
            return Err(Error::invalid(format!(
                "supercell atom {} maps to {} which is no primitive atom",
                l, s2p[l]
            )));
        }
        Ok(PrimitiveCorrespondence { p2s, s2p, masses })
    }

    pub fn p2s(&self) -> &[usize] {
        &self.p2s
    }

    pub fn s2p(&self) -> &[usize] {
        &self.s2p
    }

    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    pub fn num_patom(&self) -> usize {
        self.p2s.len()
    }

    pub fn num_satom(&self) -> usize {
        self.s2p.len()
    }

    pub fn num_band(&self) -> usize {
        self.p2s.len() * 3
    }

    /// Supercell atoms that are translations of primitive atom `patom`.
    pub fn translations_of(&self, patom: usize) -> impl Iterator<Item = usize> + '_ {
        let target = self.p2s[patom];
        self.s2p
            .iter()
            .enumerate()
            .filter(move |(_, &s)| s == target)
            .map(|(l, _)| l)
    }
}
