// Three-phonon interaction strength over the triplets of one grid point

// ======================== IMPORTS ========================
use log::{debug, info};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::default_unit_conversion;
use crate::error::{Error, Result};
use crate::grid::BzGrid;
use crate::phonon3::force_constants::{Fc3, MinimalImages, PrimitiveCorrespondence};
use crate::phonon3::phonon_cache::PhononCache;
use crate::phonon3::real_to_reciprocal::{real_to_reciprocal, real_to_reciprocal_symmetrized};
use crate::phonon3::reciprocal_to_normal::{reciprocal_to_normal, TripletPhonons};
use crate::phonon3::triplets::TripletsAtQ;

// ======================== CONFIGURATION ========================

/// Run options of [`Interaction`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Selected bands of g0; all bands when `None`.
    pub band_indices: Option<Vec<usize>>,
    /// Frequencies (THz) at or below this value are excluded.
    pub cutoff_frequency: f64,
    /// Factor to eV²; the phono3py convention for `prod(D)` grid points when `None`.
    pub unit_conversion: Option<f64>,
    /// Fill every entry with `constant / prod(D)` instead of computing.
    pub constant_averaged_interaction: Option<f64>,
    /// Frequencies were scaled by this factor; fc3 is scaled by its square.
    pub frequency_scale_factor: Option<f64>,
    /// Average the reciprocal fc3 over slot permutations; the external mask is then ignored.
    pub symmetrize_fc3q: bool,
}

// ======================== RESULT ========================

/// Interaction strengths `(triplet, selected band, band, band)` with the forbidden mask.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionStrength {
    shape: [usize; 4],
    values: Vec<f64>,
    mask: Vec<bool>,
}

impl InteractionStrength {
    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    #[inline]
    pub fn index(&self, t: usize, b0: usize, b1: usize, b2: usize) -> usize {
        ((t * self.shape[1] + b0) * self.shape[2] + b1) * self.shape[3] + b2
    }

    pub fn get(&self, t: usize, b0: usize, b1: usize, b2: usize) -> f64 {
        self.values[self.index(t, b0, b1, b2)]
    }

    pub fn is_masked(&self, t: usize, b0: usize, b1: usize, b2: usize) -> bool {
        self.mask[self.index(t, b0, b1, b2)]
    }

    /// `Σ_t w_t Σ_{b1,b2} V[t, b0, b1, b2] / nband²` for each selected band.
    pub fn averaged_interaction(&self, weights: &[usize]) -> Result<Vec<f64>> {
        let [num_triplets, num_selected, nb1, nb2] = self.shape;
        if weights.len() != num_triplets {
            return Err(Error::invalid(format!(
                "{} weights for {} triplets",
                weights.len(),
                num_triplets
            )));
        }
        let block = nb1 * nb2;
        let mut averaged = vec![0.0; num_selected];
        for (t, &w) in weights.iter().enumerate() {
            for (n, value) in averaged.iter_mut().enumerate() {
                let start = self.index(t, n, 0, 0);
                let sum: f64 = self.values[start..start + block].iter().sum();
                *value += w as f64 * sum;
            }
        }
        Ok(averaged.into_iter().map(|v| v / block as f64).collect())
    }
}

// ======================== KERNEL ========================

pub struct Interaction<'a> {
    grid: &'a BzGrid,
    fc3: Fc3,
    images: &'a MinimalImages,
    primitive: &'a PrimitiveCorrespondence,
    band_indices: Vec<usize>,
    unit_conversion: f64,
    config: InteractionConfig,
}

impl<'a> Interaction<'a> {
    pub fn new(
        grid: &'a BzGrid,
        fc3: &Fc3,
        images: &'a MinimalImages,
        primitive: &'a PrimitiveCorrespondence,
        config: InteractionConfig,
    ) -> Result<Self> {
        let num_band = primitive.num_band();
        if fc3.num_satom() != primitive.num_satom() || images.num_satom() != primitive.num_satom() {
            return Err(Error::invalid(format!(
                "supercell sizes differ: fc3 {}, minimal images {}, s2p {}",
                fc3.num_satom(),
                images.num_satom(),
                primitive.num_satom()
            )));
        }
        if images.num_patom() != primitive.num_patom() {
            return Err(Error::invalid(format!(
                "minimal images cover {} primitive atoms, correspondence {}",
                images.num_patom(),
                primitive.num_patom()
            )));
        }

        let band_indices = match &config.band_indices {
            Some(bands) => bands.clone(),
            None => (0..num_band).collect(),
        };
        if let Some(&band) = band_indices.iter().find(|&&b| b >= num_band) {
            return Err(Error::invalid(format!(
                "band index {} out of range ({} bands)",
                band, num_band
            )));
        }

        let fc3 = match config.frequency_scale_factor {
            Some(factor) => fc3.scaled(factor * factor),
            None => fc3.clone(),
        };
        let unit_conversion = config
            .unit_conversion
            .unwrap_or_else(|| default_unit_conversion(grid.num_grid_points()));

        Ok(Interaction {
            grid,
            fc3,
            images,
            primitive,
            band_indices,
            unit_conversion,
            config,
        })
    }

    pub fn band_indices(&self) -> &[usize] {
        &self.band_indices
    }

    pub fn num_band(&self) -> usize {
        self.primitive.num_band()
    }

    pub fn unit_conversion(&self) -> f64 {
        self.unit_conversion
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Interaction strengths of all triplets. `phonons` must belong to the grid of the kernel
    /// and hold every triplet member; `external_mask` has the shape of the result.
    pub fn run(
        &self,
        triplets: &TripletsAtQ,
        phonons: &PhononCache,
        external_mask: Option<&[bool]>,
    ) -> Result<InteractionStrength> {
        let num_band = self.num_band();
        let shape = [
            triplets.num_triplets(),
            self.band_indices.len(),
            num_band,
            num_band,
        ];
        let size: usize = shape.iter().product();

        if let Some(constant) = self.config.constant_averaged_interaction {
            let value = constant / self.grid.num_grid_points() as f64;
            info!("Constant averaged interaction: every entry set to {:e}", value);
            return Ok(InteractionStrength {
                shape,
                values: vec![value; size],
                mask: vec![false; size],
            });
        }

        phonons.check_grid(self.grid)?;
        if phonons.num_band() != num_band {
            return Err(Error::phonon_mismatch(format!(
                "phonons have {} bands, force constants {}",
                phonons.num_band(),
                num_band
            )));
        }
        if let Some(gp) = triplets
            .triplets()
            .iter()
            .flatten()
            .find(|&&gp| !phonons.is_computed(gp))
        {
            return Err(Error::phonon_mismatch(format!(
                "phonons at grid point {} are not computed",
                gp
            )));
        }
        let external_mask = if self.config.symmetrize_fc3q {
            None
        } else {
            external_mask
        };
        if let Some(m) = external_mask {
            if m.len() != size {
                return Err(Error::invalid(format!(
                    "external mask has {} entries, interaction {}",
                    m.len(),
                    size
                )));
            }
        }

        let mut values = vec![0.0; size];
        let mut mask = vec![false; size];
        let stride = shape[1] * shape[2] * shape[3];

        let compute = |(t, (values, mask)): (usize, (&mut [f64], &mut [bool]))| {
            let triplet = triplets.triplets()[t];
            let external = external_mask.map(|m| &m[t * stride..(t + 1) * stride]);
            self.compute_triplet(triplet, phonons, external, values, mask);
        };

        #[cfg(feature = "parallel")]
        values
            .par_chunks_mut(stride.max(1))
            .zip(mask.par_chunks_mut(stride.max(1)))
            .enumerate()
            .for_each(compute);
        #[cfg(not(feature = "parallel"))]
        values
            .chunks_mut(stride.max(1))
            .zip(mask.chunks_mut(stride.max(1)))
            .enumerate()
            .for_each(compute);

        let unit_conversion = self.unit_conversion;
        values.iter_mut().for_each(|v| *v *= unit_conversion);

        debug!(
            "Interaction strength of {} triplets x {} bands computed",
            shape[0], shape[1]
        );
        Ok(InteractionStrength { shape, values, mask })
    }

    fn compute_triplet(
        &self,
        triplet: [usize; 3],
        phonons: &PhononCache,
        external_mask: Option<&[bool]>,
        values: &mut [f64],
        mask: &mut [bool],
    ) {
        let q = triplet_qpoints(self.grid, triplet);
        let fc3_rec = if self.config.symmetrize_fc3q {
            real_to_reciprocal_symmetrized(&q, &self.fc3, self.images, self.primitive)
        } else {
            real_to_reciprocal(&q, &self.fc3, self.images, self.primitive)
        };

        // Presence was checked by the caller
        let empty_frequencies: &[f64] = &[];
        let frequencies = triplet.map(|gp| phonons.frequencies(gp).unwrap_or(empty_frequencies));
        let eigenvectors = triplet.map(|gp| phonons.eigenvectors(gp));
        let [Some(e0), Some(e1), Some(e2)] = eigenvectors else {
            return;
        };
        let triplet_phonons = TripletPhonons {
            frequencies,
            eigenvectors: [e0, e1, e2],
        };

        reciprocal_to_normal(
            &fc3_rec,
            &triplet_phonons,
            self.primitive.masses(),
            &self.band_indices,
            self.config.cutoff_frequency,
            external_mask,
            values,
            mask,
        );
    }
}

/// Reduced coordinates of the three members of a triplet.
pub fn triplet_qpoints(grid: &BzGrid, triplet: [usize; 3]) -> [Vector3<f64>; 3] {
    triplet.map(|gp| grid.qpoint(gp))
}
