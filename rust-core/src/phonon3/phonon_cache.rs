// Phonons on the BZ grid points
//
// Frequencies and eigenvectors come from an external solver. They are stored per BZ grid
// index and only computed by an explicit `ensure_computed`; queries never trigger a solve.

use log::{debug, warn};
use nalgebra::{DMatrix, Vector3};
use num_complex::Complex64;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::grid::BzGrid;

// ======================== SOLVER CONTRACT ========================

/// Phonons at one q-point: frequencies (THz) and eigenvectors as columns, one per band.
#[derive(Debug, Clone)]
pub struct PhononAtQ {
    pub frequencies: Vec<f64>,
    pub eigenvectors: DMatrix<Complex64>,
}

/// Diagonalizes the dynamical matrix at a q-point in reduced reciprocal coordinates.
///
/// `q_direction` is only given at the zone center, where it selects the non-analytic limit.
pub trait PhononSolver: Sync {
    fn num_band(&self) -> usize;

    fn solve(&self, qpoint: &Vector3<f64>, q_direction: Option<&Vector3<f64>>) -> Result<PhononAtQ>;
}

// ======================== CACHE ========================

#[derive(Debug, Clone)]
pub struct PhononCache {
    num_band: usize,
    addresses: Vec<Vector3<i64>>,
    ps: Vector3<i64>,
    cutoff_frequency: f64,
    nac_q_direction: Option<Vector3<f64>>,
    frequencies: Vec<Vec<f64>>,
    eigenvectors: Vec<DMatrix<Complex64>>,
    done: Vec<bool>,
}

impl PhononCache {
    /// Empty cache for every BZ grid point of `grid`.
    pub fn new(grid: &BzGrid, num_band: usize, cutoff_frequency: f64) -> Self {
        let num_bz = grid.num_bz_points();
        PhononCache {
            num_band,
            addresses: grid.addresses().to_vec(),
            ps: *grid.ps(),
            cutoff_frequency,
            nac_q_direction: None,
            frequencies: vec![vec![0.0; num_band]; num_bz],
            eigenvectors: vec![DMatrix::zeros(num_band, num_band); num_bz],
            done: vec![false; num_bz],
        }
    }

    /// Direction of the non-analytic limit used at the zone center; invalidates that point.
    pub fn set_nac_q_direction(&mut self, direction: Option<Vector3<f64>>) {
        self.nac_q_direction = direction;
        if let Some(gp) = self.gamma_point() {
            self.done[gp] = false;
        }
    }

    /// Solve the grid points that are not computed yet.
    ///
    /// Solver calls run in parallel; results are written afterwards, so a failing call leaves
    /// the cache untouched.
    pub fn ensure_computed(
        &mut self,
        solver: &dyn PhononSolver,
        grid: &BzGrid,
        grid_points: &[usize],
    ) -> Result<()> {
        if solver.num_band() != self.num_band {
            return Err(Error::phonon_mismatch(format!(
                "solver has {} bands, cache {}",
                solver.num_band(),
                self.num_band
            )));
        }
        self.check_grid(grid)?;

        let mut missing: Vec<usize> = Vec::with_capacity(grid_points.len());
        for &gp in grid_points {
            if gp >= self.done.len() {
                return Err(Error::invalid(format!(
                    "grid point {} out of range ({} BZ points)",
                    gp,
                    self.done.len()
                )));
            }
            if !self.done[gp] && !missing.contains(&gp) {
                missing.push(gp);
            }
        }
        if missing.is_empty() {
            return Ok(());
        }

        let nac = self.nac_q_direction;
        let solve_one = |&gp: &usize| -> Result<(usize, PhononAtQ)> {
            let direction = if self.addresses[gp] == Vector3::zeros() && self.ps == Vector3::zeros() {
                nac.as_ref()
            } else {
                None
            };
            solver.solve(&grid.qpoint(gp), direction).map(|phonon| (gp, phonon))
        };

        #[cfg(feature = "parallel")]
        let solved: Vec<(usize, PhononAtQ)> = missing.par_iter().map(solve_one).collect::<Result<_>>()?;
        #[cfg(not(feature = "parallel"))]
        let solved: Vec<(usize, PhononAtQ)> = missing.iter().map(solve_one).collect::<Result<_>>()?;

        for (gp, phonon) in solved {
            self.store(gp, phonon)?;
        }
        debug!("Phonons solved at {} grid points", missing.len());
        Ok(())
    }

    /// Solve every BZ grid point.
    pub fn ensure_all(&mut self, solver: &dyn PhononSolver, grid: &BzGrid) -> Result<()> {
        let all: Vec<usize> = (0..self.done.len()).collect();
        self.ensure_computed(solver, grid, &all)
    }

    /// Replace all phonons by externally computed ones.
    ///
    /// `addresses` must be the BZ addresses the data was computed on.
    pub fn set_phonon_data(
        &mut self,
        frequencies: Vec<Vec<f64>>,
        eigenvectors: Vec<DMatrix<Complex64>>,
        addresses: &[Vector3<i64>],
    ) -> Result<()> {
        if addresses.len() != self.addresses.len() {
            return Err(Error::phonon_mismatch(format!(
                "{} grid addresses given, grid has {}",
                addresses.len(),
                self.addresses.len()
            )));
        }
        if let Some(gp) = (0..addresses.len()).find(|&gp| addresses[gp] != self.addresses[gp]) {
            return Err(Error::phonon_mismatch(format!(
                "grid address {:?} at index {} differs from {:?}",
                addresses[gp].as_slice(),
                gp,
                self.addresses[gp].as_slice()
            )));
        }
        if frequencies.len() != addresses.len() || eigenvectors.len() != addresses.len() {
            return Err(Error::phonon_mismatch(format!(
                "{} frequency sets and {} eigenvector sets for {} grid points",
                frequencies.len(),
                eigenvectors.len(),
                addresses.len()
            )));
        }
        for (gp, (f, e)) in frequencies.iter().zip(&eigenvectors).enumerate() {
            self.check_shape(gp, f, e)?;
        }

        self.frequencies = frequencies;
        self.eigenvectors = eigenvectors;
        self.done.iter_mut().for_each(|d| *d = true);
        Ok(())
    }

    /// Forget all phonons.
    pub fn invalidate(&mut self) {
        self.done.iter_mut().for_each(|d| *d = false);
    }

    pub fn invalidate_points(&mut self, grid_points: &[usize]) {
        for &gp in grid_points {
            if let Some(d) = self.done.get_mut(gp) {
                *d = false;
            }
        }
    }

    // ======================== QUERIES ========================

    pub fn num_band(&self) -> usize {
        self.num_band
    }

    pub fn num_grid_points(&self) -> usize {
        self.done.len()
    }

    pub fn is_computed(&self, gp: usize) -> bool {
        self.done.get(gp).copied().unwrap_or(false)
    }

    pub fn frequencies(&self, gp: usize) -> Option<&[f64]> {
        self.is_computed(gp).then(|| self.frequencies[gp].as_slice())
    }

    pub fn eigenvectors(&self, gp: usize) -> Option<&DMatrix<Complex64>> {
        self.is_computed(gp).then(|| &self.eigenvectors[gp])
    }

    pub fn cutoff_frequency(&self) -> f64 {
        self.cutoff_frequency
    }

    // ======================== INTERNALS ========================

    fn gamma_point(&self) -> Option<usize> {
        if self.ps != Vector3::zeros() {
            return None;
        }
        self.addresses.iter().position(|a| *a == Vector3::zeros())
    }

    /// Fails unless `grid` has the addresses the cache was created for.
    pub(crate) fn check_grid(&self, grid: &BzGrid) -> Result<()> {
        if grid.addresses() != self.addresses.as_slice() {
            return Err(Error::phonon_mismatch(
                "grid addresses differ from those the cache was created for",
            ));
        }
        Ok(())
    }

    fn check_shape(&self, gp: usize, frequencies: &[f64], eigenvectors: &DMatrix<Complex64>) -> Result<()> {
        if frequencies.len() != self.num_band
            || eigenvectors.nrows() != self.num_band
            || eigenvectors.ncols() != self.num_band
        {
            return Err(Error::phonon_mismatch(format!(
                "grid point {}: {} frequencies and {}x{} eigenvectors, expected {} bands",
                gp,
                frequencies.len(),
                eigenvectors.nrows(),
                eigenvectors.ncols(),
                self.num_band
            )));
        }
        Ok(())
    }

    fn store(&mut self, gp: usize, phonon: PhononAtQ) -> Result<()> {
        self.check_shape(gp, &phonon.frequencies, &phonon.eigenvectors)?;
        let mut frequencies = phonon.frequencies;
        if Some(gp) == self.gamma_point() {
            self.zero_acoustic_frequencies(&mut frequencies);
        }
        self.frequencies[gp] = frequencies;
        self.eigenvectors[gp] = phonon.eigenvectors;
        self.done[gp] = true;
        Ok(())
    }

    // Unless three bands already lie below the cutoff, the lowest three are acoustic and set to zero.
    fn zero_acoustic_frequencies(&self, frequencies: &mut [f64]) {
        let below = frequencies.iter().filter(|&&f| f < self.cutoff_frequency).count();
        if below >= 3 {
            return;
        }
        for (band, f) in frequencies.iter_mut().take(3).enumerate() {
            if *f >= self.cutoff_frequency {
                warn!(
                    "Phonon frequency of band {} at Gamma is {:.6} THz, forced to zero",
                    band + 1,
                    f
                );
                *f = 0.0;
            }
        }
    }
}
