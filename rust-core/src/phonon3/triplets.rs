// Momentum-conserving triplets at a fixed first grid point
//
// For g0 fixed, the pairs (g1, g2) with g0 + g1 + g2 ≡ 0 (mod D) are reduced by the little
// group of g0. Each representative g1 is then placed in the Brillouin zone together with g2 so
// that the three BZ addresses sum to zero, or to the shortest reciprocal lattice vector when
// g0 + g1 + g2 crosses the zone boundary (umklapp).

// ======================== IMPORTS ========================
use log::{debug, warn};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::NAC_DIRECTION_TOLERANCE;
use crate::error::{Error, Result};
use crate::grid::bz_folding::bz_reduction_tolerance;
use crate::grid::grid_address::{grid_address_from_index, grid_index_from_address, is_momentum_conserved};
use crate::grid::BzGrid;
use crate::interfaces::TripletSearch;
use crate::symmetries::{ir_grid_map, point_group_reciprocal, rotations_keeping_direction, stabilizer};

// ======================== OPTIONS ========================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripletOptions {
    pub search: TripletSearch,
    /// Identify triplets related by exchanging g1 and g2.
    pub swappable: bool,
    /// Add time reversal to the grid rotations when the grid allows it.
    pub is_time_reversal: bool,
    /// Restrict the search to these rotations (grid basis) instead of the grid's.
    pub rotations: Option<Vec<Matrix3<i64>>>,
    /// Non-analytic direction, used when g0 is the zone center.
    pub nac_q_direction: Option<Vector3<f64>>,
}

impl Default for TripletOptions {
    fn default() -> Self {
        TripletOptions {
            search: TripletSearch::Symmetric,
            swappable: true,
            is_time_reversal: true,
            rotations: None,
            nac_q_direction: None,
        }
    }
}

// ======================== RESULT ========================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripletsAtQ {
    grid_point: usize,
    triplets: Vec<[usize; 3]>,
    weights: Vec<usize>,
    ir_g1: Vec<usize>,
    triplet_map: Vec<usize>,
    ir_map: Vec<usize>,
}

impl TripletsAtQ {
    /// BZ index of g0
    pub fn grid_point(&self) -> usize {
        self.grid_point
    }

    /// BZ indices (g0, g1, g2)
    pub fn triplets(&self) -> &[[usize; 3]] {
        &self.triplets
    }

    pub fn weights(&self) -> &[usize] {
        &self.weights
    }

    /// Canonical index of g1 of each triplet
    pub fn ir_g1(&self) -> &[usize] {
        &self.ir_g1
    }

    /// Canonical g1 -> index of the triplet representing it
    pub fn triplet_map(&self) -> &[usize] {
        &self.triplet_map
    }

    /// Canonical g1 -> representative under the little group of g0, without swapping
    pub fn ir_map(&self) -> &[usize] {
        &self.ir_map
    }

    pub fn num_triplets(&self) -> usize {
        self.triplets.len()
    }
}

// ======================== SEARCH ========================

/// Irreducible triplets `(g0, g1, g2)` for the BZ grid point `grid_point`.
pub fn triplets_at_q(grid_point: usize, grid: &BzGrid, options: &TripletOptions) -> Result<TripletsAtQ> {
    if grid_point >= grid.num_bz_points() {
        return Err(Error::invalid(format!(
            "grid point {} out of range ({} BZ points)",
            grid_point,
            grid.num_bz_points()
        )));
    }
    if *grid.ps() != Vector3::zeros() {
        return Err(Error::invalid("triplets need a grid without half-grid shift"));
    }

    let d_diag = grid.d_diag();
    let num_gp = grid.num_grid_points();
    let address0 = grid.addresses()[grid_point];

    let (map_q, map_triplets) = match options.search {
        TripletSearch::Unsymmetric => {
            let identity: Vec<usize> = (0..num_gp).collect();
            (identity.clone(), identity)
        }
        TripletSearch::Symmetric => {
            let (rotations, is_time_reversal) = search_rotations(grid, &address0, options);
            let point_group = point_group_reciprocal(&rotations, is_time_reversal);
            let little_group = stabilizer(&point_group, &address0, d_diag);
            debug!(
                "Little group of grid point {} has {} of {} operations",
                grid_point,
                little_group.len(),
                point_group.len()
            );
            let map_q = ir_grid_map(d_diag, &little_group, &Vector3::zeros(), false)?;
            let map_triplets = if options.swappable {
                fold_swapped_pairs(&map_q, &address0, d_diag)
            } else {
                map_q.clone()
            };
            (map_q, map_triplets)
        }
    };

    let ir_g1: Vec<usize> = (0..num_gp).filter(|&gp| map_triplets[gp] == gp).collect();
    let mut position = vec![0_usize; num_gp];
    for (t, &gp) in ir_g1.iter().enumerate() {
        position[gp] = t;
    }
    let mut weights = vec![0_usize; ir_g1.len()];
    let triplet_map: Vec<usize> = map_triplets.iter().map(|&rep| position[rep]).collect();
    for &t in &triplet_map {
        weights[t] += 1;
    }

    let resolve = |&g1: &usize| bz_triplet(grid_point, g1, grid);
    #[cfg(feature = "parallel")]
    let triplets: Vec<[usize; 3]> = ir_g1.par_iter().map(resolve).collect::<Result<_>>()?;
    #[cfg(not(feature = "parallel"))]
    let triplets: Vec<[usize; 3]> = ir_g1.iter().map(resolve).collect::<Result<_>>()?;

    for triplet in &triplets {
        let addresses = triplet.map(|gp| grid.addresses()[gp]);
        if !is_momentum_conserved(&addresses, d_diag) {
            warn!(
                "Momentum is not conserved in triplet {:?}: addresses {:?} {:?} {:?}",
                triplet,
                addresses[0].as_slice(),
                addresses[1].as_slice(),
                addresses[2].as_slice()
            );
        }
    }

    debug!(
        "{} triplets at grid point {} ({:?}, swappable {})",
        triplets.len(),
        grid_point,
        options.search,
        options.swappable
    );

    Ok(TripletsAtQ {
        grid_point,
        triplets,
        weights,
        ir_g1,
        triplet_map,
        ir_map: map_q,
    })
}

/// All `prod(D)` triplets with weight one.
pub fn nosym_triplets_at_q(grid_point: usize, grid: &BzGrid) -> Result<TripletsAtQ> {
    let options = TripletOptions {
        search: TripletSearch::Unsymmetric,
        ..TripletOptions::default()
    };
    triplets_at_q(grid_point, grid, &options)
}

// Rotations and time-reversal flag of a symmetric search. At the zone center with a
// non-analytic direction only the rotations keeping that direction survive.
fn search_rotations(
    grid: &BzGrid,
    address0: &Vector3<i64>,
    options: &TripletOptions,
) -> (Vec<Matrix3<i64>>, bool) {
    let is_time_reversal = options.is_time_reversal && grid.is_time_reversal();
    match (&options.nac_q_direction, *address0 == Vector3::zeros()) {
        (Some(direction), true) => {
            let rotations = rotations_keeping_direction(
                grid.reciprocal_rotations(),
                grid.rotations(),
                direction,
                NAC_DIRECTION_TOLERANCE,
            );
            debug!(
                "{} rotations keep the non-analytic direction {:?}",
                rotations.len(),
                direction.as_slice()
            );
            (rotations, false)
        }
        _ => {
            let rotations = options
                .rotations
                .clone()
                .unwrap_or_else(|| grid.rotations().to_vec());
            (rotations, is_time_reversal)
        }
    }
}

// g1 and its partner g2 = -(g0 + g1) describe the same triplet; the one with the smaller
// representative is kept.
fn fold_swapped_pairs(map_q: &[usize], address0: &Vector3<i64>, d_diag: &Vector3<i64>) -> Vec<usize> {
    let mut map_triplets: Vec<usize> = (0..map_q.len()).collect();
    for gp in (0..map_q.len()).filter(|&gp| map_q[gp] == gp) {
        let address1 = grid_address_from_index(gp, d_diag);
        let partner = grid_index_from_address(&(-(address0 + address1)), d_diag);
        if map_q[partner] < gp {
            map_triplets[gp] = map_q[partner];
        }
    }
    (0..map_q.len()).map(|gp| map_triplets[map_q[gp]]).collect()
}

// BZ indices of g1 and g2 for a canonical g1, g0 kept fixed: exact zero sum if any, else the
// combination with the shortest summed reciprocal vector.
pub(crate) fn bz_triplet(g0: usize, g1: usize, grid: &BzGrid) -> Result<[usize; 3]> {
    let d_diag = grid.d_diag();
    let addresses = grid.addresses();
    let address0 = addresses[g0];
    let address1 = grid_address_from_index(g1, d_diag);
    let g2 = grid_index_from_address(&(-(address0 + address1)), d_diag);

    let lqd_inv = grid.reciprocal_lattice() * grid.qd_inv();
    let tolerance = bz_reduction_tolerance(grid.reciprocal_lattice(), grid.q(), d_diag);

    let bz_g1 = *grid.grg2bzg().get(g1).ok_or_else(|| {
        Error::invalid(format!(
            "grid point {} out of range ({} grid points)",
            g1,
            grid.num_grid_points()
        ))
    })?;
    let bz_g2 = grid.grg2bzg()[g2];
    let candidates1 = grid.equivalents(bz_g1)?;
    let candidates2 = grid.equivalents(bz_g2)?;

    let mut best = [g0, bz_g1, bz_g2];
    let mut min_d2: Option<f64> = None;
    for &bz1 in &candidates1 {
        for &bz2 in &candidates2 {
            let sum = address0 + addresses[bz1] + addresses[bz2];
            if sum == Vector3::zeros() {
                return Ok([g0, bz1, bz2]);
            }
            let d2 = (lqd_inv * sum.map(|x| x as f64)).norm_squared();
            if min_d2.map_or(true, |m| d2 < m - tolerance) {
                min_d2 = Some(d2);
                best = [g0, bz1, bz2];
            }
        }
    }
    Ok(best)
}
