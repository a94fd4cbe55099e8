// Relocation of generalized-regular-grid addresses into the first Brillouin zone
//
// Every canonical address a is compared with its lattice translations a + n∘D, n ∈ {-2..2}^3.
// Translations whose reciprocal-Cartesian length ties with the shortest one (within a
// tolerance) all belong to the zone: interior points have exactly one, points on faces,
// edges and corners of the zone have several.

// ======================== IMPORTS ========================
use log::debug;
use nalgebra::{Matrix3, Vector3};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{BZ_REDUCTION_TOLERANCE_FACTOR, BZ_SEARCH_RANGE};
use crate::interfaces::GridLayout;

// ======================== FOLDED GRID ========================

/// Addresses in the first Brillouin zone together with their index tables.
///
/// Layouts of `gp_map` (length `prod(D) + 1`):
/// - [`GridLayout::Sparse`]: `addresses[..prod(D)]` holds one address per canonical grid
///   point; the surface duplicates of canonical point `g` are
///   `addresses[prod(D) + gp_map[g] .. prod(D) + gp_map[g + 1]]`.
/// - [`GridLayout::Dense`]: all equivalents of `g` are `addresses[gp_map[g] .. gp_map[g + 1]]`,
///   the shortest one first.
#[derive(Debug, Clone)]
pub struct BzFolding {
    pub addresses: Vec<Vector3<i64>>,
    pub gp_map: Vec<usize>,
    pub bzg2grg: Vec<usize>,
}

/// Lattice translations searched for each point, origin first.
pub fn bz_search_space() -> Vec<Vector3<i64>> {
    let order: Vec<i64> = (0..=BZ_SEARCH_RANGE)
        .chain(-BZ_SEARCH_RANGE..0)
        .collect();
    let mut space = Vec::with_capacity(order.len().pow(3));
    for &x in &order {
        for &y in &order {
            for &z in &order {
                space.push(Vector3::new(x, y, z));
            }
        }
    }
    space
}

/// Tolerance on squared lengths: a fraction of the longest squared microzone edge.
pub fn bz_reduction_tolerance(
    rec_lattice: &Matrix3<f64>,
    q: &Matrix3<i64>,
    d_diag: &Vector3<i64>,
) -> f64 {
    let lq = rec_lattice * q.map(|x| x as f64);
    let longest = (0..3)
        .map(|i| lq.column(i).norm_squared() / (d_diag[i] * d_diag[i]) as f64)
        .fold(0.0_f64, f64::max);
    longest * BZ_REDUCTION_TOLERANCE_FACTOR
}

/// Squared reciprocal-Cartesian length of a (possibly shifted) grid address.
pub fn squared_distance(
    address: &Vector3<i64>,
    lq: &Matrix3<f64>,
    d_diag: &Vector3<i64>,
    ps: &Vector3<i64>,
) -> f64 {
    let fractional = Vector3::from_fn(|k, _| {
        (address[k] * 2 + ps[k]) as f64 / (2 * d_diag[k]) as f64
    });
    (lq * fractional).norm_squared()
}

/// Fold canonical grid addresses into the first Brillouin zone.
pub fn relocate_bz_grid_addresses(
    gr_addresses: &[Vector3<i64>],
    d_diag: &Vector3<i64>,
    q: &Matrix3<i64>,
    ps: &Vector3<i64>,
    rec_lattice: &Matrix3<f64>,
    layout: GridLayout,
) -> BzFolding {
    let lq = rec_lattice * q.map(|x| x as f64);
    let tolerance = bz_reduction_tolerance(rec_lattice, q, d_diag);
    let search_space = bz_search_space();

    let shortest = |address: &Vector3<i64>| -> Vec<Vector3<i64>> {
        equivalent_addresses_in_bz(address, d_diag, &lq, ps, &search_space, tolerance)
    };

    #[cfg(feature = "parallel")]
    let candidates: Vec<Vec<Vector3<i64>>> = gr_addresses.par_iter().map(shortest).collect();
    #[cfg(not(feature = "parallel"))]
    let candidates: Vec<Vec<Vector3<i64>>> = gr_addresses.iter().map(shortest).collect();

    let num_gp = gr_addresses.len();
    let total: usize = candidates.iter().map(Vec::len).sum();
    let mut addresses = Vec::with_capacity(total);
    let mut bzg2grg = Vec::with_capacity(total);
    let mut gp_map = Vec::with_capacity(num_gp + 1);

    match layout {
        GridLayout::Sparse => {
            let mut surface = Vec::with_capacity(total - num_gp);
            let mut surface_owner = Vec::with_capacity(total - num_gp);
            for (gp, equivalents) in candidates.iter().enumerate() {
                gp_map.push(surface.len());
                addresses.push(equivalents[0]);
                bzg2grg.push(gp);
                for adrs in &equivalents[1..] {
                    surface.push(*adrs);
                    surface_owner.push(gp);
                }
            }
            gp_map.push(surface.len());
            addresses.extend(surface);
            bzg2grg.extend(surface_owner);
        }
        GridLayout::Dense => {
            for (gp, equivalents) in candidates.iter().enumerate() {
                gp_map.push(addresses.len());
                for adrs in equivalents {
                    addresses.push(*adrs);
                    bzg2grg.push(gp);
                }
            }
            gp_map.push(addresses.len());
        }
    }

    debug!(
        "BZ folding ({:?}): {} grid points, {} on the zone surface in addition",
        layout,
        num_gp,
        total - num_gp
    );

    BzFolding {
        addresses,
        gp_map,
        bzg2grg,
    }
}

// Shortest translation first, then the other ties in search order.
fn equivalent_addresses_in_bz(
    address: &Vector3<i64>,
    d_diag: &Vector3<i64>,
    lq: &Matrix3<f64>,
    ps: &Vector3<i64>,
    search_space: &[Vector3<i64>],
    tolerance: f64,
) -> Vec<Vector3<i64>> {
    let translated: Vec<Vector3<i64>> = search_space
        .iter()
        .map(|n| address + n.component_mul(d_diag))
        .collect();
    let distances: Vec<f64> = translated
        .iter()
        .map(|adrs| squared_distance(adrs, lq, d_diag, ps))
        .collect();

    let mut min_index = 0;
    for (j, &d) in distances.iter().enumerate().skip(1) {
        if d < distances[min_index] {
            min_index = j;
        }
    }
    let min_distance = distances[min_index];

    let mut equivalents = vec![translated[min_index]];
    for (j, &d) in distances.iter().enumerate() {
        if j != min_index && d < min_distance + tolerance {
            equivalents.push(translated[j]);
        }
    }
    equivalents
}
