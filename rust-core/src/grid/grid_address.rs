// Addresses and indices of generalized regular grids
//
// The first address component runs fastest: idx = a0 + a1 * D0 + a2 * D0 * D1, with every
// component reduced modulo D first so that addresses outside [0, D) are accepted.

use nalgebra::Vector3;

/// All `prod(D)` addresses of the grid, first component fastest.
pub fn gr_grid_addresses(d_diag: &Vector3<i64>) -> Vec<Vector3<i64>> {
    let mut addresses = Vec::with_capacity(d_diag.iter().product::<i64>() as usize);
    for k in 0..d_diag[2] {
        for j in 0..d_diag[1] {
            for i in 0..d_diag[0] {
                addresses.push(Vector3::new(i, j, k));
            }
        }
    }
    addresses
}

/// Canonical grid index of an address.
pub fn grid_index_from_address(address: &Vector3<i64>, d_diag: &Vector3<i64>) -> usize {
    let reduced = reduce_address(address, d_diag);
    (reduced[0] + reduced[1] * d_diag[0] + reduced[2] * d_diag[0] * d_diag[1]) as usize
}

/// Address in `[0, D)` of a canonical grid index.
pub fn grid_address_from_index(index: usize, d_diag: &Vector3<i64>) -> Vector3<i64> {
    let index = index as i64;
    let nn = d_diag[0] * d_diag[1];
    Vector3::new(
        index % d_diag[0],
        (index % nn) / d_diag[0],
        index / nn,
    )
}

/// Component-wise Euclidean remainder modulo D.
pub fn reduce_address(address: &Vector3<i64>, d_diag: &Vector3<i64>) -> Vector3<i64> {
    Vector3::new(
        address[0].rem_euclid(d_diag[0]),
        address[1].rem_euclid(d_diag[1]),
        address[2].rem_euclid(d_diag[2]),
    )
}

/// Doubled address `2 a + PS` of a shifted grid point.
pub fn double_grid_address(address: &Vector3<i64>, ps: &Vector3<i64>) -> Vector3<i64> {
    address.map(|x| 2 * x) + ps
}

/// Canonical index of a doubled address, or `None` if its parity does not match the shift.
pub fn double_grid_index(
    address_double: &Vector3<i64>,
    d_diag: &Vector3<i64>,
    ps: &Vector3<i64>,
) -> Option<usize> {
    let unshifted = address_double - ps;
    if unshifted.iter().any(|x| x.rem_euclid(2) != 0) {
        return None;
    }
    Some(grid_index_from_address(&unshifted.map(|x| x / 2), d_diag))
}

/// `true` if the three addresses sum to zero modulo D.
pub fn is_momentum_conserved(addresses: &[Vector3<i64>; 3], d_diag: &Vector3<i64>) -> bool {
    let sum = addresses[0] + addresses[1] + addresses[2];
    reduce_address(&sum, d_diag) == Vector3::zeros()
}
