// Constants

// Tolerances
pub const BASE_VECTOR_TOLERANCE: f64 = 1e-10; // For construction of base matrices
pub const METRIC_TOLERANCE: f64 = 1e-5; // Relative, for metric-preserving rotations
pub const NAC_DIRECTION_TOLERANCE: f64 = 1e-5; // Invariance of the non-analytic direction
pub const BZ_REDUCTION_TOLERANCE_FACTOR: f64 = 0.01; // Times the largest squared microzone edge
pub const CENTRING_INVERSE_TOLERANCE: f64 = 1e-5; // Inverse primitive matrices must be integer

// Iteration limits
pub const SNF_MAX_ITERATIONS: usize = 100; // Per pivot position
pub const BZ_SEARCH_RANGE: i64 = 2; // Lattice translations -2..=2 along each axis

// Physical constants (phonopy unit conventions)
pub const EV: f64 = 1.60217733e-19; // [J]
pub const ANGSTROM: f64 = 1.0e-10; // [m]
pub const THZ: f64 = 1.0e12; // [/s]
pub const AMU: f64 = 1.6605402e-27; // [kg]
pub const HBAR: f64 = 6.58211899e-16; // [eV s]

/// Unit conversion of |V|^2 / (f0 f1 f2) to eV^2 for a grid of `num_grid` points.
pub fn default_unit_conversion(num_grid: usize) -> f64 {
    (HBAR * EV).powi(3) / 36.0 / 8.0 * EV.powi(2) / ANGSTROM.powi(6)
        / (2.0 * std::f64::consts::PI * THZ).powi(3)
        / AMU.powi(3)
        / num_grid as f64
        / EV.powi(2)
}
