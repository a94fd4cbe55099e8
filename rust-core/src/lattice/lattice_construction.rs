use nalgebra::Matrix3;

use crate::error::Result;
use crate::interfaces::Space;
use crate::lattice::base_matrix::BaseMatrix;

/// Standard constructors for primitive direct bases (columns are the basis vectors)

/// Create a simple cubic basis with lattice parameter a
pub fn simple_cubic_lattice(a: f64) -> Result<BaseMatrix> {
    let direct = Matrix3::new(a, 0.0, 0.0, 0.0, a, 0.0, 0.0, 0.0, a);
    BaseMatrix::from_matrix(direct, Space::Real)
}

/// Create the primitive basis of a face-centered cubic lattice with conventional parameter a
pub fn face_centered_cubic_lattice(a: f64) -> Result<BaseMatrix> {
    let h = a / 2.0;
    let direct = Matrix3::new(0.0, h, h, h, 0.0, h, h, h, 0.0);
    BaseMatrix::from_matrix(direct, Space::Real)
}

/// Create the primitive basis of a body-centered cubic lattice with conventional parameter a
pub fn body_centered_cubic_lattice(a: f64) -> Result<BaseMatrix> {
    let h = a / 2.0;
    let direct = Matrix3::new(-h, h, h, h, -h, h, h, h, -h);
    BaseMatrix::from_matrix(direct, Space::Real)
}

/// Create a hexagonal basis with in-plane parameter a and height c (γ = 120°)
pub fn hexagonal_lattice(a: f64, c: f64) -> Result<BaseMatrix> {
    let direct = Matrix3::new(
        a,
        -a / 2.0,
        0.0,
        0.0,
        a * 3.0_f64.sqrt() / 2.0,
        0.0,
        0.0,
        0.0,
        c,
    );
    BaseMatrix::from_matrix(direct, Space::Real)
}

/// Create a tetragonal basis
pub fn tetragonal_lattice(a: f64, c: f64) -> Result<BaseMatrix> {
    let direct = Matrix3::new(a, 0.0, 0.0, 0.0, a, 0.0, 0.0, 0.0, c);
    BaseMatrix::from_matrix(direct, Space::Real)
}

/// Create an orthorhombic basis
pub fn orthorhombic_lattice(a: f64, b: f64, c: f64) -> Result<BaseMatrix> {
    let direct = Matrix3::new(a, 0.0, 0.0, 0.0, b, 0.0, 0.0, 0.0, c);
    BaseMatrix::from_matrix(direct, Space::Real)
}
