use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::config::BASE_VECTOR_TOLERANCE;
use crate::error::{Error, Result};
use crate::interfaces::Space;

/// Three basis vectors stored as the columns of a 3x3 matrix.
///
/// Reciprocal bases follow the crystallographic convention without the factor 2π, i.e. the
/// reciprocal of a direct basis `A` is `(A^-1)^T`, so that `A^T B = I`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseMatrix {
    base_matrix: Matrix3<f64>,
    inverse: Matrix3<f64>,
    space: Space,
}

impl BaseMatrix {
    pub fn from_base_vectors(
        base_1: Vector3<f64>,
        base_2: Vector3<f64>,
        base_3: Vector3<f64>,
        space: Space,
    ) -> Result<Self> {
        let base_matrix = Matrix3::from_columns(&[base_1, base_2, base_3]);

        // Linearly non-dependent
        if base_matrix.determinant().abs() < BASE_VECTOR_TOLERANCE {
            return Err(Error::invalid(
                "Determinant too small. Vectors are either too small or linearly dependent.",
            ));
        }

        let inverse = base_matrix.try_inverse().ok_or_else(|| {
            Error::invalid("Basis matrix is not invertible.")
        })?;

        Ok(BaseMatrix {
            base_matrix,
            inverse,
            space,
        })
    }

    pub fn from_matrix(matrix: Matrix3<f64>, space: Space) -> Result<Self> {
        Self::from_base_vectors(
            matrix.column(0).into(),
            matrix.column(1).into(),
            matrix.column(2).into(),
            space,
        )
    }

    /// Convert to the other space. Applying it twice returns the original basis.
    pub fn reciprocal(&self) -> BaseMatrix {
        BaseMatrix {
            base_matrix: self.inverse.transpose(),
            inverse: self.base_matrix.transpose(),
            space: match self.space {
                Space::Real => Space::Reciprocal,
                Space::Reciprocal => Space::Real,
            },
        }
    }

    pub fn base_matrix(&self) -> &Matrix3<f64> {
        &self.base_matrix
    }

    pub fn space(&self) -> Space {
        self.space
    }

    pub fn determinant(&self) -> f64 {
        self.base_matrix.determinant()
    }

    pub fn inverse(&self) -> &Matrix3<f64> {
        &self.inverse
    }

    pub fn metric(&self) -> Matrix3<f64> {
        self.base_matrix.transpose() * self.base_matrix
    }

    pub fn base_vectors(&self) -> [Vector3<f64>; 3] {
        [
            self.base_matrix.column(0).into(),
            self.base_matrix.column(1).into(),
            self.base_matrix.column(2).into(),
        ]
    }

    /// Cartesian coordinates of a point given in this basis.
    pub fn to_cartesian(&self, fractional: &Vector3<f64>) -> Vector3<f64> {
        self.base_matrix * fractional
    }

    pub fn to_fractional(&self, cartesian: &Vector3<f64>) -> Vector3<f64> {
        self.inverse * cartesian
    }
}

/// Mesh numbers for a real-space length: `max(1, round(length * |b_i|))` along each reciprocal
/// basis vector `b_i` of the direct basis.
pub fn length2mesh(length: f64, direct: &BaseMatrix) -> [i64; 3] {
    let reciprocal = match direct.space() {
        Space::Real => direct.reciprocal(),
        Space::Reciprocal => direct.clone(),
    };
    let mut mesh = [1_i64; 3];
    for (i, b) in reciprocal.base_vectors().iter().enumerate() {
        mesh[i] = ((b.norm() * length + 0.5).floor() as i64).max(1);
    }
    mesh
}
