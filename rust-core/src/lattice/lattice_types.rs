use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use crate::config::CENTRING_INVERSE_TOLERANCE;
use crate::error::{Error, Result};

/// Centerings of conventional cells, named after the first letter of the
/// international space-group symbol.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Centering {
    Primitive,
    BodyCentered,
    FaceCentered,
    BaseCenteredA,
    BaseCenteredC,
    Rhombohedral,
}

impl Centering {
    /// Parse the centring letter of an international symbol, e.g. `'F'` for `Fd-3m`.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'P' => Some(Centering::Primitive),
            'I' => Some(Centering::BodyCentered),
            'F' => Some(Centering::FaceCentered),
            'A' => Some(Centering::BaseCenteredA),
            'C' => Some(Centering::BaseCenteredC),
            'R' => Some(Centering::Rhombohedral),
            _ => None,
        }
    }

    /// Transformation from the conventional to the primitive cell (columns in conventional
    /// fractional coordinates).
    pub fn primitive_matrix(&self) -> Matrix3<f64> {
        let h = 0.5;
        let t = 1.0 / 3.0;
        match self {
            Centering::Primitive => Matrix3::identity(),
            Centering::FaceCentered => Matrix3::new(
                0.0, h, h,
                h, 0.0, h,
                h, h, 0.0,
            ),
            Centering::BodyCentered => Matrix3::new(
                -h, h, h,
                h, -h, h,
                h, h, -h,
            ),
            Centering::BaseCenteredA => Matrix3::new(
                1.0, 0.0, 0.0,
                0.0, h, -h,
                0.0, h, h,
            ),
            Centering::BaseCenteredC => Matrix3::new(
                h, h, 0.0,
                -h, h, 0.0,
                0.0, 0.0, 1.0,
            ),
            Centering::Rhombohedral => Matrix3::new(
                2.0 * t, -t, -t,
                t, t, -2.0 * t,
                t, t, t,
            ),
        }
    }

    /// Integer inverse of [`Centering::primitive_matrix`].
    pub fn inverse_primitive_matrix(&self) -> Result<Matrix3<i64>> {
        let inverse = self.primitive_matrix().try_inverse().ok_or_else(|| {
            Error::invalid(format!("primitive matrix of {:?} is singular", self))
        })?;
        let rounded = inverse.map(|x| x.round());
        if (inverse - rounded).abs().max() > CENTRING_INVERSE_TOLERANCE {
            return Err(Error::invalid(format!(
                "inverse primitive matrix of {:?} is not integer",
                self
            )));
        }
        Ok(rounded.map(|x| x as i64))
    }
}

/// Lattice systems; they decide which conventional mesh numbers must coincide.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LatticeSystem {
    Triclinic,
    Monoclinic,
    Orthorhombic,
    Tetragonal,
    Rhombohedral,
    Hexagonal,
    Cubic,
}
