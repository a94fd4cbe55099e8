#[cfg(test)]
mod _tests_lattice {
    use super::super::base_matrix::{length2mesh, BaseMatrix};
    use super::super::lattice_construction::*;
    use super::super::lattice_types::Centering;
    use crate::interfaces::Space;
    use approx::assert_abs_diff_eq;
    use nalgebra::{Matrix3, Vector3};

    const TOL: f64 = 1e-10;

    #[test]
    fn test_reciprocal_is_dual_basis() {
        let direct = hexagonal_lattice(3.11, 4.98).unwrap();
        let reciprocal = direct.reciprocal();

        assert_eq!(reciprocal.space(), Space::Reciprocal);
        let product = direct.base_matrix().transpose() * reciprocal.base_matrix();
        assert_abs_diff_eq!(product, Matrix3::identity(), epsilon = TOL);

        // Twice gives back the direct basis
        let back = reciprocal.reciprocal();
        assert_eq!(back.space(), Space::Real);
        assert_abs_diff_eq!(*back.base_matrix(), *direct.base_matrix(), epsilon = TOL);
    }

    #[test]
    fn test_linearly_dependent_vectors_rejected() {
        let result = BaseMatrix::from_base_vectors(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Space::Real,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_fractional_cartesian_roundtrip() {
        let direct = face_centered_cubic_lattice(5.43).unwrap();
        let frac = Vector3::new(0.25, -0.5, 0.75);
        let cart = direct.to_cartesian(&frac);
        assert_abs_diff_eq!(direct.to_fractional(&cart), frac, epsilon = TOL);
    }

    #[test]
    fn test_length2mesh_cubic() {
        // |b| = 1/4 for a = 4, so length 20 gives 5 along each axis
        let direct = simple_cubic_lattice(4.0).unwrap();
        assert_eq!(length2mesh(20.0, &direct), [5, 5, 5]);
        // Never below one
        assert_eq!(length2mesh(0.1, &direct), [1, 1, 1]);
    }

    #[test]
    fn test_length2mesh_orthorhombic() {
        let direct = orthorhombic_lattice(2.0, 4.0, 8.0).unwrap();
        assert_eq!(length2mesh(16.0, &direct), [8, 4, 2]);
        // A reciprocal basis is accepted as is
        assert_eq!(length2mesh(16.0, &direct.reciprocal()), [8, 4, 2]);
    }

    #[test]
    fn test_inverse_primitive_matrices_are_integer() {
        for centering in [
            Centering::Primitive,
            Centering::BodyCentered,
            Centering::FaceCentered,
            Centering::BaseCenteredA,
            Centering::BaseCenteredC,
            Centering::Rhombohedral,
        ] {
            let inverse = centering.inverse_primitive_matrix().unwrap();
            let product = centering.primitive_matrix() * inverse.map(|x| x as f64);
            assert_abs_diff_eq!(product, Matrix3::identity(), epsilon = 1e-12);
        }
        assert_eq!(
            Centering::FaceCentered.inverse_primitive_matrix().unwrap(),
            Matrix3::new(-1, 1, 1, 1, -1, 1, 1, 1, -1)
        );
    }

    #[test]
    fn test_centering_from_symbol() {
        assert_eq!(Centering::from_symbol('F'), Some(Centering::FaceCentered));
        assert_eq!(Centering::from_symbol('R'), Some(Centering::Rhombohedral));
        assert_eq!(Centering::from_symbol('X'), None);
    }
}
