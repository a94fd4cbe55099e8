#[cfg(test)]
mod _tests_symmetries {
    use super::super::irreducible::*;
    use super::super::symmetry_operations::*;
    use super::super::symmetry_point_groups::*;
    use crate::config::METRIC_TOLERANCE;
    use crate::error::Error;
    use crate::lattice::*;
    use nalgebra::{Matrix3, Vector3};

    fn c4z() -> Matrix3<i64> {
        Matrix3::new(0, -1, 0, 1, 0, 0, 0, 0, 1)
    }

    #[test]
    fn test_lattice_point_group_orders() {
        let cases = [
            (simple_cubic_lattice(4.0).unwrap(), 48),
            (face_centered_cubic_lattice(5.43).unwrap(), 48),
            (body_centered_cubic_lattice(3.3).unwrap(), 48),
            (hexagonal_lattice(3.11, 4.98).unwrap(), 24),
            (tetragonal_lattice(4.0, 6.0).unwrap(), 16),
            (orthorhombic_lattice(3.0, 4.0, 5.0).unwrap(), 8),
        ];
        for (direct, order) in &cases {
            let direct_group = lattice_point_group(direct, METRIC_TOLERANCE);
            let reciprocal_group = reciprocal_lattice_point_group(direct);
            assert_eq!(direct_group.len(), *order);
            assert_eq!(reciprocal_group.len(), *order);
            assert_eq!(reciprocal_group[0], Matrix3::identity());
        }
    }

    #[test]
    fn test_reciprocal_group_is_inverse_transpose_of_direct_group() {
        let direct = hexagonal_lattice(3.11, 4.98).unwrap();
        let direct_group = lattice_point_group(&direct, METRIC_TOLERANCE);
        let reciprocal_group = reciprocal_lattice_point_group(&direct);
        for w in &direct_group {
            let w_inv = crate::grid::snf::inverse_unimodular(w).unwrap();
            assert!(reciprocal_group.contains(&w_inv.transpose()));
        }
    }

    #[test]
    fn test_transform_rotations_regular_grid_is_identity_map() {
        let rotations = reciprocal_lattice_point_group(&simple_cubic_lattice(4.0).unwrap());
        let d = Vector3::new(6, 6, 6);
        let transformed = transform_rotations(&rotations, &d, &Matrix3::identity()).unwrap();
        assert_eq!(transformed, rotations);
    }

    #[test]
    fn test_transform_rotations_non_scalar_d() {
        // Q mixes the first two axes; C4z conjugated by it stays integer for D = (2, 2, 6)
        let q = Matrix3::new(1, 1, 0, 0, 1, 0, 0, 0, 1);
        let d = Vector3::new(2, 2, 6);
        let transformed = transform_rotations(&[Matrix3::identity(), c4z()], &d, &q).unwrap();
        assert_eq!(transformed[0], Matrix3::identity());
        assert!(maps_grid_onto_itself(&transformed[1], &d));
    }

    #[test]
    fn test_transform_rotations_rejects_incompatible_mesh() {
        let d = Vector3::new(4, 2, 2);
        let result = transform_rotations(&[c4z()], &d, &Matrix3::identity());
        assert!(matches!(result, Err(Error::SymmetryBroken { mesh: [4, 2, 2], .. })));
    }

    #[test]
    fn test_point_group_with_time_reversal() {
        let rotations = vec![Matrix3::identity(), c4z()];
        let with_tr = point_group_reciprocal(&rotations, true);
        assert_eq!(with_tr.len(), 4);
        assert_eq!(with_tr[0], Matrix3::identity());
        assert_eq!(with_tr[2], -Matrix3::<i64>::identity());
        assert_eq!(point_group_reciprocal(&rotations, false), rotations);

        // Centrosymmetric groups gain nothing
        let oh = reciprocal_lattice_point_group(&simple_cubic_lattice(4.0).unwrap());
        assert_eq!(point_group_reciprocal(&oh, true).len(), 48);
    }

    #[test]
    fn test_stabilizer_of_grid_points() {
        let oh = reciprocal_lattice_point_group(&simple_cubic_lattice(4.0).unwrap());
        let d = Vector3::new(4, 4, 4);
        assert_eq!(stabilizer(&oh, &Vector3::zeros(), &d).len(), 48);
        // (2, 2, 2) is equivalent to -(2, 2, 2) on a 4x4x4 grid
        assert_eq!(stabilizer(&oh, &Vector3::new(2, 2, 2), &d).len(), 48);
        // Little group of a point on the fourfold axis
        assert_eq!(stabilizer(&oh, &Vector3::new(0, 0, 1), &d).len(), 8);
    }

    #[test]
    fn test_rotations_keeping_direction() {
        let oh = reciprocal_lattice_point_group(&simple_cubic_lattice(4.0).unwrap());
        let kept = rotations_keeping_direction(&oh, &oh, &Vector3::new(0.0, 0.0, 2.0), 1e-5);
        assert_eq!(kept.len(), 8);
        let kept = rotations_keeping_direction(&oh, &oh, &Vector3::new(1.0, 1.0, 1.0), 1e-5);
        assert_eq!(kept.len(), 6);
        let kept = rotations_keeping_direction(&oh, &oh, &Vector3::zeros(), 1e-5);
        assert_eq!(kept.len(), 48);
    }

    #[test]
    fn test_mapping_table_to_weights() {
        let ir = IrreducibleGridPoints::from_mapping_table(vec![0, 1, 1, 0, 4, 1]);
        assert_eq!(ir.ir_grid_points(), &[0, 1, 4]);
        assert_eq!(ir.ir_weights(), &[2, 3, 1]);
        assert_eq!(ir.num_ir_grid_points(), 3);
    }

    #[test]
    fn test_ir_grid_map_time_reversal() {
        let d = Vector3::new(4, 1, 1);
        let ps = Vector3::zeros();
        let identity = [Matrix3::identity()];
        assert_eq!(ir_grid_map(&d, &identity, &ps, false).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(ir_grid_map(&d, &identity, &ps, true).unwrap(), vec![0, 1, 2, 1]);
    }

    #[test]
    fn test_ir_grid_map_rejects_non_group() {
        // Threefold permutation without its square
        let c3 = Matrix3::new(0, 0, 1, 1, 0, 0, 0, 1, 0);
        let d = Vector3::new(4, 4, 4);
        let result = ir_grid_map(&d, &[Matrix3::identity(), c3], &Vector3::zeros(), false);
        assert!(matches!(result, Err(Error::IrreducibleSearchFailed { .. })));
    }
}
