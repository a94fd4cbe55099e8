#[cfg(test)]
mod _tests_bz_grid {
    use super::super::bz_grid::{BzGrid, GridOptions};
    use super::super::grid_address::{grid_index_from_address, reduce_address};
    use crate::error::Error;
    use crate::interfaces::{GridLayout, MeshSpec};
    use crate::lattice::{
        face_centered_cubic_lattice, hexagonal_lattice, simple_cubic_lattice, Centering,
        LatticeSystem,
    };
    use crate::symmetries::SymmetryDataset;
    use approx::assert_abs_diff_eq;
    use nalgebra::{Matrix3, Vector3};

    const SI_A: f64 = 5.43;

    fn options(layout: GridLayout) -> GridOptions {
        GridOptions {
            layout,
            ..GridOptions::default()
        }
    }

    fn si_grid(layout: GridLayout) -> BzGrid {
        let direct = face_centered_cubic_lattice(SI_A).unwrap();
        BzGrid::new(MeshSpec::Numbers([4, 4, 4]), &direct, None, &options(layout)).unwrap()
    }

    fn fcc_dataset() -> SymmetryDataset {
        let direct = face_centered_cubic_lattice(SI_A).unwrap();
        SymmetryDataset::from_lattice(&direct, Centering::FaceCentered, LatticeSystem::Cubic)
    }

    #[test]
    fn test_dense_gp_map_of_fcc_mesh() {
        let grid = si_grid(GridLayout::Dense);
        let reference: Vec<usize> = vec![
            0, 1, 2, 4, 5, 6, 7, 8, 9, 11, 12, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25,
            26, 27, 28, 29, 30, 34, 35, 36, 40, 41, 43, 44, 46, 47, 48, 49, 50, 54, 56, 57, 59,
            60, 61, 65, 66, 67, 68, 69, 70, 71, 72, 73, 77, 78, 79, 83, 84, 85, 86, 87, 88, 89,
        ];
        assert_eq!(grid.gp_map(), reference.as_slice());
        assert_eq!(grid.num_bz_points(), 89);
    }

    #[test]
    fn test_sparse_and_dense_layouts_agree() {
        let sparse = si_grid(GridLayout::Sparse);
        let dense = si_grid(GridLayout::Dense);
        let d = sparse.d_diag();

        assert_eq!(sparse.num_bz_points(), dense.num_bz_points());
        assert_eq!(sparse.gp_map().len(), 65);
        assert_eq!(dense.gp_map().len(), 65);

        for gp in 0..sparse.num_grid_points() {
            let a = sparse.addresses()[gp];
            let b = dense.addresses()[dense.gp_map()[gp]];
            assert_eq!(reduce_address(&(a - b), d), Vector3::zeros());
            assert_abs_diff_eq!(
                sparse.squared_norm(gp).sqrt(),
                dense.squared_norm(dense.gp_map()[gp]).sqrt(),
                epsilon = 1e-8
            );
        }
    }

    #[test]
    fn test_bzg2grg_matches_addresses() {
        for layout in [GridLayout::Sparse, GridLayout::Dense] {
            let grid = si_grid(layout);
            for (bz_gp, address) in grid.addresses().iter().enumerate() {
                assert_eq!(grid.bzg2grg()[bz_gp], grid_index_from_address(address, grid.d_diag()));
            }
            for gp in 0..grid.num_grid_points() {
                assert_eq!(grid.bzg2grg()[grid.grg2bzg()[gp]], gp);
            }
        }
    }

    #[test]
    fn test_equivalents_share_norm_and_canonical_point() {
        for layout in [GridLayout::Sparse, GridLayout::Dense] {
            let grid = si_grid(layout);
            let mut total = 0;
            for gp in 0..grid.num_grid_points() {
                let bz_gp = grid.grg2bzg()[gp];
                let equivalents = grid.equivalents(bz_gp).unwrap();
                assert_eq!(equivalents[0], bz_gp);
                total += equivalents.len();
                for &e in &equivalents {
                    assert_eq!(grid.bzg2grg()[e], gp);
                    assert_abs_diff_eq!(
                        grid.squared_norm(e),
                        grid.squared_norm(bz_gp),
                        epsilon = 1e-8
                    );
                }
            }
            assert_eq!(total, grid.num_bz_points());
            assert!(grid.equivalents(grid.num_bz_points()).is_err());
        }
    }

    #[test]
    fn test_index_from_address() {
        let grid = si_grid(GridLayout::Dense);
        for gp in 0..grid.num_grid_points() {
            let bz_gp = grid.grg2bzg()[gp];
            let address = grid.addresses()[bz_gp];
            assert_eq!(grid.index_from_address(&address), bz_gp);
            assert_eq!(grid.index_from_address(&(address + Vector3::new(4, -8, 12))), bz_gp);
        }
    }

    #[test]
    fn test_qpoint_of_regular_grid() {
        let direct = simple_cubic_lattice(4.0).unwrap();
        let grid = BzGrid::new(MeshSpec::Numbers([4, 4, 4]), &direct, None, &GridOptions::default())
            .unwrap();
        let bz_gp = grid.index_from_address(&Vector3::new(1, 0, 0));
        assert_abs_diff_eq!(grid.qpoint(bz_gp), Vector3::new(0.25, 0.0, 0.0), epsilon = 1e-12);

        let shifted = BzGrid::new(
            MeshSpec::Numbers([4, 4, 4]),
            &direct,
            None,
            &GridOptions {
                is_shift: [true, true, true],
                ..GridOptions::default()
            },
        )
        .unwrap();
        assert_eq!(*shifted.ps(), Vector3::new(1, 1, 1));
        assert_abs_diff_eq!(
            shifted.qpoint(0),
            Vector3::new(0.125, 0.125, 0.125),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rotations_map_bz_addresses_onto_bz() {
        let direct = face_centered_cubic_lattice(SI_A).unwrap();
        let dataset = fcc_dataset();
        assert_eq!(dataset.reciprocal_rotations.len(), 48);
        for layout in [GridLayout::Sparse, GridLayout::Dense] {
            let grid =
                BzGrid::new(MeshSpec::Numbers([4, 4, 4]), &direct, Some(&dataset), &options(layout))
                    .unwrap();
            assert_eq!(grid.rotations().len(), 48);
            for address in grid.addresses() {
                for r in grid.rotations() {
                    let rotated = r * address;
                    let gp = grid_index_from_address(&rotated, grid.d_diag());
                    let images: Vec<Vector3<i64>> = grid
                        .equivalents(grid.grg2bzg()[gp])
                        .unwrap()
                        .iter()
                        .map(|&e| grid.addresses()[e])
                        .collect();
                    assert!(images.contains(&rotated), "{:?} not in BZ", rotated);
                }
            }
        }
    }

    #[test]
    fn test_fcc_generalized_regular_grid_from_length() {
        let direct = face_centered_cubic_lattice(SI_A).unwrap();
        let dataset = fcc_dataset();
        for layout in [GridLayout::Sparse, GridLayout::Dense] {
            let grid = BzGrid::new(MeshSpec::Length(10.0), &direct, Some(&dataset), &options(layout))
                .unwrap();
            let a = grid.grid_matrix().copied().unwrap();
            assert_eq!(a, Matrix3::new(-2, 2, 2, 2, -2, 2, 2, 2, -2));
            assert_eq!(grid.p() * a * grid.q(), Matrix3::from_diagonal(grid.d_diag()));
            assert_eq!(*grid.d_diag(), Vector3::new(2, 4, 4));
            assert_eq!(grid.num_grid_points(), 32);
            assert_eq!(grid.rotations().len(), 48);
        }
    }

    #[test]
    fn test_hexagonal_golden_grid() {
        let direct = hexagonal_lattice(3.11, 4.98).unwrap();
        let dataset =
            SymmetryDataset::from_lattice(&direct, Centering::Primitive, LatticeSystem::Hexagonal);
        let a = Matrix3::new(8, 0, 0, 0, 8, 0, 0, 0, 6);
        let grid =
            BzGrid::from_generating_matrix(&a, &direct, Some(&dataset), &GridOptions::default())
                .unwrap();
        assert_eq!(*grid.d_diag(), Vector3::new(2, 8, 24));
        assert_eq!(grid.rotations().len(), 24);

        // The microzone is spanned by the columns of L A^-1
        let plat = grid.reciprocal_lattice();
        let a_inv = Matrix3::from_diagonal(&Vector3::new(1.0 / 8.0, 1.0 / 8.0, 1.0 / 6.0));
        assert_abs_diff_eq!(*grid.microzone_lattice(), plat * a_inv, epsilon = 1e-10);

        // Relative tetrahedron vertices m sit at A^-1 m, which is the q-point of the address
        // P m up to a reciprocal lattice vector
        let relative = [
            Vector3::new(0, 0, 0),
            Vector3::new(1, 0, 0),
            Vector3::new(0, 1, 0),
            Vector3::new(0, 0, 1),
            Vector3::new(1, 1, 1),
            Vector3::new(-1, 2, -3),
        ];
        for m in &relative {
            let q = grid.qpoint(grid.index_from_address(&(grid.p() * m)));
            let diff = a_inv * m.map(|x| x as f64) - q;
            assert_abs_diff_eq!(diff, diff.map(f64::round), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_hexagonal_grid_from_length() {
        let direct = hexagonal_lattice(3.11, 4.98).unwrap();
        let dataset =
            SymmetryDataset::from_lattice(&direct, Centering::Primitive, LatticeSystem::Hexagonal);
        let grid = BzGrid::new(MeshSpec::Length(25.0), &direct, Some(&dataset), &GridOptions::default())
            .unwrap();
        // 25 |b1| = 9.28 and 25 |b3| = 5.02 round to a 9 x 9 x 5 conventional mesh
        assert_eq!(grid.grid_matrix().copied(), Some(Matrix3::new(9, 0, 0, 0, 9, 0, 0, 0, 5)));
        assert_eq!(*grid.d_diag(), Vector3::new(1, 9, 45));
        assert_eq!(grid.num_grid_points(), 405);
        assert_eq!(grid.rotations().len(), 24);
    }

    #[test]
    fn test_incompatible_mesh_breaks_symmetry() {
        let direct = hexagonal_lattice(3.11, 4.98).unwrap();
        let dataset =
            SymmetryDataset::from_lattice(&direct, Centering::Primitive, LatticeSystem::Hexagonal);
        let result = BzGrid::new(
            MeshSpec::Numbers([4, 5, 3]),
            &direct,
            Some(&dataset),
            &GridOptions::default(),
        );
        assert!(matches!(result, Err(Error::SymmetryBroken { mesh: [4, 5, 3], .. })));
    }

    #[test]
    fn test_irreducible_points_of_grids() {
        let sc = simple_cubic_lattice(4.0).unwrap();
        let sc_dataset =
            SymmetryDataset::from_lattice(&sc, Centering::Primitive, LatticeSystem::Cubic);
        let grid =
            BzGrid::new(MeshSpec::Numbers([4, 4, 4]), &sc, Some(&sc_dataset), &GridOptions::default())
                .unwrap();
        let ir = grid.irreducible_grid_points().unwrap();
        assert_eq!(ir.num_ir_grid_points(), 10);
        assert_eq!(ir.ir_weights().iter().sum::<usize>(), 64);

        let shifted = BzGrid::new(
            MeshSpec::Numbers([4, 4, 4]),
            &sc,
            Some(&sc_dataset),
            &GridOptions {
                is_shift: [true, true, true],
                ..GridOptions::default()
            },
        )
        .unwrap();
        let ir = shifted.irreducible_grid_points().unwrap();
        assert_eq!(ir.num_ir_grid_points(), 4);
        assert_eq!(ir.ir_weights().iter().sum::<usize>(), 64);

        let fcc = face_centered_cubic_lattice(SI_A).unwrap();
        let grid = BzGrid::new(
            MeshSpec::Numbers([4, 4, 4]),
            &fcc,
            Some(&fcc_dataset()),
            &GridOptions::default(),
        )
        .unwrap();
        let ir = grid.irreducible_grid_points().unwrap();
        assert_eq!(ir.num_ir_grid_points(), 8);
        assert_eq!(ir.ir_weights().iter().sum::<usize>(), 64);
    }
}
