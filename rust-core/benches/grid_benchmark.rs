use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::{DMatrix, Matrix3, Vector3};
use num_complex::Complex64;
use phonon_grid::grid::{BzGrid, GridOptions};
use phonon_grid::interfaces::{GridLayout, MeshSpec};
use phonon_grid::lattice::{
    face_centered_cubic_lattice, hexagonal_lattice, simple_cubic_lattice, Centering, LatticeSystem,
};
use phonon_grid::phonon3::{
    triplets_at_q, Fc3, Interaction, InteractionConfig, MinimalImages, PhononAtQ, PhononCache, PhononSolver,
    PrimitiveCorrespondence, TripletOptions,
};
use phonon_grid::symmetries::SymmetryDataset;
use std::hint::black_box;

/// Grid construction, BZ folding and symmetry reduction for growing meshes.
/// Run with `--no-default-features` to compare against the serial code paths.
fn bench_grid_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("bz_grid");

    let fcc = face_centered_cubic_lattice(5.43).unwrap();
    let fcc_dataset = SymmetryDataset::from_lattice(&fcc, Centering::FaceCentered, LatticeSystem::Cubic);

    for n in [8, 16, 24] {
        for layout in [GridLayout::Sparse, GridLayout::Dense] {
            let options = GridOptions {
                layout,
                ..GridOptions::default()
            };
            let id = format!("fcc_{:?}", layout).to_lowercase();
            group.bench_with_input(BenchmarkId::new(id, n), &n, |b, &n| {
                b.iter(|| {
                    BzGrid::new(
                        MeshSpec::Numbers([n, n, n]),
                        black_box(&fcc),
                        Some(&fcc_dataset),
                        &options,
                    )
                    .unwrap()
                })
            });
        }
    }

    let hex = hexagonal_lattice(3.11, 4.98).unwrap();
    let hex_dataset = SymmetryDataset::from_lattice(&hex, Centering::Primitive, LatticeSystem::Hexagonal);
    group.bench_function("hexagonal_length_40", |b| {
        b.iter(|| {
            BzGrid::new(
                MeshSpec::Length(40.0),
                black_box(&hex),
                Some(&hex_dataset),
                &GridOptions::default(),
            )
            .unwrap()
        })
    });

    let grid = BzGrid::new(
        MeshSpec::Numbers([16, 16, 16]),
        &fcc,
        Some(&fcc_dataset),
        &GridOptions::default(),
    )
    .unwrap();
    group.bench_function("irreducible_fcc_16", |b| {
        b.iter(|| black_box(&grid).irreducible_grid_points().unwrap())
    });

    group.finish();
}

fn bench_triplets(c: &mut Criterion) {
    let mut group = c.benchmark_group("triplets");

    let fcc = face_centered_cubic_lattice(5.43).unwrap();
    let dataset = SymmetryDataset::from_lattice(&fcc, Centering::FaceCentered, LatticeSystem::Cubic);
    let grid = BzGrid::new(
        MeshSpec::Numbers([16, 16, 16]),
        &fcc,
        Some(&dataset),
        &GridOptions::default(),
    )
    .unwrap();
    let g0 = grid.index_from_address(&Vector3::new(1, 2, 3));

    group.bench_function("fcc_16_symmetric", |b| {
        b.iter(|| triplets_at_q(black_box(g0), &grid, &TripletOptions::default()).unwrap())
    });
    group.bench_function("fcc_16_gamma", |b| {
        b.iter(|| triplets_at_q(black_box(0), &grid, &TripletOptions::default()).unwrap())
    });

    group.finish();
}

/// Dispersion-free bands with identity eigenvectors.
struct FlatSolver;

impl PhononSolver for FlatSolver {
    fn num_band(&self) -> usize {
        3
    }

    fn solve(&self, qpoint: &Vector3<f64>, _q_direction: Option<&Vector3<f64>>) -> phonon_grid::Result<PhononAtQ> {
        let q2 = qpoint.norm_squared();
        Ok(PhononAtQ {
            frequencies: vec![1.0 + q2, 2.0 + q2, 3.0 + q2],
            eigenvectors: DMatrix::<Complex64>::identity(3, 3),
        })
    }
}

fn bench_interaction(c: &mut Criterion) {
    let mut group = c.benchmark_group("interaction");

    let direct = simple_cubic_lattice(4.0).unwrap();
    let dataset = SymmetryDataset::from_lattice(&direct, Centering::Primitive, LatticeSystem::Cubic);
    let grid = BzGrid::new(
        MeshSpec::Numbers([8, 8, 8]),
        &direct,
        Some(&dataset),
        &GridOptions::default(),
    )
    .unwrap();

    // One atom in a 3x3x3 supercell
    let positions: Vec<Vector3<f64>> = (0..27)
        .map(|l| Vector3::new((l % 3) as f64, ((l / 3) % 3) as f64, (l / 9) as f64) / 3.0)
        .collect();
    let images = MinimalImages::from_supercell(&direct, &Matrix3::from_diagonal_element(3), &positions, &[0], 1e-5)
        .unwrap();
    let primitive = PrimitiveCorrespondence::new(vec![0], vec![0; 27], vec![28.0855]).unwrap();
    let data: Vec<f64> = (0..27usize.pow(3) * 27).map(|i| ((i % 97) as f64 * 0.13).sin()).collect();
    let fc3 = Fc3::new(27, data).unwrap();

    let mut phonons = PhononCache::new(&grid, 3, 1e-4);
    phonons.ensure_all(&FlatSolver, &grid).unwrap();
    let g0 = grid.index_from_address(&Vector3::new(1, 2, 3));
    let triplets = triplets_at_q(g0, &grid, &TripletOptions::default()).unwrap();

    for symmetrize_fc3q in [false, true] {
        let config = InteractionConfig {
            cutoff_frequency: 1e-4,
            symmetrize_fc3q,
            ..InteractionConfig::default()
        };
        let interaction = Interaction::new(&grid, &fc3, &images, &primitive, config).unwrap();
        let id = if symmetrize_fc3q { "sc_8_symmetrized" } else { "sc_8" };
        group.bench_function(id, |b| {
            b.iter(|| interaction.run(black_box(&triplets), &phonons, None).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grid_construction, bench_triplets, bench_interaction);
criterion_main!(benches);
