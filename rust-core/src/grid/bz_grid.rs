// Brillouin-zone grid: the immutable grid value shared by the symmetry and interaction code
//
// A grid point with address a (shift PS) sits at q = Q D^-1 (a + PS / 2) in the primitive
// reciprocal basis. The microzone lattice L Q D^-1 P spans the smallest parallelepiped of the
// grid in reciprocal Cartesian coordinates.

// ======================== IMPORTS ========================
use log::{debug, info};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::bz_folding::{relocate_bz_grid_addresses, squared_distance};
use crate::grid::generating_matrix::grid_generating_matrix;
use crate::grid::grid_address::{gr_grid_addresses, grid_index_from_address};
use crate::grid::snf::SnfDecomposition;
use crate::interfaces::{GridLayout, MeshSpec, Space};
use crate::lattice::{length2mesh, BaseMatrix};
use crate::symmetries::{irreducible_grid_points, transform_rotations, IrreducibleGridPoints, SymmetryDataset};

// ======================== OPTIONS ========================

/// Construction options of a [`BzGrid`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridOptions {
    /// Half-grid shift along each basis vector of the generating matrix.
    pub is_shift: [bool; 3],
    pub layout: GridLayout,
    /// Run the full Smith normal form even for a diagonal generating matrix.
    pub force_snf: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        GridOptions {
            is_shift: [false; 3],
            layout: GridLayout::Sparse,
            force_snf: true,
        }
    }
}

// ======================== GRID ========================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BzGrid {
    snf: SnfDecomposition,
    grid_matrix: Option<Matrix3<i64>>,
    reciprocal_lattice: Matrix3<f64>,
    qd_inv: Matrix3<f64>,
    microzone_lattice: Matrix3<f64>,
    addresses: Vec<Vector3<i64>>,
    gp_map: Vec<usize>,
    bzg2grg: Vec<usize>,
    grg2bzg: Vec<usize>,
    rotations: Vec<Matrix3<i64>>,
    reciprocal_rotations: Vec<Matrix3<i64>>,
    is_time_reversal: bool,
    ps: Vector3<i64>,
    layout: GridLayout,
}

impl BzGrid {
    /// Build a grid of a primitive direct basis.
    ///
    /// - `MeshSpec::Numbers`: regular grid with `D` = mesh, `P = Q = I`.
    /// - `MeshSpec::Length` without dataset: regular grid from [`length2mesh`].
    /// - `MeshSpec::Length` with dataset: generalized regular grid of the conventional cell.
    ///
    /// Without a dataset the only rotation is the identity and time reversal is allowed.
    pub fn new(
        mesh: MeshSpec,
        direct: &BaseMatrix,
        dataset: Option<&SymmetryDataset>,
        options: &GridOptions,
    ) -> Result<Self> {
        let direct = as_direct(direct);
        match (mesh, dataset) {
            (MeshSpec::Numbers(numbers), _) => {
                let snf = SnfDecomposition::from_mesh(numbers)?;
                Self::build(snf, None, &direct, dataset, options)
            }
            (MeshSpec::Length(length), None) => {
                let snf = SnfDecomposition::from_mesh(length2mesh(length, &direct))?;
                Self::build(snf, None, &direct, dataset, options)
            }
            (MeshSpec::Length(length), Some(dataset)) => {
                let grid_matrix = grid_generating_matrix(length, &direct, dataset)?;
                Self::from_generating_matrix(&grid_matrix, &direct, Some(dataset), options)
            }
        }
    }

    /// Build a grid from an explicit generating matrix in the primitive reciprocal basis.
    pub fn from_generating_matrix(
        grid_matrix: &Matrix3<i64>,
        direct: &BaseMatrix,
        dataset: Option<&SymmetryDataset>,
        options: &GridOptions,
    ) -> Result<Self> {
        let snf = SnfDecomposition::from_generating_matrix(grid_matrix, options.force_snf)?;
        Self::build(snf, Some(*grid_matrix), &as_direct(direct), dataset, options)
    }

    fn build(
        snf: SnfDecomposition,
        grid_matrix: Option<Matrix3<i64>>,
        direct: &BaseMatrix,
        dataset: Option<&SymmetryDataset>,
        options: &GridOptions,
    ) -> Result<Self> {
        let d_diag = *snf.d_diag();
        let p = *snf.p();
        let q = *snf.q();
        let reciprocal_lattice = *direct.reciprocal().base_matrix();

        let shift = Vector3::from_fn(|i, _| i64::from(options.is_shift[i]));
        let ps = p * shift;

        let folding = relocate_bz_grid_addresses(
            &gr_grid_addresses(&d_diag),
            &d_diag,
            &q,
            &ps,
            &reciprocal_lattice,
            options.layout,
        );
        let num_gp = snf.num_grid_points();
        let grg2bzg = match options.layout {
            GridLayout::Sparse => (0..num_gp).collect(),
            GridLayout::Dense => folding.gp_map[..num_gp].to_vec(),
        };

        let qd_inv = Matrix3::from_fn(|i, j| q[(i, j)] as f64 / d_diag[j] as f64);
        let microzone_lattice = reciprocal_lattice * qd_inv * p.map(|x| x as f64);

        let (reciprocal_rotations, is_time_reversal) = match dataset {
            Some(dataset) => (dataset.reciprocal_rotations.clone(), dataset.is_time_reversal),
            None => (vec![Matrix3::identity()], true),
        };
        let rotations = transform_rotations(&reciprocal_rotations, &d_diag, &q)?;

        info!(
            "Grid D = {:?}: {} grid points, {} BZ addresses ({:?}), {} rotations",
            d_diag.as_slice(),
            num_gp,
            folding.addresses.len(),
            options.layout,
            rotations.len()
        );
        debug!("Integer shift PS = {:?}", ps.as_slice());

        Ok(BzGrid {
            snf,
            grid_matrix,
            reciprocal_lattice,
            qd_inv,
            microzone_lattice,
            addresses: folding.addresses,
            gp_map: folding.gp_map,
            bzg2grg: folding.bzg2grg,
            grg2bzg,
            rotations,
            reciprocal_rotations,
            is_time_reversal,
            ps,
            layout: options.layout,
        })
    }

    // ======================== ACCESSORS ========================

    /// Mesh numbers of the grid in its own basis
    pub fn d_diag(&self) -> &Vector3<i64> {
        self.snf.d_diag()
    }

    pub fn p(&self) -> &Matrix3<i64> {
        self.snf.p()
    }

    pub fn q(&self) -> &Matrix3<i64> {
        self.snf.q()
    }

    pub fn snf(&self) -> &SnfDecomposition {
        &self.snf
    }

    /// Generating matrix, if the grid was built from one
    pub fn grid_matrix(&self) -> Option<&Matrix3<i64>> {
        self.grid_matrix.as_ref()
    }

    /// Reciprocal primitive basis (columns, no factor 2π)
    pub fn reciprocal_lattice(&self) -> &Matrix3<f64> {
        &self.reciprocal_lattice
    }

    pub fn qd_inv(&self) -> &Matrix3<f64> {
        &self.qd_inv
    }

    pub fn microzone_lattice(&self) -> &Matrix3<f64> {
        &self.microzone_lattice
    }

    /// BZ addresses, canonical points and surface duplicates
    pub fn addresses(&self) -> &[Vector3<i64>] {
        &self.addresses
    }

    pub fn gp_map(&self) -> &[usize] {
        &self.gp_map
    }

    pub fn bzg2grg(&self) -> &[usize] {
        &self.bzg2grg
    }

    pub fn grg2bzg(&self) -> &[usize] {
        &self.grg2bzg
    }

    /// Rotations in the grid basis
    pub fn rotations(&self) -> &[Matrix3<i64>] {
        &self.rotations
    }

    /// Rotations in the primitive reciprocal basis, parallel to [`BzGrid::rotations`]
    pub fn reciprocal_rotations(&self) -> &[Matrix3<i64>] {
        &self.reciprocal_rotations
    }

    pub fn is_time_reversal(&self) -> bool {
        self.is_time_reversal
    }

    /// Integer half-grid shift `P s`
    pub fn ps(&self) -> &Vector3<i64> {
        &self.ps
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    pub fn num_grid_points(&self) -> usize {
        self.snf.num_grid_points()
    }

    pub fn num_bz_points(&self) -> usize {
        self.addresses.len()
    }

    // ======================== QUERIES ========================

    /// BZ index of an address; for surface points one of the equivalents is returned.
    pub fn index_from_address(&self, address: &Vector3<i64>) -> usize {
        self.grg2bzg[grid_index_from_address(address, self.d_diag())]
    }

    /// BZ indices of all translationally equivalent points of a BZ grid point, the
    /// representative of its canonical point first.
    pub fn equivalents(&self, bz_gp: usize) -> Result<Vec<usize>> {
        let gp = *self.bzg2grg.get(bz_gp).ok_or_else(|| {
            Error::invalid(format!(
                "BZ grid point {} out of range ({} points)",
                bz_gp,
                self.addresses.len()
            ))
        })?;
        let range = self.gp_map[gp]..self.gp_map[gp + 1];
        Ok(match self.layout {
            GridLayout::Sparse => {
                let num_gp = self.num_grid_points();
                std::iter::once(gp)
                    .chain(range.map(|i| num_gp + i))
                    .collect()
            }
            GridLayout::Dense => range.collect(),
        })
    }

    /// Reduced coordinates `Q D^-1 (a + PS / 2)` of a BZ grid point.
    pub fn qpoint(&self, bz_gp: usize) -> Vector3<f64> {
        let shifted = self.addresses[bz_gp].map(|x| x as f64) + self.ps.map(|x| x as f64 / 2.0);
        self.qd_inv * shifted
    }

    /// Squared reciprocal-Cartesian length of a BZ grid point.
    pub fn squared_norm(&self, bz_gp: usize) -> f64 {
        let lq = self.reciprocal_lattice * self.q().map(|x| x as f64);
        squared_distance(&self.addresses[bz_gp], &lq, self.d_diag(), &self.ps)
    }

    /// Irreducible canonical grid points under the grid rotations.
    pub fn irreducible_grid_points(&self) -> Result<IrreducibleGridPoints> {
        irreducible_grid_points(self.d_diag(), &self.rotations, &self.ps, self.is_time_reversal)
    }
}

fn as_direct(basis: &BaseMatrix) -> BaseMatrix {
    match basis.space() {
        Space::Real => basis.clone(),
        Space::Reciprocal => basis.reciprocal(),
    }
}
