use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{info, warn};
use nalgebra::Vector3;
use phonon_grid::grid::{BzGrid, GridOptions};
use phonon_grid::interfaces::{GridLayout, MeshSpec, TripletSearch};
use phonon_grid::lattice::{
    body_centered_cubic_lattice, face_centered_cubic_lattice, hexagonal_lattice, simple_cubic_lattice,
    tetragonal_lattice, BaseMatrix, Centering, LatticeSystem,
};
use phonon_grid::phonon3::{triplets_at_q, TripletOptions};
use phonon_grid::symmetries::SymmetryDataset;

#[derive(Parser)]
#[command(name = "phonon-grid")]
#[command(about = "Reciprocal-space grids and irreducible phonon triplets of Bravais lattices")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads to use (default: all available cores)
    #[arg(short, long, global = true)]
    threads: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LatticeKind {
    Cubic,
    Fcc,
    Bcc,
    Hexagonal,
    Tetragonal,
}

#[derive(clap::Args)]
struct GridArgs {
    /// Bravais lattice
    #[arg(short, long, value_enum, default_value = "fcc")]
    lattice: LatticeKind,

    /// Lattice constant a in Angstrom
    #[arg(long, default_value = "5.43")]
    a: f64,

    /// Lattice constant c in Angstrom (hexagonal and tetragonal)
    #[arg(long)]
    c: Option<f64>,

    /// Mesh numbers along the reciprocal basis vectors
    #[arg(short, long, num_args = 3, conflicts_with = "length")]
    mesh: Option<Vec<i64>>,

    /// Real-space length in Angstrom; yields a generalized regular grid
    #[arg(long)]
    length: Option<f64>,

    /// Half-grid shifts along the three axes, e.g. "1 0 0"
    #[arg(long, num_args = 3)]
    shift: Option<Vec<u8>>,

    /// Store BZ-surface equivalents contiguously
    #[arg(long)]
    dense: bool,

    /// Ignore the lattice point group
    #[arg(long)]
    no_symmetry: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a grid and report its SNF, BZ size and irreducible points
    Grid {
        #[command(flatten)]
        grid: GridArgs,
    },
    /// List the irreducible triplets of one grid point
    Triplets {
        #[command(flatten)]
        grid: GridArgs,

        /// Canonical grid point of the first q-point
        #[arg(short, long, default_value = "0")]
        grid_point: usize,

        /// Do not merge triplets related by exchanging the second and third q-point
        #[arg(long)]
        no_swap: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Set thread pool size if specified
    if let Some(threads) = cli.threads {
        #[cfg(feature = "parallel")]
        {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .context("failed to set thread pool size")?;
            info!("Using {} threads", threads);
        }
        #[cfg(not(feature = "parallel"))]
        {
            warn!("Thread count specified but parallel feature not enabled. Ignoring.");
        }
    }

    info!("Starting phonon-grid v{}", phonon_grid::VERSION);

    match cli.command {
        Commands::Grid { grid } => report_grid(&grid),
        Commands::Triplets {
            grid,
            grid_point,
            no_swap,
        } => report_triplets(&grid, grid_point, !no_swap),
    }
}

fn build_lattice(args: &GridArgs) -> Result<(BaseMatrix, Centering, LatticeSystem)> {
    let c = args.c.unwrap_or(args.a);
    let built = match args.lattice {
        LatticeKind::Cubic => (simple_cubic_lattice(args.a), Centering::Primitive, LatticeSystem::Cubic),
        LatticeKind::Fcc => (face_centered_cubic_lattice(args.a), Centering::FaceCentered, LatticeSystem::Cubic),
        LatticeKind::Bcc => (body_centered_cubic_lattice(args.a), Centering::BodyCentered, LatticeSystem::Cubic),
        LatticeKind::Hexagonal => (hexagonal_lattice(args.a, c), Centering::Primitive, LatticeSystem::Hexagonal),
        LatticeKind::Tetragonal => (tetragonal_lattice(args.a, c), Centering::Primitive, LatticeSystem::Tetragonal),
    };
    let (lattice, centering, system) = built;
    Ok((lattice.context("invalid lattice parameters")?, centering, system))
}

fn build_grid(args: &GridArgs) -> Result<BzGrid> {
    let (direct, centering, system) = build_lattice(args)?;
    let dataset = (!args.no_symmetry).then(|| SymmetryDataset::from_lattice(&direct, centering, system));

    let mesh = match (&args.mesh, args.length) {
        (Some(mesh), _) => MeshSpec::Numbers([mesh[0], mesh[1], mesh[2]]),
        (None, Some(length)) => MeshSpec::Length(length),
        (None, None) => bail!("either --mesh or --length is required"),
    };
    let is_shift = match &args.shift {
        Some(shift) => [shift[0] != 0, shift[1] != 0, shift[2] != 0],
        None => [false; 3],
    };
    let options = GridOptions {
        is_shift,
        layout: if args.dense { GridLayout::Dense } else { GridLayout::Sparse },
        ..GridOptions::default()
    };

    let grid = BzGrid::new(mesh, &direct, dataset.as_ref(), &options).context("grid construction failed")?;
    info!(
        "Grid D = {:?}, {} grid points, {} BZ points, {} rotations",
        grid.d_diag().as_slice(),
        grid.num_grid_points(),
        grid.num_bz_points(),
        grid.rotations().len()
    );
    Ok(grid)
}

fn report_grid(args: &GridArgs) -> Result<()> {
    let grid = build_grid(args)?;
    let ir = grid
        .irreducible_grid_points()
        .context("irreducible grid point search failed")?;

    println!("D    = {:?}", grid.d_diag().as_slice());
    println!("P    = {:?}", grid.p().transpose().as_slice());
    println!("Q    = {:?}", grid.q().transpose().as_slice());
    if let Some(a) = grid.grid_matrix() {
        println!("A    = {:?}", a.transpose().as_slice());
    }
    println!("grid points        {}", grid.num_grid_points());
    println!("BZ grid points     {}", grid.num_bz_points());
    println!("irreducible points {}", ir.num_ir_grid_points());
    for (gp, weight) in ir.ir_grid_points().iter().zip(ir.ir_weights()) {
        let bz_gp = grid.grg2bzg()[*gp];
        let q = grid.qpoint(bz_gp);
        println!(
            "{:6} {:?} ({:8.5} {:8.5} {:8.5}) {:4}",
            gp,
            grid.addresses()[bz_gp].as_slice(),
            q.x,
            q.y,
            q.z,
            weight
        );
    }
    Ok(())
}

fn report_triplets(args: &GridArgs, grid_point: usize, swappable: bool) -> Result<()> {
    let grid = build_grid(args)?;
    if grid.ps() != &Vector3::zeros() {
        warn!("Triplets require an unshifted grid");
    }
    if grid_point >= grid.num_grid_points() {
        bail!(
            "grid point {} out of range ({} grid points)",
            grid_point,
            grid.num_grid_points()
        );
    }
    let bz_gp = grid.grg2bzg()[grid_point];

    let options = TripletOptions {
        search: if args.no_symmetry {
            TripletSearch::Unsymmetric
        } else {
            TripletSearch::Symmetric
        },
        swappable,
        ..TripletOptions::default()
    };
    let triplets = triplets_at_q(bz_gp, &grid, &options).context("triplet search failed")?;

    println!("grid point {} {:?}", bz_gp, grid.addresses()[bz_gp].as_slice());
    println!("irreducible triplets {}", triplets.num_triplets());
    println!("weight sum           {}", triplets.weights().iter().sum::<usize>());
    for (triplet, weight) in triplets.triplets().iter().zip(triplets.weights()) {
        let addresses: Vec<[i64; 3]> = triplet
            .iter()
            .map(|&g| {
                let a = grid.addresses()[g];
                [a.x, a.y, a.z]
            })
            .collect();
        println!("{:?} {:?} {:4}", triplet, addresses, weight);
    }
    Ok(())
}
