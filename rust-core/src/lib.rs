//! Phonon grid library
//!
//! This library provides the lattice algebra behind three-phonon calculations: generalized
//! regular grids obtained from a Smith normal form, Brillouin-zone folding with surface
//! bookkeeping, symmetry-reduced grid points and triplets, and the contraction of third-order
//! force constants with phonon eigenvectors into interaction strengths.

pub mod config;
pub mod error;
pub mod grid;
pub mod interfaces;
pub mod lattice;
pub mod phonon3;
pub mod symmetries;

pub use error::{Error, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
