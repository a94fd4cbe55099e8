// Phonon3 module: triplets, phonon cache and three-phonon interaction strength
// This module contracts third-order force constants with phonons over irreducible triplets

// ======================== MODULE DECLARATIONS ========================
pub mod force_constants;
pub mod interaction;
pub mod phonon_cache;
pub mod real_to_reciprocal;
pub mod reciprocal_to_normal;
pub mod triplets;


// ======================== TRIPLETS ========================
pub use triplets::{
    TripletOptions,                 // struct - search mode, swappable, time reversal, rotations, NAC direction
    TripletsAtQ,                    // struct - triplets, weights, ir_g1, triplet_map, ir_map
    triplets_at_q,                  // fn(gp, grid, options) -> Result<TripletsAtQ> - irreducible triplets of g0
    nosym_triplets_at_q,            // fn(gp, grid) -> Result<TripletsAtQ> - every g1, weight one
};

// ======================== PHONONS ========================
pub use phonon_cache::{
    PhononAtQ,                      // struct - frequencies and eigenvector columns at one q-point
    PhononSolver,                   // trait - external dynamical-matrix solver (Sync)
    PhononCache,                    // struct - phonons per BZ grid index, explicit ensure_computed
};
// PhononCache impl methods:
//   new(grid, num_band, cutoff_frequency) -> Self                 - empty cache
//   ensure_computed(&mut self, solver, grid, gps) -> Result<()>   - idempotent, parallel solves
//   set_phonon_data(&mut self, freqs, eigvecs, addresses) -> Result<()> - PhononDataMismatch on inconsistent input
//   invalidate / invalidate_points                                - drop computed phonons
//   frequencies(gp) / eigenvectors(gp) -> Option<..>              - never computes

// ======================== FORCE CONSTANTS ========================
pub use force_constants::{
    Fc3,                            // struct - full fc3 over supercell atoms, (N, N, N, 3, 3, 3)
    MinimalImages,                  // struct - shortest vectors primitive -> supercell atoms with multiplicities
    PrimitiveCorrespondence,        // struct - p2s, s2p and masses
};

// ======================== INTERACTION ========================
pub use interaction::{
    Interaction,                    // struct - kernel bound to grid, fc3 and structure data
    InteractionConfig,              // struct - bands, cutoff, unit conversion, constant override, scale, symmetrize
    InteractionStrength,            // struct - values and forbidden mask, (triplet, band0, band, band)
};
pub use real_to_reciprocal::{real_to_reciprocal, ReciprocalFc3}; // fc3 at a q-point triplet
pub use reciprocal_to_normal::reciprocal_to_normal; // projection on normal modes, |V|^2 / (f0 f1 f2)
