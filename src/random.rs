//! Seeded random source.
//!
//! Every run draws from a single stream. Reproducing a run requires the same
//! seed and the same draw order: selection, crossover weight, then the
//! per-gene mutation draws.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// The generator type used by runs that build their own stream.
pub type GaRng = Pcg64Mcg;

/// Creates a deterministic generator from `seed`.
pub fn create_rng(seed: u64) -> GaRng {
    Pcg64Mcg::seed_from_u64(seed)
}
