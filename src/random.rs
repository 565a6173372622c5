//! Random-source construction.
//!
//! Each run owns exactly one random source, created here from a seed and
//! passed by `&mut` into every generation call. Batches derive a distinct
//! seed per run with [`derive_seed`] so that runs stay reproducible whether
//! they execute sequentially or on worker threads.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// The random source type owned by a run.
pub type RunRng = StdRng;

/// Creates a seeded random source.
pub fn create_rng(seed: u64) -> RunRng {
    StdRng::seed_from_u64(seed)
}

/// Derives the seed of run `index` from a batch base seed.
///
/// Uses the splitmix64 finaliser so that neighbouring indices produce
/// uncorrelated seeds.
pub fn derive_seed(base_seed: u64, index: usize) -> u64 {
    let mut z = base_seed.wrapping_add((index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
