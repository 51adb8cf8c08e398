//! Per-stream question sampling.
//!
//! Uniform, without replacement, clamped to the pool size when a stream
//! holds fewer questions than requested. The RNG is seedable so a session
//! draw can be reproduced in tests and support scenarios.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

use crate::question::PersonalityQuestion;

/// RNG for sampling: fixed seed for reproducibility, entropy otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> Mcg128Xsl64 {
    match seed {
        Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
        None => Mcg128Xsl64::from_entropy(),
    }
}

/// Draw up to `n` questions from `pool`, uniformly, without replacement.
/// Returns the whole pool (shuffled) when it holds fewer than `n`.
pub fn sample_questions(
    pool: &[PersonalityQuestion],
    n: usize,
    rng: &mut impl Rng,
) -> Vec<PersonalityQuestion> {
    let mut sampled: Vec<PersonalityQuestion> =
        pool.iter().cloned().choose_multiple(rng, n);
    // choose_multiple keeps pool order; shuffle so the order is part of the draw.
    sampled.shuffle(rng);
    sampled
}
