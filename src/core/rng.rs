//! Deterministic random source
//!
//! Every stochastic decision in the core routes through an injected
//! `RandomSource` so two runs with the same seed and tick sequence produce
//! identical outcomes. Subsystems take an optional `&mut dyn RandomSource`;
//! when no source is bound they skip the random branch entirely rather
//! than falling back to an unseeded generator.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Injected source of all randomness in the simulation core
pub trait RandomSource {
    /// Uniform draw in [0, 1)
    fn uniform(&mut self) -> f32;

    /// Uniform integer in [min, max] inclusive
    fn int_range(&mut self, min: i64, max: i64) -> i64;

    /// Index selected proportionally to the given weights
    ///
    /// A zero or negative total weight selects index 0 rather than
    /// panicking; the core has no fatal-error surface.
    fn weighted_index(&mut self, weights: &[f32]) -> usize;

    /// Bernoulli draw with probability `p`
    fn coin_flip(&mut self, p: f32) -> bool;

    /// Stable unique id, monotonic per source
    fn next_id(&mut self) -> u64;
}

/// Pick a uniform random element from a slice
pub fn pick<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let idx = rng.int_range(0, items.len() as i64 - 1) as usize;
    items.get(idx)
}

/// Production random source seeded for replay
pub struct SeededRng {
    rng: ChaCha8Rng,
    next_id: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_id: 1,
        }
    }
}

impl RandomSource for SeededRng {
    fn uniform(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    fn weighted_index(&mut self, weights: &[f32]) -> usize {
        let total: f32 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return 0;
        }
        let mut roll = self.uniform() * total;
        for (i, w) in weights.iter().enumerate() {
            if *w <= 0.0 {
                continue;
            }
            if roll < *w {
                return i;
            }
            roll -= *w;
        }
        weights.len().saturating_sub(1)
    }

    fn coin_flip(&mut self, p: f32) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.uniform() < p
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
