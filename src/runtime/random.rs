//! Random source used to break ties at choice pseudostates.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed indices.
///
/// Only consulted when a choice pseudostate has more than one enabled
/// outgoing transition. Any `FnMut(usize) -> usize` closure is a source,
/// which makes deterministic substitutes trivial in tests.
pub trait Random: Send {
    /// A value in `0..max`. `max` is never zero.
    fn get(&mut self, max: usize) -> usize;
}

impl<F> Random for F
where
    F: FnMut(usize) -> usize + Send,
{
    fn get(&mut self, max: usize) -> usize {
        self(max)
    }
}

/// Draws from the thread-local generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;

impl Random for ThreadRandom {
    fn get(&mut self, max: usize) -> usize {
        rand::thread_rng().gen_range(0..max)
    }
}

/// Reproducible source seeded from a `u64`.
#[derive(Clone, Debug)]
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Random for SeededRandom {
    fn get(&mut self, max: usize) -> usize {
        self.0.gen_range(0..max)
    }
}
