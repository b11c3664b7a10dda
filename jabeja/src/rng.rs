//! The random stream every draw of a run comes from.

use rand::Rng;
use rand_pcg::Lcg64Xsh32;

/// Initial generator state; the seed picks the stream.
const STATE: u64 = 0xcafef00dd15ea5e5;

/// A seedable source of uniform draws.
///
/// A single instance is threaded through initial coloring and then the
/// whole simulation; the order of calls is part of what makes two runs with
/// the same seed identical.
pub trait RandomSource {
    /// Uniform integer in `0..bound`. `bound` must be positive.
    fn next_index(&mut self, bound: usize) -> usize;

    /// Uniform double in `[0, 1)`.
    fn next_f64(&mut self) -> f64;
}

impl<R: Rng> RandomSource for R {
    fn next_index(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }

    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// The default stream for a seed.
pub fn seeded(seed: u64) -> Lcg64Xsh32 {
    Lcg64Xsh32::new(STATE, seed)
}
