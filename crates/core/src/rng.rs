//! Injectable random source. Every gameplay draw (spot pick, reward roll,
//! quality tier, disengage check) routes through this trait so tests can
//! substitute deterministic sequences.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;

pub trait RandomSource {
    fn next_u64(&mut self) -> u64;

    /// Uniform draw in `[0, 1)` built from the top 53 bits.
    fn unit_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.unit_f64() < p
    }

    /// Uniform index into a slice of length `len`. `len` must be nonzero.
    fn pick(&mut self, len: usize) -> usize {
        (self.next_u64() % len as u64) as usize
    }
}

impl RandomSource for ChaCha8Rng {
    fn next_u64(&mut self) -> u64 {
        Rng::next_u64(self)
    }
}
