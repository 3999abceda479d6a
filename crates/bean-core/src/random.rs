//! Seeded random number generator.
//!
//! Xorshift32 keeps color rolls and future cosmetic rolls reproducible in
//! tests without pulling in an RNG crate for a handful of draws.

use serde::{Deserialize, Serialize};

/// Deterministic pseudo-random generator (xorshift32).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    /// Creates a new generator. A seed of 0 is remapped to 1 to avoid the
    /// all-zero fixed point of xorshift.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Returns the next raw u32.
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a random float in [0, 1).
    pub fn next(&mut self) -> f32 {
        (self.next_u32() as f32) / (u32::MAX as f32)
    }

    /// Returns a random integer in [0, max).
    pub fn next_int(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Returns a random float in [min, max).
    pub fn next_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next() * (max - min)
    }

    /// Current internal state, for logging or persistence.
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(1)
    }
}
