//! RNG module - random block values
//!
//! Block values are drawn uniformly from `MIN_NUMBER..=MAX_NUMBER`.
//! A simple seeded LCG keeps every game reproducible for tests and replays.

use crate::game_state::FallingBlock;
use crate::types::{MAX_NUMBER, MIN_NUMBER, SPAWN_X, SPAWN_Y};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Scales by the high bits: the low bits of an LCG cycle with short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Random value in the inclusive range [lo, hi]
    pub fn next_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        debug_assert!(lo <= hi);
        lo + self.next_range(hi - lo + 1)
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Produces falling blocks at the spawn position with fresh random values.
#[derive(Debug, Clone)]
pub struct BlockGenerator {
    rng: SimpleRng,
    /// Value of the block the next `spawn` will return
    next_value: u32,
    /// Monotonic id of spawned blocks
    next_id: u32,
}

impl BlockGenerator {
    /// Create a new generator with the given seed
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let next_value = rng.next_inclusive(MIN_NUMBER, MAX_NUMBER);
        Self {
            rng,
            next_value,
            next_id: 1,
        }
    }

    /// Uniform random integer in [MIN_NUMBER, MAX_NUMBER]
    pub fn generate_value(&mut self) -> u32 {
        self.rng.next_inclusive(MIN_NUMBER, MAX_NUMBER)
    }

    /// Value of the next block without consuming it
    pub fn peek_value(&self) -> u32 {
        self.next_value
    }

    /// New falling block at the top-center column
    pub fn spawn(&mut self) -> FallingBlock {
        let value = self.next_value;
        self.next_value = self.generate_value();
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        FallingBlock {
            value,
            x: SPAWN_X,
            y: SPAWN_Y,
            id,
        }
    }

    /// Current RNG state (for restarting with a continued sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for BlockGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}
