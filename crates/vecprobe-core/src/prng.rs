//! Multiply-with-carry pseudo random generator
//!
//! The sequence is part of the harness contract: a seed replays the same
//! corpus and the same diagnostics on every platform, so the multiplier,
//! the initial carry and the warm-up count are fixed.

use rand::{RngCore, SeedableRng};

/// Multiply-with-carry generator with a 32-bit output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mwc {
    x: u64,
    carry: u64,
}

impl Mwc {
    pub const FACTOR: u64 = 3_947_008_974;
    pub const INITIAL_CARRY: u64 = 1765;

    /// Seed the generator and discard two outputs to mix the seed.
    pub fn new(seed: i64) -> Self {
        // Negative seeds sign-extend into the 64-bit state.
        #[allow(clippy::cast_sign_loss)]
        let mut rng = Self {
            x: seed as u64,
            carry: Self::INITIAL_CARRY,
        };
        rng.next();
        rng.next();
        rng
    }

    /// Next 32 random bits
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u32 {
        self.x = self.x.wrapping_mul(Self::FACTOR).wrapping_add(self.carry);
        self.carry = self.x >> 32;
        self.x &= 0xFFFF_FFFF;
        #[allow(clippy::cast_possible_truncation)]
        let low = self.x as u32;
        low
    }

    /// Two outputs concatenated, the first in the high word
    pub fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.next());
        (high << 32) | u64::from(self.next())
    }
}

impl RngCore for Mwc {
    fn next_u32(&mut self) -> u32 {
        self.next()
    }

    fn next_u64(&mut self) -> u64 {
        Mwc::next_u64(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mwc {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(i64::from_le_bytes(seed))
    }

    #[allow(clippy::cast_possible_wrap)]
    fn seed_from_u64(state: u64) -> Self {
        Self::new(state as i64)
    }
}
