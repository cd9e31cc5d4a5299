//! Deterministic Random Number Generator
//!
//! Xorshift128+ seeded through SplitMix64. Given the same seed, the
//! generator produces the identical sequence on every platform, which is
//! what makes recorded games replayable.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::grid::{GridBounds, Position};

/// Deterministic PRNG using the Xorshift128+ algorithm.
///
/// # Example
///
/// ```
/// use stack_hunt::core::rng::DeterministicRng;
///
/// let mut a = DeterministicRng::new(12345);
/// let mut b = DeterministicRng::new(12345);
/// assert_eq!(a.next_u64(), b.next_u64());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: [u64; 2],
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DeterministicRng {
    /// Create a new RNG from a 64-bit seed.
    ///
    /// SplitMix64 expands the seed into the internal state so that even
    /// weak seeds (0, 1, 2, ...) start from well-distributed states.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // Xorshift must never start from the all-zero state
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Generate the next 64-bit random value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }

    /// Generate a random integer in range `[0, max)`.
    ///
    /// `max == 0` yields 0. Simple modulo; the bias is negligible for the
    /// cell counts this engine works with.
    #[inline]
    pub fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        (self.next_u64() % max as u64) as u32
    }

    /// Generate a uniformly random interior cell of `bounds`.
    ///
    /// Interior means not on the boundary ring: `x` in `[1, width - 1)`,
    /// `y` in `[1, height - 1)`. Caller must ensure the grid has an
    /// interior (`GameConfig::validate` does).
    #[inline]
    pub fn interior_position(&mut self, bounds: &GridBounds) -> Position {
        let x = 1 + self.next_int((bounds.width - 2).max(0) as u32) as i32;
        let y = 1 + self.next_int((bounds.height - 2).max(0) as u32) as i32;
        Position::new(x, y)
    }

    /// Get current state (for checkpointing/debugging).
    pub fn state(&self) -> [u64; 2] {
        self.state
    }
}

/// SplitMix64 for seed initialization.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Derive a game seed from a host-supplied tag and nonce.
///
/// Gives hosts a stable way to get distinct-but-reproducible seeds for
/// successive games without inventing their own hashing.
pub fn derive_game_seed(tag: &[u8], nonce: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(b"STACK_HUNT_SEED_V1");
    hasher.update(tag);
    hasher.update(nonce.to_le_bytes());
    let hash = hasher.finalize();
    u64::from_le_bytes(hash[0..8].try_into().expect("SHA-256 output is 32 bytes"))
}

// =============================================================================
// TESTS
// =============================================================================
