//! Core deterministic primitives.
//!
//! Grid coordinates, seeded randomness, and state hashing. Everything in
//! this module is platform-independent: the same seed and inputs produce
//! the same values everywhere, which is what makes replays verifiable.

pub mod grid;
pub mod hash;
pub mod rng;

// Re-export core types
pub use grid::{Direction, GridBounds, Position};
pub use hash::{compute_state_hash, StateHash, StateHasher};
pub use rng::DeterministicRng;
