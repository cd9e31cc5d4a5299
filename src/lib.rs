//! # Stack Hunt Game Engine
//!
//! Deterministic grid-collection game engine: a snake-style actor grows by
//! collecting career-themed items on a fixed grid, steered by buffered
//! directional input and advanced by a fixed-interval tick.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        STACK HUNT                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── grid.rs     - Positions, directions, playfield bounds   │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── hash.rs     - State hashing for replay verification     │
//! │                                                              │
//! │  game/           - Simulation (deterministic)                │
//! │  ├── catalog.rs  - Collectible templates, cyclic order       │
//! │  ├── input.rs    - Buffered move queue, replay trace         │
//! │  ├── state.rs    - Actor body, phase, aggregate state        │
//! │  ├── tick.rs     - Per-step transition function, replay      │
//! │  ├── spawn.rs    - Free-cell item placement                  │
//! │  ├── events.rs   - Typed events + terminal-log copy          │
//! │  └── reporter.rs - Emit-once log deduplication               │
//! │                                                              │
//! │  runner.rs       - Timer-driven host interface               │
//! │                    (non-deterministic timing only)           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! `core/` and `game/` are 100% deterministic: all randomness comes from a
//! seeded Xorshift128+ generator and nothing reads the clock. Given the
//! same [`GameConfig`] and the same accepted inputs at the same ticks, a
//! game plays out identically, which is what makes recorded traces
//! replay-verifiable via state hashes. Wall-clock time exists only in
//! `runner`, which decides *when* ticks happen, never *what* they do.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod runner;

// Re-export commonly used types
pub use crate::core::grid::{Direction, GridBounds, Position};
pub use crate::core::rng::DeterministicRng;
pub use game::catalog::{Collectible, ItemCatalog, ItemCategory, ItemTemplate};
pub use game::events::{GameEvent, GameEventData};
pub use game::input::{InputTrace, MoveQueue};
pub use game::state::{GamePhase, GameSnapshot, GameState};
pub use game::tick::{replay, tick, ConfigError, GameConfig, TickResult};
pub use runner::{start, GameHandle, GameOutcome, HandleError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default playfield width in cells
pub const DEFAULT_GRID_WIDTH: i32 = 40;

/// Default playfield height in cells
pub const DEFAULT_GRID_HEIGHT: i32 = 12;

/// Default collections required to win (the size of the career catalog)
pub const DEFAULT_WIN_THRESHOLD: u32 = 7;

/// Default tick interval in milliseconds
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 200;
