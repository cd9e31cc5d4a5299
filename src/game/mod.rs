//! Game Logic Module
//!
//! All simulation code. 100% deterministic: given the same config (seed
//! included) and the same accepted inputs at the same ticks, a game plays
//! out identically.
//!
//! ## Module Structure
//!
//! - `catalog`: collectible templates and the live collectible
//! - `input`: buffered move queue and replay input trace
//! - `state`: actor body, phase, aggregate game state
//! - `tick`: the per-step transition function and replay
//! - `spawn`: free-cell item placement
//! - `events`: typed events and their terminal-log copy
//! - `reporter`: deduplicating one-shot log emission

pub mod catalog;
pub mod events;
pub mod input;
pub mod reporter;
pub mod spawn;
pub mod state;
pub mod tick;

// Re-export key types
pub use catalog::{Collectible, ItemCatalog, ItemCategory, ItemTemplate};
pub use events::{GameEvent, GameEventData};
pub use input::{InputTrace, MoveQueue};
pub use reporter::OutcomeReporter;
pub use state::{ActorBody, GamePhase, GameSnapshot, GameState};
pub use tick::{replay, tick, ConfigError, GameConfig, TickResult};
