//! Simulation Tick
//!
//! The transition function that advances one game by one discrete step,
//! plus the configuration it runs under and deterministic replay.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::grid::GridBounds;
use crate::game::catalog::ItemCatalog;
use crate::game::events::GameEvent;
use crate::game::input::InputTrace;
use crate::game::state::{GamePhase, GameState};
use crate::{
    DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_TICK_INTERVAL_MS, DEFAULT_WIN_THRESHOLD,
};

/// Extra free interior cells required beyond the win threshold.
///
/// The spawner resamples until it finds a cell the actor does not occupy;
/// the body peaks at `win_threshold + 1` cells, so requiring this much
/// headroom makes the resampling loop provably terminating with room to
/// spare.
pub const SPAWN_HEADROOM: u64 = 8;

/// Result of one tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick.
    pub events: Vec<GameEvent>,
    /// Whether the game is in a terminal phase after this tick.
    pub ended: bool,
    /// Whether the terminal phase is `Won`. Meaningful only when `ended`.
    pub won: bool,
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Configuration for one game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    /// Playfield bounds.
    pub bounds: GridBounds,
    /// Collections required to win.
    pub win_threshold: u32,
    /// Fixed wall-clock interval between ticks (constant; the engine does
    /// not speed up as the actor grows).
    pub tick_interval: Duration,
    /// Collectible templates, consumed cyclically.
    pub catalog: ItemCatalog,
    /// Seed for item placement. Same seed + same inputs = same game.
    pub rng_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            bounds: GridBounds::new(DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT),
            win_threshold: DEFAULT_WIN_THRESHOLD,
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            catalog: ItemCatalog::career(),
            rng_seed: 0,
        }
    }
}

impl GameConfig {
    /// Check the host-integration preconditions.
    ///
    /// Violations are integration bugs, not gameplay events, so they
    /// surface as errors from `start`/`GameState::new` instead of
    /// degrading silently.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        if self.win_threshold == 0 {
            return Err(ConfigError::ZeroWinThreshold);
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }

        let interior = self.bounds.interior_cells();
        let required = self.win_threshold as u64 + SPAWN_HEADROOM;
        if interior <= required {
            return Err(ConfigError::GridTooSmall { interior, required });
        }

        Ok(())
    }
}

/// Invalid `GameConfig` errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The item catalog holds no templates.
    #[error("item catalog is empty")]
    EmptyCatalog,

    /// Winning requires at least one collection.
    #[error("win threshold must be at least 1")]
    ZeroWinThreshold,

    /// The tick timer cannot fire on a zero interval.
    #[error("tick interval must be non-zero")]
    ZeroTickInterval,

    /// The grid interior cannot seat the win threshold plus headroom, so
    /// spawn resampling could fail to terminate.
    #[error("grid interior of {interior} cells must exceed {required} (win threshold + headroom)")]
    GridTooSmall {
        /// Interior cells available.
        interior: u64,
        /// Interior cells required.
        required: u64,
    },
}

// =============================================================================
// TICK
// =============================================================================

/// Run one simulation tick.
///
/// No-op while `Paused`; reports `ended` without mutating anything once
/// the phase is terminal. While `Running`, the step order is: consume one
/// queued direction, compute the new head, check wall then self collision
/// (either one transitions to `Lost` and stops the tick), then resolve
/// growth or an ordinary move. Collision checks strictly precede growth so
/// a collision on the same tick as the final collection cannot corrupt
/// terminal state.
pub fn tick(state: &mut GameState, config: &GameConfig) -> TickResult {
    let mut result = TickResult::default();

    match state.phase {
        GamePhase::Paused => return result,
        GamePhase::Lost | GamePhase::Won => {
            result.ended = true;
            result.won = state.phase == GamePhase::Won;
            return result;
        }
        GamePhase::Running => {}
    }

    state.tick += 1;

    let direction = state.queue.dequeue_or(state.direction);
    let new_head = state.body.head().step(direction);

    if !state.bounds.is_inside(new_head) {
        state.phase = GamePhase::Lost;
        state.push_event(GameEvent::wall_collision(state.tick, new_head));
        result.ended = true;
        result.events = state.take_events();
        return result;
    }

    if state.body.occupies(new_head) {
        state.phase = GamePhase::Lost;
        state.push_event(GameEvent::self_collision(state.tick, new_head));
        result.ended = true;
        result.events = state.take_events();
        return result;
    }

    let on_item = state
        .item
        .as_ref()
        .is_some_and(|item| item.position == new_head);

    if on_item {
        let item = state.item.take().expect("checked on_item above");

        // Net length +1: new head in, tail kept
        state.body.grow_to(new_head);
        state.score += 1;
        state.collected.push(item.label.clone());
        state.push_event(GameEvent::item_collected(state.tick, &item, state.score));

        if state.score >= config.win_threshold {
            state.phase = GamePhase::Won;
            state.push_event(GameEvent::game_won(
                state.tick,
                state.score,
                state.collected.clone(),
            ));
            result.ended = true;
            result.won = true;
            result.events = state.take_events();
            return result;
        }

        state.spawn_next_item(config);
    } else {
        state.body.advance_to(new_head);
    }

    state.direction = direction;

    result.events = state.take_events();
    result
}

// =============================================================================
// REPLAY
// =============================================================================

/// Replay a game from its recorded inputs.
///
/// Entries recorded at `tick == T` are enqueued before the tick that runs
/// with `T` completed ticks, matching their position in the live run.
/// Returns the final state and every event in order, including the initial
/// spawn.
pub fn replay(
    config: &GameConfig,
    trace: &InputTrace,
    max_ticks: u64,
) -> Result<(GameState, Vec<GameEvent>), ConfigError> {
    let mut state = GameState::new(config)?;
    let mut all_events = state.take_events();

    let entries = trace.entries();
    let mut next_entry = 0;

    for _ in 0..max_ticks {
        while next_entry < entries.len() && entries[next_entry].tick <= state.tick {
            state.queue_direction(entries[next_entry].direction);
            next_entry += 1;
        }

        let result = tick(&mut state, config);
        all_events.extend(result.events);

        if result.ended {
            break;
        }
    }

    Ok((state, all_events))
}

// =============================================================================
// TESTS
// =============================================================================
