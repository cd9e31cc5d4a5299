//! Game State
//!
//! The segmented actor body and the aggregate simulation state mutated by
//! the tick engine.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::grid::{Direction, GridBounds, Position};
use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::DeterministicRng;
use crate::game::catalog::Collectible;
use crate::game::events::GameEvent;
use crate::game::input::MoveQueue;
use crate::game::spawn::spawn_collectible;
use crate::game::tick::{ConfigError, GameConfig};

// =============================================================================
// ACTOR BODY
// =============================================================================

/// The actor's body: an ordered sequence of cells, head first, tail last.
///
/// Consecutive segments differ by exactly one orthogonal step and no two
/// segments share a cell while the game is live; both hold by construction
/// because the only mutations are the head/tail operations below.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActorBody {
    segments: VecDeque<Position>,
}

impl ActorBody {
    /// Create a length-1 body at `start`.
    pub fn new(start: Position) -> Self {
        let mut segments = VecDeque::new();
        segments.push_front(start);
        Self { segments }
    }

    /// The head cell.
    pub fn head(&self) -> Position {
        *self.segments.front().expect("body is never empty")
    }

    /// Current length in cells.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// A body always has at least the head segment.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether any segment occupies `pos`.
    pub fn occupies(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }

    /// Grow by one: new head, tail kept. Used on collection.
    pub fn grow_to(&mut self, new_head: Position) {
        self.segments.push_front(new_head);
    }

    /// Ordinary move: new head, tail dropped. Length unchanged.
    pub fn advance_to(&mut self, new_head: Position) {
        self.segments.push_front(new_head);
        self.segments.pop_back();
    }

    /// Segments head-first.
    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.segments.iter().copied()
    }
}

// =============================================================================
// PHASE
// =============================================================================

/// Lifecycle phase of one simulation instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum GamePhase {
    /// Ticks are being processed.
    #[default]
    Running = 0,
    /// Ticks are suspended; toggling returns to `Running`.
    Paused = 1,
    /// Terminal: the actor collided. No further ticks.
    Lost = 2,
    /// Terminal: the win threshold was reached. No further ticks.
    Won = 3,
}

impl GamePhase {
    /// Whether this phase is absorbing.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Lost | GamePhase::Won)
    }
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Complete state of one game.
///
/// Mutated exclusively by `tick` and the two host-facing entry points
/// (`queue_direction`, `toggle_pause`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    /// Playfield bounds, fixed for the game's lifetime.
    pub bounds: GridBounds,

    /// The actor body.
    pub body: ActorBody,

    /// Direction of the most recent completed move.
    pub direction: Direction,

    /// Buffered move intents.
    pub queue: MoveQueue,

    /// The live collectible, absent only momentarily during a collection
    /// tick and permanently once the game is won.
    pub item: Option<Collectible>,

    /// Labels of collected items, in collection order. Display-only.
    pub collected: Vec<String>,

    /// Score; equals `collected.len()`.
    pub score: u32,

    /// Current lifecycle phase.
    pub phase: GamePhase,

    /// Completed ticks.
    pub tick: u64,

    /// Collectibles spawned so far; indexes the catalog cyclically.
    pub spawn_index: u64,

    /// Seed the RNG started from (for replay verification).
    pub rng_seed: u64,

    /// Deterministic RNG driving item placement.
    pub rng: DeterministicRng,

    /// Events generated since the last `take_events` call.
    #[serde(skip)]
    pub pending_events: Vec<GameEvent>,
}

impl GameState {
    /// Create the initial state for `config`: length-1 body at the grid
    /// center, heading right, with the first collectible already spawned.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut state = Self {
            bounds: config.bounds,
            body: ActorBody::new(config.bounds.center()),
            direction: Direction::Right,
            queue: MoveQueue::new(),
            item: None,
            collected: Vec::new(),
            score: 0,
            phase: GamePhase::Running,
            tick: 0,
            spawn_index: 0,
            rng_seed: config.rng_seed,
            rng: DeterministicRng::new(config.rng_seed),
            pending_events: Vec::new(),
        };

        state.spawn_next_item(config);
        Ok(state)
    }

    /// Buffer a move intent. Ignored (returns false) once the game is
    /// terminal; reversals are dropped by the queue itself. Queueing while
    /// paused is allowed so a turn entered during pause takes effect on
    /// resume.
    pub fn queue_direction(&mut self, direction: Direction) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.queue.enqueue(direction, self.direction)
    }

    /// Flip `Running` <-> `Paused`. Ignored (returns false) once terminal.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Running => {
                self.phase = GamePhase::Paused;
                true
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Running;
                true
            }
            GamePhase::Lost | GamePhase::Won => false,
        }
    }

    /// Spawn the next collectible on a free interior cell and install it
    /// as the live item.
    pub(crate) fn spawn_next_item(&mut self, config: &GameConfig) {
        let item = spawn_collectible(
            &self.bounds,
            &mut self.rng,
            &self.body,
            &config.catalog,
            self.spawn_index,
        );
        self.spawn_index += 1;
        self.push_event(GameEvent::item_spawned(self.tick, &item));
        self.item = Some(item);
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Compute the hash of the current state for replay verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.rng_seed, |hasher| {
            hasher.update_u8(self.phase as u8);
            hasher.update_direction(self.direction);
            hasher.update_u32(self.score);
            hasher.update_u64(self.spawn_index);

            hasher.update_u64(self.body.len() as u64);
            for segment in self.body.segments() {
                hasher.update_position(segment);
            }

            hasher.update_bool(self.item.is_some());
            if let Some(item) = &self.item {
                hasher.update_position(item.position);
                hasher.update_str(&item.label);
            }

            hasher.update_u64(self.collected.len() as u64);
            for label in &self.collected {
                hasher.update_str(label);
            }
        })
    }

    /// Immutable render view of the current state.
    pub fn snapshot(&self, config: &GameConfig) -> GameSnapshot {
        GameSnapshot {
            tick: self.tick,
            phase: self.phase,
            bounds: self.bounds,
            direction: self.direction,
            body: self.body.segments().collect(),
            item: self.item.clone(),
            score: self.score,
            win_threshold: config.win_threshold,
            collected: self.collected.clone(),
        }
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Point-in-time view of a game, published to the host once per tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Completed ticks.
    pub tick: u64,
    /// Current phase.
    pub phase: GamePhase,
    /// Playfield bounds.
    pub bounds: GridBounds,
    /// Direction of the most recent move.
    pub direction: Direction,
    /// Body cells, head first.
    pub body: Vec<Position>,
    /// The live collectible, if any.
    pub item: Option<Collectible>,
    /// Current score.
    pub score: u32,
    /// Collections needed to win.
    pub win_threshold: u32,
    /// Collected labels, in order.
    pub collected: Vec<String>,
}

// =============================================================================
// TESTS
// =============================================================================
