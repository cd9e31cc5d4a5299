//! Timer-Driven Runner
//!
//! Owns a game on a spawned task and advances it on a fixed interval. The
//! host talks to the task through a [`GameHandle`]: buffered direction
//! input, a pause toggle, a per-tick snapshot stream for rendering, log
//! lines for the scrollback, and a one-shot outcome when the game ends.
//!
//! The interval lives inside the task and is dropped on every exit path:
//! terminal transition, explicit [`GameHandle::close`], or handle drop
//! (which aborts the task). No tick overlaps another; inputs only enqueue
//! and never touch the body or item directly.

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::core::grid::Direction;
use crate::core::hash::StateHash;
use crate::game::events::GameEvent;
use crate::game::input::InputTrace;
use crate::game::reporter::OutcomeReporter;
use crate::game::state::{GameSnapshot, GameState};
use crate::game::tick::{tick, ConfigError, GameConfig};

/// Host commands consumed by the game task.
enum Command {
    Direction(Direction),
    TogglePause,
    Close,
}

/// Final result of a finished game, delivered exactly once.
#[derive(Debug)]
pub struct GameOutcome {
    /// Whether the terminal phase was `Won`.
    pub won: bool,
    /// Tick the game ended on.
    pub end_tick: u64,
    /// Final score.
    pub score: u32,
    /// Hash of the final state, comparable against a `replay` of `trace`.
    pub final_hash: StateHash,
    /// Every accepted direction input, for replay verification.
    pub trace: InputTrace,
}

/// Errors from using a handle the host has already closed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandleError {
    /// The handle was closed (or its task is gone); this call is a
    /// host-integration bug.
    #[error("game handle is closed")]
    Closed,
}

/// Handle to a running game.
///
/// Dropping the handle aborts the game task, so an abruptly unmounted
/// host cannot leak the tick timer.
pub struct GameHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<GameSnapshot>,
    log_lines: Option<mpsc::UnboundedReceiver<String>>,
    events: Option<mpsc::UnboundedReceiver<GameEvent>>,
    ended: Option<oneshot::Receiver<GameOutcome>>,
    task: JoinHandle<()>,
    closed: bool,
}

/// Start a game and return its handle.
///
/// Validates `config`, spawns the tick task, and begins ticking at
/// `config.tick_interval`. Must be called within a tokio runtime.
pub fn start(config: GameConfig) -> Result<GameHandle, ConfigError> {
    let state = GameState::new(&config)?;

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (line_tx, line_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (end_tx, end_rx) = oneshot::channel();
    let (snap_tx, snap_rx) = watch::channel(state.snapshot(&config));

    info!(
        width = config.bounds.width,
        height = config.bounds.height,
        win_threshold = config.win_threshold,
        interval_ms = config.tick_interval.as_millis() as u64,
        "starting game"
    );

    let task = tokio::spawn(run_game_loop(
        state, config, cmd_rx, snap_tx, line_tx, event_tx, end_tx,
    ));

    Ok(GameHandle {
        commands: cmd_tx,
        snapshots: snap_rx,
        log_lines: Some(line_rx),
        events: Some(event_rx),
        ended: Some(end_rx),
        task,
        closed: false,
    })
}

impl GameHandle {
    /// Buffer a direction intent.
    ///
    /// Reversals are filtered by the queue and input is ignored once the
    /// game is terminal; both are silent no-ops. Calling after `close` is
    /// a host bug and errors.
    pub fn queue_direction(&self, direction: Direction) -> Result<(), HandleError> {
        if self.closed {
            return Err(HandleError::Closed);
        }
        self.commands
            .send(Command::Direction(direction))
            .map_err(|_| HandleError::Closed)
    }

    /// Flip `Running` <-> `Paused`. Ignored once terminal; errors after
    /// `close`.
    pub fn toggle_pause(&self) -> Result<(), HandleError> {
        if self.closed {
            return Err(HandleError::Closed);
        }
        self.commands
            .send(Command::TogglePause)
            .map_err(|_| HandleError::Closed)
    }

    /// The most recent per-tick snapshot.
    pub fn snapshot(&self) -> GameSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Take the log-line receiver (scrollback copy, already deduplicated).
    /// Yields `Some` only on the first call.
    pub fn take_log_lines(&mut self) -> Option<mpsc::UnboundedReceiver<String>> {
        self.log_lines.take()
    }

    /// Take the typed event receiver. Yields `Some` only on the first call.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<GameEvent>> {
        self.events.take()
    }

    /// Wait for the game to end.
    ///
    /// Resolves `Some(outcome)` exactly once, when the phase first turns
    /// `Lost` or `Won`; `None` if the game was closed first or the outcome
    /// was already taken.
    pub async fn wait_end(&mut self) -> Option<GameOutcome> {
        match self.ended.take() {
            Some(rx) => rx.await.ok(),
            None => None,
        }
    }

    /// Close the game and release its timer. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let _ = self.commands.send(Command::Close);
    }

    /// Whether `close` has been called on this handle.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for GameHandle {
    fn drop(&mut self) {
        // Abrupt unmount: kill the task, which drops the interval
        self.task.abort();
    }
}

/// The game task: one tick per interval, commands in between.
async fn run_game_loop(
    mut state: GameState,
    config: GameConfig,
    mut commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<GameSnapshot>,
    lines: mpsc::UnboundedSender<String>,
    events: mpsc::UnboundedSender<GameEvent>,
    end: oneshot::Sender<GameOutcome>,
) {
    let mut reporter = OutcomeReporter::new(lines);
    let mut trace = InputTrace::new();

    // The initial spawn happened during state construction
    for event in state.take_events() {
        reporter.report(&event);
        let _ = events.send(event);
    }

    let mut interval = tokio::time::interval(config.tick_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // An interval's first tick completes immediately; swallow it so the
    // first move lands one full interval after start
    interval.tick().await;

    let outcome = loop {
        tokio::select! {
            _ = interval.tick() => {
                let result = tick(&mut state, &config);
                for event in &result.events {
                    reporter.report(event);
                }
                for event in result.events {
                    let _ = events.send(event);
                }
                let _ = snapshots.send(state.snapshot(&config));
                if result.ended {
                    break Some(result.won);
                }
            }
            cmd = commands.recv() => match cmd {
                Some(Command::Direction(direction)) => {
                    if state.queue_direction(direction) {
                        trace.record(state.tick, direction);
                    }
                }
                Some(Command::TogglePause) => {
                    if state.toggle_pause() {
                        debug!(phase = ?state.phase, tick = state.tick, "pause toggled");
                        let _ = snapshots.send(state.snapshot(&config));
                    }
                }
                Some(Command::Close) | None => break None,
            }
        }
    };

    // Release the timer on every exit path before anything else
    drop(interval);

    match outcome {
        Some(won) => {
            info!(won, tick = state.tick, score = state.score, "game ended");
            let _ = end.send(GameOutcome {
                won,
                end_tick: state.tick,
                score: state.score,
                final_hash: state.compute_hash(),
                trace,
            });

            // Terminal: keep serving the command channel so late inputs
            // stay silent no-ops until the host closes or drops the handle
            while let Some(cmd) = commands.recv().await {
                if matches!(cmd, Command::Close) {
                    break;
                }
            }
        }
        None => {
            debug!(tick = state.tick, "game closed before a terminal state");
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::GridBounds;
    use crate::game::events::GameEventData;
    use crate::game::state::GamePhase;
    use crate::game::tick::replay;
    use std::time::Duration;

    /// Small grid, fast ticks, actor marches right into the wall.
    fn fast_config() -> GameConfig {
        GameConfig {
            bounds: GridBounds::new(9, 9),
            tick_interval: Duration::from_millis(5),
            rng_seed: 11,
            ..GameConfig::default()
        }
    }

    #[tokio::test]
    async fn test_unsteered_game_loses_at_wall() {
        let mut handle = start(fast_config()).unwrap();
        let mut lines = handle.take_log_lines().unwrap();

        let outcome = handle.wait_end().await.expect("game must end");

        assert!(!outcome.won);
        assert!(outcome.end_tick >= 1);
        assert_eq!(handle.snapshot().phase, GamePhase::Lost);

        let mut saw_wall_line = false;
        while let Ok(line) = lines.try_recv() {
            saw_wall_line |= line.contains("Hit the wall");
        }
        assert!(saw_wall_line);
    }

    #[tokio::test]
    async fn test_end_fires_once() {
        let mut handle = start(fast_config()).unwrap();

        assert!(handle.wait_end().await.is_some());
        // The outcome was already taken
        assert!(handle.wait_end().await.is_none());
    }

    #[tokio::test]
    async fn test_events_stream_terminates_with_collision() {
        let mut handle = start(fast_config()).unwrap();
        let mut events = handle.take_events().unwrap();

        handle.wait_end().await.unwrap();

        let mut received = Vec::new();
        while let Ok(event) = events.try_recv() {
            received.push(event);
        }

        assert!(matches!(
            received.first().map(|e| &e.data),
            Some(GameEventData::ItemSpawned { .. })
        ));
        assert!(received.last().unwrap().is_terminal());
    }

    #[tokio::test]
    async fn test_pause_stops_ticking() {
        let config = GameConfig {
            tick_interval: Duration::from_millis(20),
            rng_seed: 3,
            ..GameConfig::default()
        };
        let handle = start(config).unwrap();

        handle.toggle_pause().unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        let first = handle.snapshot();
        assert_eq!(first.phase, GamePhase::Paused);

        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = handle.snapshot();
        assert_eq!(second.tick, first.tick, "no ticks while paused");

        handle.toggle_pause().unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.snapshot().tick > second.tick, "ticks resume");
    }

    #[tokio::test]
    async fn test_close_is_idempotent_and_input_errors_after() {
        let mut handle = start(fast_config()).unwrap();

        handle.close();
        handle.close();
        assert!(handle.is_closed());

        assert_eq!(
            handle.queue_direction(Direction::Up),
            Err(HandleError::Closed)
        );
        assert_eq!(handle.toggle_pause(), Err(HandleError::Closed));

        // Closed before terminal: no outcome
        assert!(handle.wait_end().await.is_none());
    }

    #[tokio::test]
    async fn test_input_after_terminal_is_silently_ignored() {
        let mut handle = start(fast_config()).unwrap();
        handle.wait_end().await.unwrap();

        // The game is over but not closed: late input is a no-op, not a bug
        assert!(handle.queue_direction(Direction::Up).is_ok());
        assert!(handle.toggle_pause().is_ok());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(handle.snapshot().phase, GamePhase::Lost);
    }

    #[tokio::test]
    async fn test_outcome_trace_replays_to_same_hash() {
        let config = fast_config();
        let mut handle = start(config.clone()).unwrap();

        // Steer a little; whatever the queue accepts lands in the trace
        tokio::time::sleep(Duration::from_millis(12)).await;
        let _ = handle.queue_direction(Direction::Up);
        tokio::time::sleep(Duration::from_millis(12)).await;
        let _ = handle.queue_direction(Direction::Right);

        let outcome = handle.wait_end().await.expect("bounded grid ends the game");

        let (replayed, _) = replay(&config, &outcome.trace, 10_000).unwrap();
        assert_eq!(replayed.compute_hash(), outcome.final_hash);
        assert_eq!(replayed.tick, outcome.end_tick);
    }
}
