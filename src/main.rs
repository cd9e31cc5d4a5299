//! Stack Hunt Demo
//!
//! Runs a scripted game against the deterministic engine: a simple chase
//! policy steers the actor toward each collectible, the terminal log is
//! printed as it happens, and the finished game is replay-verified from
//! its recorded input trace.

use tokio::sync::mpsc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use stack_hunt::core::rng::derive_game_seed;
use stack_hunt::game::reporter::OutcomeReporter;
use stack_hunt::game::tick::{replay, tick};
use stack_hunt::{Direction, GameConfig, GamePhase, GameState, InputTrace, VERSION};

/// Upper bound on demo length; the chase policy ends games far sooner.
const MAX_DEMO_TICKS: u64 = 10_000;

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Stack Hunt v{}", VERSION);

    let config = GameConfig {
        rng_seed: derive_game_seed(b"demo", 1),
        ..GameConfig::default()
    };
    info!(
        "Grid: {}x{}, win threshold: {}, seed: {}",
        config.bounds.width, config.bounds.height, config.win_threshold, config.rng_seed
    );

    demo_game(&config)?;
    Ok(())
}

/// Run one scripted game and verify it replays to the same final hash.
fn demo_game(config: &GameConfig) -> anyhow::Result<()> {
    info!("=== Starting Demo Game ===");

    let (line_tx, mut line_rx) = mpsc::unbounded_channel();
    let mut reporter = OutcomeReporter::new(line_tx);
    let mut trace = InputTrace::new();

    let mut state = GameState::new(config)?;
    for event in state.take_events() {
        reporter.report(&event);
    }

    for _ in 0..MAX_DEMO_TICKS {
        if let Some(direction) = chase_direction(&state) {
            if direction != state.direction && state.queue_direction(direction) {
                trace.record(state.tick, direction);
            }
        }

        let result = tick(&mut state, config);
        for event in &result.events {
            reporter.report(event);
        }
        while let Ok(line) = line_rx.try_recv() {
            info!("{line}");
        }

        if result.ended {
            break;
        }
    }

    info!("=== Game Results ===");
    match state.phase {
        GamePhase::Won => info!("Outcome: WON in {} ticks", state.tick),
        GamePhase::Lost => info!("Outcome: LOST at tick {}", state.tick),
        phase => warn!("Demo hit the tick cap in phase {phase:?}"),
    }
    info!("Score: {} ({})", state.score, state.collected.join(", "));

    let final_hash = state.compute_hash();
    info!("Final State Hash: {}", hex::encode(final_hash));
    info!(
        "Final snapshot: {}",
        serde_json::to_string(&state.snapshot(config))?
    );

    info!("=== Verifying Determinism ===");
    let (replayed, replay_events) = replay(config, &trace, MAX_DEMO_TICKS)?;
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));
    info!("Replay events: {}", replay_events.len());

    if final_hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        warn!("DETERMINISM FAILURE: Hashes differ!");
    }

    Ok(())
}

/// Pick the next steering direction: close the larger axis gap to the live
/// collectible first, falling back to any direction that is neither a
/// reversal nor an immediate collision.
fn chase_direction(state: &GameState) -> Option<Direction> {
    let item = state.item.as_ref()?;
    let head = state.body.head();
    let dx = item.position.x - head.x;
    let dy = item.position.y - head.y;

    let mut candidates = Vec::with_capacity(6);
    let horizontal = if dx > 0 {
        Some(Direction::Right)
    } else if dx < 0 {
        Some(Direction::Left)
    } else {
        None
    };
    let vertical = if dy > 0 {
        Some(Direction::Down)
    } else if dy < 0 {
        Some(Direction::Up)
    } else {
        None
    };

    if dx.abs() >= dy.abs() {
        candidates.extend(horizontal);
        candidates.extend(vertical);
    } else {
        candidates.extend(vertical);
        candidates.extend(horizontal);
    }
    candidates.extend(Direction::ALL);

    candidates.into_iter().find(|&direction| {
        if direction == state.direction.opposite() {
            return false;
        }
        let next = head.step(direction);
        state.bounds.is_inside(next) && !state.body.occupies(next)
    })
}
