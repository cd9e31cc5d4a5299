//! Directional Input
//!
//! The buffered move queue consumed by the tick engine, and the input trace
//! recorded for replay verification.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::grid::Direction;

// =============================================================================
// MOVE QUEUE
// =============================================================================

/// Order-preserving FIFO of pending move intents.
///
/// Producers append via `enqueue`; the tick engine is the sole consumer and
/// pops at most one entry per tick. A candidate that would reverse the
/// effective pending direction (the last queued entry, or the actor's
/// current direction when the queue is empty) is silently dropped: an
/// in-place reversal is an unconditional self-collision at body length >= 2.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MoveQueue {
    pending: VecDeque<Direction>,
}

impl MoveQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `candidate`, unless it reverses the effective pending
    /// direction. Returns whether the entry was accepted.
    ///
    /// Rejection is a silent no-op by design: real-time controls want
    /// best-effort input, not errors.
    pub fn enqueue(&mut self, candidate: Direction, current: Direction) -> bool {
        let effective = self.pending.back().copied().unwrap_or(current);
        if candidate == effective.opposite() {
            return false;
        }
        self.pending.push_back(candidate);
        true
    }

    /// Pop the oldest entry, or fall back to `current` when empty.
    ///
    /// The tick engine calls this exactly once per tick.
    pub fn dequeue_or(&mut self, current: Direction) -> Direction {
        self.pending.pop_front().unwrap_or(current)
    }

    /// Number of buffered entries.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no entries are buffered.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Buffered entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = Direction> + '_ {
        self.pending.iter().copied()
    }
}

// =============================================================================
// INPUT TRACE
// =============================================================================

/// One accepted direction, tagged with the tick count at enqueue time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Completed ticks when the direction was enqueued.
    pub tick: u64,
    /// The accepted direction.
    pub direction: Direction,
}

/// Complete input recording for one game.
///
/// Only directions the queue accepted are recorded; rejected reversals
/// never influenced the simulation and would be noise in a replay. Feeding
/// the trace back through `replay` with the same config reproduces the
/// game exactly.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InputTrace {
    entries: Vec<TraceEntry>,
}

impl InputTrace {
    /// Create an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted direction at `tick` completed ticks.
    ///
    /// # Panics
    ///
    /// Debug-asserts that ticks are non-decreasing; out-of-order entries
    /// indicate a recording bug, not a gameplay condition.
    pub fn record(&mut self, tick: u64, direction: Direction) {
        debug_assert!(
            self.entries.last().is_none_or(|e| e.tick <= tick),
            "trace ticks must be non-decreasing"
        );
        self.entries.push(TraceEntry { tick, direction });
    }

    /// All entries in record order.
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_enqueue_rejects_reversal_of_current() {
        let mut queue = MoveQueue::new();

        // Queue empty, actor moving Up: Down is an in-place reversal
        assert!(!queue.enqueue(Direction::Down, Direction::Up));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_enqueue_rejects_reversal_of_pending() {
        let mut queue = MoveQueue::new();

        assert!(queue.enqueue(Direction::Up, Direction::Up));
        // Opposite of the pending Up, not of the current direction
        assert!(!queue.enqueue(Direction::Down, Direction::Up));

        let queued: Vec<_> = queue.entries().collect();
        assert_eq!(queued, vec![Direction::Up]);
    }

    #[test]
    fn test_enqueue_allows_turns() {
        let mut queue = MoveQueue::new();

        assert!(queue.enqueue(Direction::Up, Direction::Right));
        assert!(queue.enqueue(Direction::Left, Direction::Right));
        // Two-step reversal is legal: Right -> Up -> Left
        let queued: Vec<_> = queue.entries().collect();
        assert_eq!(queued, vec![Direction::Up, Direction::Left]);
    }

    #[test]
    fn test_dequeue_order_and_fallback() {
        let mut queue = MoveQueue::new();

        queue.enqueue(Direction::Up, Direction::Right);
        queue.enqueue(Direction::Left, Direction::Right);

        assert_eq!(queue.dequeue_or(Direction::Right), Direction::Up);
        assert_eq!(queue.dequeue_or(Direction::Right), Direction::Left);
        // Starved queue falls back to the current direction
        assert_eq!(queue.dequeue_or(Direction::Left), Direction::Left);
    }

    #[test]
    fn test_trace_records_in_order() {
        let mut trace = InputTrace::new();
        trace.record(0, Direction::Up);
        trace.record(0, Direction::Left);
        trace.record(3, Direction::Down);

        assert_eq!(trace.len(), 3);
        assert_eq!(trace.entries()[1].direction, Direction::Left);
        assert_eq!(trace.entries()[2].tick, 3);
    }

    fn arb_direction() -> impl Strategy<Value = Direction> {
        prop::sample::select(Direction::ALL.to_vec())
    }

    proptest! {
        /// No two consecutive queued entries are opposites, and the first
        /// queued entry never reverses the current direction.
        #[test]
        fn prop_queue_never_holds_reversals(
            current in arb_direction(),
            candidates in prop::collection::vec(arb_direction(), 0..64),
        ) {
            let mut queue = MoveQueue::new();
            for candidate in candidates {
                queue.enqueue(candidate, current);
            }

            let queued: Vec<_> = queue.entries().collect();
            if let Some(first) = queued.first() {
                prop_assert_ne!(*first, current.opposite());
            }
            for pair in queued.windows(2) {
                prop_assert_ne!(pair[1], pair[0].opposite());
            }
        }
    }
}
