//! Outcome Reporter
//!
//! Forwards human-readable log lines to the host's scrollback, emitting
//! each dedupe key at most once per game instance: a host that reports
//! the same transition twice still sees a single announcement.

use std::collections::BTreeSet;

use tokio::sync::mpsc;

use crate::game::events::GameEvent;

/// Deduplicating one-shot log emitter for one game instance.
pub struct OutcomeReporter {
    seen: BTreeSet<String>,
    sink: mpsc::UnboundedSender<String>,
}

impl OutcomeReporter {
    /// Create a reporter forwarding to `sink`.
    pub fn new(sink: mpsc::UnboundedSender<String>) -> Self {
        Self {
            seen: BTreeSet::new(),
            sink,
        }
    }

    /// Forward `line` to the sink unless `key` was already emitted.
    /// Returns whether the line was forwarded.
    ///
    /// A dropped sink receiver is treated like a detached scrollback: the
    /// line is counted as emitted and the send error ignored.
    pub fn emit_once(&mut self, key: &str, line: &str) -> bool {
        if !self.seen.insert(key.to_string()) {
            return false;
        }
        let _ = self.sink.send(line.to_string());
        true
    }

    /// Emit every log line of `event`, each at most once.
    pub fn report(&mut self, event: &GameEvent) {
        for (key, line) in event.log_lines() {
            self.emit_once(&key, &line);
        }
    }

    /// Number of distinct keys emitted so far.
    pub fn emitted_count(&self) -> usize {
        self.seen.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::Position;
    use crate::game::catalog::{Collectible, ItemCategory, ItemTemplate};

    fn collected_event(label: &str) -> GameEvent {
        let item = Collectible::from_template(
            &ItemTemplate::new(label, ItemCategory::Primary, "☕"),
            Position::new(3, 3),
        );
        GameEvent::item_collected(1, &item, 1)
    }

    #[test]
    fn test_emit_once_dedupes_by_key() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut reporter = OutcomeReporter::new(tx);

        assert!(reporter.emit_once("k", "first"));
        assert!(!reporter.emit_once("k", "second"));

        assert_eq!(rx.try_recv().unwrap(), "first");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_reporting_same_collection_twice_logs_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut reporter = OutcomeReporter::new(tx);

        let event = collected_event("Java");
        reporter.report(&event);
        reporter.report(&event);

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
        assert_eq!(reporter.emitted_count(), 1);
    }

    #[test]
    fn test_distinct_items_each_log() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut reporter = OutcomeReporter::new(tx);

        reporter.report(&collected_event("Java"));
        reporter.report(&collected_event("Python"));

        assert!(rx.try_recv().unwrap().contains("Java"));
        assert!(rx.try_recv().unwrap().contains("Python"));
    }

    #[test]
    fn test_victory_banner_emitted_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut reporter = OutcomeReporter::new(tx);

        let won = GameEvent::game_won(10, 7, vec!["Java".into()]);
        let banner_lines = won.log_lines().len();

        reporter.report(&won);
        reporter.report(&won);

        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, banner_lines);
    }

    #[test]
    fn test_dropped_sink_is_tolerated() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut reporter = OutcomeReporter::new(tx);

        // No panic, key still counted
        assert!(reporter.emit_once("k", "line"));
        assert!(!reporter.emit_once("k", "line"));
    }
}
