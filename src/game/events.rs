//! Game Events
//!
//! Typed events generated during simulation. Hosts render these however
//! they like; `log_lines` provides the canonical terminal copy, each line
//! paired with the dedupe key the outcome reporter uses.

use serde::{Deserialize, Serialize};

use crate::core::grid::Position;
use crate::game::catalog::{Collectible, ItemCategory};

/// Event payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A new collectible was placed on the playfield.
    ItemSpawned {
        /// Template label.
        label: String,
        /// Playfield glyph.
        glyph: String,
        /// Interior cell it occupies.
        position: Position,
    },

    /// The actor moved onto the live collectible.
    ItemCollected {
        /// Template label.
        label: String,
        /// Playfield glyph.
        glyph: String,
        /// Announcement category.
        category: ItemCategory,
        /// Score after this collection (equals the collected count).
        new_score: u32,
    },

    /// The actor stepped outside the playfield.
    WallCollision {
        /// The off-grid cell the actor tried to enter.
        attempted: Position,
    },

    /// The actor stepped onto its own body.
    SelfCollision {
        /// The occupied cell the actor tried to enter.
        attempted: Position,
    },

    /// The win threshold was reached.
    GameWon {
        /// Final score.
        score: u32,
        /// Labels of everything collected, in collection order.
        collected: Vec<String>,
    },
}

/// A game event with the tick it occurred on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Completed ticks when the event fired.
    pub tick: u64,
    /// Event payload.
    pub data: GameEventData,
}

impl GameEvent {
    /// Create an item-spawned event.
    pub fn item_spawned(tick: u64, item: &Collectible) -> Self {
        Self {
            tick,
            data: GameEventData::ItemSpawned {
                label: item.label.clone(),
                glyph: item.glyph.clone(),
                position: item.position,
            },
        }
    }

    /// Create an item-collected event.
    pub fn item_collected(tick: u64, item: &Collectible, new_score: u32) -> Self {
        Self {
            tick,
            data: GameEventData::ItemCollected {
                label: item.label.clone(),
                glyph: item.glyph.clone(),
                category: item.category,
                new_score,
            },
        }
    }

    /// Create a wall-collision event.
    pub fn wall_collision(tick: u64, attempted: Position) -> Self {
        Self {
            tick,
            data: GameEventData::WallCollision { attempted },
        }
    }

    /// Create a self-collision event.
    pub fn self_collision(tick: u64, attempted: Position) -> Self {
        Self {
            tick,
            data: GameEventData::SelfCollision { attempted },
        }
    }

    /// Create a game-won event.
    pub fn game_won(tick: u64, score: u32, collected: Vec<String>) -> Self {
        Self {
            tick,
            data: GameEventData::GameWon { score, collected },
        }
    }

    /// Whether this event marks a terminal transition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.data,
            GameEventData::WallCollision { .. }
                | GameEventData::SelfCollision { .. }
                | GameEventData::GameWon { .. }
        )
    }

    /// Terminal-log copy for this event as `(dedupe_key, line)` pairs.
    ///
    /// Spawn events are render-only and produce no lines. The victory
    /// banner is several lines, each with its own key so the reporter
    /// emits the banner at most once as a whole.
    pub fn log_lines(&self) -> Vec<(String, String)> {
        match &self.data {
            GameEventData::ItemSpawned { .. } => Vec::new(),

            GameEventData::ItemCollected {
                label,
                glyph,
                category,
                ..
            } => {
                let (key, line) = match category {
                    ItemCategory::Primary => (
                        format!("tech-{label}"),
                        format!("{glyph} {label} mastered! Technical capabilities expanded."),
                    ),
                    ItemCategory::Secondary => (
                        format!("exp-{label}"),
                        format!("⭐ {label} achievement unlocked! Professional experience recognized."),
                    ),
                };
                vec![(key, line)]
            }

            GameEventData::WallCollision { .. } => vec![(
                "lost-wall".to_string(),
                "💥 Stack Overflow! Hit the wall. Game Over.".to_string(),
            )],

            GameEventData::SelfCollision { .. } => vec![(
                "lost-self".to_string(),
                "💥 Stack Overflow! Collided with your own stack. Game Over.".to_string(),
            )],

            GameEventData::GameWon { score, collected } => {
                let lines = [
                    String::new(),
                    "╔═══════════════════════════════════════════════════╗".to_string(),
                    "║    🏆 PRODUCTION READY - Full Stack Achieved! 🏆    ║".to_string(),
                    "╚═══════════════════════════════════════════════════╝".to_string(),
                    String::new(),
                    format!("💼 {score} items collected: {}", collected.join(", ")),
                    String::new(),
                ];
                lines
                    .into_iter()
                    .enumerate()
                    .map(|(i, line)| (format!("victory-{}", i + 1), line))
                    .collect()
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::ItemTemplate;

    fn item(label: &str, category: ItemCategory) -> Collectible {
        Collectible::from_template(
            &ItemTemplate::new(label, category, "☕"),
            Position::new(3, 3),
        )
    }

    #[test]
    fn test_collection_keys_by_category() {
        let tech = GameEvent::item_collected(1, &item("Java", ItemCategory::Primary), 1);
        let exp = GameEvent::item_collected(2, &item("Team Lead", ItemCategory::Secondary), 2);

        assert_eq!(tech.log_lines()[0].0, "tech-Java");
        assert_eq!(exp.log_lines()[0].0, "exp-Team Lead");
    }

    #[test]
    fn test_spawn_produces_no_lines() {
        let spawn = GameEvent::item_spawned(0, &item("Java", ItemCategory::Primary));
        assert!(spawn.log_lines().is_empty());
        assert!(!spawn.is_terminal());
    }

    #[test]
    fn test_victory_banner_keys_are_distinct() {
        let won = GameEvent::game_won(42, 7, vec!["Java".into(), "SQL".into()]);
        let lines = won.log_lines();

        assert!(lines.len() >= 5);
        let mut keys: Vec<_> = lines.iter().map(|(k, _)| k.clone()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), lines.len(), "banner keys must be unique");
        assert!(won.is_terminal());
    }

    #[test]
    fn test_collision_events_are_terminal() {
        assert!(GameEvent::wall_collision(1, Position::new(-1, 5)).is_terminal());
        assert!(GameEvent::self_collision(1, Position::new(4, 5)).is_terminal());
    }
}
