//! Item Catalog
//!
//! Templates for the collectibles the actor hunts, and the live collectible
//! itself. Templates are consumed cyclically: the Nth spawn uses template
//! `N mod len`, so a catalog shorter than the win threshold simply repeats.

use serde::{Deserialize, Serialize};

use crate::core::grid::Position;

// =============================================================================
// CATEGORY
// =============================================================================

/// Category of a collectible.
///
/// Categories only affect how a collection is announced; the simulation
/// treats both identically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ItemCategory {
    /// A technical skill ("tech" in the host UI).
    Primary = 0,
    /// A professional achievement ("experience" in the host UI).
    Secondary = 1,
}

// =============================================================================
// TEMPLATE & CATALOG
// =============================================================================

/// A collectible template: everything but the spawn position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTemplate {
    /// Display name, also the dedupe key for collection announcements.
    pub label: String,
    /// Announcement category.
    pub category: ItemCategory,
    /// Single glyph shown on the playfield.
    pub glyph: String,
}

impl ItemTemplate {
    /// Create a template.
    pub fn new(label: impl Into<String>, category: ItemCategory, glyph: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            category,
            glyph: glyph.into(),
        }
    }
}

/// Fixed, ordered sequence of item templates.
///
/// Emptiness is rejected by `GameConfig::validate`; the accessors here
/// assume a validated catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCatalog {
    templates: Vec<ItemTemplate>,
}

impl ItemCatalog {
    /// Build a catalog from templates, in spawn order.
    pub fn new(templates: Vec<ItemTemplate>) -> Self {
        Self { templates }
    }

    /// The default career catalog: five technical skills and two
    /// professional achievements.
    pub fn career() -> Self {
        Self::new(vec![
            ItemTemplate::new("Java", ItemCategory::Primary, "☕"),
            ItemTemplate::new("Node.js", ItemCategory::Primary, "🟢"),
            ItemTemplate::new("Python", ItemCategory::Primary, "🐍"),
            ItemTemplate::new("SQL", ItemCategory::Primary, "🗄️"),
            ItemTemplate::new("React", ItemCategory::Primary, "⚛️"),
            ItemTemplate::new("Team Lead", ItemCategory::Secondary, "⭐"),
            ItemTemplate::new("CS Degree", ItemCategory::Secondary, "🎓"),
        ])
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the catalog holds no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Template for the `spawn_index`-th collectible (cyclic).
    ///
    /// # Panics
    ///
    /// Panics on an empty catalog; `GameConfig::validate` rules that out.
    pub fn template(&self, spawn_index: u64) -> &ItemTemplate {
        assert!(!self.templates.is_empty(), "item catalog must not be empty");
        let idx = (spawn_index % self.templates.len() as u64) as usize;
        &self.templates[idx]
    }

    /// All templates, in spawn order.
    pub fn templates(&self) -> &[ItemTemplate] {
        &self.templates
    }
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self::career()
    }
}

// =============================================================================
// LIVE COLLECTIBLE
// =============================================================================

/// A spawned collectible on the playfield. At most one exists at a time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collectible {
    /// Cell the collectible occupies, always interior.
    pub position: Position,
    /// Category, copied from the template.
    pub category: ItemCategory,
    /// Display name, copied from the template.
    pub label: String,
    /// Playfield glyph, copied from the template.
    pub glyph: String,
}

impl Collectible {
    /// Instantiate a template at a position.
    pub fn from_template(template: &ItemTemplate, position: Position) -> Self {
        Self {
            position,
            category: template.category,
            label: template.label.clone(),
            glyph: template.glyph.clone(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_career_catalog_shape() {
        let catalog = ItemCatalog::career();

        assert_eq!(catalog.len(), 7);
        assert_eq!(
            catalog
                .templates()
                .iter()
                .filter(|t| t.category == ItemCategory::Primary)
                .count(),
            5
        );
        assert_eq!(
            catalog
                .templates()
                .iter()
                .filter(|t| t.category == ItemCategory::Secondary)
                .count(),
            2
        );
    }

    #[test]
    fn test_cyclic_template_selection() {
        let catalog = ItemCatalog::career();

        assert_eq!(catalog.template(0).label, "Java");
        assert_eq!(catalog.template(6).label, "CS Degree");
        // Wraps around
        assert_eq!(catalog.template(7).label, "Java");
        assert_eq!(catalog.template(15).label, "Node.js");
    }

    #[test]
    fn test_collectible_from_template() {
        let template = ItemTemplate::new("Rust", ItemCategory::Primary, "🦀");
        let item = Collectible::from_template(&template, Position::new(3, 4));

        assert_eq!(item.position, Position::new(3, 4));
        assert_eq!(item.label, "Rust");
        assert_eq!(item.category, ItemCategory::Primary);
        assert_eq!(item.glyph, "🦀");
    }
}
