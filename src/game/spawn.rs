//! Item Spawning
//!
//! Places the next collectible on a uniformly random interior cell not
//! occupied by the actor.

use crate::core::grid::GridBounds;
use crate::core::rng::DeterministicRng;
use crate::game::catalog::{Collectible, ItemCatalog};
use crate::game::state::ActorBody;

/// Spawn the `spawn_index`-th collectible.
///
/// The cell is sampled uniformly from the interior (never the boundary
/// ring, so items stay reachable and visible) and resampled until it is
/// not occupied by the actor. Resampling terminates because
/// `GameConfig::validate` requires the interior to strictly exceed the
/// maximum body size; a body covering the interior is a defect, not a
/// recoverable condition.
pub fn spawn_collectible(
    bounds: &GridBounds,
    rng: &mut DeterministicRng,
    body: &ActorBody,
    catalog: &ItemCatalog,
    spawn_index: u64,
) -> Collectible {
    assert!(
        (body.len() as u64) < bounds.interior_cells(),
        "actor covers the interior; config validation should have rejected this grid"
    );

    let template = catalog.template(spawn_index);

    let mut position = rng.interior_position(bounds);
    while body.occupies(position) {
        position = rng.interior_position(bounds);
    }

    Collectible::from_template(template, position)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::Position;
    use crate::game::state::ActorBody;

    #[test]
    fn test_spawn_avoids_body() {
        let bounds = GridBounds::new(4, 4);
        let catalog = ItemCatalog::career();
        let mut rng = DeterministicRng::new(99);

        // Occupy 3 of the 4 interior cells of a 4x4 grid
        let mut body = ActorBody::new(Position::new(1, 1));
        body.grow_to(Position::new(2, 1));
        body.grow_to(Position::new(2, 2));

        // Only (1, 2) is free; every spawn must land there
        for i in 0..50 {
            let item = spawn_collectible(&bounds, &mut rng, &body, &catalog, i);
            assert_eq!(item.position, Position::new(1, 2));
        }
    }

    #[test]
    fn test_spawn_is_interior() {
        let bounds = GridBounds::new(40, 12);
        let catalog = ItemCatalog::career();
        let mut rng = DeterministicRng::new(7);
        let body = ActorBody::new(bounds.center());

        for i in 0..500 {
            let item = spawn_collectible(&bounds, &mut rng, &body, &catalog, i);
            assert!(bounds.is_interior(item.position));
            assert!(!body.occupies(item.position));
        }
    }

    #[test]
    fn test_spawn_cycles_catalog() {
        let bounds = GridBounds::new(40, 12);
        let catalog = ItemCatalog::career();
        let mut rng = DeterministicRng::new(7);
        let body = ActorBody::new(bounds.center());

        let first = spawn_collectible(&bounds, &mut rng, &body, &catalog, 0);
        let wrapped = spawn_collectible(&bounds, &mut rng, &body, &catalog, 7);
        assert_eq!(first.label, wrapped.label);
    }

    #[test]
    #[should_panic(expected = "actor covers the interior")]
    fn test_spawn_panics_on_full_interior() {
        let bounds = GridBounds::new(3, 3);
        let catalog = ItemCatalog::career();
        let mut rng = DeterministicRng::new(1);
        let body = ActorBody::new(Position::new(1, 1));

        spawn_collectible(&bounds, &mut rng, &body, &catalog, 0);
    }
}
