//! Spawn and object placement over a finished grid.

use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::model::SpawnOutcome;
use super::registry::FloorRegistry;
use super::seed::MapRng;
use crate::error::MapGenError;
use crate::types::{Cell, CellOffset};

/// Neighbourhood that must be fully walkable around a placed object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearShape {
    /// `(2r + 1)²` square.
    Square,
    /// Cells with `dx² + dy² <= r²`.
    Circle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementRequest {
    pub count: usize,
    pub clear_radius: usize,
    pub min_separation: f64,
    pub shape: ClearShape,
}

/// Whether every cell in the neighbourhood is in bounds and walkable. A
/// neighbourhood overhanging the map edge disqualifies the candidate.
pub fn is_clear_area(grid: &Grid, center: Cell, radius: usize, shape: ClearShape) -> bool {
    let r = radius as i32;
    let radius_squared = i64::from(r) * i64::from(r);
    for dx in -r..=r {
        for dy in -r..=r {
            let offset = CellOffset::new(dx, dy);
            if shape == ClearShape::Circle && offset.length_squared() > radius_squared {
                continue;
            }
            if !grid.walkable_or_false(center.offset(offset)) {
                return false;
            }
        }
    }
    true
}

/// Picks a uniformly random floor cell for the player, relocating an existing
/// player marker when one is given.
pub fn pick_spawn(
    registry: &FloorRegistry,
    rng: &mut MapRng,
    existing_player: Option<Cell>,
) -> Result<SpawnOutcome, MapGenError> {
    let cell = registry.sample(rng).ok_or(MapGenError::EmptyFloorRegistry)?;
    Ok(match existing_player {
        Some(from) => SpawnOutcome::Relocated { from, to: cell },
        None => SpawnOutcome::Spawned(cell),
    })
}

/// Places `request.count` cells over a shuffled copy of the registry. Each
/// object takes the first candidate, scanning from the front, that is not in
/// `occupied`, has a clear neighbourhood, and keeps `min_separation` to every
/// object already placed by this call.
pub fn place_constrained(
    grid: &Grid,
    registry: &FloorRegistry,
    rng: &mut MapRng,
    request: &PlacementRequest,
    occupied: &[Cell],
) -> Result<Vec<Cell>, MapGenError> {
    if registry.is_empty() {
        return Err(MapGenError::EmptyFloorRegistry);
    }

    let mut candidates = registry.as_slice().to_vec();
    rng.shuffle(&mut candidates);

    let min_separation_squared = request.min_separation * request.min_separation;
    let mut placed: Vec<Cell> = Vec::with_capacity(request.count);
    for _ in 0..request.count {
        let found = candidates.iter().copied().find(|&candidate| {
            !placed.contains(&candidate)
                && !occupied.contains(&candidate)
                && is_clear_area(grid, candidate, request.clear_radius, request.shape)
                && placed.iter().all(|&other| {
                    candidate.distance_squared(other) as f64 >= min_separation_squared
                })
        });
        match found {
            Some(cell) => placed.push(cell),
            None => {
                return Err(MapGenError::NoValidPlacement {
                    requested: request.count,
                    placed: placed.len(),
                });
            }
        }
    }
    Ok(placed)
}

/// Cell at `offset` from `anchor`, if it is walkable and not yet occupied.
pub fn place_companion(
    grid: &Grid,
    anchor: Cell,
    offset: CellOffset,
    occupied: &[Cell],
) -> Result<Cell, MapGenError> {
    let cell = anchor.offset(offset);
    if grid.walkable_or_false(cell) && cell != anchor && !occupied.contains(&cell) {
        Ok(cell)
    } else {
        Err(MapGenError::NoValidPlacement { requested: 1, placed: 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::floor_plan::FloorPlan;

    fn open_interior(width: usize, height: usize) -> FloorPlan {
        let mut plan = FloorPlan::new(width, height);
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                plan.carve(Cell::new(x as i32, y as i32)).expect("in bounds");
            }
        }
        plan
    }

    fn request(count: usize, clear_radius: usize, min_separation: f64) -> PlacementRequest {
        PlacementRequest { count, clear_radius, min_separation, shape: ClearShape::Square }
    }

    #[test]
    fn clear_area_fails_closed_at_the_map_edge() {
        let plan = open_interior(9, 9);
        let grid = plan.grid();
        assert!(is_clear_area(grid, Cell::new(4, 4), 3, ClearShape::Square));
        assert!(!is_clear_area(grid, Cell::new(4, 4), 4, ClearShape::Square));
        assert!(!is_clear_area(grid, Cell::new(1, 4), 1, ClearShape::Square));
        assert!(is_clear_area(grid, Cell::new(1, 4), 0, ClearShape::Square));
    }

    #[test]
    fn circle_shape_ignores_square_corners() {
        let mut plan = FloorPlan::new(7, 7);
        for cell in [(3, 3), (2, 3), (4, 3), (3, 2), (3, 4)] {
            plan.carve(Cell::new(cell.0, cell.1)).expect("in bounds");
        }
        assert!(is_clear_area(plan.grid(), Cell::new(3, 3), 1, ClearShape::Circle));
        assert!(!is_clear_area(plan.grid(), Cell::new(3, 3), 1, ClearShape::Square));
    }

    #[test]
    fn spawn_reports_relocation_of_existing_player() {
        let plan = open_interior(6, 6);
        let mut rng = MapRng::from_seed(1);
        let previous = Cell::new(40, 40);

        let outcome = pick_spawn(plan.registry(), &mut rng, Some(previous)).expect("spawn");
        let SpawnOutcome::Relocated { from, to } = outcome else {
            panic!("expected relocation, got {outcome:?}");
        };
        assert_eq!(from, previous);
        assert!(plan.registry().contains(to));

        let outcome = pick_spawn(plan.registry(), &mut rng, None).expect("spawn");
        assert!(matches!(outcome, SpawnOutcome::Spawned(cell) if plan.registry().contains(cell)));
    }

    #[test]
    fn spawn_on_empty_registry_fails() {
        let registry = FloorRegistry::new(4, 4);
        let mut rng = MapRng::from_seed(1);
        assert_eq!(pick_spawn(&registry, &mut rng, None), Err(MapGenError::EmptyFloorRegistry));
    }

    #[test]
    fn two_objects_respect_min_separation_and_clear_area() {
        let plan = open_interior(30, 30);
        for seed in 0..20 {
            let mut rng = MapRng::from_seed(seed);
            let placed =
                place_constrained(plan.grid(), plan.registry(), &mut rng, &request(2, 2, 10.0), &[])
                    .expect("30x30 has room for two separated objects");
            assert_eq!(placed.len(), 2);
            assert!(placed[0].distance(placed[1]) >= 10.0, "seed={seed}: {placed:?}");
            for &cell in &placed {
                assert!(is_clear_area(plan.grid(), cell, 2, ClearShape::Square));
            }
        }
    }

    #[test]
    fn separation_beyond_map_diagonal_fails_reproducibly() {
        let plan = open_interior(10, 10);
        let attempt = |seed| {
            let mut rng = MapRng::from_seed(seed);
            place_constrained(plan.grid(), plan.registry(), &mut rng, &request(2, 1, 20.0), &[])
        };
        let expected = Err(MapGenError::NoValidPlacement { requested: 2, placed: 1 });
        assert_eq!(attempt(42), expected);
        assert_eq!(attempt(42), expected);
    }

    #[test]
    fn oversized_clear_radius_places_nothing() {
        let plan = open_interior(10, 10);
        let mut rng = MapRng::from_seed(3);
        let result =
            place_constrained(plan.grid(), plan.registry(), &mut rng, &request(1, 5, 0.0), &[]);
        assert_eq!(result, Err(MapGenError::NoValidPlacement { requested: 1, placed: 0 }));
    }

    #[test]
    fn zero_separation_still_places_distinct_cells_and_skips_occupied() {
        let mut plan = FloorPlan::new(5, 5);
        plan.carve(Cell::new(1, 1)).expect("in bounds");
        plan.carve(Cell::new(2, 1)).expect("in bounds");
        let mut rng = MapRng::from_seed(6);

        let result = place_constrained(
            plan.grid(),
            plan.registry(),
            &mut rng,
            &request(2, 0, 0.0),
            &[Cell::new(2, 1)],
        );
        assert_eq!(result, Err(MapGenError::NoValidPlacement { requested: 2, placed: 1 }));

        let placed =
            place_constrained(plan.grid(), plan.registry(), &mut rng, &request(2, 0, 0.0), &[])
                .expect("two distinct cells exist");
        assert_ne!(placed[0], placed[1]);
    }

    #[test]
    fn companion_needs_a_free_walkable_cell() {
        let plan = open_interior(8, 8);
        let offset = CellOffset::new(2, 2);
        assert_eq!(place_companion(plan.grid(), Cell::new(2, 2), offset, &[]), Ok(Cell::new(4, 4)));
        assert!(place_companion(plan.grid(), Cell::new(5, 5), offset, &[]).is_err());
        assert!(place_companion(plan.grid(), Cell::new(2, 2), offset, &[Cell::new(4, 4)]).is_err());
    }
}
