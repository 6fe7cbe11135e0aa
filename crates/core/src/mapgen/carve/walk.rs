//! Drunkard's-walk corridor fill.

use super::super::floor_plan::FloorPlan;
use super::super::seed::MapRng;
use crate::config::CarveConfig;
use crate::error::MapGenError;
use crate::types::{Cell, CellOffset, Direction};

const TELEPORT_CHANCE: f32 = 0.3;
const MIN_CORRIDOR_LENGTH: usize = 3;
const MAX_CORRIDOR_LENGTH: usize = 10;

/// Float noise below this is ignored when rounding the target up.
const TARGET_EPSILON: f64 = 1e-9;

/// Walkable cells needed before the walk may stop: `ceil(fraction × area)`.
pub fn walk_target(area: usize, fraction: f64) -> usize {
    let exact = area as f64 * fraction;
    ((exact - TARGET_EPSILON).ceil().max(0.0) as usize).min(area)
}

/// Carves random-direction corridors from the map centre until the walkable
/// share reaches `config.target_fraction`. Returns the number of corridors.
pub fn drunkards_walk(
    plan: &mut FloorPlan,
    rng: &mut MapRng,
    config: &CarveConfig,
) -> Result<usize, MapGenError> {
    let width = plan.grid().width();
    let height = plan.grid().height();
    let target = walk_target(plan.grid().area(), config.target_fraction);

    let start = Cell::new((width / 2) as i32, (height / 2) as i32);
    plan.carve(start)?;

    let mut position = start;
    let mut iterations = 0;
    while plan.walkable_count() < target {
        if iterations >= config.max_iterations {
            return Err(MapGenError::CarveBudgetExhausted {
                iterations,
                walkable: plan.walkable_count(),
                target,
            });
        }
        iterations += 1;

        let direction = Direction::ALL[rng.below(Direction::ALL.len())];
        let corridor_width = rng.range_inclusive(config.min_width, config.max_width);
        let length = rng.range(MIN_CORRIDOR_LENGTH, MAX_CORRIDOR_LENGTH);

        for _ in 0..length {
            let next = position.step(direction);
            if !plan.grid().contains(next) {
                position = teleport(plan, rng)?;
                break;
            }
            position = next;
            carve_band(plan, position, direction, corridor_width);
        }

        if rng.chance(TELEPORT_CHANCE) {
            position = teleport(plan, rng)?;
        }
    }

    Ok(iterations)
}

fn teleport(plan: &FloorPlan, rng: &mut MapRng) -> Result<Cell, MapGenError> {
    plan.registry().sample(rng).ok_or(MapGenError::EmptyFloorRegistry)
}

/// Carves `band_width` cells across the direction of travel, centred on `center`.
fn carve_band(plan: &mut FloorPlan, center: Cell, direction: Direction, band_width: usize) {
    let across = direction.perpendicular();
    let first = -((band_width as i32 - 1) / 2);
    for shift in first..first + band_width as i32 {
        plan.carve_clipped(center.offset(CellOffset::new(across.dx * shift, across.dy * shift)));
    }
}
