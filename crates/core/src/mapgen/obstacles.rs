//! Post-carve passes that only remove floor: solid borders, coherent-noise
//! obstacle clusters, and uniform wall scatter.

use std::ops::Range;

use noise::{NoiseFn, Perlin};

use super::floor_plan::FloorPlan;
use super::seed::MapRng;
use crate::config::{NoiseObstacleConfig, UniformWallConfig};
use crate::error::MapGenError;
use crate::types::Cell;

const NOISE_OFFSET_RANGE: f32 = 10_000.0;

/// Turns every edge cell into an obstacle. Returns how many were floor.
pub fn enforce_border(plan: &mut FloorPlan) -> Result<usize, MapGenError> {
    let border: Vec<Cell> = plan.grid().cells().filter(|&cell| plan.grid().is_border(cell)).collect();
    let mut removed = 0;
    for cell in border {
        if plan.block(cell)? {
            removed += 1;
        }
    }
    Ok(removed)
}

/// Blocks walkable cells inside the centred region whose Perlin value, sampled
/// at a seeded offset, exceeds the threshold.
pub fn scatter_noise_obstacles(
    plan: &mut FloorPlan,
    rng: &mut MapRng,
    config: &NoiseObstacleConfig,
) -> Result<usize, MapGenError> {
    let perlin = Perlin::new(rng.next_u32());
    let offset_x = f64::from(rng.range_f32(0.0, NOISE_OFFSET_RANGE));
    let offset_y = f64::from(rng.range_f32(0.0, NOISE_OFFSET_RANGE));

    let grid = plan.grid();
    let (x_range, y_range) = centred_region(grid.width(), grid.height(), config.margin);
    let mut doomed = Vec::new();
    for y in y_range {
        for x in x_range.clone() {
            let cell = Cell::new(x as i32, y as i32);
            if !grid.walkable_or_false(cell) {
                continue;
            }
            let sample = perlin.get([
                (x as f64 + offset_x) * config.noise_scale,
                (y as f64 + offset_y) * config.noise_scale,
            ]);
            if unit_noise(sample) > config.threshold {
                doomed.push(cell);
            }
        }
    }

    for &cell in &doomed {
        plan.block(cell)?;
    }
    Ok(doomed.len())
}

/// Blocks each walkable cell outside the central third with the configured
/// probability, leaving the middle of the arena open.
pub fn scatter_uniform_walls(
    plan: &mut FloorPlan,
    rng: &mut MapRng,
    config: &UniformWallConfig,
) -> Result<usize, MapGenError> {
    let width = plan.grid().width();
    let height = plan.grid().height();
    let candidates: Vec<Cell> = plan
        .grid()
        .walkable_cells()
        .filter(|&cell| {
            let x = cell.x as usize;
            let y = cell.y as usize;
            x < width / 3 || x > 2 * width / 3 || y < height / 3 || y > 2 * height / 3
        })
        .collect();

    let mut removed = 0;
    for cell in candidates {
        if rng.chance(config.probability) && plan.block(cell)? {
            removed += 1;
        }
    }
    Ok(removed)
}

/// Cells at most `margin` away from the map centre along each axis.
fn centred_region(
    width: usize,
    height: usize,
    margin: usize,
) -> (Range<usize>, Range<usize>) {
    let around = |center: usize, limit: usize| {
        center.saturating_sub(margin)..center.saturating_add(margin).saturating_add(1).min(limit)
    };
    (around(width / 2, width), around(height / 2, height))
}

/// Perlin output mapped from roughly `[-1, 1]` onto `[0, 1]`.
fn unit_noise(sample: f64) -> f64 {
    ((sample + 1.0) * 0.5).clamp(0.0, 1.0)
}
