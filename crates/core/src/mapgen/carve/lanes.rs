//! Lane carving along jittered polylines with a circular brush.

use serde::{Deserialize, Serialize};

use super::super::floor_plan::FloorPlan;
use super::super::seed::MapRng;
use crate::config::CarveConfig;
use crate::types::{Cell, CellOffset};

/// Endpoints of one carved lane. Endpoints may lie on or beyond the map edge;
/// the brush clips to the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    pub start: Cell,
    pub end: Cell,
}

/// Top, mid and bottom lanes of the arena layout.
pub fn preset_lanes(width: usize, height: usize) -> [Lane; 3] {
    let w = width as i32;
    let h = height as i32;
    let two_thirds = (height as f32 * 2.0 / 3.0).round_ties_even() as i32;
    let one_third = (height as f32 / 3.0).round_ties_even() as i32;
    [
        Lane { start: Cell::new(0, h - 1), end: Cell::new(w - 1, two_thirds) },
        Lane { start: Cell::new(w / 4, 0), end: Cell::new(w / 2, h - 1) },
        Lane { start: Cell::new(w - 1, 0), end: Cell::new(w / 4, one_third) },
    ]
}

/// `segment_count + 1` points: the exact endpoints with jittered interpolated
/// points between them.
fn lane_polyline(
    lane: Lane,
    segment_count: usize,
    random_offset: f32,
    rng: &mut MapRng,
) -> Vec<[f32; 2]> {
    let start = [lane.start.x as f32, lane.start.y as f32];
    let end = [lane.end.x as f32, lane.end.y as f32];

    let mut points = Vec::with_capacity(segment_count + 1);
    points.push(start);
    for index in 1..segment_count {
        let t = index as f32 / segment_count as f32;
        let x = lerp(start[0], end[0], t) + rng.range_f32(-random_offset, random_offset);
        let y = lerp(start[1], end[1], t) + rng.range_f32(-random_offset, random_offset);
        points.push([x, y]);
    }
    points.push(end);
    points
}

/// Carves one lane and returns how many cells it newly opened.
pub fn carve_lane(plan: &mut FloorPlan, rng: &mut MapRng, lane: Lane, config: &CarveConfig) -> usize {
    let points = lane_polyline(lane, config.segment_count, config.random_offset, rng);
    let mut carved = 0;
    for segment in points.windows(2) {
        let radius = rng.range_inclusive(config.min_width, config.max_width);
        carved += carve_segment(plan, segment[0], segment[1], radius);
    }
    carved
}

fn carve_segment(plan: &mut FloorPlan, from: [f32; 2], to: [f32; 2], radius: usize) -> usize {
    let length = (to[0] - from[0]).hypot(to[1] - from[1]);
    let steps = length.ceil() as usize;
    if steps == 0 {
        return carve_disk(plan, nearest_cell(from), radius);
    }

    let mut carved = 0;
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let point = [lerp(from[0], to[0], t), lerp(from[1], to[1], t)];
        carved += carve_disk(plan, nearest_cell(point), radius);
    }
    carved
}

/// Carves every in-bounds cell at offset `(dx, dy)` from `center` with
/// `dx² + dy² <= radius²`.
pub fn carve_disk(plan: &mut FloorPlan, center: Cell, radius: usize) -> usize {
    let r = radius as i32;
    let radius_squared = i64::from(r) * i64::from(r);
    let mut carved = 0;
    for dx in -r..=r {
        for dy in -r..=r {
            let offset = CellOffset::new(dx, dy);
            if offset.length_squared() <= radius_squared && plan.carve_clipped(center.offset(offset))
            {
                carved += 1;
            }
        }
    }
    carved
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn nearest_cell(point: [f32; 2]) -> Cell {
    Cell::new(point[0].round_ties_even() as i32, point[1].round_ties_even() as i32)
}
