//! Corridor carving: random-walk fill and polyline lanes. Carving only ever
//! turns cells walkable.

mod lanes;
mod walk;

pub use lanes::{Lane, carve_disk, carve_lane, preset_lanes};
pub use walk::{drunkards_walk, walk_target};

use log::debug;

use super::floor_plan::FloorPlan;
use super::seed::MapRng;
use crate::config::CarveConfig;
use crate::error::MapGenError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CarveSummary {
    pub lanes: usize,
    pub lane_cells: usize,
    pub walk_iterations: usize,
}

pub fn carve_corridors(
    plan: &mut FloorPlan,
    rng: &mut MapRng,
    config: &CarveConfig,
) -> Result<CarveSummary, MapGenError> {
    let mut summary = CarveSummary::default();

    if config.policy.carves_lanes() {
        for lane in config.lanes_for(plan.grid().width(), plan.grid().height()) {
            summary.lane_cells += carve_lane(plan, rng, lane, config);
            summary.lanes += 1;
        }
        debug!("carved {} lanes covering {} cells", summary.lanes, summary.lane_cells);
    }

    if config.policy.fills() {
        summary.walk_iterations = drunkards_walk(plan, rng, config)?;
        debug!(
            "random walk finished after {} iterations with {} walkable cells",
            summary.walk_iterations,
            plan.walkable_count()
        );
    }

    Ok(summary)
}
