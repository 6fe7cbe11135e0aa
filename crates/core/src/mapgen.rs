//! Procedural arena map generation split into coherent submodules.

pub mod model;

mod carve;
mod floor_plan;
mod generator;
mod grid;
mod obstacles;
mod placement;
mod registry;
mod seed;

pub use carve::{
    CarveSummary, Lane, carve_corridors, carve_disk, carve_lane, drunkards_walk, preset_lanes,
    walk_target,
};
pub use floor_plan::FloorPlan;
pub use generator::MapGenerator;
pub use grid::Grid;
pub use model::{GeneratedMap, PlacementIssue, PlacementStage, SpawnOutcome, TeamSpawn};
pub use obstacles::{enforce_border, scatter_noise_obstacles, scatter_uniform_walls};
pub use placement::{
    ClearShape, PlacementRequest, is_clear_area, pick_spawn, place_companion, place_constrained,
};
pub use registry::FloorRegistry;
pub use seed::{MapRng, derive_attempt_seed};

use crate::config::GeneratorConfig;
use crate::error::MapGenError;

/// Generates one map for a fresh session with no existing player.
pub fn generate_map(config: &GeneratorConfig) -> Result<GeneratedMap, MapGenError> {
    MapGenerator::new(config.clone())?.generate(None)
}

#[cfg(test)]
mod tests {
    use super::{GeneratorConfig, MapGenerator};

    #[test]
    fn generate_map_matches_map_generator_output() {
        let config = GeneratorConfig { seed: 123, ..GeneratorConfig::default() };

        let from_helper = super::generate_map(&config).expect("map");
        let from_generator =
            MapGenerator::new(config).expect("valid").generate(None).expect("map");

        assert_eq!(from_helper, from_generator);
    }
}
