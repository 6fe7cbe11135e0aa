//! High-level map generation orchestration: one validated config in, one
//! finished map out.

mod pipeline;

use log::debug;

use super::model::GeneratedMap;
use super::seed::MapRng;
use crate::config::GeneratorConfig;
use crate::error::MapGenError;
use crate::types::Cell;

pub struct MapGenerator {
    config: GeneratorConfig,
}

impl MapGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, MapGenError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Runs one full generation pass. `existing_player` is the host's current
    /// player cell, if any; the spawn outcome relocates it instead of spawning.
    ///
    /// Fails with [`MapGenError::EmptyFloorRegistry`] when no floor survives
    /// post-processing. Unsatisfiable object or team placements do not fail the
    /// pass; they are listed in [`GeneratedMap::issues`].
    pub fn generate(&self, existing_player: Option<Cell>) -> Result<GeneratedMap, MapGenError> {
        let config = &self.config;
        let mut rng = MapRng::from_seed(config.seed);

        let plan = pipeline::shape_floor(config, &mut rng)?;
        let (grid, registry) = plan.into_parts();
        debug!(
            "seed {} produced {} floor cells on a {}x{} grid",
            config.seed,
            registry.len(),
            grid.width(),
            grid.height()
        );

        let placements = pipeline::plan_placements(
            &grid,
            &registry,
            &mut rng,
            &config.placement,
            existing_player,
        )?;

        Ok(GeneratedMap {
            seed: config.seed,
            grid,
            floor_cells: registry.into_cells(),
            spawn: placements.spawn,
            objects: placements.objects,
            teams: placements.teams,
            issues: placements.issues,
        })
    }
}
