//! Generation stages run in order by the map generator.

use log::{debug, warn};

use super::super::carve::carve_corridors;
use super::super::floor_plan::FloorPlan;
use super::super::grid::Grid;
use super::super::model::{PlacementIssue, PlacementStage, SpawnOutcome, TeamSpawn};
use super::super::obstacles::{enforce_border, scatter_noise_obstacles, scatter_uniform_walls};
use super::super::placement::{
    PlacementRequest, pick_spawn, place_companion, place_constrained,
};
use super::super::registry::FloorRegistry;
use super::super::seed::MapRng;
use crate::config::{GeneratorConfig, PlacementConfig, TeamConfig};
use crate::error::MapGenError;
use crate::types::{Cell, Team};

pub(super) fn shape_floor(
    config: &GeneratorConfig,
    rng: &mut MapRng,
) -> Result<FloorPlan, MapGenError> {
    let mut plan = FloorPlan::new(config.width, config.height);
    carve_corridors(&mut plan, rng, &config.carve)?;
    debug_assert!(plan.is_consistent());

    if config.enforce_border {
        let removed = enforce_border(&mut plan)?;
        debug!("border enforcement removed {removed} floor cells");
    }
    if let Some(obstacles) = &config.obstacles {
        let removed = scatter_noise_obstacles(&mut plan, rng, obstacles)?;
        debug!("noise scatter placed {removed} obstacles");
    }
    if let Some(walls) = &config.uniform_walls {
        let removed = scatter_uniform_walls(&mut plan, rng, walls)?;
        debug!("uniform scatter placed {removed} walls");
    }
    debug_assert!(plan.is_consistent());

    if plan.registry().is_empty() {
        return Err(MapGenError::EmptyFloorRegistry);
    }
    Ok(plan)
}

pub(super) struct Placements {
    pub(super) spawn: SpawnOutcome,
    pub(super) objects: Vec<Cell>,
    pub(super) teams: Vec<TeamSpawn>,
    pub(super) issues: Vec<PlacementIssue>,
}

pub(super) fn plan_placements(
    grid: &Grid,
    registry: &FloorRegistry,
    rng: &mut MapRng,
    config: &PlacementConfig,
    existing_player: Option<Cell>,
) -> Result<Placements, MapGenError> {
    let spawn = pick_spawn(registry, rng, existing_player)?;
    let mut issues = Vec::new();

    let objects = if config.object_count == 0 {
        Vec::new()
    } else {
        let request = PlacementRequest {
            count: config.object_count,
            clear_radius: config.clear_radius,
            min_separation: config.min_separation,
            shape: config.clear_shape,
        };
        // Objects never share the player's spawn cell, unlike the bare
        // placement rule, which only separates objects from each other.
        match place_constrained(grid, registry, rng, &request, &[spawn.cell()]) {
            Ok(objects) => objects,
            Err(error) => {
                record_issue(&mut issues, PlacementStage::Objects, error);
                Vec::new()
            }
        }
    };

    let teams = match &config.teams {
        Some(team_config) => {
            let mut occupied = objects.clone();
            occupied.push(spawn.cell());
            place_teams(grid, registry, rng, config, team_config, &mut occupied, &mut issues)
        }
        None => Vec::new(),
    };

    Ok(Placements { spawn, objects, teams, issues })
}

fn place_teams(
    grid: &Grid,
    registry: &FloorRegistry,
    rng: &mut MapRng,
    config: &PlacementConfig,
    team_config: &TeamConfig,
    occupied: &mut Vec<Cell>,
    issues: &mut Vec<PlacementIssue>,
) -> Vec<TeamSpawn> {
    let request = PlacementRequest {
        count: Team::ALL.len(),
        clear_radius: team_config.clear_radius,
        min_separation: team_config.min_separation,
        shape: config.clear_shape,
    };
    let bases = match place_constrained(grid, registry, rng, &request, occupied) {
        Ok(bases) => bases,
        Err(error) => {
            record_issue(issues, PlacementStage::TeamBases, error);
            return Vec::new();
        }
    };
    occupied.extend(&bases);

    let mut teams = Vec::with_capacity(bases.len());
    for (team, base) in Team::ALL.into_iter().zip(bases) {
        let companion = team_config.companion_offset.and_then(|offset| {
            match place_companion(grid, base, offset, occupied) {
                Ok(cell) => {
                    occupied.push(cell);
                    Some(cell)
                }
                Err(error) => {
                    record_issue(issues, PlacementStage::Companion(team), error);
                    None
                }
            }
        });
        teams.push(TeamSpawn { team, base, companion });
    }
    teams
}

fn record_issue(issues: &mut Vec<PlacementIssue>, stage: PlacementStage, error: MapGenError) {
    warn!("skipping {stage:?} placement: {error}");
    issues.push(PlacementIssue { stage, error });
}
