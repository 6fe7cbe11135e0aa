//! Generator configuration: serde-backed, file-loadable, validated before use.
//!
//! Files ending in `.toml` are parsed as TOML, everything else as JSON. Every
//! section has defaults, so a config file only needs the keys it changes.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::MapGenError;
use crate::mapgen::{ClearShape, Lane, preset_lanes};
use crate::types::CellOffset;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarvePolicy {
    /// Random-walk corridors until the floor fraction is reached.
    DrunkardsWalk,
    /// Only the configured lanes.
    Lanes,
    /// Lanes first, then random-walk fill up to the floor fraction.
    LanesWithFill,
}

impl CarvePolicy {
    pub fn carves_lanes(self) -> bool {
        matches!(self, Self::Lanes | Self::LanesWithFill)
    }

    pub fn fills(self) -> bool {
        matches!(self, Self::DrunkardsWalk | Self::LanesWithFill)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarveConfig {
    pub policy: CarvePolicy,
    /// Smallest corridor width (walk) or brush radius (lanes).
    pub min_width: usize,
    pub max_width: usize,
    /// Walk stops once this share of all cells is walkable.
    pub target_fraction: f64,
    pub max_iterations: usize,
    /// Segments in each lane polyline.
    pub segment_count: usize,
    /// Jitter amplitude applied per axis to interior polyline points.
    pub random_offset: f32,
    /// Carve the top, mid and bottom lanes derived from the map size.
    pub preset_lanes: bool,
    pub lanes: Vec<Lane>,
}

impl Default for CarveConfig {
    fn default() -> Self {
        Self {
            policy: CarvePolicy::Lanes,
            min_width: 3,
            max_width: 5,
            target_fraction: 0.4,
            max_iterations: 100_000,
            segment_count: 20,
            random_offset: 3.0,
            preset_lanes: true,
            lanes: Vec::new(),
        }
    }
}

impl CarveConfig {
    /// Lanes to carve on a `width × height` map, presets first.
    pub fn lanes_for(&self, width: usize, height: usize) -> Vec<Lane> {
        let mut lanes = Vec::with_capacity(3 + self.lanes.len());
        if self.preset_lanes {
            lanes.extend(preset_lanes(width, height));
        }
        lanes.extend(self.lanes.iter().copied());
        lanes
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseObstacleConfig {
    /// Half extent of the centred region that receives obstacles.
    pub margin: usize,
    pub noise_scale: f64,
    /// Cells whose noise value (in `[0, 1]`) exceeds this become obstacles.
    pub threshold: f64,
}

impl Default for NoiseObstacleConfig {
    fn default() -> Self {
        Self { margin: 10, noise_scale: 0.15, threshold: 0.62 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniformWallConfig {
    /// Chance for each walkable cell outside the central third to become a wall.
    pub probability: f32,
}

impl Default for UniformWallConfig {
    fn default() -> Self {
        Self { probability: 0.3 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamConfig {
    pub clear_radius: usize,
    pub min_separation: f64,
    pub companion_offset: Option<CellOffset>,
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self { clear_radius: 1, min_separation: 15.0, companion_offset: Some(CellOffset::new(2, 2)) }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub object_count: usize,
    pub clear_radius: usize,
    pub min_separation: f64,
    pub clear_shape: ClearShape,
    /// Places a blue and a red team base when set.
    pub teams: Option<TeamConfig>,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            object_count: 2,
            clear_radius: 2,
            min_separation: 10.0,
            clear_shape: ClearShape::Square,
            teams: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub width: usize,
    pub height: usize,
    pub carve: CarveConfig,
    pub enforce_border: bool,
    pub obstacles: Option<NoiseObstacleConfig>,
    pub uniform_walls: Option<UniformWallConfig>,
    pub placement: PlacementConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 50,
            height: 50,
            carve: CarveConfig::default(),
            enforce_border: true,
            obstacles: Some(NoiseObstacleConfig::default()),
            uniform_walls: None,
            placement: PlacementConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] MapGenError),
}

fn invalid(message: impl Into<String>) -> MapGenError {
    MapGenError::InvalidConfig(message.into())
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), MapGenError> {
        if self.width < 3 || self.height < 3 {
            return Err(invalid(format!(
                "map must be at least 3x3, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > i32::MAX as usize || self.height > i32::MAX as usize {
            return Err(invalid("map dimensions exceed the cell coordinate range"));
        }

        let carve = &self.carve;
        if carve.min_width == 0 || carve.min_width > carve.max_width {
            return Err(invalid(format!(
                "corridor width bounds must satisfy 1 <= min <= max, got {}..={}",
                carve.min_width, carve.max_width
            )));
        }
        let extent = self.width.max(self.height);
        if carve.max_width > extent {
            return Err(invalid(format!(
                "max_width {} exceeds the larger map dimension {extent}",
                carve.max_width
            )));
        }
        if carve.policy.fills() {
            if !(carve.target_fraction > 0.0 && carve.target_fraction <= 1.0) {
                return Err(invalid(format!(
                    "target_fraction must be in (0, 1], got {}",
                    carve.target_fraction
                )));
            }
            if carve.max_iterations == 0 {
                return Err(invalid("max_iterations must be positive"));
            }
        }
        if carve.policy.carves_lanes() {
            if carve.segment_count == 0 {
                return Err(invalid("segment_count must be positive"));
            }
            if !carve.random_offset.is_finite() || carve.random_offset < 0.0 {
                return Err(invalid("random_offset must be a finite, non-negative number"));
            }
            if carve.random_offset > extent as f32 {
                return Err(invalid(format!(
                    "random_offset {} exceeds the larger map dimension {extent}",
                    carve.random_offset
                )));
            }
            if let Some(lane) = carve.lanes.iter().find(|lane| !self.lane_within_reach(lane)) {
                return Err(invalid(format!(
                    "lane {:?} -> {:?} reaches more than one map size beyond the grid",
                    lane.start, lane.end
                )));
            }
            if !carve.preset_lanes && carve.lanes.is_empty() {
                return Err(invalid("lane carving needs preset lanes or at least one lane"));
            }
        }

        if let Some(obstacles) = &self.obstacles {
            if !obstacles.noise_scale.is_finite() || obstacles.noise_scale <= 0.0 {
                return Err(invalid("noise_scale must be a finite, positive number"));
            }
            if !obstacles.threshold.is_finite() {
                return Err(invalid("noise threshold must be finite"));
            }
        }
        if let Some(walls) = &self.uniform_walls {
            if !(0.0..=1.0).contains(&walls.probability) {
                return Err(invalid("uniform wall probability must be in [0, 1]"));
            }
        }

        let placement = &self.placement;
        if !placement.min_separation.is_finite() || placement.min_separation < 0.0 {
            return Err(invalid("min_separation must be a finite, non-negative number"));
        }
        if placement.clear_radius > extent {
            return Err(invalid(format!(
                "clear_radius {} exceeds the larger map dimension {extent}",
                placement.clear_radius
            )));
        }
        if let Some(teams) = &placement.teams {
            if !teams.min_separation.is_finite() || teams.min_separation < 0.0 {
                return Err(invalid("team min_separation must be a finite, non-negative number"));
            }
            if teams.clear_radius > extent {
                return Err(invalid(format!(
                    "team clear_radius {} exceeds the larger map dimension {extent}",
                    teams.clear_radius
                )));
            }
            if let Some(offset) = teams.companion_offset {
                let dx = i64::from(offset.dx).unsigned_abs();
                let dy = i64::from(offset.dy).unsigned_abs();
                if dx > self.width as u64 || dy > self.height as u64 {
                    return Err(invalid(format!(
                        "companion offset ({}, {}) reaches past the map size",
                        offset.dx, offset.dy
                    )));
                }
            }
        }
        Ok(())
    }

    /// Lane endpoints may overhang the grid by at most one map size per axis.
    fn lane_within_reach(&self, lane: &Lane) -> bool {
        let width = self.width as i64;
        let height = self.height as i64;
        [lane.start, lane.end].iter().all(|cell| {
            (-width..=2 * width).contains(&i64::from(cell.x))
                && (-height..=2 * height).contains(&i64::from(cell.y))
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::json_file::write_json_atomic;
    use crate::mapgen::MapGenerator;
    use crate::types::Cell;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GeneratorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_inverted_width_bounds() {
        let mut config = GeneratorConfig::default();
        config.carve.min_width = 6;
        config.carve.max_width = 2;
        assert!(matches!(config.validate(), Err(MapGenError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_out_of_range_target_fraction_only_when_filling() {
        let mut config = GeneratorConfig::default();
        config.carve.target_fraction = 1.5;
        assert_eq!(config.validate(), Ok(()), "lane-only carving ignores the fill target");

        config.carve.policy = CarvePolicy::DrunkardsWalk;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_tiny_maps_and_laneless_lane_policy() {
        let mut config = GeneratorConfig { width: 2, ..GeneratorConfig::default() };
        assert!(config.validate().is_err());

        config.width = 20;
        config.carve.preset_lanes = false;
        assert!(config.validate().is_err());
        config.carve.lanes.push(Lane { start: Cell::new(1, 1), end: Cell::new(18, 40) });
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_brush_widths_larger_than_the_map() {
        let mut config = GeneratorConfig { width: 20, height: 20, ..GeneratorConfig::default() };
        config.carve.min_width = 50_000;
        config.carve.max_width = 50_000;
        assert!(matches!(config.validate(), Err(MapGenError::InvalidConfig(_))));

        config.carve.min_width = 3;
        config.carve.max_width = 20;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_clear_radii_larger_than_the_map() {
        let mut config = GeneratorConfig { width: 20, height: 20, ..GeneratorConfig::default() };
        config.placement.clear_shape = ClearShape::Circle;
        config.placement.clear_radius = 50_000;
        assert!(matches!(config.validate(), Err(MapGenError::InvalidConfig(_))));

        config.placement.clear_radius = 2;
        config.placement.teams = Some(TeamConfig { clear_radius: 50_000, ..TeamConfig::default() });
        assert!(matches!(config.validate(), Err(MapGenError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_lane_endpoints_far_outside_the_grid() {
        let mut config = GeneratorConfig { width: 20, height: 20, ..GeneratorConfig::default() };
        config.carve.lanes.push(Lane { start: Cell::new(i32::MAX, 5), end: Cell::new(3, 3) });
        assert!(matches!(config.validate(), Err(MapGenError::InvalidConfig(_))));

        config.carve.lanes[0].start = Cell::new(-20, 40);
        assert_eq!(config.validate(), Ok(()));
        config.carve.lanes[0].start = Cell::new(-21, 40);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_extreme_jitter_and_companion_offsets() {
        let mut config = GeneratorConfig { width: 20, height: 20, ..GeneratorConfig::default() };
        config.carve.random_offset = 1e30;
        assert!(config.validate().is_err());

        config.carve.random_offset = 3.0;
        config.placement.teams = Some(TeamConfig {
            companion_offset: Some(CellOffset::new(i32::MIN, 0)),
            ..TeamConfig::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_brush_is_rejected_before_generation() {
        let mut config = GeneratorConfig { width: 20, height: 20, ..GeneratorConfig::default() };
        config.carve.min_width = 50_000;
        config.carve.max_width = 50_000;
        assert!(matches!(
            MapGenerator::new(config),
            Err(MapGenError::InvalidConfig(_))
        ));
    }

    #[test]
    fn lanes_for_lists_presets_before_custom_lanes() {
        let custom = Lane { start: Cell::new(2, 2), end: Cell::new(5, 5) };
        let config = CarveConfig { lanes: vec![custom], ..CarveConfig::default() };
        let lanes = config.lanes_for(40, 30);
        assert_eq!(lanes.len(), 4);
        assert_eq!(lanes[3], custom);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config = GeneratorConfig::from_toml_str(
            r#"
            seed = 7
            width = 32

            [carve]
            policy = "drunkards_walk"
            min_width = 1
            max_width = 2
            target_fraction = 0.5
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.seed, 7);
        assert_eq!(config.width, 32);
        assert_eq!(config.height, 50);
        assert_eq!(config.carve.policy, CarvePolicy::DrunkardsWalk);
        assert_eq!(config.carve.segment_count, 20);
        assert_eq!(config.placement, PlacementConfig::default());
    }

    #[test]
    fn invalid_values_in_files_surface_as_validation_errors() {
        let err = GeneratorConfig::from_json_str(r#"{ "width": 1 }"#).expect_err("too small");
        assert!(matches!(err, ConfigError::Invalid(MapGenError::InvalidConfig(_))));

        let err = GeneratorConfig::from_json_str("{ width: }").expect_err("malformed");
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn config_written_atomically_loads_back() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("arena.json");
        let mut config = GeneratorConfig { seed: 4_242, ..GeneratorConfig::default() };
        config.placement.teams = Some(TeamConfig::default());

        write_json_atomic(&config, &path).expect("write");
        let loaded = GeneratorConfig::load(&path).expect("load");
        assert_eq!(config, loaded);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn load_reads_toml_by_extension() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("arena.toml");
        fs::write(&path, "width = 24\nheight = 18\nenforce_border = false\n").expect("write");

        let loaded = GeneratorConfig::load(&path).expect("load");
        assert_eq!((loaded.width, loaded.height), (24, 18));
        assert!(!loaded.enforce_border);
    }
}
