pub mod config;
pub mod error;
pub mod json_file;
pub mod mapgen;
pub mod types;

pub use config::{
    CarveConfig, CarvePolicy, ConfigError, GeneratorConfig, NoiseObstacleConfig, PlacementConfig,
    TeamConfig, UniformWallConfig,
};
pub use error::MapGenError;
pub use json_file::write_json_atomic;
pub use mapgen::{GeneratedMap, MapGenerator, derive_attempt_seed, generate_map};
pub use types::*;
