use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use arena_core::{Cell, GeneratedMap, GeneratorConfig, MapGenError, generate_map};
use clap::Parser;
use env_logger::{Builder, Env};
use log::{debug, info, warn};

#[derive(Parser)]
#[command(author, version, about = "Generate a seed range and check map invariants", long_about = None)]
struct Args {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, default_value_t = 0)]
    start: u64,
    #[arg(short = 'n', long, default_value_t = 200)]
    count: u64,
}

fn check_invariants(map: &GeneratedMap) -> Result<(), String> {
    for cell in map.grid.cells().filter(|&cell| map.grid.is_border(cell)) {
        if map.is_walkable(cell) {
            return Err(format!("border cell {cell:?} is walkable"));
        }
    }

    let registered: BTreeSet<Cell> = map.floor_cells.iter().copied().collect();
    let walkable: BTreeSet<Cell> = map.grid.walkable_cells().collect();
    if registered.len() != map.floor_cells.len() {
        return Err("floor registry holds duplicates".to_string());
    }
    if registered != walkable {
        return Err(format!(
            "floor registry has {} cells but the grid has {} walkable",
            registered.len(),
            walkable.len()
        ));
    }

    if !map.is_walkable(map.spawn.cell()) {
        return Err(format!("spawn {:?} is not walkable", map.spawn.cell()));
    }
    Ok(())
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let base = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    info!("sweeping {} seeds starting at {}", args.count, args.start);
    let mut solid_maps = 0_u64;
    let mut maps_with_issues = 0_u64;
    let mut violations = 0_u64;
    for seed in args.start..args.start.saturating_add(args.count) {
        let config = GeneratorConfig { seed, ..base.clone() };
        match generate_map(&config) {
            Ok(map) => {
                if !map.issues.is_empty() {
                    maps_with_issues += 1;
                    debug!("seed {seed}: {} skipped placements", map.issues.len());
                }
                if let Err(violation) = check_invariants(&map) {
                    violations += 1;
                    warn!("seed {seed}: {violation}");
                }
            }
            Err(MapGenError::EmptyFloorRegistry) => {
                solid_maps += 1;
                debug!("seed {seed}: fully solid map");
            }
            Err(error) => bail!("seed {seed}: generation failed: {error}"),
        }
    }

    println!("Seeds checked: {}", args.count);
    println!("Fully solid maps: {solid_maps}");
    println!("Maps with skipped placements: {maps_with_issues}");
    println!("Invariant violations: {violations}");

    if violations > 0 {
        bail!("{violations} maps violated generation invariants");
    }
    Ok(())
}
