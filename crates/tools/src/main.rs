use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use arena_core::{
    Cell, GeneratedMap, GeneratorConfig, MapGenerator, derive_attempt_seed, write_json_atomic,
};
use clap::{Parser, ValueEnum};
use env_logger::{Builder, Env};
use log::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Ascii,
    Json,
}

#[derive(Parser)]
#[command(author, version, about = "Generate one arena map", long_about = None)]
struct Args {
    /// Generator config file (`.toml` or `.json`); built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    /// How many seeds to try when a map comes out fully solid
    #[arg(long, default_value_t = 3)]
    attempts: u32,
    /// Current player cell as `x,y`; the map relocates it instead of spawning
    #[arg(long, value_parser = parse_cell)]
    player: Option<Cell>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Ascii)]
    format: OutputFormat,
    /// Also write the map as JSON to this path
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn parse_cell(raw: &str) -> Result<Cell, String> {
    let (x, y) = raw.split_once(',').ok_or_else(|| format!("cell '{raw}' must look like x,y"))?;
    let parse = |part: &str| {
        part.trim().parse::<i32>().map_err(|_| format!("'{part}' in cell '{raw}' is not a number"))
    };
    Ok(Cell::new(parse(x)?, parse(y)?))
}

fn resolve_config(args: &Args) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    config.validate().context("Config overrides produced an invalid config")?;
    Ok(config)
}

/// Regenerates with derived seeds while failures are recoverable.
fn generate_with_retries(
    config: &GeneratorConfig,
    attempts: u32,
    player: Option<Cell>,
) -> Result<GeneratedMap> {
    let mut last_error = None;
    for attempt in 0..attempts.max(1) {
        let seed = derive_attempt_seed(config.seed, attempt);
        let generator = MapGenerator::new(GeneratorConfig { seed, ..config.clone() })?;
        match generator.generate(player) {
            Ok(map) => return Ok(map),
            Err(error) if error.is_recoverable() => {
                warn!("attempt {attempt} with seed {seed} failed: {error}");
                last_error = Some(error);
            }
            Err(error) => return Err(error.into()),
        }
    }
    Err(anyhow!(
        "no usable map after {} attempts: {}",
        attempts.max(1),
        last_error.map_or_else(|| "unknown failure".to_string(), |error| error.to_string())
    ))
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = resolve_config(&args)?;
    let map = generate_with_retries(&config, args.attempts, args.player)?;
    info!(
        "seed {} -> {}x{} map, {} floor cells, fingerprint 0x{:016x}",
        map.seed,
        map.width(),
        map.height(),
        map.floor_cells.len(),
        map.fingerprint()
    );
    for issue in &map.issues {
        warn!("{:?} placement skipped: {}", issue.stage, issue.error);
    }

    match args.format {
        OutputFormat::Ascii => println!("{}", map.render_ascii()),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&map).context("Failed to serialize map JSON")?
        ),
    }

    if let Some(path) = &args.out {
        write_json_atomic(&map, path)
            .with_context(|| format!("Failed to write map file: {}", path.display()))?;
        info!("wrote {}", path.display());
    }
    Ok(())
}
