use anyhow::{Context, Result};
use clap::Parser;
use std::{path::PathBuf, sync::Arc};
use tile_collapse::{config::RunConfig, solve_with_restarts};
use tracing_subscriber::EnvFilter;

/// Solve a grid described by a YAML run configuration.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Config {
    #[arg(short, long)]
    config: PathBuf,

    /// Overrides the configured seed.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Fresh seeds to try after a contradiction.
    #[arg(short, long, default_value_t = 10)]
    retries: u64,

    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::parse();
    let run = RunConfig::load(&config.config)?;
    let template = run.build_grid()?;
    let catalog = Arc::clone(template.catalog());
    let seed = config.seed.or(run.seed).unwrap_or_else(rand::random);

    if config.verbose {
        println!("Configuration     : {}", config.config.display());
        println!("Grid size         : {}×{}", run.width, run.height);
        println!("Number of tiles   : {}", catalog.len());
        println!("First seed        : {seed}");
    }

    let seeds = (0..=config.retries).map(|attempt| seed.wrapping_add(attempt));
    let (grid, used) = solve_with_restarts(&template, seeds, &run.solver_settings())
        .context("Every attempt ended in a contradiction")?;

    if config.verbose {
        println!("Solved with seed  : {used}");
        for (id, tile) in catalog.tiles().iter().enumerate() {
            println!("{id:>4} : {tile}");
        }
    }
    print!("{grid}");
    Ok(())
}
