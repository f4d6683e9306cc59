use anyhow::Result;
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use std::sync::Arc;
use tile_collapse::{SolveStatus, Stepper, SolverSettings, Tile, TileCatalog, WfcError};

/// Collapse a small grid one cell at a time, printing every intermediate state.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Config {
    #[arg(short = 'W', long, default_value_t = 6)]
    width: usize,

    #[arg(short = 'H', long, default_value_t = 4)]
    height: usize,

    #[arg(short, long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<()> {
    let config = Config::parse();

    // Sockets are [up, right, down, left].
    let catalog = TileCatalog::new(vec![
        Tile::with_tags("grass", ["blank", "blank", "blank", "blank"]),
        Tile::with_tags("vertical", ["street", "blank", "street", "blank"]),
        Tile::with_tags("horizontal", ["blank", "street", "blank", "street"]),
        Tile::with_tags("cross", ["street", "street", "street", "street"]),
    ])?;
    let mut stepper = Stepper::new(
        config.width,
        config.height,
        Arc::new(catalog),
        StdRng::seed_from_u64(config.seed),
        SolverSettings::default(),
    )?;

    loop {
        match stepper.step() {
            Ok(event) => {
                let name = stepper.grid().catalog().tiles()[event.tile].name().to_string();
                println!("{} -> {name}", event.position);
                println!("{}", stepper.grid());
            }
            Err(WfcError::AlreadyComplete) => break,
            Err(err) => {
                println!("{err}");
                break;
            }
        }
    }

    match stepper.status() {
        SolveStatus::Complete => println!("Complete"),
        SolveStatus::Contradiction(position) => println!("Contradiction at {position}"),
        SolveStatus::InProgress => println!("Stopped early"),
    }
    Ok(())
}
