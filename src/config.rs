//! YAML run configuration for host programs.
//!
//! ```yaml
//! width: 8
//! height: 6
//! seed: 42
//! propagation: cascade
//! pins:
//!   - { x: 0, y: 0, tile: road }
//! catalog:
//!   scheme: tags
//!   tiles:
//!     - { name: grass, up: blank, right: blank, down: blank, left: blank }
//!     - { name: road,  up: street, right: blank, down: street, left: blank }
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{path::Path, str::FromStr, sync::Arc};

use crate::{
    ConnectionTag, Grid, Position, Propagation, Scheme, Signature, Sockets, SolverSettings, Tile,
    TileCatalog,
};

/// One socket value: a number for signatures, a label for tags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SocketValue {
    /// Numeric value.
    Number(u64),
    /// Text label.
    Label(String),
}

/// A tile as written in the configuration file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileConfig {
    /// Unique tile name.
    pub name: String,
    /// Socket on the top edge.
    pub up: SocketValue,
    /// Socket on the right edge.
    pub right: SocketValue,
    /// Socket on the bottom edge.
    pub down: SocketValue,
    /// Socket on the left edge.
    pub left: SocketValue,
}

impl TileConfig {
    fn sockets(&self) -> [&SocketValue; 4] {
        [&self.up, &self.right, &self.down, &self.left]
    }

    fn build(&self, scheme: Scheme) -> Result<Tile> {
        let sockets = match scheme {
            Scheme::Signature => {
                let mut signatures = [Signature(0); 4];
                for (slot, value) in signatures.iter_mut().zip(self.sockets()) {
                    *slot = match value {
                        SocketValue::Number(n) => Signature(*n),
                        SocketValue::Label(label) => bail!(
                            "tile '{}': signature sockets must be numbers, found '{label}'",
                            self.name
                        ),
                    };
                }
                Sockets::Signature(signatures)
            }
            Scheme::Tags => Sockets::Tags(self.sockets().map(|value| match value {
                SocketValue::Number(n) => ConnectionTag(n.to_string()),
                SocketValue::Label(label) => ConnectionTag(label.clone()),
            })),
        };
        Ok(Tile::new(self.name.clone(), sockets))
    }
}

/// Tile catalog definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Descriptor scheme used by every tile.
    pub scheme: Scheme,
    /// Tiles in catalog order.
    pub tiles: Vec<TileConfig>,
}

impl CatalogConfig {
    /// Construct the catalog, validating it.
    pub fn build(&self) -> Result<TileCatalog> {
        let tiles = self
            .tiles
            .iter()
            .map(|tile| tile.build(self.scheme))
            .collect::<Result<Vec<_>>>()?;
        Ok(TileCatalog::new(tiles)?)
    }
}

/// Everything a host needs to set up a solve.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Grid columns.
    pub width: usize,
    /// Grid rows.
    pub height: usize,
    /// Seed for the random source; hosts pick one when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Propagation reach.
    #[serde(default)]
    pub propagation: Propagation,
    /// Show a progress bar while solving.
    #[serde(default)]
    pub show_progress: bool,
    /// Cells fixed to a named tile before solving.
    #[serde(default)]
    pub pins: Vec<PinConfig>,
    /// Tile catalog.
    pub catalog: CatalogConfig,
}

/// A cell fixed to one tile before solving.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinConfig {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
    /// Name of the tile to place.
    pub tile: String,
}

impl RunConfig {
    /// Read and parse a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        data.parse::<Self>()
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Build the catalog and an unsolved grid with every pin applied.
    pub fn build_grid(&self) -> Result<Grid> {
        let catalog = Arc::new(self.catalog.build()?);
        let mut grid = Grid::new(self.width, self.height, Arc::clone(&catalog))?;
        for pin in &self.pins {
            let Some(tile) = catalog.id_of(&pin.tile) else {
                bail!("pinned tile '{}' is not in the catalog", pin.tile);
            };
            grid.pin(Position::new(pin.x, pin.y), tile)?;
        }
        Ok(grid)
    }

    /// Settings for the solver.
    pub fn solver_settings(&self) -> SolverSettings {
        SolverSettings {
            propagation: self.propagation,
            show_progress: self.show_progress,
        }
    }
}

impl FromStr for RunConfig {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(s)?;
        if config.width == 0 || config.height == 0 {
            bail!(
                "grid dimensions must be positive, got {}×{}",
                config.width,
                config.height
            );
        }
        Ok(config)
    }
}
