#![allow(dead_code)]

use std::sync::Arc;
use tile_collapse::{ALL_DIRECTIONS, Grid, Tile, TileCatalog};

/// Every combination of `street`/`blank` on four sides, so any set of
/// neighbour constraints has a matching tile.
pub fn complete_streets() -> Arc<TileCatalog> {
    let tiles = (0..16u8)
        .map(|mask| {
            let side = |bit: u8| if mask & (1 << bit) == 0 { "blank" } else { "street" };
            Tile::with_tags(format!("streets{mask:04b}"), [side(0), side(1), side(2), side(3)])
        })
        .collect();
    Arc::new(TileCatalog::new(tiles).unwrap())
}

/// A few street pieces whose neighbour-only propagation regularly runs into
/// contradictions, while cascading propagation avoids them.
pub fn partial_streets() -> Arc<TileCatalog> {
    let tiles = vec![
        Tile::with_tags("grass", ["blank", "blank", "blank", "blank"]),
        Tile::with_tags("corner_ne", ["street", "street", "blank", "blank"]),
        Tile::with_tags("corner_sw", ["blank", "blank", "street", "street"]),
        Tile::with_tags("vertical", ["street", "blank", "street", "blank"]),
        Tile::with_tags("horizontal", ["blank", "street", "blank", "street"]),
        Tile::with_tags("tee", ["street", "street", "street", "blank"]),
    ];
    Arc::new(TileCatalog::new(tiles).unwrap())
}

/// `true` when every pair of adjacent collapsed cells is compatible.
pub fn adjacent_pairs_compatible(grid: &Grid) -> bool {
    let catalog = grid.catalog();
    grid.collapsed().all(|(position, tile)| {
        ALL_DIRECTIONS.iter().all(|&dir| {
            grid.neighbor(position, dir)
                .and_then(|next| grid.get(next).and_then(|cell| cell.tile()))
                .is_none_or(|other| catalog.compatible(tile, dir, other))
        })
    })
}
