use std::collections::HashSet;

use crate::{Direction, Result, Rules, Scheme, Tile, WfcError};

/// Identifier of a tile: its position within the [`TileCatalog`].
pub type TileId = usize;

/// Immutable, ordered registry of tiles and the compatibility relation between them.
#[derive(Clone, Debug)]
pub struct TileCatalog {
    tiles: Vec<Tile>,
    rules: Rules,
}

impl TileCatalog {
    /// Build a catalog and derive its rules from the tiles' sockets.
    ///
    /// Fails when the catalog is empty, names repeat, tiles mix descriptor
    /// schemes, or the derived relation is not symmetric.
    pub fn new(tiles: Vec<Tile>) -> Result<Self> {
        let Some(first) = tiles.first() else {
            return Err(WfcError::Configuration(
                "tile catalog must contain at least one tile".to_string(),
            ));
        };

        let scheme = first.sockets().scheme();
        if let Some(tile) = tiles.iter().find(|t| t.sockets().scheme() != scheme) {
            return Err(WfcError::Configuration(format!(
                "tile '{}' does not use the catalog's {scheme:?} scheme",
                tile.name()
            )));
        }

        let rules = Rules::from_tiles(&tiles);
        Self::with_rules(tiles, rules)
    }

    /// Build a catalog with an explicitly supplied relation, ignoring sockets.
    pub fn with_rules(tiles: Vec<Tile>, rules: Rules) -> Result<Self> {
        if tiles.is_empty() {
            return Err(WfcError::Configuration(
                "tile catalog must contain at least one tile".to_string(),
            ));
        }
        if tiles.len() != rules.len() {
            return Err(WfcError::Configuration(format!(
                "{} tiles but rules cover {}",
                tiles.len(),
                rules.len()
            )));
        }

        let mut seen = HashSet::with_capacity(tiles.len());
        for tile in &tiles {
            if !seen.insert(tile.name()) {
                return Err(WfcError::Configuration(format!(
                    "duplicate tile name '{}'",
                    tile.name()
                )));
            }
        }

        rules.validate_symmetry()?;
        Ok(Self { tiles, rules })
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Always `false` for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Descriptor scheme shared by every tile.
    pub fn scheme(&self) -> Scheme {
        self.tiles[0].sockets().scheme()
    }

    /// Tiles in catalog order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile with the given id.
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    /// Id of the tile named `name`.
    pub fn id_of(&self, name: &str) -> Option<TileId> {
        self.tiles.iter().position(|tile| tile.name() == name)
    }

    /// Precomputed adjacency masks.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Whether tile `b` may sit on the `direction` side of tile `a`.
    pub fn compatible(&self, a: TileId, direction: Direction, b: TileId) -> bool {
        self.rules.compatible(a, direction, b)
    }
}
