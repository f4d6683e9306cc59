use fixedbitset::FixedBitSet;
use ndarray::Array3;

use crate::{ALL_DIRECTIONS, Direction, Result, Tile, WfcError};

/// Precomputed adjacency masks.
///
/// `masks[a][d]` holds every tile `b` that may sit on the `d` side of tile `a`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rules {
    masks: Vec<[FixedBitSet; 4]>, // [Up, Right, Down, Left]
}

impl Rules {
    /// Derive the masks from an arbitrary compatibility predicate over `n` tiles.
    pub fn from_fn(n: usize, compatible: impl Fn(usize, Direction, usize) -> bool) -> Self {
        let mut masks = Vec::with_capacity(n);
        for a in 0..n {
            let mut dirs = [
                FixedBitSet::with_capacity(n),
                FixedBitSet::with_capacity(n),
                FixedBitSet::with_capacity(n),
                FixedBitSet::with_capacity(n),
            ];
            for dir in ALL_DIRECTIONS {
                for b in 0..n {
                    if compatible(a, dir, b) {
                        dirs[dir.index()].insert(b);
                    }
                }
            }
            masks.push(dirs);
        }
        Self { masks }
    }

    /// Derive the masks from the tiles' sockets.
    pub fn from_tiles(tiles: &[Tile]) -> Self {
        Self::from_fn(tiles.len(), |a, dir, b| {
            tiles[a].sockets().matches(dir, tiles[b].sockets())
        })
    }

    /// Build from an `n×n×4` adjacency matrix indexed `[a, b, direction]`.
    pub fn from_adjacency(adj: &Array3<bool>) -> Result<Self> {
        let n = adj.shape()[0];
        if adj.shape() != &[n, n, 4] {
            return Err(WfcError::Configuration(format!(
                "adjacency matrix must be n×n×4, got {:?}",
                adj.shape()
            )));
        }
        Ok(Self::from_fn(n, |a, dir, b| adj[[a, b, dir.index()]]))
    }

    /// Number of tiles covered.
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    /// `true` when no tiles are covered.
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Tiles allowed on the `direction` side of `tile`.
    pub fn allowed(&self, tile: usize, direction: Direction) -> &FixedBitSet {
        &self.masks[tile][direction.index()]
    }

    /// Whether `b` may sit on the `direction` side of `a`.
    pub fn compatible(&self, a: usize, direction: Direction, b: usize) -> bool {
        self.masks[a][direction.index()].contains(b)
    }

    /// Check `compatible(a, d, b) == compatible(b, d.opposite(), a)` for every triple.
    pub fn validate_symmetry(&self) -> Result<()> {
        for a in 0..self.len() {
            for dir in ALL_DIRECTIONS {
                for b in 0..self.len() {
                    if self.compatible(a, dir, b) != self.compatible(b, dir.opposite(), a) {
                        return Err(WfcError::Configuration(format!(
                            "asymmetric compatibility: tile {a} {dir} of tile {b} disagrees with the reverse relation"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Export as an `n×n×4` matrix indexed `[a, b, direction]`.
    pub fn adjacency_matrix(&self) -> Array3<bool> {
        let n = self.len();
        let mut m = Array3::from_elem((n, n, 4), false);
        for a in 0..n {
            for dir in ALL_DIRECTIONS {
                for b in self.masks[a][dir.index()].ones() {
                    m[[a, b, dir.index()]] = true;
                }
            }
        }
        m
    }
}
