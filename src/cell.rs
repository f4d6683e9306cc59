use fixedbitset::FixedBitSet;
use std::fmt::{Display, Formatter};

use crate::{Position, TileId};

const CELL_UNRESOLVED: &str = "*";
const CELL_CONTRADICTED: &str = "!";

/// Solve state of a single cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellState {
    /// Tiles still possible here, iterated in catalog order. Never empty.
    Unresolved(FixedBitSet),
    /// The chosen tile.
    Collapsed(TileId),
    /// Every candidate was pruned away.
    Contradicted,
}

/// A grid cell: its position and its solve state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    position: Position,
    state: CellState,
}

impl Cell {
    /// Unresolved cell with every one of `num_tiles` tiles as a candidate.
    pub fn unresolved(position: Position, num_tiles: usize) -> Self {
        let mut candidates = FixedBitSet::with_capacity(num_tiles);
        candidates.insert_range(..);
        Self {
            position,
            state: CellState::Unresolved(candidates),
        }
    }

    /// Location within the grid.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Current solve state.
    pub fn state(&self) -> &CellState {
        &self.state
    }

    /// `true` until the cell is collapsed or contradicted.
    pub fn is_unresolved(&self) -> bool {
        matches!(self.state, CellState::Unresolved(_))
    }

    /// `true` once a tile has been chosen.
    pub fn is_collapsed(&self) -> bool {
        matches!(self.state, CellState::Collapsed(_))
    }

    /// `true` once the candidate set has been emptied.
    pub fn is_contradicted(&self) -> bool {
        matches!(self.state, CellState::Contradicted)
    }

    /// Candidate set, if unresolved.
    pub fn candidates(&self) -> Option<&FixedBitSet> {
        match &self.state {
            CellState::Unresolved(candidates) => Some(candidates),
            _ => None,
        }
    }

    /// Number of remaining candidates (the cell's entropy), if unresolved.
    pub fn candidate_count(&self) -> Option<usize> {
        self.candidates().map(|c| c.count_ones(..))
    }

    /// Chosen tile, if collapsed.
    pub fn tile(&self) -> Option<TileId> {
        match self.state {
            CellState::Collapsed(tile) => Some(tile),
            _ => None,
        }
    }

    /// Fix the cell to `tile`, discarding its candidates.
    pub(crate) fn set_collapsed(&mut self, tile: TileId) {
        self.state = CellState::Collapsed(tile);
    }

    /// Keep only candidates also present in `allowed`.
    ///
    /// Returns the number of candidates removed. A cell left with none becomes
    /// [`CellState::Contradicted`]. Collapsed and contradicted cells are untouched.
    pub(crate) fn restrict(&mut self, allowed: &FixedBitSet) -> usize {
        let CellState::Unresolved(candidates) = &mut self.state else {
            return 0;
        };
        let before = candidates.count_ones(..);
        candidates.intersect_with(allowed);
        let after = candidates.count_ones(..);
        if after == 0 {
            self.state = CellState::Contradicted;
        }
        before - after
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match &self.state {
            CellState::Unresolved(_) => write!(f, "{CELL_UNRESOLVED}"),
            CellState::Contradicted => write!(f, "{CELL_CONTRADICTED}"),
            CellState::Collapsed(tile) => write!(f, "{tile}"),
        }
    }
}
