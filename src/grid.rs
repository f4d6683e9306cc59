use fixedbitset::FixedBitSet;
use ndarray::Array2;
use std::{
    fmt::{Display, Formatter},
    sync::Arc,
};

use crate::{Cell, Direction, Result, TileCatalog, TileId, WfcError};

/// Cell coordinates, `x` in `[0, width)` and `y` in `[0, height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
}

impl Position {
    /// Construct a position.
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Overall progress of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    /// At least one cell is still unresolved.
    InProgress,
    /// Every cell is collapsed.
    Complete,
    /// A cell ran out of candidates; terminal.
    Contradiction(Position),
}

/// A `width × height` field of cells sharing one tile catalog.
///
/// Cells are stored row-major, so the cell at `(x, y)` lives at flat index
/// `x + y * width`.
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Array2<Cell>,
    catalog: Arc<TileCatalog>,
    contradiction: Option<Position>,
}

impl Grid {
    /// Allocate a grid whose every cell may hold any tile of `catalog`.
    pub fn new(width: usize, height: usize, catalog: Arc<TileCatalog>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(WfcError::Configuration(format!(
                "grid dimensions must be positive, got {width}×{height}"
            )));
        }
        let cells = Self::fresh_cells(width, height, catalog.len());
        Ok(Self {
            width,
            height,
            cells,
            catalog,
            contradiction: None,
        })
    }

    fn fresh_cells(width: usize, height: usize, num_tiles: usize) -> Array2<Cell> {
        Array2::from_shape_fn((height, width), |(y, x)| {
            Cell::unresolved(Position::new(x, y), num_tiles)
        })
    }

    /// Return every cell to its initial unresolved state.
    pub fn reset(&mut self) {
        self.cells = Self::fresh_cells(self.width, self.height, self.catalog.len());
        self.contradiction = None;
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Always `false`: dimensions are validated on construction.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shared tile catalog.
    pub fn catalog(&self) -> &Arc<TileCatalog> {
        &self.catalog
    }

    /// Flat row-major index of `(x, y)`. The caller guarantees the bounds.
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width, "x out of bounds: {x} >= {}", self.width);
        debug_assert!(y < self.height, "y out of bounds: {y} >= {}", self.height);
        x + y * self.width
    }

    /// Inverse of [`Grid::index`].
    pub fn position(&self, index: usize) -> Position {
        Position::new(index % self.width, index / self.width)
    }

    /// Whether `position` lies inside the grid.
    pub fn contains(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    /// The adjacent position in `direction`, or `None` past the edge.
    pub fn neighbor(&self, position: Position, direction: Direction) -> Option<Position> {
        let (dx, dy) = direction.offset();
        let x = position.x.checked_add_signed(dx)?;
        let y = position.y.checked_add_signed(dy)?;
        let next = Position::new(x, y);
        self.contains(next).then_some(next)
    }

    /// Narrow an unresolved cell to the single candidate `tile` before solving.
    ///
    /// The solver collapses pinned cells first, since they have the lowest entropy.
    pub fn pin(&mut self, position: Position, tile: TileId) -> Result<()> {
        let num_tiles = self.catalog.len();
        let Some(cell) = self.cell_mut(position) else {
            return Err(WfcError::Configuration(format!(
                "cannot pin {position}: outside the grid"
            )));
        };
        if !cell.candidates().is_some_and(|c| c.contains(tile)) {
            return Err(WfcError::Configuration(format!(
                "cannot pin {position} to tile {tile}: not a candidate there"
            )));
        }
        let mut only = FixedBitSet::with_capacity(num_tiles);
        only.insert(tile);
        cell.restrict(&only);
        Ok(())
    }

    /// Cell at `position`, if in bounds.
    pub fn get(&self, position: Position) -> Option<&Cell> {
        self.cells.get((position.y, position.x))
    }

    pub(crate) fn cell_mut(&mut self, position: Position) -> Option<&mut Cell> {
        self.cells.get_mut((position.y, position.x))
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Positions of every unresolved cell, in row-major order.
    pub fn unresolved_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .filter(|cell| cell.is_unresolved())
            .map(Cell::position)
    }

    /// `(position, tile)` for every collapsed cell, in row-major order.
    pub fn collapsed(&self) -> impl Iterator<Item = (Position, TileId)> + '_ {
        self.cells
            .iter()
            .filter_map(|cell| cell.tile().map(|tile| (cell.position(), tile)))
    }

    /// `true` when every cell is collapsed.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Cell::is_collapsed)
    }

    /// The first contradicted cell, if any.
    pub fn contradiction(&self) -> Option<Position> {
        self.contradiction
    }

    pub(crate) fn mark_contradiction(&mut self, position: Position) {
        self.contradiction.get_or_insert(position);
    }

    /// Where the grid stands: in progress, complete, or contradicted.
    pub fn status(&self) -> SolveStatus {
        if let Some(position) = self.contradiction {
            SolveStatus::Contradiction(position)
        } else if self.is_complete() {
            SolveStatus::Complete
        } else {
            SolveStatus::InProgress
        }
    }

    /// Chosen tile per cell, indexed `[(y, x)]`; `None` where not collapsed.
    pub fn tile_map(&self) -> Array2<Option<TileId>> {
        self.cells.map(Cell::tile)
    }
}

impl PartialEq for Grid {
    /// Grids compare by dimensions and cell states; the catalog is not compared.
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.contradiction == other.contradiction
            && self.cells == other.cells
    }
}

impl Display for Grid {
    /// Prints the top row (highest `y`) first.
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let print_width = self.catalog.len().saturating_sub(1).max(1).ilog10() as usize + 1;
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                write!(f, "{:>print_width$} ", self.cells[(y, x)].to_string())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
