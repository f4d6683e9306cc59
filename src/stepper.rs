use rand::Rng;
use std::sync::Arc;

use crate::{CollapseEvent, Grid, Result, SolveStatus, Solver, SolverSettings, TileCatalog};

/// Host-facing handle that owns a grid and the solver driving it.
///
/// Hosts call [`Stepper::step`] once per tick (or per button press) and render
/// the returned [`CollapseEvent`]; stopping between calls is the cancellation
/// mechanism.
pub struct Stepper<R: Rng> {
    grid: Grid,
    solver: Solver<R>,
}

impl<R: Rng> Stepper<R> {
    /// Fresh `width × height` grid over `catalog`, driven by `rng`.
    pub fn new(
        width: usize,
        height: usize,
        catalog: Arc<TileCatalog>,
        rng: R,
        settings: SolverSettings,
    ) -> Result<Self> {
        Ok(Self {
            grid: Grid::new(width, height, catalog)?,
            solver: Solver::with_settings(rng, settings),
        })
    }

    /// Collapse one more cell.
    pub fn step(&mut self) -> Result<CollapseEvent> {
        self.solver.step(&mut self.grid)
    }

    /// Clear the grid, keeping the random source where it left off.
    pub fn reset(&mut self) {
        self.grid.reset();
    }

    /// Clear the grid and continue with a new random source.
    pub fn reset_with_rng(&mut self, rng: R) {
        self.grid.reset();
        self.solver = Solver::with_settings(rng, self.solver.settings().clone());
    }

    /// `true` once every cell is collapsed.
    pub fn is_complete(&self) -> bool {
        self.grid.is_complete()
    }

    /// See [`Grid::status`].
    pub fn status(&self) -> SolveStatus {
        self.grid.status()
    }

    /// The grid being solved.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}
