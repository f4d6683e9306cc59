use fixedbitset::FixedBitSet;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, sync::Arc};
use tracing::{debug, info, trace, warn};

use crate::{
    ALL_DIRECTIONS, Cell, CellState, Direction, Grid, Position, Result, Rules, SolveProgress,
    TileId, WfcError,
};

/// How far a collapse is propagated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Propagation {
    /// Filter only the four direct neighbours of the collapsed cell.
    #[default]
    Neighbours,
    /// Keep filtering outwards while candidate sets keep shrinking.
    Cascade,
}

/// Tunables for a [`Solver`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolverSettings {
    /// Propagation reach after each collapse.
    pub propagation: Propagation,
    /// Draw a terminal progress bar during [`Solver::simulate`].
    pub show_progress: bool,
}

/// A single collapse, as reported to interactive callers and renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollapseEvent {
    /// Cell that was collapsed.
    pub position: Position,
    /// Tile it was collapsed to.
    pub tile: TileId,
}

/// Outcome of a successful [`Solver::simulate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolveSummary {
    /// Collapse iterations performed by this call.
    pub steps: usize,
}

/// Drives the select, collapse, propagate loop over a [`Grid`].
///
/// All randomness comes from the injected `rng`, so a seeded source on an
/// identical grid reproduces the same run.
pub struct Solver<R: Rng> {
    rng: R,
    settings: SolverSettings,
}

impl<R: Rng> Solver<R> {
    /// Solver with default settings.
    pub fn new(rng: R) -> Self {
        Self::with_settings(rng, SolverSettings::default())
    }

    /// Solver with explicit settings.
    pub fn with_settings(rng: R, settings: SolverSettings) -> Self {
        Self { rng, settings }
    }

    /// Current settings.
    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Pick the next cell to collapse.
    ///
    /// Among unresolved cells with the fewest candidates, one is chosen uniformly
    /// at random; a unique minimum consumes no randomness.
    pub fn select_next_candidate(&mut self, grid: &Grid) -> Result<Position> {
        if let Some(position) = grid.contradiction() {
            return Err(WfcError::Contradiction { position });
        }

        let mut min_count = usize::MAX;
        let mut lowest = Vec::new();
        for cell in grid.cells() {
            let Some(count) = cell.candidate_count() else {
                continue;
            };
            if count < min_count {
                min_count = count;
                lowest.clear();
            }
            if count == min_count {
                lowest.push(cell.position());
            }
        }

        match lowest.len() {
            0 => Err(WfcError::AlreadyComplete),
            1 => Ok(lowest[0]),
            n => Ok(lowest[self.rng.random_range(0..n)]),
        }
    }

    /// Fix `cell` to one of its candidates, chosen uniformly at random.
    ///
    /// A single candidate is taken without consuming randomness, and an already
    /// collapsed cell just reports its tile.
    pub fn collapse(&mut self, cell: &mut Cell) -> Result<TileId> {
        let tile = match cell.state() {
            CellState::Collapsed(tile) => return Ok(*tile),
            CellState::Contradicted => {
                return Err(WfcError::Contradiction {
                    position: cell.position(),
                });
            }
            CellState::Unresolved(candidates) => {
                let count = candidates.count_ones(..);
                let pick = if count == 1 {
                    0
                } else {
                    self.rng.random_range(0..count)
                };
                candidates.ones().nth(pick)
            }
        };

        // Unresolved sets are never empty, so `nth` is within range.
        let Some(tile) = tile else {
            return Err(WfcError::Contradiction {
                position: cell.position(),
            });
        };
        cell.set_collapsed(tile);
        Ok(tile)
    }

    /// Prune the unresolved neighbours of the cell at `position`.
    ///
    /// Each neighbour on side `d` keeps only tiles `t` for which some tile
    /// still possible at `position` satisfies `compatible(tile, d, t)`.
    /// Returns the number of candidates removed, or the first cell emptied.
    pub fn propagate(&self, grid: &mut Grid, position: Position) -> Result<usize> {
        let catalog = Arc::clone(grid.catalog());
        let rules = catalog.rules();

        let mut queue = VecDeque::from([position]);
        let mut removed = 0;
        while let Some(source) = queue.pop_front() {
            let Some(domain) = grid.get(source).map(domain_of) else {
                continue;
            };
            let Some(domain) = domain else {
                return Err(WfcError::Contradiction { position: source });
            };

            for dir in ALL_DIRECTIONS {
                let Some(target) = grid.neighbor(source, dir) else {
                    continue;
                };
                let allowed = support(rules, &domain, dir);
                let Some(cell) = grid.cell_mut(target) else {
                    continue;
                };
                let pruned = cell.restrict(&allowed);
                if pruned == 0 {
                    continue;
                }
                trace!(%source, %target, pruned, "pruned candidates");
                removed += pruned;

                if cell.is_contradicted() {
                    grid.mark_contradiction(target);
                    warn!(position = %target, "no valid tiles remain");
                    return Err(WfcError::Contradiction { position: target });
                }
                if self.settings.propagation == Propagation::Cascade {
                    queue.push_back(target);
                }
            }
        }
        Ok(removed)
    }

    /// Perform one select, collapse, propagate cycle.
    pub fn step(&mut self, grid: &mut Grid) -> Result<CollapseEvent> {
        let position = self.select_next_candidate(grid)?;
        let Some(cell) = grid.cell_mut(position) else {
            return Err(WfcError::AlreadyComplete);
        };
        let tile = self.collapse(cell)?;
        debug!(%position, tile, "collapsed cell");
        self.propagate(grid, position)?;
        Ok(CollapseEvent { position, tile })
    }

    /// Step until every cell is collapsed or a contradiction stops the run.
    pub fn simulate(&mut self, grid: &mut Grid) -> Result<SolveSummary> {
        if let Some(position) = grid.contradiction() {
            return Err(WfcError::Contradiction { position });
        }

        let pending = grid.unresolved_positions().count();
        let progress = SolveProgress::new(pending, self.settings.show_progress);
        let mut steps = 0;
        let outcome = loop {
            match self.step(grid) {
                Ok(_) => {
                    steps += 1;
                    progress.increment();
                }
                Err(WfcError::AlreadyComplete) => break Ok(SolveSummary { steps }),
                Err(err) => break Err(err),
            }
        };
        progress.finish();

        if outcome.is_ok() {
            info!(
                width = grid.width(),
                height = grid.height(),
                steps,
                "grid fully collapsed"
            );
        }
        outcome
    }
}

/// Tiles still possible at a cell; `None` for a contradicted cell.
fn domain_of(cell: &Cell) -> Option<Vec<TileId>> {
    match cell.state() {
        CellState::Collapsed(tile) => Some(vec![*tile]),
        CellState::Unresolved(candidates) => Some(candidates.ones().collect()),
        CellState::Contradicted => None,
    }
}

/// Union of tiles allowed on the `dir` side of any tile in `domain`.
fn support(rules: &Rules, domain: &[TileId], dir: Direction) -> FixedBitSet {
    let mut allowed = FixedBitSet::with_capacity(rules.len());
    for &tile in domain {
        allowed.union_with(rules.allowed(tile, dir));
    }
    allowed
}

/// Solve copies of `template` once per seed until one succeeds.
///
/// Returns the solved grid with the seed that produced it. When every seed
/// ends in a contradiction, the last contradiction is returned.
pub fn solve_with_restarts(
    template: &Grid,
    seeds: impl IntoIterator<Item = u64>,
    settings: &SolverSettings,
) -> Result<(Grid, u64)> {
    let mut last_error = WfcError::Configuration("no seeds supplied".to_string());
    for seed in seeds {
        let mut grid = template.clone();
        let mut solver = Solver::with_settings(StdRng::seed_from_u64(seed), settings.clone());
        match solver.simulate(&mut grid) {
            Ok(_) => return Ok((grid, seed)),
            Err(err) => {
                debug!(seed, %err, "restarting with next seed");
                last_error = err;
            }
        }
    }
    Err(last_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Tile, TileCatalog};

    /// Tiles `0..n` that only accept copies of themselves on every side.
    fn islands(n: usize) -> Arc<TileCatalog> {
        let tiles = (0..n)
            .map(|i| Tile::with_signatures(format!("island{i}"), [i as u64; 4]))
            .collect();
        Arc::new(TileCatalog::new(tiles).unwrap())
    }

    /// Rng that panics if asked for anything.
    struct NoRandomness;

    impl rand::RngCore for NoRandomness {
        fn next_u32(&mut self) -> u32 {
            panic!("randomness consumed")
        }
        fn next_u64(&mut self) -> u64 {
            panic!("randomness consumed")
        }
        fn fill_bytes(&mut self, _dst: &mut [u8]) {
            panic!("randomness consumed")
        }
    }

    #[test]
    fn single_candidate_collapse_consumes_no_randomness() {
        let mut grid = Grid::new(1, 1, islands(3)).unwrap();
        let position = Position::new(0, 0);
        let mut only_two = FixedBitSet::with_capacity(3);
        only_two.insert(2);
        grid.cell_mut(position).unwrap().restrict(&only_two);

        let mut solver = Solver::new(NoRandomness);
        let cell = grid.cell_mut(position).unwrap();
        assert_eq!(solver.collapse(cell).unwrap(), 2);
        assert_eq!(cell.tile(), Some(2));
        assert_eq!(cell.candidates(), None);
    }

    #[test]
    fn collapse_of_collapsed_cell_is_a_no_op() {
        let mut grid = Grid::new(1, 1, islands(2)).unwrap();
        let cell = grid.cell_mut(Position::new(0, 0)).unwrap();
        cell.set_collapsed(1);
        assert_eq!(Solver::new(NoRandomness).collapse(cell).unwrap(), 1);
    }

    #[test]
    fn collapse_picks_a_candidate() {
        let mut grid = Grid::new(1, 1, islands(4)).unwrap();
        let mut solver = Solver::new(StdRng::seed_from_u64(3));
        let cell = grid.cell_mut(Position::new(0, 0)).unwrap();
        let tile = solver.collapse(cell).unwrap();
        assert!(tile < 4);
        assert_eq!(cell.tile(), Some(tile));
    }

    #[test]
    fn unique_minimum_is_selected_without_randomness() {
        let mut grid = Grid::new(3, 3, islands(3)).unwrap();
        let target = Position::new(2, 1);
        let mut two = FixedBitSet::with_capacity(3);
        two.insert_range(..2);
        grid.cell_mut(target).unwrap().restrict(&two);

        let mut solver = Solver::new(NoRandomness);
        assert_eq!(solver.select_next_candidate(&grid).unwrap(), target);
    }

    #[test]
    fn selection_ignores_collapsed_cells() {
        let mut grid = Grid::new(2, 1, islands(2)).unwrap();
        grid.cell_mut(Position::new(0, 0)).unwrap().set_collapsed(0);
        let mut solver = Solver::new(NoRandomness);
        assert_eq!(
            solver.select_next_candidate(&grid).unwrap(),
            Position::new(1, 0)
        );
    }

    #[test]
    fn neighbours_mode_filters_only_adjacent_cells() {
        let mut grid = Grid::new(3, 1, islands(3)).unwrap();
        let left = Position::new(0, 0);
        grid.cell_mut(left).unwrap().set_collapsed(1);

        let solver = Solver::new(NoRandomness);
        assert_eq!(solver.propagate(&mut grid, left).unwrap(), 2);
        let middle = grid.get(Position::new(1, 0)).unwrap();
        assert_eq!(middle.candidates().unwrap().ones().collect::<Vec<_>>(), vec![1]);
        assert_eq!(grid.get(Position::new(2, 0)).unwrap().candidate_count(), Some(3));
    }

    #[test]
    fn cascade_mode_reaches_distant_cells() {
        let mut grid = Grid::new(3, 1, islands(3)).unwrap();
        let left = Position::new(0, 0);
        grid.cell_mut(left).unwrap().set_collapsed(1);

        let settings = SolverSettings {
            propagation: Propagation::Cascade,
            ..SolverSettings::default()
        };
        let solver = Solver::with_settings(NoRandomness, settings);
        assert_eq!(solver.propagate(&mut grid, left).unwrap(), 4);
        assert_eq!(grid.get(Position::new(2, 0)).unwrap().candidate_count(), Some(1));
    }

    #[test]
    fn propagation_is_idempotent() {
        let mut grid = Grid::new(3, 3, islands(3)).unwrap();
        let centre = Position::new(1, 1);
        grid.cell_mut(centre).unwrap().set_collapsed(0);

        let solver = Solver::new(NoRandomness);
        assert!(solver.propagate(&mut grid, centre).unwrap() > 0);
        let once = grid.clone();
        assert_eq!(solver.propagate(&mut grid, centre).unwrap(), 0);
        assert_eq!(grid, once);
    }

    #[test]
    fn step_on_complete_grid_fails() {
        let mut grid = Grid::new(2, 2, islands(1)).unwrap();
        let mut solver = Solver::new(StdRng::seed_from_u64(0));
        solver.simulate(&mut grid).unwrap();
        assert_eq!(solver.step(&mut grid), Err(WfcError::AlreadyComplete));
        assert_eq!(solver.simulate(&mut grid).unwrap().steps, 0);
    }

    #[test]
    fn contradiction_is_sticky() {
        let mut grid = Grid::new(2, 1, islands(2)).unwrap();
        grid.cell_mut(Position::new(0, 0)).unwrap().set_collapsed(0);
        grid.cell_mut(Position::new(1, 0)).unwrap().set_collapsed(1);
        grid.mark_contradiction(Position::new(1, 0));

        let mut solver = Solver::new(NoRandomness);
        let expected = Err(WfcError::Contradiction {
            position: Position::new(1, 0),
        });
        assert_eq!(solver.step(&mut grid), expected);
        assert_eq!(solver.simulate(&mut grid), expected.map(|_| SolveSummary { steps: 0 }));
    }

    #[test]
    fn restarts_return_the_successful_seed() {
        let template = Grid::new(3, 3, islands(2)).unwrap();
        let (grid, seed) =
            solve_with_restarts(&template, [11, 12], &SolverSettings::default()).unwrap();
        assert_eq!(seed, 11);
        assert!(grid.is_complete());
        assert_eq!(template.unresolved_positions().count(), 9);
    }

    #[test]
    fn restarts_without_seeds_fail() {
        let template = Grid::new(1, 1, islands(1)).unwrap();
        assert!(matches!(
            solve_with_restarts(&template, Vec::new(), &SolverSettings::default()),
            Err(WfcError::Configuration(_))
        ));
    }
}
