mod common;

use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use tile_collapse::{Grid, Propagation, Solver, SolverSettings, WfcError};

use common::{adjacent_pairs_compatible, complete_streets, partial_streets};

fn settings(cascade: bool) -> SolverSettings {
    SolverSettings {
        propagation: if cascade {
            Propagation::Cascade
        } else {
            Propagation::Neighbours
        },
        ..SolverSettings::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn completed_grids_are_valid(
        width in 1usize..9,
        height in 1usize..9,
        seed in any::<u64>(),
        cascade in any::<bool>(),
    ) {
        let mut grid = Grid::new(width, height, complete_streets()).unwrap();
        let summary = Solver::with_settings(StdRng::seed_from_u64(seed), settings(cascade))
            .simulate(&mut grid)
            .unwrap();
        prop_assert_eq!(summary.steps, width * height);
        prop_assert!(grid.is_complete());
        prop_assert!(adjacent_pairs_compatible(&grid));
    }

    #[test]
    fn selection_picks_a_lowest_entropy_cell(
        seed in any::<u64>(),
        steps in 0usize..20,
        cascade in any::<bool>(),
    ) {
        let mut grid = Grid::new(6, 6, partial_streets()).unwrap();
        let mut solver = Solver::with_settings(StdRng::seed_from_u64(seed), settings(cascade));
        for _ in 0..steps {
            if solver.step(&mut grid).is_err() {
                break;
            }
        }
        let lowest = grid.cells().filter_map(|cell| cell.candidate_count()).min();
        match solver.select_next_candidate(&grid) {
            Ok(position) => {
                let count = grid.get(position).unwrap().candidate_count();
                prop_assert_eq!(count, lowest);
            }
            Err(WfcError::Contradiction { position }) => {
                prop_assert_eq!(grid.contradiction(), Some(position));
            }
            Err(err) => prop_assert!(false, "unexpected {}", err),
        }
    }

    #[test]
    fn repeated_propagation_removes_nothing(
        seed in any::<u64>(),
        steps in 1usize..30,
        cascade in any::<bool>(),
    ) {
        let mut grid = Grid::new(6, 6, complete_streets()).unwrap();
        let mut solver = Solver::with_settings(StdRng::seed_from_u64(seed), settings(cascade));
        let mut last = None;
        for _ in 0..steps {
            last = Some(solver.step(&mut grid).unwrap());
        }
        let event = last.unwrap();
        let before = grid.clone();
        prop_assert_eq!(solver.propagate(&mut grid, event.position).unwrap(), 0);
        prop_assert_eq!(grid, before);
    }

    #[test]
    fn reset_matches_a_fresh_grid(seed in any::<u64>(), steps in 0usize..40) {
        let catalog = partial_streets();
        let mut grid = Grid::new(7, 4, catalog.clone()).unwrap();
        let mut solver = Solver::new(StdRng::seed_from_u64(seed));
        for _ in 0..steps {
            if solver.step(&mut grid).is_err() {
                break;
            }
        }
        grid.reset();
        prop_assert_eq!(grid, Grid::new(7, 4, catalog).unwrap());
    }
}
