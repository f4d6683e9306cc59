//! # `TileCollapse`
//!
//! `TileCollapse` fills a rectangular grid with tiles from a catalog so that every
//! pair of neighbouring tiles is compatible, using Wave Function Collapse.

// #![deny(warnings)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod catalog;
mod cell;
pub mod config;
mod direction;
mod error;
mod grid;
mod progress;
mod rules;
mod signature;
mod solver;
mod stepper;
mod tile;

pub use catalog::{TileCatalog, TileId};
pub use cell::{Cell, CellState};
pub use direction::{ALL_DIRECTIONS, Direction};
pub use error::{Result, WfcError};
pub use grid::{Grid, Position, SolveStatus};
pub use progress::SolveProgress;
pub use rules::Rules;
pub use signature::{SignatureProvider, edge_signature};
pub use solver::{
    CollapseEvent, Propagation, SolveSummary, Solver, SolverSettings, solve_with_restarts,
};
pub use stepper::Stepper;
pub use tile::{ConnectionTag, Scheme, Signature, Sockets, Tile};
