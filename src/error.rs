use thiserror::Error;

use crate::Position;

/// Errors raised while building a catalog or grid, or while solving one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WfcError {
    /// Rejected input at construction time: an empty catalog, a zero-sized grid,
    /// or a compatibility relation that is not symmetric.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A cell's candidate set was pruned to nothing.
    #[error("Contradiction: no valid tiles remain at cell {position}")]
    Contradiction {
        /// Cell that ran out of candidates.
        position: Position,
    },

    /// A step was requested but every cell is already collapsed.
    #[error("Grid is already fully collapsed")]
    AlreadyComplete,
}

/// Result type for solver and catalog operations.
pub type Result<T> = std::result::Result<T, WfcError>;
