//! Error kinds reported by map generation.

use serde::Serialize;
use thiserror::Error;

use crate::types::Cell;

#[derive(Clone, Debug, PartialEq, Error, Serialize)]
pub enum MapGenError {
    /// A cell was addressed outside the grid. Internal bookkeeping should make
    /// this unreachable.
    #[error("cell ({}, {}) lies outside the {width}x{height} grid", .cell.x, .cell.y)]
    OutOfBounds { cell: Cell, width: usize, height: usize },

    /// The placement constraints cannot be met on the current map.
    #[error("no valid placement: placed {placed} of {requested} before candidates ran out")]
    NoValidPlacement { requested: usize, placed: usize },

    /// Generation left no walkable cell at all.
    #[error("floor registry is empty; the generated map is fully solid")]
    EmptyFloorRegistry,

    #[error("invalid generator config: {0}")]
    InvalidConfig(String),

    #[error(
        "carving stopped after {iterations} iterations with {walkable} of {target} walkable cells"
    )]
    CarveBudgetExhausted { iterations: usize, walkable: usize, target: usize },
}

impl MapGenError {
    /// Whether regenerating with other parameters or another seed can help.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::OutOfBounds { .. } | Self::InvalidConfig(_))
    }
}
