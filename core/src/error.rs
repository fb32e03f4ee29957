use thiserror::Error;

use crate::{CellId, Coord, MIN_SIZE};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board size {0} is below the minimum of {min}", min = MIN_SIZE)]
    InvalidSize(Coord),
    #[error("Cell {0} is not on the board")]
    InvalidCell(CellId),
    #[error("Row {0}, column {1} is not on the board")]
    InvalidCoords(Coord, Coord),
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(#[from] SnapshotError),
}

/// Reasons a saved board is refused before any state is touched.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("board size {0} is out of range")]
    SizeOutOfRange(u32),
    #[error("position {0} is outside the board")]
    PositionOutOfRange(u32),
    #[error("position {0} is listed twice")]
    DuplicatePosition(u32),
    #[error("mines and clearable cells cover {actual} of {expected} cells")]
    IncompletePartition { expected: u32, actual: u32 },
    #[error("position {0} is a revealed mine")]
    RevealedMine(u32),
}

pub type Result<T> = core::result::Result<T, GameError>;
