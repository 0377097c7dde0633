use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {rows}x{cols} board cannot hold {hazards} hazards")]
    InvalidConfiguration {
        rows: Coord,
        cols: Coord,
        hazards: CellCount,
    },
    #[error("Coordinates ({x}, {y}) are outside the board")]
    OutOfBounds { x: Coord, y: Coord },
}

pub type Result<T> = core::result::Result<T, GameError>;
