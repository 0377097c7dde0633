use serde::{Deserialize, Serialize};

use crate::{Coord, Coord2};

/// State of a single grid position.
///
/// Coordinates are fixed at creation. `hazard` is set at most once during
/// placement, `revealed` only ever goes from `false` to `true`, and a flag can
/// only be toggled while the cell is still hidden.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    coords: Coord2,
    hazard: bool,
    flagged: bool,
    revealed: bool,
    adjacent: u8,
}

impl Cell {
    pub const fn new(coords: Coord2) -> Self {
        Self {
            coords,
            hazard: false,
            flagged: false,
            revealed: false,
            adjacent: 0,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        self.coords
    }

    pub const fn x(&self) -> Coord {
        self.coords.0
    }

    pub const fn y(&self) -> Coord {
        self.coords.1
    }

    pub const fn is_hazard(&self) -> bool {
        self.hazard
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Number of hazards among the neighbors, only meaningful once revealed.
    pub const fn adjacent_count(&self) -> u8 {
        self.adjacent
    }

    /// Marks the cell as a hazard, returns `false` if it already was one.
    pub fn mark_hazard(&mut self) -> bool {
        if self.hazard {
            return false;
        }
        self.hazard = true;
        true
    }

    /// Flips the flag, returns `false` without change when already revealed.
    pub fn toggle_flag(&mut self) -> bool {
        if self.revealed {
            return false;
        }
        self.flagged = !self.flagged;
        true
    }

    /// Reveals the cell with its adjacency count.
    ///
    /// Returns `true` only on the first reveal, so callers can count each cell once.
    pub fn reveal(&mut self, adjacent: u8) -> bool {
        if self.revealed {
            return false;
        }
        self.revealed = true;
        self.adjacent = adjacent;
        true
    }
}
