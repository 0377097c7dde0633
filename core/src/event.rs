use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a renderer should draw for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellFace {
    Hidden,
    Flagged,
    Open(u8),
    Hazard,
}

/// Player-visible state of one cell.
///
/// `hazard` is only ever `true` for revealed cells, or for every hazard once
/// the session is lost; `adjacent` is `0` until the cell is revealed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub x: Coord,
    pub y: Coord,
    pub revealed: bool,
    pub flagged: bool,
    pub hazard: bool,
    pub adjacent: u8,
}

impl CellView {
    pub fn new(cell: &Cell, state: GameState) -> Self {
        let exposed = cell.is_revealed() || state == GameState::Finished(Outcome::Loss);
        Self {
            x: cell.x(),
            y: cell.y(),
            revealed: cell.is_revealed(),
            flagged: cell.is_flagged(),
            hazard: exposed && cell.is_hazard(),
            adjacent: if cell.is_revealed() {
                cell.adjacent_count()
            } else {
                0
            },
        }
    }

    pub fn coords(&self) -> Coord2 {
        (self.x, self.y)
    }

    pub fn face(&self) -> CellFace {
        match (self.revealed, self.flagged, self.hazard) {
            (true, _, true) => CellFace::Hazard,
            (true, _, false) => CellFace::Open(self.adjacent),
            (false, true, _) => CellFace::Flagged,
            (false, false, true) => CellFace::Hazard,
            (false, false, false) => CellFace::Hidden,
        }
    }
}

/// Full snapshot of a session for hosts that poll rather than follow events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub config: GameConfig,
    pub state: GameState,
    pub revealed_count: CellCount,
    pub remaining_flags: CellCount,
    pub triggered_hazard: Option<Coord2>,
    /// Cells indexed `[row][col]`.
    pub cells: Vec<Vec<CellView>>,
}

/// Notification queued by a session whenever something a host renders changes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    Started {
        config: GameConfig,
    },
    CellChanged(CellView),
    FlagsChanged {
        remaining: CellCount,
    },
    StateChanged {
        state: GameState,
        revealed_count: CellCount,
    },
}
