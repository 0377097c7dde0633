use alloc::collections::VecDeque;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
}

/// Valid transitions:
/// - Active -> Finished(Win)
/// - Active -> Finished(Loss)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Active,
    Finished(Outcome),
}

impl GameState {
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished(_))
    }

    pub const fn outcome(self) -> Option<Outcome> {
        match self {
            Self::Active => None,
            Self::Finished(outcome) => Some(outcome),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::Active
    }
}

/// One playthrough, from a freshly mined board to a win or a loss.
///
/// Once finished, every reveal or flag request is accepted and ignored. State
/// changes are queued as [`SessionEvent`]s for the host to drain.
#[derive(Clone, Debug)]
pub struct GameSession<R> {
    config: GameConfig,
    board: Board,
    revealed_count: CellCount,
    remaining_flags: CellCount,
    state: GameState,
    triggered_hazard: Option<Coord2>,
    events: VecDeque<SessionEvent>,
    rng: R,
}

impl<R: RandomSource> GameSession<R> {
    /// Starts a session on a board mined by `rng`, which is kept for later sessions.
    pub fn new(config: GameConfig, mut rng: R) -> Result<Self> {
        let config = config.validate()?;
        let board = Board::for_config(config, &mut rng)?;
        Self::with_board(board, rng)
    }

    /// Starts a session on a prepared board.
    ///
    /// The board must hold at least one hazard and keep at least one safe cell.
    pub fn with_board(board: Board, rng: R) -> Result<Self> {
        let config = GameConfig::new(board.rows(), board.cols(), board.hazard_count())?;
        let mut session = Self {
            config,
            board,
            revealed_count: 0,
            remaining_flags: config.hazards,
            state: GameState::Active,
            triggered_hazard: None,
            events: VecDeque::new(),
            rng,
        };
        session.events.push_back(SessionEvent::Started { config });
        log::debug!(
            "Session started: {}x{} with {} hazards",
            config.rows,
            config.cols,
            config.hazards
        );
        Ok(session)
    }

    /// Discards the current board and all counters, then starts over on a new board.
    ///
    /// An invalid configuration leaves the current session untouched.
    pub fn new_session(&mut self, rows: Coord, cols: Coord, hazards: CellCount) -> Result<()> {
        self.new_session_with(GameConfig::new(rows, cols, hazards)?)
    }

    pub fn new_session_with(&mut self, config: GameConfig) -> Result<()> {
        let config = config.validate()?;
        let board = Board::for_config(config, &mut self.rng)?;

        self.config = config;
        self.board = board;
        self.revealed_count = 0;
        self.remaining_flags = config.hazards;
        self.state = GameState::Active;
        self.triggered_hazard = None;
        self.events.clear();
        self.events.push_back(SessionEvent::Started { config });
        log::debug!(
            "New session: {}x{} with {} hazards",
            config.rows,
            config.cols,
            config.hazards
        );
        Ok(())
    }

    /// Starts over with the current configuration.
    pub fn restart(&mut self) -> Result<()> {
        self.new_session_with(self.config)
    }
}

impl<R> GameSession<R> {
    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    /// Number of safe cells that must be revealed to win.
    pub fn cells_to_reveal(&self) -> CellCount {
        self.config.safe_cells()
    }

    pub fn remaining_flags(&self) -> CellCount {
        self.remaining_flags
    }

    /// The hazard whose reveal lost the game.
    pub fn triggered_hazard(&self) -> Option<Coord2> {
        self.triggered_hazard
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;
        if self.state.is_finished() {
            log::trace!("Session finished, ignoring reveal at {coords:?}");
            return Ok(RevealOutcome::NoChange);
        }

        let cascade = RevealEngine::new(&mut self.board).reveal(coords)?;
        if cascade.is_empty() {
            return Ok(RevealOutcome::NoChange);
        }

        for &pos in cascade.opened() {
            self.push_cell_changed(pos);
        }

        if cascade.hit_hazard() {
            self.triggered_hazard = Some(coords);
            self.state = GameState::Finished(Outcome::Loss);
            self.expose_hazards(coords);
            self.push_state_changed();
            return Ok(RevealOutcome::HitHazard);
        }

        self.revealed_count += cascade.safe_count();
        if self.revealed_count == self.cells_to_reveal() {
            self.state = GameState::Finished(Outcome::Win);
            self.push_state_changed();
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    /// Toggles the flag at `coords`.
    ///
    /// A new flag needs a remaining flag, so at most `hazards` flags are on the board.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.board.validate_coords(coords)?;
        if self.state.is_finished() {
            return Ok(FlagOutcome::NoChange);
        }

        let cell = self.board[coords];
        if cell.is_revealed() {
            return Ok(FlagOutcome::NoChange);
        }
        if !cell.is_flagged() && self.remaining_flags == 0 {
            log::debug!("No flags left, ignoring flag at {coords:?}");
            return Ok(FlagOutcome::NoChange);
        }

        self.board.cell_mut(coords).toggle_flag();
        let outcome = if self.board[coords].is_flagged() {
            self.remaining_flags -= 1;
            FlagOutcome::Flagged
        } else {
            self.remaining_flags += 1;
            FlagOutcome::Unflagged
        };
        log::trace!("{outcome:?} {coords:?}, {} flags left", self.remaining_flags);

        self.push_cell_changed(coords);
        self.events.push_back(SessionEvent::FlagsChanged {
            remaining: self.remaining_flags,
        });
        Ok(outcome)
    }

    pub fn cell_view(&self, coords: Coord2) -> Result<CellView> {
        let coords = self.board.validate_coords(coords)?;
        Ok(CellView::new(&self.board[coords], self.state))
    }

    pub fn snapshot(&self) -> SessionView {
        let (rows, cols) = self.board.size();
        let cells = (0..rows)
            .map(|x| {
                (0..cols)
                    .map(|y| CellView::new(&self.board[(x, y)], self.state))
                    .collect()
            })
            .collect();

        SessionView {
            config: self.config,
            state: self.state,
            revealed_count: self.revealed_count,
            remaining_flags: self.remaining_flags,
            triggered_hazard: self.triggered_hazard,
            cells,
        }
    }

    /// Takes every queued notification, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = SessionEvent> {
        self.events.drain(..)
    }

    /// Reveals the remaining unflagged hazards and reports every hazard as changed.
    fn expose_hazards(&mut self, triggered: Coord2) {
        let hazards: Vec<Coord2> = self
            .board
            .hazard_cells()
            .map(Cell::coords)
            .filter(|&pos| pos != triggered)
            .collect();

        for pos in hazards {
            if !self.board[pos].is_flagged() {
                let adjacent = self.board.adjacent_hazard_count(pos);
                self.board.cell_mut(pos).reveal(adjacent);
            }
            self.push_cell_changed(pos);
        }
    }

    fn push_cell_changed(&mut self, coords: Coord2) {
        let view = CellView::new(&self.board[coords], self.state);
        self.events.push_back(SessionEvent::CellChanged(view));
    }

    fn push_state_changed(&mut self) {
        log::debug!(
            "Session {:?} after {} of {} reveals",
            self.state,
            self.revealed_count,
            self.cells_to_reveal()
        );
        self.events.push_back(SessionEvent::StateChanged {
            state: self.state,
            revealed_count: self.revealed_count,
        });
    }
}
