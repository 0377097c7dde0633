use std::fmt;

use minegrid_core::{CellFace, CellView, GameState, Outcome, SessionView};

/// Plain-text rendering of a session snapshot.
pub struct Screen<'a>(pub &'a SessionView);

impl Screen<'_> {
    fn glyph(&self, cell: &CellView) -> char {
        if self.0.triggered_hazard == Some(cell.coords()) {
            return 'X';
        }
        match cell.face() {
            CellFace::Hidden => '.',
            CellFace::Flagged => 'F',
            CellFace::Hazard => '*',
            CellFace::Open(0) => ' ',
            CellFace::Open(count) => char::from(b'0' + count),
        }
    }
}

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        let status = match view.state {
            GameState::Active => "playing",
            GameState::Finished(Outcome::Win) => "won",
            GameState::Finished(Outcome::Loss) => "lost",
        };
        writeln!(
            f,
            "{status}, flags left: {}, revealed: {}/{}",
            view.remaining_flags,
            view.revealed_count,
            view.config.safe_cells()
        )?;

        write!(f, "    ")?;
        for y in 0..view.config.cols {
            write!(f, "{:>3}", y)?;
        }
        writeln!(f)?;

        for (x, row) in view.cells.iter().enumerate() {
            write!(f, "{x:>3} ")?;
            for cell in row {
                write!(f, "{:>3}", self.glyph(cell))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minegrid_core::{Board, GameSession};
    use rand::{SeedableRng, rngs::SmallRng};

    fn session() -> GameSession<SmallRng> {
        let board = Board::from_hazard_coords(2, 3, &[(1, 2)]).unwrap();
        GameSession::with_board(board, SmallRng::seed_from_u64(0)).unwrap()
    }

    #[test]
    fn renders_open_and_hidden_cells() {
        let mut session = session();
        session.reveal((0, 0)).unwrap();

        let text = Screen(&session.snapshot()).to_string();

        assert_eq!(
            text,
            "playing, flags left: 1, revealed: 4/5\n      0  1  2\n  0      1  .\n  1      1  .\n"
        );
    }

    #[test]
    fn marks_triggered_hazard() {
        let mut session = session();
        session.reveal((1, 2)).unwrap();

        let text = Screen(&session.snapshot()).to_string();

        assert!(text.starts_with("lost"));
        assert!(text.lines().last().unwrap().ends_with('X'));
    }
}
