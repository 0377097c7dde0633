use alloc::collections::VecDeque;
use alloc::vec::Vec;
use smallvec::SmallVec;

use crate::*;

/// Cells opened by a single reveal, in the order they were opened.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cascade {
    opened: Vec<Coord2>,
    hit_hazard: bool,
}

impl Cascade {
    pub fn opened(&self) -> &[Coord2] {
        &self.opened
    }

    pub fn hit_hazard(&self) -> bool {
        self.hit_hazard
    }

    pub fn is_empty(&self) -> bool {
        self.opened.is_empty()
    }

    /// Number of newly opened cells that are not hazards.
    pub fn safe_count(&self) -> CellCount {
        let hazards = usize::from(self.hit_hazard);
        // bounded by the board's cell count
        (self.opened.len() - hazards) as CellCount
    }
}

/// Reveals cells on a board and floods outward through zero-count regions.
///
/// The flood uses an explicit breadth-first frontier: a cell is revealed the
/// moment it is discovered and only zero-count cells enter the frontier, so
/// every cell is processed at most once.
pub struct RevealEngine<'a> {
    board: &'a mut Board,
}

impl<'a> RevealEngine<'a> {
    pub fn new(board: &'a mut Board) -> Self {
        Self { board }
    }

    /// Reveals `coords`, cascading when it has no adjacent hazards.
    ///
    /// Flagged and already revealed targets produce an empty cascade. A hazard
    /// target is revealed on its own and reported through [`Cascade::hit_hazard`].
    pub fn reveal(&mut self, coords: Coord2) -> Result<Cascade> {
        let coords = self.board.validate_coords(coords)?;
        let mut cascade = Cascade::default();

        let target = self.board[coords];
        if target.is_flagged() || target.is_revealed() {
            log::trace!("Ignoring reveal at {coords:?}, flagged or already revealed");
            return Ok(cascade);
        }

        if target.is_hazard() {
            let adjacent = self.board.adjacent_hazard_count(coords);
            self.board.cell_mut(coords).reveal(adjacent);
            cascade.opened.push(coords);
            cascade.hit_hazard = true;
            log::debug!("Revealed hazard at {coords:?}");
            return Ok(cascade);
        }

        let mut frontier = VecDeque::new();
        if self.open_safe(coords, &mut cascade) == Some(0) {
            frontier.push_back(coords);
        }

        while let Some(center) = frontier.pop_front() {
            let hidden: SmallVec<[Coord2; 8]> = self
                .board
                .neighbor_coords(center)
                .filter(|&pos| {
                    let cell = &self.board[pos];
                    !cell.is_revealed() && !cell.is_flagged()
                })
                .collect();

            for pos in hidden {
                if self.open_safe(pos, &mut cascade) == Some(0) {
                    frontier.push_back(pos);
                }
            }
        }

        log::debug!(
            "Reveal at {coords:?} opened {} cells",
            cascade.opened.len()
        );
        Ok(cascade)
    }

    /// Opens a safe cell, returning its adjacency count when it was newly revealed.
    fn open_safe(&mut self, coords: Coord2, cascade: &mut Cascade) -> Option<u8> {
        let adjacent = self.board.adjacent_hazard_count(coords);
        if !self.board.cell_mut(coords).reveal(adjacent) {
            return None;
        }
        log::trace!("Opened {coords:?}, adjacent hazards: {adjacent}");
        cascade.opened.push(coords);
        Some(adjacent)
    }
}
