use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Rectangular arrangement of cells indexed by `(row, column)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    hazard_count: CellCount,
}

impl Board {
    /// Allocates a `rows x cols` board of hidden, hazard-free cells.
    pub fn generate(rows: Coord, cols: Coord) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidConfiguration {
                rows,
                cols,
                hazards: 0,
            });
        }

        // shape is bounded by `Coord`, so the casts below cannot truncate
        let cells = Array2::from_shape_fn((usize::from(rows), usize::from(cols)), |(x, y)| {
            Cell::new((x as Coord, y as Coord))
        });
        log::trace!("Generated {rows}x{cols} board");

        Ok(Self {
            cells,
            hazard_count: 0,
        })
    }

    /// Generates a board for `config` and places its hazards using `rng`.
    pub fn for_config<R: RandomSource + ?Sized>(config: GameConfig, rng: &mut R) -> Result<Self> {
        let mut board = Self::generate(config.rows, config.cols)?;
        board.place_hazards(config.hazards, rng)?;
        Ok(board)
    }

    /// Builds a board with hazards at fixed positions, repeated positions count once.
    pub fn from_hazard_coords(rows: Coord, cols: Coord, hazards: &[Coord2]) -> Result<Self> {
        let mut board = Self::generate(rows, cols)?;

        for &coords in hazards {
            let coords = board.validate_coords(coords)?;
            if board.cells[coords.to_nd_index()].mark_hazard() {
                board.hazard_count += 1;
            }
        }

        GameConfig::new(rows, cols, board.hazard_count)?;
        Ok(board)
    }

    /// Marks `count` distinct cells as hazards, drawing positions uniformly and
    /// retrying whenever a drawn cell already holds a hazard.
    ///
    /// Fails with [`GameError::InvalidConfiguration`] instead of sampling when
    /// the board could not keep at least one safe cell.
    pub fn place_hazards<R: RandomSource + ?Sized>(
        &mut self,
        count: CellCount,
        rng: &mut R,
    ) -> Result<()> {
        let (rows, cols) = self.size();
        let requested = self.hazard_count.saturating_add(count);
        if count == 0 || requested >= self.total_cells() {
            return Err(GameError::InvalidConfiguration {
                rows,
                cols,
                hazards: requested,
            });
        }

        let mut placed: CellCount = 0;
        let mut collisions = 0usize;
        while placed < count {
            let x = rng.random_inclusive(0, usize::from(rows) - 1);
            let y = rng.random_inclusive(0, usize::from(cols) - 1);
            match self.cells.get_mut([x, y]) {
                Some(cell) => {
                    if cell.mark_hazard() {
                        placed += 1;
                    } else {
                        collisions += 1;
                    }
                }
                None => collisions += 1,
            }
        }
        self.hazard_count = requested;

        log::debug!("Placed {count} hazards on {rows}x{cols} board, {collisions} collisions");
        if collisions > usize::from(self.total_cells()) {
            log::warn!(
                "Hazard placement needed {collisions} retries, {requested} of {} cells are hazards",
                self.total_cells()
            );
        }
        Ok(())
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn hazard_count(&self) -> CellCount {
        self.hazard_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.hazard_count
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.size();
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds {
                x: coords.0,
                y: coords.1,
            })
        }
    }

    pub fn get(&self, coords: Coord2) -> Option<&Cell> {
        self.cells.get(coords.to_nd_index())
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }

    /// Coordinates of the in-bounds neighbors of `coords`.
    pub fn neighbor_coords(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    /// The up to 8 cells around `coords`, clamped at the board edges.
    pub fn neighbors(&self, coords: Coord2) -> impl Iterator<Item = &Cell> {
        self.neighbor_coords(coords).map(move |pos| &self[pos])
    }

    pub fn adjacent_hazard_count(&self, coords: Coord2) -> u8 {
        // at most 8 neighbors
        self.neighbors(coords).filter(|cell| cell.is_hazard()).count() as u8
    }

    pub fn hazard_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|cell| cell.is_hazard())
    }

    /// All cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn generate_sets_matching_coordinates() {
        let board = Board::generate(3, 4).unwrap();

        assert_eq!(board.size(), (3, 4));
        assert_eq!(board.total_cells(), 12);
        for x in 0..3 {
            for y in 0..4 {
                let cell = board[(x, y)];
                assert_eq!(cell.coords(), (x, y));
                assert!(!cell.is_hazard() && !cell.is_revealed() && !cell.is_flagged());
            }
        }
    }

    #[test]
    fn generate_rejects_empty_board() {
        assert!(matches!(
            Board::generate(0, 5),
            Err(GameError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn place_hazards_is_exact() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut board = Board::generate(16, 30).unwrap();

        board.place_hazards(99, &mut rng).unwrap();

        assert_eq!(board.hazard_count(), 99);
        assert_eq!(board.hazard_cells().count(), 99);
        assert_eq!(board.safe_cell_count(), 381);
    }

    #[test]
    fn place_hazards_fills_all_but_one() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut board = Board::generate(3, 3).unwrap();

        board.place_hazards(8, &mut rng).unwrap();

        assert_eq!(board.hazard_cells().count(), 8);
    }

    #[test]
    fn place_hazards_redraws_occupied_cells() {
        let mut board = Board::generate(2, 2).unwrap();
        let mut rng = crate::random::Scripted::new(&[1, 0, 1, 0, 1, 0, 0, 1]);

        board.place_hazards(2, &mut rng).unwrap();

        let hazards: Vec<_> = board.hazard_cells().map(Cell::coords).collect();
        assert_eq!(hazards, [(0, 1), (1, 0)]);
        assert_eq!(board.hazard_count(), 2);
        assert!(rng.is_exhausted());
    }

    #[test]
    fn place_hazards_rejects_full_board() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut board = Board::generate(2, 2).unwrap();

        let err = board.place_hazards(4, &mut rng).unwrap_err();

        assert_eq!(
            err,
            GameError::InvalidConfiguration {
                rows: 2,
                cols: 2,
                hazards: 4
            }
        );
        assert_eq!(board.hazard_cells().count(), 0);
    }

    #[test]
    fn same_seed_same_layout() {
        let config = GameConfig::intermediate();
        let a = Board::for_config(config, &mut SmallRng::seed_from_u64(9)).unwrap();
        let b = Board::for_config(config, &mut SmallRng::seed_from_u64(9)).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn from_hazard_coords_counts_duplicates_once() {
        let board = Board::from_hazard_coords(3, 3, &[(2, 2), (2, 2), (0, 1)]).unwrap();

        assert_eq!(board.hazard_count(), 2);
        assert!(board[(2, 2)].is_hazard());
    }

    #[test]
    fn from_hazard_coords_rejects_out_of_bounds() {
        assert_eq!(
            Board::from_hazard_coords(3, 3, &[(3, 0)]),
            Err(GameError::OutOfBounds { x: 3, y: 0 })
        );
    }

    #[test]
    fn neighbors_are_clamped() {
        let board = Board::from_hazard_coords(3, 3, &[(2, 2)]).unwrap();

        let corner: Vec<_> = board.neighbors((0, 0)).map(Cell::coords).collect();
        assert_eq!(corner, [(0, 1), (1, 0), (1, 1)]);
        assert_eq!(board.neighbors((1, 1)).count(), 8);
        assert_eq!(board.adjacent_hazard_count((1, 1)), 1);
        assert_eq!(board.adjacent_hazard_count((0, 0)), 0);
    }

    #[test]
    fn validate_coords_checks_both_axes() {
        let board = Board::generate(2, 5).unwrap();

        assert_eq!(board.validate_coords((1, 4)), Ok((1, 4)));
        assert_eq!(
            board.validate_coords((2, 0)),
            Err(GameError::OutOfBounds { x: 2, y: 0 })
        );
        assert!(board.get((0, 5)).is_none());
    }
}
