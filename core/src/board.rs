use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Rectangular grid of cells plus the number of mines it holds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Board {
    /// Generates a fresh board, never placing a mine on `safe_cell`.
    pub fn create(config: BoardConfig, safe_cell: Option<Coord2>, seed: u64) -> Result<Self> {
        let config = BoardConfig::new(config.width(), config.height(), config.mines())?;
        if let Some(coords) = safe_cell {
            config.validate_coords(coords)?;
        }

        let layout = RandomMineGenerator::new(seed, safe_cell).generate(config);
        Ok(Self::from_layout(&layout))
    }

    /// Builds the cell grid for `layout`, counting each safe cell's mined neighbors once.
    pub fn from_layout(layout: &MineLayout) -> Self {
        let cells = Array2::from_shape_fn(layout.size().to_nd_index(), |(row, column)| {
            let coords = (row as Coord, column as Coord);
            if layout.contains_mine(coords) {
                Cell::mine(coords)
            } else {
                Cell::safe(coords, layout.adjacent_mine_count(coords))
            }
        });

        Self {
            cells,
            mine_count: layout.mine_count(),
        }
    }

    /// `(rows, columns)`.
    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (
            dim.0.try_into().unwrap_or(Coord::MAX),
            dim.1.try_into().unwrap_or(Coord::MAX),
        )
    }

    pub fn width(&self) -> Coord {
        self.size().1
    }

    pub fn height(&self) -> Coord {
        self.size().0
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        let (rows, columns) = self.size();
        coords.0 < rows && coords.1 < columns
    }

    pub fn get(&self, coords: Coord2) -> Option<&Cell> {
        self.cells.get(coords.to_nd_index())
    }

    pub(crate) fn get_mut(&mut self, coords: Coord2) -> Option<&mut Cell> {
        self.cells.get_mut(coords.to_nd_index())
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = &Cell>> {
        self.cells.outer_iter().map(|row| row.into_iter())
    }

    /// The mine set this board was built from.
    pub fn layout(&self) -> MineLayout {
        MineLayout::from_mine_mask(self.cells.map(Cell::is_mine))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    pub fn count_hidden(&self) -> CellCount {
        self.iter()
            .filter(|cell| !cell.is_revealed())
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    pub fn count_flags(&self) -> CellCount {
        self.iter()
            .filter(|cell| cell.is_flagged())
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    pub fn count_adjacent_flags(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_flagged())
            .count()
            .try_into()
            .unwrap_or(u8::MAX)
    }

    pub fn has_unflagged_mine_neighbor(&self, coords: Coord2) -> bool {
        self.first_unflagged_mine_neighbor(coords).is_some()
    }

    pub(crate) fn first_unflagged_mine_neighbor(&self, coords: Coord2) -> Option<Coord2> {
        self.iter_neighbors(coords).find(|&pos| {
            let cell = self[pos];
            cell.is_mine() && !cell.is_flagged()
        })
    }

    /// Inverts the flag on a hidden cell; revealed or out-of-bounds cells are left alone.
    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        match self.get_mut(coords) {
            Some(cell) if !cell.revealed => {
                cell.flagged = !cell.flagged;
                MarkOutcome::Changed
            }
            _ => MarkOutcome::NoChange,
        }
    }

    /// Sets every cell revealed. Only used once the game is decided.
    pub fn reveal_all(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.revealed = true;
        }
    }

    pub(crate) fn mark_exploded(&mut self, coords: Coord2) {
        if let Some(cell) = self.get_mut(coords) {
            cell.exploded = true;
        }
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

    fn board(size: Coord2, mines: &[Coord2]) -> Board {
        Board::from_layout(&MineLayout::from_mine_coords(size, mines).unwrap())
    }

    #[test]
    fn from_layout_counts_neighbors() {
        // . * .
        // . . .
        // * . *
        let board = board((3, 3), &[(0, 1), (2, 0), (2, 2)]);

        assert_eq!(board[(0, 0)].adjacent_mines(), Some(1));
        assert_eq!(board[(1, 1)].adjacent_mines(), Some(3));
        assert_eq!(board[(1, 0)].adjacent_mines(), Some(2));
        assert_eq!(board[(2, 1)].adjacent_mines(), Some(2));
        assert_eq!(board[(0, 1)].adjacent_mines(), None);
        assert!(board[(2, 2)].is_mine());
        assert_eq!(board.mine_count(), 3);
        assert_eq!(board.layout().mine_count(), 3);
    }

    #[test]
    fn create_rejects_bad_input() {
        let config = BoardConfig::new_unchecked(3, 3, 9);
        assert_eq!(Board::create(config, None, 0), Err(GameError::TooManyMines));

        let config = GameLevel::Easy.config();
        assert_eq!(
            Board::create(config, Some((9, 0)), 0),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn create_keeps_safe_cell_clear() {
        let config = BoardConfig::new(3, 3, 8).unwrap();

        let board = Board::create(config, Some((1, 1)), 11).unwrap();

        assert!(!board[(1, 1)].is_mine());
        assert_eq!(board[(1, 1)].adjacent_mines(), Some(8));
        assert_eq!(board.iter().filter(|cell| cell.is_mine()).count(), 8);
    }

    #[test]
    fn flag_toggles_only_hidden_cells() {
        let mut board = board((2, 2), &[(0, 0)]);

        assert_eq!(board.toggle_flag((0, 0)), MarkOutcome::Changed);
        assert!(board[(0, 0)].is_flagged());
        assert_eq!(board.count_flags(), 1);

        assert_eq!(board.toggle_flag((0, 0)), MarkOutcome::Changed);
        assert!(!board[(0, 0)].is_flagged());

        board.reveal_all();
        assert_eq!(board.toggle_flag((1, 1)), MarkOutcome::NoChange);
        assert_eq!(board.toggle_flag((5, 5)), MarkOutcome::NoChange);
        assert_eq!(board.count_hidden(), 0);
    }

    #[test]
    fn neighbor_flag_and_mine_checks() {
        let mut board = board((3, 3), &[(0, 0), (0, 2)]);

        assert_eq!(board.count_adjacent_flags((1, 1)), 0);
        assert!(board.has_unflagged_mine_neighbor((1, 1)));

        board.toggle_flag((0, 0));
        board.toggle_flag((2, 2));
        assert_eq!(board.count_adjacent_flags((1, 1)), 2);
        assert_eq!(board.first_unflagged_mine_neighbor((1, 1)), Some((0, 2)));

        board.toggle_flag((0, 2));
        assert!(!board.has_unflagged_mine_neighbor((1, 1)));
        assert!(!board.has_unflagged_mine_neighbor((2, 0)));
    }
}
