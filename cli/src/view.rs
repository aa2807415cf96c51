use mineboard_core::{Board, Cell, Game, GameStatus};
use serde::Serialize;
use std::fmt::{self, Display};

/// What the player may see of a cell. Mines stay out of it until revealed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibleCell {
    Hidden,
    Flagged,
    Open(u8),
    Mine,
    Exploded,
}

impl From<&Cell> for VisibleCell {
    fn from(cell: &Cell) -> Self {
        // a flag on a mine stays visible after the final reveal
        if cell.is_flagged() && !(cell.is_revealed() && cell.is_mine()) {
            return Self::Flagged;
        }
        if !cell.is_revealed() {
            return Self::Hidden;
        }
        match cell.adjacent_mines() {
            None if cell.is_exploded() => Self::Exploded,
            None => Self::Mine,
            Some(n) => Self::Open(n),
        }
    }
}

/// Player-visible grid, row by row.
pub fn visible_rows(board: &Board) -> Vec<Vec<VisibleCell>> {
    board
        .rows()
        .map(|cells| cells.map(VisibleCell::from).collect())
        .collect()
}

/// Text rendering of a board, one character per cell.
///
/// | Cell                | Char |
/// | ------------------- | ---- |
/// | hidden              | `#`  |
/// | flagged             | `F`  |
/// | revealed zero       | `.`  |
/// | revealed number `n` | `n`  |
/// | revealed mine       | `*`  |
/// | exploded mine       | `X`  |
pub struct BoardView<'a>(pub &'a Board);

impl Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // column numbers, 1-based like the commands
        write!(f, "    ")?;
        for column in 1..=self.0.width() {
            write!(f, "{:>2}", column % 100)?;
        }
        writeln!(f)?;

        for (row, cells) in self.0.rows().enumerate() {
            write!(f, "{:>3} ", row + 1)?;
            for cell in cells {
                write!(f, " {}", glyph(cell))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn glyph(cell: &Cell) -> char {
    match VisibleCell::from(cell) {
        VisibleCell::Hidden => '#',
        VisibleCell::Flagged => 'F',
        VisibleCell::Open(0) => '.',
        VisibleCell::Open(n) => char::from(b'0' + n),
        VisibleCell::Mine => '*',
        VisibleCell::Exploded => 'X',
    }
}

/// Mine counter, status face and timer, each counter padded to three digits.
pub struct HeaderView<'a> {
    pub game: &'a Game,
    pub elapsed_secs: u64,
}

impl Display for HeaderView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let face = match self.game.status() {
            GameStatus::Dead => "x_x",
            GameStatus::Success => "B-)",
            GameStatus::Pending | GameStatus::InProgress => ":-)",
        };
        let level = self
            .game
            .level()
            .map(|level| level.to_string())
            .unwrap_or_else(|| "Custom".to_string());
        write!(
            f,
            "{level}  [{:03}]  {face}  [{:03}]",
            self.game.mines_left(),
            self.elapsed_secs.min(999)
        )
    }
}
