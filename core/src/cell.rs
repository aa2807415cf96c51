use serde::{Deserialize, Serialize};

use crate::Coord2;

/// One grid position with its mine, flag and reveal state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    coords: Coord2,
    /// Mines among the neighbors, `None` for a mined cell.
    adjacent_mines: Option<u8>,
    pub(crate) revealed: bool,
    pub(crate) flagged: bool,
    pub(crate) exploded: bool,
}

impl Cell {
    pub(crate) const fn safe(coords: Coord2, adjacent_mines: u8) -> Self {
        Self {
            coords,
            adjacent_mines: Some(adjacent_mines),
            revealed: false,
            flagged: false,
            exploded: false,
        }
    }

    pub(crate) const fn mine(coords: Coord2) -> Self {
        Self {
            coords,
            adjacent_mines: None,
            revealed: false,
            flagged: false,
            exploded: false,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        self.coords
    }

    pub const fn row(&self) -> u8 {
        self.coords.0
    }

    pub const fn column(&self) -> u8 {
        self.coords.1
    }

    pub const fn adjacent_mines(&self) -> Option<u8> {
        self.adjacent_mines
    }

    pub const fn is_mine(&self) -> bool {
        self.adjacent_mines.is_none()
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// Set only on the mine the player set off, to tell it apart from the others shown at the end.
    pub const fn is_exploded(&self) -> bool {
        self.exploded
    }

    /// Safe cell with no mined neighbors; flood fill spreads through these.
    pub const fn is_zero(&self) -> bool {
        matches!(self.adjacent_mines, Some(0))
    }
}
