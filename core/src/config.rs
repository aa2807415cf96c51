use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Board dimensions and mine count, validated on construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    width: Coord,
    height: Coord,
    mines: CellCount,
}

impl BoardConfig {
    pub const fn new_unchecked(width: Coord, height: Coord, mines: CellCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    /// Rejects empty boards and mine counts that would leave no safe cell.
    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidDimensions);
        }
        if mines == 0 {
            return Err(GameError::NoMines);
        }
        if mines >= mult(width, height) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(width, height, mines))
    }

    pub const fn width(&self) -> Coord {
        self.width
    }

    pub const fn height(&self) -> Coord {
        self.height
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    /// `(rows, columns)`, the shape of the cell grid.
    pub const fn size(&self) -> Coord2 {
        (self.height, self.width)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.height && coords.1 < self.width {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }
}

/// The three fixed presets a host can offer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameLevel {
    #[default]
    Easy,
    Medium,
    Hard,
}

const LEVELS: [(GameLevel, BoardConfig); 3] = [
    (GameLevel::Easy, BoardConfig::new_unchecked(9, 9, 10)),
    (GameLevel::Medium, BoardConfig::new_unchecked(16, 16, 40)),
    (GameLevel::Hard, BoardConfig::new_unchecked(16, 30, 99)),
];

impl GameLevel {
    pub const ALL: [GameLevel; 3] = [GameLevel::Easy, GameLevel::Medium, GameLevel::Hard];

    pub const fn config(self) -> BoardConfig {
        LEVELS[self as usize].1
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for GameLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(UnknownLevel)
    }
}

#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("Unknown level, expected one of: easy, medium, hard")]
pub struct UnknownLevel;
