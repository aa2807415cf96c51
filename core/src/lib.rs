//! Rule engine for a single-player mine-clearing grid puzzle.
//!
//! [`Board`] is the explicit grid value every operation works on: it is
//! generated from a [`BoardConfig`], revealed cell by cell (with flood fill
//! through zero cells) and chorded around numbered cells. [`Game`] layers the
//! status machine a host needs on top: first-move safety, detonation and win
//! detection.

#![no_std]

extern crate alloc;

use core::ops::{BitOr, Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use config::*;
pub use error::*;
pub use game::*;
pub use generator::*;
pub use types::*;

mod board;
mod cell;
mod config;
mod engine;
mod error;
mod game;
mod generator;
mod types;

/// Packed mine set, co-indexed with the board grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX);
        Self {
            mine_mask,
            mine_count,
        }
    }

    /// Builds a layout with mines at exactly `mine_coords`, duplicates counted once.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.mine_mask.dim();
        (
            dim.0.try_into().unwrap_or(Coord::MAX),
            dim.1.try_into().unwrap_or(Coord::MAX),
        )
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len().try_into().unwrap_or(CellCount::MAX)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Mines among the in-bounds neighbors of `coords`.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        neighbors(coords)
            .into_iter()
            .filter_map(|candidate| checked_coords(candidate, self.size()))
            .filter(|&pos| self[pos])
            .count()
            .try_into()
            .unwrap_or(u8::MAX)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (row, column): Coord2) -> &Self::Output {
        &self.mine_mask[(row as usize, column as usize)]
    }
}

impl IndexMut<Coord2> for MineLayout {
    fn index_mut(&mut self, (row, column): Coord2) -> &mut Self::Output {
        &mut self.mine_mask[(row as usize, column as usize)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}
