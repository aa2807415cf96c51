use alloc::vec::Vec;

use crate::*;

impl Board {
    /// Reveals the cell at `coords`, flooding outward while it meets zero cells.
    ///
    /// Out-of-bounds, flagged and already revealed cells are left untouched.
    /// Mines are revealed like any other cell; deciding that this loses the
    /// game is up to the caller.
    pub fn reveal_cell(&mut self, coords: Coord2) -> RevealOutcome {
        if !self.reveal_one(coords) {
            return RevealOutcome::NoChange;
        }
        log::debug!(
            "Revealed cell at {:?}, adjacent mines: {:?}",
            coords,
            self[coords].adjacent_mines()
        );

        if self[coords].is_zero() {
            self.flood_from(coords);
        }
        RevealOutcome::Revealed
    }

    /// Chorded reveal around an already revealed cell.
    ///
    /// Proceeds only when the flagged neighbors match the cell's number. If an
    /// unflagged neighbor is a mine the flags were wrong: that mine is marked
    /// exploded, the whole board is revealed and [`RevealOutcome::HitMine`] is
    /// returned.
    pub fn reveal_neighborhood(&mut self, coords: Coord2) -> RevealOutcome {
        let Some(&cell) = self.get(coords) else {
            return RevealOutcome::NoChange;
        };
        let Some(count) = cell.adjacent_mines() else {
            return RevealOutcome::NoChange;
        };
        if !cell.is_revealed() || cell.is_flagged() || self.count_adjacent_flags(coords) != count
        {
            return RevealOutcome::NoChange;
        }

        if let Some(mine) = self.first_unflagged_mine_neighbor(coords) {
            log::debug!("Chord at {:?} hit unflagged mine at {:?}", coords, mine);
            self.mark_exploded(mine);
            self.reveal_all();
            return RevealOutcome::HitMine;
        }

        let neighbors: Vec<_> = self.iter_neighbors(coords).collect();
        neighbors
            .into_iter()
            .map(|pos| self.reveal_cell(pos))
            .fold(RevealOutcome::NoChange, core::ops::BitOr::bitor)
    }

    /// Marks a single hidden, unflagged cell revealed, returning whether it changed.
    fn reveal_one(&mut self, coords: Coord2) -> bool {
        match self.get_mut(coords) {
            Some(cell) if !cell.flagged && !cell.revealed => {
                cell.revealed = true;
                true
            }
            _ => false,
        }
    }

    /// Depth-first flood over the zero region touching `start`, with an explicit stack.
    fn flood_from(&mut self, start: Coord2) {
        let mut to_visit: Vec<Coord2> = self.iter_neighbors(start).collect();
        log::trace!(
            "Starting flood-fill from {:?}, initial neighbors: {:?}",
            start,
            to_visit
        );

        while let Some(visit_coords) = to_visit.pop() {
            // revealed cells are never pushed twice through here, which bounds the loop
            if !self.reveal_one(visit_coords) {
                continue;
            }
            log::trace!("Flood revealed cell at {:?}", visit_coords);

            if self[visit_coords].is_zero() {
                to_visit.extend(
                    self.iter_neighbors(visit_coords)
                        .filter(|&pos| !self[pos].is_revealed()),
                );
            }
        }
    }
}
