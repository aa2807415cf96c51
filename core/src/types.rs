use ndarray::Array2;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, column)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Compass offsets `(d_row, d_column)` around a cell, row by row.
const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Raw neighbor candidates of `coords`.
///
/// Candidates past an edge are included unchanged (they may be negative or
/// beyond the board), so callers must check bounds before indexing, e.g. with
/// [`checked_coords`].
pub fn neighbors(coords: Coord2) -> [(isize, isize); 8] {
    let (row, column) = (coords.0 as isize, coords.1 as isize);
    DISPLACEMENTS.map(|(d_row, d_column)| (row + d_row, column + d_column))
}

/// Narrows a signed candidate back to board coordinates when it lies inside `bounds`.
pub fn checked_coords((row, column): (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let row = Coord::try_from(row).ok()?;
    let column = Coord::try_from(column).ok()?;
    (row < bounds.0 && column < bounds.1).then_some((row, column))
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        let dim = self.dim();
        let bounds = (
            dim.0.try_into().unwrap_or(Coord::MAX),
            dim.1.try_into().unwrap_or(Coord::MAX),
        );
        NeighborIter::new(index, bounds)
    }
}

/// In-bounds neighbors of a cell, skipping the candidates [`neighbors`] yields past an edge.
#[derive(Debug)]
pub struct NeighborIter {
    candidates: [(isize, isize); 8],
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            candidates: neighbors(center),
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let candidate = *self.candidates.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(coords) = checked_coords(candidate, self.bounds) {
                return Some(coords);
            }
        }
    }
}
