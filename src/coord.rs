//! Grid coordinates and cell sets.
//!
//! The board is an 11x11 torus: moving off one edge re-enters on the opposite
//! edge, so every cell has exactly four neighbours.
//!
//! A [`CellSet`] is a 121-bit mask. It is `Copy`, which means cloning a board
//! always yields independent occupancy storage.

use std::fmt;
use std::str::FromStr;

use crate::constants::{BOARD_CELLS, BOARD_N};

/// A cell on the board, row and column both in `0..BOARD_N`.
///
/// The fields are private so that every `Coord` comes from [`Coord::new`]
/// (which wraps) or parsing (which rejects); an index is always in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    r: u8,
    c: u8,
}

impl Coord {
    /// The reference cell used to anchor opening pieces.
    pub const ORIGIN: Coord = Coord { r: 0, c: 0 };

    /// Create a coordinate, wrapping both components onto the board.
    #[inline]
    pub fn new(r: usize, c: usize) -> Self {
        Self {
            r: (r % BOARD_N) as u8,
            c: (c % BOARD_N) as u8,
        }
    }

    #[inline]
    pub fn r(self) -> usize {
        self.r as usize
    }

    #[inline]
    pub fn c(self) -> usize {
        self.c as usize
    }

    /// Row-major index in `0..BOARD_CELLS`.
    #[inline]
    pub fn index(self) -> usize {
        self.r as usize * BOARD_N + self.c as usize
    }

    /// Inverse of [`Coord::index`].
    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self::new(idx / BOARD_N, idx % BOARD_N)
    }

    /// Translate by a (possibly negative) offset, wrapping at the edges.
    #[inline]
    pub fn offset(self, dr: isize, dc: isize) -> Self {
        let n = BOARD_N as isize;
        Self::new(
            (self.r as isize + dr).rem_euclid(n) as usize,
            (self.c as isize + dc).rem_euclid(n) as usize,
        )
    }

    #[inline]
    pub fn up(self) -> Self {
        self.offset(-1, 0)
    }

    #[inline]
    pub fn down(self) -> Self {
        self.offset(1, 0)
    }

    #[inline]
    pub fn left(self) -> Self {
        self.offset(0, -1)
    }

    #[inline]
    pub fn right(self) -> Self {
        self.offset(0, 1)
    }

    /// The 4 orthogonal neighbours (down, up, left, right).
    #[inline]
    pub fn neighbors(self) -> [Coord; 4] {
        [self.down(), self.up(), self.left(), self.right()]
    }

    /// Whether `other` is one of the four neighbours of this cell.
    pub fn is_adjacent(self, other: Coord) -> bool {
        self.neighbors().contains(&other)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.r, self.c)
    }
}

/// Error returned when a coordinate string is not of the form `"r-c"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate '{0}', expected 'row-col' with both in 0..11")]
pub struct ParseCoordError(pub String);

impl FromStr for Coord {
    type Err = ParseCoordError;

    /// Parse `"r-c"`. Unlike [`Coord::new`], out-of-range values are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCoordError(s.to_string());
        let (r, c) = s.trim().split_once('-').ok_or_else(err)?;
        let r: usize = r.trim().parse().map_err(|_| err())?;
        let c: usize = c.trim().parse().map_err(|_| err())?;
        if r >= BOARD_N || c >= BOARD_N {
            return Err(err());
        }
        Ok(Self::new(r, c))
    }
}

// =============================================================================
// Cell Sets
// =============================================================================

const ROW_BITS: u128 = (1u128 << BOARD_N) - 1;

const fn column_bits() -> u128 {
    let mut mask = 0u128;
    let mut r = 0;
    while r < BOARD_N {
        mask |= 1u128 << (r * BOARD_N);
        r += 1;
    }
    mask
}

const COLUMN_BITS: u128 = column_bits();

const ALL_BITS: u128 = (1u128 << BOARD_CELLS) - 1;

/// A set of board cells stored as a bitmask (bit `r * 11 + c`).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellSet(u128);

impl CellSet {
    /// The empty set.
    pub const EMPTY: CellSet = CellSet(0);

    /// Every cell on the board.
    pub const ALL: CellSet = CellSet(ALL_BITS);

    /// All cells of row `r`.
    #[inline]
    pub fn row(r: usize) -> Self {
        CellSet(ROW_BITS << ((r % BOARD_N) * BOARD_N))
    }

    /// All cells of column `c`.
    #[inline]
    pub fn column(c: usize) -> Self {
        CellSet(COLUMN_BITS << (c % BOARD_N))
    }

    #[inline]
    pub fn contains(self, coord: Coord) -> bool {
        self.0 & (1u128 << coord.index()) != 0
    }

    #[inline]
    pub fn insert(&mut self, coord: Coord) {
        self.0 |= 1u128 << coord.index();
    }

    #[inline]
    pub fn remove(&mut self, coord: Coord) {
        self.0 &= !(1u128 << coord.index());
    }

    /// Copy of this set with `coord` added.
    #[inline]
    pub fn with(mut self, coord: Coord) -> Self {
        self.insert(coord);
        self
    }

    #[inline]
    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn union(self, other: CellSet) -> Self {
        CellSet(self.0 | other.0)
    }

    #[inline]
    pub fn intersection(self, other: CellSet) -> Self {
        CellSet(self.0 & other.0)
    }

    #[inline]
    pub fn difference(self, other: CellSet) -> Self {
        CellSet(self.0 & !other.0)
    }

    /// Cells of the board not in this set.
    #[inline]
    pub fn complement(self) -> Self {
        CellSet(!self.0 & ALL_BITS)
    }

    #[inline]
    pub fn is_disjoint(self, other: CellSet) -> bool {
        self.0 & other.0 == 0
    }

    /// Every cell orthogonally adjacent to some cell of this set.
    pub fn neighborhood(self) -> Self {
        self.iter().flat_map(Coord::neighbors).collect()
    }

    /// Iterate the cells in row-major order.
    pub fn iter(self) -> CellIter {
        CellIter(self.0)
    }
}

impl fmt::Debug for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Coord> for CellSet {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        let mut set = CellSet::EMPTY;
        for coord in iter {
            set.insert(coord);
        }
        set
    }
}

impl IntoIterator for CellSet {
    type Item = Coord;
    type IntoIter = CellIter;

    fn into_iter(self) -> CellIter {
        self.iter()
    }
}

/// Row-major iterator over a [`CellSet`].
pub struct CellIter(u128);

impl Iterator for CellIter {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if self.0 == 0 {
            return None;
        }
        let idx = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(Coord::from_index(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for CellIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_wrap() {
        let corner = Coord::new(0, 0);
        let n = corner.neighbors();
        assert!(n.contains(&Coord::new(10, 0)), "up wraps to the last row");
        assert!(n.contains(&Coord::new(0, 10)), "left wraps to the last column");
        assert!(n.contains(&Coord::new(1, 0)));
        assert!(n.contains(&Coord::new(0, 1)));
    }

    #[test]
    fn test_index_roundtrip() {
        for idx in 0..BOARD_CELLS {
            assert_eq!(Coord::from_index(idx).index(), idx);
        }
    }

    #[test]
    fn test_parse_coord() {
        assert_eq!("3-7".parse::<Coord>(), Ok(Coord::new(3, 7)));
        assert!("11-0".parse::<Coord>().is_err());
        assert!("3,7".parse::<Coord>().is_err());
        assert_eq!(Coord::new(4, 10).to_string(), "4-10");
    }

    #[test]
    fn test_out_of_range_wraps_into_grid() {
        // Components past the edge land on the wrapped cell, never an alias.
        let far = Coord::new(0, 11);
        assert_eq!(far, Coord::ORIGIN);
        assert_eq!((far.r(), far.c()), (0, 0));
        let big = Coord::new(14, 25);
        assert_eq!((big.r(), big.c()), (3, 3));
        assert!(big.index() < BOARD_CELLS);
        assert_eq!(Coord::from_index(BOARD_CELLS + 5), Coord::new(0, 5));
        assert!("0-12".parse::<Coord>().is_err());
    }

    #[test]
    fn test_row_and_column_masks() {
        let row = CellSet::row(4);
        assert_eq!(row.len(), BOARD_N as u32);
        assert!(row.iter().all(|c| c.r() == 4));

        let col = CellSet::column(9);
        assert_eq!(col.len(), BOARD_N as u32);
        assert!(col.iter().all(|c| c.c() == 9));

        assert_eq!(row.intersection(col).len(), 1);
    }

    #[test]
    fn test_set_operations() {
        let mut set = CellSet::EMPTY;
        set.insert(Coord::new(10, 10));
        set.insert(Coord::new(0, 0));
        assert_eq!(set.len(), 2);
        assert!(set.contains(Coord::new(10, 10)));

        // Iteration is row-major
        let cells: Vec<Coord> = set.iter().collect();
        assert_eq!(cells, vec![Coord::new(0, 0), Coord::new(10, 10)]);

        set.remove(Coord::new(0, 0));
        assert_eq!(set.len(), 1);
        assert_eq!(CellSet::ALL.complement(), CellSet::EMPTY);
        assert_eq!(CellSet::ALL.len(), BOARD_CELLS as u32);
    }

    #[test]
    fn test_neighborhood() {
        let set: CellSet = [Coord::new(5, 5)].into_iter().collect();
        let around = set.neighborhood();
        assert_eq!(around.len(), 4);
        assert!(!around.contains(Coord::new(5, 5)));
    }
}
