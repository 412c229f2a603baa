//! Piece shapes and placements.
//!
//! A piece is four distinct cells forming a single connected component under
//! the board's wrapping 4-neighbour adjacency. The fixed catalog holds the 19
//! tetromino orientations; on an empty torus every placement of a shape is
//! equivalent, so the opening move only needs one representative per shape.

use std::fmt;
use std::str::FromStr;

use crate::constants::PIECE_N;
use crate::coord::{CellSet, Coord, ParseCoordError};

// =============================================================================
// Errors
// =============================================================================

/// Why a placement was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("a piece needs exactly 4 cells, got {0}")]
    WrongCellCount(usize),

    #[error("cell {0} appears more than once")]
    DuplicateCell(Coord),

    #[error("piece cells are not connected")]
    Disconnected,

    #[error("cell {0} is already occupied")]
    Occupied(Coord),

    #[error("piece does not touch any cell of the acting colour")]
    NotAdjacent,

    #[error(transparent)]
    Parse(#[from] ParseCoordError),
}

// =============================================================================
// Piece Catalog
// =============================================================================

/// The 19 fixed tetromino orientations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    IHorizontal,
    IVertical,
    O,
    TUp,
    TDown,
    TLeft,
    TRight,
    JUp,
    JDown,
    JLeft,
    JRight,
    LUp,
    LDown,
    LLeft,
    LRight,
    ZHorizontal,
    ZVertical,
    SHorizontal,
    SVertical,
}

impl PieceKind {
    /// Every shape in the catalog.
    pub const ALL: [PieceKind; 19] = [
        PieceKind::IHorizontal,
        PieceKind::IVertical,
        PieceKind::O,
        PieceKind::TUp,
        PieceKind::TDown,
        PieceKind::TLeft,
        PieceKind::TRight,
        PieceKind::JUp,
        PieceKind::JDown,
        PieceKind::JLeft,
        PieceKind::JRight,
        PieceKind::LUp,
        PieceKind::LDown,
        PieceKind::LLeft,
        PieceKind::LRight,
        PieceKind::ZHorizontal,
        PieceKind::ZVertical,
        PieceKind::SHorizontal,
        PieceKind::SVertical,
    ];

    /// Cell offsets `(dr, dc)` relative to the anchor cell.
    pub fn offsets(self) -> [(isize, isize); PIECE_N] {
        match self {
            PieceKind::IHorizontal => [(0, 0), (0, 1), (0, 2), (0, 3)],
            PieceKind::IVertical => [(0, 0), (1, 0), (2, 0), (3, 0)],
            PieceKind::O => [(0, 0), (0, 1), (1, 0), (1, 1)],
            PieceKind::TUp => [(0, 1), (1, 0), (1, 1), (1, 2)],
            PieceKind::TDown => [(0, 0), (0, 1), (0, 2), (1, 1)],
            PieceKind::TLeft => [(0, 1), (1, 0), (1, 1), (2, 1)],
            PieceKind::TRight => [(0, 0), (1, 0), (1, 1), (2, 0)],
            PieceKind::JUp => [(0, 1), (1, 1), (2, 0), (2, 1)],
            PieceKind::JDown => [(0, 0), (0, 1), (1, 0), (2, 0)],
            PieceKind::JLeft => [(0, 0), (1, 0), (1, 1), (1, 2)],
            PieceKind::JRight => [(0, 0), (0, 1), (0, 2), (1, 2)],
            PieceKind::LUp => [(0, 0), (1, 0), (2, 0), (2, 1)],
            PieceKind::LDown => [(0, 0), (0, 1), (1, 1), (2, 1)],
            PieceKind::LLeft => [(0, 2), (1, 0), (1, 1), (1, 2)],
            PieceKind::LRight => [(0, 0), (0, 1), (0, 2), (1, 0)],
            PieceKind::ZHorizontal => [(0, 0), (0, 1), (1, 1), (1, 2)],
            PieceKind::ZVertical => [(0, 1), (1, 0), (1, 1), (2, 0)],
            PieceKind::SHorizontal => [(0, 1), (0, 2), (1, 0), (1, 1)],
            PieceKind::SVertical => [(0, 0), (1, 0), (1, 1), (2, 1)],
        }
    }

    /// Place this shape with its offsets measured from `anchor`.
    pub fn place(self, anchor: Coord) -> PlaceAction {
        let cells = self.offsets().map(|(dr, dc)| anchor.offset(dr, dc));
        PlaceAction::from_unchecked(cells)
    }
}

// =============================================================================
// Placements
// =============================================================================

/// A placement of one piece. Cells are kept sorted, so two placements of the
/// same four cells compare equal regardless of construction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlaceAction {
    cells: [Coord; PIECE_N],
}

impl PlaceAction {
    /// Build a placement, checking that the cells are distinct and connected.
    ///
    /// Occupancy and adjacency depend on the board; see
    /// [`crate::board::Board::check_action`].
    pub fn new(cells: [Coord; PIECE_N]) -> Result<Self, ActionError> {
        let mut set = CellSet::EMPTY;
        for &cell in &cells {
            if set.contains(cell) {
                return Err(ActionError::DuplicateCell(cell));
            }
            set.insert(cell);
        }
        if !is_connected(set) {
            return Err(ActionError::Disconnected);
        }
        Ok(Self::from_unchecked(cells))
    }

    /// Build from cells already known to be distinct and connected.
    pub(crate) fn from_unchecked(mut cells: [Coord; PIECE_N]) -> Self {
        cells.sort_unstable();
        Self { cells }
    }

    /// Build from a 4-cell set produced by the connectivity search.
    pub(crate) fn from_set(set: CellSet) -> Self {
        let mut cells = [Coord::ORIGIN; PIECE_N];
        for (slot, cell) in cells.iter_mut().zip(set.iter()) {
            *slot = cell;
        }
        // CellSet iterates row-major, which is already sorted.
        Self { cells }
    }

    /// The four cells, sorted row-major.
    #[inline]
    pub fn cells(&self) -> &[Coord; PIECE_N] {
        &self.cells
    }

    #[inline]
    pub fn cell_set(&self) -> CellSet {
        self.cells.iter().copied().collect()
    }
}

impl fmt::Display for PlaceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.cells;
        write!(f, "PLACE({a}, {b}, {c}, {d})")
    }
}

impl FromStr for PlaceAction {
    type Err = ActionError;

    /// Parse four coordinates separated by whitespace or commas,
    /// e.g. `"0-0 0-1 1-0 1-1"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coords = s
            .split(|ch: char| ch.is_whitespace() || ch == ',')
            .filter(|tok| !tok.is_empty())
            .map(str::parse::<Coord>)
            .collect::<Result<Vec<_>, _>>()?;
        let cells: [Coord; PIECE_N] = coords
            .as_slice()
            .try_into()
            .map_err(|_| ActionError::WrongCellCount(coords.len()))?;
        Self::new(cells)
    }
}

/// Whether the cells of `set` form one 4-connected component (wrapping).
pub fn is_connected(set: CellSet) -> bool {
    let Some(start) = set.iter().next() else {
        return false;
    };
    let mut seen = CellSet::EMPTY.with(start);
    let mut stack = vec![start];
    while let Some(cell) = stack.pop() {
        for n in cell.neighbors() {
            if set.contains(n) && !seen.contains(n) {
                seen.insert(n);
                stack.push(n);
            }
        }
    }
    seen == set
}
