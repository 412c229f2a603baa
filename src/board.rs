//! Board state and the line-clearing rule.
//!
//! A [`Board`] owns two disjoint cell sets (one per colour), the active colour,
//! the number of actions applied so far, and the last action. Applying an
//! action places the piece, clears every row and column that became full, and
//! passes the turn.
//!
//! Boards are plain values: copying one (every search branch does) never
//! shares occupancy storage with the original.

use std::fmt;

use crate::constants::{BOARD_N, MARK_BLUE, MARK_EMPTY, MARK_RED, MAX_TURNS};
use crate::coord::{CellSet, Coord};
use crate::movegen::has_legal_action;
use crate::piece::{ActionError, PlaceAction};

/// A player colour. Red moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Blue,
}

impl Color {
    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Color::Red => Color::Blue,
            Color::Blue => Color::Red,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "RED"),
            Color::Blue => write!(f, "BLUE"),
        }
    }
}

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Win(Color),
    Draw,
}

/// Error parsing a marker-grid board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("expected 11 rows, found {0}")]
    RowCount(usize),

    #[error("row {row} has {found} cells, expected 11")]
    RowWidth { row: usize, found: usize },

    #[error("unknown marker '{marker}' at {row}-{col}")]
    Marker { marker: char, row: usize, col: usize },
}

/// Hashable identity of a position (occupancy, side to move, turn number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionKey {
    red: CellSet,
    blue: CellSet,
    turn: Color,
    turn_count: u32,
}

/// A Tetress position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    red: CellSet,
    blue: CellSet,
    turn: Color,
    turn_count: u32,
    last_action: Option<PlaceAction>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty board with Red to move.
    pub fn new() -> Self {
        Self::from_cells(CellSet::EMPTY, CellSet::EMPTY, Color::Red, 0)
    }

    /// Build a board from an explicit snapshot.
    ///
    /// A cell present in both sets is kept for Red only, so the occupancy sets
    /// stay disjoint.
    pub fn from_cells(red: CellSet, blue: CellSet, turn: Color, turn_count: u32) -> Self {
        Self {
            red,
            blue: blue.difference(red),
            turn,
            turn_count,
            last_action: None,
        }
    }

    /// Parse a marker grid (`r`, `b`, `.`; whitespace between cells is ignored).
    ///
    /// This is the inverse of the `Display` rendering.
    pub fn from_grid(text: &str, turn: Color, turn_count: u32) -> Result<Self, GridError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if rows.len() != BOARD_N {
            return Err(GridError::RowCount(rows.len()));
        }

        let mut red = CellSet::EMPTY;
        let mut blue = CellSet::EMPTY;
        for (r, line) in rows.iter().enumerate() {
            let markers: Vec<char> = line.chars().filter(|ch| !ch.is_whitespace()).collect();
            if markers.len() != BOARD_N {
                return Err(GridError::RowWidth {
                    row: r,
                    found: markers.len(),
                });
            }
            for (c, &marker) in markers.iter().enumerate() {
                match marker {
                    MARK_RED => red.insert(Coord::new(r, c)),
                    MARK_BLUE => blue.insert(Coord::new(r, c)),
                    MARK_EMPTY => {}
                    _ => return Err(GridError::Marker { marker, row: r, col: c }),
                }
            }
        }
        Ok(Self::from_cells(red, blue, turn, turn_count))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The colour to move.
    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Number of actions applied since the start of the game.
    #[inline]
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    #[inline]
    pub fn last_action(&self) -> Option<PlaceAction> {
        self.last_action
    }

    /// Cells owned by `color`.
    #[inline]
    pub fn cells(&self, color: Color) -> CellSet {
        match color {
            Color::Red => self.red,
            Color::Blue => self.blue,
        }
    }

    #[inline]
    pub fn cell_count(&self, color: Color) -> u32 {
        self.cells(color).len()
    }

    /// Cells owned by either colour.
    #[inline]
    pub fn occupied(&self) -> CellSet {
        self.red.union(self.blue)
    }

    /// Cells owned by nobody.
    #[inline]
    pub fn empty_cells(&self) -> CellSet {
        self.occupied().complement()
    }

    pub fn owner(&self, coord: Coord) -> Option<Color> {
        if self.red.contains(coord) {
            Some(Color::Red)
        } else if self.blue.contains(coord) {
            Some(Color::Blue)
        } else {
            None
        }
    }

    /// Identity of the position, ignoring how it was reached.
    pub fn key(&self) -> PositionKey {
        PositionKey {
            red: self.red,
            blue: self.blue,
            turn: self.turn,
            turn_count: self.turn_count,
        }
    }

    fn cells_mut(&mut self, color: Color) -> &mut CellSet {
        match color {
            Color::Red => &mut self.red,
            Color::Blue => &mut self.blue,
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Check that `action` is legal for the active colour.
    ///
    /// The piece must cover only empty cells and, except on each colour's
    /// first move, touch at least one cell the active colour already owns.
    pub fn check_action(&self, action: &PlaceAction) -> Result<(), ActionError> {
        let occupied = self.occupied();
        if let Some(&cell) = action.cells().iter().find(|&&c| occupied.contains(c)) {
            return Err(ActionError::Occupied(cell));
        }
        if self.turn_count >= 2 {
            let own = self.cells(self.turn);
            if action.cell_set().neighborhood().is_disjoint(own) {
                return Err(ActionError::NotAdjacent);
            }
        }
        Ok(())
    }

    /// Apply an action for the active colour, trusting that it is legal.
    ///
    /// Returns the cells removed by line clearing (empty if nothing cleared).
    /// Search code uses this with actions from the move generator; use
    /// [`Board::try_apply`] for actions from outside.
    pub fn apply(&mut self, action: &PlaceAction) -> CellSet {
        let color = self.turn;
        let own = self.cells_mut(color);
        for &cell in action.cells() {
            own.insert(cell);
        }
        self.last_action = Some(*action);

        let cleared = self.clear_lines(action);
        self.turn = color.opponent();
        self.turn_count += 1;
        cleared
    }

    /// Validate and apply an action. On error the board is left untouched.
    pub fn try_apply(&mut self, action: &PlaceAction) -> Result<CellSet, ActionError> {
        self.check_action(action)?;
        Ok(self.apply(action))
    }

    /// A copy of this board with `action` applied.
    pub fn child(&self, action: &PlaceAction) -> Board {
        let mut next = *self;
        next.apply(action);
        next
    }

    /// Remove every full row and column touched by `action`.
    ///
    /// Only lines through the just-placed piece can have become full. All full
    /// lines are found first and removed together, so a cell at the crossing
    /// of a full row and a full column is cleared once.
    fn clear_lines(&mut self, action: &PlaceAction) -> CellSet {
        let occupied = self.occupied();
        let mut to_remove = CellSet::EMPTY;
        let mut checked_rows = 0u16;
        let mut checked_cols = 0u16;

        for cell in action.cells() {
            let (r, c) = (cell.r(), cell.c());
            if checked_rows & (1 << r) == 0 {
                checked_rows |= 1 << r;
                let row = CellSet::row(r);
                if occupied.intersection(row).len() == BOARD_N as u32 {
                    to_remove = to_remove.union(row);
                }
            }
            if checked_cols & (1 << c) == 0 {
                checked_cols |= 1 << c;
                let col = CellSet::column(c);
                if occupied.intersection(col).len() == BOARD_N as u32 {
                    to_remove = to_remove.union(col);
                }
            }
        }

        self.red = self.red.difference(to_remove);
        self.blue = self.blue.difference(to_remove);
        to_remove
    }

    // =========================================================================
    // Game End
    // =========================================================================

    #[inline]
    pub fn turn_limit_reached(&self) -> bool {
        self.turn_count >= MAX_TURNS
    }

    /// True once the turn limit is reached or the active colour cannot move.
    ///
    /// The first two turns are never terminal: both colours always have an
    /// opening placement.
    pub fn is_terminal(&self) -> bool {
        if self.turn_limit_reached() {
            return true;
        }
        if self.turn_count < 2 {
            return false;
        }
        !has_legal_action(self)
    }

    /// The result of a finished game, or `None` while play continues.
    ///
    /// At the turn limit the colour with more cells wins (equal is a draw);
    /// otherwise the colour unable to move loses.
    pub fn winner(&self) -> Option<GameResult> {
        if !self.is_terminal() {
            return None;
        }
        if self.turn_limit_reached() {
            let red = self.red.len();
            let blue = self.blue.len();
            return Some(match red.cmp(&blue) {
                std::cmp::Ordering::Greater => GameResult::Win(Color::Red),
                std::cmp::Ordering::Less => GameResult::Win(Color::Blue),
                std::cmp::Ordering::Equal => GameResult::Draw,
            });
        }
        Some(GameResult::Win(self.turn.opponent()))
    }
}

impl fmt::Display for Board {
    /// Marker grid: one row per line, cells separated by single spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..BOARD_N {
            for c in 0..BOARD_N {
                let mark = match self.owner(Coord::new(r, c)) {
                    Some(Color::Red) => MARK_RED,
                    Some(Color::Blue) => MARK_BLUE,
                    None => MARK_EMPTY,
                };
                if c > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{mark}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceKind;

    #[test]
    fn test_new_board() {
        let board = Board::new();
        assert_eq!(board.turn(), Color::Red);
        assert_eq!(board.turn_count(), 0);
        assert!(board.occupied().is_empty());
        assert!(!board.is_terminal());
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn test_apply_flips_turn() {
        let mut board = Board::new();
        let action = PieceKind::O.place(Coord::new(3, 3));
        let cleared = board.apply(&action);
        assert!(cleared.is_empty());
        assert_eq!(board.turn(), Color::Blue);
        assert_eq!(board.turn_count(), 1);
        assert_eq!(board.cell_count(Color::Red), 4);
        assert_eq!(board.last_action(), Some(action));
    }

    #[test]
    fn test_from_cells_keeps_sets_disjoint() {
        let shared: CellSet = [Coord::new(1, 1)].into_iter().collect();
        let board = Board::from_cells(shared, shared, Color::Red, 5);
        assert!(board.cells(Color::Red).is_disjoint(board.cells(Color::Blue)));
        assert_eq!(board.owner(Coord::new(1, 1)), Some(Color::Red));
    }

    #[test]
    fn test_check_action_occupied() {
        let mut board = Board::new();
        board.apply(&PieceKind::O.place(Coord::new(3, 3)));
        let overlap = PieceKind::O.place(Coord::new(4, 4));
        assert_eq!(
            board.check_action(&overlap),
            Err(ActionError::Occupied(Coord::new(4, 4)))
        );
    }

    #[test]
    fn test_check_action_adjacency_after_opening() {
        let mut board = Board::new();
        board.apply(&PieceKind::O.place(Coord::new(0, 0)));
        board.apply(&PieceKind::O.place(Coord::new(5, 5)));

        // Red must now touch its own cells
        let far = PieceKind::IHorizontal.place(Coord::new(8, 0));
        assert_eq!(board.check_action(&far), Err(ActionError::NotAdjacent));

        let near = PieceKind::IHorizontal.place(Coord::new(2, 0));
        assert_eq!(board.check_action(&near), Ok(()));
    }

    #[test]
    fn test_try_apply_leaves_board_on_error() {
        let mut board = Board::new();
        board.apply(&PieceKind::O.place(Coord::new(3, 3)));
        let before = board;
        let result = board.try_apply(&PieceKind::O.place(Coord::new(3, 3)));
        assert!(result.is_err());
        assert_eq!(board, before);
    }

    #[test]
    fn test_display_format() {
        let mut board = Board::new();
        board.apply(&PieceKind::IHorizontal.place(Coord::new(0, 0)));
        let text = board.to_string();
        let first = text.lines().next().unwrap_or_default();
        assert_eq!(first, "r r r r . . . . . . .");
        assert_eq!(text.lines().count(), BOARD_N);
    }

    #[test]
    fn test_grid_errors() {
        assert_eq!(
            Board::from_grid("r b .", Color::Red, 0),
            Err(GridError::RowCount(1))
        );
        let mut rows = vec![". . . . . . . . . . ."; BOARD_N];
        rows[2] = ". . x . . . . . . . .";
        assert_eq!(
            Board::from_grid(&rows.join("\n"), Color::Red, 0),
            Err(GridError::Marker { marker: 'x', row: 2, col: 2 })
        );
        rows[2] = ". . .";
        assert_eq!(
            Board::from_grid(&rows.join("\n"), Color::Red, 0),
            Err(GridError::RowWidth { row: 2, found: 3 })
        );
    }

    #[test]
    fn test_turn_limit_winner() {
        let red: CellSet = (0..5).map(|c| Coord::new(0, c)).collect();
        let blue: CellSet = (0..3).map(|c| Coord::new(5, c)).collect();
        let board = Board::from_cells(red, blue, Color::Red, MAX_TURNS);
        assert!(board.is_terminal());
        assert_eq!(board.winner(), Some(GameResult::Win(Color::Red)));

        let shifted = red.iter().map(|c| c.offset(3, 0)).collect();
        let even = Board::from_cells(red, shifted, Color::Blue, MAX_TURNS);
        assert_eq!(even.winner(), Some(GameResult::Draw));
    }
}
