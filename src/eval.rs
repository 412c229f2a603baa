//! Static evaluation of board positions.
//!
//! Scores are always from Red's point of view: positive favours Red, negative
//! favours Blue. Alpha-beta maximises for Red and minimises for Blue.

use crate::board::{Board, Color, GameResult};
use crate::constants::{BOARD_N, CROWDED_LINE_CELLS, CROWDED_LINE_PENALTY, WIN_SCORE};
use crate::coord::CellSet;

/// A heuristic scoring function for positions.
pub trait Evaluator {
    /// Score `board` from Red's perspective.
    fn evaluate(&self, board: &Board) -> f64;
}

/// Cell-count difference with a penalty for lines a colour crowds alone.
///
/// A colour owning six or more cells of a row or column by itself is likely to
/// fill that line and have it cleared, losing those cells.
#[derive(Debug, Clone, Copy)]
pub struct LineRiskEvaluator {
    pub crowded_cells: u32,
    pub penalty: f64,
}

impl Default for LineRiskEvaluator {
    fn default() -> Self {
        Self {
            crowded_cells: CROWDED_LINE_CELLS,
            penalty: CROWDED_LINE_PENALTY,
        }
    }
}

impl LineRiskEvaluator {
    /// Number of rows plus columns in which `cells` holds at least
    /// `crowded_cells` cells.
    pub fn crowded_lines(&self, cells: CellSet) -> u32 {
        (0..BOARD_N)
            .map(|i| {
                let row = cells.intersection(CellSet::row(i)).len() >= self.crowded_cells;
                let col = cells.intersection(CellSet::column(i)).len() >= self.crowded_cells;
                row as u32 + col as u32
            })
            .sum()
    }
}

impl Evaluator for LineRiskEvaluator {
    fn evaluate(&self, board: &Board) -> f64 {
        match board.winner() {
            Some(GameResult::Win(Color::Red)) => return WIN_SCORE,
            Some(GameResult::Win(Color::Blue)) => return -WIN_SCORE,
            Some(GameResult::Draw) => return 0.0,
            None => {}
        }

        let red = board.cells(Color::Red);
        let blue = board.cells(Color::Blue);
        let material = red.len() as f64 - blue.len() as f64;
        let crowding = self.crowded_lines(red) as f64 - self.crowded_lines(blue) as f64;
        material - self.penalty * crowding
    }
}
