//! Random playouts (game simulation to the end).
//!
//! A playout applies uniformly random legal placements until the board is
//! terminal, then maps the winner to a binary outcome for the searching colour.

use crate::board::{Board, Color, GameResult};
use crate::constants::{GAME_NOT_WON, GAME_WON};
use crate::movegen::random_action;

/// Play random actions on a copy of `board` until no more can be made.
///
/// Stops at the turn limit or when the active colour has no placement.
pub fn play_out(board: &Board, rng: &mut fastrand::Rng) -> Board {
    let mut board = *board;
    while !board.turn_limit_reached() {
        match random_action(&board, rng) {
            Some(action) => {
                board.apply(&action);
            }
            None => break,
        }
    }
    board
}

/// Simulate a game from `board` and score it for `color`.
///
/// Returns [`GAME_WON`] if `color` wins, otherwise [`GAME_NOT_WON`]; a draw,
/// or a game that stalls without a result, counts as not won.
pub fn rollout(board: &Board, color: Color, rng: &mut fastrand::Rng) -> u32 {
    let last = play_out(board, rng);
    match last.winner() {
        Some(GameResult::Win(winner)) if winner == color => GAME_WON,
        _ => GAME_NOT_WON,
    }
}
