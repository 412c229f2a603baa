//! Legal placement enumeration.
//!
//! Three regimes, by turn number:
//!
//! - **Turn 0**: the board is an empty torus, so every placement of a shape is
//!   equivalent. Only the catalog, anchored at the origin, is generated.
//! - **Turn 1**: the second colour has no cells yet. Seeds are restricted to
//!   empty cells not adjacent to the opponent, and one placement is produced.
//! - **Turn 2+**: a bounded depth-4 search from every owned cell, growing
//!   through empty neighbours. The same piece is reachable from several seeds
//!   and is reported once.
//!
//! [`random_action`] is a cheaper single-action variant used by rollouts.

use std::collections::{BTreeSet, HashSet};
use std::ops::ControlFlow;

use crate::board::Board;
use crate::constants::PIECE_N;
use crate::coord::{CellSet, Coord};
use crate::piece::{PieceKind, PlaceAction};

/// All legal placements for the active colour, in a deterministic order.
pub fn generate_actions(board: &Board) -> Vec<PlaceAction> {
    match board.turn_count() {
        0 => opening_actions(board),
        1 => second_move_action(board).into_iter().collect(),
        _ => {
            let free = board.empty_cells();
            let mut found = BTreeSet::new();
            for seed in board.cells(board.turn()) {
                let _ = search_pieces(free, seed, false, &mut |piece| {
                    found.insert(piece);
                    ControlFlow::<()>::Continue(())
                });
            }
            found.into_iter().collect()
        }
    }
}

/// Catalog shapes anchored at the origin that fit on `board`.
pub fn opening_actions(board: &Board) -> Vec<PlaceAction> {
    PieceKind::ALL
        .iter()
        .map(|kind| kind.place(Coord::ORIGIN))
        .filter(|action| board.check_action(action).is_ok())
        .collect()
}

/// First placement found, in row-major seed order, that avoids the opponent's
/// cells and their neighbours. `None` when no such region exists.
pub fn second_move_action(board: &Board) -> Option<PlaceAction> {
    let opponent = board.cells(board.turn().opponent());
    let region = board.empty_cells().difference(opponent.neighborhood());
    for seed in region {
        if let ControlFlow::Break(piece) =
            search_pieces(region, seed, true, &mut ControlFlow::Break)
        {
            return Some(piece);
        }
    }
    None
}

/// Every placement that touches `seed` through one of its empty neighbours
/// (and does not cover `seed` itself).
pub fn piece_combinations(board: &Board, seed: Coord) -> Vec<PlaceAction> {
    let mut found = Vec::new();
    let _ = search_pieces(board.empty_cells(), seed, false, &mut |piece| {
        found.push(piece);
        ControlFlow::<()>::Continue(())
    });
    found.sort_unstable();
    found
}

/// Whether the active colour has at least one legal placement.
pub fn has_legal_action(board: &Board) -> bool {
    match board.turn_count() {
        0 => !opening_actions(board).is_empty(),
        1 => second_move_action(board).is_some(),
        _ => {
            let free = board.empty_cells();
            board
                .cells(board.turn())
                .iter()
                .any(|seed| search_pieces(free, seed, false, &mut ControlFlow::Break).is_break())
        }
    }
}

/// One random legal placement for the active colour, or `None` if stuck.
///
/// Seeds are visited in shuffled order and a placement is drawn uniformly from
/// the first seed that has any, which avoids enumerating the whole move list.
pub fn random_action(board: &Board, rng: &mut fastrand::Rng) -> Option<PlaceAction> {
    if board.turn_count() < 2 {
        let actions = generate_actions(board);
        if actions.is_empty() {
            return None;
        }
        return Some(actions[rng.usize(..actions.len())]);
    }

    let free = board.empty_cells();
    let mut seeds: Vec<Coord> = board.cells(board.turn()).iter().collect();
    rng.shuffle(&mut seeds);

    let mut options = Vec::new();
    for seed in seeds {
        options.clear();
        let _ = search_pieces(free, seed, false, &mut |piece| {
            options.push(piece);
            ControlFlow::<()>::Continue(())
        });
        if !options.is_empty() {
            return Some(options[rng.usize(..options.len())]);
        }
    }
    None
}

/// Depth-bounded connectivity search from `seed` through cells of `free`.
///
/// An explicit stack of `(anchor, partial piece)` pairs is grown one cell at a
/// time; each new cell must be a free neighbour of the anchor and not already
/// in the partial piece. Every anchor in the grown piece is pushed, so growth
/// can continue from any of its cells. With `include_seed` the seed is the
/// first cell of the piece; otherwise the piece starts at a seed neighbour.
///
/// `visit` is called once per distinct complete piece and may stop the search
/// early by returning `Break`.
fn search_pieces<B>(
    free: CellSet,
    seed: Coord,
    include_seed: bool,
    visit: &mut impl FnMut(PlaceAction) -> ControlFlow<B>,
) -> ControlFlow<B> {
    let start = if include_seed {
        if !free.contains(seed) {
            return ControlFlow::Continue(());
        }
        CellSet::EMPTY.with(seed)
    } else {
        CellSet::EMPTY
    };

    let mut stack: Vec<(Coord, CellSet)> = vec![(seed, start)];
    let mut seen: HashSet<(Coord, CellSet)> = HashSet::new();
    let mut complete: HashSet<CellSet> = HashSet::new();

    while let Some((anchor, partial)) = stack.pop() {
        for next in anchor.neighbors() {
            if !free.contains(next) || partial.contains(next) {
                continue;
            }
            let grown = partial.with(next);
            if grown.len() as usize == PIECE_N {
                if complete.insert(grown) {
                    if let ControlFlow::Break(b) = visit(PlaceAction::from_set(grown)) {
                        return ControlFlow::Break(b);
                    }
                }
                continue;
            }
            for cell in std::iter::once(next).chain(partial.iter()) {
                if seen.insert((cell, grown)) {
                    stack.push((cell, grown));
                }
            }
        }
    }
    ControlFlow::Continue(())
}
