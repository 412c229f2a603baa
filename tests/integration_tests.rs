//! Integration tests for tetress-rust: the rules engine and move generator.
//!
//! Board fixtures are written as marker grids (`r` Red, `b` Blue, `.` empty),
//! the same format `Board` prints.

use tetress_rust::board::{Board, Color, GameResult};
use tetress_rust::constants::{BOARD_N, MAX_TURNS};
use tetress_rust::coord::{CellSet, Coord};
use tetress_rust::movegen::{generate_actions, random_action};
use tetress_rust::piece::{ActionError, PieceKind, PlaceAction};

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

fn grid(rows: &[&str], turn: Color, turn_count: u32) -> Board {
    Board::from_grid(&rows.join("\n"), turn, turn_count).expect("valid fixture")
}

fn action(text: &str) -> PlaceAction {
    text.parse().expect("valid action")
}

/// Play a seeded random game, checking board invariants after every action.
fn checked_random_game(seed: u64) -> Board {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut board = Board::new();
    while !board.is_terminal() {
        let Some(next) = random_action(&board, &mut rng) else {
            break;
        };
        let occupied_before = board.occupied().len();
        let turn_before = board.turn_count();
        let mover = board.turn();

        let cleared = board.apply(&next);

        assert!(
            board.cells(Color::Red).is_disjoint(board.cells(Color::Blue)),
            "seed {seed}: colours overlap after {next}"
        );
        assert_eq!(
            board.occupied().len(),
            occupied_before + 4 - cleared.len(),
            "seed {seed}: wrong occupancy after {next}"
        );
        assert_eq!(board.turn_count(), turn_before + 1);
        assert_eq!(board.turn(), mover.opponent());
        assert!(board.occupied().is_disjoint(cleared));
    }
    board
}

// =============================================================================
// Action parsing
// =============================================================================

#[test]
fn test_parse_action() {
    let parsed = action("1-1, 0-0 0-1,1-0");
    assert_eq!(parsed, PieceKind::O.place(Coord::ORIGIN));
    assert_eq!(parsed.to_string(), "PLACE(0-0, 0-1, 1-0, 1-1)");
}

#[test]
fn test_parse_action_errors() {
    assert_eq!(
        "0-0 0-1 0-2".parse::<PlaceAction>(),
        Err(ActionError::WrongCellCount(3))
    );
    assert_eq!(
        "0-0 0-1 0-2 5-5".parse::<PlaceAction>(),
        Err(ActionError::Disconnected)
    );
    assert!(matches!(
        "0-0 0-1 0-2 0-11".parse::<PlaceAction>(),
        Err(ActionError::Parse(_))
    ));
}

#[test]
fn test_pieces_wrap_around_edges() {
    // An I piece across the right edge is connected through the wrap.
    let wrapped = action("3-9 3-10 3-0 3-1");
    assert_eq!(wrapped, PieceKind::IHorizontal.place(Coord::new(3, 9)));
}

// =============================================================================
// Opening rules
// =============================================================================

#[test]
fn test_opening_catalog_at_origin() {
    let actions = generate_actions(&Board::new());
    assert_eq!(actions.len(), 19);
    for kind in PieceKind::ALL {
        assert!(actions.contains(&kind.place(Coord::ORIGIN)), "{kind:?} missing");
    }
}

#[test]
fn test_first_two_turns_never_terminal() {
    let mut board = Board::new();
    assert!(!board.is_terminal());
    assert_eq!(board.winner(), None);

    board.apply(&PieceKind::TDown.place(Coord::new(4, 4)));
    assert!(!board.is_terminal());
    assert_eq!(board.winner(), None);

    // Even when Blue has nowhere to open away from Red.
    let red: CellSet = (0..BOARD_N * BOARD_N)
        .map(Coord::from_index)
        .filter(|c| (c.r() + c.c()) % 2 == 1)
        .collect();
    let crowded = Board::from_cells(red, CellSet::EMPTY, Color::Blue, 1);
    assert!(!crowded.is_terminal());
}

#[test]
fn test_first_move_needs_no_contact() {
    let mut board = Board::new();
    board.try_apply(&action("0-0 0-1 0-2 0-3")).expect("red opens anywhere");
    board.try_apply(&action("6-6 6-7 7-6 7-7")).expect("blue opens anywhere");
    assert_eq!(
        board.try_apply(&action("9-0 9-1 9-2 9-3")),
        Err(ActionError::NotAdjacent)
    );
    // Touching through the top edge wrap counts.
    board.try_apply(&action("10-0 10-1 10-2 10-3")).expect("wraps to row 0");
}

// =============================================================================
// Line clearing
// =============================================================================

#[test]
fn test_row_with_ten_cells_is_not_cleared() {
    let mut board = grid(
        &[
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
            "r r r r . . b b b b b",
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
        ],
        Color::Red,
        8,
    );
    // Fills (3,4) but leaves (3,5) open: 10 of 11 cells.
    let cleared = board.try_apply(&action("0-4 1-4 2-4 3-4")).expect("legal");
    assert!(cleared.is_empty());
    assert_eq!(board.occupied().intersection(CellSet::row(3)).len(), 10);
    assert_eq!(board.turn_count(), 9);
}

#[test]
fn test_full_row_is_cleared() {
    let mut board = grid(
        &[
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
            "r r r r r . b b b b b",
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
        ],
        Color::Red,
        8,
    );
    let cleared = board.try_apply(&action("0-5 1-5 2-5 3-5")).expect("legal");

    assert_eq!(cleared, CellSet::row(3));
    assert!(board.occupied().intersection(CellSet::row(3)).is_empty());
    // The rest of the piece stays.
    let rest: CellSet = [(0, 5), (1, 5), (2, 5)].iter().map(|&(r, c)| Coord::new(r, c)).collect();
    assert_eq!(board.cells(Color::Red), rest);
    assert!(board.cells(Color::Blue).is_empty());
    assert_eq!(board.turn_count(), 9);
    assert_eq!(board.turn(), Color::Blue);
}

#[test]
fn test_row_and_column_clear_together() {
    let mut board = grid(
        &[
            ". . . . . b . . . . .",
            ". . . . . r . . . . .",
            ". . . . . b . . . . .",
            "r r r r r . b b b b b",
            ". . . . . . . . . . .",
            ". . . . . r . . . . .",
            ". . . . . b . . . . .",
            ". . . . . r . . . . .",
            ". . . . . b . . . . .",
            ". . . . . r . . . . .",
            ". . . . . b . . . . .",
        ],
        Color::Red,
        30,
    );
    let cleared = board.try_apply(&action("3-5 4-5 4-6 4-7")).expect("legal");

    // Row 3 and column 5 share one cell: 11 + 11 - 1.
    assert_eq!(cleared.len(), 21);
    assert_eq!(cleared, CellSet::row(3).union(CellSet::column(5)));
    let left: CellSet = [Coord::new(4, 6), Coord::new(4, 7)].into_iter().collect();
    assert_eq!(board.occupied(), left);
    assert_eq!(board.cells(Color::Red), left);
}

#[test]
fn test_only_touched_lines_are_checked() {
    // Row 8 is already full; placing elsewhere leaves it alone.
    let mut board = grid(
        &[
            ". . . . . . . . . . .",
            "r . . . . . . . . . .",
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
            "b b b b b b b b b b b",
            ". . . . . . . . . . .",
            ". . . . . . . . . . .",
        ],
        Color::Red,
        12,
    );
    let cleared = board.try_apply(&action("1-1 1-2 1-3 1-4")).expect("legal");
    assert!(cleared.is_empty());
    assert_eq!(board.cell_count(Color::Blue), 11);
}

#[test]
fn test_cells_past_the_edge_clear_their_wrapped_row() {
    // Blue holds most of rows 0 and 1. Red's columns 11..14 wrap to 0..3,
    // completing row 0 and leaving row 1 alone.
    let blue: CellSet = (4..BOARD_N)
        .flat_map(|c| [Coord::new(0, c), Coord::new(1, c)])
        .collect();
    let mut board = Board::from_cells(CellSet::EMPTY, blue, Color::Red, 0);
    let piece = PlaceAction::new([
        Coord::new(0, 11),
        Coord::new(0, 12),
        Coord::new(0, 13),
        Coord::new(0, 14),
    ])
    .expect("wrapped cells form an I piece");
    assert_eq!(piece, action("0-0 0-1 0-2 0-3"));

    let cleared = board.try_apply(&piece).expect("legal opening");
    assert_eq!(cleared, CellSet::row(0));
    assert!(board.cells(Color::Red).is_empty());
    assert_eq!(board.occupied().intersection(CellSet::row(1)).len(), 7);
}

// =============================================================================
// Game end
// =============================================================================

#[test]
fn test_stuck_colour_loses() {
    let board = grid(
        &[
            "b b b b b b b b b b b",
            "b b b b b b b b b b b",
            "b b b b b b b b b b b",
            "b b b b b b b b b b b",
            "b b b b b b b b b b b",
            "b b b b b r . . . b b",
            "b b b b b b b b b b b",
            "b b b b b b b b b b b",
            "b b b b b b b b b b b",
            "b b b b b b b b b b b",
            "b b b b b b b b b b b",
        ],
        Color::Red,
        40,
    );
    assert!(generate_actions(&board).is_empty());
    assert!(board.is_terminal());
    assert_eq!(board.winner(), Some(GameResult::Win(Color::Blue)));
}

#[test]
fn test_random_games_keep_invariants() {
    for seed in 0..6 {
        let last = checked_random_game(seed);
        assert!(last.is_terminal(), "seed {seed} stopped early");
        assert!(last.turn_count() <= MAX_TURNS);
        assert!(last.winner().is_some());
    }
}

#[test]
fn test_grid_round_trip() {
    for seed in [3, 17] {
        let board = checked_random_game(seed);
        let text = board.to_string();
        let parsed = Board::from_grid(&text, board.turn(), board.turn_count())
            .expect("printed grid parses");
        assert_eq!(parsed.key(), board.key());
        assert_eq!(parsed.to_string(), text);
    }
}

#[test]
fn test_generated_actions_are_legal_midgame() {
    let mut rng = fastrand::Rng::with_seed(99);
    let mut board = Board::new();
    for _ in 0..12 {
        let Some(next) = random_action(&board, &mut rng) else {
            return;
        };
        board.apply(&next);
    }
    if board.is_terminal() {
        return;
    }
    let actions = generate_actions(&board);
    assert!(!actions.is_empty());
    for candidate in &actions {
        assert_eq!(board.check_action(candidate), Ok(()));
    }
}
