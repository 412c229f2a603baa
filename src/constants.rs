//! Constants for board geometry, game limits, and search parameters.
//!
//! Runtime-tunable values (time budgets, exploration constant, depth policy)
//! are only the defaults here; see [`crate::config`] for the structs that
//! carry them into the searches.

use std::time::Duration;

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (N x N). The grid wraps at every edge (torus).
pub const BOARD_N: usize = 11;

/// Total number of cells on the board.
pub const BOARD_CELLS: usize = BOARD_N * BOARD_N;

/// Number of cells in a single piece.
pub const PIECE_N: usize = 4;

// =============================================================================
// Game Limits
// =============================================================================

/// The game ends once this many actions have been applied.
pub const MAX_TURNS: u32 = 150;

// =============================================================================
// Board Markers (text rendering and fixture parsing)
// =============================================================================

/// Red cell marker.
pub const MARK_RED: char = 'r';

/// Blue cell marker.
pub const MARK_BLUE: char = 'b';

/// Empty cell marker.
pub const MARK_EMPTY: char = '.';

// =============================================================================
// Evaluation Weights
// =============================================================================

/// Score magnitude for a decided game (positive when Red wins).
pub const WIN_SCORE: f64 = 999.0;

/// A colour owning at least this many cells of one line alone is "crowded".
pub const CROWDED_LINE_CELLS: u32 = 6;

/// Penalty applied per crowded line.
pub const CROWDED_LINE_PENALTY: f64 = 0.2;

// =============================================================================
// Alpha-Beta Parameters
// =============================================================================

/// Depth tiers by root branching factor: `(exclusive upper bound, depth)`.
///
/// Fewer legal actions at the root make a deeper search affordable. A root
/// with more actions than the last bound uses [`SHALLOWEST_DEPTH`].
pub const DEPTH_TIERS: [(usize, u32); 3] = [(5, 4), (70, 3), (201, 2)];

/// Depth used when the root has more than 200 legal actions.
pub const SHALLOWEST_DEPTH: u32 = 1;

/// Deepest level tried by the iterative-deepening driver.
pub const MAX_ITERATIVE_DEPTH: u32 = 6;

/// Wall-clock budget for the iterative-deepening driver.
pub const ALPHA_BETA_TIME_BUDGET: Duration = Duration::from_secs(5);

// =============================================================================
// MCTS Parameters
// =============================================================================

/// UCB1 exploration constant.
pub const UCB1_C: f64 = 1.0;

/// Wall-clock budget for one MCTS decision.
pub const MCTS_TIME_BUDGET: Duration = Duration::from_secs(10);

/// Rollout outcome when the searching colour wins.
pub const GAME_WON: u32 = 1;

/// Rollout outcome for a loss or a draw.
pub const GAME_NOT_WON: u32 = 0;
