//! Depth-bounded minimax with alpha-beta pruning.
//!
//! Red is the maximising colour and Blue the minimising one; scores come from
//! an [`Evaluator`] in Red's perspective. Every child is searched on its own
//! copy of the board.
//!
//! Three drivers choose the depth:
//! - adaptive: one search at a depth picked from the root branching factor
//!   (see [`depth_for_branching`]);
//! - fixed: one search at a given depth;
//! - iterative deepening: depth 1, 2, ... until a deadline, keeping the result
//!   of the last depth that finished. The deadline is only checked between
//!   depths, never inside a search.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::board::{Board, Color, PositionKey};
use crate::config::{AlphaBetaConfig, DepthPolicy};
use crate::constants::{DEPTH_TIERS, SHALLOWEST_DEPTH};
use crate::eval::Evaluator;
use crate::movegen::generate_actions;
use crate::piece::PlaceAction;

/// Counters for one alpha-beta decision.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AlphaBetaStats {
    /// Positions visited (interior and leaf).
    pub nodes: u64,
    /// Calls to the evaluator.
    pub evaluations: u64,
    /// Sibling loops cut short by pruning.
    pub cutoffs: u64,
    /// Move lists served from the per-decision cache.
    pub cache_hits: u64,
    /// Depth of the search whose result was returned.
    pub depth: u32,
    /// Legal actions at the root.
    pub root_actions: usize,
    pub elapsed: Duration,
}

/// Outcome of an alpha-beta decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlphaBetaResult {
    /// Backed-up value of the root (Red's perspective).
    pub value: f64,
    /// Best root action, `None` when the root has no legal action.
    pub action: Option<PlaceAction>,
    pub stats: AlphaBetaStats,
}

/// Per-decision search state: evaluator, move cache and counters.
pub struct SearchContext<'a, E: Evaluator> {
    evaluator: &'a E,
    cache: Option<HashMap<PositionKey, Vec<PlaceAction>>>,
    stats: AlphaBetaStats,
}

impl<'a, E: Evaluator> SearchContext<'a, E> {
    pub fn new(evaluator: &'a E, cache_moves: bool) -> Self {
        Self {
            evaluator,
            cache: cache_moves.then(HashMap::new),
            stats: AlphaBetaStats::default(),
        }
    }

    pub fn stats(&self) -> &AlphaBetaStats {
        &self.stats
    }

    fn actions(&mut self, board: &Board) -> Vec<PlaceAction> {
        let Some(cache) = self.cache.as_mut() else {
            return generate_actions(board);
        };
        let key = board.key();
        if let Some(actions) = cache.get(&key) {
            self.stats.cache_hits += 1;
            return actions.clone();
        }
        let actions = generate_actions(board);
        cache.insert(key, actions.clone());
        actions
    }

    fn evaluate(&mut self, board: &Board) -> f64 {
        self.stats.evaluations += 1;
        self.evaluator.evaluate(board)
    }
}

/// Pick a search depth from the number of legal actions at the root.
///
/// Fewer than 5 actions searches 4 plies; fewer than 70, 3 plies; up to 200,
/// 2 plies; anything wider, a single ply.
pub fn depth_for_branching(actions: usize) -> u32 {
    DEPTH_TIERS
        .iter()
        .find(|&&(bound, _)| actions < bound)
        .map(|&(_, depth)| depth)
        .unwrap_or(SHALLOWEST_DEPTH)
}

/// Alpha-beta search to `depth` plies.
///
/// Returns the backed-up value and the best action at this node. A leaf
/// (depth 0, terminal, or no generated actions) returns its static score and
/// no action. On equal values the first action in generation order is kept.
pub fn alpha_beta<E: Evaluator>(
    board: &Board,
    depth: u32,
    mut alpha: f64,
    mut beta: f64,
    ctx: &mut SearchContext<'_, E>,
) -> (f64, Option<PlaceAction>) {
    ctx.stats.nodes += 1;

    if depth == 0 || board.is_terminal() {
        return (ctx.evaluate(board), None);
    }
    let actions = ctx.actions(board);
    if actions.is_empty() {
        return (ctx.evaluate(board), None);
    }

    let mut best_action = None;
    if board.turn() == Color::Red {
        let mut max_eval = f64::NEG_INFINITY;
        for action in &actions {
            let child = board.child(action);
            let (value, _) = alpha_beta(&child, depth - 1, alpha, beta, ctx);
            if value > max_eval {
                max_eval = value;
                best_action = Some(*action);
            }
            alpha = alpha.max(max_eval);
            if alpha >= beta {
                ctx.stats.cutoffs += 1;
                break;
            }
        }
        (max_eval, best_action)
    } else {
        let mut min_eval = f64::INFINITY;
        for action in &actions {
            let child = board.child(action);
            let (value, _) = alpha_beta(&child, depth - 1, alpha, beta, ctx);
            if value < min_eval {
                min_eval = value;
                best_action = Some(*action);
            }
            beta = beta.min(min_eval);
            if beta <= alpha {
                ctx.stats.cutoffs += 1;
                break;
            }
        }
        (min_eval, best_action)
    }
}

/// Plain minimax without pruning. Visits every node alpha-beta could visit
/// and returns the same value; kept as a reference for the pruned search.
pub fn minimax<E: Evaluator>(
    board: &Board,
    depth: u32,
    ctx: &mut SearchContext<'_, E>,
) -> (f64, Option<PlaceAction>) {
    ctx.stats.nodes += 1;

    if depth == 0 || board.is_terminal() {
        return (ctx.evaluate(board), None);
    }
    let actions = ctx.actions(board);
    if actions.is_empty() {
        return (ctx.evaluate(board), None);
    }

    let maximising = board.turn() == Color::Red;
    let mut best = if maximising { f64::NEG_INFINITY } else { f64::INFINITY };
    let mut best_action = None;
    for action in &actions {
        let (value, _) = minimax(&board.child(action), depth - 1, ctx);
        let better = if maximising { value > best } else { value < best };
        if better {
            best = value;
            best_action = Some(*action);
        }
    }
    (best, best_action)
}

/// Run one alpha-beta decision on `board` as configured.
pub fn search<E: Evaluator>(
    board: &Board,
    config: &AlphaBetaConfig,
    evaluator: &E,
) -> AlphaBetaResult {
    let start = Instant::now();
    let mut ctx = SearchContext::new(evaluator, config.cache_moves);
    let root_actions = ctx.actions(board).len();

    let (value, action, depth) = match config.depth {
        DepthPolicy::Adaptive => {
            let depth = depth_for_branching(root_actions);
            let (value, action) =
                alpha_beta(board, depth, f64::NEG_INFINITY, f64::INFINITY, &mut ctx);
            (value, action, depth)
        }
        DepthPolicy::Fixed(depth) => {
            let depth = depth.max(1);
            let (value, action) =
                alpha_beta(board, depth, f64::NEG_INFINITY, f64::INFINITY, &mut ctx);
            (value, action, depth)
        }
        DepthPolicy::IterativeDeepening { max_depth, budget } => {
            let deadline = start + budget;
            let mut completed = (f64::NAN, None, 0);
            for depth in 1..=max_depth.max(1) {
                if depth > 1 && Instant::now() >= deadline {
                    break;
                }
                let (value, action) =
                    alpha_beta(board, depth, f64::NEG_INFINITY, f64::INFINITY, &mut ctx);
                trace!(
                    "depth {depth} done: value={value:.2} nodes={} after {:?}",
                    ctx.stats.nodes,
                    start.elapsed()
                );
                completed = (value, action, depth);
            }
            completed
        }
    };

    let mut stats = ctx.stats;
    stats.depth = depth;
    stats.root_actions = root_actions;
    stats.elapsed = start.elapsed();
    debug!(
        "alpha-beta: {} actions, depth {}, value {:.2}, {} nodes, {} cutoffs, {} hits in {:?}",
        root_actions, depth, value, stats.nodes, stats.cutoffs, stats.cache_hits, stats.elapsed
    );

    AlphaBetaResult { value, action, stats }
}
