//! Monte Carlo Tree Search with UCB1 selection.
//!
//! The tree lives in an arena (`Vec<TreeNode>`) addressed by [`NodeId`];
//! children are owned by index and the parent link is a plain index used only
//! to walk back up during backpropagation. Nodes are never removed during a
//! decision.
//!
//! Each iteration:
//! 1. descend from the root, picking the child with the best UCB1 score;
//! 2. stop at a leaf. A leaf that has never been visited is simulated as is;
//!    a leaf that has been visited before is expanded and one of its new
//!    children, chosen at random, is simulated instead;
//! 3. play a random game from that node to the end (see [`crate::playout`]);
//! 4. add the 0/1 outcome and one visit to the node and every ancestor.
//!
//! Win counts are always from the searching colour's point of view. When the
//! opponent is the one choosing between children, selection uses the
//! opponent's complement `visits - wins` so that both sides play their best.

use std::time::{Duration, Instant};

use log::{debug, trace};
use thiserror::Error;

use crate::board::{Board, Color};
use crate::config::{Budget, FinalSelection, MctsConfig};
use crate::movegen::generate_actions;
use crate::piece::PlaceAction;
use crate::playout::rollout;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MctsError {
    #[error("cannot search a finished game")]
    TerminalRoot,
    #[error("root position has no legal action")]
    EmptyRoot,
}

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// Lifecycle of a node within one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Never visited, no children.
    Fresh,
    /// Visited at least once, no children (yet, or ever if the game is over).
    Sampled,
    /// Children attached.
    Expanded,
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Position at this node
    pub board: Board,
    /// Action that led here from the parent (`None` for the root)
    pub action: Option<PlaceAction>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Rollouts through this node won by the searching colour
    pub wins: u32,
    pub visits: u32,
    /// Expansion was attempted and produced no children.
    exhausted: bool,
}

impl TreeNode {
    fn new(board: Board, action: Option<PlaceAction>, parent: Option<NodeId>) -> Self {
        Self {
            board,
            action,
            parent,
            children: Vec::new(),
            wins: 0,
            visits: 0,
            exhausted: false,
        }
    }

    pub fn state(&self) -> NodeState {
        if !self.children.is_empty() {
            NodeState::Expanded
        } else if self.visits == 0 {
            NodeState::Fresh
        } else {
            NodeState::Sampled
        }
    }

    /// Wins per visit, 0 when unvisited.
    #[inline]
    pub fn win_rate(&self) -> f64 {
        if self.visits > 0 {
            self.wins as f64 / self.visits as f64
        } else {
            0.0
        }
    }
}

/// UCB1 score of a child.
///
/// `wins` must be counted for the colour choosing at the parent. Unvisited
/// children score `+inf` so every child is tried once before any is revisited.
pub fn ucb1(wins: u32, visits: u32, parent_visits: u32, exploration: f64) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }
    let visits = visits as f64;
    let exploit = wins as f64 / visits;
    let explore = exploration * ((parent_visits.max(1) as f64).ln() / visits).sqrt();
    exploit + explore
}

// =============================================================================
// Search Tree
// =============================================================================

/// Arena-backed search tree for a single decision.
#[derive(Debug)]
pub struct SearchTree {
    nodes: Vec<TreeNode>,
    /// Colour whose wins are counted
    searcher: Color,
}

impl SearchTree {
    pub fn new(root: Board) -> Self {
        Self {
            nodes: vec![TreeNode::new(root, None, None)],
            searcher: root.turn(),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn searcher(&self) -> Color {
        self.searcher
    }

    /// Attach one child per legal action of `id`'s position.
    ///
    /// Returns the number of children added; 0 if the node is already
    /// expanded or its position is terminal.
    pub fn expand(&mut self, id: NodeId) -> usize {
        let node = self.get(id);
        if !node.children.is_empty() || node.exhausted {
            return 0;
        }
        let board = node.board;
        let actions = if board.is_terminal() {
            Vec::new()
        } else {
            generate_actions(&board)
        };
        if actions.is_empty() {
            self.get_mut(id).exhausted = true;
            return 0;
        }

        let first = self.nodes.len() as u32;
        for action in &actions {
            self.nodes.push(TreeNode::new(board.child(action), Some(*action), Some(id)));
        }
        let count = actions.len();
        self.get_mut(id).children = (first..first + count as u32).map(NodeId).collect();
        count
    }

    /// The child of `id` with the highest UCB1 score for the colour to move
    /// at `id`. Ties keep the first child.
    pub fn select_child(&self, id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(id);
        let searcher_to_move = node.board.turn() == self.searcher;

        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &node.children {
            let child = self.get(child_id);
            let wins = if searcher_to_move {
                child.wins
            } else {
                child.visits - child.wins
            };
            let score = ucb1(wins, child.visits, node.visits, exploration);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((child_id, score));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Add one visit and `outcome` wins to `id` and all of its ancestors.
    pub fn backpropagate(&mut self, id: NodeId, outcome: u32) {
        let mut current = Some(id);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.visits += 1;
            node.wins += outcome;
            current = node.parent;
        }
    }

    /// The root child preferred by `selection`. Ties keep the first child.
    pub fn best_child(&self, selection: FinalSelection) -> Option<NodeId> {
        let score = |node: &TreeNode| match selection {
            FinalSelection::MostWins => node.wins as f64,
            FinalSelection::MostVisits => node.visits as f64,
            FinalSelection::BestWinRate if node.visits == 0 => -1.0,
            FinalSelection::BestWinRate => node.win_rate(),
        };

        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &self.get(self.root()).children {
            let s = score(self.get(child_id));
            if best.is_none_or(|(_, b)| s > b) {
                best = Some((child_id, s));
            }
        }
        best.map(|(id, _)| id)
    }
}

// =============================================================================
// Driver
// =============================================================================

/// Counters for one MCTS decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MctsStats {
    pub iterations: u32,
    pub rollouts: u32,
    /// Leaves expanded after the root
    pub expansions: u32,
    /// Tree size at the end of the search
    pub nodes: usize,
    pub root_visits: u32,
    /// Wins and visits of the chosen root child
    pub best_wins: u32,
    pub best_visits: u32,
    pub elapsed: Duration,
}

impl MctsStats {
    /// Wins per visit of the chosen root child.
    pub fn best_win_rate(&self) -> f64 {
        if self.best_visits == 0 {
            0.0
        } else {
            self.best_wins as f64 / self.best_visits as f64
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MctsResult {
    pub action: PlaceAction,
    pub stats: MctsStats,
}

/// Run one iteration: select, expand, simulate, backpropagate.
fn run_iteration(
    tree: &mut SearchTree,
    exploration: f64,
    rng: &mut fastrand::Rng,
    stats: &mut MctsStats,
) {
    let mut id = tree.root();
    let mut depth = 0u32;
    loop {
        match tree.get(id).state() {
            NodeState::Expanded => {
                let Some(next) = tree.select_child(id, exploration) else {
                    break;
                };
                id = next;
                depth += 1;
            }
            NodeState::Fresh => break,
            NodeState::Sampled => {
                let added = tree.expand(id);
                if added > 0 {
                    stats.expansions += 1;
                    id = tree.get(id).children[rng.usize(..added)];
                    depth += 1;
                }
                break;
            }
        }
    }

    let outcome = rollout(&tree.get(id).board, tree.searcher(), rng);
    stats.rollouts += 1;
    tree.backpropagate(id, outcome);
    trace!("iteration {}: leaf at depth {depth}, outcome {outcome}", stats.iterations);
}

/// Run one MCTS decision for the colour to move on `board`.
pub fn search(board: &Board, config: &MctsConfig) -> Result<MctsResult, MctsError> {
    let start = Instant::now();
    if board.is_terminal() {
        return Err(MctsError::TerminalRoot);
    }

    let mut tree = SearchTree::new(*board);
    let root = tree.root();
    if tree.expand(root) == 0 {
        return Err(MctsError::EmptyRoot);
    }

    let mut rng = config.rng();
    let mut stats = MctsStats::default();
    match config.budget {
        Budget::Iterations(n) => {
            for _ in 0..n {
                run_iteration(&mut tree, config.exploration, &mut rng, &mut stats);
                stats.iterations += 1;
            }
        }
        // The deadline is polled between iterations; the first always runs.
        Budget::Time(limit) => loop {
            run_iteration(&mut tree, config.exploration, &mut rng, &mut stats);
            stats.iterations += 1;
            if start.elapsed() >= limit {
                break;
            }
        },
    }

    let best = tree.best_child(config.final_selection).ok_or(MctsError::EmptyRoot)?;
    let chosen = tree.get(best);
    let action = chosen.action.ok_or(MctsError::EmptyRoot)?;

    stats.nodes = tree.len();
    stats.root_visits = tree.get(root).visits;
    stats.best_wins = chosen.wins;
    stats.best_visits = chosen.visits;
    stats.elapsed = start.elapsed();
    debug!(
        "mcts: {} iterations, {} nodes, best {} ({} wins / {} visits) in {:?}",
        stats.iterations, stats.nodes, action, chosen.wins, chosen.visits, stats.elapsed
    );

    Ok(MctsResult { action, stats })
}
