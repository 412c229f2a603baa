//! Search configuration.
//!
//! Defaults come from [`crate::constants`]; the CLI overrides individual
//! fields from its flags.

use std::time::Duration;

use crate::constants::{ALPHA_BETA_TIME_BUDGET, MAX_ITERATIVE_DEPTH, MCTS_TIME_BUDGET, UCB1_C};

/// How the alpha-beta driver picks its search depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DepthPolicy {
    /// One search at a depth chosen from the root branching factor.
    Adaptive,
    /// One search at exactly this depth.
    Fixed(u32),
    /// Search depth 1, 2, ... until `max_depth` or the deadline, keeping the
    /// result of the last completed depth.
    IterativeDeepening { max_depth: u32, budget: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlphaBetaConfig {
    pub depth: DepthPolicy,
    /// Memoise generated moves per position within one decision.
    pub cache_moves: bool,
}

impl Default for AlphaBetaConfig {
    fn default() -> Self {
        Self {
            depth: DepthPolicy::Adaptive,
            cache_moves: true,
        }
    }
}

impl AlphaBetaConfig {
    /// Iterative deepening with the default depth cap and time budget.
    pub fn iterative() -> Self {
        Self {
            depth: DepthPolicy::IterativeDeepening {
                max_depth: MAX_ITERATIVE_DEPTH,
                budget: ALPHA_BETA_TIME_BUDGET,
            },
            ..Self::default()
        }
    }
}

/// When an MCTS decision stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// Stop starting new iterations once this much wall-clock time has passed.
    Time(Duration),
    /// Run exactly this many iterations.
    Iterations(u32),
}

/// Which root child an MCTS decision returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinalSelection {
    /// Highest cumulative win count.
    #[default]
    MostWins,
    /// Highest wins / visits among visited children.
    BestWinRate,
    /// Highest visit count.
    MostVisits,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MctsConfig {
    /// UCB1 exploration constant `C`.
    pub exploration: f64,
    pub budget: Budget,
    pub final_selection: FinalSelection,
    /// Seed for the rollout RNG; `None` seeds from the system.
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration: UCB1_C,
            budget: Budget::Time(MCTS_TIME_BUDGET),
            final_selection: FinalSelection::default(),
            seed: None,
        }
    }
}

impl MctsConfig {
    /// RNG for one decision.
    pub fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}
