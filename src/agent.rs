//! Game-playing agents.
//!
//! An [`Agent`] tracks its own copy of the board, is told about every action
//! played (its own included) through [`Agent::observe_action`], and asks its
//! [`Strategy`] for the next action with [`Agent::choose_action`].

use log::{debug, warn};
use thiserror::Error;

use crate::alphabeta::{self, AlphaBetaStats};
use crate::board::{Board, Color};
use crate::config::{AlphaBetaConfig, MctsConfig};
use crate::eval::LineRiskEvaluator;
use crate::mcts::{self, MctsError, MctsStats};
use crate::movegen::random_action;
use crate::piece::{ActionError, PlaceAction};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error("the game is already over")]
    TerminalBoard,
    #[error("it is {expected}'s turn, not {got}'s")]
    NotOurTurn { expected: Color, got: Color },
    #[error("no legal action available")]
    NoLegalAction,
    #[error("illegal action: {0}")]
    Illegal(#[from] ActionError),
}

/// How an agent picks its actions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    AlphaBeta(AlphaBetaConfig),
    Mcts(MctsConfig),
    /// Uniformly random legal placements.
    Random { seed: Option<u64> },
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::AlphaBeta(AlphaBetaConfig::default())
    }
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::AlphaBeta(_) => "alpha-beta",
            Strategy::Mcts(_) => "mcts",
            Strategy::Random { .. } => "random",
        }
    }

    fn rng(&self) -> fastrand::Rng {
        match self {
            Strategy::Random { seed: Some(seed) } => fastrand::Rng::with_seed(*seed),
            _ => fastrand::Rng::new(),
        }
    }
}

/// Search statistics attached to a decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchStats {
    AlphaBeta(AlphaBetaStats),
    Mcts(MctsStats),
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub action: PlaceAction,
    pub stats: SearchStats,
}

/// Pick an action for the colour to move on `board`.
pub fn choose_action(board: &Board, strategy: &Strategy) -> Result<Decision, AgentError> {
    decide(board, strategy, &mut strategy.rng())
}

fn decide(
    board: &Board,
    strategy: &Strategy,
    rng: &mut fastrand::Rng,
) -> Result<Decision, AgentError> {
    if board.is_terminal() {
        return Err(AgentError::TerminalBoard);
    }

    match strategy {
        Strategy::AlphaBeta(config) => {
            let result = alphabeta::search(board, config, &LineRiskEvaluator::default());
            let action = result.action.ok_or(AgentError::NoLegalAction)?;
            Ok(Decision {
                action,
                stats: SearchStats::AlphaBeta(result.stats),
            })
        }
        Strategy::Mcts(config) => {
            let result = mcts::search(board, config).map_err(|err| match err {
                MctsError::TerminalRoot => AgentError::TerminalBoard,
                MctsError::EmptyRoot => AgentError::NoLegalAction,
            })?;
            Ok(Decision {
                action: result.action,
                stats: SearchStats::Mcts(result.stats),
            })
        }
        Strategy::Random { .. } => {
            let action = random_action(board, rng).ok_or(AgentError::NoLegalAction)?;
            Ok(Decision {
                action,
                stats: SearchStats::Random,
            })
        }
    }
}

/// A player of one colour with its own view of the game.
#[derive(Debug, Clone)]
pub struct Agent {
    color: Color,
    strategy: Strategy,
    board: Board,
    rng: fastrand::Rng,
}

impl Agent {
    pub fn new(color: Color, strategy: Strategy) -> Self {
        Self {
            color,
            rng: strategy.rng(),
            strategy,
            board: Board::new(),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// The agent's view of the game.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Decide the next action. The board is not changed; the action takes
    /// effect once it is passed back through [`Agent::observe_action`].
    pub fn choose_action(&mut self) -> Result<Decision, AgentError> {
        if self.board.is_terminal() {
            return Err(AgentError::TerminalBoard);
        }
        if self.board.turn() != self.color {
            return Err(AgentError::NotOurTurn {
                expected: self.board.turn(),
                got: self.color,
            });
        }
        let decision = decide(&self.board, &self.strategy, &mut self.rng)?;
        debug!(
            "{} ({}) turn {}: {}",
            self.color,
            self.strategy.name(),
            self.board.turn_count(),
            decision.action
        );
        Ok(decision)
    }

    /// Record an action played by `color`. Rejected actions leave the board
    /// unchanged.
    pub fn observe_action(&mut self, color: Color, action: &PlaceAction) -> Result<(), AgentError> {
        if self.board.is_terminal() {
            return Err(AgentError::TerminalBoard);
        }
        if color != self.board.turn() {
            warn!("{}: {color} played out of turn: {action}", self.color);
            return Err(AgentError::NotOurTurn {
                expected: self.board.turn(),
                got: color,
            });
        }
        if let Err(err) = self.board.try_apply(action) {
            warn!("{}: rejected {action} from {color}: {err}", self.color);
            return Err(err.into());
        }
        Ok(())
    }
}
