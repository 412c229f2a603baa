//! Tetress-Rust: a two-player Tetress engine.
//!
//! Tetress is played on an 11x11 board whose edges wrap around (a torus).
//! Players take turns placing connected 4-cell pieces; a placement must touch
//! the mover's own cells after each side's first move, and any row or column
//! that becomes full is cleared. A player who cannot place loses; after 150
//! turns the player with more cells wins.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions and engine parameters
//! - [`coord`] - Torus coordinates and cell bitsets
//! - [`piece`] - The tetromino catalog and placement actions
//! - [`board`] - Game state, rules and line clearing
//! - [`movegen`] - Legal placement enumeration
//! - [`eval`] - Static position evaluation
//! - [`alphabeta`] - Minimax search with alpha-beta pruning
//! - [`mcts`] - Monte Carlo Tree Search with UCB1
//! - [`playout`] - Random game simulation for MCTS
//! - [`config`] - Search settings
//! - [`agent`] - Players that track the game and pick actions
//!
//! ## Example
//!
//! ```
//! use tetress_rust::agent::{Agent, Strategy};
//! use tetress_rust::board::Color;
//! use tetress_rust::config::{AlphaBetaConfig, DepthPolicy};
//!
//! let strategy = Strategy::AlphaBeta(AlphaBetaConfig {
//!     depth: DepthPolicy::Fixed(1),
//!     cache_moves: true,
//! });
//! let mut red = Agent::new(Color::Red, strategy);
//!
//! let decision = red.choose_action().unwrap();
//! red.observe_action(Color::Red, &decision.action).unwrap();
//! println!("Red opened with {}", decision.action);
//! println!("{}", red.board());
//! ```

pub mod agent;
pub mod alphabeta;
pub mod board;
pub mod config;
pub mod constants;
pub mod coord;
pub mod eval;
pub mod mcts;
pub mod movegen;
pub mod piece;
pub mod playout;
