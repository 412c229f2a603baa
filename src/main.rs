//! Tetress-Rust: self-play harness for the Tetress engine.
//!
//! ## Usage
//!
//! - `tetress-rust` - Run a quick demo game
//! - `tetress-rust play --red mcts --blue alpha-beta` - Play a full game
//! - `tetress-rust demo` - Fast alpha-beta vs random game
//!
//! Set `RUST_LOG=debug` to see per-decision search statistics.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;

use tetress_rust::agent::{Agent, SearchStats, Strategy};
use tetress_rust::board::{Color, GameResult};
use tetress_rust::config::{AlphaBetaConfig, Budget, DepthPolicy, FinalSelection, MctsConfig};
use tetress_rust::constants::{ALPHA_BETA_TIME_BUDGET, MAX_ITERATIVE_DEPTH};

/// Tetress-Rust: alpha-beta and MCTS players for Tetress
#[derive(Parser)]
#[command(name = "tetress-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game between two configurable players
    Play(PlayArgs),
    /// Play a short game with fast settings
    Demo,
}

#[derive(Clone, Copy, ValueEnum)]
enum Player {
    /// Alpha-beta with depth picked from the branching factor
    AlphaBeta,
    /// Alpha-beta with iterative deepening under a time budget
    Iterative,
    Mcts,
    Random,
}

#[derive(Clone, Copy, ValueEnum)]
enum Selection {
    MostWins,
    BestWinRate,
    MostVisits,
}

impl From<Selection> for FinalSelection {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::MostWins => FinalSelection::MostWins,
            Selection::BestWinRate => FinalSelection::BestWinRate,
            Selection::MostVisits => FinalSelection::MostVisits,
        }
    }
}

#[derive(Args)]
struct PlayArgs {
    #[arg(long, value_enum, default_value = "alpha-beta")]
    red: Player,
    #[arg(long, value_enum, default_value = "mcts")]
    blue: Player,
    /// Search exactly this many plies instead of picking a depth
    #[arg(long)]
    depth: Option<u32>,
    /// Time per alpha-beta decision with iterative deepening, in milliseconds
    #[arg(long)]
    think_ms: Option<u64>,
    /// Time per MCTS decision, in milliseconds
    #[arg(long, default_value_t = 10_000)]
    mcts_ms: u64,
    /// Run a fixed number of MCTS iterations instead of a time budget
    #[arg(long)]
    mcts_iterations: Option<u32>,
    /// UCB1 exploration constant
    #[arg(long, default_value_t = tetress_rust::constants::UCB1_C)]
    exploration: f64,
    /// Which root child MCTS plays
    #[arg(long, value_enum, default_value = "most-wins")]
    final_selection: Selection,
    /// Seed for the random and MCTS players
    #[arg(long)]
    seed: Option<u64>,
    /// Print only the result
    #[arg(long, short)]
    quiet: bool,
}

impl PlayArgs {
    fn strategy(&self, player: Player, color: Color) -> Strategy {
        // Give each colour its own stream when a seed is set.
        let seed = self.seed.map(|s| s.wrapping_add(color as u64));
        match player {
            Player::AlphaBeta => Strategy::AlphaBeta(AlphaBetaConfig {
                depth: self.depth.map_or(DepthPolicy::Adaptive, DepthPolicy::Fixed),
                ..AlphaBetaConfig::default()
            }),
            Player::Iterative => Strategy::AlphaBeta(AlphaBetaConfig {
                depth: DepthPolicy::IterativeDeepening {
                    max_depth: self.depth.unwrap_or(MAX_ITERATIVE_DEPTH),
                    budget: self.think_ms.map_or(ALPHA_BETA_TIME_BUDGET, Duration::from_millis),
                },
                ..AlphaBetaConfig::default()
            }),
            Player::Mcts => Strategy::Mcts(MctsConfig {
                exploration: self.exploration,
                budget: match self.mcts_iterations {
                    Some(n) => Budget::Iterations(n),
                    None => Budget::Time(Duration::from_millis(self.mcts_ms)),
                },
                final_selection: self.final_selection.into(),
                seed,
            }),
            Player::Random => Strategy::Random { seed },
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Play(args)) => {
            let red = args.strategy(args.red, Color::Red);
            let blue = args.strategy(args.blue, Color::Blue);
            play_game(red, blue, !args.quiet)
        }
        Some(Commands::Demo) | None => run_demo(),
    }
}

fn run_demo() -> Result<()> {
    println!("Tetress-Rust: alpha-beta (depth 1) vs random\n");
    let red = Strategy::AlphaBeta(AlphaBetaConfig {
        depth: DepthPolicy::Fixed(1),
        ..AlphaBetaConfig::default()
    });
    let blue = Strategy::Random { seed: Some(7) };
    play_game(red, blue, true)
}

fn describe(stats: &SearchStats) -> String {
    match stats {
        SearchStats::AlphaBeta(s) => format!(
            "depth {}, {} actions, {} nodes, {} cutoffs, {:?}",
            s.depth, s.root_actions, s.nodes, s.cutoffs, s.elapsed
        ),
        SearchStats::Mcts(s) => format!(
            "{} iterations, {} nodes, winrate {:.3} ({}/{}), {:?}",
            s.iterations,
            s.nodes,
            s.best_win_rate(),
            s.best_wins,
            s.best_visits,
            s.elapsed
        ),
        SearchStats::Random => "random".to_string(),
    }
}

/// Play one game to the end, each agent keeping its own board.
fn play_game(red: Strategy, blue: Strategy, show: bool) -> Result<()> {
    info!("red: {}, blue: {}", red.name(), blue.name());
    let mut agents = [Agent::new(Color::Red, red), Agent::new(Color::Blue, blue)];

    loop {
        let board = *agents[0].board();
        if board.is_terminal() {
            break;
        }
        let color = board.turn();
        let mover = match color {
            Color::Red => &mut agents[0],
            Color::Blue => &mut agents[1],
        };
        let decision = mover
            .choose_action()
            .with_context(|| format!("{color} could not move at turn {}", board.turn_count()))?;

        for agent in agents.iter_mut() {
            agent
                .observe_action(color, &decision.action)
                .with_context(|| format!("{} rejected {}", agent.color(), decision.action))?;
        }

        if show {
            println!(
                "turn {:>3} {color}: {} ({})",
                board.turn_count() + 1,
                decision.action,
                describe(&decision.stats)
            );
            println!("{}", agents[0].board());
        }
    }

    let board = agents[0].board();
    let red = board.cell_count(Color::Red);
    let blue = board.cell_count(Color::Blue);
    match board.winner() {
        Some(GameResult::Win(color)) => println!(
            "{color} wins after {} turns (red {red}, blue {blue})",
            board.turn_count()
        ),
        Some(GameResult::Draw) => println!("draw after {} turns ({red} each)", board.turn_count()),
        None => println!("game stopped at turn {}", board.turn_count()),
    }
    Ok(())
}
