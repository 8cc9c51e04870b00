//! Tic-tac-toe arena: bot-vs-bot matches and hints from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use tictactoe_core::{Board, Bot, BotDifficulty, Symbol};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tictactoe_arena::arena::{self, ArenaConfig, ArenaState};
use tictactoe_arena::session;

/// Tic-tac-toe engine driver
#[derive(Parser)]
#[command(name = "tictactoe-arena")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play bot-vs-bot games concurrently and report the totals
    Arena {
        /// Tier (1-6) playing X, who moves first
        #[arg(long, default_value_t = 6)]
        x_tier: u8,
        /// Tier (1-6) playing O
        #[arg(long, default_value_t = 1)]
        o_tier: u8,
        #[arg(long, default_value_t = 100)]
        games: usize,
        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
        /// Override every bot's time budget
        #[arg(long)]
        time_limit_ms: Option<u64>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Suggest a move for a position
    Hint {
        /// Nine cells row-major: X, O, or . for empty (e.g. "XX.O.....")
        #[arg(long)]
        board: String,
        /// Side to advise; defaults to whoever is to move
        #[arg(long, value_enum)]
        player: Option<Side>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    X,
    O,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Arena {
            x_tier,
            o_tier,
            games,
            seed,
            time_limit_ms,
            json,
        } => {
            let config = ArenaConfig {
                x_tier: BotDifficulty::try_from(x_tier)?,
                o_tier: BotDifficulty::try_from(o_tier)?,
                games,
                seed,
                time_limit_ms,
            };
            let state = Arc::new(ArenaState::new());
            let report = arena::run_arena(config, state).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Tier {} (X) vs tier {} (O), {} games: X won {}, O won {}, {} drawn",
                    report.x_tier, report.o_tier, report.games, report.x_wins, report.o_wins, report.draws
                );
            }
        }
        Commands::Hint { board, player } => {
            let board: Board = board.parse()?;
            let state = session::position_from_board(&board)?;
            let symbol = match player {
                Some(Side::X) => Symbol::X,
                Some(Side::O) => Symbol::O,
                None => state.current_symbol(),
            };
            info!(%symbol, "computing hint");

            println!("{}\n", board);
            let player_id = state.players[symbol.seat()].id.clone();
            match Bot::new().get_hint(&state, &player_id) {
                Some(hint) => println!(
                    "{} should play {}: {} ({:?}, confidence {:.0}%)",
                    symbol,
                    hint.position,
                    hint.explanation,
                    hint.kind,
                    hint.confidence * 100.0
                ),
                None => println!("No hint available for {}", symbol),
            }
        }
    }

    Ok(())
}
