//! Tic-tac-toe rules engine and tiered AI.
//!
//! This crate provides:
//! - Board utilities: coordinates, the winning-line table, win/draw detection
//! - An immutable game-state machine with move validation
//! - A static evaluator and a minimax/alpha-beta search with memoization
//! - Six AI difficulty tiers and a hint advisor
//!
//! # Architecture
//!
//! Callers build a game through a [`GameEngine`], submit moves through
//! `validate_move` then `apply_move`, and ask a [`Bot`] for moves when the
//! player to move is AI-controlled. Every transition returns a new
//! [`GameState`]; no snapshot is ever mutated.
//!
//! # Modules
//!
//! - [`board`]: board representation and line detection
//! - [`actions`]: moves
//! - [`player`]: player records
//! - [`game`]: snapshots, errors, outcomes
//! - [`engine`]: the rules engine and its registry
//! - [`eval`]: static evaluation
//! - [`ai`]: move selection and hints

pub mod actions;
pub mod ai;
pub mod board;
pub mod engine;
pub mod eval;
pub mod game;
pub mod player;

// Re-export commonly used types
pub use actions::{GameAction, Move};
pub use ai::{Bot, BotDifficulty, Hint, HintKind};
pub use board::{Board, Coord, LineKind, Symbol, WinningLine};
pub use engine::{engine_for, GameEngine, TicTacToeEngine};
pub use eval::evaluate_board;
pub use game::{
    EndReason, GameError, GameMetadata, GameOutcome, GameSettings, GameState, Scoreboard,
    Standing, TicTacToeMeta, ValidationOutcome, TIC_TAC_TOE,
};
pub use player::{Player, PlayerId};
