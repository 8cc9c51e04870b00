//! Move selection across six difficulty tiers.
//!
//! - [`difficulty`]: the tier table (strategy, depth, time budget)
//! - [`search`]: minimax with alpha-beta pruning
//! - [`cache`]: the memoization table each bot owns
//! - [`bot`]: the [`Bot`] entry point, `get_move`
//! - [`hint`]: explained suggestions for human players

pub mod bot;
pub mod cache;
pub mod difficulty;
pub mod hint;
pub mod search;

pub use bot::Bot;
pub use cache::{SearchCache, CACHE_CAPACITY};
pub use difficulty::{BotDifficulty, DifficultyProfile, Strategy, DIFFICULTY_TABLE};
pub use hint::{Hint, HintKind, HINT_TIME_LIMIT};
pub use search::{SearchResult, SearchStats, LOSS_BASE, WIN_BASE};
