//! Move suggestions for human players.
//!
//! A hint is advisory: any failure along the way is logged and reported as
//! "no hint" so it can never be mistaken for a rules violation. The search
//! runs on a scratch cache, leaving the bot's own cache and statistics as
//! they were.

use super::bot::Bot;
use super::cache::SearchCache;
use super::difficulty::{BotDifficulty, Strategy};
use super::search::{Searcher, LOSS_BASE, WIN_BASE};
use crate::board::{Coord, Symbol};
use crate::game::{GameError, GameState};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Budget for a hint search
pub const HINT_TIME_LIMIT: Duration = Duration::from_millis(3000);

/// Why the suggested move is recommended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintKind {
    /// Only one cell is left
    Forced,
    /// The move wins, now or by force
    Winning,
    /// The move stops an immediate threat, or the position is lost anyway
    Defensive,
    /// The move gives the better position
    Advantage,
    /// Nothing better than a level game is available
    Balanced,
}

/// A suggested move with its explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hint {
    pub position: Coord,
    pub kind: HintKind,
    /// Search score from the requesting player's view
    pub score: i32,
    /// How sure the advisor is, between 0 and 1
    pub confidence: f32,
    pub explanation: String,
}

impl Bot {
    /// Suggest a move for `player_id`, or `None` when no hint is available.
    pub fn get_hint(&self, state: &GameState, player_id: &str) -> Option<Hint> {
        match self.compute_hint(state, player_id) {
            Ok(hint) => Some(hint),
            Err(e) => {
                warn!(game = %state.id, player = player_id, error = %e, "no hint available");
                None
            }
        }
    }

    fn compute_hint(&self, state: &GameState, player_id: &str) -> Result<Hint, GameError> {
        let seat = state
            .seat_of(player_id)
            .ok_or_else(|| GameError::PlayerNotFound(player_id.to_string()))?;
        if state.is_finished() {
            return Err(GameError::GameOver);
        }
        if seat != state.current_player {
            return Err(GameError::NotYourTurn);
        }

        let board = *state.board();
        let symbol = Symbol::for_seat(seat);
        let depth = match BotDifficulty::Perfect.profile().strategy {
            Strategy::Minimax { depth } => depth,
            _ => 9,
        };

        let mut scratch = SearchCache::new();
        let result = Searcher::new(&mut scratch, symbol, HINT_TIME_LIMIT).search_root(&board, depth);
        debug!(
            nodes = result.stats.nodes,
            timed_out = result.stats.timed_out,
            score = result.score,
            "hint search finished"
        );
        let cell = result
            .best_move
            .ok_or_else(|| GameError::AiError("hint search finished no candidate".into()))?;
        let position = Coord::from_index(cell)
            .ok_or_else(|| GameError::AiError(format!("hint search returned bad cell {}", cell)))?;

        let score = result.score;
        let completes_line = board.winning_cell(symbol) == Some(cell);
        let blocks_line = board.winning_cell(symbol.opponent()) == Some(cell);

        let (kind, confidence, explanation) = if board.empty_cells().len() == 1 {
            (HintKind::Forced, 1.0, "Only one cell is left.".to_string())
        } else if completes_line {
            (HintKind::Winning, 1.0, "This completes a line and wins.".to_string())
        } else if score >= WIN_BASE {
            (
                HintKind::Winning,
                0.95,
                "This leads to a win whatever your opponent does.".to_string(),
            )
        } else if blocks_line {
            (
                HintKind::Defensive,
                0.9,
                "Your opponent threatens to complete a line here.".to_string(),
            )
        } else if score <= LOSS_BASE {
            (
                HintKind::Defensive,
                0.3,
                "Every move loses against perfect play; this one holds out longest.".to_string(),
            )
        } else if score > 0 {
            (
                HintKind::Advantage,
                0.7,
                "This gives you the better position.".to_string(),
            )
        } else {
            (
                HintKind::Balanced,
                0.5,
                "This keeps the game level.".to_string(),
            )
        };

        Ok(Hint {
            position,
            kind,
            score,
            confidence,
            explanation,
        })
    }
}
