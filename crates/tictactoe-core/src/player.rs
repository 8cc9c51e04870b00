//! Player records.
//!
//! Players are created once at game setup. The engine never changes a
//! player mid-game; score and active flags are updated by the caller
//! between games.

use crate::ai::BotDifficulty;
use serde::{Deserialize, Serialize};

/// Stable player identifier
pub type PlayerId = String;

/// A seated player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier
    pub id: PlayerId,
    /// Display name
    pub name: String,
    /// Whether moves for this player come from the AI
    pub is_ai: bool,
    /// AI tier, only meaningful when `is_ai` is set
    pub difficulty: Option<BotDifficulty>,
    /// Games won so far
    pub score: u32,
    /// Whether the player is still taking part
    pub is_active: bool,
}

impl Player {
    /// Create a human player
    pub fn human(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_ai: false,
            difficulty: None,
            score: 0,
            is_active: true,
        }
    }

    /// Create an AI-controlled player at the given tier
    pub fn ai(id: impl Into<PlayerId>, name: impl Into<String>, difficulty: BotDifficulty) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_ai: true,
            difficulty: Some(difficulty),
            score: 0,
            is_active: true,
        }
    }

    /// Record a won game
    pub fn record_win(&mut self) {
        self.score += 1;
    }
}
