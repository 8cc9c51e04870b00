//! Moves that players submit.
//!
//! A `Move` is a value: once created it is never mutated. The engine
//! validates it against a snapshot and produces a new snapshot.

use crate::board::{Coord, Symbol};
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// What a move does
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameAction {
    /// Place a symbol on an empty cell
    Place { position: Coord, symbol: Symbol },
    /// An action kind this engine does not understand (e.g. sent by a
    /// client built for another game)
    #[serde(other)]
    Unknown,
}

/// A submitted move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub id: String,
    pub player_id: PlayerId,
    pub action: GameAction,
    /// Milliseconds since the UNIX epoch
    pub timestamp: u64,
}

impl Move {
    /// Create a placement move stamped with a fresh id and the current time
    pub fn place(player_id: impl Into<PlayerId>, position: Coord, symbol: Symbol) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            player_id: player_id.into(),
            action: GameAction::Place { position, symbol },
            timestamp: now_millis(),
        }
    }

    /// Target coordinate of a placement
    pub fn position(&self) -> Option<Coord> {
        match self.action {
            GameAction::Place { position, .. } => Some(position),
            GameAction::Unknown => None,
        }
    }

    pub fn symbol(&self) -> Option<Symbol> {
        match self.action {
            GameAction::Place { symbol, .. } => Some(symbol),
            GameAction::Unknown => None,
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
