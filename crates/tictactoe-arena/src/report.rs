//! Serializable summaries of sessions and arena runs.

use serde::{Deserialize, Serialize};
use tictactoe_core::Symbol;
use uuid::Uuid;

/// Session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    InProgress,
    Finished,
}

/// Live view of a session for the arena registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub players: Vec<String>,
    pub turn_number: u32,
    pub status: SessionStatus,
}

/// How one game ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    pub session_id: Uuid,
    pub winner: Option<Symbol>,
    /// Moves played
    pub turns: u32,
    pub final_board: String,
}

/// Totals for an arena run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaReport {
    pub x_tier: u8,
    pub o_tier: u8,
    pub games: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
    pub results: Vec<GameResult>,
}

impl ArenaReport {
    pub fn from_results(x_tier: u8, o_tier: u8, results: Vec<GameResult>) -> Self {
        let count = |symbol: Option<Symbol>| results.iter().filter(|r| r.winner == symbol).count();
        Self {
            x_tier,
            o_tier,
            games: results.len(),
            x_wins: count(Some(Symbol::X)),
            o_wins: count(Some(Symbol::O)),
            draws: count(None),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(winner: Option<Symbol>) -> GameResult {
        GameResult {
            session_id: Uuid::new_v4(),
            winner,
            turns: 5,
            final_board: String::new(),
        }
    }

    #[test]
    fn test_report_totals() {
        let report = ArenaReport::from_results(
            6,
            1,
            vec![
                result(Some(Symbol::X)),
                result(None),
                result(Some(Symbol::X)),
                result(Some(Symbol::O)),
            ],
        );
        assert_eq!(report.games, 4);
        assert_eq!(report.x_wins, 2);
        assert_eq!(report.o_wins, 1);
        assert_eq!(report.draws, 1);
        assert_eq!(report.x_wins + report.o_wins + report.draws, report.games);
    }
}
