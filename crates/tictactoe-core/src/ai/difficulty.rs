//! The difficulty ladder.
//!
//! Every tier's strategy, search depth and default time budget lives in
//! [`DIFFICULTY_TABLE`] so the ladder can be read and tested in one place.

use crate::game::GameError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bot difficulty tier, 1 (weakest) to 6 (perfect play)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BotDifficulty {
    /// Uniform random cell
    Random = 1,
    /// Blocks immediate threats, otherwise random
    Defensive = 2,
    /// Win, block, then positional preferences
    Tactical = 3,
    /// Alpha-beta at depth 3
    Shallow = 4,
    /// Alpha-beta at depth 5
    Deep = 5,
    /// Exhaustive alpha-beta
    Perfect = 6,
}

impl BotDifficulty {
    pub const ALL: [BotDifficulty; 6] = [
        BotDifficulty::Random,
        BotDifficulty::Defensive,
        BotDifficulty::Tactical,
        BotDifficulty::Shallow,
        BotDifficulty::Deep,
        BotDifficulty::Perfect,
    ];

    /// Numeric tier (1-6)
    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn profile(self) -> &'static DifficultyProfile {
        &DIFFICULTY_TABLE[self as usize - 1]
    }
}

impl TryFrom<u8> for BotDifficulty {
    type Error = GameError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        BotDifficulty::ALL
            .get((level as usize).wrapping_sub(1))
            .copied()
            .ok_or_else(|| GameError::AiError(format!("difficulty must be 1-6, got {}", level)))
    }
}

impl From<BotDifficulty> for u8 {
    fn from(difficulty: BotDifficulty) -> u8 {
        difficulty.level()
    }
}

/// How a tier picks its move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Any empty cell
    Random,
    /// Block the opponent's immediate win, else random
    BlockThenRandom,
    /// Win, block, center, corner, edge, random
    Heuristic,
    /// Alpha-beta search to the given depth
    Minimax { depth: u8 },
}

/// One row of the ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyProfile {
    pub difficulty: BotDifficulty,
    pub strategy: Strategy,
    /// Default budget in milliseconds; callers may override it
    pub time_budget_ms: u64,
}

impl DifficultyProfile {
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }
}

pub static DIFFICULTY_TABLE: [DifficultyProfile; 6] = [
    DifficultyProfile {
        difficulty: BotDifficulty::Random,
        strategy: Strategy::Random,
        time_budget_ms: 50,
    },
    DifficultyProfile {
        difficulty: BotDifficulty::Defensive,
        strategy: Strategy::BlockThenRandom,
        time_budget_ms: 100,
    },
    DifficultyProfile {
        difficulty: BotDifficulty::Tactical,
        strategy: Strategy::Heuristic,
        time_budget_ms: 200,
    },
    DifficultyProfile {
        difficulty: BotDifficulty::Shallow,
        strategy: Strategy::Minimax { depth: 3 },
        time_budget_ms: 500,
    },
    DifficultyProfile {
        difficulty: BotDifficulty::Deep,
        strategy: Strategy::Minimax { depth: 5 },
        time_budget_ms: 1000,
    },
    DifficultyProfile {
        difficulty: BotDifficulty::Perfect,
        strategy: Strategy::Minimax { depth: 9 },
        time_budget_ms: 2000,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_level() {
        for (i, profile) in DIFFICULTY_TABLE.iter().enumerate() {
            assert_eq!(profile.difficulty.level() as usize, i + 1);
            assert_eq!(profile.difficulty.profile(), profile);
        }
    }

    #[test]
    fn test_budgets_grow_with_tier() {
        let budgets: Vec<u64> = DIFFICULTY_TABLE.iter().map(|p| p.time_budget_ms).collect();
        assert_eq!(budgets, vec![50, 100, 200, 500, 1000, 2000]);
    }

    #[test]
    fn test_search_depths() {
        assert_eq!(
            BotDifficulty::Shallow.profile().strategy,
            Strategy::Minimax { depth: 3 }
        );
        assert_eq!(
            BotDifficulty::Deep.profile().strategy,
            Strategy::Minimax { depth: 5 }
        );
        assert_eq!(
            BotDifficulty::Perfect.profile().strategy,
            Strategy::Minimax { depth: 9 }
        );
    }

    #[test]
    fn test_try_from_level() {
        assert_eq!(BotDifficulty::try_from(3), Ok(BotDifficulty::Tactical));
        assert!(matches!(BotDifficulty::try_from(0), Err(GameError::AiError(_))));
        assert!(matches!(BotDifficulty::try_from(7), Err(GameError::AiError(_))));
    }

    #[test]
    fn test_serializes_as_level() {
        assert_eq!(serde_json::to_string(&BotDifficulty::Deep).unwrap(), "5");
        let parsed: BotDifficulty = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, BotDifficulty::Defensive);
        assert!(serde_json::from_str::<BotDifficulty>("9").is_err());
    }
}
