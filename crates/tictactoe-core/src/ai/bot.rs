//! AI players.
//!
//! A [`Bot`] owns its random number generator and its search cache, so one
//! bot must not serve two searches at the same time. Give every concurrently
//! running game (or seat) its own bot.

use super::cache::SearchCache;
use super::difficulty::{BotDifficulty, Strategy};
use super::search::{SearchResult, SearchStats, Searcher};
use crate::actions::Move;
use crate::board::{Board, Coord, Symbol};
use crate::game::{GameError, GameState};
use rand::prelude::*;
use std::time::{Duration, Instant};
use tracing::debug;

const CORNERS: [usize; 4] = [0, 2, 6, 8];
const EDGES: [usize; 4] = [1, 3, 5, 7];
const CENTER: usize = 4;

/// A bot that picks moves at any difficulty tier
pub struct Bot {
    rng: StdRng,
    cache: SearchCache,
    last_stats: Option<SearchStats>,
}

impl Bot {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            cache: SearchCache::new(),
            last_stats: None,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            cache: SearchCache::new(),
            last_stats: None,
        }
    }

    /// Statistics of the most recent alpha-beta search
    pub fn last_stats(&self) -> Option<SearchStats> {
        self.last_stats
    }

    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }

    /// Drop everything memoized so far
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Choose a move for `player_id` at tier `difficulty` (1-6).
    ///
    /// `time_limit` overrides the tier's default budget.
    pub fn get_move(
        &mut self,
        state: &GameState,
        difficulty: u8,
        player_id: &str,
        time_limit: Option<Duration>,
    ) -> Result<Move, GameError> {
        let difficulty = BotDifficulty::try_from(difficulty)?;
        let seat = state
            .seat_of(player_id)
            .ok_or_else(|| GameError::PlayerNotFound(player_id.to_string()))?;
        if state.is_finished() {
            return Err(GameError::GameOver);
        }
        if seat != state.current_player {
            return Err(GameError::NotYourTurn);
        }

        let symbol = Symbol::for_seat(seat);
        let budget = time_limit.unwrap_or_else(|| difficulty.profile().time_budget());
        let cell = self
            .choose_cell(state.board(), symbol, difficulty, budget)
            .ok_or_else(|| GameError::AiError("no empty cell to play".into()))?;
        let position = Coord::from_index(cell)
            .ok_or_else(|| GameError::AiError(format!("search returned bad cell {}", cell)))?;

        debug!(
            game = %state.id,
            player = player_id,
            tier = difficulty.level(),
            %position,
            "bot chose move"
        );
        Ok(Move::place(player_id, position, symbol))
    }

    /// Pick a cell index for `symbol`, or `None` on a full board
    pub fn choose_cell(
        &mut self,
        board: &Board,
        symbol: Symbol,
        difficulty: BotDifficulty,
        budget: Duration,
    ) -> Option<usize> {
        let start = Instant::now();
        match difficulty.profile().strategy {
            Strategy::Random => self.random_cell(board),
            Strategy::BlockThenRandom => board
                .winning_cell(symbol.opponent())
                .or_else(|| self.random_cell(board)),
            Strategy::Heuristic => self.heuristic_cell(board, symbol, start, budget),
            Strategy::Minimax { depth } => {
                let result = self.search(board, symbol, depth, budget);
                result.best_move.or_else(|| {
                    debug!("budget expired before any candidate finished, playing random");
                    self.random_cell(board)
                })
            }
        }
    }

    /// Run an alpha-beta search from `symbol`'s point of view
    pub fn search(
        &mut self,
        board: &Board,
        symbol: Symbol,
        depth: u8,
        budget: Duration,
    ) -> SearchResult {
        let result = Searcher::new(&mut self.cache, symbol, budget).search_root(board, depth);
        debug!(
            depth,
            nodes = result.stats.nodes,
            cache_hits = result.stats.cache_hits,
            elapsed_ms = result.stats.elapsed.as_millis() as u64,
            timed_out = result.stats.timed_out,
            score = result.score,
            "search finished"
        );
        self.last_stats = Some(result.stats);
        result
    }

    fn random_cell(&mut self, board: &Board) -> Option<usize> {
        board.empty_cells().choose(&mut self.rng).copied()
    }

    fn random_of(&mut self, board: &Board, cells: &[usize]) -> Option<usize> {
        let open: Vec<usize> = cells
            .iter()
            .copied()
            .filter(|&i| board.get_index(i).is_none())
            .collect();
        open.choose(&mut self.rng).copied()
    }

    /// Win, block, center, corner, edge
    fn heuristic_cell(
        &mut self,
        board: &Board,
        symbol: Symbol,
        start: Instant,
        budget: Duration,
    ) -> Option<usize> {
        if let Some(cell) = board.winning_cell(symbol) {
            return Some(cell);
        }
        if let Some(cell) = board.winning_cell(symbol.opponent()) {
            return Some(cell);
        }
        if start.elapsed() >= budget {
            return self.random_cell(board);
        }
        if board.get_index(CENTER).is_none() {
            return Some(CENTER);
        }
        self.random_of(board, &CORNERS)
            .or_else(|| self.random_of(board, &EDGES))
            .or_else(|| self.random_cell(board))
    }
}

impl Default for Bot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{GameEngine, TicTacToeEngine};
    use crate::game::GameSettings;
    use crate::player::Player;

    fn new_game() -> GameState {
        TicTacToeEngine
            .create_initial_state(
                &GameSettings::tic_tac_toe(),
                vec![
                    Player::human("human", "Human"),
                    Player::ai("bot", "Bot", BotDifficulty::Perfect),
                ],
            )
            .unwrap()
    }

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_rejects_bad_difficulty() {
        let mut bot = Bot::with_seed(1);
        let game = new_game();
        for level in [0, 7, 255] {
            assert!(matches!(
                bot.get_move(&game, level, "human", None),
                Err(GameError::AiError(_))
            ));
        }
    }

    #[test]
    fn test_rejects_wrong_player() {
        let mut bot = Bot::with_seed(1);
        let game = new_game();
        assert_eq!(
            bot.get_move(&game, 3, "bot", None),
            Err(GameError::NotYourTurn)
        );
        assert!(matches!(
            bot.get_move(&game, 3, "ghost", None),
            Err(GameError::PlayerNotFound(_))
        ));
    }

    #[test]
    fn test_move_is_legal_for_every_tier() {
        let game = new_game();
        for difficulty in BotDifficulty::ALL {
            let mut bot = Bot::with_seed(7);
            let mv = bot
                .get_move(&game, difficulty.level(), "human", None)
                .unwrap();
            assert_eq!(TicTacToeEngine.validate_move(&game, &mv, "human"), Ok(()));
        }
    }

    #[test]
    fn test_defensive_blocks() {
        let mut bot = Bot::with_seed(3);
        let cell = bot.choose_cell(
            &board("XX. O.. ..."),
            Symbol::O,
            BotDifficulty::Defensive,
            Duration::from_millis(100),
        );
        assert_eq!(cell, Some(2));
    }

    #[test]
    fn test_tactical_prefers_win_over_block() {
        let mut bot = Bot::with_seed(3);
        let cell = bot.choose_cell(
            &board("XX. OO. X.."),
            Symbol::O,
            BotDifficulty::Tactical,
            Duration::from_millis(200),
        );
        assert_eq!(cell, Some(5));
    }

    #[test]
    fn test_tactical_positional_order() {
        let mut bot = Bot::with_seed(3);
        let quiet = Duration::from_secs(1);
        assert_eq!(
            bot.choose_cell(&Board::new(), Symbol::X, BotDifficulty::Tactical, quiet),
            Some(CENTER)
        );
        let cell = bot
            .choose_cell(&board("... .X. ..."), Symbol::O, BotDifficulty::Tactical, quiet)
            .unwrap();
        assert!(CORNERS.contains(&cell));
    }

    #[test]
    fn test_random_fallback_when_budget_is_zero() {
        let mut bot = Bot::with_seed(11);
        let b = board("X.. .O. ...");
        let cell = bot
            .choose_cell(&b, Symbol::X, BotDifficulty::Perfect, Duration::ZERO)
            .unwrap();
        assert!(b.get_index(cell).is_none());
        assert!(bot.last_stats().unwrap().timed_out);
    }

    #[test]
    fn test_full_board_has_no_cell() {
        let mut bot = Bot::with_seed(1);
        for difficulty in BotDifficulty::ALL {
            assert_eq!(
                bot.choose_cell(
                    &board("XOX XOO OXX"),
                    Symbol::X,
                    difficulty,
                    Duration::from_secs(1)
                ),
                None
            );
        }
    }

    #[test]
    fn test_seeded_bots_agree() {
        let game = new_game();
        let a = Bot::with_seed(42).get_move(&game, 1, "human", None).unwrap();
        let b = Bot::with_seed(42).get_move(&game, 1, "human", None).unwrap();
        assert_eq!(a.position(), b.position());
    }
}
