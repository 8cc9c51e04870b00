//! The rules engine.
//!
//! Every game kind implements [`GameEngine`]; [`engine_for`] resolves a game
//! identifier to its engine through a static registry. Validation and
//! transition are split: [`GameEngine::validate_move`] holds all policy,
//! [`GameEngine::apply_move`] assumes the move already passed it.

use crate::actions::{GameAction, Move};
use crate::board::{Coord, Symbol};
use crate::game::{
    EndReason, GameError, GameMetadata, GameOutcome, GameSettings, GameState, Scoreboard,
    Standing, TicTacToeMeta, ValidationOutcome, TIC_TAC_TOE,
};
use crate::player::Player;
use tracing::debug;
use uuid::Uuid;

/// Contract every game kind implements
pub trait GameEngine: Send + Sync {
    /// Identifier this engine is registered under
    fn game_type(&self) -> &'static str;

    /// Build the opening snapshot
    fn create_initial_state(
        &self,
        settings: &GameSettings,
        players: Vec<Player>,
    ) -> Result<GameState, GameError>;

    /// Check a move against a snapshot without side effects
    fn validate_move(&self, state: &GameState, mv: &Move, player_id: &str) -> ValidationOutcome;

    /// Produce the next snapshot. The move must have passed validation.
    fn apply_move(&self, state: &GameState, mv: &Move) -> Result<GameState, GameError>;

    /// `None` while play continues
    fn is_terminal(&self, state: &GameState) -> Option<GameOutcome>;

    /// Scores and ranks for both players
    fn evaluate(&self, state: &GameState) -> Scoreboard;

    /// Every move `player_id` may make now
    fn legal_moves(&self, state: &GameState, player_id: &str) -> Vec<Move>;

    fn serialize(&self, state: &GameState) -> Result<String, GameError>;

    fn deserialize(&self, data: &str) -> Result<GameState, GameError>;
}

static TIC_TAC_TOE_ENGINE: TicTacToeEngine = TicTacToeEngine;

/// Look up the engine registered for a game identifier
pub fn engine_for(game_type: &str) -> Option<&'static dyn GameEngine> {
    match game_type {
        TIC_TAC_TOE => Some(&TIC_TAC_TOE_ENGINE),
        _ => None,
    }
}

/// Rules for 3x3 tic-tac-toe
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToeEngine;

impl GameEngine for TicTacToeEngine {
    fn game_type(&self) -> &'static str {
        TIC_TAC_TOE
    }

    fn create_initial_state(
        &self,
        settings: &GameSettings,
        players: Vec<Player>,
    ) -> Result<GameState, GameError> {
        if settings.game_type != TIC_TAC_TOE {
            return Err(GameError::InvalidGameState(format!(
                "expected game type '{}', got '{}'",
                TIC_TAC_TOE, settings.game_type
            )));
        }

        let players: [Player; 2] = players.try_into().map_err(|p: Vec<Player>| {
            GameError::InvalidGameState(format!("expected 2 players, got {}", p.len()))
        })?;
        if players[0].id == players[1].id {
            return Err(GameError::InvalidGameState("duplicate player ids".into()));
        }

        Ok(GameState {
            id: Uuid::new_v4().to_string(),
            players,
            current_player: 0,
            turn_number: 1,
            moves: Vec::new(),
            metadata: GameMetadata::TicTacToe(TicTacToeMeta::from_board(Default::default())),
        })
    }

    fn validate_move(&self, state: &GameState, mv: &Move, player_id: &str) -> ValidationOutcome {
        let (position, symbol) = match mv.action {
            GameAction::Place { position, symbol } => (position, symbol),
            GameAction::Unknown => {
                return Err(GameError::InvalidMove("only placement moves are allowed".into()))
            }
        };

        let seat = state
            .seat_of(player_id)
            .ok_or_else(|| GameError::PlayerNotFound(player_id.to_string()))?;
        if seat != state.current_player {
            return Err(GameError::NotYourTurn);
        }

        if state.is_finished() {
            return Err(GameError::GameOver);
        }

        if !position.is_in_bounds() {
            return Err(GameError::InvalidMove(format!("{} is off the board", position)));
        }

        if !state.board().is_empty_at(position) {
            return Err(GameError::InvalidMove(format!("{} is already taken", position)));
        }

        if symbol != Symbol::for_seat(seat) {
            return Err(GameError::InvalidMove(format!(
                "{} does not play {}",
                player_id, symbol
            )));
        }
        if mv.player_id != player_id {
            return Err(GameError::InvalidMove(format!(
                "move belongs to {}, submitted by {}",
                mv.player_id, player_id
            )));
        }

        Ok(())
    }

    fn apply_move(&self, state: &GameState, mv: &Move) -> Result<GameState, GameError> {
        let GameAction::Place { position, symbol } = mv.action else {
            return Err(GameError::InvalidMove("only placement moves are allowed".into()));
        };
        if state.is_finished() {
            return Err(GameError::GameOver);
        }

        let mut board = *state.board();
        if !board.set(position, Some(symbol)) {
            return Err(GameError::InvalidMove(format!("{} is off the board", position)));
        }

        let meta = TicTacToeMeta::from_board(board);
        let current_player = if meta.is_terminal() {
            state.current_player
        } else {
            1 - state.current_player
        };

        if let Some(winner) = meta.winner {
            debug!(game = %state.id, %winner, turn = state.turn_number, "game won");
        } else if meta.is_draw {
            debug!(game = %state.id, turn = state.turn_number, "game drawn");
        }

        let mut moves = Vec::with_capacity(state.moves.len() + 1);
        moves.extend_from_slice(&state.moves);
        moves.push(mv.clone());

        Ok(GameState {
            id: state.id.clone(),
            players: state.players.clone(),
            current_player,
            turn_number: state.turn_number + 1,
            moves,
            metadata: GameMetadata::TicTacToe(meta),
        })
    }

    fn is_terminal(&self, state: &GameState) -> Option<GameOutcome> {
        let meta = state.meta();
        let reason = if meta.winner.is_some() {
            EndReason::Victory
        } else if meta.is_draw {
            EndReason::Draw
        } else {
            return None;
        };

        Some(GameOutcome {
            winner: state.winner_player().map(|p| p.id.clone()),
            reason,
            scores: self.evaluate(state),
        })
    }

    fn evaluate(&self, state: &GameState) -> Scoreboard {
        let winner_seat = state.winner().map(Symbol::seat);
        let standings = state
            .players
            .iter()
            .enumerate()
            .map(|(seat, player)| {
                let (score, rank) = match winner_seat {
                    Some(w) if w == seat => (1, 1),
                    Some(_) => (0, 2),
                    None => (0, 1),
                };
                Standing {
                    player_id: player.id.clone(),
                    score,
                    rank,
                }
            })
            .collect();
        Scoreboard { standings }
    }

    fn legal_moves(&self, state: &GameState, player_id: &str) -> Vec<Move> {
        let Some(seat) = state.seat_of(player_id) else {
            return Vec::new();
        };
        if seat != state.current_player || state.is_finished() {
            return Vec::new();
        }

        let symbol = Symbol::for_seat(seat);
        state
            .board()
            .empty_cells()
            .into_iter()
            .filter_map(Coord::from_index)
            .map(|coord| Move::place(player_id, coord, symbol))
            .collect()
    }

    fn serialize(&self, state: &GameState) -> Result<String, GameError> {
        serde_json::to_string(state).map_err(|e| GameError::InvalidGameState(e.to_string()))
    }

    fn deserialize(&self, data: &str) -> Result<GameState, GameError> {
        let state: GameState =
            serde_json::from_str(data).map_err(|e| GameError::InvalidGameState(e.to_string()))?;
        if state.metadata.game_type() != TIC_TAC_TOE {
            return Err(GameError::InvalidGameState("wrong game kind".into()));
        }
        state.check_consistency()?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn new_game() -> GameState {
        TicTacToeEngine
            .create_initial_state(
                &GameSettings::tic_tac_toe(),
                vec![Player::human("alice", "Alice"), Player::human("bob", "Bob")],
            )
            .unwrap()
    }

    fn play(state: &GameState, x: u8, y: u8) -> GameState {
        let player_id = state.current().id.clone();
        let mv = Move::place(player_id.clone(), Coord::new(x, y), state.current_symbol());
        TicTacToeEngine.validate_move(state, &mv, &player_id).unwrap();
        TicTacToeEngine.apply_move(state, &mv).unwrap()
    }

    #[test]
    fn test_new_game_is_empty() {
        let game = new_game();
        assert_eq!(game.current_player, 0);
        assert_eq!(game.turn_number, 1);
        assert!(game.moves.is_empty());
        assert_eq!(game.board().empty_cells().len(), 9);
        assert!(TicTacToeEngine.is_terminal(&game).is_none());
    }

    #[test]
    fn test_ongoing_game_scores_level() {
        let scores = TicTacToeEngine.evaluate(&new_game());
        assert!(scores.standings.iter().all(|s| s.score == 0 && s.rank == 1));

        let scores = TicTacToeEngine.evaluate(&play(&new_game(), 1, 1));
        assert_eq!(scores.standing("alice").map(|s| (s.score, s.rank)), Some((0, 1)));
        assert_eq!(scores.standing("bob").map(|s| (s.score, s.rank)), Some((0, 1)));
    }

    #[test]
    fn test_create_rejects_wrong_game_type() {
        let settings = GameSettings {
            game_type: "chess".into(),
            ai_time_limit_ms: None,
        };
        let result = TicTacToeEngine.create_initial_state(
            &settings,
            vec![Player::human("a", "A"), Player::human("b", "B")],
        );
        assert!(matches!(result, Err(GameError::InvalidGameState(_))));
    }

    #[test]
    fn test_create_rejects_wrong_player_count() {
        let result = TicTacToeEngine.create_initial_state(
            &GameSettings::tic_tac_toe(),
            vec![Player::human("a", "A")],
        );
        assert!(matches!(result, Err(GameError::InvalidGameState(_))));

        let result = TicTacToeEngine.create_initial_state(
            &GameSettings::tic_tac_toe(),
            vec![
                Player::human("a", "A"),
                Player::human("b", "B"),
                Player::human("c", "C"),
            ],
        );
        assert!(matches!(result, Err(GameError::InvalidGameState(_))));
    }

    #[test]
    fn test_center_opening() {
        let game = play(&new_game(), 1, 1);
        assert_eq!(game.board().get(Coord::CENTER), Some(Symbol::X));
        assert_eq!(game.board().empty_cells().len(), 8);
        assert_eq!(game.current_player, 1);
        assert_eq!(game.turn_number, 2);
        assert_eq!(game.moves.len(), 1);
    }

    #[test]
    fn test_validation_order() {
        let game = new_game();

        let unknown = Move {
            action: GameAction::Unknown,
            ..Move::place("alice", Coord::CENTER, Symbol::X)
        };
        assert!(matches!(
            TicTacToeEngine.validate_move(&game, &unknown, "alice"),
            Err(GameError::InvalidMove(_))
        ));

        let mv = Move::place("bob", Coord::CENTER, Symbol::O);
        assert_eq!(
            TicTacToeEngine.validate_move(&game, &mv, "bob"),
            Err(GameError::NotYourTurn)
        );

        let mv = Move::place("carol", Coord::CENTER, Symbol::O);
        assert_eq!(
            TicTacToeEngine.validate_move(&game, &mv, "carol"),
            Err(GameError::PlayerNotFound("carol".into()))
        );

        let mv = Move::place("alice", Coord::new(3, 1), Symbol::X);
        assert!(matches!(
            TicTacToeEngine.validate_move(&game, &mv, "alice"),
            Err(GameError::InvalidMove(_))
        ));

        let mv = Move::place("alice", Coord::CENTER, Symbol::O);
        assert!(matches!(
            TicTacToeEngine.validate_move(&game, &mv, "alice"),
            Err(GameError::InvalidMove(_))
        ));

        let game = play(&game, 1, 1);
        let mv = Move::place("bob", Coord::CENTER, Symbol::O);
        assert!(matches!(
            TicTacToeEngine.validate_move(&game, &mv, "bob"),
            Err(GameError::InvalidMove(_))
        ));
    }

    #[test]
    fn test_validation_has_no_side_effects() {
        let game = new_game();
        let before = game.clone();
        let mv = Move::place("alice", Coord::CENTER, Symbol::X);
        TicTacToeEngine.validate_move(&game, &mv, "alice").unwrap();
        assert_eq!(game, before);
    }

    #[test]
    fn test_vertical_win_and_scoreboard() {
        let mut game = new_game();
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
            game = play(&game, x, y);
        }

        assert_eq!(game.winner(), Some(Symbol::X));
        let line = game.meta().winning_line.unwrap();
        assert_eq!(line.kind, crate::board::LineKind::Vertical);
        // The winner stays on move; the turn counter still advances
        assert_eq!(game.current_player, 0);
        assert_eq!(game.turn_number, 6);

        let outcome = TicTacToeEngine.is_terminal(&game).unwrap();
        assert_eq!(outcome.reason, EndReason::Victory);
        assert_eq!(outcome.winner.as_deref(), Some("alice"));

        let alice = outcome.scores.standing("alice").unwrap();
        assert_eq!((alice.score, alice.rank), (1, 1));
        let bob = outcome.scores.standing("bob").unwrap();
        assert_eq!((bob.score, bob.rank), (0, 2));
    }

    #[test]
    fn test_move_after_game_over() {
        let mut game = new_game();
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
            game = play(&game, x, y);
        }
        let mv = Move::place("alice", Coord::new(2, 2), Symbol::X);
        assert_eq!(
            TicTacToeEngine.validate_move(&game, &mv, "alice"),
            Err(GameError::GameOver)
        );
        assert_eq!(TicTacToeEngine.apply_move(&game, &mv), Err(GameError::GameOver));
        assert!(TicTacToeEngine.legal_moves(&game, "alice").is_empty());
    }

    #[test]
    fn test_draw() {
        let mut game = new_game();
        // X O X / X O O / O X X
        for (x, y) in [
            (0, 0),
            (1, 0),
            (2, 0),
            (1, 1),
            (0, 1),
            (2, 1),
            (1, 2),
            (0, 2),
            (2, 2),
        ] {
            game = play(&game, x, y);
        }
        assert!(game.meta().is_draw);
        assert!(TicTacToeEngine.legal_moves(&game, "alice").is_empty());
        assert!(TicTacToeEngine.legal_moves(&game, "bob").is_empty());

        let outcome = TicTacToeEngine.is_terminal(&game).unwrap();
        assert_eq!(outcome.reason, EndReason::Draw);
        assert_eq!(outcome.winner, None);
        assert!(outcome.scores.standings.iter().all(|s| s.rank == 1 && s.score == 0));
    }

    #[test]
    fn test_legal_moves() {
        let game = new_game();
        assert!(TicTacToeEngine.legal_moves(&game, "bob").is_empty());
        let moves = TicTacToeEngine.legal_moves(&game, "alice");
        assert_eq!(moves.len(), 9);
        assert!(moves.iter().all(|m| m.symbol() == Some(Symbol::X)));

        let game = play(&game, 1, 1);
        let moves = TicTacToeEngine.legal_moves(&game, "bob");
        assert_eq!(moves.len(), 8);
        for mv in &moves {
            assert_eq!(TicTacToeEngine.validate_move(&game, mv, "bob"), Ok(()));
            assert!(TicTacToeEngine.apply_move(&game, mv).is_ok());
        }
    }

    #[test]
    fn test_serialize_round_trip() {
        let game = play(&play(&new_game(), 1, 1), 0, 0);
        let json = TicTacToeEngine.serialize(&game).unwrap();
        let restored = TicTacToeEngine.deserialize(&json).unwrap();
        assert_eq!(restored, game);
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        assert!(matches!(
            TicTacToeEngine.deserialize("not json"),
            Err(GameError::InvalidGameState(_))
        ));
        assert!(matches!(
            TicTacToeEngine.deserialize("{\"id\":\"x\"}"),
            Err(GameError::InvalidGameState(_))
        ));
    }

    #[test]
    fn test_deserialize_rejects_three_players() {
        let game = new_game();
        let mut value = serde_json::to_value(&game).unwrap();
        let extra = serde_json::to_value(Player::human("c", "C")).unwrap();
        value["players"].as_array_mut().unwrap().push(extra);
        let result = TicTacToeEngine.deserialize(&value.to_string());
        assert!(matches!(result, Err(GameError::InvalidGameState(_))));
    }

    #[test]
    fn test_deserialize_rejects_tampered_history() {
        let game = play(&new_game(), 1, 1);
        let mut value = serde_json::to_value(&game).unwrap();
        let forged = Move::place("nobody", Coord::new(9, 9), Symbol::O);
        value["moves"][0] = serde_json::to_value(&forged).unwrap();

        let result = TicTacToeEngine.deserialize(&value.to_string());
        assert!(matches!(result, Err(GameError::InvalidGameState(_))));
    }

    #[test]
    fn test_deserialize_rejects_history_for_another_board() {
        // X moved to the corner in the history, the board shows the center
        let game = play(&new_game(), 1, 1);
        let mut value = serde_json::to_value(&game).unwrap();
        let moved = Move::place("alice", Coord::new(0, 0), Symbol::X);
        value["moves"][0] = serde_json::to_value(&moved).unwrap();

        let result = TicTacToeEngine.deserialize(&value.to_string());
        assert!(matches!(result, Err(GameError::InvalidGameState(_))));
    }

    #[test]
    fn test_registry() {
        let engine = engine_for(TIC_TAC_TOE).unwrap();
        assert_eq!(engine.game_type(), TIC_TAC_TOE);
        assert!(engine_for("connect-four").is_none());
    }
}
