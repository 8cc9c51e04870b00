//! Game session management.
//!
//! A session is the caller side of the engine contract: it owns the snapshot
//! history (which makes undo a pop), one bot per AI seat, and the player
//! records whose scores are updated between games.

use std::time::Duration;
use thiserror::Error;
use tictactoe_core::{
    Board, Bot, BotDifficulty, Coord, GameEngine, GameError, GameSettings, GameState, Move,
    Player, Symbol, TicTacToeEngine,
};
use tracing::info;
use uuid::Uuid;

use crate::report::{GameResult, SessionInfo, SessionStatus};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Seat {0} is not AI-controlled")]
    NotAiSeat(usize),

    #[error("Position cannot be reached: {0}")]
    UnreachablePosition(String),
}

/// One side of the table
pub struct Seat {
    pub player: Player,
    /// Present for AI seats; each seat owns its bot and cache
    pub bot: Option<Bot>,
}

impl Seat {
    pub fn new(player: Player, seed: Option<u64>) -> Self {
        let bot = player.is_ai.then(|| match seed {
            Some(seed) => Bot::with_seed(seed),
            None => Bot::new(),
        });
        Self { player, bot }
    }
}

/// A running game plus everything the caller keeps around it
pub struct GameSession {
    pub id: Uuid,
    pub settings: GameSettings,
    pub seats: [Seat; 2],
    /// Every snapshot since the start, oldest first
    history: Vec<GameState>,
    pub games_played: u32,
}

impl GameSession {
    pub fn new(settings: GameSettings, seats: [Seat; 2]) -> Result<Self, SessionError> {
        let players = seats.iter().map(|s| s.player.clone()).collect();
        let initial = TicTacToeEngine.create_initial_state(&settings, players)?;

        Ok(Self {
            id: Uuid::new_v4(),
            settings,
            seats,
            history: vec![initial],
            games_played: 0,
        })
    }

    /// Latest snapshot
    pub fn current(&self) -> &GameState {
        // History always holds at least the initial snapshot
        &self.history[self.history.len() - 1]
    }

    pub fn history(&self) -> &[GameState] {
        &self.history
    }

    pub fn status(&self) -> SessionStatus {
        if self.current().is_finished() {
            SessionStatus::Finished
        } else {
            SessionStatus::InProgress
        }
    }

    /// Validate and apply a move, then record results if the game ended
    pub fn submit(&mut self, player_id: &str, mv: &Move) -> Result<&GameState, SessionError> {
        let state = self.current();
        TicTacToeEngine.validate_move(state, mv, player_id)?;
        let next = TicTacToeEngine.apply_move(state, mv)?;
        self.history.push(next);

        if self.current().is_finished() {
            self.record_result();
        }
        Ok(self.current())
    }

    /// Let the AI seat to move play one move
    pub fn play_ai_turn(&mut self) -> Result<Move, SessionError> {
        let state = self.current().clone();
        let seat = state.current_player;
        let player = self.seats[seat].player.clone();
        let level = player
            .difficulty
            .map(BotDifficulty::level)
            .ok_or(SessionError::NotAiSeat(seat))?;
        let time_limit = self.settings.ai_time_limit_ms.map(Duration::from_millis);

        let bot = self.seats[seat]
            .bot
            .as_mut()
            .ok_or(SessionError::NotAiSeat(seat))?;
        let mv = bot.get_move(&state, level, &player.id, time_limit)?;

        self.submit(&player.id, &mv)?;
        Ok(mv)
    }

    /// Drop the latest snapshot.
    ///
    /// Undoing out of a finished game also takes back the point it awarded.
    pub fn undo(&mut self) -> Result<(), SessionError> {
        if self.history.len() <= 1 {
            return Err(SessionError::NothingToUndo);
        }
        if let Some(winner) = self.current().winner() {
            let seat = &mut self.seats[winner.seat()];
            seat.player.score = seat.player.score.saturating_sub(1);
        }
        if self.current().is_finished() {
            self.games_played = self.games_played.saturating_sub(1);
        }
        self.history.pop();
        Ok(())
    }

    /// Start a fresh game with the same seats; scores carry over
    pub fn rematch(&mut self) -> Result<(), SessionError> {
        let players = self.seats.iter().map(|s| s.player.clone()).collect();
        let initial = TicTacToeEngine.create_initial_state(&self.settings, players)?;
        self.history = vec![initial];
        Ok(())
    }

    fn record_result(&mut self) {
        self.games_played += 1;
        let state = self.current();
        match state.winner() {
            Some(symbol) => {
                let seat = symbol.seat();
                info!(session = %self.id, winner = %self.seats[seat].player.name, "game won");
                self.seats[seat].player.record_win();
            }
            None => info!(session = %self.id, "game drawn"),
        }
    }

    pub fn result(&self) -> GameResult {
        let state = self.current();
        GameResult {
            session_id: self.id,
            winner: state.winner(),
            turns: state.turn_number - 1,
            final_board: state.board().to_string(),
        }
    }

    pub fn to_info(&self) -> SessionInfo {
        let state = self.current();
        SessionInfo {
            id: self.id,
            players: self.seats.iter().map(|s| s.player.name.clone()).collect(),
            turn_number: state.turn_number,
            status: self.status(),
        }
    }
}

/// Rebuild a snapshot whose board matches `board`, with `X` moving first.
///
/// Fails if the symbol counts cannot come from alternating play or a line
/// was completed before the last placement. On a won board the winner's
/// final placement is a cell whose removal breaks every winning line.
pub fn position_from_board(board: &Board) -> Result<GameState, SessionError> {
    let mut xs: Vec<usize> = (0..9).filter(|&i| board.get_index(i) == Some(Symbol::X)).collect();
    let mut os: Vec<usize> = (0..9).filter(|&i| board.get_index(i) == Some(Symbol::O)).collect();
    if xs.len() < os.len() || xs.len() > os.len() + 1 {
        return Err(SessionError::UnreachablePosition(format!(
            "{} X and {} O",
            xs.len(),
            os.len()
        )));
    }

    if let Some((winner, _)) = board.check_win() {
        let cells = if winner == Symbol::X { &mut xs } else { &mut os };
        let finishing = cells.iter().position(|&cell| {
            let mut before = *board;
            before.set_index(cell, None);
            !before.has_line(winner)
        });
        if let Some(pos) = finishing {
            let last = cells.remove(pos);
            cells.push(last);
        }
    }

    let players = vec![Player::human("x", "X"), Player::human("o", "O")];
    let mut state = TicTacToeEngine.create_initial_state(&GameSettings::tic_tac_toe(), players)?;

    let mut order = Vec::with_capacity(xs.len() + os.len());
    for i in 0..xs.len() {
        order.push((xs[i], Symbol::X));
        if let Some(&o) = os.get(i) {
            order.push((o, Symbol::O));
        }
    }

    for (cell, symbol) in order {
        let coord = Coord::from_index(cell)
            .ok_or_else(|| SessionError::UnreachablePosition(format!("cell {}", cell)))?;
        let player_id = state.players[symbol.seat()].id.clone();
        let mv = Move::place(player_id, coord, symbol);
        state = TicTacToeEngine
            .apply_move(&state, &mv)
            .map_err(|_| SessionError::UnreachablePosition("game ended early".into()))?;
    }

    if state.board() != board {
        return Err(SessionError::UnreachablePosition(
            "replayed board does not match".into(),
        ));
    }
    Ok(state)
}
