//! Game state snapshots and the types that describe them.
//!
//! A `GameState` is an immutable snapshot. The engine (see [`crate::engine`])
//! never mutates one in place; every transition returns a fresh value, so a
//! caller can keep the whole sequence for history or undo.

use crate::actions::{GameAction, Move};
use crate::board::{Board, Symbol, WinningLine};
use crate::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of the only game kind this crate implements
pub const TIC_TAC_TOE: &str = "tic-tac-toe";

/// Errors returned by the engine and the AI
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Invalid game state: {0}")]
    InvalidGameState(String),

    #[error("Not your turn")]
    NotYourTurn,

    #[error("Invalid move: {0}")]
    InvalidMove(String),

    #[error("Game is over")]
    GameOver,

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("AI error: {0}")]
    AiError(String),
}

/// Result of validating a move. `Ok(())` means the move may be applied.
pub type ValidationOutcome = Result<(), GameError>;

/// Settings supplied when a game is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    /// Declared game kind; must match the engine it is given to
    pub game_type: String,
    /// Overrides every AI seat's default time budget
    pub ai_time_limit_ms: Option<u64>,
}

impl GameSettings {
    pub fn tic_tac_toe() -> Self {
        Self {
            game_type: TIC_TAC_TOE.to_string(),
            ai_time_limit_ms: None,
        }
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::tic_tac_toe()
    }
}

/// Board and result data for tic-tac-toe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToeMeta {
    pub board: Board,
    pub winner: Option<Symbol>,
    pub winning_line: Option<WinningLine>,
    pub is_draw: bool,
}

impl TicTacToeMeta {
    /// Metadata derived from a board
    pub fn from_board(board: Board) -> Self {
        let win = board.check_win();
        Self {
            board,
            winner: win.map(|(s, _)| s),
            winning_line: win.map(|(_, l)| l),
            is_draw: win.is_none() && board.is_full(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.winner.is_some() || self.is_draw
    }
}

/// Game-specific payload, tagged by game kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game")]
pub enum GameMetadata {
    #[serde(rename = "tic-tac-toe")]
    TicTacToe(TicTacToeMeta),
}

impl GameMetadata {
    pub fn game_type(&self) -> &'static str {
        match self {
            GameMetadata::TicTacToe(_) => TIC_TAC_TOE,
        }
    }
}

/// An immutable game snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Game identifier
    pub id: String,
    /// Seat 0 plays `X`, seat 1 plays `O`
    pub players: [Player; 2],
    /// Seat index of the player to move
    pub current_player: usize,
    /// Turn number (starts at 1)
    pub turn_number: u32,
    /// Moves applied so far, oldest first
    pub moves: Vec<Move>,
    /// Board and result
    pub metadata: GameMetadata,
}

impl GameState {
    pub fn meta(&self) -> &TicTacToeMeta {
        match &self.metadata {
            GameMetadata::TicTacToe(meta) => meta,
        }
    }

    pub fn board(&self) -> &Board {
        &self.meta().board
    }

    /// Winning symbol, if the game has been won
    pub fn winner(&self) -> Option<Symbol> {
        self.meta().winner
    }

    /// Winning player, if the game has been won
    pub fn winner_player(&self) -> Option<&Player> {
        self.winner().map(|s| &self.players[s.seat()])
    }

    pub fn is_finished(&self) -> bool {
        self.meta().is_terminal()
    }

    /// The player whose turn it is
    pub fn current(&self) -> &Player {
        &self.players[self.current_player]
    }

    /// Symbol of the player to move
    pub fn current_symbol(&self) -> Symbol {
        Symbol::for_seat(self.current_player)
    }

    /// Seat index of a player
    pub fn seat_of(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    pub fn get_player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// Symbol assigned to a player
    pub fn symbol_of(&self, player_id: &str) -> Option<Symbol> {
        self.seat_of(player_id).map(Symbol::for_seat)
    }

    /// Check the structural invariants a snapshot must satisfy.
    ///
    /// Used when a snapshot arrives from outside (deserialization); snapshots
    /// produced by the engine always pass.
    pub fn check_consistency(&self) -> Result<(), GameError> {
        let invalid = |msg: &str| Err(GameError::InvalidGameState(msg.to_string()));

        if self.players[0].id == self.players[1].id {
            return invalid("duplicate player ids");
        }
        if self.current_player > 1 {
            return invalid("to-move index out of range");
        }
        if self.turn_number as usize != self.moves.len() + 1 {
            return invalid("turn counter does not match move history");
        }

        let meta = self.meta();
        let board = meta.board;
        let xs = board.count(Symbol::X);
        let os = board.count(Symbol::O);
        if xs < os || xs > os + 1 {
            return invalid("symbol counts are not reachable");
        }
        self.replay_history(&board)?;
        if board.has_line(Symbol::X) && board.has_line(Symbol::O) {
            return invalid("both symbols own a line");
        }

        let expected = TicTacToeMeta::from_board(board);
        if meta.winner != expected.winner
            || meta.winning_line != expected.winning_line
            || meta.is_draw != expected.is_draw
        {
            return invalid("result metadata does not match board");
        }
        if let Some(line) = &meta.winning_line {
            if !line.is_valid() {
                return invalid("winning line is not a board line");
            }
        }

        if !meta.is_terminal() {
            let to_move = if xs == os { 0 } else { 1 };
            if self.current_player != to_move {
                return invalid("to-move index does not match board");
            }
        }

        Ok(())
    }

    /// Replay `moves` from an empty board and check they produce `board`.
    ///
    /// Every move must be a placement by the seat on turn, with that seat's
    /// symbol, on an empty in-bounds cell, and nothing may follow a win.
    fn replay_history(&self, board: &Board) -> Result<(), GameError> {
        let mut replayed = Board::new();
        for (turn, mv) in self.moves.iter().enumerate() {
            let bad = |msg: &str| {
                Err(GameError::InvalidGameState(format!(
                    "move {} in history: {}",
                    turn + 1,
                    msg
                )))
            };

            let GameAction::Place { position, symbol } = mv.action else {
                return bad("not a placement");
            };
            let seat = turn % 2;
            if mv.player_id != self.players[seat].id {
                return bad("played out of turn");
            }
            if symbol != Symbol::for_seat(seat) {
                return bad("wrong symbol");
            }
            if replayed.check_win().is_some() {
                return bad("played after the game was won");
            }
            if !replayed.is_empty_at(position) {
                return bad("cell is off the board or taken");
            }
            replayed.set(position, Some(symbol));
        }

        if &replayed != board {
            return Err(GameError::InvalidGameState(
                "move history does not match board".into(),
            ));
        }
        Ok(())
    }
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Victory,
    Draw,
}

/// One player's line on the scoreboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub player_id: PlayerId,
    pub score: u32,
    pub rank: u32,
}

/// Per-player scores in seat order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub standings: Vec<Standing>,
}

impl Scoreboard {
    pub fn standing(&self, player_id: &str) -> Option<&Standing> {
        self.standings.iter().find(|s| s.player_id == player_id)
    }
}

/// Descriptor of a finished game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub winner: Option<PlayerId>,
    pub reason: EndReason,
    pub scores: Scoreboard,
}
