//! Concurrent bot-vs-bot matches.
//!
//! Every game runs in its own task with its own session and bots, so no
//! search cache is ever shared. Searches run on the blocking pool so the
//! async side stays responsive while a bot thinks.

use crate::report::{ArenaReport, GameResult, SessionInfo, SessionStatus};
use crate::session::{GameSession, Seat};
use dashmap::DashMap;
use std::sync::Arc;
use tictactoe_core::{BotDifficulty, GameSettings, Player};
use tokio::task::JoinSet;
use tracing::{debug, error, info};
use uuid::Uuid;

/// What to play
#[derive(Debug, Clone)]
pub struct ArenaConfig {
    pub x_tier: BotDifficulty,
    pub o_tier: BotDifficulty,
    pub games: usize,
    /// Base seed; game `i` seeds its bots from `seed + 2i` and `seed + 2i + 1`
    pub seed: Option<u64>,
    pub time_limit_ms: Option<u64>,
}

/// Arena state shared across all game tasks.
pub struct ArenaState {
    /// Live view of every session
    pub sessions: DashMap<Uuid, SessionInfo>,
}

impl ArenaState {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Sessions still being played.
    pub fn in_progress(&self) -> Vec<SessionInfo> {
        self.sessions
            .iter()
            .filter(|s| s.status == SessionStatus::InProgress)
            .map(|s| s.value().clone())
            .collect()
    }

    fn update(&self, session: &GameSession) {
        self.sessions.insert(session.id, session.to_info());
    }
}

impl Default for ArenaState {
    fn default() -> Self {
        Self::new()
    }
}

fn build_session(config: &ArenaConfig, index: usize) -> anyhow::Result<GameSession> {
    let seed = |offset: u64| config.seed.map(|s| s.wrapping_add(2 * index as u64 + offset));
    let settings = GameSettings {
        ai_time_limit_ms: config.time_limit_ms,
        ..GameSettings::tic_tac_toe()
    };
    let seats = [
        Seat::new(
            Player::ai(format!("x-{}", index), format!("Tier {} (X)", config.x_tier.level()), config.x_tier),
            seed(0),
        ),
        Seat::new(
            Player::ai(format!("o-{}", index), format!("Tier {} (O)", config.o_tier.level()), config.o_tier),
            seed(1),
        ),
    ];
    Ok(GameSession::new(settings, seats)?)
}

/// Play one session to the end, one blocking search per move.
async fn play_session(
    mut session: GameSession,
    state: Arc<ArenaState>,
) -> anyhow::Result<GameResult> {
    state.update(&session);

    while !session.current().is_finished() {
        let (returned, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = session.play_ai_turn();
            (session, outcome)
        })
        .await?;
        session = returned;

        let mv = outcome?;
        debug!(session = %session.id, player = %mv.player_id, position = ?mv.position(), "move played");
        state.update(&session);
    }

    Ok(session.result())
}

/// Run every game concurrently and collect the report.
pub async fn run_arena(config: ArenaConfig, state: Arc<ArenaState>) -> anyhow::Result<ArenaReport> {
    info!(
        x_tier = config.x_tier.level(),
        o_tier = config.o_tier.level(),
        games = config.games,
        "starting arena"
    );

    let mut tasks = JoinSet::new();
    for index in 0..config.games {
        let session = build_session(&config, index)?;
        let state = Arc::clone(&state);
        tasks.spawn(play_session(session, state));
    }

    let mut results = Vec::with_capacity(config.games);
    while let Some(joined) = tasks.join_next().await {
        match joined? {
            Ok(result) => results.push(result),
            Err(e) => {
                error!("Game failed: {}", e);
                return Err(e);
            }
        }
    }

    let report = ArenaReport::from_results(config.x_tier.level(), config.o_tier.level(), results);
    info!(
        x_wins = report.x_wins,
        o_wins = report.o_wins,
        draws = report.draws,
        "arena finished"
    );
    Ok(report)
}
