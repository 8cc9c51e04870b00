//! Depth-bounded minimax with alpha-beta pruning.
//!
//! Scores are from the maximizing symbol's point of view. A win scores
//! `WIN_BASE + remaining_depth` so faster wins rank higher; a loss scores
//! `LOSS_BASE - remaining_depth` so later losses rank higher. At depth 0 the
//! static evaluator takes over.
//!
//! The search checks the clock on every node and every candidate. Once the
//! budget runs out it unwinds without storing anything, and the root keeps
//! only the candidates that were searched to completion.

use super::cache::{Bound, CacheEntry, CacheKey, SearchCache};
use crate::board::{Board, Symbol};
use crate::eval::evaluate_board;
use std::time::{Duration, Instant};

/// Base score of a won position
pub const WIN_BASE: i32 = 1000;

/// Base score of a lost position
pub const LOSS_BASE: i32 = -1000;

const INFINITY: i32 = 1_000_000;

/// Center, corners, edges
const MOVE_ORDER: [usize; 9] = [4, 0, 2, 6, 8, 1, 3, 5, 7];

/// Counters for one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cache_hits: u64,
    pub elapsed: Duration,
    /// Root candidates searched to completion
    pub completed_candidates: usize,
    /// The time budget ran out before the search finished
    pub timed_out: bool,
}

/// Outcome of a root search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Best cell index, `None` if no candidate finished in time
    pub best_move: Option<usize>,
    pub score: i32,
    pub stats: SearchStats,
}

/// Empty cells in search order, with a preferred cell (if empty) first
pub fn ordered_moves(board: &Board, preferred: Option<usize>) -> Vec<usize> {
    let mut moves: Vec<usize> = MOVE_ORDER
        .iter()
        .copied()
        .filter(|&i| board.get_index(i).is_none())
        .collect();
    if let Some(p) = preferred {
        if let Some(pos) = moves.iter().position(|&m| m == p) {
            moves.remove(pos);
            moves.insert(0, p);
        }
    }
    moves
}

/// One search run against a bot's cache
pub struct Searcher<'a> {
    cache: &'a mut SearchCache,
    perspective: Symbol,
    start: Instant,
    deadline: Instant,
    node_limit: Option<u64>,
    stats: SearchStats,
}

impl<'a> Searcher<'a> {
    pub fn new(cache: &'a mut SearchCache, perspective: Symbol, budget: Duration) -> Self {
        let start = Instant::now();
        Self {
            cache,
            perspective,
            start,
            deadline: start + budget,
            node_limit: None,
            stats: SearchStats::default(),
        }
    }

    /// Treat the budget as spent once `limit` nodes have been visited.
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    fn check_time(&mut self) -> bool {
        if !self.stats.timed_out {
            let out_of_nodes = self.node_limit.is_some_and(|limit| self.stats.nodes >= limit);
            if out_of_nodes || Instant::now() >= self.deadline {
                self.stats.timed_out = true;
            }
        }
        self.stats.timed_out
    }

    /// Search every move for `perspective` on `board` to `depth` plies.
    pub fn search_root(mut self, board: &Board, depth: u8) -> SearchResult {
        let depth = depth.max(1);
        let mut board = *board;
        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best_move = None;
        let mut best_score = -INFINITY;

        let root_key = self.key(&board, depth, true);
        for cell in ordered_moves(&board, self.cache.best_move(&root_key)) {
            if self.check_time() {
                break;
            }

            board.set_index(cell, Some(self.perspective));
            let score = self.minimax(&mut board, depth - 1, false, alpha, beta);
            board.set_index(cell, None);

            if self.stats.timed_out {
                break;
            }
            self.stats.completed_candidates += 1;

            if score > best_score {
                best_score = score;
                best_move = Some(cell);
            }
            alpha = alpha.max(score);
        }

        if let Some(cell) = best_move {
            if !self.stats.timed_out {
                self.cache.store(
                    root_key,
                    CacheEntry {
                        score: best_score,
                        bound: Bound::Exact,
                        best_move: Some(cell),
                        nodes: self.stats.nodes,
                    },
                );
            }
        }

        self.stats.elapsed = self.start.elapsed();
        SearchResult {
            best_move,
            score: if best_move.is_some() { best_score } else { 0 },
            stats: self.stats,
        }
    }

    fn key(&self, board: &Board, depth: u8, maximizing: bool) -> CacheKey {
        CacheKey {
            board_hash: board.hash(),
            depth,
            maximizing,
            perspective: self.perspective,
        }
    }

    fn minimax(
        &mut self,
        board: &mut Board,
        depth: u8,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.stats.nodes += 1;
        if self.check_time() {
            return 0;
        }

        if let Some((winner, _)) = board.check_win() {
            return if winner == self.perspective {
                WIN_BASE + depth as i32
            } else {
                LOSS_BASE - depth as i32
            };
        }
        if board.is_full() {
            return 0;
        }
        if depth == 0 {
            return evaluate_board(board, self.perspective);
        }

        let key = self.key(board, depth, maximizing);
        if let Some(entry) = self.cache.probe(&key, alpha, beta) {
            self.stats.cache_hits += 1;
            return entry.score;
        }

        let (alpha_orig, beta_orig) = (alpha, beta);
        let nodes_before = self.stats.nodes;
        let mover = if maximizing {
            self.perspective
        } else {
            self.perspective.opponent()
        };
        let mut best = if maximizing { -INFINITY } else { INFINITY };
        let mut best_move = None;

        for cell in ordered_moves(board, self.cache.best_move(&key)) {
            if self.check_time() {
                break;
            }

            board.set_index(cell, Some(mover));
            let score = self.minimax(board, depth - 1, !maximizing, alpha, beta);
            board.set_index(cell, None);

            if self.stats.timed_out {
                break;
            }

            if maximizing {
                if score > best {
                    best = score;
                    best_move = Some(cell);
                }
                alpha = alpha.max(score);
            } else {
                if score < best {
                    best = score;
                    best_move = Some(cell);
                }
                beta = beta.min(score);
            }

            if beta <= alpha {
                break;
            }
        }

        // Partial results are never cached; the root discards them anyway
        if self.stats.timed_out {
            return 0;
        }

        let bound = if best <= alpha_orig {
            Bound::Upper
        } else if best >= beta_orig {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.cache.store(
            key,
            CacheEntry {
                score: best,
                bound,
                best_move,
                nodes: self.stats.nodes - nodes_before,
            },
        );

        best
    }
}
