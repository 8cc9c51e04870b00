//! Memoization cache for the alpha-beta search.
//!
//! Entries are keyed by the board's content hash together with the search
//! context (remaining depth, side to move, maximizing symbol). When the
//! table grows past its capacity it is cleared outright rather than
//! evicting individual entries.

use crate::board::Symbol;
use std::collections::HashMap;
use tracing::debug;

/// Default number of entries before the cache is cleared
pub const CACHE_CAPACITY: usize = 10_000;

/// Search context a score was computed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub board_hash: u32,
    pub depth: u8,
    pub maximizing: bool,
    pub perspective: Symbol,
}

/// How a stored score relates to the true minimax value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The search completed inside the window
    Exact,
    /// A beta cutoff happened: true value >= score
    Lower,
    /// Every move failed low: true value <= score
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    pub score: i32,
    pub bound: Bound,
    /// Best cell index found at this node
    pub best_move: Option<usize>,
    /// Nodes visited below this entry
    pub nodes: u64,
}

/// Per-bot memoization table. Not shared between bots.
#[derive(Debug)]
pub struct SearchCache {
    entries: HashMap<CacheKey, CacheEntry>,
    capacity: usize,
    clears: u64,
}

impl SearchCache {
    pub fn new() -> Self {
        Self::with_capacity(CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            clears: 0,
        }
    }

    /// Look up a score usable inside the `(alpha, beta)` window.
    ///
    /// Bound entries only answer when they already prove a cutoff.
    pub fn probe(&self, key: &CacheKey, alpha: i32, beta: i32) -> Option<&CacheEntry> {
        let entry = self.entries.get(key)?;
        let usable = match entry.bound {
            Bound::Exact => true,
            Bound::Lower => entry.score >= beta,
            Bound::Upper => entry.score <= alpha,
        };
        usable.then_some(entry)
    }

    /// Best move recorded for a key, regardless of bound
    pub fn best_move(&self, key: &CacheKey) -> Option<usize> {
        self.entries.get(key).and_then(|e| e.best_move)
    }

    pub fn store(&mut self, key: CacheKey, entry: CacheEntry) {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            debug!(entries = self.entries.len(), "search cache full, clearing");
            self.entries.clear();
            self.clears += 1;
        }
        self.entries.insert(key, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many times the table has been wiped for exceeding capacity
    pub fn clears(&self) -> u64 {
        self.clears
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(hash: u32) -> CacheKey {
        CacheKey {
            board_hash: hash,
            depth: 3,
            maximizing: true,
            perspective: Symbol::X,
        }
    }

    fn entry(score: i32, bound: Bound) -> CacheEntry {
        CacheEntry {
            score,
            bound,
            best_move: Some(4),
            nodes: 10,
        }
    }

    #[test]
    fn test_exact_entry_always_usable() {
        let mut cache = SearchCache::new();
        cache.store(key(1), entry(5, Bound::Exact));
        assert_eq!(cache.probe(&key(1), -100, 100).map(|e| e.score), Some(5));
        assert!(cache.probe(&key(2), -100, 100).is_none());
    }

    #[test]
    fn test_bound_entries_need_cutoff() {
        let mut cache = SearchCache::new();
        cache.store(key(1), entry(50, Bound::Lower));
        assert!(cache.probe(&key(1), -100, 100).is_none());
        assert!(cache.probe(&key(1), 0, 40).is_some());

        cache.store(key(2), entry(-50, Bound::Upper));
        assert!(cache.probe(&key(2), -100, 100).is_none());
        assert!(cache.probe(&key(2), -40, 100).is_some());
        assert_eq!(cache.best_move(&key(2)), Some(4));
    }

    #[test]
    fn test_context_is_part_of_key() {
        let mut cache = SearchCache::new();
        cache.store(key(1), entry(5, Bound::Exact));
        let other_side = CacheKey {
            perspective: Symbol::O,
            ..key(1)
        };
        assert!(cache.probe(&other_side, -100, 100).is_none());
    }

    #[test]
    fn test_clears_when_full() {
        let mut cache = SearchCache::with_capacity(3);
        for hash in 0..3 {
            cache.store(key(hash), entry(0, Bound::Exact));
        }
        assert_eq!(cache.len(), 3);
        // Overwriting an existing key does not trigger a clear
        cache.store(key(0), entry(1, Bound::Exact));
        assert_eq!(cache.len(), 3);

        cache.store(key(3), entry(0, Bound::Exact));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.clears(), 1);
        assert!(cache.probe(&key(0), -100, 100).is_none());
    }
}
