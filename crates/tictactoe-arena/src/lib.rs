//! Caller-side tooling around the tic-tac-toe engine.
//!
//! - [`session`]: a game plus its snapshot history, seats and bots
//! - [`arena`]: many sessions played concurrently
//! - [`report`]: serializable summaries

pub mod arena;
pub mod report;
pub mod session;
