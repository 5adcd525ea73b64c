//! game-cli: the orchestration layer around `grid-engine`.
//!
//! The engine is a pure function library; everything stateful lives here.
//! [`session::GameSession`] owns the grid, the score accumulator and the
//! game phase, and serializes directional inputs one-to-completion. The
//! `play` binary wraps a session in an interactive stdin loop; the
//! `rollout` binary plays many random-policy sessions in parallel.

pub mod config;
pub mod session;
