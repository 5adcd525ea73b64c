//! grid-engine: the grid-transformation core of a variable-size 2048 game.
//!
//! This crate provides:
//! - A square [`engine::Grid`] of side 3..=9 (the engine itself enforces no
//!   upper bound) with ergonomic methods (`shift`, `add_random_tile`, ...)
//! - Pure move resolution returning an [`engine::MoveOutcome`] with the
//!   post-move grid, a `moved` flag and the points gained from merges
//! - Win and move-availability predicates for terminal-state detection
//!
//! Quick start:
//! ```
//! use grid_engine::engine::{Grid, Move};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic board initialization with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut grid = Grid::empty(4);
//! grid.add_random_tile(&mut rng);
//! grid.add_random_tile(&mut rng);
//!
//! let outcome = grid.shift(Move::Left);
//! assert_eq!(outcome.grid.size(), 4);
//! ```
//!
//! Note: for convenience, there are also free functions mirroring the `Grid`
//! methods (e.g., `engine::shift`, `engine::add_random_tile`). The engine is
//! a pure function library: the caller owns the grid and the score, and is
//! expected to serialize move resolution, tile spawning and terminal checks.

pub mod engine;
