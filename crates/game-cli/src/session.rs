use grid_engine::engine::{Grid, Move};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Where a game stands. `Won` and `Lost` are terminal: direction inputs
/// are ignored until an explicit reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Won,
    Lost,
}

/// One game from reset to terminal state.
///
/// Owns the grid, the score accumulator, the phase and the RNG that feeds
/// tile spawning. Inputs are processed one-to-completion: move resolution,
/// then the spawn, then the terminal checks, before the next input is
/// looked at.
pub struct GameSession {
    size: usize,
    grid: Grid,
    score: u64,
    phase: Phase,
    rng: StdRng,
}

impl GameSession {
    /// Start a game on an n-by-n board, seeded for reproducible runs.
    pub fn new(size: usize, seed: u64) -> Self {
        let mut session = Self {
            size,
            grid: Grid::empty(size),
            score: 0,
            phase: Phase::Playing,
            rng: StdRng::seed_from_u64(seed),
        };
        session.seed_tiles();
        session
    }

    /// Start a game with an entropy-seeded RNG.
    pub fn from_entropy(size: usize) -> Self {
        let mut session = Self {
            size,
            grid: Grid::empty(size),
            score: 0,
            phase: Phase::Playing,
            rng: StdRng::from_entropy(),
        };
        session.seed_tiles();
        session
    }

    // A fresh board always starts with exactly two random tiles.
    fn seed_tiles(&mut self) {
        self.grid.add_random_tile(&mut self.rng);
        self.grid.add_random_tile(&mut self.rng);
    }

    /// Abandon the current game and start over on an n-by-n board.
    /// Changing size mid-game goes through here.
    pub fn reset(&mut self, size: usize) {
        self.size = size;
        self.grid = Grid::empty(size);
        self.score = 0;
        self.phase = Phase::Playing;
        self.seed_tiles();
    }

    /// Apply one directional input.
    ///
    /// Returns false when the input had no effect: the game is already
    /// over, or the move changed nothing (in which case no tile spawns,
    /// no score is credited and no terminal check runs). On a real move
    /// the gained points are credited, one random tile spawns, and the
    /// phase advances to `Won` or `Lost` if a terminal condition holds.
    pub fn apply(&mut self, dir: Move) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let outcome = self.grid.shift(dir);
        if !outcome.moved {
            return false;
        }
        self.score += outcome.gained;
        self.grid = outcome.grid;
        self.grid.add_random_tile(&mut self.rng);

        if self.grid.has_winning_tile() {
            self.phase = Phase::Won;
        } else if !self.grid.can_move() {
            self.phase = Phase::Lost;
        }
        true
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// True once the game reached a terminal state.
    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase != Phase::Playing
    }
}
