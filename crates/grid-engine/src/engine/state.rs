use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ops;

/// A tile of exactly this value wins the game. Fixed, not configurable.
pub const WINNING_TILE: u32 = 2048;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All four directions, in a fixed order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];
}

/// Result of resolving one directional move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The grid after compaction and merging.
    pub grid: Grid,
    /// Whether any line changed under the move.
    pub moved: bool,
    /// Points gained from merges: each merge of two `v` tiles credits `2v`.
    pub gained: u64,
}

/// Square 2048 board of side `n`, cells stored row-major.
///
/// A cell holds 0 (empty) or a power of two >= 2. Public methods mirror the
/// free functions in the engine module; move resolution never mutates the
/// grid it is given, while tile spawning mutates in place (the caller has
/// already taken ownership of the post-move grid at that point).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    pub(crate) size: usize,
    pub(crate) cells: Vec<u32>,
}

impl Grid {
    /// Create an n-by-n grid with every cell empty.
    ///
    /// ```
    /// use grid_engine::engine::Grid;
    /// let g = Grid::empty(5);
    /// assert_eq!(g.count_empty(), 25);
    /// ```
    pub fn empty(size: usize) -> Self {
        Grid {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build a grid from explicit rows. Rows must form a square.
    ///
    /// ```
    /// use grid_engine::engine::Grid;
    /// let g = Grid::from_rows([[2u32, 0], [0, 4]]);
    /// assert_eq!(g.get(1, 1), 4);
    /// ```
    pub fn from_rows<I, R>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = u32>,
    {
        let mut size = 0;
        let mut cells = Vec::new();
        for row in rows {
            cells.extend(row);
            size += 1;
        }
        assert_eq!(cells.len(), size * size, "rows must form a square grid");
        Grid { size, cells }
    }

    /// Side length of the board.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell value at (row, col); 0 means empty.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.size + col]
    }

    /// Overwrite the cell at (row, col).
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u32) {
        self.cells[row * self.size + col] = value;
    }

    /// All cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Iterate over the rows of the board.
    #[inline]
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.cells.chunks(self.size)
    }

    /// Count the number of empty cells.
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    /// The highest tile value present (0 on an empty board).
    pub fn highest_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Resolve a move in `dir` without touching `self`.
    ///
    /// ```
    /// use grid_engine::engine::{Grid, Move};
    /// let g = Grid::from_rows([[2u32, 2], [0, 0]]);
    /// let out = g.shift(Move::Left);
    /// assert_eq!(out.grid.get(0, 0), 4);
    /// assert_eq!(out.gained, 4);
    /// ```
    #[inline]
    pub fn shift(&self, dir: Move) -> MoveOutcome {
        ops::shift(self, dir)
    }

    /// Place a random 2 (90%) or 4 (10%) on a uniformly chosen empty cell,
    /// using the provided RNG. Mutates in place; returns false (and leaves
    /// the grid untouched) when no cell is empty.
    ///
    /// Deterministic example with a seeded RNG:
    /// ```
    /// use grid_engine::engine::Grid;
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let mut g = Grid::empty(4);
    /// g.add_random_tile(&mut rng);
    /// g.add_random_tile(&mut rng);
    /// assert_eq!(g.count_empty(), 14);
    /// ```
    #[inline]
    pub fn add_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        ops::add_random_tile(self, rng)
    }

    /// Convenience: like `add_random_tile` but uses thread-local RNG.
    #[inline]
    pub fn add_random_tile_thread(&mut self) -> bool {
        let mut rng = rand::thread_rng();
        self.add_random_tile(&mut rng)
    }

    /// True if any cell holds exactly [`WINNING_TILE`].
    #[inline]
    pub fn has_winning_tile(&self) -> bool {
        ops::has_winning_tile(self)
    }

    /// True if at least one move in some direction is still possible.
    #[inline]
    pub fn can_move(&self) -> bool {
        ops::can_move(self)
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({}x{}, {:?})", self.size, self.size, self.cells)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(8 * self.size);
        writeln!(f)?;
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f, "{}", rule)?;
            }
            let line: Vec<String> = row.iter().map(|&v| ops::format_val(v)).collect();
            writeln!(f, "{}", line.join("|"))?;
        }
        Ok(())
    }
}
