//! Engine for quadoku: square grid puzzles with a certified unique solution.
//!
//! A board is an `N x N` grid, `N` any perfect square up to
//! [`MAX_DIMENSION`], where every row, column, and `sqrt(N) x sqrt(N)` region
//! must contain each value in `1..=N` exactly once. [`Generator`] assigns
//! random givens with backtracking until the arc-consistency checker
//! ([`solvability`]) certifies that exactly one completion exists; the
//! certified [`Solution`] then backs a [`Puzzle`], which checks player
//! placements against the key, reveals hints, and tracks misses.
//!
//! ```
//! use quadoku_core::Puzzle;
//!
//! let mut puzzle = Puzzle::with_seed(42, 4, 10, 10).expect("generation succeeds");
//! let pos = puzzle.grid().first_empty().expect("an empty cell");
//! let value = puzzle.solution().value(pos);
//! assert!(puzzle.attempt_placement(pos, value));
//! ```

mod candidates;
mod generator;
mod grid;
mod puzzle;
mod solver;

pub use candidates::{ValueSet, ValueSetIter};
pub use generator::{GenerateError, GeneratedPuzzle, Generator};
pub use grid::{Grid, Position, Solution, DEFAULT_DIMENSION, MAX_DIMENSION};
pub use puzzle::{Puzzle, SaveState};
pub use solver::{solvability, Solvability};
