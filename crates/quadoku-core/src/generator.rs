//! Puzzle generation: constrained random assignment with backtracking,
//! certified unique by the arc-consistency checker.

use std::error::Error;
use std::fmt;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::candidates::ValueSet;
use crate::grid::{Grid, Position, Solution};
use crate::solver::{self, Solvability};

/// Generation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateError {
    /// Backtracking exhausted every assignment without certifying a unique
    /// solution. Not expected for any valid dimension; callers may retry
    /// with fresh randomness.
    SearchExhausted,
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::SearchExhausted => {
                write!(f, "backtracking search exhausted without a unique solution")
            }
        }
    }
}

impl Error for GenerateError {}

/// The output of a successful generation.
#[derive(Debug, Clone)]
pub struct GeneratedPuzzle {
    /// Grid holding only the chosen givens.
    pub givens: Grid,
    /// The unique completion of those givens.
    pub solution: Solution,
}

/// One entry of the assignment history: where a value was placed and which
/// candidates remain untried there. Popping the most recent entry and
/// clearing its cell is the only backtracking operation.
#[derive(Debug)]
struct Placement {
    pos: Position,
    untried: ValueSet,
}

/// Generator phases. Seeding happens once before the loop; certification and
/// the exhausted-search failure exit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Propagate,
    Backtrack,
    AddGiven,
}

/// Backtracking puzzle generator.
pub struct Generator {
    rng: StdRng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// A generator seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// A generator with a fixed seed; generation is fully deterministic for
    /// a given seed and dimension.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates a puzzle with a certified unique solution.
    ///
    /// Invalid dimensions fall back to the default, see [`Grid::new`].
    pub fn generate(&mut self, dimension: usize) -> Result<GeneratedPuzzle, GenerateError> {
        let mut grid = Grid::new(dimension);
        let n = grid.dimension();
        debug!("generating {n}x{n} puzzle");

        let mut history: Vec<Placement> = Vec::new();

        // Seed: a random value in a random cell.
        let start = Position::new(self.rng.gen_range(0..n), self.rng.gen_range(0..n));
        self.place_fresh(&mut grid, &mut history, start);

        let mut phase = Phase::Propagate;
        loop {
            match phase {
                Phase::Propagate => {
                    phase = match solver::solvability(&mut grid) {
                        Solvability::NoSolution => Phase::Backtrack,
                        Solvability::Multiple => Phase::AddGiven,
                        Solvability::Unique(solution) => {
                            debug!("unique solution certified with {} givens", history.len());
                            grid.reset_candidates();
                            return Ok(GeneratedPuzzle {
                                givens: grid,
                                solution,
                            });
                        }
                    };
                }
                Phase::Backtrack => {
                    phase = self.backtrack(&mut grid, &mut history)?;
                }
                Phase::AddGiven => {
                    phase = self.add_given(&mut grid, &mut history);
                }
            }
        }
    }

    /// Assigns an untried value to the most recent placement, unwinding
    /// exhausted placements as needed. An emptied history means the whole
    /// search space is spent.
    fn backtrack(
        &mut self,
        grid: &mut Grid,
        history: &mut Vec<Placement>,
    ) -> Result<Phase, GenerateError> {
        loop {
            match history.last_mut() {
                None => return Err(GenerateError::SearchExhausted),
                Some(top) => {
                    if let Some(value) = top.untried.take_random(&mut self.rng) {
                        grid.set(top.pos, Some(value));
                        return Ok(Phase::Propagate);
                    }
                }
            }
            if let Some(spent) = history.pop() {
                grid.set(spent.pos, None);
                trace!("backtracked to depth {}", history.len());
            }
        }
    }

    /// Pins one more cell to split the remaining solution space. Cells
    /// already locked to a single propagated candidate are forced, so pinning
    /// them cannot cut the completion count; with no eligible cell left this
    /// line of givens is a dead end and the search backtracks.
    fn add_given(&mut self, grid: &mut Grid, history: &mut Vec<Placement>) -> Phase {
        let eligible: Vec<Position> = grid
            .positions()
            .filter(|&pos| {
                grid.get(pos).is_none()
                    && grid.candidates(pos).len() != 1
                    && !grid.usable_values(pos).is_empty()
            })
            .collect();
        match eligible.choose(&mut self.rng) {
            Some(&pos) => {
                self.place_fresh(grid, history, pos);
                Phase::Propagate
            }
            None => Phase::Backtrack,
        }
    }

    /// Places a random usable value at `pos` and records the placement along
    /// with its untried remainder.
    fn place_fresh(&mut self, grid: &mut Grid, history: &mut Vec<Placement>, pos: Position) {
        let mut untried = grid.usable_values(pos);
        let value = untried
            .take_random(&mut self.rng)
            .expect("placement targets always have a usable value");
        grid.set(pos, Some(value));
        trace!(
            "placed {value} at ({}, {}), depth {}",
            pos.row,
            pos.col,
            history.len() + 1
        );
        history.push(Placement { pos, untried });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Asserts that every row, column, and region is a permutation of
    /// `1..=n`.
    fn assert_valid_solution(solution: &Solution) {
        let n = solution.dimension();
        let r = n.isqrt();
        for i in 0..n {
            let mut row = ValueSet::full(n);
            let mut col = ValueSet::full(n);
            let mut region = ValueSet::full(n);
            let top = i / r * r;
            let left = i % r * r;
            for j in 0..n {
                assert!(row.remove(solution.value(Position::new(i, j))));
                assert!(col.remove(solution.value(Position::new(j, i))));
                assert!(region.remove(solution.value(Position::new(top + j / r, left + j % r))));
            }
            assert!(row.is_empty());
            assert!(col.is_empty());
            assert!(region.is_empty());
        }
    }

    /// Exhaustively counts completions of the placed cells, up to `limit`.
    fn count_completions(grid: &mut Grid, limit: usize) -> usize {
        let Some(pos) = grid.first_empty() else {
            return 1;
        };
        let mut total = 0;
        for value in grid.usable_values(pos) {
            grid.set(pos, Some(value));
            total += count_completions(grid, limit - total);
            grid.set(pos, None);
            if total >= limit {
                break;
            }
        }
        total
    }

    fn placements(grid: &Grid) -> Vec<(Position, u8)> {
        grid.positions()
            .filter_map(|pos| grid.get(pos).map(|value| (pos, value)))
            .collect()
    }

    #[test]
    fn test_generate_4x4() {
        let mut generator = Generator::with_seed(42);
        let puzzle = generator.generate(4).expect("4x4 generation succeeds");
        assert_eq!(puzzle.givens.dimension(), 4);
        assert_eq!(puzzle.solution.dimension(), 4);
        assert_valid_solution(&puzzle.solution);
        for (pos, value) in placements(&puzzle.givens) {
            assert_eq!(value, puzzle.solution.value(pos));
        }
    }

    #[test]
    fn test_givens_have_exactly_one_completion() {
        for seed in [0, 1, 2, 3, 4] {
            let mut generator = Generator::with_seed(seed);
            let puzzle = generator.generate(4).expect("4x4 generation succeeds");
            let mut grid = puzzle.givens.clone();
            assert_eq!(count_completions(&mut grid, 3), 1, "seed {seed}");
        }
    }

    #[test]
    fn test_generate_9x9() {
        let mut generator = Generator::with_seed(7);
        let puzzle = generator.generate(9).expect("9x9 generation succeeds");
        assert_eq!(puzzle.solution.dimension(), 9);
        assert_valid_solution(&puzzle.solution);
        let mut grid = puzzle.givens.clone();
        assert_eq!(count_completions(&mut grid, 3), 1);
    }

    #[test]
    fn test_same_seed_reproduces_puzzle() {
        let first = Generator::with_seed(99).generate(4).expect("generation");
        let second = Generator::with_seed(99).generate(4).expect("generation");
        assert_eq!(first.solution, second.solution);
        assert_eq!(placements(&first.givens), placements(&second.givens));
    }

    #[test]
    fn test_first_row_is_permutation() {
        let mut generator = Generator::with_seed(5);
        let puzzle = generator.generate(4).expect("4x4 generation succeeds");
        let mut seen = ValueSet::full(4);
        for col in 0..4 {
            assert!(seen.remove(puzzle.solution.value(Position::new(0, col))));
        }
        assert!(seen.is_empty());
    }

    #[test]
    fn test_degenerate_1x1() {
        let mut generator = Generator::with_seed(0);
        let puzzle = generator.generate(1).expect("1x1 generation succeeds");
        assert_eq!(puzzle.solution.value(Position::new(0, 0)), 1);
        assert!(puzzle.givens.is_full());
    }

    #[test]
    fn test_invalid_dimension_falls_back() {
        let mut generator = Generator::with_seed(11);
        let puzzle = generator.generate(6).expect("fallback generation succeeds");
        assert_eq!(puzzle.givens.dimension(), 9);
        assert_eq!(puzzle.solution.dimension(), 9);
    }
}
