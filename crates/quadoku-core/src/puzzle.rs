use serde::{Deserialize, Serialize};

use crate::generator::{GenerateError, Generator};
use crate::grid::{is_valid_dimension, Grid, Position, Solution};

/// Authoritative state for a fill-in game: the visible grid, the certified
/// answer key, and miss/hint accounting.
///
/// The grid starts out holding only the generated givens; correct placements
/// and hints fill it in. Every mutation re-checks the goal so [`is_solved`]
/// stays current.
///
/// [`is_solved`]: Puzzle::is_solved
#[derive(Debug, Clone)]
pub struct Puzzle {
    grid: Grid,
    solution: Solution,
    max_misses: u32,
    max_hints: u32,
    misses: u32,
    hints: u32,
    solved: bool,
}

impl Puzzle {
    /// Generates a fresh puzzle. Non-perfect-square dimensions fall back
    /// to 9.
    ///
    /// Fails only if the backtracking search exhausts itself, which no valid
    /// dimension is expected to trigger; an invalid board is never returned.
    pub fn new(dimension: usize, max_misses: u32, max_hints: u32) -> Result<Self, GenerateError> {
        Self::from_generator(&mut Generator::new(), dimension, max_misses, max_hints)
    }

    /// Like [`Puzzle::new`] with a fixed seed, for reproducible boards.
    pub fn with_seed(
        seed: u64,
        dimension: usize,
        max_misses: u32,
        max_hints: u32,
    ) -> Result<Self, GenerateError> {
        Self::from_generator(&mut Generator::with_seed(seed), dimension, max_misses, max_hints)
    }

    /// Generates a puzzle from a caller-managed generator.
    pub fn from_generator(
        generator: &mut Generator,
        dimension: usize,
        max_misses: u32,
        max_hints: u32,
    ) -> Result<Self, GenerateError> {
        let generated = generator.generate(dimension)?;
        let mut puzzle = Self {
            grid: generated.givens,
            solution: generated.solution,
            max_misses,
            max_hints,
            misses: 0,
            hints: 0,
            solved: false,
        };
        // A degenerate board can be fully given from the start.
        puzzle.solved = puzzle.goal_reached();
        Ok(puzzle)
    }

    pub fn dimension(&self) -> usize {
        self.grid.dimension()
    }

    pub fn region_size(&self) -> usize {
        self.grid.region_size()
    }

    /// The visible value at `pos`, if any.
    pub fn value(&self, pos: Position) -> Option<u8> {
        self.grid.get(pos)
    }

    /// Read-only view of the visible grid, for rendering.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn hints(&self) -> u32 {
        self.hints
    }

    pub fn max_misses(&self) -> u32 {
        self.max_misses
    }

    pub fn max_hints(&self) -> u32 {
        self.max_hints
    }

    pub fn misses_remaining(&self) -> u32 {
        self.max_misses.saturating_sub(self.misses)
    }

    pub fn hints_remaining(&self) -> u32 {
        self.max_hints.saturating_sub(self.hints)
    }

    /// Attempts to place `value` at `pos`.
    ///
    /// Fills the cell and returns true iff the cell is empty and the value
    /// matches the answer key. A wrong value on an empty cell counts a miss;
    /// an already-filled target returns false without touching anything.
    pub fn attempt_placement(&mut self, pos: Position, value: u8) -> bool {
        if self.grid.get(pos).is_some() {
            return false;
        }
        if self.solution.value(pos) == value {
            self.grid.set(pos, Some(value));
            self.solved = self.goal_reached();
            return true;
        }
        self.misses += 1;
        false
    }

    /// Fills the first empty cell in row-major order from the answer key and
    /// counts a hint. Returns false when no empty cell remains.
    pub fn reveal_hint(&mut self) -> bool {
        let Some(pos) = self.grid.first_empty() else {
            return false;
        };
        let value = self.solution.value(pos);
        self.grid.set(pos, Some(value));
        self.hints += 1;
        self.solved = self.goal_reached();
        true
    }

    /// True once every cell's visible value equals the answer key.
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    fn goal_reached(&self) -> bool {
        self.grid
            .positions()
            .all(|pos| self.grid.get(pos) == Some(self.solution.value(pos)))
    }

    /// Snapshot of the full play state, for persistence by the caller.
    pub fn save_state(&self) -> SaveState {
        SaveState {
            dimension: self.dimension(),
            visible: self.grid.values().to_vec(),
            solution: self.solution.values().to_vec(),
            max_misses: self.max_misses,
            max_hints: self.max_hints,
            misses: self.misses,
            hints: self.hints,
        }
    }

    /// Rebuilds a puzzle from a snapshot, rejecting inconsistent state.
    pub fn restore(state: SaveState) -> Option<Self> {
        let n = state.dimension;
        if !is_valid_dimension(n) {
            return None;
        }
        if state.visible.len() != n * n || state.solution.len() != n * n {
            return None;
        }
        if !state
            .solution
            .iter()
            .all(|&value| (1..=n).contains(&usize::from(value)))
        {
            return None;
        }
        let mut grid = Grid::new(n);
        for (i, value) in state.visible.iter().enumerate() {
            grid.set(Position::new(i / n, i % n), *value);
        }
        let mut puzzle = Self {
            grid,
            solution: Solution::new(n, state.solution),
            max_misses: state.max_misses,
            max_hints: state.max_hints,
            misses: state.misses,
            hints: state.hints,
            solved: false,
        };
        puzzle.solved = puzzle.goal_reached();
        Some(puzzle)
    }
}

/// Serializable snapshot of a game in progress. The on-disk format and
/// location are the presentation layer's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveState {
    dimension: usize,
    visible: Vec<Option<u8>>,
    solution: Vec<u8>,
    max_misses: u32,
    max_hints: u32,
    misses: u32,
    hints: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Puzzle {
        Puzzle::with_seed(42, 4, 3, 2).expect("4x4 generation succeeds")
    }

    #[test]
    fn test_correct_placement_fills_cell() {
        let mut puzzle = fixture();
        let pos = puzzle.grid().first_empty().expect("an empty cell");
        let value = puzzle.solution().value(pos);
        assert!(puzzle.attempt_placement(pos, value));
        assert_eq!(puzzle.value(pos), Some(value));
        assert_eq!(puzzle.misses(), 0);
    }

    #[test]
    fn test_wrong_placement_counts_miss() {
        let mut puzzle = fixture();
        let pos = puzzle.grid().first_empty().expect("an empty cell");
        let value = puzzle.solution().value(pos);
        let wrong = if value == 1 { 2 } else { 1 };
        assert!(!puzzle.attempt_placement(pos, wrong));
        assert_eq!(puzzle.value(pos), None);
        assert_eq!(puzzle.misses(), 1);
        assert_eq!(puzzle.misses_remaining(), 2);
    }

    #[test]
    fn test_filled_cell_never_counts_miss() {
        let mut puzzle = fixture();
        let pos = puzzle.grid().first_empty().expect("an empty cell");
        let value = puzzle.solution().value(pos);
        assert!(puzzle.attempt_placement(pos, value));

        let misses = puzzle.misses();
        let hints = puzzle.hints();
        assert!(!puzzle.attempt_placement(pos, value));
        let wrong = if value == 1 { 2 } else { 1 };
        assert!(!puzzle.attempt_placement(pos, wrong));
        assert_eq!(puzzle.misses(), misses);
        assert_eq!(puzzle.hints(), hints);
        assert_eq!(puzzle.value(pos), Some(value));
    }

    #[test]
    fn test_hints_fill_the_board() {
        let mut puzzle = fixture();
        let n = puzzle.dimension();
        let mut revealed = 0;
        for _ in 0..n * n {
            if puzzle.reveal_hint() {
                revealed += 1;
            }
        }
        assert!(puzzle.is_solved());
        assert_eq!(puzzle.hints(), revealed);
        assert!(!puzzle.reveal_hint());
    }

    #[test]
    fn test_misses_remaining_saturates() {
        let mut puzzle = Puzzle::with_seed(42, 4, 1, 2).expect("4x4 generation succeeds");
        let pos = puzzle.grid().first_empty().expect("an empty cell");
        let value = puzzle.solution().value(pos);
        let wrong = if value == 1 { 2 } else { 1 };
        assert!(!puzzle.attempt_placement(pos, wrong));
        assert!(!puzzle.attempt_placement(pos, wrong));
        assert_eq!(puzzle.misses(), 2);
        assert_eq!(puzzle.misses_remaining(), 0);
    }

    #[test]
    fn test_degenerate_board_starts_solved() {
        let puzzle = Puzzle::with_seed(0, 1, 10, 10).expect("1x1 generation succeeds");
        assert!(puzzle.is_solved());
        assert_eq!(puzzle.value(Position::new(0, 0)), Some(1));
    }

    #[test]
    fn test_dimension_fallback() {
        let puzzle = Puzzle::with_seed(3, 10, 5, 5).expect("fallback generation succeeds");
        assert_eq!(puzzle.dimension(), 9);
        assert_eq!(puzzle.region_size(), 3);
    }

    #[test]
    fn test_save_state_round_trips() {
        let mut puzzle = fixture();
        let pos = puzzle.grid().first_empty().expect("an empty cell");
        let value = puzzle.solution().value(pos);
        let wrong = if value == 1 { 2 } else { 1 };
        puzzle.attempt_placement(pos, wrong);
        puzzle.attempt_placement(pos, value);
        puzzle.reveal_hint();

        let json = serde_json::to_string(&puzzle.save_state()).expect("serializes");
        let state: SaveState = serde_json::from_str(&json).expect("deserializes");
        let restored = Puzzle::restore(state).expect("restores");

        assert_eq!(restored.dimension(), puzzle.dimension());
        assert_eq!(restored.misses(), puzzle.misses());
        assert_eq!(restored.hints(), puzzle.hints());
        assert_eq!(restored.is_solved(), puzzle.is_solved());
        assert_eq!(restored.solution(), puzzle.solution());
        for check in puzzle.grid().positions() {
            assert_eq!(restored.value(check), puzzle.value(check));
        }
    }

    #[test]
    fn test_restore_rejects_inconsistent_state() {
        let puzzle = fixture();
        let mut state = puzzle.save_state();
        state.dimension = 5;
        assert!(Puzzle::restore(state).is_none());

        let mut state = puzzle.save_state();
        state.solution.pop();
        assert!(Puzzle::restore(state).is_none());

        let mut state = puzzle.save_state();
        state.solution[0] = 9;
        assert!(Puzzle::restore(state).is_none());
    }
}
