//! Arc-consistency checking over row, column, and region constraints.
//!
//! The checker classifies a partially-filled grid as admitting zero, exactly
//! one, or possibly many completions, without enumerating them. Singleton
//! deductions are propagated across the three constraint families until a
//! fixed point; the classification falls out of the surviving candidate sets.

use std::collections::VecDeque;

use crate::grid::{Grid, Position, Solution};

/// Classification of a partially-filled grid's completions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solvability {
    /// The current placements admit no completion.
    NoSolution,
    /// More than one completion may remain.
    Multiple,
    /// Exactly one completion exists; the answer key is materialized.
    Unique(Solution),
}

/// Work queue of cells awaiting re-examination, deduplicated by position.
struct Frontier {
    queue: VecDeque<Position>,
    pending: Vec<bool>,
    width: usize,
}

impl Frontier {
    /// A frontier holding every cell of the grid, filled and empty alike.
    fn seeded(grid: &Grid) -> Self {
        let n = grid.dimension();
        Self {
            queue: grid.positions().collect(),
            pending: vec![true; n * n],
            width: n,
        }
    }

    fn push(&mut self, pos: Position) {
        let i = pos.row * self.width + pos.col;
        if !self.pending[i] {
            self.pending[i] = true;
            self.queue.push_back(pos);
        }
    }

    fn pop(&mut self) -> Option<Position> {
        let pos = self.queue.pop_front()?;
        self.pending[pos.row * self.width + pos.col] = false;
        Some(pos)
    }
}

/// Determines whether the grid admits zero, one, or possibly many
/// completions.
///
/// Every empty cell's candidates are re-derived from placed values, then
/// narrowed by propagation until the frontier drains. Contradictions
/// short-circuit the pass. The grid's candidate sets are left in their
/// propagated state for the caller to inspect.
pub fn solvability(grid: &mut Grid) -> Solvability {
    for pos in grid.positions() {
        if grid.get(pos).is_none() {
            let fresh = grid.usable_values(pos);
            grid.set_candidates(pos, fresh);
        }
    }

    let mut frontier = Frontier::seeded(grid);
    while let Some(pos) = frontier.pop() {
        match grid.get(pos) {
            Some(value) => {
                // A placed value cannot also be the last candidate of a peer
                // it constrains.
                for peer in grid.peers(pos) {
                    if grid.get(peer).is_none() && grid.candidates(peer).sole() == Some(value) {
                        return Solvability::NoSolution;
                    }
                }
            }
            None => {
                for peer in grid.peers(pos) {
                    if narrow(grid, pos, peer, &mut frontier) {
                        return Solvability::NoSolution;
                    }
                }
            }
        }
    }

    classify(grid)
}

/// Narrows one arc between an empty cell and a peer, re-queueing whichever
/// side collapses to a singleton. Returns true on contradiction.
fn narrow(grid: &mut Grid, cell: Position, peer: Position, frontier: &mut Frontier) -> bool {
    let cell_sole = grid.candidates(cell).sole();
    match grid.get(peer) {
        Some(peer_value) => cell_sole == Some(peer_value),
        None => {
            let peer_sole = grid.candidates(peer).sole();
            if cell_sole.is_some() && cell_sole == peer_sole {
                return true;
            }
            if let Some(value) = cell_sole {
                if grid.remove_candidate(peer, value) && grid.candidates(peer).sole().is_some() {
                    frontier.push(peer);
                }
            }
            if let Some(value) = grid.candidates(peer).sole() {
                if grid.remove_candidate(cell, value) && grid.candidates(cell).sole().is_some() {
                    frontier.push(cell);
                }
            }
            false
        }
    }
}

/// Scans the settled grid: an emptied candidate set means no completion, a
/// multi-candidate cell leaves more than one, and otherwise the sole
/// survivors spell out the unique completion.
fn classify(grid: &Grid) -> Solvability {
    let n = grid.dimension();
    let mut multiple = false;
    let mut values = Vec::with_capacity(n * n);
    for pos in grid.positions() {
        if let Some(value) = grid.get(pos) {
            values.push(value);
            continue;
        }
        let candidates = grid.candidates(pos);
        if candidates.is_empty() {
            // A contradiction outranks any multiple-solutions finding, so the
            // scan keeps looking for one even after a wide-open cell.
            return Solvability::NoSolution;
        }
        match candidates.sole() {
            Some(value) => values.push(value),
            None => multiple = true,
        }
    }
    if multiple {
        Solvability::Multiple
    } else {
        Solvability::Unique(Solution::new(n, values))
    }
}
