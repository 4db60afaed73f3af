//! Solver module - bounded depth-first search for a winning move sequence
//!
//! States are deduplicated by their canonical form: the sorted list of tube
//! contents. Tube order does not affect solvability, so two boards that differ
//! only by tube order are explored once.

use std::collections::HashSet;

use crate::board::Board;
use crate::types::Hint;

/// Canonical key: tube color sequences, sorted.
fn canonical(board: &Board) -> Vec<Vec<u8>> {
    let mut key: Vec<Vec<u8>> = board.tubes().iter().map(|t| t.colors().collect()).collect();
    key.sort_unstable();
    key
}

/// Find a move sequence that completes `board`.
///
/// Explores at most `max_states` distinct states. Returns `None` when the board
/// is unsolvable or the budget runs out first.
pub fn solve(board: &Board, max_states: usize) -> Option<Vec<Hint>> {
    let mut visited: HashSet<Vec<Vec<u8>>> = HashSet::new();
    visited.insert(canonical(board));

    let mut stack: Vec<(Board, Vec<Hint>)> = vec![(board.clone(), Vec::new())];

    while let Some((state, path)) = stack.pop() {
        if state.is_complete() {
            return Some(path);
        }
        if visited.len() >= max_states {
            return None;
        }

        let moves: Vec<Hint> = state.valid_moves().collect();
        // Reverse so the first move in scan order is explored first.
        for hint in moves.into_iter().rev() {
            let mut next = state.clone();
            if next.apply_move(hint.from, hint.to).is_err() {
                continue;
            }
            if visited.insert(canonical(&next)) {
                let mut next_path = path.clone();
                next_path.push(hint);
                stack.push((next, next_path));
            }
        }
    }

    None
}

/// Apply `moves` to a copy of `board`; `None` if any move is rejected.
pub fn replay(board: &Board, moves: &[Hint]) -> Option<Board> {
    let mut board = board.clone();
    for hint in moves {
        board.apply_move(hint.from, hint.to).ok()?;
    }
    Some(board)
}
