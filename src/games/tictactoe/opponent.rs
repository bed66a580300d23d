//! Rule-based computer opponent.
//!
//! Fixed priority, first match wins:
//! 1. Complete a line for itself
//! 2. Block the opponent's immediate win
//! 3. Take the center
//! 4. Take a random free corner
//! 5. Take a random free cell
//!
//! Randomness is only drawn for the last two rules.

use super::board::{Board, Cell, Mark, CENTER, CORNERS};
use crate::core::rng::RandomSource;

/// Which rule produced a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveReason {
    Win,
    Block,
    Center,
    Corner,
    Any,
}

/// Pick a cell for `me`. `None` only on a full board.
pub fn choose_move<R: RandomSource>(
    board: &Board,
    me: Mark,
    rng: &mut R,
) -> Option<(Cell, MoveReason)> {
    if let Some(&cell) = board.winning_cells(me).first() {
        return Some((cell, MoveReason::Win));
    }
    if let Some(&cell) = board.winning_cells(me.other()).first() {
        return Some((cell, MoveReason::Block));
    }
    if board.is_free(CENTER) {
        return Some((CENTER, MoveReason::Center));
    }

    let corners: Vec<Cell> = CORNERS.iter().copied().filter(|&c| board.is_free(c)).collect();
    if let Some(&cell) = rng.choose(&corners) {
        return Some((cell, MoveReason::Corner));
    }

    let free = board.empty_cells();
    rng.choose(&free).map(|&cell| (cell, MoveReason::Any))
}
