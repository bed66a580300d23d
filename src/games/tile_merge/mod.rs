//! Tile merge ("2048").
//!
//! A 4×4 board of power-of-two tiles:
//! - A move slides every tile toward one edge; equal neighbours merge once
//! - Each merge adds the new tile value to the score
//! - A move that changes the board spawns a 2 (90%) or 4 (10%)
//! - Reaching 2048 is recorded but play continues
//! - The game ends when the board is full and no neighbours match

mod board;
mod game;

pub use board::{Board, Shift, Spawn, MAX_TILE, SIZE};
pub use game::{MoveSummary, TileMerge, TileMergeAction, TileMergeEvent, TileMergeState};
