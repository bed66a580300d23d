//! Game implementations.
//!
//! - `tile_merge`: 2048-style sliding tiles
//! - `snake`: tick-driven snake
//! - `tictactoe`: tic-tac-toe with an optional computer opponent
//! - `memory`: pair matching
//! - `word_puzzle`: word unscramble

pub mod memory;
pub mod snake;
pub mod tictactoe;
pub mod tile_merge;
pub mod word_puzzle;
