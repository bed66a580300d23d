//! Tic-tac-toe for two humans or against a rule-based computer.
//!
//! The board is immutable; every placement produces a new [`Board`]. The
//! computer never moves on its own: callers check
//! [`TicTacToe::computer_to_move`] and dispatch a `ComputerMove` after
//! whatever delay suits them.

mod board;
mod game;
mod opponent;

pub use board::{Board, Cell, Line, Mark, CENTER, CORNERS, LINES};
pub use game::{Mode, TicTacToe, TicTacToeAction, TicTacToeEvent, TicTacToeState, TicTacToeStats};
pub use opponent::{choose_move, MoveReason};
