//! Engine trait shared by the games.
//!
//! Games implement `GameEngine` to define:
//! - How a fresh game is dealt
//! - How an action turns one state into the next
//! - When the game is over
//! - What summary of a state is persisted between sessions
//!
//! The session layer drives engines only through this trait.

pub mod engine;

pub use engine::{GameEngine, GameResult};
