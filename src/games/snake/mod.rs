//! Snake.
//!
//! Tick-driven movement on a 15×15 grid. Turns are buffered and applied on
//! the next tick; eating grows the snake and every fifth point shortens the
//! tick interval, which the caller must apply to its timer.

mod game;

pub use game::{Snake, SnakeAction, SnakeEvent, SnakeRecord, SnakeState};
