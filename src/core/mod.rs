//! Core building blocks shared by every engine: randomness, grid geometry,
//! transition outcomes, configuration.

pub mod config;
pub mod grid;
pub mod outcome;
pub mod rng;

pub use config::{
    ArcadeConfig, ConfigError, MemoryConfig, SnakeConfig, TileMergeConfig, WordPuzzleConfig,
};
pub use grid::{Direction, Position};
pub use outcome::{Exhaustion, Outcome, Rejection, Transition};
pub use rng::{GameRng, GameRngState, RandomSource, ScriptedRng};
