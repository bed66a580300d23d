//! # pocket-arcade
//!
//! Deterministic rules engines for five casual games: tile merge (2048),
//! snake, tic-tac-toe, memory match and word unscramble.
//!
//! ## Design Principles
//!
//! 1. **Immutable Snapshots**: Every state is a value. Transitions return a
//!    new state and never mutate the old one, so snapshots are free.
//!
//! 2. **Injected Randomness**: Engines draw from a `RandomSource` passed in
//!    by the caller. A scripted source replays any game exactly.
//!
//! 3. **No Clocks Inside**: Snake ticks, the computer's reply and hiding a
//!    memory mismatch are actions the host sends when its timer fires.
//!
//! ## Architecture
//!
//! - **Outcomes, Not Errors**: Gameplay never fails. Every action returns
//!   a `Transition` whose `Outcome` says whether it applied, was rejected,
//!   hit a finished game, or ran out of hints/attempts.
//!
//! - **Persistent Data Structures**: Snake bodies and sets use `im-rs` so
//!   cloning a state is O(1).
//!
//! ## Modules
//!
//! - `core`: RNG, grid geometry, outcomes, configuration
//! - `rules`: `GameEngine` trait implemented by every game
//! - `games`: the five engines
//! - `persist`: key-value stores and record encoding
//! - `session`: an engine wired to a store

pub mod core;
pub mod games;
pub mod persist;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    ArcadeConfig, ConfigError, Direction, Exhaustion, GameRng, GameRngState, Outcome, Position,
    RandomSource, Rejection, ScriptedRng, Transition,
};

pub use crate::rules::{GameEngine, GameResult};

pub use crate::games::memory::MemoryMatch;
pub use crate::games::snake::Snake;
pub use crate::games::tictactoe::TicTacToe;
pub use crate::games::tile_merge::TileMerge;
pub use crate::games::word_puzzle::WordPuzzle;

pub use crate::persist::{FileStore, MemoryStore, PersistError, PersistenceService};

pub use crate::session::{Dispatched, SaveStatus, Session};
