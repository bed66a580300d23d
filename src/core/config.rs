//! Game configuration types.
//!
//! Each engine is built from its own config struct:
//! - `TileMergeConfig`: goal tile and spawn odds
//! - `SnakeConfig`: grid size, start cell, speed ramp
//! - `MemoryConfig`: the card symbols
//! - `WordPuzzleConfig`: word bank, attempts, scoring
//!
//! `ArcadeConfig` bundles them so a host can load one file for every game.
//! Defaults reproduce the stock game constants.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::{Direction, Position};
use crate::games::word_puzzle::{WordBank, WordBankError};

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("goal tile {0} is not a power of two >= 8")]
    GoalTile(u32),
    #[error("spawn probability must be within [0, 1]")]
    SpawnProbability,
    #[error("starting tile count {0} does not fit the board")]
    StartingTiles(usize),
    #[error("snake grid size {0} must be at least 2")]
    GridSize(i32),
    #[error("snake start {0} lies outside the grid")]
    StartPosition(Position),
    #[error("tick intervals invalid: start {start}ms, floor {floor}ms, step {step}ms")]
    TickInterval { start: u32, floor: u32, step: u32 },
    #[error("points per speed-up must be positive")]
    SpeedupPoints,
    #[error("memory needs at least one symbol")]
    NoSymbols,
    #[error("memory symbol {0:?} appears more than once")]
    DuplicateSymbol(char),
    #[error("word bank: {0}")]
    WordBank(#[from] WordBankError),
    #[error("attempts per puzzle must be positive")]
    NoAttempts,
}

/// Tile-merge (2048) settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileMergeConfig {
    /// Tile value that counts as a win.
    pub goal_tile: u32,
    /// Chance a spawned tile is a 4 instead of a 2.
    pub four_probability: f64,
    /// Tiles placed on a fresh board.
    pub starting_tiles: usize,
}

impl Default for TileMergeConfig {
    fn default() -> Self {
        Self {
            goal_tile: 2048,
            four_probability: 0.1,
            starting_tiles: 2,
        }
    }
}

impl TileMergeConfig {
    pub fn with_goal_tile(mut self, goal: u32) -> Self {
        self.goal_tile = goal;
        self
    }

    pub fn with_four_probability(mut self, p: f64) -> Self {
        self.four_probability = p;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.goal_tile < 8 || !self.goal_tile.is_power_of_two() {
            return Err(ConfigError::GoalTile(self.goal_tile));
        }
        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(ConfigError::SpawnProbability);
        }
        if self.starting_tiles > 16 {
            return Err(ConfigError::StartingTiles(self.starting_tiles));
        }
        Ok(())
    }
}

/// Snake settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    /// Side length of the square grid.
    pub grid_size: i32,
    /// Cell the one-segment snake starts on.
    pub start: Position,
    /// Heading at the start of a game.
    pub start_direction: Direction,
    /// Tick interval at the start of a game.
    pub initial_interval_ms: u32,
    /// Interval never drops below this.
    pub min_interval_ms: u32,
    /// Interval reduction per speed-up.
    pub interval_step_ms: u32,
    /// A speed-up happens every time the score reaches a multiple of this.
    pub points_per_speedup: u32,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            grid_size: 15,
            start: Position::new(5, 5),
            start_direction: Direction::Right,
            initial_interval_ms: 200,
            min_interval_ms: 50,
            interval_step_ms: 20,
            points_per_speedup: 5,
        }
    }
}

impl SnakeConfig {
    pub fn with_grid_size(mut self, size: i32) -> Self {
        self.grid_size = size;
        self
    }

    pub fn with_start(mut self, start: Position, direction: Direction) -> Self {
        self.start = start;
        self.start_direction = direction;
        self
    }

    pub fn with_initial_interval(mut self, ms: u32) -> Self {
        self.initial_interval_ms = ms;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 2 {
            return Err(ConfigError::GridSize(self.grid_size));
        }
        if !self.start.in_bounds(self.grid_size) {
            return Err(ConfigError::StartPosition(self.start));
        }
        if self.min_interval_ms == 0 || self.initial_interval_ms < self.min_interval_ms {
            return Err(ConfigError::TickInterval {
                start: self.initial_interval_ms,
                floor: self.min_interval_ms,
                step: self.interval_step_ms,
            });
        }
        if self.points_per_speedup == 0 {
            return Err(ConfigError::SpeedupPoints);
        }
        Ok(())
    }
}

/// Memory-match settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Distinct card faces; each appears twice in the deck.
    pub symbols: Vec<char>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            symbols: vec!['🐶', '🐱', '🐭', '🐹', '🐰', '🦊', '🐻', '🐼'],
        }
    }
}

impl MemoryConfig {
    pub fn with_symbols(mut self, symbols: impl Into<Vec<char>>) -> Self {
        self.symbols = symbols.into();
        self
    }

    /// Number of distinct pairs.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::NoSymbols);
        }
        for (i, symbol) in self.symbols.iter().enumerate() {
            if self.symbols[..i].contains(symbol) {
                return Err(ConfigError::DuplicateSymbol(*symbol));
            }
        }
        Ok(())
    }
}

/// Word-unscramble settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordPuzzleConfig {
    /// Target words, uppercase A-Z.
    pub words: Vec<String>,
    /// Wrong guesses allowed per puzzle.
    pub max_attempts: u8,
    /// Points per letter of a solved word.
    pub points_per_letter: u32,
    /// Shortest guess accepted.
    pub min_guess_len: usize,
}

impl Default for WordPuzzleConfig {
    fn default() -> Self {
        let words = [
            "REACT", "NATIVE", "JAVASCRIPT", "MOBILE", "FUNCTION", "COMPONENT", "STATE", "HOOK",
            "PROPS", "ASYNC", "PROMISE", "SWIFT", "KOTLIN", "FLUTTER", "ANDROID", "IPHONE",
            "XCODE", "STUDIO", "DEBUG", "RENDER",
        ];
        Self {
            words: words.iter().map(|w| w.to_string()).collect(),
            max_attempts: 3,
            points_per_letter: 10,
            min_guess_len: 2,
        }
    }
}

impl WordPuzzleConfig {
    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.words = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_attempts(mut self, attempts: u8) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        WordBank::new(self.words.clone())?;
        Ok(())
    }
}

/// Configuration for every game in the arcade.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    pub tile_merge: TileMergeConfig,
    pub snake: SnakeConfig,
    pub memory: MemoryConfig,
    pub word_puzzle: WordPuzzleConfig,
}

impl ArcadeConfig {
    /// Check every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tile_merge.validate()?;
        self.snake.validate()?;
        self.memory.validate()?;
        self.word_puzzle.validate()
    }
}
