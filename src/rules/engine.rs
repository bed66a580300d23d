//! Engine trait for game implementations.
//!
//! Every game follows the same shape: an immutable state value, a closed set
//! of actions, and a pure `apply` that returns the next state plus an
//! outcome. Randomness is always passed in, never drawn from a global.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::outcome::Transition;
use crate::core::rng::RandomSource;

/// Result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// The game ended in the player's favour (or, with two humans, someone won).
    Won,
    /// The player lost.
    Lost,
    /// Nobody won.
    Draw,
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `apply`: Must be deterministic given the same random draws
/// - `apply`: Must return a state equal to the input for rejected actions
/// - `is_terminal`: Return None while the game continues
/// - `record` / `restore`: The persisted summary may be smaller than the state
pub trait GameEngine {
    /// Complete snapshot of one game.
    type State: Clone;
    /// Discrete player or timer input.
    type Action;
    /// Description of an applied action.
    type Event;
    /// What the persistence layer stores between sessions.
    type Record: Serialize + DeserializeOwned;

    /// Key under which `Record` is persisted.
    const STORAGE_KEY: &'static str;

    /// Deal a fresh game.
    fn new_game<R: RandomSource>(&self, rng: &mut R) -> Self::State;

    /// Apply an action to a state.
    fn apply<R: RandomSource>(
        &self,
        state: &Self::State,
        action: &Self::Action,
        rng: &mut R,
    ) -> Transition<Self::State, Self::Event>;

    /// Check if the game is over.
    fn is_terminal(&self, state: &Self::State) -> Option<GameResult>;

    /// Summary to persist.
    fn record(&self, state: &Self::State) -> Self::Record;

    /// Rebuild a state from a persisted summary.
    fn restore<R: RandomSource>(&self, record: Self::Record, rng: &mut R) -> Self::State;

    // === Convenience Methods ===

    /// Apply a sequence of actions, returning the final state.
    ///
    /// With the same initial state and the same random draws the result is
    /// always identical.
    fn replay<R: RandomSource>(
        &self,
        initial: &Self::State,
        actions: &[Self::Action],
        rng: &mut R,
    ) -> Self::State {
        actions.iter().fold(initial.clone(), |state, action| {
            self.apply(&state, action, rng).state
        })
    }
}
