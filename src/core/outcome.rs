//! Transition results shared by every engine.
//!
//! An engine operation never fails. It returns a [`Transition`]: the next
//! state plus an [`Outcome`] describing what happened.
//!
//! - `Applied(event)`: the action took effect
//! - `Rejected(reason)`: a precondition failed, state unchanged
//! - `Terminal`: the game is finished, state unchanged until a reset
//! - `Exhausted(kind)`: a resource ran out (hints, attempts)

use serde::{Deserialize, Serialize};

/// Why an action had no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// Index or coordinate outside the board.
    OutOfRange,
    /// Target cell already holds a mark.
    Occupied,
    /// The action would not change anything (e.g. a blocked slide).
    NoEffect,
    /// Turning straight back into the snake's own neck.
    OppositeDirection,
    /// The game is paused.
    Paused,
    /// It is the other side's turn.
    NotYourTurn,
    /// The action does not apply to the current game mode.
    WrongMode,
    /// Two unmatched cards are showing and must be hidden first.
    AwaitingHide,
    /// The card is already face up or matched.
    AlreadyRevealed,
    /// Guess shorter than the minimum length.
    TooShort,
    /// The same guess was already made for this puzzle.
    AlreadyTried,
    /// No letters are selected.
    NothingSelected,
}

/// A resource limit was reached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exhaustion {
    /// Every letter of the answer is already revealed.
    NoHintsLeft,
    /// The last attempt was used; `answer` was the word.
    NoAttemptsLeft { answer: String },
}

/// What an action did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<E> {
    Applied(E),
    Rejected(Rejection),
    Terminal,
    Exhausted(Exhaustion),
}

impl<E> Outcome<E> {
    /// Whether the action took effect.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    /// The event, if the action was applied.
    #[must_use]
    pub fn event(&self) -> Option<&E> {
        match self {
            Outcome::Applied(event) => Some(event),
            _ => None,
        }
    }

    /// The rejection reason, if any.
    #[must_use]
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Outcome::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// Next state plus outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition<S, E> {
    pub state: S,
    pub outcome: Outcome<E>,
}

impl<S, E> Transition<S, E> {
    #[must_use]
    pub fn applied(state: S, event: E) -> Self {
        Self {
            state,
            outcome: Outcome::Applied(event),
        }
    }

    #[must_use]
    pub fn rejected(state: S, reason: Rejection) -> Self {
        Self {
            state,
            outcome: Outcome::Rejected(reason),
        }
    }

    #[must_use]
    pub fn terminal(state: S) -> Self {
        Self {
            state,
            outcome: Outcome::Terminal,
        }
    }

    #[must_use]
    pub fn exhausted(state: S, kind: Exhaustion) -> Self {
        Self {
            state,
            outcome: Outcome::Exhausted(kind),
        }
    }

    /// Split into state and outcome.
    #[must_use]
    pub fn into_parts(self) -> (S, Outcome<E>) {
        (self.state, self.outcome)
    }
}
