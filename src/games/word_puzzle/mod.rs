//! Word unscramble.
//!
//! A word from the bank is shown with its letters shuffled. The player
//! types a guess or builds one from the letter tiles. Three wrong guesses
//! move on to another word; solved words are not offered again until the
//! whole bank is done.

mod bank;
mod game;

pub use bank::{scramble, WordBank, WordBankError};
pub use game::{WordPuzzle, WordPuzzleAction, WordPuzzleEvent, WordPuzzleState};
