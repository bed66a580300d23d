//! Word bank and scrambling.

use im::OrdSet;
use thiserror::Error;

use crate::core::config::WordPuzzleConfig;
use crate::core::rng::RandomSource;

/// Shuffles tried before falling back to a rotation.
const MAX_SCRAMBLE_TRIES: usize = 64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WordBankError {
    #[error("word bank is empty")]
    Empty,

    #[error("word {index} ({word:?}) must contain only uppercase A-Z")]
    NotUppercase { index: usize, word: String },

    #[error("word {index} ({word:?}) needs two distinct letters to scramble")]
    Unscramblable { index: usize, word: String },
}

/// Ordered, validated list of target words.
///
/// Indices are stable: completed-word bookkeeping refers to them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordBank {
    words: Vec<String>,
}

impl WordBank {
    /// Validate and wrap `words`.
    pub fn new(words: Vec<String>) -> Result<Self, WordBankError> {
        if words.is_empty() {
            return Err(WordBankError::Empty);
        }
        for (index, word) in words.iter().enumerate() {
            if word.is_empty() || !word.bytes().all(|b| b.is_ascii_uppercase()) {
                return Err(WordBankError::NotUppercase { index, word: word.clone() });
            }
            let first = word.as_bytes()[0];
            if word.bytes().all(|b| b == first) {
                return Err(WordBankError::Unscramblable { index, word: word.clone() });
            }
        }
        Ok(Self { words })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Random index not in `completed`, or any index once all are done.
    pub fn pick<R: RandomSource>(&self, completed: &OrdSet<usize>, rng: &mut R) -> usize {
        let open: Vec<usize> = (0..self.len()).filter(|i| !completed.contains(i)).collect();
        if open.is_empty() {
            rng.gen_index(self.len())
        } else {
            open[rng.gen_index(open.len())]
        }
    }
}

impl Default for WordBank {
    fn default() -> Self {
        Self { words: WordPuzzleConfig::default().words }
    }
}

/// Uniform permutation of `word` that differs from it.
///
/// Reshuffles until the result differs. A random source that keeps
/// producing the identity (only possible with scripted draws) gets a
/// one-letter rotation instead, which differs for any word with two
/// distinct letters.
pub fn scramble<R: RandomSource>(word: &str, rng: &mut R) -> String {
    let original: Vec<char> = word.chars().collect();
    let mut letters = original.clone();
    for _ in 0..MAX_SCRAMBLE_TRIES {
        rng.shuffle(&mut letters);
        if letters != original {
            return letters.into_iter().collect();
        }
    }
    letters.rotate_left(1);
    letters.into_iter().collect()
}
