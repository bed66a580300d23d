//! Word-unscramble engine.

use im::{OrdSet, Vector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bank::{scramble, WordBank};
use crate::core::config::{ConfigError, WordPuzzleConfig};
use crate::core::outcome::{Exhaustion, Rejection, Transition};
use crate::core::rng::RandomSource;
use crate::rules::{GameEngine, GameResult};

/// Complete word-puzzle snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPuzzleState {
    /// Bank index of `target`.
    pub word_index: usize,
    pub target: String,
    /// Non-identity permutation of `target`.
    pub scrambled: String,
    /// Distinct letters given away by hints, taken in order of first
    /// appearance in `target`.
    pub hints_used: usize,
    /// Wrong guesses made for this puzzle, uppercased.
    pub attempted: OrdSet<String>,
    pub remaining_attempts: u8,
    pub score: u32,
    pub best_score: u32,
    /// Bank indices solved this run.
    pub completed: OrdSet<usize>,
    /// Picked letter tiles, as indices into `scrambled`, in pick order.
    pub selection: Vector<usize>,
}

impl WordPuzzleState {
    /// One-based level shown to the player.
    #[must_use]
    pub fn level(&self) -> usize {
        self.completed.len() + 1
    }

    /// Letters given away by hints, in word order. A repeated letter is
    /// revealed once.
    #[must_use]
    pub fn revealed_letters(&self) -> String {
        distinct_letters(&self.target).take(self.hints_used).map(|(_, c)| c).collect()
    }

    /// The guess spelled by the current tile selection.
    #[must_use]
    pub fn draft(&self) -> String {
        let letters: Vec<char> = self.scrambled.chars().collect();
        self.selection.iter().filter_map(|&i| letters.get(i)).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WordPuzzleAction {
    /// Free-text guess, case-insensitive.
    Guess(String),
    ToggleLetter(usize),
    /// Guess the word spelled by the selected tiles.
    SubmitSelection,
    Hint,
    Skip,
    Reset,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WordPuzzleEvent {
    /// Correct guess; the state already holds the next puzzle.
    Solved { answer: String, points: u32 },
    Incorrect { guess: String, remaining: u8 },
    Hint { position: usize, letter: char },
    LetterToggled { index: usize, selected: bool },
    /// Gave up on `answer`; the state holds the next puzzle.
    Skipped { answer: String },
    Reset,
}

/// Word-unscramble engine over a validated [`WordBank`].
#[derive(Clone, Debug, Default)]
pub struct WordPuzzle {
    config: WordPuzzleConfig,
    bank: WordBank,
}

impl WordPuzzle {
    pub fn new(config: WordPuzzleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let bank = WordBank::new(config.words.clone())?;
        Ok(Self { config, bank })
    }

    #[must_use]
    pub fn config(&self) -> &WordPuzzleConfig {
        &self.config
    }

    #[must_use]
    pub fn bank(&self) -> &WordBank {
        &self.bank
    }

    /// Fresh run: zero score, the given words already solved.
    pub fn new_puzzle<R: RandomSource>(
        &self,
        completed: &OrdSet<usize>,
        rng: &mut R,
    ) -> WordPuzzleState {
        let word_index = self.bank.pick(completed, rng);
        let target = self.bank.get(word_index).unwrap_or_default().to_string();
        let scrambled = scramble(&target, rng);
        debug!(word_index, level = completed.len() + 1, "new word puzzle");
        WordPuzzleState {
            word_index,
            target,
            scrambled,
            hints_used: 0,
            attempted: OrdSet::new(),
            remaining_attempts: self.config.max_attempts,
            score: 0,
            best_score: 0,
            completed: completed.clone(),
            selection: Vector::new(),
        }
    }

    /// Next puzzle in the same run: score, best and progress carry over.
    fn advance<R: RandomSource>(&self, state: &WordPuzzleState, rng: &mut R) -> WordPuzzleState {
        WordPuzzleState {
            score: state.score,
            best_score: state.best_score,
            ..self.new_puzzle(&state.completed, rng)
        }
    }

    pub fn submit_guess<R: RandomSource>(
        &self,
        state: &WordPuzzleState,
        guess: &str,
        rng: &mut R,
    ) -> Transition<WordPuzzleState, WordPuzzleEvent> {
        let guess = guess.trim().to_uppercase();
        if guess.chars().count() < self.config.min_guess_len {
            return Transition::rejected(state.clone(), Rejection::TooShort);
        }
        if state.attempted.contains(&guess) {
            return Transition::rejected(state.clone(), Rejection::AlreadyTried);
        }

        if guess == state.target {
            let points = self.config.points_per_letter * state.target.chars().count() as u32;
            let mut solved = state.clone();
            solved.score += points;
            solved.best_score = solved.best_score.max(solved.score);
            solved.completed.insert(state.word_index);
            debug!(word = %state.target, points, score = solved.score, "word solved");
            let answer = state.target.clone();
            return Transition::applied(
                self.advance(&solved, rng),
                WordPuzzleEvent::Solved { answer, points },
            );
        }

        let remaining = state.remaining_attempts.saturating_sub(1);
        if remaining == 0 {
            debug!(word = %state.target, "out of attempts");
            let answer = state.target.clone();
            return Transition::exhausted(
                self.advance(state, rng),
                Exhaustion::NoAttemptsLeft { answer },
            );
        }

        let mut next = state.clone();
        next.remaining_attempts = remaining;
        next.attempted.insert(guess.clone());
        next.selection.clear();
        Transition::applied(next, WordPuzzleEvent::Incorrect { guess, remaining })
    }

    /// Reveal the earliest letter of the answer not shown yet and select
    /// its first tile.
    #[must_use]
    pub fn request_hint(
        &self,
        state: &WordPuzzleState,
    ) -> Transition<WordPuzzleState, WordPuzzleEvent> {
        let Some((position, letter)) = distinct_letters(&state.target).nth(state.hints_used)
        else {
            return Transition::exhausted(state.clone(), Exhaustion::NoHintsLeft);
        };
        let mut next = state.clone();
        next.hints_used += 1;
        next.selection = state.scrambled.chars().position(|c| c == letter).into_iter().collect();
        Transition::applied(next, WordPuzzleEvent::Hint { position, letter })
    }

    /// Abandon the current word without marking it solved.
    pub fn skip<R: RandomSource>(
        &self,
        state: &WordPuzzleState,
        rng: &mut R,
    ) -> Transition<WordPuzzleState, WordPuzzleEvent> {
        let answer = state.target.clone();
        Transition::applied(self.advance(state, rng), WordPuzzleEvent::Skipped { answer })
    }

    /// Start over from level one, keeping the best score.
    pub fn reset<R: RandomSource>(
        &self,
        state: &WordPuzzleState,
        rng: &mut R,
    ) -> Transition<WordPuzzleState, WordPuzzleEvent> {
        let next = WordPuzzleState {
            best_score: state.best_score,
            ..self.new_puzzle(&OrdSet::new(), rng)
        };
        Transition::applied(next, WordPuzzleEvent::Reset)
    }

    /// Select or deselect one scrambled letter tile.
    #[must_use]
    pub fn toggle_letter(
        &self,
        state: &WordPuzzleState,
        index: usize,
    ) -> Transition<WordPuzzleState, WordPuzzleEvent> {
        if index >= state.scrambled.chars().count() {
            return Transition::rejected(state.clone(), Rejection::OutOfRange);
        }
        let mut next = state.clone();
        let selected = match next.selection.index_of(&index) {
            Some(at) => {
                next.selection.remove(at);
                false
            }
            None => {
                next.selection.push_back(index);
                true
            }
        };
        Transition::applied(next, WordPuzzleEvent::LetterToggled { index, selected })
    }

    pub fn submit_selection<R: RandomSource>(
        &self,
        state: &WordPuzzleState,
        rng: &mut R,
    ) -> Transition<WordPuzzleState, WordPuzzleEvent> {
        if state.selection.is_empty() {
            return Transition::rejected(state.clone(), Rejection::NothingSelected);
        }
        self.submit_guess(state, &state.draft(), rng)
    }
}

/// First occurrence of each letter of `word`, with its position.
fn distinct_letters(word: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    word.chars().enumerate().filter(move |&(i, c)| !word.chars().take(i).any(|p| p == c))
}

/// Whether `a` and `b` hold the same letters with the same counts.
fn same_letters(a: &str, b: &str) -> bool {
    let mut a: Vec<char> = a.chars().collect();
    let mut b: Vec<char> = b.chars().collect();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

impl GameEngine for WordPuzzle {
    type State = WordPuzzleState;
    type Action = WordPuzzleAction;
    type Event = WordPuzzleEvent;
    type Record = WordPuzzleState;

    const STORAGE_KEY: &'static str = "word_puzzle.state";

    fn new_game<R: RandomSource>(&self, rng: &mut R) -> WordPuzzleState {
        self.new_puzzle(&OrdSet::new(), rng)
    }

    fn apply<R: RandomSource>(
        &self,
        state: &WordPuzzleState,
        action: &WordPuzzleAction,
        rng: &mut R,
    ) -> Transition<WordPuzzleState, WordPuzzleEvent> {
        match action {
            WordPuzzleAction::Guess(guess) => self.submit_guess(state, guess, rng),
            WordPuzzleAction::ToggleLetter(index) => self.toggle_letter(state, *index),
            WordPuzzleAction::SubmitSelection => self.submit_selection(state, rng),
            WordPuzzleAction::Hint => self.request_hint(state),
            WordPuzzleAction::Skip => self.skip(state, rng),
            WordPuzzleAction::Reset => self.reset(state, rng),
        }
    }

    /// Puzzles follow one another without end.
    fn is_terminal(&self, _state: &WordPuzzleState) -> Option<GameResult> {
        None
    }

    fn record(&self, state: &WordPuzzleState) -> WordPuzzleState {
        state.clone()
    }

    /// A saved puzzle that no longer fits the bank or the config gets a
    /// fresh word; score, best and still-valid progress carry over.
    fn restore<R: RandomSource>(&self, record: WordPuzzleState, rng: &mut R) -> WordPuzzleState {
        let tiles = record.scrambled.chars().count();
        let usable = !record.target.is_empty()
            && self.bank.get(record.word_index) == Some(record.target.as_str())
            && record.scrambled != record.target
            && same_letters(&record.scrambled, &record.target)
            && (1..=self.config.max_attempts).contains(&record.remaining_attempts)
            && record.hints_used <= distinct_letters(&record.target).count()
            && record.selection.iter().all(|&i| i < tiles);
        if usable {
            return record;
        }
        let completed: OrdSet<usize> =
            record.completed.iter().copied().filter(|&i| i < self.bank.len()).collect();
        WordPuzzleState {
            score: record.score,
            best_score: record.best_score,
            ..self.new_puzzle(&completed, rng)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::outcome::Outcome;
    use crate::core::rng::ScriptedRng;

    fn engine(words: &[&str]) -> WordPuzzle {
        WordPuzzle::new(WordPuzzleConfig::default().with_words(words.iter().copied())).unwrap()
    }

    fn puzzle(engine: &WordPuzzle, index: usize, scrambled: &str) -> WordPuzzleState {
        let mut rng = ScriptedRng::new(vec![0.0]);
        WordPuzzleState {
            word_index: index,
            target: engine.bank().get(index).unwrap().to_string(),
            scrambled: scrambled.to_string(),
            ..engine.new_game(&mut rng)
        }
    }

    #[test]
    fn test_new_puzzle_scrambles() {
        let engine = WordPuzzle::default();
        let mut rng = ScriptedRng::new(vec![0.31, 0.77, 0.05, 0.6, 0.42]);
        let state = engine.new_game(&mut rng);

        assert_eq!(engine.bank().get(state.word_index), Some(state.target.as_str()));
        assert_ne!(state.scrambled, state.target);
        assert_eq!(state.remaining_attempts, 3);
        assert_eq!(state.level(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_correct_guess_scores_and_advances() {
        let engine = engine(&["STATE", "HOOK"]);
        let state = puzzle(&engine, 0, "TATES");
        let mut rng = ScriptedRng::new(vec![0.0]);

        let t = engine.submit_guess(&state, " state ", &mut rng);
        assert_eq!(
            t.outcome,
            Outcome::Applied(WordPuzzleEvent::Solved { answer: "STATE".into(), points: 50 })
        );
        assert_eq!(t.state.score, 50);
        assert_eq!(t.state.best_score, 50);
        assert!(t.state.completed.contains(&0));
        // Only HOOK is left.
        assert_eq!(t.state.target, "HOOK");
        assert_eq!(t.state.level(), 2);
        assert!(t.state.attempted.is_empty());
    }

    #[test]
    fn test_guess_rejections_cost_nothing() {
        let engine = engine(&["STATE", "HOOK"]);
        let state = puzzle(&engine, 0, "TATES");
        let mut rng = ScriptedRng::new(vec![0.0]);

        let short = engine.submit_guess(&state, "S", &mut rng);
        assert_eq!(short.outcome.rejection(), Some(Rejection::TooShort));
        assert_eq!(short.state, state);

        let wrong = engine.submit_guess(&state, "taste", &mut rng);
        assert_eq!(
            wrong.outcome,
            Outcome::Applied(WordPuzzleEvent::Incorrect { guess: "TASTE".into(), remaining: 2 })
        );

        let again = engine.submit_guess(&wrong.state, "TASTE", &mut rng);
        assert_eq!(again.outcome.rejection(), Some(Rejection::AlreadyTried));
        assert_eq!(again.state.remaining_attempts, 2);
    }

    #[test]
    fn test_out_of_attempts_moves_on_without_completing() {
        let engine = engine(&["STATE", "HOOK"]);
        let mut state = puzzle(&engine, 0, "TATES");
        state.score = 40;
        let mut rng = ScriptedRng::new(vec![0.0]);

        for guess in ["AA", "BB"] {
            state = engine.submit_guess(&state, guess, &mut rng).state;
        }
        assert_eq!(state.remaining_attempts, 1);

        let t = engine.submit_guess(&state, "CC", &mut rng);
        assert_eq!(
            t.outcome,
            Outcome::Exhausted(Exhaustion::NoAttemptsLeft { answer: "STATE".into() })
        );
        assert!(t.state.completed.is_empty());
        assert_eq!(t.state.score, 40);
        assert_eq!(t.state.remaining_attempts, 3);
        assert!(t.state.attempted.is_empty());
    }

    #[test]
    fn test_hints_reveal_each_letter_once() {
        let engine = engine(&["HOOK", "STATE"]);
        let state = puzzle(&engine, 0, "KOHO");

        let t = engine.request_hint(&state);
        assert_eq!(t.outcome, Outcome::Applied(WordPuzzleEvent::Hint { position: 0, letter: 'H' }));
        assert_eq!(t.state.revealed_letters(), "H");
        assert_eq!(t.state.draft(), "H");

        let t = engine.request_hint(&t.state);
        assert_eq!(t.outcome, Outcome::Applied(WordPuzzleEvent::Hint { position: 1, letter: 'O' }));
        assert_eq!(t.state.selection, Vector::from(vec![1]));

        // The second O is already out, so K comes next.
        let t = engine.request_hint(&t.state);
        assert_eq!(t.outcome, Outcome::Applied(WordPuzzleEvent::Hint { position: 3, letter: 'K' }));
        assert_eq!(t.state.revealed_letters(), "HOK");
        assert_eq!(t.state.draft(), "K");

        let done = engine.request_hint(&t.state);
        assert_eq!(done.outcome, Outcome::Exhausted(Exhaustion::NoHintsLeft));
        assert_eq!(done.state, t.state);
    }

    #[test]
    fn test_letter_selection() {
        let engine = engine(&["HOOK", "STATE"]);
        let state = puzzle(&engine, 0, "KOHO");
        let mut rng = ScriptedRng::new(vec![0.0]);

        assert_eq!(
            engine.submit_selection(&state, &mut rng).outcome.rejection(),
            Some(Rejection::NothingSelected)
        );
        assert_eq!(engine.toggle_letter(&state, 4).outcome.rejection(), Some(Rejection::OutOfRange));

        let state = [2, 1, 0].iter().fold(state, |s, &i| engine.toggle_letter(&s, i).state);
        assert_eq!(state.draft(), "HOK");

        let t = engine.toggle_letter(&state, 1);
        assert_eq!(
            t.outcome,
            Outcome::Applied(WordPuzzleEvent::LetterToggled { index: 1, selected: false })
        );
        assert_eq!(t.state.draft(), "HK");

        let state = [1, 3].iter().fold(t.state, |s, &i| engine.toggle_letter(&s, i).state);
        assert_eq!(state.draft(), "HKOO");
        let t = engine.submit_selection(&state, &mut rng);
        assert!(matches!(t.outcome, Outcome::Applied(WordPuzzleEvent::Incorrect { .. })));
        assert!(t.state.selection.is_empty());
    }

    #[test]
    fn test_skip_and_reset() {
        let engine = engine(&["STATE", "HOOK"]);
        let mut state = puzzle(&engine, 0, "TATES");
        state.score = 90;
        state.best_score = 120;
        state.completed.insert(1);
        let mut rng = ScriptedRng::new(vec![0.0]);

        let skipped = engine.skip(&state, &mut rng);
        assert_eq!(
            skipped.outcome,
            Outcome::Applied(WordPuzzleEvent::Skipped { answer: "STATE".into() })
        );
        assert_eq!(skipped.state.score, 90);
        assert_eq!(skipped.state.completed.len(), 1);
        assert_eq!(skipped.state.target, "STATE");

        let reset = engine.reset(&state, &mut rng).state;
        assert_eq!(reset.score, 0);
        assert_eq!(reset.best_score, 120);
        assert!(reset.completed.is_empty());
    }

    #[test]
    fn test_restore_rejects_stale_word() {
        let engine = engine(&["STATE", "HOOK"]);
        let mut saved = puzzle(&engine, 1, "KOHO");
        saved.score = 30;
        let mut rng = ScriptedRng::new(vec![0.0]);
        assert_eq!(engine.restore(saved.clone(), &mut rng), saved);

        saved.target = "RENDER".into();
        saved.completed.insert(7);
        let restored = engine.restore(saved, &mut rng);
        assert_eq!(restored.score, 30);
        assert!(restored.completed.is_empty());
        assert_eq!(engine.bank().get(restored.word_index), Some(restored.target.as_str()));
    }

    #[test]
    fn test_restore_rejects_broken_puzzle() {
        let engine = engine(&["STATE", "HOOK"]);
        let mut rng = ScriptedRng::new(vec![0.0]);
        let mut saved = puzzle(&engine, 0, "TATES");
        saved.score = 70;
        saved.completed.insert(1);

        let mut not_a_shuffle = saved.clone();
        not_a_shuffle.scrambled = "ZZZZZ".into();
        let mut unscrambled = saved.clone();
        unscrambled.scrambled = "STATE".into();
        let mut no_attempts = saved.clone();
        no_attempts.remaining_attempts = 0;
        let mut too_many_attempts = saved.clone();
        too_many_attempts.remaining_attempts = 200;
        let mut too_many_hints = saved.clone();
        too_many_hints.hints_used = 5;
        let mut stray_tile = saved.clone();
        stray_tile.selection.push_back(9);

        for broken in [not_a_shuffle, unscrambled, no_attempts, too_many_attempts, too_many_hints, stray_tile] {
            let restored = engine.restore(broken, &mut rng);
            assert_eq!(restored.score, 70);
            assert!(restored.completed.contains(&1));
            assert_eq!(restored.remaining_attempts, 3);
            assert_eq!(restored.hints_used, 0);
            assert_ne!(restored.scrambled, restored.target);
            assert!(same_letters(&restored.scrambled, &restored.target));
        }
    }

    #[test]
    fn test_invalid_config() {
        assert!(WordPuzzle::new(WordPuzzleConfig::default().with_words(Vec::<String>::new())).is_err());
        assert!(WordPuzzle::new(WordPuzzleConfig::default().with_max_attempts(0)).is_err());
    }
}
