//! Memory-match engine.

use im::{OrdSet, Vector};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::config::{ConfigError, MemoryConfig};
use crate::core::outcome::{Rejection, Transition};
use crate::core::rng::RandomSource;
use crate::rules::{GameEngine, GameResult};

/// Complete memory-match snapshot.
///
/// `face_up` never holds more than two indices. When it holds two, they are
/// a mismatch waiting for [`MemoryMatch::hide_mismatch`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryState {
    pub cards: Vector<char>,
    pub face_up: SmallVec<[usize; 2]>,
    pub matched: OrdSet<usize>,
    /// Completed flip pairs this game.
    pub moves: u32,
    /// Fewest moves of any won game, if one was ever won.
    pub best_moves: Option<u32>,
}

impl MemoryState {
    /// Deal a specific layout, all cards face down.
    #[must_use]
    pub fn from_cards(cards: impl IntoIterator<Item = char>, best_moves: Option<u32>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
            face_up: SmallVec::new(),
            matched: OrdSet::new(),
            moves: 0,
            best_moves,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.cards.is_empty() && self.matched.len() == self.cards.len()
    }

    /// Two unmatched cards are showing.
    #[must_use]
    pub fn awaiting_hide(&self) -> bool {
        self.face_up.len() == 2
    }

    /// Face up or matched.
    #[must_use]
    pub fn is_revealed(&self, index: usize) -> bool {
        self.face_up.contains(&index) || self.matched.contains(&index)
    }

    /// Symbol to render at `index`, `None` while face down.
    #[must_use]
    pub fn visible(&self, index: usize) -> Option<char> {
        if self.is_revealed(index) {
            self.cards.get(index).copied()
        } else {
            None
        }
    }
}

/// Persisted summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub best_moves: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryAction {
    Flip(usize),
    /// Timer expiry after a mismatch.
    HideMismatch,
    NewGame,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryEvent {
    /// First card of a pair turned over.
    Revealed { index: usize, symbol: char },
    Matched { first: usize, second: usize, symbol: char },
    /// The two cards stay face up until hidden.
    Mismatched { first: usize, second: usize },
    /// The last pair was matched.
    Completed { moves: u32, new_best: bool },
    Hidden,
    NewGame,
}

/// Pair-matching card engine.
#[derive(Clone, Debug, Default)]
pub struct MemoryMatch {
    config: MemoryConfig,
}

impl MemoryMatch {
    pub fn new(config: MemoryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Two copies of every symbol, uniformly shuffled.
    pub fn deal<R: RandomSource>(&self, best_moves: Option<u32>, rng: &mut R) -> MemoryState {
        let mut cards: Vec<char> = self
            .config
            .symbols
            .iter()
            .chain(self.config.symbols.iter())
            .copied()
            .collect();
        rng.shuffle(&mut cards);
        MemoryState::from_cards(cards, best_moves)
    }

    /// Turn one card face up.
    #[must_use]
    pub fn flip(&self, state: &MemoryState, index: usize) -> Transition<MemoryState, MemoryEvent> {
        if state.is_complete() {
            return Transition::terminal(state.clone());
        }
        let Some(&symbol) = state.cards.get(index) else {
            return Transition::rejected(state.clone(), Rejection::OutOfRange);
        };
        if state.awaiting_hide() {
            return Transition::rejected(state.clone(), Rejection::AwaitingHide);
        }
        if state.is_revealed(index) {
            return Transition::rejected(state.clone(), Rejection::AlreadyRevealed);
        }

        let mut next = state.clone();
        let Some(&first) = state.face_up.first() else {
            next.face_up.push(index);
            return Transition::applied(next, MemoryEvent::Revealed { index, symbol });
        };

        next.moves += 1;
        if state.cards[first] != symbol {
            next.face_up.push(index);
            return Transition::applied(next, MemoryEvent::Mismatched { first, second: index });
        }

        next.face_up.clear();
        next.matched.insert(first);
        next.matched.insert(index);

        if !next.is_complete() {
            return Transition::applied(next, MemoryEvent::Matched { first, second: index, symbol });
        }

        let moves = next.moves;
        let new_best = next.best_moves.map_or(true, |best| moves < best);
        if new_best {
            next.best_moves = Some(moves);
        }
        debug!(moves, new_best, "memory game completed");
        Transition::applied(next, MemoryEvent::Completed { moves, new_best })
    }

    /// Turn a showing mismatch face down again.
    #[must_use]
    pub fn hide_mismatch(&self, state: &MemoryState) -> Transition<MemoryState, MemoryEvent> {
        if !state.awaiting_hide() {
            return Transition::rejected(state.clone(), Rejection::NoEffect);
        }
        let mut next = state.clone();
        next.face_up.clear();
        Transition::applied(next, MemoryEvent::Hidden)
    }
}

impl GameEngine for MemoryMatch {
    type State = MemoryState;
    type Action = MemoryAction;
    type Event = MemoryEvent;
    type Record = MemoryRecord;

    const STORAGE_KEY: &'static str = "memory.best_moves";

    fn new_game<R: RandomSource>(&self, rng: &mut R) -> MemoryState {
        self.deal(None, rng)
    }

    fn apply<R: RandomSource>(
        &self,
        state: &MemoryState,
        action: &MemoryAction,
        rng: &mut R,
    ) -> Transition<MemoryState, MemoryEvent> {
        match *action {
            MemoryAction::Flip(index) => self.flip(state, index),
            MemoryAction::HideMismatch => self.hide_mismatch(state),
            MemoryAction::NewGame => {
                Transition::applied(self.deal(state.best_moves, rng), MemoryEvent::NewGame)
            }
        }
    }

    fn is_terminal(&self, state: &MemoryState) -> Option<GameResult> {
        state.is_complete().then_some(GameResult::Won)
    }

    fn record(&self, state: &MemoryState) -> MemoryRecord {
        MemoryRecord { best_moves: state.best_moves }
    }

    fn restore<R: RandomSource>(&self, record: MemoryRecord, rng: &mut R) -> MemoryState {
        self.deal(record.best_moves, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::outcome::Outcome;
    use crate::core::rng::ScriptedRng;

    fn layout() -> MemoryState {
        MemoryState::from_cards("ABAB".chars(), None)
    }

    #[test]
    fn test_deal_has_every_symbol_twice() {
        let engine = MemoryMatch::default();
        let mut rng = ScriptedRng::new(vec![0.3, 0.7, 0.1, 0.9]);
        let state = engine.new_game(&mut rng);

        assert_eq!(state.cards.len(), 16);
        for symbol in &engine.config().symbols {
            assert_eq!(state.cards.iter().filter(|c| *c == symbol).count(), 2);
        }
        assert!(state.face_up.is_empty());
        assert!(state.matched.is_empty());
        assert_eq!(state.moves, 0);
    }

    #[test]
    fn test_match_clears_face_up() {
        let engine = MemoryMatch::default();
        let t = engine.flip(&layout(), 0);
        assert_eq!(t.outcome, Outcome::Applied(MemoryEvent::Revealed { index: 0, symbol: 'A' }));
        assert_eq!(t.state.moves, 0);

        let t = engine.flip(&t.state, 2);
        assert_eq!(
            t.outcome,
            Outcome::Applied(MemoryEvent::Matched { first: 0, second: 2, symbol: 'A' })
        );
        assert!(t.state.face_up.is_empty());
        assert_eq!(t.state.matched.len(), 2);
        assert_eq!(t.state.moves, 1);
        assert_eq!(t.state.visible(0), Some('A'));
        assert_eq!(t.state.visible(1), None);
    }

    #[test]
    fn test_mismatch_waits_for_hide() {
        let engine = MemoryMatch::default();
        let state = engine.flip(&layout(), 0).state;
        let t = engine.flip(&state, 1);
        assert_eq!(t.outcome, Outcome::Applied(MemoryEvent::Mismatched { first: 0, second: 1 }));
        assert!(t.state.awaiting_hide());
        assert_eq!(t.state.moves, 1);

        let blocked = engine.flip(&t.state, 2);
        assert_eq!(blocked.outcome.rejection(), Some(Rejection::AwaitingHide));
        assert_eq!(blocked.state, t.state);

        let hidden = engine.hide_mismatch(&t.state);
        assert_eq!(hidden.outcome, Outcome::Applied(MemoryEvent::Hidden));
        assert!(hidden.state.face_up.is_empty());
        assert_eq!(hidden.state.moves, 1);

        assert_eq!(
            engine.hide_mismatch(&hidden.state).outcome.rejection(),
            Some(Rejection::NoEffect)
        );
    }

    #[test]
    fn test_flip_rejections() {
        let engine = MemoryMatch::default();
        let state = engine.flip(&layout(), 0).state;
        assert_eq!(engine.flip(&state, 0).outcome.rejection(), Some(Rejection::AlreadyRevealed));
        assert_eq!(engine.flip(&state, 4).outcome.rejection(), Some(Rejection::OutOfRange));

        let matched = engine.flip(&state, 2).state;
        assert_eq!(engine.flip(&matched, 2).outcome.rejection(), Some(Rejection::AlreadyRevealed));
    }

    #[test]
    fn test_completion_updates_best_downward_only() {
        let engine = MemoryMatch::default();
        let play = |state: &MemoryState, flips: &[usize]| {
            flips.iter().fold(state.clone(), |s, &i| engine.flip(&s, i).state)
        };

        let mut state = MemoryState::from_cards("ABAB".chars(), Some(3));
        state = play(&state, &[0, 2, 1]);
        let t = engine.flip(&state, 3);
        assert_eq!(t.outcome, Outcome::Applied(MemoryEvent::Completed { moves: 2, new_best: true }));
        assert_eq!(t.state.best_moves, Some(2));
        assert_eq!(engine.is_terminal(&t.state), Some(GameResult::Won));
        assert_eq!(engine.flip(&t.state, 0).outcome, Outcome::Terminal);

        // Three moves does not beat two.
        let slow = MemoryState::from_cards("ABAB".chars(), Some(2));
        let slow = play(&slow, &[0, 1]);
        let slow = engine.hide_mismatch(&slow).state;
        let t = engine.flip(&play(&slow, &[0, 2, 1]), 3);
        assert_eq!(t.outcome, Outcome::Applied(MemoryEvent::Completed { moves: 3, new_best: false }));
        assert_eq!(t.state.best_moves, Some(2));
    }

    #[test]
    fn test_new_game_keeps_best() {
        let engine = MemoryMatch::default();
        let state = MemoryState::from_cards("ABAB".chars(), Some(9));
        let mut rng = ScriptedRng::new(vec![0.5]);
        let t = engine.apply(&state, &MemoryAction::NewGame, &mut rng);
        assert_eq!(t.state.best_moves, Some(9));
        assert_eq!(t.state.cards.len(), 16);
        assert_eq!(engine.record(&t.state), MemoryRecord { best_moves: Some(9) });
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert_eq!(
            MemoryMatch::new(MemoryConfig::default().with_symbols(Vec::<char>::new())).unwrap_err(),
            ConfigError::NoSymbols
        );
        assert_eq!(
            MemoryMatch::new(MemoryConfig::default().with_symbols(vec!['a', 'b', 'a'])).unwrap_err(),
            ConfigError::DuplicateSymbol('a')
        );
    }
}
