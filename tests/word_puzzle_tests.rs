//! Word-puzzle integration tests.

use pocket_arcade::core::config::WordPuzzleConfig;
use pocket_arcade::games::word_puzzle::{
    WordPuzzle, WordPuzzleAction, WordPuzzleEvent, WordPuzzleState,
};
use pocket_arcade::{Exhaustion, GameEngine, GameRng, Outcome};

fn engine(words: &[&str]) -> WordPuzzle {
    WordPuzzle::new(WordPuzzleConfig::default().with_words(words.iter().copied())).unwrap()
}

fn solve(engine: &WordPuzzle, state: &WordPuzzleState, rng: &mut GameRng) -> WordPuzzleState {
    let guess = WordPuzzleAction::Guess(state.target.to_lowercase());
    engine.apply(state, &guess, rng).state
}

// =============================================================================
// Progression
// =============================================================================

#[test]
fn test_solving_every_word_cycles_the_bank() {
    let engine = engine(&["REACT", "HOOK", "STATE"]);
    let mut rng = GameRng::new(5);
    let mut state = engine.new_game(&mut rng);
    let mut seen = Vec::new();

    for _ in 0..3 {
        seen.push(state.word_index);
        state = solve(&engine, &state, &mut rng);
    }
    seen.sort_unstable();
    assert_eq!(seen, vec![0, 1, 2]);
    assert_eq!(state.completed.len(), 3);
    assert_eq!(state.level(), 4);
    assert_eq!(state.score, 50 + 40 + 50);

    // With every word done any word may come up again.
    assert!(engine.bank().get(state.word_index).is_some());
}

#[test]
fn test_solved_word_is_not_offered_again() {
    let engine = engine(&["REACT", "HOOK"]);
    let mut rng = GameRng::new(11);
    let state = engine.new_game(&mut rng);
    let first = state.word_index;

    let mut state = solve(&engine, &state, &mut rng);
    for _ in 0..10 {
        assert_ne!(state.word_index, first);
        state = engine.apply(&state, &WordPuzzleAction::Skip, &mut rng).state;
    }
}

#[test]
fn test_three_misses_reveal_answer() {
    let engine = WordPuzzle::default();
    let mut rng = GameRng::new(21);
    let mut state = engine.new_game(&mut rng);
    let answer = state.target.clone();

    let mut last = None;
    for guess in ["XQ", "QX", "QQ"] {
        let t = engine.apply(&state, &WordPuzzleAction::Guess(guess.into()), &mut rng);
        state = t.state;
        last = Some(t.outcome);
    }
    assert_eq!(last, Some(Outcome::Exhausted(Exhaustion::NoAttemptsLeft { answer })));
    assert_eq!(state.remaining_attempts, 3);
    assert!(state.completed.is_empty());
}

#[test]
fn test_hints_then_selection_solve_the_word() {
    let engine = engine(&["STATE"]);
    let mut rng = GameRng::new(2);
    let mut state = engine.new_game(&mut rng);

    // S, T, A, E: the second T is not a new hint.
    let mut hints = 0;
    loop {
        let t = engine.apply(&state, &WordPuzzleAction::Hint, &mut rng);
        if t.outcome == Outcome::Exhausted(Exhaustion::NoHintsLeft) {
            assert_eq!(t.state, state);
            break;
        }
        state = t.state;
        hints += 1;
    }
    assert_eq!(hints, 4);
    assert_eq!(state.revealed_letters(), "STAE");
    assert_eq!(state.draft(), "E");

    // Clear the hint tile, then spell the answer tile by tile.
    state = engine.apply(&state, &WordPuzzleAction::ToggleLetter(state.selection[0]), &mut rng).state;
    let mut tiles: Vec<Option<char>> = state.scrambled.chars().map(Some).collect();
    for letter in state.target.clone().chars() {
        let index = tiles.iter().position(|&t| t == Some(letter)).unwrap();
        tiles[index] = None;
        state = engine.apply(&state, &WordPuzzleAction::ToggleLetter(index), &mut rng).state;
    }
    assert_eq!(state.draft(), "STATE");

    let t = engine.apply(&state, &WordPuzzleAction::SubmitSelection, &mut rng);
    assert_eq!(
        t.outcome,
        Outcome::Applied(WordPuzzleEvent::Solved { answer: "STATE".into(), points: 50 })
    );
}

#[test]
fn test_reset_keeps_best() {
    let engine = engine(&["REACT", "HOOK"]);
    let mut rng = GameRng::new(4);
    let state = engine.new_game(&mut rng);
    let state = solve(&engine, &state, &mut rng);
    assert!(state.best_score > 0);

    let t = engine.apply(&state, &WordPuzzleAction::Reset, &mut rng);
    assert_eq!(t.outcome, Outcome::Applied(WordPuzzleEvent::Reset));
    assert_eq!(t.state.score, 0);
    assert_eq!(t.state.best_score, state.best_score);
    assert_eq!(t.state.level(), 1);
}

#[test]
fn test_replay_is_deterministic() {
    let engine = engine(&["REACT", "HOOK", "STATE", "MOBILE"]);
    let actions = [
        WordPuzzleAction::Hint,
        WordPuzzleAction::Guess("nope".into()),
        WordPuzzleAction::Skip,
        WordPuzzleAction::Guess("hook".into()),
        WordPuzzleAction::ToggleLetter(0),
        WordPuzzleAction::SubmitSelection,
        WordPuzzleAction::Skip,
        WordPuzzleAction::Guess("react".into()),
    ];

    let run = |seed| {
        let mut rng = GameRng::new(seed);
        let initial = engine.new_game(&mut rng);
        engine.replay(&initial, &actions, &mut rng)
    };
    assert_eq!(run(8), run(8));
}
