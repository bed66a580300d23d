//! Tile-merge engine.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::board::{Board, Spawn};
use crate::core::config::{ConfigError, TileMergeConfig};
use crate::core::grid::Direction;
use crate::core::outcome::{Rejection, Transition};
use crate::core::rng::RandomSource;
use crate::rules::{GameEngine, GameResult};

/// Complete tile-merge snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMergeState {
    pub board: Board,
    pub score: u32,
    pub best_score: u32,
    /// No move can change the board.
    pub over: bool,
    /// The goal tile was reached at some point this game.
    pub won: bool,
}

/// Player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileMergeAction {
    Move(Direction),
    NewGame,
}

/// What an accepted move did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveSummary {
    pub direction: Direction,
    pub score_delta: u32,
    /// `None` only when the board was full after the slide.
    pub spawned: Option<Spawn>,
    /// The goal tile appeared for the first time this game.
    pub reached_goal: bool,
    pub game_over: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileMergeEvent {
    Moved(MoveSummary),
    NewGame,
}

/// 2048-style sliding tile engine.
#[derive(Clone, Debug, Default)]
pub struct TileMerge {
    config: TileMergeConfig,
}

impl TileMerge {
    pub fn new(config: TileMergeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &TileMergeConfig {
        &self.config
    }

    /// Fresh board with the starting tiles, keeping the best score.
    pub fn start<R: RandomSource>(&self, best_score: u32, rng: &mut R) -> TileMergeState {
        let mut board = Board::empty();
        for _ in 0..self.config.starting_tiles {
            self.spawn_into(&mut board, rng);
        }
        TileMergeState {
            board,
            score: 0,
            best_score,
            over: false,
            won: false,
        }
    }

    /// Place one tile on a random empty cell. No-op on a full board.
    #[must_use]
    pub fn spawn_tile<R: RandomSource>(
        &self,
        state: &TileMergeState,
        rng: &mut R,
    ) -> TileMergeState {
        let mut next = state.clone();
        self.spawn_into(&mut next.board, rng);
        next
    }

    fn spawn_into<R: RandomSource>(&self, board: &mut Board, rng: &mut R) -> Option<Spawn> {
        let empty = board.empty_cells();
        let &(row, col) = rng.choose(&empty)?;
        let value = if rng.gen_bool(self.config.four_probability) { 4 } else { 2 };
        board.set(row, col, value);
        Some(Spawn { row, col, value })
    }

    /// Slide the board, then spawn a tile if anything moved.
    ///
    /// A move that changes nothing is rejected and draws no randomness.
    pub fn move_tiles<R: RandomSource>(
        &self,
        state: &TileMergeState,
        direction: Direction,
        rng: &mut R,
    ) -> Transition<TileMergeState, TileMergeEvent> {
        if state.over {
            return Transition::terminal(state.clone());
        }

        let shift = state.board.shift(direction);
        if !shift.changed {
            return Transition::rejected(state.clone(), Rejection::NoEffect);
        }

        let mut board = shift.board;
        let spawned = self.spawn_into(&mut board, rng);

        let score = state.score.saturating_add(shift.gained);
        let won = state.won || board.contains(self.config.goal_tile);
        let over = board.is_stuck();

        let reached_goal = won && !state.won;
        if reached_goal {
            debug!(score, goal = self.config.goal_tile, "goal tile reached");
        }
        if over {
            debug!(score, max_tile = board.max_tile(), "no moves left");
        }

        let next = TileMergeState {
            board,
            score,
            best_score: state.best_score.max(score),
            over,
            won,
        };

        Transition::applied(
            next,
            TileMergeEvent::Moved(MoveSummary {
                direction,
                score_delta: shift.gained,
                spawned,
                reached_goal,
                game_over: over,
            }),
        )
    }
}

impl GameEngine for TileMerge {
    type State = TileMergeState;
    type Action = TileMergeAction;
    type Event = TileMergeEvent;
    type Record = TileMergeState;

    const STORAGE_KEY: &'static str = "tile_merge.state";

    fn new_game<R: RandomSource>(&self, rng: &mut R) -> TileMergeState {
        self.start(0, rng)
    }

    fn apply<R: RandomSource>(
        &self,
        state: &TileMergeState,
        action: &TileMergeAction,
        rng: &mut R,
    ) -> Transition<TileMergeState, TileMergeEvent> {
        match *action {
            TileMergeAction::Move(direction) => self.move_tiles(state, direction, rng),
            TileMergeAction::NewGame => {
                Transition::applied(self.start(state.best_score, rng), TileMergeEvent::NewGame)
            }
        }
    }

    fn is_terminal(&self, state: &TileMergeState) -> Option<GameResult> {
        match (state.over, state.won) {
            (false, _) => None,
            (true, true) => Some(GameResult::Won),
            (true, false) => Some(GameResult::Lost),
        }
    }

    fn record(&self, state: &TileMergeState) -> TileMergeState {
        state.clone()
    }

    /// A saved board that is empty or holds impossible tiles gets fresh
    /// tiles, keeping the best score. The flags are recomputed from the board.
    fn restore<R: RandomSource>(&self, record: TileMergeState, rng: &mut R) -> TileMergeState {
        if record.board.is_empty() || !record.board.is_well_formed() {
            debug!(best = record.best_score, "unusable tile board in save, starting fresh");
            return self.start(record.best_score, rng);
        }
        TileMergeState {
            over: record.board.is_stuck(),
            won: record.won || record.board.max_tile() >= self.config.goal_tile,
            best_score: record.best_score.max(record.score),
            ..record
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::ScriptedRng;

    fn state_with(rows: [[u32; 4]; 4]) -> TileMergeState {
        TileMergeState {
            board: Board::from_rows(rows),
            score: 0,
            best_score: 0,
            over: false,
            won: false,
        }
    }

    #[test]
    fn test_new_game_has_two_tiles() {
        let engine = TileMerge::default();
        let mut rng = ScriptedRng::new(vec![0.0, 0.5, 0.99, 0.05]);
        let state = engine.new_game(&mut rng);

        assert_eq!(state.board.empty_cells().len(), 14);
        // First pick: cell 0 with a 2. Second pick: last remaining cell with a 4.
        assert_eq!(state.board.get(0, 0), 2);
        assert_eq!(state.board.get(3, 3), 4);
        assert_eq!(state.score, 0);
        assert!(!state.over && !state.won);
    }

    #[test]
    fn test_move_scores_and_spawns() {
        let engine = TileMerge::default();
        let state = state_with([[2, 2, 2, 0], [0; 4], [0; 4], [0; 4]]);
        let mut rng = ScriptedRng::new(vec![0.0, 0.5]);

        let t = engine.move_tiles(&state, Direction::Left, &mut rng);
        let event = t.outcome.event().copied();

        assert_eq!(t.state.board.rows()[0], [4, 2, 2, 0]);
        assert_eq!(t.state.score, 4);
        assert_eq!(t.state.best_score, 4);
        match event {
            Some(TileMergeEvent::Moved(summary)) => {
                assert_eq!(summary.score_delta, 4);
                // First empty cell in row-major order after the slide.
                assert_eq!(summary.spawned, Some(Spawn { row: 0, col: 2, value: 2 }));
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(rng.drawn(), 2);
    }

    #[test]
    fn test_no_change_is_rejected_without_spawn() {
        let engine = TileMerge::default();
        let state = state_with([[2, 4, 8, 16], [0; 4], [0; 4], [0; 4]]);
        let mut rng = ScriptedRng::new(vec![0.3]);

        let t = engine.move_tiles(&state, Direction::Left, &mut rng);
        assert_eq!(t.outcome.rejection(), Some(Rejection::NoEffect));
        assert_eq!(t.state, state);
        assert_eq!(rng.drawn(), 0);
    }

    #[test]
    fn test_goal_recorded_once_and_play_continues() {
        let engine = TileMerge::default();
        let state = state_with([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut rng = ScriptedRng::new(vec![0.5]);

        let t = engine.move_tiles(&state, Direction::Left, &mut rng);
        let first = t.state.clone();
        assert!(first.won);
        assert!(!first.over);
        assert!(matches!(
            t.outcome.event(),
            Some(TileMergeEvent::Moved(MoveSummary { reached_goal: true, .. }))
        ));
        assert_eq!(engine.is_terminal(&first), None);

        let t2 = engine.move_tiles(&first, Direction::Right, &mut rng);
        assert!(t2.state.won);
        assert!(matches!(
            t2.outcome.event(),
            Some(TileMergeEvent::Moved(MoveSummary { reached_goal: false, .. }))
        ));
    }

    #[test]
    fn test_game_over_when_stuck() {
        let engine = TileMerge::default();
        // One slide left fills the last gap and leaves no merges.
        let state = state_with([
            [0, 2, 4, 8],
            [4, 8, 16, 2],
            [8, 16, 2, 4],
            [16, 2, 4, 8],
        ]);
        // Spawn lands in (0, 3) with value 4 -> row [2, 4, 8, 4].
        let mut rng = ScriptedRng::new(vec![0.0, 0.05]);

        let t = engine.move_tiles(&state, Direction::Left, &mut rng);
        assert!(t.state.over);
        assert_eq!(engine.is_terminal(&t.state), Some(GameResult::Lost));

        let after = engine.move_tiles(&t.state, Direction::Right, &mut rng);
        assert_eq!(after.outcome, crate::core::outcome::Outcome::Terminal);
        assert_eq!(after.state, t.state);
    }

    #[test]
    fn test_spawn_on_full_board_is_noop() {
        let engine = TileMerge::default();
        let state = state_with([[2; 4], [4; 4], [2; 4], [4; 4]]);
        let mut rng = ScriptedRng::new(vec![0.1]);
        assert_eq!(engine.spawn_tile(&state, &mut rng), state);
    }

    #[test]
    fn test_new_game_keeps_best() {
        let engine = TileMerge::default();
        let mut state = state_with([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        state.score = 300;
        state.best_score = 500;
        let mut rng = ScriptedRng::new(vec![0.2]);

        let t = engine.apply(&state, &TileMergeAction::NewGame, &mut rng);
        assert_eq!(t.state.score, 0);
        assert_eq!(t.state.best_score, 500);
    }

    #[test]
    fn test_restore_rejects_impossible_tiles() {
        let engine = TileMerge::default();
        let mut rng = ScriptedRng::new(vec![0.4]);
        for rows in [
            [[1 << 31, 1 << 31, 0, 0], [0; 4], [0; 4], [0; 4]],
            [[3, 0, 0, 0], [0; 4], [0; 4], [0; 4]],
            [[1, 2, 0, 0], [0; 4], [0; 4], [0; 4]],
        ] {
            let mut saved = state_with(rows);
            saved.best_score = 96;
            let state = engine.restore(saved, &mut rng);
            assert_eq!(state.board.empty_cells().len(), 14);
            assert!(state.board.is_well_formed());
            assert_eq!(state.best_score, 96);
            assert_eq!(state.score, 0);
        }
    }

    #[test]
    fn test_restore_recomputes_flags() {
        let engine = TileMerge::default();
        let mut rng = ScriptedRng::new(vec![0.4]);
        let mut saved = state_with([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2048]]);
        saved.score = 900;
        let state = engine.restore(saved.clone(), &mut rng);
        assert!(state.over && state.won);
        assert_eq!(state.board, saved.board);
        assert_eq!(state.best_score, 900);
        assert_eq!(engine.is_terminal(&state), Some(GameResult::Won));
    }

    #[test]
    fn test_restore_empty_board_starts_fresh() {
        let engine = TileMerge::default();
        let saved = TileMergeState {
            board: Board::empty(),
            score: 0,
            best_score: 128,
            over: false,
            won: false,
        };
        let mut rng = ScriptedRng::new(vec![0.4]);
        let state = engine.restore(saved, &mut rng);
        assert_eq!(state.board.empty_cells().len(), 14);
        assert_eq!(state.best_score, 128);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert_eq!(
            TileMerge::new(TileMergeConfig::default().with_goal_tile(100)).unwrap_err(),
            ConfigError::GoalTile(100)
        );
        assert!(TileMerge::new(TileMergeConfig::default().with_goal_tile(64)).is_ok());
    }
}
