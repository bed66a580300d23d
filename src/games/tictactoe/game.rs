//! Tic-tac-toe engine.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::board::{Board, Cell, Line, Mark};
use super::opponent::choose_move;
use crate::core::outcome::{Rejection, Transition};
use crate::core::rng::RandomSource;
use crate::rules::{GameEngine, GameResult};

/// Who is playing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Two humans share the board.
    #[default]
    TwoPlayer,
    /// A human plays `human` against the computer.
    VsComputer,
}

/// Cumulative results. Survive board resets until explicitly cleared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToeStats {
    pub x_wins: u32,
    pub o_wins: u32,
    pub draws: u32,
}

impl TicTacToeStats {
    #[must_use]
    pub fn games(&self) -> u32 {
        self.x_wins + self.o_wins + self.draws
    }
}

/// Complete tic-tac-toe snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToeState {
    pub board: Board,
    pub current: Mark,
    pub winner: Option<Mark>,
    pub winning_line: Option<Line>,
    pub over: bool,
    pub mode: Mode,
    /// The human's symbol in `VsComputer` mode.
    pub human: Mark,
    pub stats: TicTacToeStats,
}

impl TicTacToeState {
    /// Empty board with the given settings; X moves first.
    #[must_use]
    pub fn fresh(mode: Mode, human: Mark, stats: TicTacToeStats) -> Self {
        Self {
            board: Board::empty(),
            current: Mark::X,
            winner: None,
            winning_line: None,
            over: false,
            mode,
            human,
            stats,
        }
    }

    /// Full board with no winner.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.over && self.winner.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TicTacToeAction {
    Place { row: usize, col: usize },
    /// Play against the computer as `Mark`.
    ChooseSymbol(Mark),
    /// Switch back to two humans.
    TwoPlayer,
    Reset,
    ResetStats,
    ComputerMove,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TicTacToeEvent {
    /// A mark was placed and play continues.
    Placed { cell: Cell, mark: Mark },
    Won { cell: Cell, mark: Mark, line: Line },
    Draw { cell: Cell, mark: Mark },
    ModeChanged(Mode),
    BoardReset,
    StatsReset,
}

/// Tic-tac-toe engine with an optional rule-based opponent.
#[derive(Clone, Copy, Debug, Default)]
pub struct TicTacToe;

impl TicTacToe {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Whether the caller should schedule `computer_move`.
    #[must_use]
    pub fn computer_to_move(&self, state: &TicTacToeState) -> bool {
        state.mode == Mode::VsComputer && !state.over && state.current != state.human
    }

    /// Human placement.
    #[must_use]
    pub fn place(
        &self,
        state: &TicTacToeState,
        row: usize,
        col: usize,
    ) -> Transition<TicTacToeState, TicTacToeEvent> {
        if state.over {
            return Transition::terminal(state.clone());
        }
        if row >= 3 || col >= 3 {
            return Transition::rejected(state.clone(), Rejection::OutOfRange);
        }
        if state.mode == Mode::VsComputer && state.current != state.human {
            return Transition::rejected(state.clone(), Rejection::NotYourTurn);
        }
        if !state.board.is_free((row, col)) {
            return Transition::rejected(state.clone(), Rejection::Occupied);
        }
        mark_cell(state, (row, col))
    }

    /// Let the computer play its turn.
    pub fn computer_move<R: RandomSource>(
        &self,
        state: &TicTacToeState,
        rng: &mut R,
    ) -> Transition<TicTacToeState, TicTacToeEvent> {
        if state.over {
            return Transition::terminal(state.clone());
        }
        if state.mode != Mode::VsComputer {
            return Transition::rejected(state.clone(), Rejection::WrongMode);
        }
        if state.current == state.human {
            return Transition::rejected(state.clone(), Rejection::NotYourTurn);
        }

        match choose_move(&state.board, state.current, rng) {
            Some((cell, reason)) => {
                debug!(mark = %state.current, ?cell, ?reason, "computer move");
                mark_cell(state, cell)
            }
            // Unreachable while not over: a full board is always terminal.
            None => Transition::terminal(state.clone()),
        }
    }

    /// Enter `VsComputer` mode as `symbol` and clear the board.
    #[must_use]
    pub fn choose_symbol(
        &self,
        state: &TicTacToeState,
        symbol: Mark,
    ) -> Transition<TicTacToeState, TicTacToeEvent> {
        let next = TicTacToeState::fresh(Mode::VsComputer, symbol, state.stats);
        Transition::applied(next, TicTacToeEvent::ModeChanged(Mode::VsComputer))
    }

    /// Back to two humans on a clear board.
    #[must_use]
    pub fn two_player(&self, state: &TicTacToeState) -> Transition<TicTacToeState, TicTacToeEvent> {
        let next = TicTacToeState::fresh(Mode::TwoPlayer, state.human, state.stats);
        Transition::applied(next, TicTacToeEvent::ModeChanged(Mode::TwoPlayer))
    }

    /// Clear the board, keep mode and stats.
    #[must_use]
    pub fn reset(&self, state: &TicTacToeState) -> Transition<TicTacToeState, TicTacToeEvent> {
        let next = TicTacToeState::fresh(state.mode, state.human, state.stats);
        Transition::applied(next, TicTacToeEvent::BoardReset)
    }

    /// Zero the win and draw counters.
    #[must_use]
    pub fn reset_stats(&self, state: &TicTacToeState) -> Transition<TicTacToeState, TicTacToeEvent> {
        let mut next = state.clone();
        next.stats = TicTacToeStats::default();
        Transition::applied(next, TicTacToeEvent::StatsReset)
    }
}

/// Place the side to move on `cell` and settle win, draw or turn.
fn mark_cell(state: &TicTacToeState, cell: Cell) -> Transition<TicTacToeState, TicTacToeEvent> {
    let mark = state.current;
    let mut next = state.clone();
    next.board = state.board.with(cell, mark);

    if let Some((winner, line)) = next.board.winner() {
        next.winner = Some(winner);
        next.winning_line = Some(line);
        next.over = true;
        match winner {
            Mark::X => next.stats.x_wins += 1,
            Mark::O => next.stats.o_wins += 1,
        }
        debug!(%winner, "tic-tac-toe won");
        return Transition::applied(next, TicTacToeEvent::Won { cell, mark, line });
    }

    if next.board.is_full() {
        next.over = true;
        next.stats.draws += 1;
        debug!("tic-tac-toe draw");
        return Transition::applied(next, TicTacToeEvent::Draw { cell, mark });
    }

    next.current = mark.other();
    Transition::applied(next, TicTacToeEvent::Placed { cell, mark })
}

impl GameEngine for TicTacToe {
    type State = TicTacToeState;
    type Action = TicTacToeAction;
    type Event = TicTacToeEvent;
    type Record = TicTacToeStats;

    const STORAGE_KEY: &'static str = "tic_tac_toe.stats";

    fn new_game<R: RandomSource>(&self, _rng: &mut R) -> TicTacToeState {
        TicTacToeState::fresh(Mode::TwoPlayer, Mark::X, TicTacToeStats::default())
    }

    fn apply<R: RandomSource>(
        &self,
        state: &TicTacToeState,
        action: &TicTacToeAction,
        rng: &mut R,
    ) -> Transition<TicTacToeState, TicTacToeEvent> {
        match *action {
            TicTacToeAction::Place { row, col } => self.place(state, row, col),
            TicTacToeAction::ChooseSymbol(symbol) => self.choose_symbol(state, symbol),
            TicTacToeAction::TwoPlayer => self.two_player(state),
            TicTacToeAction::Reset => self.reset(state),
            TicTacToeAction::ResetStats => self.reset_stats(state),
            TicTacToeAction::ComputerMove => self.computer_move(state, rng),
        }
    }

    fn is_terminal(&self, state: &TicTacToeState) -> Option<GameResult> {
        if !state.over {
            return None;
        }
        Some(match (state.winner, state.mode) {
            (None, _) => GameResult::Draw,
            (Some(_), Mode::TwoPlayer) => GameResult::Won,
            (Some(w), Mode::VsComputer) if w == state.human => GameResult::Won,
            (Some(_), Mode::VsComputer) => GameResult::Lost,
        })
    }

    fn record(&self, state: &TicTacToeState) -> TicTacToeStats {
        state.stats
    }

    fn restore<R: RandomSource>(&self, record: TicTacToeStats, _rng: &mut R) -> TicTacToeState {
        TicTacToeState::fresh(Mode::TwoPlayer, Mark::X, record)
    }
}
