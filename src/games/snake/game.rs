//! Snake engine.

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::config::{ConfigError, SnakeConfig};
use crate::core::grid::{Direction, Position};
use crate::core::outcome::{Rejection, Transition};
use crate::core::rng::RandomSource;
use crate::rules::{GameEngine, GameResult};

/// Complete snake snapshot.
///
/// `snake` is head first. `direction` is the heading used by the last tick;
/// `queued` is the latest accepted turn, applied at the next tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeState {
    pub snake: Vector<Position>,
    pub food: Position,
    pub direction: Direction,
    pub queued: Option<Direction>,
    pub score: u32,
    pub high_score: u32,
    /// Current timer period; the caller restarts its timer when this changes.
    pub tick_interval_ms: u32,
    pub over: bool,
    pub paused: bool,
}

impl SnakeState {
    #[must_use]
    pub fn head(&self) -> Position {
        self.snake[0]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snake.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snake.is_empty()
    }

    /// Direction the next tick will move in.
    #[must_use]
    pub fn heading(&self) -> Direction {
        self.queued.unwrap_or(self.direction)
    }
}

/// Persisted summary: only the high score survives between sessions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeRecord {
    pub high_score: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnakeAction {
    Turn(Direction),
    Tick,
    TogglePause,
    Restart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnakeEvent {
    /// Turn buffered for the next tick.
    Turned(Direction),
    /// Head advanced, length unchanged.
    Moved { head: Position },
    /// Food eaten. `speedup` carries the new interval when it changed.
    Ate { score: u32, food: Position, speedup: Option<u32> },
    /// Hit a wall or the body.
    Collided { score: u32, new_high_score: bool },
    /// The snake covers every cell; nowhere left for food.
    BoardFilled { score: u32 },
    Paused,
    Resumed,
    Restarted,
}

/// Tick-driven snake engine.
#[derive(Clone, Debug, Default)]
pub struct Snake {
    config: SnakeConfig,
}

impl Snake {
    pub fn new(config: SnakeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &SnakeConfig {
        &self.config
    }

    /// Fresh one-segment snake, keeping the high score.
    pub fn start<R: RandomSource>(&self, high_score: u32, rng: &mut R) -> SnakeState {
        let snake: Vector<Position> = std::iter::once(self.config.start).collect();
        let food = self.place_food(&snake, rng).unwrap_or(self.config.start);
        SnakeState {
            snake,
            food,
            direction: self.config.start_direction,
            queued: None,
            score: 0,
            high_score,
            tick_interval_ms: self.config.initial_interval_ms,
            over: false,
            paused: false,
        }
    }

    /// Uniform pick among cells the snake does not cover.
    fn place_food<R: RandomSource>(
        &self,
        snake: &Vector<Position>,
        rng: &mut R,
    ) -> Option<Position> {
        let occupied: FxHashSet<Position> = snake.iter().copied().collect();
        let size = self.config.grid_size;
        let free: Vec<Position> = (0..size)
            .flat_map(|y| (0..size).map(move |x| Position::new(x, y)))
            .filter(|p| !occupied.contains(p))
            .collect();
        rng.choose(&free).copied()
    }

    /// Buffer a turn for the next tick.
    ///
    /// Rejected when it points straight back along the current heading.
    #[must_use]
    pub fn set_direction(
        &self,
        state: &SnakeState,
        direction: Direction,
    ) -> Transition<SnakeState, SnakeEvent> {
        if state.over {
            return Transition::terminal(state.clone());
        }
        if state.paused {
            return Transition::rejected(state.clone(), Rejection::Paused);
        }
        if direction == state.direction.opposite() {
            return Transition::rejected(state.clone(), Rejection::OppositeDirection);
        }

        let mut next = state.clone();
        next.queued = Some(direction);
        Transition::applied(next, SnakeEvent::Turned(direction))
    }

    /// Advance one step.
    pub fn tick<R: RandomSource>(
        &self,
        state: &SnakeState,
        rng: &mut R,
    ) -> Transition<SnakeState, SnakeEvent> {
        if state.over {
            return Transition::terminal(state.clone());
        }
        if state.paused {
            return Transition::rejected(state.clone(), Rejection::Paused);
        }

        let direction = state.heading();
        let head = state.head().step(direction);

        if !head.in_bounds(self.config.grid_size) || state.snake.contains(&head) {
            let mut next = state.clone();
            next.over = true;
            let new_high_score = state.score > state.high_score;
            next.high_score = state.high_score.max(state.score);
            debug!(score = state.score, %head, "snake collided");
            return Transition::applied(
                next,
                SnakeEvent::Collided {
                    score: state.score,
                    new_high_score,
                },
            );
        }

        let mut next = state.clone();
        next.direction = direction;
        next.queued = None;
        next.snake.push_front(head);

        if head != state.food {
            next.snake.pop_back();
            trace!(%head, "snake moved");
            return Transition::applied(next, SnakeEvent::Moved { head });
        }

        next.score += 1;
        let Some(food) = self.place_food(&next.snake, rng) else {
            next.over = true;
            next.high_score = next.high_score.max(next.score);
            let score = next.score;
            debug!(score, "snake filled the board");
            return Transition::applied(next, SnakeEvent::BoardFilled { score });
        };
        next.food = food;

        let mut speedup = None;
        if next.score % self.config.points_per_speedup == 0
            && next.tick_interval_ms > self.config.min_interval_ms
        {
            next.tick_interval_ms = next
                .tick_interval_ms
                .saturating_sub(self.config.interval_step_ms)
                .max(self.config.min_interval_ms);
            speedup = Some(next.tick_interval_ms);
            debug!(score = next.score, interval_ms = next.tick_interval_ms, "snake sped up");
        }

        let score = next.score;
        Transition::applied(next, SnakeEvent::Ate { score, food, speedup })
    }

    /// Pause or resume. Ignored once the game is over.
    #[must_use]
    pub fn toggle_pause(&self, state: &SnakeState) -> Transition<SnakeState, SnakeEvent> {
        if state.over {
            return Transition::terminal(state.clone());
        }
        let mut next = state.clone();
        next.paused = !state.paused;
        let event = if next.paused {
            SnakeEvent::Paused
        } else {
            SnakeEvent::Resumed
        };
        Transition::applied(next, event)
    }
}

impl GameEngine for Snake {
    type State = SnakeState;
    type Action = SnakeAction;
    type Event = SnakeEvent;
    type Record = SnakeRecord;

    const STORAGE_KEY: &'static str = "snake.high_score";

    fn new_game<R: RandomSource>(&self, rng: &mut R) -> SnakeState {
        self.start(0, rng)
    }

    fn apply<R: RandomSource>(
        &self,
        state: &SnakeState,
        action: &SnakeAction,
        rng: &mut R,
    ) -> Transition<SnakeState, SnakeEvent> {
        match *action {
            SnakeAction::Turn(direction) => self.set_direction(state, direction),
            SnakeAction::Tick => self.tick(state, rng),
            SnakeAction::TogglePause => self.toggle_pause(state),
            SnakeAction::Restart => {
                Transition::applied(self.start(state.high_score, rng), SnakeEvent::Restarted)
            }
        }
    }

    fn is_terminal(&self, state: &SnakeState) -> Option<GameResult> {
        if !state.over {
            return None;
        }
        let cells = (self.config.grid_size * self.config.grid_size) as usize;
        if state.len() == cells {
            Some(GameResult::Won)
        } else {
            Some(GameResult::Lost)
        }
    }

    fn record(&self, state: &SnakeState) -> SnakeRecord {
        SnakeRecord {
            high_score: state.high_score,
        }
    }

    fn restore<R: RandomSource>(&self, record: SnakeRecord, rng: &mut R) -> SnakeState {
        self.start(record.high_score, rng)
    }
}
