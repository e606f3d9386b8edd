//! The simulation engine: game state plus the rules that advance it one tick
//! at a time. Nothing in here knows about terminals, files or clocks.

use crate::config::{Rules, BASE_TPS};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::VecDeque;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn step(self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn in_bounds(self, grid_size: i32) -> bool {
        (0..grid_size).contains(&self.x) && (0..grid_size).contains(&self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Unit vector, with y growing downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOverReason {
    Wall,
    SelfCollision,
    /// No free cell was found for food: the board is (nearly) full.
    Win,
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameOverReason::Wall => "wall",
            GameOverReason::SelfCollision => "self-collision",
            GameOverReason::Win => "win",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Paused,
    Over(GameOverReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused or over; nothing changed.
    Idle,
    Moved,
    Ate { score: u32 },
    Over(GameOverReason),
}

/// Everything a renderer or HUD needs to know about one game.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// Tail at the front, head at the back.
    snake: VecDeque<Cell>,
    direction: Direction,
    pending_direction: Direction,
    food: Cell,
    score: u32,
    ticks_per_second: u32,
    status: Status,
}

impl GameState {
    /// Builds a running state from explicit parts. `snake` is ordered tail
    /// first and must not be empty.
    pub fn new(snake: impl IntoIterator<Item = Cell>, direction: Direction, food: Cell) -> Self {
        let snake: VecDeque<Cell> = snake.into_iter().collect();
        assert!(!snake.is_empty(), "snake needs at least one cell");
        GameState {
            snake,
            direction,
            pending_direction: direction,
            food,
            score: 0,
            ticks_per_second: BASE_TPS,
            status: Status::Running,
        }
    }

    pub fn snake(&self) -> &VecDeque<Cell> {
        &self.snake
    }

    pub fn head(&self) -> Cell {
        *self.snake.back().expect("snake is never empty")
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_paused(&self) -> bool {
        self.status == Status::Paused
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, Status::Over(_))
    }

    pub fn over_reason(&self) -> Option<GameOverReason> {
        match self.status {
            Status::Over(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.snake.contains(&cell)
    }
}

/// Owns a [`GameState`] and advances it according to [`Rules`].
#[derive(Debug)]
pub struct Engine<R = StdRng> {
    rules: Rules,
    rng: R,
    state: GameState,
    best: u32,
}

impl<R: Rng> Engine<R> {
    /// A freshly reset engine using the given randomness source. Fails when
    /// `rules` do not pass [`Rules::validate`].
    pub fn with_rng(rules: Rules, rng: R, best: u32) -> Result<Self> {
        rules.validate().context("Invalid game rules")?;
        let placeholder = GameState::new([Cell::new(0, 0)], Direction::East, Cell::new(0, 0));
        let mut engine = Engine {
            rules,
            rng,
            state: placeholder,
            best,
        };
        engine.reset();
        Ok(engine)
    }

    /// An engine resuming from a hand-built state. Speed is derived from the
    /// state's score.
    pub fn with_state(rules: Rules, rng: R, mut state: GameState, best: u32) -> Result<Self> {
        rules.validate().context("Invalid game rules")?;
        state.ticks_per_second = rules.ticks_per_second(state.score);
        Ok(Engine {
            rules,
            rng,
            state,
            best,
        })
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Centered snake moving east, score 0, base speed, new food.
    pub fn reset(&mut self) {
        let start_len = self.rules.start_len as i32;
        let start_x = self.rules.grid_size / 2 - start_len / 2;
        let start_y = self.rules.grid_size / 2;

        self.state = GameState {
            snake: (0..start_len)
                .map(|i| Cell::new(start_x + i, start_y))
                .collect(),
            direction: Direction::East,
            pending_direction: Direction::East,
            food: Cell::new(0, 0),
            score: 0,
            ticks_per_second: self.rules.base_tps,
            status: Status::Running,
        };

        if !self.spawn_food() {
            self.finish(GameOverReason::Win);
        }
    }

    /// Queues a turn for the next tick. Reversing straight back into the
    /// neck is ignored; a later call in the same tick window replaces an
    /// earlier one. Returns whether the request was accepted.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if direction == self.state.direction.opposite() {
            debug!("Ignoring reversal from {:?}", self.state.direction);
            return false;
        }
        self.state.pending_direction = direction;
        true
    }

    /// Flips between running and paused. A finished game stays finished.
    pub fn toggle_pause(&mut self) -> bool {
        self.state.status = match self.state.status {
            Status::Running => Status::Paused,
            Status::Paused => Status::Running,
            Status::Over(_) => return false,
        };
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state.status == Status::Paused {
            self.state.status = Status::Running;
            true
        } else {
            false
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.state.status != Status::Running {
            return TickOutcome::Idle;
        }

        self.state.direction = self.state.pending_direction;
        let next = self.state.head().step(self.state.direction);

        if !next.in_bounds(self.rules.grid_size) {
            return self.finish(GameOverReason::Wall);
        }

        // The tail moves out of the way unless this tick grows the snake.
        let grows = next == self.state.food;
        let vacated = usize::from(!grows);
        if self.state.snake.iter().skip(vacated).any(|&cell| cell == next) {
            return self.finish(GameOverReason::SelfCollision);
        }

        self.state.snake.push_back(next);

        if !grows {
            self.state.snake.pop_front();
            return TickOutcome::Moved;
        }

        self.state.score += 1;
        let score = self.state.score;
        self.state.ticks_per_second = self.rules.ticks_per_second(score);
        if score > self.best {
            self.best = score;
            debug!("New best score {}", score);
        }

        if !self.spawn_food() {
            return self.finish(GameOverReason::Win);
        }
        TickOutcome::Ate { score }
    }

    /// Rejection-samples a free cell for food. Gives up after
    /// `rules.food_attempts` draws and returns `false`, leaving food where it
    /// was.
    pub fn spawn_food(&mut self) -> bool {
        let size = self.rules.grid_size;
        for _ in 0..self.rules.food_attempts {
            let cell = Cell::new(self.rng.gen_range(0..size), self.rng.gen_range(0..size));
            if !self.state.occupies(cell) {
                self.state.food = cell;
                return true;
            }
        }
        warn!(
            "No free cell for food after {} attempts (snake length {})",
            self.rules.food_attempts,
            self.state.snake.len()
        );
        false
    }

    fn finish(&mut self, reason: GameOverReason) -> TickOutcome {
        self.state.status = Status::Over(reason);
        info!(
            "Game over ({}) with score {} and length {}",
            reason,
            self.state.score,
            self.state.snake.len()
        );
        TickOutcome::Over(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn cells(coords: &[(i32, i32)]) -> Vec<Cell> {
        coords.iter().map(|&(x, y)| Cell::new(x, y)).collect()
    }

    fn start_snake() -> Vec<Cell> {
        cells(&[(10, 12), (11, 12), (12, 12), (13, 12)])
    }

    fn engine_with(state: GameState) -> Engine<StdRng> {
        Engine::with_state(Rules::default(), rng(), state, 0).unwrap()
    }

    fn snake_vec(engine: &Engine<StdRng>) -> Vec<Cell> {
        engine.state().snake().iter().copied().collect()
    }

    #[test]
    fn test_opposite_directions() {
        assert_eq!(Direction::North.opposite(), Direction::South);
        assert_eq!(Direction::South.opposite(), Direction::North);
        assert_eq!(Direction::East.opposite(), Direction::West);
        assert_eq!(Direction::West.opposite(), Direction::East);

        for dir in [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ] {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dx, dy) = dir.delta();
            let (ox, oy) = dir.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
    }

    #[test]
    fn test_bounds() {
        assert!(Cell::new(0, 0).in_bounds(24));
        assert!(Cell::new(23, 23).in_bounds(24));
        assert!(!Cell::new(24, 0).in_bounds(24));
        assert!(!Cell::new(0, -1).in_bounds(24));
        assert_eq!(Cell::new(5, 5).step(Direction::North), Cell::new(5, 4));
    }

    #[test]
    fn test_reset_layout() {
        let engine = Engine::with_rng(Rules::default(), rng(), 3).unwrap();
        let state = engine.state();

        assert_eq!(snake_vec(&engine), start_snake());
        assert_eq!(state.head(), Cell::new(13, 12));
        assert_eq!(state.direction(), Direction::East);
        assert_eq!(state.pending_direction(), Direction::East);
        assert_eq!(state.score(), 0);
        assert_eq!(state.ticks_per_second(), 9);
        assert_eq!(state.status(), Status::Running);
        assert!(!state.occupies(state.food()));
        assert!(state.food().in_bounds(24));
        assert_eq!(engine.best(), 3);
    }

    #[test]
    fn test_reset_twice_is_equivalent() {
        let mut engine = Engine::with_rng(Rules::default(), rng(), 0).unwrap();
        engine.tick();
        engine.toggle_pause();

        engine.reset();
        let first = engine.state().clone();
        engine.reset();
        let second = engine.state().clone();

        assert_eq!(first.snake(), second.snake());
        assert_eq!(first.score(), 0);
        assert_eq!(second.score(), 0);
        assert_eq!(second.status(), Status::Running);
        assert!(!second.occupies(second.food()));
    }

    #[test]
    fn test_move_without_food() {
        let mut engine = engine_with(GameState::new(
            start_snake(),
            Direction::East,
            Cell::new(0, 0),
        ));

        assert_eq!(engine.tick(), TickOutcome::Moved);
        assert_eq!(
            snake_vec(&engine),
            cells(&[(11, 12), (12, 12), (13, 12), (14, 12)])
        );
        assert_eq!(engine.state().score(), 0);
        assert_eq!(engine.state().food(), Cell::new(0, 0));
    }

    #[test]
    fn test_eat_grows_and_respawns() {
        let mut engine = engine_with(GameState::new(
            start_snake(),
            Direction::East,
            Cell::new(14, 12),
        ));

        assert_eq!(engine.tick(), TickOutcome::Ate { score: 1 });
        assert_eq!(
            snake_vec(&engine),
            cells(&[(10, 12), (11, 12), (12, 12), (13, 12), (14, 12)])
        );
        let state = engine.state();
        assert_eq!(state.score(), 1);
        assert_eq!(state.ticks_per_second(), 9);
        assert!(!state.occupies(state.food()));
        assert_eq!(engine.best(), 1);
    }

    #[test]
    fn test_eating_speeds_up_at_threshold() {
        let mut state = GameState::new(start_snake(), Direction::East, Cell::new(14, 12));
        state.score = 5;
        let mut engine = engine_with(state);
        assert_eq!(engine.state().ticks_per_second(), 9);

        engine.tick();
        assert_eq!(engine.state().score(), 6);
        assert_eq!(engine.state().ticks_per_second(), 10);
    }

    #[test]
    fn test_best_only_moves_up() {
        let state = GameState::new(start_snake(), Direction::East, Cell::new(14, 12));
        let mut engine = Engine::with_state(Rules::default(), rng(), state, 10).unwrap();
        engine.tick();
        assert_eq!(engine.state().score(), 1);
        assert_eq!(engine.best(), 10);
    }

    #[test]
    fn test_wall_collision() {
        let snake = cells(&[(20, 12), (21, 12), (22, 12), (23, 12)]);
        let mut engine = engine_with(GameState::new(snake.clone(), Direction::East, Cell::new(0, 0)));

        assert_eq!(engine.tick(), TickOutcome::Over(GameOverReason::Wall));
        assert!(engine.state().is_over());
        assert_eq!(engine.state().over_reason(), Some(GameOverReason::Wall));
        assert_eq!(snake_vec(&engine), snake);
    }

    #[test]
    fn test_self_collision() {
        let snake = cells(&[(5, 5), (5, 6), (5, 7), (6, 7), (6, 6)]);
        let mut engine = engine_with(GameState::new(snake.clone(), Direction::North, Cell::new(0, 0)));

        assert!(engine.set_direction(Direction::West));
        assert_eq!(engine.tick(), TickOutcome::Over(GameOverReason::SelfCollision));
        assert_eq!(snake_vec(&engine), snake);
    }

    #[test]
    fn test_chasing_the_tail_is_allowed() {
        // A 2x2 loop: the head moves into the cell the tail is leaving.
        let snake = cells(&[(5, 5), (6, 5), (6, 6), (5, 6)]);
        let mut engine = engine_with(GameState::new(snake, Direction::West, Cell::new(0, 0)));

        assert!(engine.set_direction(Direction::North));
        assert_eq!(engine.tick(), TickOutcome::Moved);
        assert_eq!(engine.state().head(), Cell::new(5, 5));
        assert_eq!(engine.state().snake().len(), 4);
    }

    #[test]
    fn test_tail_blocks_when_growing() {
        // Same loop, but food sits on the tail so the tail stays put.
        let snake = cells(&[(5, 5), (6, 5), (6, 6), (5, 6)]);
        let mut engine = engine_with(GameState::new(snake, Direction::West, Cell::new(5, 5)));

        engine.set_direction(Direction::North);
        assert_eq!(engine.tick(), TickOutcome::Over(GameOverReason::SelfCollision));
    }

    #[test]
    fn test_reversal_rejected() {
        let mut engine = Engine::with_rng(Rules::default(), rng(), 0).unwrap();

        assert!(!engine.set_direction(Direction::West));
        assert_eq!(engine.state().pending_direction(), Direction::East);
        engine.tick();
        assert_eq!(engine.state().direction(), Direction::East);

        assert!(engine.set_direction(Direction::North));
        engine.tick();
        assert!(!engine.set_direction(Direction::South));
        engine.tick();
        assert_eq!(engine.state().direction(), Direction::North);
    }

    #[test]
    fn test_latest_turn_wins() {
        let mut engine = Engine::with_rng(Rules::default(), rng(), 0).unwrap();
        assert!(engine.set_direction(Direction::North));
        assert!(engine.set_direction(Direction::South));
        engine.tick();
        assert_eq!(engine.state().direction(), Direction::South);
        assert_eq!(engine.state().head(), Cell::new(13, 13));
    }

    #[test]
    fn test_reversal_checked_against_committed_direction() {
        // North is pending but not yet applied, so South is still legal.
        let mut engine = Engine::with_rng(Rules::default(), rng(), 0).unwrap();
        engine.set_direction(Direction::North);
        assert!(engine.set_direction(Direction::South));
    }

    #[test]
    fn test_pause_cycle() {
        let mut engine = Engine::with_rng(Rules::default(), rng(), 0).unwrap();
        let before = engine.state().clone();

        assert!(engine.toggle_pause());
        assert!(engine.state().is_paused());
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.state().snake(), before.snake());

        assert!(engine.toggle_pause());
        assert_eq!(engine.state().status(), Status::Running);

        engine.toggle_pause();
        assert!(engine.resume());
        assert!(!engine.resume());
    }

    #[test]
    fn test_pause_is_noop_when_over() {
        let snake = cells(&[(20, 0), (21, 0), (22, 0), (23, 0)]);
        let mut engine = engine_with(GameState::new(snake, Direction::East, Cell::new(0, 5)));
        engine.tick();
        assert!(engine.state().is_over());

        assert!(!engine.toggle_pause());
        assert!(!engine.resume());
        assert!(engine.state().is_over());
        assert_eq!(engine.tick(), TickOutcome::Idle);

        engine.reset();
        assert_eq!(engine.state().status(), Status::Running);
    }

    #[test]
    fn test_full_board_is_a_win() {
        let rules = Rules {
            grid_size: 3,
            start_len: 2,
            food_attempts: 50,
            ..Default::default()
        };
        let snake = cells(&[
            (0, 0),
            (1, 0),
            (2, 0),
            (2, 1),
            (1, 1),
            (0, 1),
            (0, 2),
            (1, 2),
        ]);
        let state = GameState::new(snake, Direction::East, Cell::new(2, 2));
        let mut engine = Engine::with_state(rules, rng(), state, 0).unwrap();

        assert_eq!(engine.tick(), TickOutcome::Over(GameOverReason::Win));
        assert_eq!(engine.state().snake().len(), 9);
        assert_eq!(engine.state().score(), 1);
        assert_eq!(engine.best(), 1);
    }

    #[test]
    fn test_unusable_rules_rejected() {
        let no_interval = Rules {
            speedup_every: 0,
            ..Default::default()
        };
        let state = GameState::new(start_snake(), Direction::East, Cell::new(14, 12));
        assert!(Engine::with_state(no_interval, rng(), state, 0).is_err());
        assert!(Engine::with_rng(no_interval, rng(), 0).is_err());

        let snake_too_long = Rules {
            start_len: 24,
            ..Default::default()
        };
        assert!(Engine::with_rng(snake_too_long, rng(), 0).is_err());

        let empty_board = Rules::with_grid_size(0);
        assert!(Engine::with_rng(empty_board, rng(), 0).is_err());
    }

    #[test]
    fn test_spawn_food_avoids_snake() {
        let mut engine = Engine::with_rng(Rules::default(), rng(), 0).unwrap();
        for _ in 0..200 {
            assert!(engine.spawn_food());
            let state = engine.state();
            assert!(!state.occupies(state.food()));
        }
    }

    #[test]
    fn test_random_play_keeps_invariants() {
        let mut engine = Engine::with_rng(Rules::with_grid_size(10), rng(), 0).unwrap();
        let mut steer = StdRng::seed_from_u64(99);
        let directions = [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ];

        for _ in 0..2000 {
            if engine.state().is_over() {
                engine.reset();
            }
            engine.set_direction(directions[steer.gen_range(0..4)]);
            let before = engine.state().snake().len();
            let outcome = engine.tick();
            let state = engine.state();

            match outcome {
                TickOutcome::Moved => assert_eq!(state.snake().len(), before),
                TickOutcome::Ate { .. } => assert_eq!(state.snake().len(), before + 1),
                TickOutcome::Over(GameOverReason::Win) => {}
                TickOutcome::Over(_) => assert_eq!(state.snake().len(), before),
                TickOutcome::Idle => unreachable!("engine is never paused here"),
            }

            if !state.is_over() {
                assert!(state.snake().iter().all(|c| c.in_bounds(10)));
                assert!(!state.occupies(state.food()));
                let mut seen = state.snake().iter().collect::<Vec<_>>();
                seen.sort_by_key(|c| (c.x, c.y));
                seen.dedup();
                assert_eq!(seen.len(), state.snake().len());
            }
        }
    }
}
