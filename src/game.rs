use std::collections::VecDeque;

use log::{debug, info};
use rand::{rngs::ThreadRng, Rng};

use crate::snake::{Cell, Direction, Snake};
use crate::{GRID_CELLS, UNIT_SIZE};

const INITIAL_SNAKE_LENGTH: usize = 3;
const INITIAL_HEAD: Cell = Cell::new(4 * UNIT_SIZE, 4 * UNIT_SIZE);
const INITIAL_DIRECTION: Direction = Direction::Right;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    Terminated,
}

/// What a single call to `GameState::advance` did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Idle,
    Moved,
    Ate,
    Crashed,
}

/// Read-only view of the game handed to renderers.
pub struct Snapshot<'a> {
    pub body: &'a VecDeque<Cell>,
    pub food: Cell,
    pub score: u32,
    pub run_state: RunState,
}

pub struct GameState<R = ThreadRng> {
    snake: Snake,
    food: Cell,
    score: u32,
    run_state: RunState,
    rng: R,
}

impl GameState<ThreadRng> {
    pub fn new() -> Self {
        GameState::with_rng(rand::thread_rng())
    }
}

impl<R: Rng> GameState<R> {
    pub fn with_rng(mut rng: R) -> Self {
        let food = random_cell(&mut rng);
        GameState {
            snake: initial_snake(),
            food,
            score: 0,
            run_state: RunState::Running,
            rng,
        }
    }

    /// Puts the food on a uniformly random cell. The snake body is not
    /// excluded, so food may land under it.
    pub fn spawn_food(&mut self) -> Cell {
        self.food = random_cell(&mut self.rng);
        debug!("Food spawned at ({}, {})", self.food.x, self.food.y);
        self.food
    }

    /// Moves the snake one cell and resolves food and collisions, in that order.
    /// On a crash the new head has already been applied and may be off the board.
    pub fn advance(&mut self) -> Step {
        if self.run_state != RunState::Running {
            return Step::Idle;
        }

        let new_head = self.snake.push_head();

        let ate = new_head == self.food;
        if ate {
            self.score += 1;
            debug!("Food eaten, score {}, length {}", self.score, self.snake.len());
            self.spawn_food();
        } else {
            self.snake.drop_tail();
        }

        self.check_collisions();

        match (self.run_state, ate) {
            (RunState::Terminated, _) => Step::Crashed,
            (RunState::Running, true) => Step::Ate,
            (RunState::Running, false) => Step::Moved,
        }
    }

    pub fn check_collisions(&mut self) {
        if self.snake.bites_itself() || !self.snake.head().in_bounds() {
            self.run_state = RunState::Terminated;
            info!("Game over, final score {}", self.score);
        }
    }

    /// Reversals of the current heading are silently ignored.
    pub fn set_heading(&mut self, requested: Direction) {
        if !self.snake.set_direction(requested) {
            debug!("Ignored reversal to {:?} while heading {:?}", requested, self.heading());
        }
    }

    /// Starts a fresh session. Works from any state, including mid-game.
    pub fn restart(&mut self) {
        self.snake = initial_snake();
        self.score = 0;
        self.run_state = RunState::Running;
        self.spawn_food();
        info!("Game restarted");
    }

    pub fn heading(&self) -> Direction {
        self.snake.direction()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            body: self.snake.body(),
            food: self.food,
            score: self.score,
            run_state: self.run_state,
        }
    }
}

fn initial_snake() -> Snake {
    Snake::new(INITIAL_HEAD, INITIAL_SNAKE_LENGTH, INITIAL_DIRECTION)
}

fn random_cell<R: Rng>(rng: &mut R) -> Cell {
    Cell::new(
        rng.gen_range(0..GRID_CELLS) * UNIT_SIZE,
        rng.gen_range(0..GRID_CELLS) * UNIT_SIZE,
    )
}
