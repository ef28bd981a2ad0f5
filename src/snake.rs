use std::collections::VecDeque;

use crate::{BOARD_SIZE, UNIT_SIZE};
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// Pixel offset of a single step in this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Up => (0, -UNIT_SIZE),
            Down => (0, UNIT_SIZE),
            Left => (-UNIT_SIZE, 0),
            Right => (UNIT_SIZE, 0),
        }
    }
}

/// A grid position in pixels. Both coordinates are multiples of `UNIT_SIZE`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn step(self, direction: Direction) -> Cell {
        let (dx, dy) = direction.offset();
        Cell { x: self.x + dx, y: self.y + dy }
    }

    pub fn in_bounds(self) -> bool {
        (0..BOARD_SIZE).contains(&self.x) && (0..BOARD_SIZE).contains(&self.y)
    }
}

pub struct Snake {
    // Head at the front
    body: VecDeque<Cell>,
    direction: Direction,
}

impl Snake {
    pub fn new(head: Cell, size: usize, direction: Direction) -> Self {
        let behind = direction.opposite();
        let body = (0..size).scan(head, |pos, _| {
            let cell = *pos;
            *pos = pos.step(behind);
            Some(cell)
        });

        Snake::from_cells(body, direction)
    }

    pub fn from_cells(cells: impl IntoIterator<Item = Cell>, direction: Direction) -> Self {
        Snake { body: cells.into_iter().collect(), direction }
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns false when the request was a reversal and got dropped.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        match (&new_direction, &self.direction) {
            (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right) => false,
            _ => {
                self.direction = new_direction;
                true
            }
        }
    }

    pub fn push_head(&mut self) -> Cell {
        let new_head = self.head().step(self.direction);
        self.body.push_front(new_head);
        new_head
    }

    pub fn drop_tail(&mut self) -> Option<Cell> {
        self.body.pop_back()
    }

    pub fn bites_itself(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|cell| *cell == head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_snake_trails_behind_head() {
        let snake = Snake::new(Cell::new(100, 100), 3, Right);
        let body: Vec<Cell> = snake.body().iter().copied().collect();
        assert_eq!(body, vec![Cell::new(100, 100), Cell::new(75, 100), Cell::new(50, 100)]);

        let snake = Snake::new(Cell::new(100, 100), 2, Up);
        assert_eq!(snake.body()[1], Cell::new(100, 125));
    }

    #[test]
    fn reversal_is_rejected() {
        let mut snake = Snake::new(Cell::new(100, 100), 3, Right);
        assert!(!snake.set_direction(Left));
        assert_eq!(snake.direction(), Right);

        assert!(snake.set_direction(Up));
        assert!(!snake.set_direction(Down));
        assert_eq!(snake.direction(), Up);

        assert!(snake.set_direction(Up));
        assert_eq!(snake.direction(), Up);
    }

    #[test]
    fn step_moves_one_unit() {
        let cell = Cell::new(50, 50);
        assert_eq!(cell.step(Up), Cell::new(50, 25));
        assert_eq!(cell.step(Down), Cell::new(50, 75));
        assert_eq!(cell.step(Left), Cell::new(25, 50));
        assert_eq!(cell.step(Right), Cell::new(75, 50));
    }

    #[test]
    fn bounds() {
        assert!(Cell::new(0, 0).in_bounds());
        assert!(Cell::new(575, 575).in_bounds());
        assert!(!Cell::new(-25, 100).in_bounds());
        assert!(!Cell::new(100, 600).in_bounds());
    }

    #[test]
    fn push_and_drop_translate_the_body() {
        let mut snake = Snake::new(Cell::new(100, 100), 3, Right);
        assert_eq!(snake.push_head(), Cell::new(125, 100));
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.drop_tail(), Some(Cell::new(50, 100)));
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Cell::new(125, 100));
    }

    #[test]
    fn detects_self_bite() {
        let snake = Snake::from_cells(
            vec![Cell::new(100, 100), Cell::new(75, 100), Cell::new(100, 100)],
            Right,
        );
        assert!(snake.bites_itself());

        let snake = Snake::new(Cell::new(100, 100), 3, Right);
        assert!(!snake.bites_itself());
    }
}
