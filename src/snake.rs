use std::collections::VecDeque;

use crate::grid::GridSize;
use crate::Coords;
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    /// `old_tail` is `None` when the snake ate and kept its tail.
    Moved { new_head: Coords, old_tail: Option<Coords> },
    Crashed,
}

/// Snake body, head first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Coords>,
    direction: Direction,
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

    /// The cell next to `pos` in this direction, or `None` if it lies outside the grid.
    pub fn step(self, pos: Coords, grid: GridSize) -> Option<Coords> {
        let (x, y) = pos;
        let next = match self {
            Up => (x, y.checked_sub(1)?),
            Down => (x, y.checked_add(1)?),
            Left => (x.checked_sub(1)?, y),
            Right => (x.checked_add(1)?, y),
        };

        if grid.contains(next) { Some(next) } else { None }
    }
}

impl Snake {
    /// Lays out `size` segments trailing behind `head`, opposite to `direction`.
    /// The caller makes sure every segment fits on the grid.
    pub fn new(head: Coords, size: u16, direction: Direction) -> Self {
        let diff: (i32, i32) = match &direction {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        };

        let body = (0..size.max(1) as i32)
            .map(|i| (head.0 as i32 - diff.0 * i, head.1 as i32 - diff.1 * i))
            .map(|(x, y)| (x as u16, y as u16))
            .collect();
        Snake { body, direction }
    }

    pub fn body(&self) -> &VecDeque<Coords> {
        &self.body
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, pos: Coords) -> bool {
        self.body.contains(&pos)
    }

    /// Advances one cell. The tail still counts as an obstacle because it has
    /// not moved yet when the new head is checked. Eating `apple` keeps the tail.
    pub fn move_step(&mut self, grid: GridSize, apple: Coords) -> MoveResult {
        let new_head = match self.direction.step(self.head(), grid) {
            Some(pos) if !self.contains(pos) => pos,
            _ => return Crashed,
        };

        self.body.push_front(new_head);

        if new_head == apple {
            Moved { new_head, old_tail: None }
        } else {
            let old_tail = self.body.pop_back();
            Moved { new_head, old_tail }
        }
    }

    pub fn can_turn(&self, new_direction: Direction) -> bool {
        new_direction != self.direction.opposite()
    }

    /// Turns unless `new_direction` would reverse into the body.
    pub fn set_direction(&mut self, new_direction: Direction) {
        if self.can_turn(new_direction) {
            self.direction = new_direction;
        }
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}
