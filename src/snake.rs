use serde::{Deserialize, Serialize};

use crate::vector::{Bounds, Vector};
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Unit displacement for one tick. Screen coordinates, y grows downwards.
    pub const fn step(self) -> Vector {
        match self {
            Up => Vector::new(0, -1),
            Down => Vector::new(0, 1),
            Left => Vector::new(-1, 0),
            Right => Vector::new(1, 0),
        }
    }

    /// The reversal that may not be requested while moving this way.
    pub const fn forbidden(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub const fn head_char(self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum MoveResult {
    /// `old_tail` is `None` when the head landed on food and the chain grew.
    Moved { new_head: Vector, old_head: Vector, old_tail: Option<Vector> },
    Crashed
}

#[derive(Clone, Debug)]
pub struct Snake {
    body: Vec<Vector>,
    direction: Direction,
    last_moved: Direction,
}

impl Snake {
    /// Lays out `size` segments in a straight line along `direction`,
    /// tail `(size + 1) / 2` cells behind `center`.
    pub fn new(center: Vector, size: i32, direction: Direction, bounds: Bounds) -> Self {
        let diff = direction.step();
        let tail_offset = (size + 1) / 2;

        let body = (0..size)
            .map(|i| bounds.wrap(center + diff.scale(i - tail_offset)))
            .collect();
        Snake { body, direction, last_moved: direction }
    }

    /// Builds a crawler from an explicit tail-to-head chain.
    #[cfg(test)]
    pub fn from_body(body: Vec<Vector>, direction: Direction) -> Self {
        assert!(!body.is_empty());
        Snake { body, direction, last_moved: direction }
    }

    pub fn body(&self) -> &[Vector] {
        &self.body
    }

    pub fn head(&self) -> Vector {
        self.body[self.body.len() - 1]
    }

    pub fn next_head(&self, bounds: Bounds) -> Vector {
        bounds.wrap(self.head() + self.direction.step())
    }

    pub fn move_step(&mut self, bounds: Bounds, food: Vector) -> MoveResult {
        let old_head = self.head();
        let new_head = self.next_head(bounds);

        // The tail still counts: it is only dropped after the head moves in.
        if self.body.contains(&new_head) {
            return Crashed;
        }

        self.body.push(new_head);
        self.last_moved = self.direction;

        if new_head == food {
            Moved { new_head, old_head, old_tail: None }
        } else {
            let old_tail = self.body.remove(0);
            Moved { new_head, old_head, old_tail: Some(old_tail) }
        }
    }

    /// Returns whether the change was accepted. Reversals of the current
    /// heading, or of the heading of the last completed step, are dropped.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction.forbidden() || new_direction == self.last_moved.forbidden() {
            return false;
        }

        self.direction = new_direction;
        true
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn head_char(&self) -> char {
        self.direction.head_char()
    }
}
