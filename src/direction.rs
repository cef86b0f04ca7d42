use std::{
    fmt,
    sync::{Mutex, MutexGuard, PoisonError},
};

use crossterm::event::KeyCode;
use log::debug;

use crate::{input::Subscriber, Cell};
use Direction::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Maps one of the four arrow keys to a heading; any other key yields `None`.
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Up => Some(Up),
            KeyCode::Down => Some(Down),
            KeyCode::Left => Some(Left),
            KeyCode::Right => Some(Right),
            _ => None,
        }
    }

    /// True when both headings lie on the same axis, the heading itself included.
    pub fn same_axis(self, other: Direction) -> bool {
        self == other || self.is_opposite(other)
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        matches!((self, other), (Up, Down) | (Down, Up) | (Left, Right) | (Right, Left))
    }

    /// The neighbouring cell in this direction, `None` when it would leave the grid
    /// through row or column zero.
    pub fn step(self, (row, col): Cell) -> Option<Cell> {
        match self {
            Up => row.checked_sub(1).map(|row| (row, col)),
            Down => Some((row + 1, col)),
            Left => col.checked_sub(1).map(|col| (row, col)),
            Right => Some((row, col + 1)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Up => "up",
            Down => "down",
            Left => "left",
            Right => "right",
        };
        f.write_str(name)
    }
}

struct HeadingState {
    direction: Direction,
    changed_this_tick: bool,
}

/// The snake's heading, shared between the input thread and the tick thread.
///
/// At most one change request is honoured per tick: the first request after
/// [`Heading::end_tick`] closes the window, whether or not it actually turned
/// the snake.
pub struct Heading {
    state: Mutex<HeadingState>,
}

impl Heading {
    pub fn new(direction: Direction) -> Self {
        Heading { state: Mutex::new(HeadingState { direction, changed_this_tick: false }) }
    }

    pub fn current(&self) -> Direction {
        self.lock().direction
    }

    /// Returns whether the heading changed.
    pub fn request_change(&self, new_direction: Direction) -> bool {
        let mut state = self.lock();
        if state.changed_this_tick {
            return false;
        }

        state.changed_this_tick = true;
        if state.direction.same_axis(new_direction) {
            return false;
        }

        debug!("heading {} -> {}", state.direction, new_direction);
        state.direction = new_direction;
        true
    }

    /// Re-opens the window for the next heading change.
    pub fn end_tick(&self) {
        self.lock().changed_this_tick = false;
    }

    ///////////////////////////////////////////////////////////////////////////

    fn lock(&self) -> MutexGuard<'_, HeadingState> {
        // The guarded state is two plain values, a panicking holder can't leave it torn
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Subscriber for Heading {
    fn event_received(&self, code: KeyCode) {
        if let Some(direction) = Direction::from_key(code) {
            self.request_change(direction);
        }
    }
}
