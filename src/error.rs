use thiserror::Error;

use crate::direction::Direction;

/// Terminal condition of a game. Its `Display` form is the cause shown on the
/// final screen ("You bumped up :(").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameOver {
    #[error("bumped {0}")]
    Collision(Direction),
    /// No free interior cell left, the player filled the board
    #[error("win")]
    BoardFull,
    /// Ctrl+C, or the keyboard stopped answering
    #[error("quit")]
    Quit,
}
