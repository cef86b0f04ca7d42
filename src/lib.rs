pub mod config;
pub mod direction;
pub mod entities;
pub mod error;
pub mod field;
pub mod input;
pub mod snake;
pub mod surface;
pub mod term;
pub mod world;

/// A grid position as `(row, col)`.
pub type Cell = (usize, usize);
