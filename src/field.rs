use rand::{seq::SliceRandom, Rng};

use crate::{error::GameOver, Cell};

/// Occupancy grid of the board: a cell is blocked while a wall or a snake
/// segment sits on it.
pub struct GameField {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl GameField {
    pub fn new(width: usize, height: usize) -> Self {
        GameField { width, height, cells: vec![false; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cells outside the grid count as blocked.
    pub fn is_blocked(&self, (row, col): Cell) -> bool {
        self.index(row, col).map_or(true, |i| self.cells[i])
    }

    pub fn set_blocked(&mut self, (row, col): Cell, blocked: bool) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = blocked;
        }
    }

    /// Picks a random unblocked cell off the outermost ring.
    pub fn free_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Cell, GameOver> {
        let choices: Vec<Cell> = self
            .interior()
            .filter(|&cell| !self.is_blocked(cell))
            .collect();
        choices.choose(rng).copied().ok_or(GameOver::BoardFull)
    }

    pub fn blocked_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &blocked)| blocked)
            .map(move |(i, _)| (i / width, i % width))
    }

    ///////////////////////////////////////////////////////////////////////////

    fn interior(&self) -> impl Iterator<Item = Cell> {
        let (width, height) = (self.width, self.height);
        (1..height.saturating_sub(1))
            .flat_map(move |row| (1..width.saturating_sub(1)).map(move |col| (row, col)))
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.height && col < self.width {
            Some(row * self.width + col)
        } else {
            None
        }
    }
}
