use crate::{
    field::GameField,
    surface::{Style, Surface},
    Cell,
};

const WALL_CHAR: char = '#';
const MOUSE_CHAR: char = 'M';

/// The board's wall ring. Marks its cells on the field once, when built.
pub struct Border {
    width: usize,
    height: usize,
}

impl Border {
    pub fn new(field: &mut GameField) -> Self {
        let border = Border { width: field.width(), height: field.height() };
        for cell in border.cells() {
            field.set_blocked(cell, true);
        }
        border
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for (row, col) in self.cells() {
            surface.put(row, col, WALL_CHAR, Style::Bold);
        }
    }

    /// Every ring cell, corners repeated. Empty for a zero-sized board.
    fn cells(&self) -> Vec<Cell> {
        let mut cells = vec![];
        if self.width == 0 || self.height == 0 {
            return cells;
        }

        let (bottom, right) = (self.height - 1, self.width - 1);
        for col in 0..self.width {
            cells.push((0, col));
            cells.push((bottom, col));
        }
        for row in 0..self.height {
            cells.push((row, 0));
            cells.push((row, right));
        }
        cells
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Mouse {
    pos: Cell,
}

impl Mouse {
    pub fn new(pos: Cell) -> Self {
        Mouse { pos }
    }

    pub fn pos(&self) -> Cell {
        self.pos
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.put(self.pos.0, self.pos.1, MOUSE_CHAR, Style::Bold);
    }
}

/// Score panel under the board; shows the outcome once the game is finalized.
pub struct Info {
    top_row: usize,
    height: usize,
    width: usize,
    score: u32,
    game_over_message: Option<String>,
}

impl Info {
    pub fn new(top_row: usize, height: usize, width: usize) -> Self {
        Info { top_row, height, width, score: 0, game_over_message: None }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn add_point(&mut self) {
        self.score += 1;
    }

    pub fn game_over_message(&self) -> Option<&str> {
        self.game_over_message.as_deref()
    }

    pub fn finalize(&mut self, message: &str) {
        self.game_over_message = Some(message.to_string());
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        if self.height == 0 || self.width == 0 {
            return;
        }

        let top = self.top_row;
        let bottom = top + self.height - 1;
        for col in 0..self.width {
            surface.put(bottom, col, WALL_CHAR, Style::Bold);
        }
        for row in top..=bottom {
            surface.put(row, 0, WALL_CHAR, Style::Bold);
            surface.put(row, self.width - 1, WALL_CHAR, Style::Bold);
        }

        match &self.game_over_message {
            None => {
                let score = format!("Score: {}", self.score);
                surface.put_str(top + 1, 2, &score, Style::Bold);
            }
            Some(msg) => {
                let result = format!("Result: {}", self.score);
                surface.put_str(top, 2, &format!("You {} :(", msg), Style::Bold);
                surface.put_str(top + 1, 2, &result, Style::Bold);
                surface.put_str(top + 2, 2, "Press any key to exit", Style::Bold);
            }
        }
    }
}
