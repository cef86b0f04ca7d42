use anyhow::Result;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Style {
    Plain,
    Bold,
}

/// Something the game can be drawn on. Writes only become visible on `refresh`.
pub trait Surface {
    fn clear(&mut self);

    fn put(&mut self, row: usize, col: usize, glyph: char, style: Style);

    fn put_str(&mut self, row: usize, col: usize, text: &str, style: Style) {
        for (i, ch) in text.chars().enumerate() {
            self.put(row, col + i, ch, style);
        }
    }

    fn refresh(&mut self) -> Result<()>;
}

impl<T: Surface + ?Sized> Surface for &mut T {
    fn clear(&mut self) {
        (**self).clear()
    }

    fn put(&mut self, row: usize, col: usize, glyph: char, style: Style) {
        (**self).put(row, col, glyph, style)
    }

    fn put_str(&mut self, row: usize, col: usize, text: &str, style: Style) {
        (**self).put_str(row, col, text, style)
    }

    fn refresh(&mut self) -> Result<()> {
        (**self).refresh()
    }
}

/// In-memory surface; keeps the last refreshed frame around for inspection.
pub struct Canvas {
    width: usize,
    height: usize,
    pending: Vec<char>,
    shown: Vec<char>,
    refreshes: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        let blank = vec![' '; width * height];
        Canvas { width, height, pending: blank.clone(), shown: blank, refreshes: 0 }
    }

    pub fn glyph_at(&self, row: usize, col: usize) -> char {
        self.shown[row * self.width + col]
    }

    pub fn row(&self, row: usize) -> String {
        self.shown[row * self.width..(row + 1) * self.width].iter().collect()
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes
    }

    pub fn find(&self, glyph: char) -> Vec<(usize, usize)> {
        self.shown
            .iter()
            .enumerate()
            .filter(|&(_, &ch)| ch == glyph)
            .map(|(i, _)| (i / self.width, i % self.width))
            .collect()
    }
}

impl Surface for Canvas {
    fn clear(&mut self) {
        self.pending = vec![' '; self.width * self.height];
    }

    fn put(&mut self, row: usize, col: usize, glyph: char, _: Style) {
        if row < self.height && col < self.width {
            self.pending[row * self.width + col] = glyph;
        }
    }

    fn refresh(&mut self) -> Result<()> {
        self.shown.clone_from(&self.pending);
        self.refreshes += 1;
        Ok(())
    }
}
