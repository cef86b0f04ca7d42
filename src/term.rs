use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{Event, KeyEvent, read, poll};
use crossterm::style::Attribute;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

use crate::input::KeySource;
use crate::surface::{Style, Surface};

type Glyph = (char, Style);

const BLANK: Glyph = (' ', Style::Plain);

/// Owns the terminal while the game runs. Drawing goes to a back buffer and
/// `refresh` only rewrites the cells that changed since the last frame.
pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
    pending: Vec<Glyph>,
    shown: Vec<Glyph>,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        let cells = width as usize * height as usize;
        Ok(TermManager {
            width,
            height,
            stdout: stdout(),
            pending: vec![BLANK; cells],
            shown: vec![BLANK; cells],
        })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        self.set_raw_mode(true)?;
        execute!(self.stdout, cursor::Hide, terminal::Clear(ClearType::All))
            .context("Error preparing screen")?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        self.set_raw_mode(false)?;
        execute!(self.stdout, cursor::Show, LeaveAlternateScreen)
            .context("Error leaving alt screen")?;
        Ok(())
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read().context("Error reading key")? {
                return Ok(ev);
            }
        }
    }

    /// `(columns, rows)`
    pub fn get_terminal_size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn set_raw_mode(&self, option: bool) -> Result<()> {
        let res = if option {
            terminal::enable_raw_mode()
        } else {
            terminal::disable_raw_mode()
        };

        res.context("Error setting raw mode")
    }
}

impl Surface for TermManager {
    fn clear(&mut self) {
        for cell in self.pending.iter_mut() {
            *cell = BLANK;
        }
    }

    fn put(&mut self, row: usize, col: usize, glyph: char, style: Style) {
        if row < self.height as usize && col < self.width as usize {
            self.pending[row * self.width as usize + col] = (glyph, style);
        }
    }

    fn refresh(&mut self) -> Result<()> {
        let width = self.width as usize;

        for (i, (&next, prev)) in self.pending.iter().zip(self.shown.iter_mut()).enumerate() {
            if next == *prev {
                continue;
            }

            let (ch, glyph_style) = next;
            let attribute = match glyph_style {
                Style::Bold => Attribute::Bold,
                Style::Plain => Attribute::Reset,
            };
            queue!(
                self.stdout,
                cursor::MoveTo((i % width) as u16, (i / width) as u16),
                style::SetAttribute(attribute),
                style::Print(ch),
                style::SetAttribute(Attribute::Reset)
            )?;
            *prev = next;
        }

        self.stdout.flush().context("Error flushing")
    }
}

/// Key presses read straight from the terminal's event queue.
pub struct TermKeys {
    poll_interval: Duration,
}

impl TermKeys {
    pub fn new(poll_interval: Duration) -> Self {
        TermKeys { poll_interval }
    }
}

impl KeySource for TermKeys {
    fn next_key(&mut self) -> Result<Option<KeyEvent>> {
        if !poll(self.poll_interval).context("Error polling input")? {
            return Ok(None);
        }

        match read().context("Error reading input")? {
            Event::Key(ev) => Ok(Some(ev)),
            _ => Ok(None),
        }
    }
}
