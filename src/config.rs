use std::{env, fs::File, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use simplelog::{Config, LevelFilter, SharedLogger, WriteLogger};

pub const BOARD_WIDTH: usize = 26;
pub const BOARD_HEIGHT: usize = 8;
pub const INFO_HEIGHT: usize = 4;

pub const TICK_PERIOD_MS: u64 = 300;
pub const KEY_POLL_MS: u64 = 20;

pub const LOG_FILE: &str = "snake.log";
pub const LOG_LEVEL_ENV_VAR: &str = "SNAKE_LOG";

#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Board width, border included
    pub board_width: usize,
    /// Board height, border included
    pub board_height: usize,
    /// Rows of the score panel drawn right below the board
    pub info_height: usize,
    pub tick_period: Duration,
    /// How long the input thread waits for a key before re-checking its stop flag
    pub key_poll: Duration,
    pub log_file: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            info_height: INFO_HEIGHT,
            tick_period: Duration::from_millis(TICK_PERIOD_MS),
            key_poll: Duration::from_millis(KEY_POLL_MS),
            log_file: PathBuf::from(LOG_FILE),
        }
    }
}

impl GameConfig {
    /// Terminal area the game needs, as `(columns, rows)`.
    pub fn window_size(&self) -> (u16, u16) {
        let cols = self.board_width + 1;
        let rows = self.board_height + self.info_height + 1;
        (cols as u16, rows as u16)
    }

    pub fn log_level(&self) -> LevelFilter {
        env::var(LOG_LEVEL_ENV_VAR)
            .ok()
            .and_then(|value| parse_level(&value))
            .unwrap_or(LevelFilter::Info)
    }

    /// Logger writing to `log_file`, truncated on every start.
    pub fn file_logger(&self) -> Result<Box<dyn SharedLogger>> {
        let file = File::create(&self.log_file)
            .with_context(|| format!("Failed to create {}", self.log_file.display()))?;
        Ok(WriteLogger::new(self.log_level(), Config::default(), file))
    }
}

fn parse_level(value: &str) -> Option<LevelFilter> {
    LevelFilter::from_str(value.trim()).ok()
}
