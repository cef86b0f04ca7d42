use anyhow::{ensure, Result};
use log::info;
use simplelog::CombinedLogger;

use snake::config::GameConfig;
use snake::error::GameOver;
use snake::term::{TermKeys, TermManager};
use snake::world::GameWorld;

fn main() -> Result<()> {
    let config = GameConfig::default();
    init_logging(&config);
    info!("starting snake");

    let mut term = TermManager::new()?;
    let (cols, rows) = config.window_size();
    let (width, height) = term.get_terminal_size();
    ensure!(
        width >= cols && height >= rows,
        "terminal is {}x{}, the game needs at least {}x{}",
        width,
        height,
        cols,
        rows
    );

    term.setup()?;
    let played = play(&mut term, &config);

    // The final screen stays up until a key is pressed, unless the player quit
    let waited = match &played {
        Ok(GameOver::Quit) | Err(_) => Ok(()),
        Ok(_) => term.read_key_blocking().map(|_| ()),
    };
    let restored = term.restore();

    let cause = played?;
    waited?;
    restored?;

    info!("exiting: {}", cause);
    Ok(())
}

fn play(term: &mut TermManager, config: &GameConfig) -> Result<GameOver> {
    let keys = Box::new(TermKeys::new(config.key_poll));
    let mut world = GameWorld::classic(config, term, keys, rand::thread_rng())?;
    world.run()
}

/// Without a writable log file the game still runs, it just logs nothing.
fn init_logging(config: &GameConfig) {
    let loggers = match config.file_logger() {
        Ok(logger) => vec![logger],
        Err(e) => {
            eprintln!("Logging disabled: {:#}", e);
            vec![]
        }
    };

    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("Logging disabled: {}", e);
    }
}
