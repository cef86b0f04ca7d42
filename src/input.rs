use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, PoisonError,
    },
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, bail, Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{error, info};

const THREAD_NAME: &str = "input_processor";

/// Non-blocking source of key presses.
pub trait KeySource: Send {
    /// Waits at most a short, bounded time; `None` means no key arrived.
    fn next_key(&mut self) -> Result<Option<KeyEvent>>;
}

pub trait Subscriber: Send + Sync {
    fn event_received(&self, code: KeyCode);
}

pub fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}

type Subscribers = Arc<Mutex<Vec<Arc<dyn Subscriber>>>>;

/// Reads keys on a background thread and hands each one to every subscriber.
///
/// Ctrl+C is not forwarded: it ends the thread and marks the relay as
/// interrupted, as does a failing key source.
pub struct InputRelay {
    source: Option<Box<dyn KeySource>>,
    subscribers: Subscribers,
    stop: Arc<AtomicBool>,
    interrupted: Arc<AtomicBool>,
    handle: Option<JoinHandle<Result<()>>>,
}

impl InputRelay {
    pub fn new(source: Box<dyn KeySource>) -> Self {
        InputRelay {
            source: Some(source),
            subscribers: Arc::new(Mutex::new(vec![])),
            stop: Arc::new(AtomicBool::new(false)),
            interrupted: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Can be called before or after `start`.
    pub fn add_subscriber(&self, subscriber: Arc<dyn Subscriber>) {
        lock(&self.subscribers).push(subscriber);
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// True once the thread ended on its own, through Ctrl+C or a source error.
    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Acquire)
    }

    pub fn start(&mut self) -> Result<()> {
        let mut source = match self.source.take() {
            Some(source) => source,
            None => bail!("input relay was already started"),
        };
        let subscribers = Arc::clone(&self.subscribers);
        let stop = Arc::clone(&self.stop);
        let interrupted = Arc::clone(&self.interrupted);

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                let res = relay_keys(source.as_mut(), &subscribers, &stop);
                if let Err(e) = &res {
                    error!("input thread stopped: {:#}", e);
                }
                if !stop.load(Ordering::Acquire) {
                    interrupted.store(true, Ordering::Release);
                }
                res
            })
            .context("Failed to spawn input thread")?;

        info!("input relay started");
        self.handle = Some(handle);
        Ok(())
    }

    /// Signals the thread to stop and waits for it to finish.
    pub fn stop_and_join(&mut self) -> Result<()> {
        self.stop.store(true, Ordering::Release);

        if let Some(handle) = self.handle.take() {
            handle.join().map_err(|_| anyhow!("input thread panicked"))??;
            info!("input relay stopped");
        }

        Ok(())
    }
}

impl Drop for InputRelay {
    fn drop(&mut self) {
        // Errors were already logged by the thread itself
        let _ = self.stop_and_join();
    }
}

fn relay_keys(
    source: &mut dyn KeySource,
    subscribers: &Subscribers,
    stop: &AtomicBool,
) -> Result<()> {
    while !stop.load(Ordering::Acquire) {
        let ev = match source.next_key()? {
            Some(ev) => ev,
            None => continue,
        };

        if is_ctrl_c(&ev) {
            info!("ctrl+c pressed");
            break;
        }

        let listeners = lock(subscribers).clone();
        for listener in listeners {
            listener.event_received(ev.code);
        }
    }

    Ok(())
}

fn lock(subscribers: &Subscribers) -> std::sync::MutexGuard<'_, Vec<Arc<dyn Subscriber>>> {
    subscribers.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
pub(crate) fn key(code: KeyCode) -> KeyEvent {
    KeyEvent { code, modifiers: KeyModifiers::NONE }
}

#[cfg(test)]
pub(crate) fn ctrl_c() -> KeyEvent {
    KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL }
}

/// Replays a fixed list of key presses, then reports no input forever.
#[cfg(test)]
pub(crate) struct ScriptedKeys {
    keys: std::collections::VecDeque<KeyEvent>,
}

#[cfg(test)]
impl ScriptedKeys {
    pub(crate) fn new(keys: &[KeyCode]) -> Self {
        Self::events(&keys.iter().copied().map(key).collect::<Vec<_>>())
    }

    pub(crate) fn events(events: &[KeyEvent]) -> Self {
        ScriptedKeys { keys: events.iter().cloned().collect() }
    }

    pub(crate) fn silent() -> Self {
        Self::new(&[])
    }
}

#[cfg(test)]
impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> Result<Option<KeyEvent>> {
        match self.keys.pop_front() {
            Some(ev) => Ok(Some(ev)),
            None => {
                thread::sleep(std::time::Duration::from_millis(1));
                Ok(None)
            }
        }
    }
}

/// A key source whose terminal is gone.
#[cfg(test)]
pub(crate) struct BrokenKeys;

#[cfg(test)]
impl KeySource for BrokenKeys {
    fn next_key(&mut self) -> Result<Option<KeyEvent>> {
        Err(anyhow!("terminal went away"))
    }
}
