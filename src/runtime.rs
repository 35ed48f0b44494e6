use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::engine::Algorithm;

/// Roughly 60 redraws per second.
pub const FRAME: Duration = Duration::from_millis(16);

#[derive(Clone, Debug)]
pub enum SortEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// What a key press asks the session to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    Select(Algorithm),
    Start,
    TogglePause,
    Advance,
    ToggleMode,
    Faster,
    Slower,
    Stop,
    Reset,
}

impl Command {
    /// Key bindings. Releases and repeats of non-press kinds are ignored.
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let command = match key.code {
            KeyCode::Esc => Command::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
            KeyCode::Char('1') => Command::Select(Algorithm::Bubble),
            KeyCode::Char('2') => Command::Select(Algorithm::Quick),
            KeyCode::Char('3') => Command::Select(Algorithm::Merge),
            KeyCode::Enter => Command::Start,
            KeyCode::Char(' ') => Command::TogglePause,
            KeyCode::Char('n') | KeyCode::Right => Command::Advance,
            KeyCode::Char('m') => Command::ToggleMode,
            KeyCode::Char('+') | KeyCode::Char('=') => Command::Faster,
            KeyCode::Char('-') => Command::Slower,
            KeyCode::Char('x') => Command::Stop,
            KeyCode::Char('r') => Command::Reset,
            _ => return None,
        };
        Some(command)
    }
}

pub trait EventSource: Send + 'static {
    /// Waits up to `timeout` for the next event.
    fn recv_timeout(&self, timeout: Duration) -> Result<SortEvent, RecvTimeoutError>;
}

/// Reads crossterm events on a background thread.
pub struct CrosstermEventSource {
    rx: Receiver<SortEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) => SortEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => SortEvent::Resize,
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SortEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-fed source for driving the front-end loop without a terminal.
pub struct ChannelEventSource {
    rx: Receiver<SortEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<SortEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SortEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

pub struct Runner<E: EventSource> {
    source: E,
    frame: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(source: E, frame: Duration) -> Self {
        Self { source, frame }
    }

    /// Next input event, or `Tick` once the frame interval passes quietly.
    /// A source that has gone away degrades to a plain frame clock.
    pub fn step(&self) -> SortEvent {
        match self.source.recv_timeout(self.frame) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => SortEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => {
                std::thread::sleep(self.frame);
                SortEvent::Tick
            }
        }
    }
}
