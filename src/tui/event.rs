//! Event handling for the console.
//!
//! A dedicated thread polls the terminal and emits ticks when no input
//! arrives within the tick rate. Worker threads post their results into
//! the same channel via [`EventHandler::sender`].

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

use crate::mgmt::verify::VerifyResult;

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// Timer tick: spinners advance, transient messages expire.
    Tick,
    /// Keyboard input.
    Key(KeyEvent),
    /// Terminal resize.
    Resize(u16, u16),
    /// A script verification finished.
    ScriptVerified(VerifyResult),
}

/// Event handler that polls for terminal events in a separate thread.
pub struct EventHandler {
    rx: Receiver<Event>,
    // Kept alive so worker senders can be handed out after construction.
    tx: Sender<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let event_tx = tx.clone();
        thread::spawn(move || {
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    let Ok(evt) = event::read() else { break };
                    let event = match evt {
                        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                            Event::Key(key)
                        }
                        CrosstermEvent::Resize(w, h) => Event::Resize(w, h),
                        _ => continue,
                    };
                    if event_tx.send(event).is_err() {
                        break;
                    }
                } else if event_tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });
        Self { rx, tx }
    }

    /// A sender for threads that report back into the event loop.
    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    /// Receives the next event, blocking until one is available.
    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}
