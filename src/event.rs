use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent};

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize,
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    _tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(poll_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let _tx = tx.clone();

        thread::spawn(move || {
            loop {
                if event::poll(poll_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => {
                            if tx.send(AppEvent::Key(key)).is_err() {
                                return;
                            }
                        }
                        Ok(Event::Resize(_, _)) => {
                            if tx.send(AppEvent::Resize).is_err() {
                                return;
                            }
                        }
                        _ => {}
                    }
                } else if tx.send(AppEvent::Tick).is_err() {
                    return;
                }
            }
        });

        Self { rx, _tx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}

/// Turns irregular polls into whole elapsed seconds.
///
/// The app owns at most one of these, armed while a timed session runs and
/// dropped as soon as it stops, so a stale countdown never reaches a new session.
#[derive(Clone, Copy, Debug)]
pub struct Countdown {
    next_due: Instant,
}

const ONE_SECOND: Duration = Duration::from_secs(1);

impl Countdown {
    pub fn start(now: Instant) -> Self {
        Self {
            next_due: now + ONE_SECOND,
        }
    }

    /// Number of seconds that became due since the last poll.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let mut due = 0;
        while now >= self.next_due {
            due += 1;
            self.next_due += ONE_SECOND;
        }
        due
    }
}
