//! Event handling
//!
//! Crossterm's poll is blocking, which would stall the debounce timers and
//! router transitions sharing the thread. The handler therefore polls with a
//! zero timeout and sleeps on the tokio clock between polls.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Terminal events the front-end reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    /// Keyboard input
    Key(KeyEvent),

    /// Terminal resize
    Resize(u16, u16),
}

/// Event handler that polls for terminal events
pub struct EventHandler {
    poll_interval: Duration,
}

impl EventHandler {
    /// Create a new event handler with the specified poll interval
    pub fn new(poll_interval_ms: u64) -> Self {
        Self {
            poll_interval: Duration::from_millis(poll_interval_ms),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Wait for the next relevant event
    ///
    /// Key releases and repeats (reported on some platforms) are skipped.
    pub async fn next(&self) -> std::io::Result<TuiEvent> {
        loop {
            if event::poll(Duration::ZERO)? {
                match event::read()? {
                    CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                        return Ok(TuiEvent::Key(key))
                    }
                    CrosstermEvent::Resize(w, h) => return Ok(TuiEvent::Resize(w, h)),
                    _ => continue,
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
