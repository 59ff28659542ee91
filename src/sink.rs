use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use crate::model::Event;

/// A sink-level failure. `Failsafe` is the user's emergency stop and ends the
/// run without being treated as an error; anything else is reported as one.
#[derive(Debug)]
pub enum SinkError {
    Failsafe,
    Other(String),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::Failsafe => write!(f, "fail-safe triggered"),
            SinkError::Other(detail) => write!(f, "{detail}"),
        }
    }
}

impl std::error::Error for SinkError {}

impl From<io::Error> for SinkError {
    fn from(err: io::Error) -> Self {
        SinkError::Other(err.to_string())
    }
}

/// Where simulated keystrokes are delivered.
///
/// Both emission calls are synchronous and may block; either may raise the
/// fail-safe to abort the run.
pub trait InputSink {
    fn emit_char(&mut self, c: char) -> Result<(), SinkError>;

    fn emit_backspace(&mut self) -> Result<(), SinkError>;

    /// Emit a run of characters as one unit (the high-speed fast path).
    fn emit_str(&mut self, s: &str) -> Result<(), SinkError> {
        for c in s.chars() {
            self.emit_char(c)?;
        }
        Ok(())
    }

    /// Called before the engine sleeps, with the intended duration. Lets
    /// recording sinks capture the full event stream.
    fn note_sleep(&mut self, _duration: Duration) {}
}

/// Renders the simulated typing live on stdout; backspaces visually erase.
#[derive(Debug)]
pub struct ConsoleSink {
    out: io::Stdout,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSink for ConsoleSink {
    fn emit_char(&mut self, c: char) -> Result<(), SinkError> {
        let mut buf = [0u8; 4];
        self.out.write_all(c.encode_utf8(&mut buf).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn emit_backspace(&mut self) -> Result<(), SinkError> {
        self.out.write_all(b"\x08 \x08")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Discards everything. Combined with [`Recorder`] in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl InputSink for NullSink {
    fn emit_char(&mut self, _c: char) -> Result<(), SinkError> {
        Ok(())
    }

    fn emit_backspace(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Tees events into an in-memory log while forwarding to an inner sink.
#[derive(Debug, Default)]
pub struct Recorder<S> {
    inner: S,
    events: Vec<Event>,
}

impl<S: InputSink> Recorder<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            events: Vec::new(),
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl<S: InputSink> InputSink for Recorder<S> {
    fn emit_char(&mut self, c: char) -> Result<(), SinkError> {
        self.inner.emit_char(c)?;
        self.events.push(Event::Char { c });
        Ok(())
    }

    fn emit_backspace(&mut self) -> Result<(), SinkError> {
        self.inner.emit_backspace()?;
        self.events.push(Event::Backspace);
        Ok(())
    }

    fn note_sleep(&mut self, duration: Duration) {
        self.inner.note_sleep(duration);
        self.events.push(Event::Sleep {
            ms: (duration.as_secs_f64() * 1000.0).round() as u64,
        });
    }
}
