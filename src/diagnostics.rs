use crate::error::Error;
use std::borrow::Cow;
use std::fmt;

//===========================================================================//

/// A non-fatal failure worth telling an operator about.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Event {
    message: Cow<'static, str>,
    context: Vec<(&'static str, String)>,
}

impl Event {
    /// Creates an event with no context.
    pub fn new(message: impl Into<Cow<'static, str>>) -> Event {
        Event { message: message.into(), context: Vec::new() }
    }

    /// Appends a `key = value` pair to the event's context.
    pub fn with(mut self, key: &'static str, value: impl fmt::Display) -> Event {
        self.context.push((key, value.to_string()));
        self
    }

    /// Builds an event describing `error`, with its kind and fields as
    /// context.
    pub fn from_error(error: &Error) -> Event {
        let event = Event::new(error.to_string()).with("kind", error.kind());
        match *error {
            Error::UnreadableSource { ref path, .. }
            | Error::WriteFailed { ref path, .. } => {
                event.with("path", path.display())
            }
            Error::ResampleFailed { width, height }
            | Error::LayerTooLarge { width, height } => {
                event.with("width", width).with("height", height)
            }
            Error::TooManyLayers(count) => event.with("count", count),
            Error::FileTooLarge(size) => event.with("size", size),
            _ => event,
        }
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the structured context, in insertion order.
    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// Returns the context value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        for (key, value) in self.context.iter() {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

//===========================================================================//

/// Receives failure reports from an [`IconAssembler`](crate::IconAssembler).
pub trait Diagnostics {
    /// Records one event.
    fn report(&self, event: &Event);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn report(&self, _event: &Event) {}
}

/// Forwards events to `tracing` at `WARN` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, event: &Event) {
        tracing::warn!(
            kind = event.get("kind").unwrap_or("unknown"),
            context = ?event.context(),
            "{}",
            event.message()
        );
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for std::rc::Rc<D> {
    fn report(&self, event: &Event) {
        (**self).report(event)
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for std::sync::Arc<D> {
    fn report(&self, event: &Event) {
        (**self).report(event)
    }
}

//===========================================================================//


//===========================================================================//
