//! Sink forwarding to the `tracing` ecosystem
//!
//! Default sink of the process-wide dispatcher. The active subscriber's
//! filter acts as the sink-side veto.

use super::{ErrorRef, Sink};
use crate::level::LogLevel;
use tracing::field::display;

macro_rules! event {
    ($macro:ident, $tag:expr, $message:expr, $error:expr) => {
        tracing::$macro!(tag = $tag, error = $error.map(display), "{}", $message)
    };
}

/// Forwards entries as `tracing` events, with the tag as a field
///
/// Verbose maps to TRACE; Fatal is an ERROR event flagged `fatal = true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for TracingSink {
    fn is_loggable(&self, _tag: &str, priority: LogLevel) -> bool {
        match priority {
            LogLevel::Verbose => tracing::enabled!(tracing::Level::TRACE),
            LogLevel::Debug => tracing::enabled!(tracing::Level::DEBUG),
            LogLevel::Info => tracing::enabled!(tracing::Level::INFO),
            LogLevel::Warn => tracing::enabled!(tracing::Level::WARN),
            LogLevel::Error | LogLevel::Fatal => tracing::enabled!(tracing::Level::ERROR),
        }
    }

    fn emit(&self, tag: &str, priority: LogLevel, message: &str, error: Option<ErrorRef<'_>>) {
        match priority {
            LogLevel::Verbose => event!(trace, tag, message, error),
            LogLevel::Debug => event!(debug, tag, message, error),
            LogLevel::Info => event!(info, tag, message, error),
            LogLevel::Warn => event!(warn, tag, message, error),
            LogLevel::Error => event!(error, tag, message, error),
            LogLevel::Fatal => self.wtf(tag, message, error),
        }
    }

    fn wtf(&self, tag: &str, message: &str, error: Option<ErrorRef<'_>>) {
        tracing::error!(
            tag = tag,
            fatal = true,
            error = error.map(display),
            "{}",
            message
        );
    }
}
