//! Line-oriented sink for any `io::Write`
//!
//! Lines look like logcat's "time" format:
//! `HH:MM:SS.mmm L/Tag: message[: error]`

use super::{ErrorRef, Sink};
use crate::constants::TIMESTAMP_FORMAT;
use crate::level::LogLevel;
use parking_lot::Mutex;
use std::io::{self, Write};

/// Writes one formatted line per entry
///
/// Write errors are dropped: a failed log line must never fail the caller.
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
}

/// `WriterSink` on standard error
pub type ConsoleSink = WriterSink<io::Stderr>;

impl ConsoleSink {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consume the sink and return the writer
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

/// Format a log line without timestamp
pub fn format_line(tag: &str, priority: LogLevel, message: &str, error: Option<ErrorRef<'_>>) -> String {
    match error {
        Some(err) => format!("{}/{}: {}: {}", priority.as_char(), tag, message, err),
        None => format!("{}/{}: {}", priority.as_char(), tag, message),
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn emit(&self, tag: &str, priority: LogLevel, message: &str, error: Option<ErrorRef<'_>>) {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT);
        let line = format_line(tag, priority, message, error);
        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "{} {}", timestamp, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line_without_error() {
        assert_eq!(
            format_line("Network", LogLevel::Info, "connected", None),
            "I/Network: connected"
        );
    }

    #[test]
    fn test_format_line_with_error() {
        let err = io::Error::new(io::ErrorKind::TimedOut, "timed out");
        assert_eq!(
            format_line("Network", LogLevel::Error, "request failed", Some(&err)),
            "E/Network: request failed: timed out"
        );
    }

    #[test]
    fn test_writer_sink_writes_one_line_per_entry() {
        let sink = WriterSink::new(Vec::new());
        sink.d("Cache", "miss", None);
        sink.wtf("Cache", "corrupt", None);

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("D/Cache: miss"));
        assert!(lines[1].ends_with("F/Cache: corrupt"));
        // HH:MM:SS.mmm prefix
        assert_eq!(lines[0].find(' '), Some(12));
    }
}
