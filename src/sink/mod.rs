//! Sink abstraction: where log entries actually go
//!
//! The facade decides *whether* and *what* to log; a sink decides *how*
//! (tracing subscriber, console, in-memory capture...). Sinks are trusted:
//! their failures are their own to define and are never retried.
//!
//! # Adding a new sink
//!
//! 1. Create `sink/my_sink.rs`
//! 2. Implement the `Sink` trait (`emit` is the only required method)
//! 3. Add `pub mod my_sink;` here

pub mod filter;
pub mod memory;
pub mod trace;
pub mod writer;

pub use filter::TagFilterSink;
pub use memory::{MemorySink, Record};
pub use trace::TracingSink;
pub use writer::{ConsoleSink, WriterSink};

use crate::level::LogLevel;
use std::error::Error;
use std::sync::Arc;

/// Error attached to a log call
pub type ErrorRef<'a> = &'a (dyn Error + 'static);

/// Write destination for log entries
///
/// Each level has its own entry point (`v`, `d`, `i`, `w`, `e`, `wtf`) so a
/// sink can give a level special treatment; by default they all funnel
/// into `emit`.
pub trait Sink: Send + Sync {
    /// Final veto on a (tag, priority) pair, e.g. platform per-tag suppression
    fn is_loggable(&self, _tag: &str, _priority: LogLevel) -> bool {
        true
    }

    /// Write one entry
    fn emit(&self, tag: &str, priority: LogLevel, message: &str, error: Option<ErrorRef<'_>>);

    fn v(&self, tag: &str, message: &str, error: Option<ErrorRef<'_>>) {
        self.emit(tag, LogLevel::Verbose, message, error);
    }

    fn d(&self, tag: &str, message: &str, error: Option<ErrorRef<'_>>) {
        self.emit(tag, LogLevel::Debug, message, error);
    }

    fn i(&self, tag: &str, message: &str, error: Option<ErrorRef<'_>>) {
        self.emit(tag, LogLevel::Info, message, error);
    }

    fn w(&self, tag: &str, message: &str, error: Option<ErrorRef<'_>>) {
        self.emit(tag, LogLevel::Warn, message, error);
    }

    fn e(&self, tag: &str, message: &str, error: Option<ErrorRef<'_>>) {
        self.emit(tag, LogLevel::Error, message, error);
    }

    /// Most severe path
    fn wtf(&self, tag: &str, message: &str, error: Option<ErrorRef<'_>>) {
        self.emit(tag, LogLevel::Fatal, message, error);
    }
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn is_loggable(&self, tag: &str, priority: LogLevel) -> bool {
        (**self).is_loggable(tag, priority)
    }

    fn emit(&self, tag: &str, priority: LogLevel, message: &str, error: Option<ErrorRef<'_>>) {
        (**self).emit(tag, priority, message, error);
    }

    fn v(&self, tag: &str, message: &str, error: Option<ErrorRef<'_>>) {
        (**self).v(tag, message, error);
    }

    fn d(&self, tag: &str, message: &str, error: Option<ErrorRef<'_>>) {
        (**self).d(tag, message, error);
    }

    fn i(&self, tag: &str, message: &str, error: Option<ErrorRef<'_>>) {
        (**self).i(tag, message, error);
    }

    fn w(&self, tag: &str, message: &str, error: Option<ErrorRef<'_>>) {
        (**self).w(tag, message, error);
    }

    fn e(&self, tag: &str, message: &str, error: Option<ErrorRef<'_>>) {
        (**self).e(tag, message, error);
    }

    fn wtf(&self, tag: &str, message: &str, error: Option<ErrorRef<'_>>) {
        (**self).wtf(tag, message, error);
    }
}

/// Send an entry through the sink entry point matching its level
pub fn route<S: Sink + ?Sized>(
    sink: &S,
    level: LogLevel,
    tag: &str,
    message: &str,
    error: Option<ErrorRef<'_>>,
) {
    match level {
        LogLevel::Verbose => sink.v(tag, message, error),
        LogLevel::Debug => sink.d(tag, message, error),
        LogLevel::Info => sink.i(tag, message, error),
        LogLevel::Warn => sink.w(tag, message, error),
        LogLevel::Error => sink.e(tag, message, error),
        LogLevel::Fatal => sink.wtf(tag, message, error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Records which per-level entry point was hit
    #[derive(Default)]
    struct EntryPoints {
        hits: Mutex<Vec<&'static str>>,
    }

    impl Sink for EntryPoints {
        fn emit(&self, _: &str, _: LogLevel, _: &str, _: Option<ErrorRef<'_>>) {
            self.hits.lock().push("emit");
        }

        fn v(&self, _: &str, _: &str, _: Option<ErrorRef<'_>>) {
            self.hits.lock().push("v");
        }

        fn d(&self, _: &str, _: &str, _: Option<ErrorRef<'_>>) {
            self.hits.lock().push("d");
        }

        fn i(&self, _: &str, _: &str, _: Option<ErrorRef<'_>>) {
            self.hits.lock().push("i");
        }

        fn w(&self, _: &str, _: &str, _: Option<ErrorRef<'_>>) {
            self.hits.lock().push("w");
        }

        fn e(&self, _: &str, _: &str, _: Option<ErrorRef<'_>>) {
            self.hits.lock().push("e");
        }

        fn wtf(&self, _: &str, _: &str, _: Option<ErrorRef<'_>>) {
            self.hits.lock().push("wtf");
        }
    }

    #[test]
    fn test_route_maps_each_level_to_its_entry_point() {
        let sink = EntryPoints::default();
        for level in LogLevel::ALL {
            route(&sink, level, "Tag", "msg", None);
        }
        assert_eq!(*sink.hits.lock(), vec!["v", "d", "i", "w", "e", "wtf"]);
    }

    #[test]
    fn test_default_entry_points_funnel_into_emit() {
        let sink = MemorySink::new(16);
        sink.w("Tag", "careful", None);
        sink.wtf("Tag", "boom", None);

        let records = sink.records();
        assert_eq!(records[0].level, LogLevel::Warn);
        assert_eq!(records[1].level, LogLevel::Fatal);
    }

    #[test]
    fn test_arc_forwards_overridden_entry_points() {
        let sink = Arc::new(EntryPoints::default());
        route(&sink, LogLevel::Fatal, "Tag", "msg", None);
        assert_eq!(*sink.hits.lock(), vec!["wtf"]);
    }
}
