//! Level-gated dispatch
//!
//! Decides per call whether an entry is emitted, builds the message only
//! when it is, and routes it to the sink entry point for its level.
//!
//! Gate: `(debug_mode || priority >= floor) && sink.is_loggable(tag, priority)`.
//! The local half runs first; the sink is only asked when it passes.
//!
//! Fatal is the exception: an eager fatal message skips the gate entirely
//! and always reaches `Sink::wtf`. A lazy fatal message is still gated.

use crate::global::{self, FatalPolicy, GlobalConfig};
use crate::level::LogLevel;
use crate::loggable::Loggable;
use crate::sink::{route, ErrorRef, Sink};
use parking_lot::RwLock;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Message source
// =============================================================================

/// A message that is either ready or built on demand
pub enum MessageSource<'a> {
    Eager(Cow<'a, str>),
    /// Invoked at most once, and only if the entry will be emitted
    Lazy(Box<dyn FnOnce() -> String + 'a>),
}

impl<'a> MessageSource<'a> {
    pub fn is_lazy(&self) -> bool {
        matches!(self, MessageSource::Lazy(_))
    }

    /// Produce the text. Panics from a lazy producer propagate.
    pub fn resolve(self) -> Cow<'a, str> {
        match self {
            MessageSource::Eager(text) => text,
            MessageSource::Lazy(producer) => Cow::Owned(producer()),
        }
    }
}

impl fmt::Debug for MessageSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageSource::Eager(text) => f.debug_tuple("Eager").field(text).finish(),
            MessageSource::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

impl<'a> From<&'a str> for MessageSource<'a> {
    fn from(text: &'a str) -> Self {
        MessageSource::Eager(Cow::Borrowed(text))
    }
}

impl From<String> for MessageSource<'_> {
    fn from(text: String) -> Self {
        MessageSource::Eager(Cow::Owned(text))
    }
}

impl<'a> From<Cow<'a, str>> for MessageSource<'a> {
    fn from(text: Cow<'a, str>) -> Self {
        MessageSource::Eager(text)
    }
}

impl From<fmt::Arguments<'_>> for MessageSource<'_> {
    fn from(args: fmt::Arguments<'_>) -> Self {
        MessageSource::Eager(Cow::Owned(args.to_string()))
    }
}

/// Wrap a producer so the message is only built when it will be emitted
pub fn lazy<'a, F>(producer: F) -> MessageSource<'a>
where
    F: FnOnce() -> String + 'a,
{
    MessageSource::Lazy(Box::new(producer))
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Gate plus sink
///
/// Holds the configuration it reads on every call and the sink it writes
/// to. The process-wide instance lives in [`global::dispatcher`]; tests and
/// embedders can build their own and hand it out through [`Log::dispatcher`].
pub struct Dispatcher {
    config: Arc<GlobalConfig>,
    sink: RwLock<Arc<dyn Sink>>,
}

impl Dispatcher {
    pub fn new(config: Arc<GlobalConfig>, sink: Arc<dyn Sink>) -> Self {
        Self {
            config,
            sink: RwLock::new(sink),
        }
    }

    #[inline]
    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    pub fn sink(&self) -> Arc<dyn Sink> {
        self.sink.read().clone()
    }

    pub fn set_sink(&self, sink: Arc<dyn Sink>) {
        *self.sink.write() = sink;
    }

    /// Whether an entry from `who` at `priority` would be emitted
    pub fn is_loggable(&self, who: &Loggable, priority: LogLevel) -> bool {
        let local = self.config.debug_mode() || priority >= who.min_level(&self.config);
        local && self.sink().is_loggable(who.tag(), priority)
    }

    /// Log `message` at `level`, returns whether it reached the sink
    pub fn log<'m>(
        &self,
        who: &Loggable,
        level: LogLevel,
        message: impl Into<MessageSource<'m>>,
        error: Option<ErrorRef<'_>>,
    ) -> bool {
        let message = message.into();

        let bypass_gate = level == LogLevel::Fatal && !message.is_lazy();
        if !bypass_gate && !self.is_loggable(who, level) {
            return false;
        }

        let text = message.resolve();
        self.emit(who, level, &text, error);
        true
    }

    /// Log a message whose construction can fail.
    ///
    /// The producer only runs if the entry passes the gate. Its error is
    /// returned to the caller untouched and nothing is emitted.
    pub fn try_log<E, F>(
        &self,
        who: &Loggable,
        level: LogLevel,
        error: Option<ErrorRef<'_>>,
        producer: F,
    ) -> Result<bool, E>
    where
        F: FnOnce() -> Result<String, E>,
    {
        if !self.is_loggable(who, level) {
            return Ok(false);
        }

        let text = producer()?;
        self.emit(who, level, &text, error);
        Ok(true)
    }

    /// Bind `who` to this dispatcher
    pub fn scope<'a>(&'a self, who: &'a Loggable) -> Scoped<'a> {
        Scoped {
            loggable: who,
            dispatcher: self,
        }
    }

    fn emit(&self, who: &Loggable, level: LogLevel, message: &str, error: Option<ErrorRef<'_>>) {
        // Release the lock before calling out: a sink may log itself.
        let sink = self.sink();
        route(&*sink, level, who.tag(), message, error);

        if level == LogLevel::Fatal && self.config.fatal_policy() == FatalPolicy::Panic {
            panic!("fatal [{}]: {}", who.tag(), message);
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Log extension trait
// =============================================================================

macro_rules! level_methods {
    ($($(#[$doc:meta])* $level:ident => $plain:ident, $with_err:ident;)*) => {
        $(
            $(#[$doc])*
            fn $plain<'m>(&self, message: impl Into<MessageSource<'m>>) -> bool {
                self.log(LogLevel::$level, message, None)
            }

            $(#[$doc])*
            ///
            /// With an attached error.
            fn $with_err<'m>(&self, message: impl Into<MessageSource<'m>>, error: ErrorRef<'_>) -> bool {
                self.log(LogLevel::$level, message, Some(error))
            }
        )*
    };
}

/// Logging methods for anything that holds a `Loggable`
///
/// Implementors only provide [`Log::loggable`]. Every method returns
/// whether the entry reached the sink.
///
/// ```ignore
/// struct Repository {
///     log: Loggable,
/// }
///
/// impl Log for Repository {
///     fn loggable(&self) -> &Loggable {
///         &self.log
///     }
/// }
///
/// repo.i("opened");
/// repo.d(lazy(|| format!("{} rows", rows.len())));
/// repo.e_err("write failed", &err);
/// ```
pub trait Log {
    fn loggable(&self) -> &Loggable;

    /// Dispatcher used by this component, the process-wide one by default
    fn dispatcher(&self) -> &Dispatcher {
        global::dispatcher()
    }

    fn tag(&self) -> &str {
        self.loggable().tag()
    }

    fn is_loggable(&self, priority: LogLevel) -> bool {
        self.dispatcher().is_loggable(self.loggable(), priority)
    }

    fn log<'m>(
        &self,
        level: LogLevel,
        message: impl Into<MessageSource<'m>>,
        error: Option<ErrorRef<'_>>,
    ) -> bool {
        self.dispatcher().log(self.loggable(), level, message, error)
    }

    fn try_log<E, F>(&self, level: LogLevel, error: Option<ErrorRef<'_>>, producer: F) -> Result<bool, E>
    where
        F: FnOnce() -> Result<String, E>,
    {
        self.dispatcher().try_log(self.loggable(), level, error, producer)
    }

    level_methods! {
        /// Verbose entry
        Verbose => v, v_err;
        /// Debug entry
        Debug => d, d_err;
        /// Info entry
        Info => i, i_err;
        /// Warning entry
        Warn => w, w_err;
        /// Error entry
        Error => e, e_err;
        /// Fatal entry. An eager message is always emitted, a lazy one is gated.
        Fatal => wtf, wtf_err;
    }
}

impl Log for Loggable {
    fn loggable(&self) -> &Loggable {
        self
    }
}

/// A loggable bound to a specific dispatcher
#[derive(Debug, Clone, Copy)]
pub struct Scoped<'a> {
    loggable: &'a Loggable,
    dispatcher: &'a Dispatcher,
}

impl Log for Scoped<'_> {
    fn loggable(&self) -> &Loggable {
        self.loggable
    }

    fn dispatcher(&self) -> &Dispatcher {
        self.dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::io;

    struct Harness {
        sink: Arc<MemorySink>,
        dispatcher: Dispatcher,
    }

    fn harness(floor: LogLevel, debug_mode: bool) -> Harness {
        let sink = Arc::new(MemorySink::new(64));
        let dispatcher = Dispatcher::new(
            Arc::new(GlobalConfig::with(floor, debug_mode)),
            sink.clone(),
        );
        Harness { sink, dispatcher }
    }

    fn level_strategy() -> impl Strategy<Value = LogLevel> {
        prop::sample::select(LogLevel::ALL.to_vec())
    }

    struct Service;

    // === Gate ===

    #[test]
    fn test_floor_filters_lower_levels() {
        let h = harness(LogLevel::Info, false);
        let who = Loggable::of::<Service>();
        let log = h.dispatcher.scope(&who);

        assert!(!log.v("x"));
        assert!(!log.d("x"));
        assert!(log.i("x"));
        assert!(log.w("x"));

        let records = h.sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, LogLevel::Info);
        assert_eq!(records[1].level, LogLevel::Warn);
        assert_eq!(records[0].tag, "Service");
    }

    #[test]
    fn test_debug_mode_opens_local_gate() {
        let h = harness(LogLevel::Fatal, true);
        let who = Loggable::of::<Service>();
        assert!(h.dispatcher.scope(&who).v("everything"));
        assert_eq!(h.sink.count_at(LogLevel::Verbose), 1);
    }

    #[test]
    fn test_debug_mode_toggle_takes_effect_immediately() {
        let h = harness(LogLevel::Error, false);
        let who = Loggable::of::<Service>();
        assert!(!h.dispatcher.is_loggable(&who, LogLevel::Debug));

        h.dispatcher.config().set_debug_mode(true);
        assert!(h.dispatcher.is_loggable(&who, LogLevel::Debug));

        h.dispatcher.config().set_debug_mode(false);
        assert!(!h.dispatcher.is_loggable(&who, LogLevel::Debug));
    }

    #[test]
    fn test_fixed_floor_ignores_global_floor() {
        let h = harness(LogLevel::Verbose, false);
        let who = Loggable::tagged("Quiet", LogLevel::Error);
        assert!(!h.dispatcher.is_loggable(&who, LogLevel::Warn));
        assert!(h.dispatcher.is_loggable(&who, LogLevel::Error));
    }

    #[test]
    fn test_sink_veto_wins() {
        let h = harness(LogLevel::Verbose, true);
        h.sink.set_allow(false);
        let who = Loggable::of::<Service>();

        assert!(!h.dispatcher.scope(&who).e("dropped"));
        assert!(h.sink.is_empty());
    }

    #[test]
    fn test_sink_not_asked_when_local_gate_fails() {
        let h = harness(LogLevel::Warn, false);
        let who = Loggable::of::<Service>();

        h.dispatcher.is_loggable(&who, LogLevel::Debug);
        assert_eq!(h.sink.veto_queries(), 0);

        h.dispatcher.is_loggable(&who, LogLevel::Warn);
        assert_eq!(h.sink.veto_queries(), 1);
    }

    // === Laziness ===

    #[test]
    fn test_lazy_producer_skipped_when_filtered() {
        let h = harness(LogLevel::Info, false);
        let who = Loggable::of::<Service>();
        let calls = Cell::new(0);

        h.dispatcher.scope(&who).d(lazy(|| {
            calls.set(calls.get() + 1);
            "expensive".to_string()
        }));

        assert_eq!(calls.get(), 0);
        assert!(h.sink.is_empty());
    }

    #[test]
    fn test_lazy_producer_runs_once_when_emitted() {
        let h = harness(LogLevel::Debug, false);
        let who = Loggable::of::<Service>();
        let calls = Cell::new(0);

        h.dispatcher.scope(&who).d(lazy(|| {
            calls.set(calls.get() + 1);
            "expensive".to_string()
        }));

        assert_eq!(calls.get(), 1);
        assert_eq!(h.sink.records()[0].message, "expensive");
    }

    #[test]
    fn test_lazy_with_error() {
        let h = harness(LogLevel::Debug, false);
        let who = Loggable::of::<Service>();
        let err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");

        h.dispatcher
            .scope(&who)
            .w_err(lazy(|| format!("retry {}", 3)), &err);

        let record = &h.sink.records()[0];
        assert_eq!(record.message, "retry 3");
        assert_eq!(record.error.as_deref(), Some("pipe closed"));
    }

    #[test]
    #[should_panic(expected = "producer bug")]
    fn test_lazy_producer_panic_propagates() {
        let h = harness(LogLevel::Verbose, false);
        let who = Loggable::of::<Service>();
        h.dispatcher
            .scope(&who)
            .i(lazy(|| panic!("producer bug")));
    }

    #[test]
    fn test_try_log_propagates_producer_error() {
        let h = harness(LogLevel::Verbose, false);
        let who = Loggable::of::<Service>();

        let result: Result<bool, &str> =
            h.dispatcher
                .try_log(&who, LogLevel::Info, None, || Err("cannot render"));

        assert_eq!(result, Err("cannot render"));
        assert!(h.sink.is_empty());
    }

    #[test]
    fn test_try_log_skips_producer_when_filtered() {
        let h = harness(LogLevel::Error, false);
        let who = Loggable::of::<Service>();

        let result: Result<bool, &str> = h
            .dispatcher
            .try_log(&who, LogLevel::Info, None, || panic!("must not run"));

        assert_eq!(result, Ok(false));
    }

    // === Fatal ===

    #[test]
    fn test_fatal_eager_bypasses_gate() {
        let h = harness(LogLevel::Error, false);
        h.sink.set_allow(false);
        let who = Loggable::tagged("Crash", LogLevel::Fatal);
        let err = io::Error::new(io::ErrorKind::Other, "oom");

        assert!(h.dispatcher.scope(&who).wtf_err("crash", &err));

        let records = h.sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, LogLevel::Fatal);
        assert_eq!(records[0].message, "crash");
        assert_eq!(records[0].error.as_deref(), Some("oom"));
        assert_eq!(h.sink.veto_queries(), 0);
    }

    #[test]
    fn test_fatal_lazy_is_gated() {
        let h = harness(LogLevel::Error, false);
        h.sink.set_allow(false);
        let who = Loggable::of::<Service>();
        let calls = Cell::new(0);

        let emitted = h.dispatcher.scope(&who).wtf(lazy(|| {
            calls.set(calls.get() + 1);
            "crash".to_string()
        }));

        assert!(!emitted);
        assert_eq!(calls.get(), 0);
        assert_eq!(h.sink.veto_queries(), 1);
        assert!(h.sink.is_empty());
    }

    #[test]
    #[should_panic(expected = "fatal [Crash]: unrecoverable")]
    fn test_fatal_panic_policy() {
        let h = harness(LogLevel::Verbose, false);
        h.dispatcher.config().set_fatal_policy(FatalPolicy::Panic);
        let who = Loggable::tagged("Crash", LogLevel::Verbose);
        h.dispatcher.scope(&who).wtf("unrecoverable");
    }

    #[test]
    fn test_fatal_panic_policy_emits_before_panicking() {
        let h = harness(LogLevel::Verbose, false);
        h.dispatcher.config().set_fatal_policy(FatalPolicy::Panic);
        let who = Loggable::tagged("Crash", LogLevel::Verbose);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            h.dispatcher.scope(&who).wtf("unrecoverable");
        }));

        assert!(result.is_err());
        assert_eq!(h.sink.count_at(LogLevel::Fatal), 1);
    }

    // === Sources ===

    #[test]
    fn test_message_sources() {
        let h = harness(LogLevel::Verbose, false);
        let who = Loggable::of::<Service>();
        let log = h.dispatcher.scope(&who);

        log.i("borrowed");
        log.i(String::from("owned"));
        log.i(format_args!("formatted {}", 42));

        let messages: Vec<String> = h.sink.records().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["borrowed", "owned", "formatted 42"]);
    }

    #[test]
    fn test_set_sink_redirects_output() {
        let h = harness(LogLevel::Verbose, false);
        let other = Arc::new(MemorySink::new(4));
        h.dispatcher.set_sink(other.clone());

        let who = Loggable::of::<Service>();
        h.dispatcher.scope(&who).i("moved");

        assert!(h.sink.is_empty());
        assert_eq!(other.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_gate_without_debug_mode(level in level_strategy(), floor in level_strategy()) {
            let h = harness(floor, false);
            let who = Loggable::of::<Service>();
            prop_assert_eq!(h.dispatcher.is_loggable(&who, level), level >= floor);
        }

        #[test]
        fn prop_gate_with_debug_mode(level in level_strategy(), floor in level_strategy()) {
            let h = harness(floor, true);
            let who = Loggable::of::<Service>();
            prop_assert!(h.dispatcher.is_loggable(&who, level));
        }
    }
}
