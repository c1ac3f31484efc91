//! Process-wide logging configuration
//!
//! `GlobalConfig` is plain atomics: set at startup, read on every log call,
//! possibly toggled at runtime. A torn view across the two fields is
//! acceptable; a torn read of one field is not, hence the atomics.

use crate::constants::{DEFAULT_DEBUG_MODE, DEFAULT_MIN_LEVEL};
use crate::dispatch::Dispatcher;
use crate::level::LogLevel;
use crate::sink::{Sink, TracingSink};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

/// What happens after a fatal entry has reached the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FatalPolicy {
    /// Log and keep running
    #[default]
    Continue,
    /// Log, then panic with the fatal message
    Panic,
}

impl FatalPolicy {
    const fn from_u8(value: u8) -> Self {
        match value {
            1 => FatalPolicy::Panic,
            _ => FatalPolicy::Continue,
        }
    }

    const fn as_u8(self) -> u8 {
        match self {
            FatalPolicy::Continue => 0,
            FatalPolicy::Panic => 1,
        }
    }
}

/// Global floor, debug switch and fatal policy (lock-free)
#[derive(Debug)]
pub struct GlobalConfig {
    /// Floor for loggables that follow the global level
    min_level: AtomicU8,
    /// When set, the local gate lets every level through
    debug_mode: AtomicBool,
    fatal_policy: AtomicU8,
}

impl GlobalConfig {
    pub const fn new() -> Self {
        Self {
            min_level: AtomicU8::new(DEFAULT_MIN_LEVEL as u8),
            debug_mode: AtomicBool::new(DEFAULT_DEBUG_MODE),
            fatal_policy: AtomicU8::new(FatalPolicy::Continue.as_u8()),
        }
    }

    /// Create a config with explicit floor and debug mode
    pub fn with(min_level: LogLevel, debug_mode: bool) -> Self {
        let config = Self::new();
        config.set_min_level(min_level);
        config.set_debug_mode(debug_mode);
        config
    }

    #[inline]
    pub fn min_level(&self) -> LogLevel {
        LogLevel::from_priority(self.min_level.load(Ordering::Relaxed) as i64)
    }

    #[inline]
    pub fn set_min_level(&self, level: LogLevel) {
        self.min_level.store(level.priority(), Ordering::Relaxed);
    }

    /// Set the floor from a raw priority.
    ///
    /// Anything above `Fatal` is clamped to `Fatal` (and anything below
    /// `Verbose` to `Verbose`); this never fails.
    pub fn set_min_priority(&self, priority: i64) {
        self.set_min_level(LogLevel::from_priority(priority));
    }

    #[inline]
    pub fn debug_mode(&self) -> bool {
        self.debug_mode.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_debug_mode(&self, enabled: bool) {
        self.debug_mode.store(enabled, Ordering::Relaxed);
    }

    #[inline]
    pub fn fatal_policy(&self) -> FatalPolicy {
        FatalPolicy::from_u8(self.fatal_policy.load(Ordering::Relaxed))
    }

    pub fn set_fatal_policy(&self, policy: FatalPolicy) {
        self.fatal_policy.store(policy.as_u8(), Ordering::Relaxed);
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Process-wide dispatcher
// =============================================================================

static DISPATCHER: OnceLock<Dispatcher> = OnceLock::new();

/// The process-wide dispatcher used by `Log` implementors by default.
///
/// Created on first use with a default `GlobalConfig` and a `TracingSink`.
pub fn dispatcher() -> &'static Dispatcher {
    DISPATCHER.get_or_init(|| {
        Dispatcher::new(Arc::new(GlobalConfig::new()), Arc::new(TracingSink::new()))
    })
}

/// Configuration of the process-wide dispatcher
pub fn config() -> &'static GlobalConfig {
    dispatcher().config()
}

/// Replace the process-wide sink
pub fn set_sink(sink: Arc<dyn Sink>) {
    dispatcher().set_sink(sink);
}
