//! Per-tag veto wrapper
//!
//! Plays the part of the platform's per-tag log property: each tag can have
//! its own threshold, and a tag can be silenced entirely.

use super::{ErrorRef, Sink};
use crate::config::TagsConfig;
use crate::level::LogLevel;
use crate::loggable::truncate_tag;
use std::collections::{HashMap, HashSet};

/// Sink wrapper that vetoes entries by tag
pub struct TagFilterSink<S: Sink> {
    inner: S,
    /// Threshold for tags without an explicit entry
    default_level: LogLevel,
    levels: HashMap<String, LogLevel>,
    suppressed: HashSet<String>,
}

impl<S: Sink> TagFilterSink<S> {
    /// Wrap `inner`, letting every tag through at every level
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            default_level: LogLevel::Verbose,
            levels: HashMap::new(),
            suppressed: HashSet::new(),
        }
    }

    /// Wrap `inner` with the rules of a `[tags]` config section
    pub fn from_config(inner: S, cfg: &TagsConfig) -> Self {
        Self {
            inner,
            default_level: cfg.default_level,
            levels: cfg
                .levels
                .iter()
                .map(|(tag, level)| (truncate_tag(tag), *level))
                .collect(),
            suppressed: cfg.suppressed.iter().map(|tag| truncate_tag(tag)).collect(),
        }
    }

    pub fn with_default_level(mut self, level: LogLevel) -> Self {
        self.default_level = level;
        self
    }

    /// Tags are stored cut to the same length loggables use
    pub fn with_level(mut self, tag: &str, level: LogLevel) -> Self {
        self.levels.insert(truncate_tag(tag), level);
        self
    }

    pub fn suppress(mut self, tag: &str) -> Self {
        self.suppressed.insert(truncate_tag(tag));
        self
    }

    /// Effective threshold for `tag`, `None` if suppressed
    pub fn threshold(&self, tag: &str) -> Option<LogLevel> {
        if self.suppressed.contains(tag) {
            return None;
        }
        Some(self.levels.get(tag).copied().unwrap_or(self.default_level))
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: Sink> Sink for TagFilterSink<S> {
    fn is_loggable(&self, tag: &str, priority: LogLevel) -> bool {
        match self.threshold(tag) {
            Some(threshold) => priority >= threshold && self.inner.is_loggable(tag, priority),
            None => false,
        }
    }

    fn emit(&self, tag: &str, priority: LogLevel, message: &str, error: Option<ErrorRef<'_>>) {
        self.inner.emit(tag, priority, message, error);
    }

    fn v(&self, tag: &str, message: &str, error: Option<ErrorRef<'_>>) {
        self.inner.v(tag, message, error);
    }

    fn d(&self, tag: &str, message: &str, error: Option<ErrorRef<'_>>) {
        self.inner.d(tag, message, error);
    }

    fn i(&self, tag: &str, message: &str, error: Option<ErrorRef<'_>>) {
        self.inner.i(tag, message, error);
    }

    fn w(&self, tag: &str, message: &str, error: Option<ErrorRef<'_>>) {
        self.inner.w(tag, message, error);
    }

    fn e(&self, tag: &str, message: &str, error: Option<ErrorRef<'_>>) {
        self.inner.e(tag, message, error);
    }

    fn wtf(&self, tag: &str, message: &str, error: Option<ErrorRef<'_>>) {
        self.inner.wtf(tag, message, error);
    }
}
