//! In-memory capture sink
//!
//! Keeps the most recent entries in a bounded ring buffer. Used by tests to
//! observe exactly what the dispatcher forwarded, and by applications that
//! want to attach recent logs to a bug report.

use super::{ErrorRef, Sink};
use crate::level::LogLevel;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// One captured entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// RFC 3339 capture time
    pub timestamp: String,
    pub tag: String,
    pub level: LogLevel,
    pub message: String,
    /// Rendered attached error, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Bounded capture sink
///
/// Oldest records are dropped once `capacity` is reached. The sink-side
/// veto can be switched off with [`MemorySink::set_allow`], and every veto
/// query is counted.
pub struct MemorySink {
    records: Mutex<VecDeque<Record>>,
    capacity: usize,
    allow: AtomicBool,
    queries: AtomicUsize,
}

impl MemorySink {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            allow: AtomicBool::new(true),
            queries: AtomicUsize::new(0),
        }
    }

    /// Answer for every subsequent `is_loggable` query
    pub fn set_allow(&self, allow: bool) {
        self.allow.store(allow, Ordering::Relaxed);
    }

    /// Number of `is_loggable` queries received
    pub fn veto_queries(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }

    /// Snapshot of captured records, oldest first
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Number of captured records at `level`
    pub fn count_at(&self, level: LogLevel) -> usize {
        self.records.lock().iter().filter(|r| r.level == level).count()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }

    /// Export captured records as JSON lines
    pub fn to_json_lines(&self) -> String {
        self.records
            .lock()
            .iter()
            .filter_map(|r| serde_json::to_string(r).ok())
            .map(|line| line + "\n")
            .collect()
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(crate::constants::MEMORY_SINK_CAPACITY)
    }
}

impl Sink for MemorySink {
    fn is_loggable(&self, _tag: &str, _priority: LogLevel) -> bool {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.allow.load(Ordering::Relaxed)
    }

    fn emit(&self, tag: &str, priority: LogLevel, message: &str, error: Option<ErrorRef<'_>>) {
        let record = Record {
            timestamp: chrono::Local::now().to_rfc3339(),
            tag: tag.to_string(),
            level: priority,
            message: message.to_string(),
            error: error.map(|e| e.to_string()),
        };

        let mut records = self.records.lock();
        if records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }
}
