//! Library-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

use crate::level::LogLevel;

// =============================================================================
// Tags
// =============================================================================

/// Maximum tag length accepted by downstream sinks (platform log buffer limit)
pub const MAX_TAG_LEN: usize = 23;

// =============================================================================
// Levels
// =============================================================================

/// Initial global floor, used by loggables with a derived tag
pub const DEFAULT_MIN_LEVEL: LogLevel = LogLevel::Debug;

/// Floor given to explicitly tagged loggables when none is supplied
pub const DEFAULT_EXPLICIT_LEVEL: LogLevel = LogLevel::Debug;

/// Initial debug mode follows the build profile
pub const DEFAULT_DEBUG_MODE: bool = cfg!(debug_assertions);

// =============================================================================
// Sinks
// =============================================================================

/// Default number of records kept by `MemorySink`
pub const MEMORY_SINK_CAPACITY: usize = 1024;

/// Timestamp format for console lines (HH:MM:SS.mmm)
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S%.3f";
