//! Configuration file
//!
//! TOML file read at startup and applied to a `GlobalConfig`:
//!
//! ```toml
//! [logging]
//! min_level = "info"      # or a raw priority, clamped into verbose..fatal
//! debug_mode = false      # omitted = follow the build profile
//! fatal_policy = "continue"
//!
//! [tags]
//! default_level = "verbose"
//! suppressed = ["Chatty"]
//!
//! [tags.levels]
//! Network = "warn"
//!
//! [output]
//! sink = "console"
//! ```

use crate::constants::DEFAULT_MIN_LEVEL;
use crate::error::{AnalogError, Result};
use crate::global::{self, FatalPolicy, GlobalConfig};
use crate::level::LogLevel;
use crate::sink::{ConsoleSink, Sink, TagFilterSink, TracingSink};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

// =============================================================================
// Application Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub tags: TagsConfig,
    pub output: OutputConfig,
}

/// A level given by name or by raw priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelSetting {
    Name(LogLevel),
    Priority(i64),
}

impl LevelSetting {
    /// Resolved level; out-of-range priorities are clamped
    pub fn level(self) -> LogLevel {
        match self {
            LevelSetting::Name(level) => level,
            LevelSetting::Priority(priority) => LogLevel::from_priority(priority),
        }
    }
}

impl Default for LevelSetting {
    fn default() -> Self {
        LevelSetting::Name(DEFAULT_MIN_LEVEL)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global floor
    pub min_level: LevelSetting,
    /// None = follow the build profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_mode: Option<bool>,
    pub fatal_policy: FatalPolicy,
}

/// Sink-side per-tag rules, see `TagFilterSink`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TagsConfig {
    /// Threshold for tags not listed in `levels`
    pub default_level: LogLevel,
    pub levels: HashMap<String, LogLevel>,
    /// Tags silenced at every level
    pub suppressed: Vec<String>,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Verbose,
            levels: HashMap::new(),
            suppressed: Vec::new(),
        }
    }
}

/// Where entries are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// `tracing` events (needs a subscriber)
    #[default]
    Tracing,
    /// logcat-style lines on stderr
    Console,
}

impl FromStr for SinkKind {
    type Err = AnalogError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tracing" => Ok(SinkKind::Tracing),
            "console" | "stderr" => Ok(SinkKind::Console),
            _ => Err(AnalogError::ParseSink {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkKind::Tracing => f.write_str("tracing"),
            SinkKind::Console => f.write_str("console"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub sink: SinkKind,
}

impl Config {
    /// Push the `[logging]` section into `target`
    pub fn apply(&self, target: &GlobalConfig) {
        target.set_min_level(self.logging.min_level.level());
        if let Some(enabled) = self.logging.debug_mode {
            target.set_debug_mode(enabled);
        }
        target.set_fatal_policy(self.logging.fatal_policy);
    }

    /// Sink described by `[output]`, wrapped with the `[tags]` rules
    pub fn build_sink(&self) -> Arc<dyn Sink> {
        let base: Arc<dyn Sink> = match self.output.sink {
            SinkKind::Tracing => Arc::new(TracingSink::new()),
            SinkKind::Console => Arc::new(ConsoleSink::stderr()),
        };
        Arc::new(TagFilterSink::from_config(base, &self.tags))
    }

    /// Apply to the process-wide dispatcher (config and sink)
    pub fn install(&self) {
        self.apply(global::config());
        global::set_sink(self.build_sink());
        debug!(
            min_level = %self.logging.min_level.level(),
            sink = %self.output.sink,
            "analog configured"
        );
    }
}

/// Load config from `path`
pub fn load(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| AnalogError::ConfigIo {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| AnalogError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load config from `path`, falling back to defaults on any error
pub fn load_or_default(path: &Path) -> Config {
    match load(path) {
        Ok(config) => config,
        Err(e) => {
            warn!("{}, using defaults", e);
            Config::default()
        }
    }
}

/// Save config to `path`
pub fn save(path: &Path, config: &Config) -> Result<()> {
    let content =
        toml::to_string_pretty(config).map_err(|e| AnalogError::ConfigSerialize { source: e })?;
    fs::write(path, content).map_err(|e| AnalogError::ConfigIo {
        path: path.to_path_buf(),
        source: e,
    })
}

// ============================================================================
// Tests
// ============================================================================
