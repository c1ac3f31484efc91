//! Centralized error types
//!
//! Logging itself never fails: level clamping is silent and sink failures
//! belong to the sink. These errors only cover the configuration surface.
//! Use `Result<T>` as shorthand for `std::result::Result<T, AnalogError>`.

use std::fmt;
use std::path::PathBuf;

/// All analog errors
#[derive(Debug)]
pub enum AnalogError {
    // === Config ===
    /// Config file could not be read or written
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Config file is not valid TOML for `Config`
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Config could not be serialized
    ConfigSerialize { source: toml::ser::Error },

    // === Values ===
    /// Unknown level name
    ParseLevel { input: String },
    /// Unknown sink name
    ParseSink { input: String },
}

impl std::error::Error for AnalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigIo { source, .. } => Some(source),
            Self::ConfigParse { source, .. } => Some(source),
            Self::ConfigSerialize { source } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for AnalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigIo { path, .. } => write!(f, "Config IO error: {}", path.display()),
            Self::ConfigParse { path, source } => {
                write!(f, "Invalid config {}: {}", path.display(), source)
            }
            Self::ConfigSerialize { source } => write!(f, "Cannot serialize config: {}", source),
            Self::ParseLevel { input } => write!(f, "Unknown log level: {:?}", input),
            Self::ParseSink { input } => write!(f, "Unknown sink: {:?}", input),
        }
    }
}

/// Alias for Result with AnalogError
pub type Result<T> = std::result::Result<T, AnalogError>;
