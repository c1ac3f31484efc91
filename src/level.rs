//! Log severity levels

use crate::error::AnalogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log call, ordered from least to most severe.
///
/// Discriminants match the platform log priorities (VERBOSE=2 .. ASSERT=7)
/// so a raw priority can be converted with [`LogLevel::from_priority`].
#[repr(u8)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[serde(alias = "trace", alias = "v")]
    Verbose = 2,
    #[serde(alias = "d")]
    Debug = 3,
    #[serde(alias = "i")]
    Info = 4,
    #[serde(alias = "warning", alias = "w")]
    Warn = 5,
    #[serde(alias = "e")]
    Error = 6,
    /// "What a terrible failure": reported through the sink's most severe path
    #[serde(alias = "wtf", alias = "assert", alias = "f")]
    Fatal = 7,
}

impl LogLevel {
    /// All levels, least severe first
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Verbose,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    /// Convert a raw priority, clamping into `Verbose..=Fatal`
    pub const fn from_priority(priority: i64) -> Self {
        match priority {
            i64::MIN..=2 => LogLevel::Verbose,
            3 => LogLevel::Debug,
            4 => LogLevel::Info,
            5 => LogLevel::Warn,
            6 => LogLevel::Error,
            _ => LogLevel::Fatal,
        }
    }

    /// Raw priority value
    #[inline]
    pub const fn priority(self) -> u8 {
        self as u8
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
        }
    }

    /// Single-letter code used in logcat-style lines
    pub const fn as_char(self) -> char {
        match self {
            LogLevel::Verbose => 'V',
            LogLevel::Debug => 'D',
            LogLevel::Info => 'I',
            LogLevel::Warn => 'W',
            LogLevel::Error => 'E',
            LogLevel::Fatal => 'F',
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = AnalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verbose" | "trace" | "v" => Ok(LogLevel::Verbose),
            "debug" | "d" => Ok(LogLevel::Debug),
            "info" | "i" => Ok(LogLevel::Info),
            "warn" | "warning" | "w" => Ok(LogLevel::Warn),
            "error" | "e" => Ok(LogLevel::Error),
            "fatal" | "wtf" | "assert" | "f" => Ok(LogLevel::Fatal),
            _ => Err(AnalogError::ParseLevel {
                input: s.to_string(),
            }),
        }
    }
}
