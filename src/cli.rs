//! Command-line interface for the demo binary

use analog::config::SinkKind;
use analog::LogLevel;
use clap::Parser;
use std::path::PathBuf;

/// Demonstrates tagged, leveled logging through the analog facade
#[derive(Parser, Debug, Default)]
#[command(name = "analog-demo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Force debug mode on (every level passes the local gate)
    #[arg(long, conflicts_with = "release")]
    pub debug: bool,

    /// Force debug mode off
    #[arg(long)]
    pub release: bool,

    /// Global floor (overrides config)
    #[arg(long, value_name = "LEVEL")]
    pub min_level: Option<LogLevel>,

    /// Output sink: tracing or console (overrides config)
    #[arg(long, value_name = "SINK")]
    pub sink: Option<SinkKind>,

    /// Panic after a fatal entry is logged
    #[arg(long)]
    pub fatal_panic: bool,

    /// Enable trace-level subscriber output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Debug mode requested on the command line, if any
    pub fn debug_mode(&self) -> Option<bool> {
        match (self.debug, self.release) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
