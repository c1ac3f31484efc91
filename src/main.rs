//! analog-demo - walks a couple of components through every log level
//!
//! Usage:
//!   analog-demo                         Defaults (debug mode follows the build)
//!   analog-demo --release --min-level info --sink console
//!   analog-demo --config analog.toml

mod cli;

use cli::Cli;
use analog::config::{self, Config};
use analog::{lazy, logging, Log, LogLevel, Loggable};
use clap::Parser;
use std::io;

struct Downloader {
    log: Loggable,
}

impl Log for Downloader {
    fn loggable(&self) -> &Loggable {
        &self.log
    }
}

impl Downloader {
    fn fetch(&self, url: &str, chunks: &[usize]) {
        self.i(format_args!("fetching {}", url));
        self.v(lazy(|| format!("chunk sizes: {:?}", chunks)));
        self.d(lazy(|| format!("{} bytes total", chunks.iter().sum::<usize>())));

        let err = io::Error::new(io::ErrorKind::TimedOut, "read timed out");
        self.w_err("slow mirror, retrying", &err);
    }
}

/// Explicit tag and its own floor, independent of the global one
struct CacheWithAVeryLongDescriptiveName {
    log: Loggable,
}

impl Log for CacheWithAVeryLongDescriptiveName {
    fn loggable(&self) -> &Loggable {
        &self.log
    }
}

fn main() -> analog::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let mut cfg = match &cli.config {
        Some(path) => config::load(path)?,
        None => Config::default(),
    };
    if let Some(level) = cli.min_level {
        cfg.logging.min_level = config::LevelSetting::Name(level);
    }
    if let Some(enabled) = cli.debug_mode() {
        cfg.logging.debug_mode = Some(enabled);
    }
    if let Some(sink) = cli.sink {
        cfg.output.sink = sink;
    }
    if cli.fatal_panic {
        cfg.logging.fatal_policy = analog::FatalPolicy::Panic;
    }
    cfg.install();

    let downloader = Downloader {
        log: Loggable::of::<Downloader>(),
    };
    downloader.fetch("https://example.org/data.bin", &[4096, 4096, 1024]);

    let derived = CacheWithAVeryLongDescriptiveName {
        log: Loggable::of::<CacheWithAVeryLongDescriptiveName>(),
    };
    derived.i(format_args!("derived tag is {:?}", derived.tag()));

    let cache = CacheWithAVeryLongDescriptiveName {
        log: Loggable::new::<CacheWithAVeryLongDescriptiveName>(Some("Cache"), LogLevel::Warn),
    };
    cache.i("not shown: below the cache's own floor");
    cache.e("eviction failed");
    cache.wtf("index corrupted");

    Ok(())
}
