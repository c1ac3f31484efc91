//! analog - tagged, leveled logging through capability composition
//!
//! A component gains logging by holding a [`Loggable`] (tag + floor) and
//! implementing [`Log`]. Each call goes through a level gate before the
//! message is built, then to a [`Sink`].
//!
//! ```ignore
//! use analog::{lazy, Log, Loggable};
//!
//! struct Downloader {
//!     log: Loggable,
//! }
//!
//! impl Log for Downloader {
//!     fn loggable(&self) -> &Loggable {
//!         &self.log
//!     }
//! }
//!
//! let dl = Downloader { log: Loggable::of::<Downloader>() };
//! dl.i("started");
//! dl.d(lazy(|| format!("{} bytes buffered", expensive_count())));
//! ```

pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod global;
pub mod level;
pub mod loggable;
pub mod logging;
pub mod sink;

pub use dispatch::{lazy, Dispatcher, Log, MessageSource, Scoped};
pub use error::{AnalogError, Result};
pub use global::{FatalPolicy, GlobalConfig};
pub use level::LogLevel;
pub use loggable::{Floor, Loggable};
pub use sink::{ErrorRef, Sink};
