//! Loggable capability
//!
//! A `Loggable` is the (tag, floor) pair a component holds to gain logging.
//! There is no base type to inherit from: a component stores a `Loggable`
//! and implements [`Log`](crate::Log) by handing it out.

use crate::constants::{DEFAULT_EXPLICIT_LEVEL, MAX_TAG_LEN};
use crate::global::GlobalConfig;
use crate::level::LogLevel;

/// Minimum level of a loggable, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Floor {
    /// Follow the global floor, read on every call
    Global,
    /// Own floor, independent of the global one
    Fixed(LogLevel),
}

impl Floor {
    /// Effective level under `config`
    #[inline]
    pub fn resolve(self, config: &GlobalConfig) -> LogLevel {
        match self {
            Floor::Global => config.min_level(),
            Floor::Fixed(level) => level,
        }
    }
}

/// Tag plus floor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loggable {
    tag: String,
    floor: Floor,
}

impl Loggable {
    /// Tag derived from `T`'s simple name, floor following the global one
    pub fn of<T: ?Sized>() -> Self {
        Self {
            tag: derive_tag::<T>(),
            floor: Floor::Global,
        }
    }

    /// Same as [`Loggable::of`], inferring `T` from a value
    pub fn of_val<T: ?Sized>(_value: &T) -> Self {
        Self::of::<T>()
    }

    /// Explicit floor, explicit tag or (when `None`) the tag derived from `T`
    pub fn new<T: ?Sized>(tag: Option<&str>, min_level: LogLevel) -> Self {
        Self {
            tag: tag.map_or_else(derive_tag::<T>, truncate_tag),
            floor: Floor::Fixed(min_level),
        }
    }

    /// Explicit tag with the default explicit floor
    pub fn named(tag: &str) -> Self {
        Self::tagged(tag, DEFAULT_EXPLICIT_LEVEL)
    }

    /// Explicit tag and floor
    pub fn tagged(tag: &str, min_level: LogLevel) -> Self {
        Self {
            tag: truncate_tag(tag),
            floor: Floor::Fixed(min_level),
        }
    }

    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[inline]
    pub fn floor(&self) -> Floor {
        self.floor
    }

    /// Effective minimum level under `config`
    pub fn min_level(&self, config: &GlobalConfig) -> LogLevel {
        self.floor.resolve(config)
    }
}

/// Tag for `T`: its simple name, truncated
pub fn derive_tag<T: ?Sized>() -> String {
    truncate_tag(simple_type_name(std::any::type_name::<T>()))
}

/// Strip the module path and generic arguments from a type name
///
/// `alloc::vec::Vec<my_app::Item>` becomes `Vec`. Composite types give
/// their first named element (`(Foo, Bar)` and `[Foo; 3]` give `Foo`,
/// `&mut Foo` gives `Foo`); a closure gives its enclosing function.
pub fn simple_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::")
        .filter(|segment| !segment.starts_with("{{"))
        .map(first_ident)
        .find(|name| !name.is_empty())
        .unwrap_or(base)
}

fn first_ident(segment: &str) -> &str {
    segment
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .find(|word| !word.is_empty() && !matches!(*word, "mut" | "const" | "dyn"))
        .unwrap_or("")
}

/// Cut `tag` to at most `MAX_TAG_LEN` characters
pub fn truncate_tag(tag: &str) -> String {
    match tag.char_indices().nth(MAX_TAG_LEN) {
        Some((end, _)) => tag[..end].to_string(),
        None => tag.to_string(),
    }
}
