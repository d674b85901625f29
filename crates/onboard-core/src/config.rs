//! Environment-backed configuration helpers.
//!
//! Services build one explicit config value at startup and pass it down; nothing reads the
//! environment after that. Lookups go through a closure so configs can be built from a map
//! in tests.

use std::fmt::Display;
use std::str::FromStr;

/// Configuration could not be loaded. Always fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for env var {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Typed accessors over a key → value lookup.
pub struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }

    /// Value of `name`, or `None` when unset or blank.
    pub fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
    }

    /// Value of `name`; unset or blank is an error.
    pub fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::Missing(name))
    }

    /// Parse `name` into `T`, falling back to `default` when unset.
    pub fn parse_or<T>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.optional(name) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
                name,
                reason: e.to_string(),
            }),
        }
    }
}

/// Lookup over the process environment.
pub fn process_env() -> Env<impl Fn(&str) -> Option<String>> {
    Env::new(|name: &str| std::env::var(name).ok())
}
