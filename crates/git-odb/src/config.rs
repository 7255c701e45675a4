//! Object database settings and their environment overrides.

use crate::OdbError;

/// Environment variable enabling re-hash verification of every read.
pub const VERIFY_ENV: &str = "GIT_ODB_VERIFY";
/// Environment variable setting the object cache size.
pub const CACHE_SIZE_ENV: &str = "GIT_ODB_CACHE_SIZE";

/// Settings shared by the object database types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OdbConfig {
    /// Re-hash stored data on every read and reject it if the id disagrees.
    pub verify_on_read: bool,
    /// Number of parsed objects a [`CachedOdb`](crate::CachedOdb) keeps.
    pub cache_capacity: usize,
}

impl Default for OdbConfig {
    fn default() -> Self {
        Self {
            verify_on_read: false,
            cache_capacity: 1024,
        }
    }
}

impl OdbConfig {
    pub fn verify_on_read(mut self, verify: bool) -> Self {
        self.verify_on_read = verify;
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Defaults overridden by `GIT_ODB_VERIFY` and `GIT_ODB_CACHE_SIZE`.
    pub fn from_env() -> Result<Self, OdbError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, OdbError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(VERIFY_ENV) {
            config.verify_on_read = parse_bool(VERIFY_ENV, &value)?;
        }
        if let Some(value) = lookup(CACHE_SIZE_ENV) {
            config.cache_capacity = value.trim().parse().map_err(|_| OdbError::InvalidConfig {
                key: CACHE_SIZE_ENV,
                value: value.clone(),
            })?;
        }
        Ok(config)
    }
}

/// Boolean spelling accepted by git: true/yes/on, false/no/off, integers,
/// and the empty string as false.
fn parse_bool(key: &'static str, value: &str) -> Result<bool, OdbError> {
    let s = value.trim();
    if s.is_empty() {
        return Ok(false);
    }
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => match s.parse::<i64>() {
            Ok(n) => Ok(n != 0),
            Err(_) => Err(OdbError::InvalidConfig {
                key,
                value: value.to_string(),
            }),
        },
    }
}
