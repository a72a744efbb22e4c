/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Configuration for fragment insertion.

use serde::Deserialize;

/// Default maximum number of nested fragment insertions.
pub const DEFAULT_MAX_INSERTION_DEPTH: usize = 50;

/// Default dialect prefix (`th:insert`, `data-th-fragment`, ...).
pub const DEFAULT_DIALECT_PREFIX: &str = "th";

/// Settings shared by the insertion processors of one engine.
///
/// Can be embedded in a host configuration file; missing keys take their
/// defaults:
///
/// ```toml
/// dialect-prefix = "th"
/// max-insertion-depth = 50
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct InsertionConfig {
    /// Prefix of the directive and signature attributes.
    pub dialect_prefix: String,

    /// Maximum nesting of fragment insertions before rendering fails.
    pub max_insertion_depth: usize,
}

impl Default for InsertionConfig {
    fn default() -> Self {
        Self {
            dialect_prefix: DEFAULT_DIALECT_PREFIX.to_string(),
            max_insertion_depth: DEFAULT_MAX_INSERTION_DEPTH,
        }
    }
}

impl InsertionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dialect_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.dialect_prefix = prefix.into();
        self
    }

    /// Set the maximum insertion nesting depth.
    pub fn with_max_insertion_depth(mut self, depth: usize) -> Self {
        self.max_insertion_depth = depth;
        self
    }

    /// Parse a TOML table holding insertion settings.
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}
