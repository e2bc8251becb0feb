//! Binding configuration.

use serde::{Deserialize, Serialize};

/// Configuration consulted while freezing bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix for generated foreign key names.
    pub foreign_key_prefix: String,

    /// Prefix for generated primary key names.
    pub primary_key_prefix: String,

    /// Number of hash characters appended to a generated constraint name.
    pub constraint_hash_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            foreign_key_prefix: "FK".to_string(),
            primary_key_prefix: "PK".to_string(),
            constraint_hash_length: 25,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the foreign key name prefix.
    #[must_use]
    pub fn foreign_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.foreign_key_prefix = prefix.into();
        self
    }

    /// Sets the primary key name prefix.
    #[must_use]
    pub fn primary_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.primary_key_prefix = prefix.into();
        self
    }

    /// Sets the hash length of generated constraint names (capped at 64).
    #[must_use]
    pub const fn constraint_hash_length(mut self, length: usize) -> Self {
        self.constraint_hash_length = if length > 64 { 64 } else { length };
        self
    }
}
