//! In-memory configuration for tests.

use std::collections::HashMap;

use super::{Config, validate};

/// Configuration held in a `HashMap`. No disk I/O and no environment
/// overrides, so tests stay deterministic.
///
/// ```
/// use vidlens_core::config::{Config, MemoryConfig};
///
/// let config = MemoryConfig::new().with("output_format", "json");
/// assert_eq!(config.output_format(), "json");
/// assert!(!config.escape_html());
/// ```
#[derive(Debug, Default)]
pub struct MemoryConfig {
    values: HashMap<String, String>,
}

impl MemoryConfig {
    /// Create a new empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter that skips validation.
    #[must_use]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl Config for MemoryConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        validate(key, value)?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn write(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
