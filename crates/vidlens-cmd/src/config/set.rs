//! `vidlens config set` command.

use anyhow::{Context, Result};
use clap::Args;

use crate::factory::Factory;

/// Update configuration with a value for the given key.
#[derive(Debug, Args)]
pub struct SetArgs {
    /// The configuration key to set.
    key: String,
    /// The value to set.
    value: String,
}

impl SetArgs {
    /// Run the config set command.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value is invalid, or the
    /// configuration cannot be saved.
    pub fn run(&self, factory: &Factory) -> Result<()> {
        let mut cfg = factory.lock_config()?;
        cfg.set(&self.key, &self.value)
            .with_context(|| format!("failed to set {:?} to {:?}", self.key, self.value))?;
        cfg.write()?;
        tracing::debug!(key = %self.key, "configuration updated");
        Ok(())
    }
}
