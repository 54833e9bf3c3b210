//! `vidlens config list` command.

use anyhow::Result;
use clap::Args;

use vidlens_core::config::CONFIG_OPTIONS;
use vidlens_core::ios_println;

use crate::factory::Factory;

/// Print a list of configuration keys and values.
#[derive(Debug, Args)]
pub struct ListArgs {}

impl ListArgs {
    /// Run the config list command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be read.
    pub fn run(&self, factory: &Factory) -> Result<()> {
        let ios = &factory.io;
        let cfg = factory.lock_config()?;

        for option in CONFIG_OPTIONS {
            let value = option.current_value(&**cfg);
            ios_println!(ios, "{}={value}", option.key);
        }

        Ok(())
    }
}
