//! `vidlens config get` command.

use anyhow::Result;
use clap::Args;

use vidlens_core::config::option_for_key;
use vidlens_core::ios_println;

use crate::factory::Factory;

/// Print the value of a given configuration key.
#[derive(Debug, Args)]
pub struct GetArgs {
    /// The configuration key to read.
    key: String,
}

impl GetArgs {
    /// Run the config get command.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not known.
    pub fn run(&self, factory: &Factory) -> Result<()> {
        let ios = &factory.io;
        let cfg = factory.lock_config()?;

        let value = match cfg.get(&self.key) {
            Some(val) => val,
            None => match option_for_key(&self.key) {
                Some(option) => option.default_value.to_string(),
                None => anyhow::bail!("could not find key \"{}\"", self.key),
            },
        };
        if !value.is_empty() {
            ios_println!(ios, "{value}");
        }
        Ok(())
    }
}
