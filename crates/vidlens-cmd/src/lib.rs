//! Command implementations for the vidlens CLI.
//!
//! Each command module exposes a clap `Args`/`Subcommand` type with a `run`
//! method taking the shared [`factory::Factory`].

pub mod analyze;
pub mod config;
pub mod factory;
pub mod render;
pub mod report;
pub mod session;
pub mod version;

#[cfg(test)]
pub mod test_helpers;
