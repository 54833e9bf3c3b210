//! Core types, traits, and utilities for the vidlens CLI.
//!
//! This crate provides the foundational pieces shared by the other crates:
//! - [`markup`] converts the analysis service's markdown dialect to HTML
//! - [`IOStreams`] for terminal I/O, colors, and the progress spinner
//! - [`config::Config`] trait for configuration management
//! - [`prompter::Prompter`] trait for interactive prompts
//! - Text utilities and terminal markdown rendering

pub mod browser;
pub mod cmdutil;
pub mod config;
pub mod errors;
pub mod iostreams;
pub mod markdown;
pub mod markup;
pub mod prompter;
#[cfg(test)]
pub mod test_utils;
pub mod text;

pub use errors::CoreError;
pub use iostreams::IOStreams;
pub use markup::{HtmlFragment, MarkupOptions, Transformer, transform};
