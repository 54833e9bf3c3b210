//! `vidlens render` command.
//!
//! Converts analysis markup from a file or stdin without calling the
//! service. Useful for previewing saved analyses.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use vidlens_core::markup::{MarkupOptions, Transformer};
use vidlens_core::{ios_print, ios_println};

use crate::factory::Factory;
use crate::report::html_page;

/// Convert analysis markup to HTML.
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Markup file to convert, or `-` for standard input.
    #[arg(value_name = "FILE", default_value = "-")]
    file: String,

    /// Emit a complete HTML page instead of a fragment.
    #[arg(long)]
    page: bool,

    /// Page title (with `--page`). Defaults to the file name.
    #[arg(long, requires = "page")]
    title: Option<String>,

    /// Escape HTML found in the input.
    #[arg(long)]
    escape_html: bool,
}

impl RenderArgs {
    /// Run the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read.
    pub async fn run(&self, factory: &Factory) -> Result<()> {
        let input = self.read_input().await?;
        let escape_input = self.escape_html || factory.lock_config()?.escape_html();
        let fragment = Transformer::with_options(MarkupOptions { escape_input }).transform(&input);

        let ios = &factory.io;
        if self.page {
            let title = self.title.clone().unwrap_or_else(|| self.default_title());
            ios_print!(ios, "{}", html_page(&title, "", &fragment));
        } else {
            ios_println!(ios, "{fragment}");
        }
        Ok(())
    }

    async fn read_input(&self) -> Result<String> {
        if self.file == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read standard input")?;
            return Ok(buf);
        }
        tokio::fs::read_to_string(&self.file)
            .await
            .with_context(|| format!("failed to read {}", self.file))
    }

    fn default_title(&self) -> String {
        Path::new(&self.file)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|_| self.file != "-")
            .unwrap_or("Analysis")
            .to_string()
    }
}
