//! Delivering a report: stdout, a file, or a page opened in the browser.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use vidlens_core::iostreams::ColorScheme;
use vidlens_core::{ios_eprintln, ios_println, text};

use crate::factory::Factory;
use crate::report::{Report, ReportFormat};

/// Show `report` in `format`, on stdout unless `output` is set. With `web`,
/// the HTML page is written to the cache directory and opened instead.
pub(super) async fn show(
    factory: &Factory,
    report: &Report,
    format: ReportFormat,
    output: Option<&Path>,
    web: bool,
) -> Result<()> {
    let ios = &factory.io;
    let cs = ios.color_scheme();

    if web {
        let path = write_page(&factory.cache_dir(), report).await?;
        if ios.is_stderr_tty() {
            ios_eprintln!(ios, "Opening {} in your browser.", path.display());
        }
        factory.browser().open_path(&path)?;
        return Ok(());
    }

    match output {
        Some(path) => {
            let plain = ColorScheme::new(false);
            let rendered = report.render(format, ios.terminal_width(), false, &plain)?;
            tokio::fs::write(path, ensure_newline(rendered))
                .await
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            ios_eprintln!(
                ios,
                "{} Wrote report to {}",
                cs.success_icon(),
                path.display()
            );
        }
        None => {
            let rendered =
                report.render(format, ios.terminal_width(), ios.is_stdout_tty(), &cs)?;
            ios_println!(ios, "{}", rendered.trim_end_matches('\n'));
        }
    }
    Ok(())
}

/// Write the HTML page of `report` under `dir`, named after the video.
async fn write_page(dir: &Path, report: &Report) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(format!("{}.html", text::slugify(&report.display_title())));
    tokio::fs::write(&path, report.to_html_page())
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "report page written");
    Ok(path)
}

fn ensure_newline(mut s: String) -> String {
    if !s.ends_with('\n') {
        s.push('\n');
    }
    s
}
