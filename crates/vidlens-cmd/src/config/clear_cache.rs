//! `vidlens config clear-cache` command.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use vidlens_core::ios_println;

use crate::factory::Factory;

/// Delete report pages written by `analyze --web`.
#[derive(Debug, Args)]
pub struct ClearCacheArgs;

impl ClearCacheArgs {
    /// Run the config clear-cache command.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be read or a page
    /// cannot be removed.
    pub fn run(&self, factory: &Factory) -> Result<()> {
        let ios = &factory.io;
        let cache_dir = factory.cache_dir();
        let removed = if cache_dir.exists() {
            remove_pages(&cache_dir)?
        } else {
            0
        };
        tracing::debug!(dir = %cache_dir.display(), removed, "cache cleared");
        let cs = ios.color_scheme();
        ios_println!(ios, "{} Cleared the cache", cs.success_icon());
        Ok(())
    }
}

/// Remove the `*.html` report pages directly under `dir`. Other entries and
/// the directory itself are left in place.
fn remove_pages(dir: &Path) -> Result<usize> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    let mut removed = 0;
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to read {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "html") {
            std::fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_helpers::TestHarness;

    #[tokio::test]
    async fn test_should_remove_cached_pages() {
        let h = TestHarness::new().await;
        let page = h.cache_dir.path().join("video.html");
        std::fs::write(&page, "<html></html>").unwrap();

        ClearCacheArgs.run(&h.factory).unwrap();

        assert!(!page.exists());
        assert!(h.stdout().contains("Cleared the cache"));
    }

    #[tokio::test]
    async fn test_should_keep_files_it_did_not_write() {
        let h = TestHarness::new().await;
        let page = h.cache_dir.path().join("video.html");
        let notes = h.cache_dir.path().join("notes.txt");
        let nested = h.cache_dir.path().join("keep.html");
        std::fs::write(&page, "<html></html>").unwrap();
        std::fs::write(&notes, "mine").unwrap();
        std::fs::create_dir(&nested).unwrap();

        ClearCacheArgs.run(&h.factory).unwrap();

        assert!(!page.exists());
        assert!(notes.exists());
        assert!(nested.is_dir());
        assert!(h.cache_dir.path().is_dir());
    }

    #[tokio::test]
    async fn test_should_succeed_without_cache() {
        let h = TestHarness::new().await;
        std::fs::remove_dir_all(h.cache_dir.path()).unwrap();
        ClearCacheArgs.run(&h.factory).unwrap();
        assert!(h.stdout().contains("Cleared the cache"));
    }
}
