//! Opening report pages in a web browser.

use std::path::Path;
use std::sync::Mutex;

/// Opens a URL or a local file in a browser.
pub trait Browser: Send + Sync + std::fmt::Debug {
    /// Open `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser cannot be launched.
    fn open(&self, target: &str) -> anyhow::Result<()>;

    /// Open a local file.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser cannot be launched.
    fn open_path(&self, path: &Path) -> anyhow::Result<()> {
        self.open(&path.display().to_string())
    }
}

/// Browser started through the platform opener, or through a launcher
/// command such as `firefox --new-window`.
#[derive(Debug, Clone, Default)]
pub struct SystemBrowser {
    launcher: Option<String>,
}

impl SystemBrowser {
    /// Use `launcher` when set and non-blank, else the system default.
    pub fn new(launcher: Option<String>) -> Self {
        Self {
            launcher: launcher.filter(|l| !l.trim().is_empty()),
        }
    }

    /// Split the launcher into program and arguments.
    fn command_line(&self) -> Option<Vec<String>> {
        let launcher = self.launcher.as_ref()?;
        let parts = shlex::split(launcher).unwrap_or_else(|| vec![launcher.clone()]);
        (!parts.is_empty()).then_some(parts)
    }
}

impl Browser for SystemBrowser {
    fn open(&self, target: &str) -> anyhow::Result<()> {
        match self.command_line() {
            Some(parts) => {
                tracing::debug!(launcher = %parts[0], target, "opening with launcher");
                std::process::Command::new(&parts[0])
                    .args(&parts[1..])
                    .arg(target)
                    .spawn()?;
            }
            None => {
                tracing::debug!(target, "opening with system default");
                open::that(target)?;
            }
        }
        Ok(())
    }
}

/// Browser that records what it was asked to open.
#[derive(Debug, Default)]
pub struct StubBrowser {
    opened: Mutex<Vec<String>>,
}

impl StubBrowser {
    /// Targets opened so far.
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Browser for StubBrowser {
    fn open(&self, target: &str) -> anyhow::Result<()> {
        self.opened
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(target.to_string());
        Ok(())
    }
}
