//! Factory for shared command dependencies.
//!
//! Provides lazy initialization of configuration and construction of the
//! analysis client, browser, and prompter. Supports test mode with
//! dependency injection for isolated testing.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use vidlens_api::AnalysisClient;
use vidlens_api::http::{HttpClientOptions, build_client};
use vidlens_core::browser::{Browser, StubBrowser, SystemBrowser};
use vidlens_core::cmdutil::determine_browser;
use vidlens_core::config::{Config, FileConfig};
use vidlens_core::iostreams::{IOStreams, TestOutput};
use vidlens_core::prompter::{DialoguerPrompter, Prompter, StubPrompter};

/// Shared factory providing lazily-initialized dependencies to all commands.
///
/// In production mode, dependencies are created from the real system.
/// In test mode, dependencies can be injected for isolated testing.
pub struct Factory {
    /// Application version.
    pub app_version: String,
    /// I/O streams.
    pub io: IOStreams,
    /// Configuration (lazily loaded).
    config: OnceLock<Mutex<Box<dyn Config>>>,

    // Test overrides
    http_override: Option<reqwest::Client>,
    service_url_override: Option<String>,
    cache_dir_override: Option<PathBuf>,
    browser_stub: Option<Arc<StubBrowser>>,
    prompter_stub: Option<Arc<StubPrompter>>,
}

impl std::fmt::Debug for Factory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Factory")
            .field("app_version", &self.app_version)
            .finish_non_exhaustive()
    }
}

impl Factory {
    /// Create a new factory with the given version.
    pub fn new(app_version: String) -> Self {
        let mut io = IOStreams::system();

        if std::env::var("VIDLENS_PROMPT_DISABLED").is_ok() {
            io.set_never_prompt(true);
        }

        Self::with_io(app_version, io)
    }

    /// Create a test factory with captured I/O.
    ///
    /// Returns the factory and a `TestOutput` for reading captured
    /// stdout/stderr.
    pub fn test() -> (Self, TestOutput) {
        let (io, output) = IOStreams::test_with_output();
        (Self::with_io("test".to_string(), io), output)
    }

    fn with_io(app_version: String, io: IOStreams) -> Self {
        Self {
            app_version,
            io,
            config: OnceLock::new(),
            http_override: None,
            service_url_override: None,
            cache_dir_override: None,
            browser_stub: None,
            prompter_stub: None,
        }
    }

    /// Set a custom reqwest HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_override = Some(client);
        self
    }

    /// Send analysis requests to `url` (e.g. a wiremock server) instead of
    /// the configured `service_url`.
    #[must_use]
    pub fn with_service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url_override = Some(url.into());
        self
    }

    /// Write report pages under `dir` instead of the user cache directory.
    #[must_use]
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir_override = Some(dir.into());
        self
    }

    /// Set a config override for testing.
    #[must_use]
    pub fn with_config(self, config: Box<dyn Config>) -> Self {
        let _ = self.config.set(Mutex::new(config));
        self
    }

    /// Set a stub browser and return the shared reference for verification.
    pub fn with_stub_browser(mut self) -> (Self, Arc<StubBrowser>) {
        let stub = Arc::new(StubBrowser::default());
        self.browser_stub = Some(stub.clone());
        (self, stub)
    }

    /// Set a stub prompter answering with `answers`, and return the shared
    /// reference for verification.
    pub fn with_stub_prompter<I, S>(mut self, answers: I) -> (Self, Arc<StubPrompter>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stub = Arc::new(StubPrompter::with_answers(answers));
        self.prompter_stub = Some(stub.clone());
        (self, stub)
    }

    /// Get the configuration, loading it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if config cannot be loaded.
    pub fn config(&self) -> anyhow::Result<&Mutex<Box<dyn Config>>> {
        if let Some(cfg) = self.config.get() {
            return Ok(cfg);
        }
        let cfg = FileConfig::load()?;
        let boxed: Box<dyn Config> = Box::new(cfg);
        // Ignore set error - another thread may have set it first
        let _ = self.config.set(Mutex::new(boxed));
        self.config
            .get()
            .ok_or_else(|| anyhow::anyhow!("failed to initialize config"))
    }

    /// Lock the configuration for reading or writing.
    ///
    /// # Errors
    ///
    /// Returns an error if config cannot be loaded or the lock is poisoned.
    pub fn lock_config(&self) -> anyhow::Result<MutexGuard<'_, Box<dyn Config>>> {
        self.config()?
            .lock()
            .map_err(|e| anyhow::anyhow!("config lock: {e}"))
    }

    /// Whether interactive prompts may be shown.
    pub fn can_prompt(&self) -> bool {
        self.io.can_prompt()
            && self
                .lock_config()
                .map(|cfg| cfg.prompt_enabled())
                .unwrap_or(true)
    }

    /// Directory receiving report pages opened with `--web`.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir_override
            .clone()
            .unwrap_or_else(vidlens_core::config::cache_dir)
    }

    /// Create a browser instance.
    ///
    /// In test mode with a stub browser, returns the stub.
    pub fn browser(&self) -> Box<dyn Browser> {
        if let Some(ref stub) = self.browser_stub {
            return Box::new(StubBrowserWrapper(stub.clone()));
        }
        let launcher = self
            .lock_config()
            .ok()
            .and_then(|cfg| determine_browser(&**cfg));
        Box::new(SystemBrowser::new(launcher))
    }

    /// Create a prompter instance.
    ///
    /// In test mode with a stub prompter, returns the stub.
    pub fn prompter(&self) -> Box<dyn Prompter> {
        if let Some(ref stub) = self.prompter_stub {
            return Box::new(StubPrompterWrapper(stub.clone()));
        }
        Box::new(DialoguerPrompter)
    }

    /// Build a client for the analysis service.
    ///
    /// In test mode, uses the injected HTTP client and service URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the service
    /// URL is invalid.
    pub fn analysis_client(&self) -> anyhow::Result<AnalysisClient> {
        let http = if let Some(ref client) = self.http_override {
            client.clone()
        } else {
            build_client(&HttpClientOptions {
                app_version: self.app_version.clone(),
            })?
        };

        let base_url = match self.service_url_override {
            Some(ref url) => url.clone(),
            None => self.lock_config()?.service_url(),
        };
        tracing::debug!(%base_url, "using analysis service");

        Ok(AnalysisClient::new(http, &base_url)?)
    }
}

/// Wrapper to use `Arc<StubBrowser>` as `Box<dyn Browser>`.
#[derive(Debug)]
struct StubBrowserWrapper(Arc<StubBrowser>);

impl Browser for StubBrowserWrapper {
    fn open(&self, target: &str) -> anyhow::Result<()> {
        self.0.open(target)
    }
}

/// Wrapper to use `Arc<StubPrompter>` as `Box<dyn Prompter>`.
#[derive(Debug)]
struct StubPrompterWrapper(Arc<StubPrompter>);

impl Prompter for StubPrompterWrapper {
    fn input(&self, prompt: &str) -> anyhow::Result<String> {
        self.0.input(prompt)
    }
}
