//! Shared test utilities for command testing.
//!
//! Provides a factory wired to a wiremock analysis service, stub browser
//! and prompter, and a temporary cache directory.

use std::sync::Arc;

use serde_json::json;
use vidlens_core::browser::StubBrowser;
use vidlens_core::config::MemoryConfig;
use vidlens_core::iostreams::TestOutput;
use vidlens_core::prompter::StubPrompter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::factory::Factory;

/// A fully-configured test harness with factory, output capture, and mock server.
#[derive(Debug)]
pub struct TestHarness {
    /// The factory configured for testing.
    pub factory: Factory,
    /// Captured stdout/stderr output.
    pub output: TestOutput,
    /// Wiremock server standing in for the analysis service.
    pub server: MockServer,
    /// Stub browser for verifying opened pages.
    pub browser: Arc<StubBrowser>,
    /// Stub prompter for providing test answers.
    pub prompter: Arc<StubPrompter>,
    /// Cache directory receiving report pages.
    pub cache_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new test harness with a wiremock server and default config.
    pub async fn new() -> Self {
        Self::build(MemoryConfig::new(), Vec::new()).await
    }

    /// Create a test harness with a custom `MemoryConfig`.
    pub async fn with_config(config: MemoryConfig) -> Self {
        Self::build(config, Vec::new()).await
    }

    /// Create a harness on a simulated terminal where the prompter answers
    /// with `answers`, then with empty strings.
    pub async fn interactive<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let answers: Vec<String> = answers.into_iter().map(Into::into).collect();
        let mut harness = Self::build(MemoryConfig::new(), answers).await;
        harness.factory.io.set_stdin_tty(true);
        harness.factory.io.set_stdout_tty(true);
        harness.factory.io.set_never_prompt(false);
        harness
    }

    async fn build(config: MemoryConfig, answers: Vec<String>) -> Self {
        let server = MockServer::start().await;
        let cache_dir = tempfile::tempdir().unwrap();
        let (factory, output) = Factory::test();
        let (factory, browser) = factory.with_stub_browser();
        let (factory, prompter) = factory.with_stub_prompter(answers);
        let factory = factory
            .with_http_client(reqwest::Client::new())
            .with_service_url(format!("{}/", server.uri()))
            .with_cache_dir(cache_dir.path())
            .with_config(Box::new(config));

        Self {
            factory,
            output,
            server,
            browser,
            prompter,
            cache_dir,
        }
    }

    /// Get captured stdout as a string.
    pub fn stdout(&self) -> String {
        self.output.stdout()
    }

    /// Get captured stderr as a string.
    pub fn stderr(&self) -> String {
        self.output.stderr()
    }

    /// Get targets opened in the stub browser.
    pub fn opened_targets(&self) -> Vec<String> {
        self.browser.opened()
    }
}

// --- Wiremock helpers ---

/// Mount a `POST /generate` response.
pub async fn mock_generate(server: &MockServer, status: u16, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// A complete analysis response.
pub fn analysis_fixture() -> serde_json::Value {
    json!({
        "analysis": "## Résumé\n\n- **Sujet** : la cuisine\n- **Durée** : dix minutes\n\nVoir https://recettes.example/pates",
        "thumbnail": [
            { "url": "https://i.ytimg.test/vi/abc/default.jpg", "width": 120, "height": 90 },
            { "url": "https://i.ytimg.test/vi/abc/maxresdefault.jpg", "width": 1280, "height": 720 }
        ],
        "metadata": {
            "title": "Pâtes fraîches",
            "views": 152_340,
            "likes": 4210,
            "comments": 318,
            "channel": "Cuisine Facile",
            "duration": 634
        }
    })
}
