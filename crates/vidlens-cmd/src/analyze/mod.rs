//! `vidlens analyze` command.
//!
//! Submits a video URL to the analysis service and shows the report. Without
//! a URL on an interactive terminal, keeps asking for URLs until an empty
//! answer, reusing one session.

mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use vidlens_api::AnalysisClient;
use vidlens_core::cmdutil::{FlagError, parse_video_url};
use vidlens_core::ios_eprintln;
use vidlens_core::markup::{MarkupOptions, Transformer};
use vidlens_core::text;

use crate::factory::Factory;
use crate::report::{Report, ReportFormat};
use crate::session::Session;

const URL_PROMPT: &str = "Video URL (empty to quit)";

/// Analyze a video.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Video URL. Prompted for when omitted on a terminal.
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Output format (defaults to the `output_format` setting).
    #[arg(short, long, value_enum)]
    format: Option<ReportFormat>,

    /// Write the report to a file instead of stdout.
    #[arg(short, long, value_name = "FILE", conflicts_with = "web")]
    output: Option<PathBuf>,

    /// Open the report page in the web browser.
    #[arg(short, long)]
    web: bool,

    /// Escape HTML found in the analysis text.
    #[arg(long)]
    escape_html: bool,
}

impl AnalyzeArgs {
    /// Run the analyze command.
    ///
    /// # Errors
    ///
    /// Returns an error if no URL is available, the URL is invalid, the
    /// service request fails, or the report cannot be written.
    pub async fn run(&self, factory: &Factory) -> Result<()> {
        let (format, transformer) = self.resolve_settings(factory)?;
        let client = factory.analysis_client()?;
        let mut session = Session::new();

        if let Some(ref url) = self.url {
            return self
                .submit(factory, &client, &mut session, &transformer, format, url)
                .await;
        }

        if !factory.can_prompt() {
            return Err(
                FlagError("a video URL is required when not running interactively".into()).into(),
            );
        }

        let ios = &factory.io;
        let cs = ios.color_scheme();
        let prompter = factory.prompter();
        loop {
            let answer = prompter.input(URL_PROMPT)?;
            if answer.trim().is_empty() {
                return Ok(());
            }
            if let Err(err) = self
                .submit(factory, &client, &mut session, &transformer, format, &answer)
                .await
            {
                ios_eprintln!(ios, "{} {err:#}", cs.error_icon());
            }
        }
    }

    /// Report format and transformer from flags, falling back to config.
    fn resolve_settings(&self, factory: &Factory) -> Result<(ReportFormat, Transformer)> {
        let cfg = factory.lock_config()?;
        let format = match self.format {
            Some(format) => format,
            None => cfg
                .output_format()
                .parse()
                .context("invalid output_format setting")?,
        };
        let options = MarkupOptions {
            escape_input: self.escape_html || cfg.escape_html(),
        };
        Ok((format, Transformer::with_options(options)))
    }

    /// One submission: validate, call the service, show the result.
    async fn submit(
        &self,
        factory: &Factory,
        client: &AnalysisClient,
        session: &mut Session,
        transformer: &Transformer,
        format: ReportFormat,
        input: &str,
    ) -> Result<()> {
        let url = parse_video_url(input)?;
        let ticket = session.submit(url.as_str());

        let progress = factory.io.start_progress("Analyzing…");
        let outcome = client.generate(url.as_str()).await;
        progress.finish();

        if let Some(elapsed) = session.elapsed() {
            tracing::debug!(%url, elapsed = %text::format_elapsed(elapsed), "analysis settled");
        }

        match outcome {
            Ok(result) => {
                session.resolve(ticket, Report::from_result(url.as_str(), result, transformer));
            }
            Err(err) => {
                session.fail(ticket, err.to_string());
                return Err(anyhow::Error::new(err).context(format!("failed to analyze {url}")));
            }
        }

        let report = session
            .report()
            .context("analysis was superseded by a newer submission")?;
        output::show(factory, report, format, self.output.as_deref(), self.web).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use vidlens_core::cmdutil::is_user_cancellation;
    use vidlens_core::config::MemoryConfig;

    use super::*;
    use crate::test_helpers::{TestHarness, analysis_fixture, mock_generate};

    fn args(url: Option<&str>) -> AnalyzeArgs {
        AnalyzeArgs {
            url: url.map(str::to_string),
            format: None,
            output: None,
            web: false,
            escape_html: false,
        }
    }

    #[tokio::test]
    async fn test_should_print_fragment_for_minimal_analysis() {
        let h = TestHarness::new().await;
        mock_generate(
            &h.server,
            200,
            json!({
                "analysis": "## Résumé\n- **Point** : détail",
                "thumbnail": [{ "url": "T" }],
                "metadata": { "title": "V", "views": 1, "likes": 2, "comments": 3 }
            }),
        )
        .await;

        let mut a = args(Some("https://www.youtube.com/watch?v=abc"));
        a.format = Some(ReportFormat::Fragment);
        a.run(&h.factory).await.unwrap();

        assert_eq!(
            h.stdout(),
            "<h3>Résumé</h3><br/><ul><li><strong>Point</strong> : détail</li></ul>\n",
        );
    }

    #[tokio::test]
    async fn test_should_print_text_report_by_default() {
        let h = TestHarness::new().await;
        mock_generate(&h.server, 200, analysis_fixture()).await;

        args(Some("https://www.youtube.com/watch?v=abc"))
            .run(&h.factory)
            .await
            .unwrap();

        let stdout = h.stdout();
        assert!(stdout.starts_with("Pâtes fraîches\n"), "{stdout}");
        assert!(stdout.contains("152340 views"), "{stdout}");
        assert!(stdout.contains("Thumbnail: https://i.ytimg.test/vi/abc/maxresdefault.jpg"));
        assert!(stdout.contains("Résumé\n"));
        assert!(!stdout.contains("**"));
    }

    #[tokio::test]
    async fn test_should_use_configured_output_format() {
        let h = TestHarness::with_config(MemoryConfig::new().with("output_format", "json")).await;
        mock_generate(&h.server, 200, analysis_fixture()).await;

        args(Some("https://www.youtube.com/watch?v=abc"))
            .run(&h.factory)
            .await
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&h.stdout()).unwrap();
        assert_eq!(value["title"], "Pâtes fraîches");
        assert_eq!(value["url"], "https://www.youtube.com/watch?v=abc");
    }

    #[tokio::test]
    async fn test_should_escape_html_when_configured() {
        let h = TestHarness::with_config(MemoryConfig::new().with("escape_html", "enabled")).await;
        mock_generate(&h.server, 200, json!({ "analysis": "<img src=x>" })).await;

        let mut a = args(Some("https://v.test/w"));
        a.format = Some(ReportFormat::Fragment);
        a.run(&h.factory).await.unwrap();

        assert_eq!(h.stdout(), "&lt;img src=x&gt;\n");
    }

    #[tokio::test]
    async fn test_should_fail_with_service_message() {
        let h = TestHarness::new().await;
        mock_generate(&h.server, 500, json!({ "error": "no transcript" })).await;

        let err = args(Some("https://v.test/w"))
            .run(&h.factory)
            .await
            .unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("failed to analyze https://v.test/w"), "{message}");
        assert!(message.contains("no transcript"), "{message}");
        assert!(h.stdout().is_empty());
    }

    #[tokio::test]
    async fn test_should_reject_invalid_video_url() {
        let h = TestHarness::new().await;
        let err = args(Some("not a url")).run(&h.factory).await.unwrap_err();
        assert!(err.to_string().contains("invalid video URL"), "{err}");
    }

    #[tokio::test]
    async fn test_should_require_url_when_not_interactive() {
        let h = TestHarness::new().await;
        let err = args(None).run(&h.factory).await.unwrap_err();
        assert!(err.downcast_ref::<FlagError>().is_some());
    }

    #[tokio::test]
    async fn test_should_prompt_until_empty_answer() {
        let h = TestHarness::interactive([
            "https://v.test/1",
            "not a url",
            "https://v.test/2",
            "",
        ])
        .await;
        mock_generate(&h.server, 200, json!({ "analysis": "ok" })).await;

        let mut a = args(None);
        a.format = Some(ReportFormat::Fragment);
        a.run(&h.factory).await.unwrap();

        assert_eq!(h.stdout(), "ok\nok\n");
        assert!(h.stderr().contains("invalid video URL"));
        assert_eq!(h.prompter.prompts().len(), 4);
    }

    #[tokio::test]
    async fn test_should_keep_prompting_after_service_failure() {
        let h = TestHarness::interactive(["https://v.test/1", ""]).await;
        mock_generate(&h.server, 500, json!({ "error": "quota" })).await;

        args(None).run(&h.factory).await.unwrap();

        assert!(h.stderr().contains("quota"), "{}", h.stderr());
        assert_eq!(h.prompter.prompts().len(), 2);
    }

    #[tokio::test]
    async fn test_should_stop_prompting_when_cancelled() {
        let h = TestHarness::interactive(["https://v.test/1"]).await;
        h.prompter.cancel_when_exhausted();
        mock_generate(&h.server, 200, json!({ "analysis": "ok" })).await;

        let mut a = args(None);
        a.format = Some(ReportFormat::Fragment);
        let err = a.run(&h.factory).await.unwrap_err();

        assert!(is_user_cancellation(&err));
        assert_eq!(h.stdout(), "ok\n");
        assert_eq!(h.prompter.prompts().len(), 2);
    }
}
