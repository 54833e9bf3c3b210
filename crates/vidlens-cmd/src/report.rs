//! Report view model and its renderers.
//!
//! A [`Report`] is what `analyze` shows for one successful submission: the
//! transformed analysis body plus the few metadata fields worth displaying.

use std::fmt::Write as _;
use std::str::FromStr;

use serde::Serialize;
use vidlens_api::{AnalysisResult, Chapter, Metric};
use vidlens_core::iostreams::ColorScheme;
use vidlens_core::markup::{HtmlFragment, Transformer};
use vidlens_core::{markdown, text};

const PAGE_STYLE: &str = "\
body{margin:0;background:#111;color:#eee;font:16px/1.6 system-ui,sans-serif}
main{max-width:56rem;margin:0 auto;padding:2rem 1rem}
img.thumbnail{width:100%;border-radius:.75rem}
h2{font-size:1.6rem;margin:1.5rem 0 .25rem}
h3{font-size:1.25rem;margin:1.5rem 0 .5rem}
h4{font-size:1.05rem;margin:1rem 0 .25rem}
ul{padding-left:1.25rem}
a{color:#f87171}
.meta,.source{color:#aaa}
.metrics{display:flex;gap:1.5rem;list-style:none;padding:0}";

/// Output format of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// Styled terminal text. The analysis is rendered from its raw
    /// markdown for the terminal and does not go through the HTML
    /// transformer.
    Text,
    /// Standalone HTML page.
    Html,
    /// Bare HTML fragment of the analysis body.
    Fragment,
    /// The report as JSON.
    Json,
}

impl FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            "fragment" => Ok(Self::Fragment),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unknown report format {other:?}"),
        }
    }
}

/// A rendered analysis with its display metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Video URL as submitted.
    pub url: String,
    /// Video title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Preferred thumbnail URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Why no thumbnail could be fetched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_error: Option<String>,
    /// Uploader name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Duration in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Metric>,
    /// View count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<Metric>,
    /// Like count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<Metric>,
    /// Comment count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Metric>,
    /// Chapter markers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub chapters: Vec<Chapter>,
    /// Analysis text as received.
    pub analysis: String,
    /// Analysis converted to HTML.
    pub html: HtmlFragment,
}

impl Report {
    /// Build the report for `url` from a service response.
    pub fn from_result(url: &str, result: AnalysisResult, transformer: &Transformer) -> Self {
        let html = transformer.transform(&result.analysis);
        let thumbnail = result.preferred_thumbnail().map(str::to_string);
        let thumbnail_error = result.thumbnail_error().map(str::to_string);
        let metadata = result.metadata.unwrap_or_default();

        Self {
            url: url.to_string(),
            title: metadata.title.filter(|t| !t.is_empty()),
            thumbnail,
            thumbnail_error,
            channel: metadata.channel.filter(|c| !c.is_empty()),
            duration: metadata.duration,
            views: metadata.views,
            likes: metadata.likes,
            comments: metadata.comments,
            chapters: metadata.chapters.unwrap_or_default(),
            analysis: result.analysis,
            html,
        }
    }

    /// Title for headers and file names, falling back to the URL.
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| text::display_url(&self.url))
    }

    /// Render in `format`. `width` and `styled` only affect [`ReportFormat::Text`].
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render(
        &self,
        format: ReportFormat,
        width: usize,
        styled: bool,
        cs: &ColorScheme,
    ) -> anyhow::Result<String> {
        Ok(match format {
            ReportFormat::Text => self.to_text(width, styled, cs),
            ReportFormat::Html => self.to_html_page(),
            ReportFormat::Fragment => self.html.to_string(),
            ReportFormat::Json => serde_json::to_string_pretty(self)?,
        })
    }

    /// Counters present on the video, as `(label, value)`.
    fn metrics(&self) -> Vec<(&'static str, &Metric)> {
        [
            ("views", self.views.as_ref()),
            ("likes", self.likes.as_ref()),
            ("comments", self.comments.as_ref()),
        ]
        .into_iter()
        .filter_map(|(label, metric)| metric.map(|m| (label, m)))
        .collect()
    }

    /// Channel and duration line, if either is known.
    fn byline(&self) -> Option<String> {
        let duration = self
            .duration
            .as_ref()
            .and_then(Metric::as_u64)
            .map(text::format_clock);
        let parts: Vec<String> = self
            .channel
            .iter()
            .cloned()
            .chain(duration)
            .collect();
        (!parts.is_empty()).then(|| parts.join(" · "))
    }

    /// Terminal rendering. With `styled`, the analysis goes through the
    /// markdown renderer; otherwise its markers are stripped.
    pub fn to_text(&self, width: usize, styled: bool, cs: &ColorScheme) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", cs.bold(&self.display_title()));
        if let Some(byline) = self.byline() {
            let _ = writeln!(out, "{}", cs.gray(&byline));
        }
        let metrics = self.metrics();
        if !metrics.is_empty() {
            let line: Vec<String> = metrics
                .iter()
                .map(|(label, value)| format!("{} {label}", cs.bold(&value.to_string())))
                .collect();
            let _ = writeln!(out, "{}", line.join("  "));
        }
        if let Some(ref thumbnail) = self.thumbnail {
            let _ = writeln!(out, "{} {}", cs.gray("Thumbnail:"), cs.cyan(thumbnail));
        }
        let _ = writeln!(out, "{}", cs.gray(&text::display_url(&self.url)));
        out.push('\n');

        if styled {
            out.push_str(&markdown::render(&self.analysis, width));
        } else {
            out.push_str(&markdown::render_plain(&self.analysis));
        }
        if !out.ends_with('\n') {
            out.push('\n');
        }

        if !self.chapters.is_empty() {
            let count = u64::try_from(self.chapters.len()).unwrap_or(u64::MAX);
            let _ = writeln!(
                out,
                "\n{}",
                cs.bold(&text::pluralize(count, "chapter", "chapters"))
            );
            for chapter in &self.chapters {
                let start = chapter.start_time.map_or_else(String::new, clock);
                let title = chapter.title.as_deref().unwrap_or("");
                // Pad before styling so escape codes do not count toward the width.
                let _ = writeln!(out, "  {}  {title}", cs.gray(&format!("{start:>8}")));
            }
        }
        out
    }

    /// Standalone HTML document for the browser.
    pub fn to_html_page(&self) -> String {
        let mut header = String::new();
        if let Some(ref thumbnail) = self.thumbnail {
            let _ = writeln!(
                header,
                "<img class=\"thumbnail\" src=\"{}\" alt=\"\">",
                html_escape::encode_double_quoted_attribute(thumbnail)
            );
        }
        if let Some(ref title) = self.title {
            let _ = writeln!(header, "<h2>{}</h2>", html_escape::encode_text(title));
        }
        if let Some(byline) = self.byline() {
            let _ = writeln!(
                header,
                "<p class=\"meta\">{}</p>",
                html_escape::encode_text(&byline)
            );
        }
        let metrics = self.metrics();
        if !metrics.is_empty() {
            header.push_str("<ul class=\"metrics\">");
            for (label, value) in metrics {
                let _ = write!(
                    header,
                    "<li><strong>{}</strong> {label}</li>",
                    html_escape::encode_text(&value.to_string())
                );
            }
            header.push_str("</ul>\n");
        }
        let _ = writeln!(
            header,
            "<p class=\"source\"><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></p>",
            html_escape::encode_double_quoted_attribute(&self.url),
            html_escape::encode_text(&text::display_url(&self.url))
        );

        html_page(&self.display_title(), &header, &self.html)
    }
}

/// Complete HTML document around `body`, with `header` (already escaped
/// HTML) placed before it.
pub fn html_page(title: &str, header: &str, body: &HtmlFragment) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>\n{PAGE_STYLE}\n</style>\n</head>\n<body>\n<main>\n\
         {header}<article class=\"analysis\">{body}</article>\n</main>\n</body>\n</html>\n",
        html_escape::encode_text(title),
    )
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clock(seconds: f64) -> String {
    text::format_clock(seconds.max(0.0) as u64)
}
