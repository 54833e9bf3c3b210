//! Wire models of the analysis service.
//!
//! Everything except the analysis body is optional: the service forwards
//! whatever the video platform returned, and fields are frequently `null`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Successful response of `POST /generate`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisResult {
    /// Analysis text in the markdown-like markup dialect.
    pub analysis: String,
    /// Thumbnail candidates, smallest first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Vec<Thumbnail>>,
    /// Video metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<VideoMetadata>,
}

impl AnalysisResult {
    /// URL of the preferred thumbnail: the last entry of the list.
    ///
    /// `None` when the list is absent or empty, or when the last entry has
    /// no URL (the service reports lookup failures as an error-only entry).
    pub fn preferred_thumbnail(&self) -> Option<&str> {
        self.thumbnail
            .as_deref()?
            .last()?
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
    }

    /// Error reported for the thumbnail lookup, if any.
    pub fn thumbnail_error(&self) -> Option<&str> {
        self.thumbnail
            .as_deref()?
            .iter()
            .find_map(|t| t.error.as_deref())
    }
}

/// One thumbnail candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Thumbnail {
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Height in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// `WIDTHxHEIGHT`, possibly partial.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Failure message instead of a thumbnail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Metadata of the analysed video.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct VideoMetadata {
    /// Video title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// View count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<Metric>,
    /// Like count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<Metric>,
    /// Comment count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Metric>,
    /// Uploader name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Metric>,
    /// Chapter markers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapters: Option<Vec<Chapter>>,
}

impl VideoMetadata {
    /// Chapters, empty when absent.
    pub fn chapters(&self) -> &[Chapter] {
        self.chapters.as_deref().unwrap_or_default()
    }
}

/// A chapter marker.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Chapter {
    /// Chapter title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Start offset in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    /// End offset in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
}

/// A counter as sent by the service: a JSON number or an already formatted
/// string. Displayed verbatim.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Metric {
    /// Numeric value.
    Number(serde_json::Number),
    /// Pre-formatted value.
    Text(String),
}

impl Metric {
    /// Non-negative integral value, when the metric is a number.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Metric {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn result(thumbnail: serde_json::Value) -> AnalysisResult {
        serde_json::from_value(json!({ "analysis": "x", "thumbnail": thumbnail })).unwrap()
    }

    #[test]
    fn test_should_require_analysis_body() {
        let err = serde_json::from_value::<AnalysisResult>(json!({ "thumbnail": [] }));
        assert!(err.is_err());
    }

    #[test]
    fn test_should_accept_minimal_result() {
        let r: AnalysisResult = serde_json::from_value(json!({ "analysis": "" })).unwrap();
        assert_eq!(r.analysis, "");
        assert!(r.thumbnail.is_none());
        assert!(r.metadata.is_none());
    }

    #[test]
    fn test_should_prefer_last_thumbnail() {
        let r = result(json!([{ "url": "small" }, { "url": "T", "width": 1280, "height": 720 }]));
        assert_eq!(r.preferred_thumbnail(), Some("T"));
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!([]))]
    #[case(json!([{ "url": "A" }, { "error": "Echec à obtenir les thumbnails" }]))]
    #[case(json!([{ "url": "" }]))]
    fn test_should_have_no_preferred_thumbnail(#[case] thumbnail: serde_json::Value) {
        assert_eq!(result(thumbnail).preferred_thumbnail(), None);
    }

    #[test]
    fn test_should_expose_thumbnail_error() {
        let r = result(json!([{ "error": "boom" }]));
        assert_eq!(r.thumbnail_error(), Some("boom"));
    }

    #[test]
    fn test_should_parse_metadata_with_nulls() {
        let m: VideoMetadata = serde_json::from_value(json!({
            "title": "V",
            "views": 1,
            "likes": null,
            "comments": "3 k",
            "channel": "C",
            "duration": 212,
            "chapters": null
        }))
        .unwrap();
        assert_eq!(m.title.as_deref(), Some("V"));
        assert_eq!(m.views, Some(Metric::from(1)));
        assert_eq!(m.likes, None);
        assert_eq!(m.comments, Some(Metric::Text("3 k".to_string())));
        assert!(m.chapters().is_empty());
    }

    #[test]
    fn test_should_parse_chapters() {
        let m: VideoMetadata = serde_json::from_value(json!({
            "chapters": [{ "title": "Intro", "start_time": 0.0, "end_time": 42.5 }]
        }))
        .unwrap();
        assert_eq!(m.chapters().len(), 1);
        assert_eq!(m.chapters()[0].end_time, Some(42.5));
    }

    #[rstest]
    #[case(json!(1), "1")]
    #[case(json!(12.5), "12.5")]
    #[case(json!("1,2 M"), "1,2 M")]
    fn test_should_display_metric_verbatim(#[case] raw: serde_json::Value, #[case] expected: &str) {
        let metric: Metric = serde_json::from_value(raw).unwrap();
        assert_eq!(metric.to_string(), expected);
    }

    #[rstest]
    #[case(json!(212), Some(212))]
    #[case(json!(212.9), Some(212))]
    #[case(json!(-1), None)]
    #[case(json!("212"), None)]
    fn test_should_read_metric_as_integer(
        #[case] raw: serde_json::Value,
        #[case] expected: Option<u64>,
    ) {
        let metric: Metric = serde_json::from_value(raw).unwrap();
        assert_eq!(metric.as_u64(), expected);
    }

    #[test]
    fn test_should_omit_absent_fields_when_serializing() {
        let r: AnalysisResult = serde_json::from_value(json!({ "analysis": "a" })).unwrap();
        assert_eq!(serde_json::to_value(&r).unwrap(), json!({ "analysis": "a" }));
    }
}
