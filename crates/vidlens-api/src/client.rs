//! Client for the analysis service.
//!
//! The service exposes a single endpoint, `POST {base}/generate`, taking
//! `{"url": "<video url>"}` and answering with an [`AnalysisResult`]. On
//! failure it answers `{"error": "<message>"}`, normally with status 500.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::errors::ApiError;
use crate::models::AnalysisResult;

/// Path of the analysis endpoint, relative to the base URL.
const GENERATE_PATH: &str = "generate";

/// Analysis service client.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: reqwest::Client,
    base_url: Url,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    error: String,
}

impl AnalysisClient {
    /// Create a client for the service at `base_url`. A missing trailing
    /// slash is added so the endpoint resolves below the base path.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if `base_url` is not an absolute
    /// `http`/`https` URL.
    pub fn new(http: reqwest::Client, base_url: &str) -> Result<Self, ApiError> {
        let invalid = |reason: String| ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };
        let mut base = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {:?}", base.scheme())));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http,
            base_url: base,
        })
    }

    /// Base URL of the service, always ending with `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL of the analysis endpoint.
    pub fn endpoint(&self) -> Url {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map(|mut segments| {
                segments.pop_if_empty().push(GENERATE_PATH);
            })
            .ok();
        url
    }

    /// Request an analysis of `video_url`.
    ///
    /// The call is all-or-nothing: either a complete [`AnalysisResult`] or
    /// an error. No retry and no timeout.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Service`] when the service answers `{"error": ...}`,
    /// - [`ApiError::Http`] for any other non-success status,
    /// - [`ApiError::Request`] on transport failure,
    /// - [`ApiError::JsonParse`] when the body is not an analysis result.
    pub async fn generate(&self, video_url: &str) -> Result<AnalysisResult, ApiError> {
        let endpoint = self.endpoint();
        debug!(%endpoint, video_url, "requesting analysis");

        let resp = self
            .http
            .post(endpoint)
            .json(&GenerateRequest { url: video_url })
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "analysis request failed");
            return Err(match serde_json::from_str::<ServiceErrorBody>(&body) {
                Ok(err) => ApiError::Service {
                    status: status.as_u16(),
                    message: err.error,
                },
                Err(_) => ApiError::Http {
                    status: status.as_u16(),
                    message: body,
                },
            });
        }

        match serde_json::from_str::<AnalysisResult>(&body) {
            Ok(result) => {
                debug!(bytes = body.len(), "analysis received");
                Ok(result)
            }
            Err(parse_err) => match serde_json::from_str::<ServiceErrorBody>(&body) {
                Ok(err) => Err(ApiError::Service {
                    status: status.as_u16(),
                    message: err.error,
                }),
                Err(_) => Err(parse_err.into()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("http://127.0.0.1:8000/", "http://127.0.0.1:8000/generate")]
    #[case("http://127.0.0.1:8000", "http://127.0.0.1:8000/generate")]
    #[case("https://svc.test/api", "https://svc.test/api/generate")]
    #[case("https://svc.test/api/", "https://svc.test/api/generate")]
    fn test_should_resolve_endpoint(#[case] base: &str, #[case] expected: &str) {
        let client = AnalysisClient::new(reqwest::Client::new(), base).unwrap();
        assert_eq!(client.endpoint().as_str(), expected);
        assert!(client.base_url().path().ends_with('/'));
    }

    #[rstest]
    #[case("not a url", "relative URL without a base")]
    #[case("localhost:8000", "unsupported scheme")]
    fn test_should_reject_unusable_base_url(#[case] base: &str, #[case] reason: &str) {
        let err = AnalysisClient::new(reqwest::Client::new(), base).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
        assert!(err.to_string().contains(reason), "{err}");
    }

    #[test]
    fn test_should_serialize_request_body() {
        let body = serde_json::to_value(GenerateRequest {
            url: "https://v.test/w",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "url": "https://v.test/w" }));
    }
}
