//! HTTP client construction.

use reqwest::header::{self, HeaderMap, HeaderValue};
use tracing::debug;

/// Options for constructing an HTTP client.
#[derive(Debug)]
pub struct HttpClientOptions {
    /// Application version for the User-Agent.
    pub app_version: String,
}

/// Build a reqwest client sending `vidlens/<version>` as User-Agent and
/// accepting JSON. No timeout is set: analyses can take minutes.
///
/// # Errors
///
/// Returns an error if the client cannot be constructed.
pub fn build_client(opts: &HttpClientOptions) -> anyhow::Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        HeaderValue::from_str(&user_agent(&opts.app_version))?,
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

    debug!(version = %opts.app_version, "building HTTP client");
    let client = reqwest::Client::builder()
        .default_headers(headers)
        .build()?;

    Ok(client)
}

/// User-Agent header value for `version`.
pub fn user_agent(version: &str) -> String {
    format!("vidlens/{version}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_build_client() {
        let opts = HttpClientOptions {
            app_version: "0.1.0".to_string(),
        };
        assert!(build_client(&opts).is_ok());
    }

    #[test]
    fn test_should_reject_unprintable_version() {
        let opts = HttpClientOptions {
            app_version: "0.1.0\n".to_string(),
        };
        assert!(build_client(&opts).is_err());
    }

    #[test]
    fn test_should_format_user_agent() {
        assert_eq!(user_agent("1.2.3"), "vidlens/1.2.3");
    }
}
