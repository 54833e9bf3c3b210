//! Command utility types and helpers.

use url::Url;

use crate::config::Config;
use crate::errors::CoreError;

/// Error indicating the user cancelled an operation.
#[derive(Debug, thiserror::Error)]
#[error("user cancelled")]
pub struct CancelError;

/// Error indicating a usage problem with flags or arguments.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct FlagError(pub String);

/// Check if an error represents a user cancellation.
pub fn is_user_cancellation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<CancelError>())
}

/// Parse a user-supplied video URL. Only absolute `http`/`https` URLs with
/// a host are accepted; surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`CoreError::InvalidUrl`] describing the problem.
pub fn parse_video_url(input: &str) -> Result<Url, CoreError> {
    let trimmed = input.trim();
    let invalid = |reason: &str| CoreError::InvalidUrl {
        url: trimmed.to_string(),
        reason: reason.to_string(),
    };
    let url = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(&format!("unsupported scheme {:?}", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host"));
    }
    Ok(url)
}

/// Browser launcher: the `browser` setting, then `$BROWSER`.
pub fn determine_browser<C: Config + ?Sized>(config: &C) -> Option<String> {
    if let Some(browser) = config.browser() {
        return Some(browser);
    }
    std::env::var("BROWSER").ok().filter(|b| !b.is_empty())
}
