//! API error types.

/// Errors from talking to the analysis service.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Non-success response without a recognisable error body.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        message: String,
    },

    /// The service reported a failure with an `{"error": ...}` body.
    #[error("analysis service error ({status}): {message}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Message from the service.
        message: String,
    },

    /// Network/transport error.
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// Response body that is not a valid analysis result.
    #[error("failed to parse analysis response: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Service base URL that is not an absolute `http`/`https` URL.
    #[error("invalid service URL {url:?}: {reason}")]
    InvalidUrl {
        /// The configured base URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl ApiError {
    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::Service { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the service itself reported the failure.
    pub fn is_service_error(&self) -> bool {
        matches!(self, Self::Service { .. })
    }
}
