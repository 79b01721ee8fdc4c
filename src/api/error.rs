use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: StatusCode,
        reason: Option<String>,
    },

    #[error("Failed to parse JSON response from {url}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// How a failed request should be treated by its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The resource does not exist (e.g. a sensor without data for that hour).
    NotFound,
    /// The request was not authenticated; no later request can succeed either.
    Unauthorized,
    /// Network failure, timeout, throttling or server error. Worth retrying.
    Transient,
    /// Any other client-side rejection.
    Rejected,
    /// The server answered, but not with JSON.
    Malformed,
}

pub(crate) fn retriable_status(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            ApiError::Network { source, .. } => source.status(),
            _ => None,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            ApiError::ClientBuild(_) => ErrorClass::Rejected,
            ApiError::Network { .. } => ErrorClass::Transient,
            ApiError::Json { .. } => ErrorClass::Malformed,
            ApiError::HttpStatus { status, .. } => match *status {
                StatusCode::NOT_FOUND => ErrorClass::NotFound,
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorClass::Unauthorized,
                s if retriable_status(s) => ErrorClass::Transient,
                _ => ErrorClass::Rejected,
            },
        }
    }
}
