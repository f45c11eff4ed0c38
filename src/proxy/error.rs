//! Proxy failure taxonomy
//!
//! Every way a `/proxy` request can fail, with the HTTP status it maps to.

use std::fmt;

/// Failure class reported for a proxy request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingParameter,
    InvalidUrl,
    UpstreamError,
    NotAnImage,
    PayloadTooLarge,
    Timeout,
    FetchError,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingParameter => "missing_parameter",
            Self::InvalidUrl => "invalid_url",
            Self::UpstreamError => "upstream_error",
            Self::NotAnImage => "not_an_image",
            Self::PayloadTooLarge => "payload_too_large",
            Self::Timeout => "timeout",
            Self::FetchError => "fetch_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Missing ?url parameter")]
    MissingParameter,

    #[error("Invalid URL format")]
    InvalidUrl(#[source] url::ParseError),

    #[error("Remote fetch failed with status {status}{}", reason_suffix(.reason))]
    Upstream { status: u16, reason: String },

    #[error("Remote URL did not return an image (content-type != image/*)")]
    NotAnImage {
        content_type: String,
        snippet: Option<String>,
    },

    #[error("Image too large")]
    PayloadTooLarge { limit: u64 },

    #[error("Fetch timed out")]
    Timeout,

    #[error("{0}")]
    Fetch(String),
}

impl ProxyError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingParameter => ErrorKind::MissingParameter,
            Self::InvalidUrl(_) => ErrorKind::InvalidUrl,
            Self::Upstream { .. } => ErrorKind::UpstreamError,
            Self::NotAnImage { .. } => ErrorKind::NotAnImage,
            Self::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            Self::Timeout => ErrorKind::Timeout,
            Self::Fetch(_) => ErrorKind::FetchError,
        }
    }

    /// HTTP status returned to the caller
    pub const fn status(&self) -> u16 {
        match self {
            Self::MissingParameter | Self::InvalidUrl(_) | Self::NotAnImage { .. } => 400,
            Self::Upstream { status, .. } => *status,
            Self::PayloadTooLarge { .. } => 413,
            Self::Timeout => 504,
            Self::Fetch(_) => 500,
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Fetch(describe_transport_error(&err))
        }
    }
}

fn reason_suffix(reason: &str) -> String {
    if reason.is_empty() {
        String::new()
    } else {
        format!(" {reason}")
    }
}

/// Flatten the error chain so causes like DNS or TLS failures stay visible
fn describe_transport_error(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ProxyError::MissingParameter.status(), 400);
        assert_eq!(
            ProxyError::InvalidUrl(url::ParseError::RelativeUrlWithoutBase).status(),
            400
        );
        assert_eq!(
            ProxyError::NotAnImage {
                content_type: "text/html".to_string(),
                snippet: None
            }
            .status(),
            400
        );
        assert_eq!(ProxyError::PayloadTooLarge { limit: 1 }.status(), 413);
        assert_eq!(ProxyError::Timeout.status(), 504);
        assert_eq!(ProxyError::Fetch("refused".to_string()).status(), 500);
    }

    #[test]
    fn test_upstream_status_is_mirrored() {
        let err = ProxyError::Upstream {
            status: 404,
            reason: "Not Found".to_string(),
        };
        assert_eq!(err.status(), 404);
        assert_eq!(err.kind(), ErrorKind::UpstreamError);
        assert_eq!(
            err.to_string(),
            "Remote fetch failed with status 404 Not Found"
        );
    }

    #[test]
    fn test_upstream_without_reason() {
        let err = ProxyError::Upstream {
            status: 599,
            reason: String::new(),
        };
        assert_eq!(err.to_string(), "Remote fetch failed with status 599");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ProxyError::Timeout.kind().to_string(), "timeout");
        assert_eq!(
            ProxyError::MissingParameter.kind().as_str(),
            "missing_parameter"
        );
    }
}
