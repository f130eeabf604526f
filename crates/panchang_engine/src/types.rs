use std::fmt;

use panchang_core::PanchangReport;

use crate::decode::{decode_html, DecodedHtml};

pub const NO_CONNECTIVITY_MESSAGE: &str = "No internet connection. Please check your network.";

/// Outcome of one request: the assembled report, or the terminal fetch failure.
pub type FetchResult = Result<PanchangReport, FetchError>;

/// Unparsed response body for one date. Lives for one fetch-and-parse cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub final_url: String,
    /// Number of HTTP requests issued, including the successful one.
    pub attempts: u32,
}

impl RawDocument {
    pub fn decode(&self) -> DecodedHtml {
        decode_html(&self.bytes, self.content_type.as_deref())
    }
}

/// Terminal failure of the fetch stage. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn no_connectivity() -> Self {
        Self {
            kind: FailureKind::NoConnectivity,
            message: NO_CONNECTIVITY_MESSAGE.to_string(),
        }
    }

    pub(crate) fn failed(kind: FailureKind, details: impl fmt::Display) -> Self {
        Self {
            kind,
            message: format!("Failed to fetch data: {details}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    NoConnectivity,
    InvalidRequest,
    HttpStatus(u16),
    Timeout,
    Network,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
}

impl FailureKind {
    /// Whether another attempt may succeed, given the configured retry statuses.
    pub(crate) fn is_transient(&self, retry_statuses: &[u16]) -> bool {
        match self {
            FailureKind::HttpStatus(code) => retry_statuses.contains(code),
            FailureKind::Timeout | FailureKind::Network => true,
            _ => false,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::NoConnectivity => write!(f, "no connectivity"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_user_facing_wording() {
        assert_eq!(FetchError::no_connectivity().to_string(), NO_CONNECTIVITY_MESSAGE);
        let err = FetchError::failed(FailureKind::HttpStatus(503), "503 Service Unavailable");
        assert_eq!(err.to_string(), "Failed to fetch data: 503 Service Unavailable");
    }

    #[test]
    fn transient_classification() {
        let retry = [429, 500, 502, 503, 504];
        assert!(FailureKind::HttpStatus(503).is_transient(&retry));
        assert!(!FailureKind::HttpStatus(404).is_transient(&retry));
        assert!(FailureKind::Timeout.is_transient(&retry));
        assert!(FailureKind::Network.is_transient(&retry));
        assert!(!FailureKind::InvalidRequest.is_transient(&retry));
        assert!(!FailureKind::TooLarge { max_bytes: 1, actual: None }.is_transient(&retry));
    }
}
