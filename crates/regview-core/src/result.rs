use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message carried by HTTP and transport failures.
pub const FETCH_FAILED: &str = "Failed to fetch data";

/// Message carried when a successful response is not valid JSON.
pub const DECODE_FAILED: &str = "Failed to decode data";

/// The error a page renders. Holds a fixed message, never the cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadError {
    pub message: String,
}

impl LoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn fetch_failed() -> Self {
        Self::new(FETCH_FAILED)
    }

    pub fn decode_failed() -> Self {
        Self::new(DECODE_FAILED)
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for LoadError {}

/// Outcome of one page load. Serializes untagged, so `Success` is
/// `{"data": ...}` and `HttpFailure` is `{"status": .., "error": {..}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LoadResult {
    Success {
        data: Value,
    },
    HttpFailure {
        status: u16,
        error: LoadError,
    },
    TransportFailure {
        error: LoadError,
        detail: String,
    },
    DecodeFailure {
        status: u16,
        error: LoadError,
        detail: String,
    },
}

impl LoadResult {
    pub fn success(data: Value) -> Self {
        Self::Success { data }
    }

    pub fn http_failure(status: u16) -> Self {
        Self::HttpFailure {
            status,
            error: LoadError::fetch_failed(),
        }
    }

    pub fn transport_failure(detail: impl Into<String>) -> Self {
        Self::TransportFailure {
            error: LoadError::fetch_failed(),
            detail: detail.into(),
        }
    }

    pub fn decode_failure(status: u16, detail: impl Into<String>) -> Self {
        Self::DecodeFailure {
            status,
            error: LoadError::decode_failed(),
            detail: detail.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data } => Some(data),
            _ => None,
        }
    }

    /// HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpFailure { status, .. } | Self::DecodeFailure { status, .. } => Some(*status),
            Self::Success { .. } | Self::TransportFailure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            Self::Success { .. } => None,
            Self::HttpFailure { error, .. }
            | Self::TransportFailure { error, .. }
            | Self::DecodeFailure { error, .. } => Some(error),
        }
    }

    pub fn into_result(self) -> std::result::Result<Value, LoadError> {
        match self {
            Self::Success { data } => Ok(data),
            Self::HttpFailure { error, .. }
            | Self::TransportFailure { error, .. }
            | Self::DecodeFailure { error, .. } => Err(error),
        }
    }
}
