#[derive(Debug, thiserror::Error)]
pub enum RegviewError {
    #[cfg(feature = "network")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// For `Fetch` implementations not backed by reqwest: no response was
    /// received at all.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("bad config file {path}: {reason}")]
    Config { path: String, reason: String },

    #[error("invalid base URL {0:?}: expected http:// or https://")]
    BaseUrl(String),

    #[error("IO error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, RegviewError>;
