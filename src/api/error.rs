//! Errors raised by the content API client.

/// Failure to fetch or decode scripture content.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never got a response.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with an unexpected status.
    #[error("server answered with status {0}")]
    Status(u16),
    /// No such translation, book, chapter or reference.
    #[error("not found: {0}")]
    NotFound(String),
    /// Still rate limited after every retry.
    #[error("rate limited by the server")]
    RateLimited,
    /// The response body was not the expected JSON.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid base url {0:?}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Whether this error means "there is nothing there", as opposed to a
    /// transport or server problem.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}
