use thiserror::Error;

/// Every way a call to the notes resource can fail.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("invalid base url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{method} {url} returned {status}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
    },

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}
