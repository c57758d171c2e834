use thiserror::Error;

/// Any failure while talking to the media-indexing service. Callers treat
/// these uniformly: the first upstream failure aborts the whole operation,
/// and a partial result is never surfaced as a complete one.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("upstream response was not in the expected shape: {0}")]
    Decode(String),
}
