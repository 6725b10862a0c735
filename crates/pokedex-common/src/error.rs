/// Error types shared across the Pokédex crates.
///
/// These errors represent failures talking to the remote catalog source or touching the
/// persisted theme preference. Server-specific errors are defined in the server crate and
/// wrap `CommonError` via `#[from]`.
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("upstream returned error: status={status} body={body}")]
    Upstream { status: StatusCode, body: String },

    #[error("theme store error: {0}")]
    Theme(#[from] std::io::Error),
}
