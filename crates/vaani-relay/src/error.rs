use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("generation credential is not configured")]
    NotConfigured,

    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("invalid upstream chunk: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("upstream stalled: no data for {0} seconds")]
    Stalled(u64),
}
