use thiserror::Error;

/// Transport failures against the knowledge-base service. These never escape
/// the dispatcher; each one is folded into an error payload for the batch.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("network error calling knowledge service: {source}")]
    Network {
        #[source]
        source: reqwest::Error,
    },
    #[error("knowledge service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("knowledge service returned invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}
