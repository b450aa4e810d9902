//! Error type for the assistant service client

use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the assistant service.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant service requires an API key")]
    MissingApiKey,
    #[error("network error calling assistant service: {source}")]
    Network {
        #[source]
        source: reqwest::Error,
    },
    #[error("assistant service returned HTTP {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("assistant service returned invalid response: {reason}")]
    InvalidResponse { reason: String },
}

impl AssistantError {
    pub fn network(source: reqwest::Error) -> Self {
        Self::Network { source }
    }

    pub fn status(status: u16, detail: impl Into<String>) -> Self {
        Self::Status {
            status,
            detail: detail.into(),
        }
    }

    pub fn invalid_response(reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            reason: reason.into(),
        }
    }

    /// User-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            AssistantError::MissingApiKey => {
                "The assistant service requires an API key. Set it in client.toml or the \
                 configured environment variable."
                    .to_string()
            }
            AssistantError::Network { source } => {
                if source.is_connect() {
                    "Could not connect to the assistant service.".to_string()
                } else if source.is_timeout() {
                    "The request to the assistant service timed out.".to_string()
                } else {
                    "Network error while talking to the assistant service.".to_string()
                }
            }
            AssistantError::Status { status, .. } => match StatusCode::from_u16(*status) {
                Ok(StatusCode::UNAUTHORIZED) | Ok(StatusCode::FORBIDDEN) => {
                    "The assistant service rejected the API key.".to_string()
                }
                Ok(StatusCode::NOT_FOUND) => {
                    "The assistant service endpoint was not found.".to_string()
                }
                Ok(StatusCode::SERVICE_UNAVAILABLE) | Ok(StatusCode::BAD_GATEWAY) => {
                    "The assistant service is currently unavailable.".to_string()
                }
                _ => format!("Request to the assistant service failed: {status}"),
            },
            AssistantError::InvalidResponse { .. } => {
                "The assistant service returned a response this client could not understand."
                    .to_string()
            }
        }
    }
}
