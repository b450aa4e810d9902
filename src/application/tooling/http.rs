//! reqwest-backed transport for the knowledge-base service

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::error::BackendError;
use super::interface::KnowledgeBackend;

#[derive(Clone)]
pub struct HttpKnowledgeBackend {
    endpoint: String,
    http: Client,
}

impl HttpKnowledgeBackend {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: Client::new(),
        }
    }

    fn build_url(&self, path: &str) -> String {
        let base = self.endpoint.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    async fn decode(response: reqwest::Response) -> Result<Value, BackendError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| BackendError::Network { source })?;
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|source| BackendError::InvalidJson { source })
    }
}

#[async_trait]
impl KnowledgeBackend for HttpKnowledgeBackend {
    async fn get(&self, path: &str) -> Result<Value, BackendError> {
        let url = self.build_url(path);
        debug!(%url, "GET knowledge service");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| BackendError::Network { source })?;
        Self::decode(response).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, BackendError> {
        let url = self.build_url(path);
        debug!(%url, "POST knowledge service");
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| BackendError::Network { source })?;
        Self::decode(response).await
    }
}
