use async_trait::async_trait;
use serde_json::Value;

use super::error::BackendError;

/// Transport seam for the knowledge-base service. The dispatcher decides
/// which request to make; implementations only move JSON over the wire.
#[async_trait]
pub trait KnowledgeBackend: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value, BackendError>;

    async fn post(&self, path: &str, body: &Value) -> Result<Value, BackendError>;
}
