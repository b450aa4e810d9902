//! HTTP client for the assistant service

use std::env;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, warn};

use super::dto::{
    CreateMessageRequest, CreateRunRequest, MessageAckDto, MessageListDto, RunDto,
    SubmitToolOutputsRequest, ThreadDto,
};
use super::traits::AssistantApi;
use super::types::AssistantError;
use crate::config::AssistantConfig;
use crate::domain::types::{Run, ToolOutput};

/// Resolve an API key from the environment variable named in the config.
pub fn resolve_api_key(spec: Option<&str>) -> Option<String> {
    let raw = spec.map(str::trim)?;
    if raw.is_empty() {
        return None;
    }
    match env::var(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(env_var = raw, %err, "API key environment variable is not set");
            None
        }
    }
}

#[derive(Clone)]
pub struct HttpAssistantClient {
    endpoint: String,
    assistant_id: String,
    api_key: Option<String>,
    http: Client,
}

impl HttpAssistantClient {
    pub fn new(
        endpoint: impl Into<String>,
        assistant_id: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            assistant_id: assistant_id.into(),
            api_key,
            http: Client::new(),
        }
    }

    pub fn from_config(config: &AssistantConfig, assistant_id: impl Into<String>) -> Self {
        let api_key = resolve_api_key(config.api_key_env.as_deref());
        Self::new(config.endpoint.clone(), assistant_id, api_key)
    }

    fn build_url(&self, path: &str) -> String {
        let base = self.endpoint.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    fn require_api_key(&self) -> Result<&str, AssistantError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(AssistantError::MissingApiKey)
    }

    async fn request<Req, Res>(
        &self,
        method: Method,
        url: &str,
        body: Option<&Req>,
    ) -> Result<Res, AssistantError>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let api_key = self.require_api_key()?;

        let mut request = self
            .http
            .request(method, url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("OpenAI-Beta", "assistants=v2");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(AssistantError::network)?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AssistantError::status(status.as_u16(), detail));
        }

        response
            .json()
            .await
            .map_err(|source| AssistantError::invalid_response(source.to_string()))
    }
}

#[async_trait]
impl AssistantApi for HttpAssistantClient {
    async fn create_thread(&self) -> Result<String, AssistantError> {
        let url = self.build_url("/v1/threads");
        let thread: ThreadDto = self.request(Method::POST, &url, Some(&json!({}))).await?;
        info!(thread = %thread.id, "Created assistant thread");
        Ok(thread.id)
    }

    async fn add_user_message(
        &self,
        thread_id: &str,
        content: &str,
    ) -> Result<(), AssistantError> {
        let url = self.build_url(&format!("/v1/threads/{thread_id}/messages"));
        let payload = CreateMessageRequest {
            role: "user",
            content,
        };
        let ack: MessageAckDto = self.request(Method::POST, &url, Some(&payload)).await?;
        debug!(thread = thread_id, message = %ack.id, "Appended user message");
        Ok(())
    }

    async fn create_run(&self, thread_id: &str) -> Result<Run, AssistantError> {
        let url = self.build_url(&format!("/v1/threads/{thread_id}/runs"));
        let payload = CreateRunRequest {
            assistant_id: &self.assistant_id,
        };
        let run: RunDto = self.request(Method::POST, &url, Some(&payload)).await?;
        run.into_domain()
    }

    async fn fetch_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError> {
        let url = self.build_url(&format!("/v1/threads/{thread_id}/runs/{run_id}"));
        let run: RunDto = self
            .request::<(), RunDto>(Method::GET, &url, None)
            .await?;
        run.into_domain()
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run, AssistantError> {
        let url = self.build_url(&format!(
            "/v1/threads/{thread_id}/runs/{run_id}/submit_tool_outputs"
        ));
        let payload = SubmitToolOutputsRequest {
            tool_outputs: outputs,
        };
        let run: RunDto = self.request(Method::POST, &url, Some(&payload)).await?;
        run.into_domain()
    }

    async fn latest_assistant_message(
        &self,
        thread_id: &str,
    ) -> Result<Option<String>, AssistantError> {
        let url = self.build_url(&format!("/v1/threads/{thread_id}/messages?order=desc&limit=10"));
        let list: MessageListDto = self
            .request::<(), MessageListDto>(Method::GET, &url, None)
            .await?;
        Ok(list.latest_assistant_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_normalizes_slashes() {
        let client = HttpAssistantClient::new("https://api.example.com/", "asst_1", None);
        assert_eq!(
            client.build_url("/v1/threads"),
            "https://api.example.com/v1/threads"
        );
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_request() {
        let client = HttpAssistantClient::new("https://api.example.com", "asst_1", None);
        let result = client.create_thread().await;
        assert!(matches!(result, Err(AssistantError::MissingApiKey)));
    }
}
