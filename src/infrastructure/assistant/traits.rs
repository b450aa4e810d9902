use async_trait::async_trait;

use super::types::AssistantError;
use crate::domain::types::{Run, ToolOutput};

/// The five thread/run operations this client consumes from the assistant
/// service, plus retrieval of the final reply. The service owns the run
/// state machine; everything here is observation or a sanctioned transition.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    async fn create_thread(&self) -> Result<String, AssistantError>;

    async fn add_user_message(&self, thread_id: &str, content: &str)
    -> Result<(), AssistantError>;

    async fn create_run(&self, thread_id: &str) -> Result<Run, AssistantError>;

    async fn fetch_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError>;

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run, AssistantError>;

    /// Most recent assistant message on the thread, text parts concatenated.
    async fn latest_assistant_message(
        &self,
        thread_id: &str,
    ) -> Result<Option<String>, AssistantError>;
}
