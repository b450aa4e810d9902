use std::time::Duration;

use thiserror::Error;

use crate::infrastructure::assistant::AssistantError;

#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error(transparent)]
    Assistant(#[from] AssistantError),
    #[error("run {run_id} ended as {status}: {detail}")]
    RunFailed {
        run_id: String,
        status: &'static str,
        detail: String,
    },
    #[error("run {run_id} still {last_status} after {waited:?}")]
    TimedOut {
        run_id: String,
        last_status: &'static str,
        waited: Duration,
    },
    #[error("failed to submit tool outputs for run {run_id}: {source}")]
    Submit {
        run_id: String,
        #[source]
        source: AssistantError,
    },
    #[error("tool outputs requested for run {run_id} in status {status}")]
    NotActionable {
        run_id: String,
        status: &'static str,
    },
    #[error("run {run_id} exceeded {limit} tool rounds")]
    ToolRoundsExceeded { run_id: String, limit: usize },
    #[error("assistant completed run {run_id} without reply text")]
    EmptyReply { run_id: String },
}

impl OrchestrationError {
    pub fn user_message(&self) -> String {
        match self {
            OrchestrationError::Assistant(err) => err.user_message(),
            OrchestrationError::RunFailed { status, detail, .. } => {
                format!("The assistant run ended as {status}: {detail}")
            }
            OrchestrationError::TimedOut { waited, .. } => format!(
                "The assistant did not answer within {} seconds. Try again.",
                waited.as_secs()
            ),
            OrchestrationError::Submit { .. } => {
                "Tool results could not be delivered back to the assistant.".to_string()
            }
            OrchestrationError::NotActionable { .. } => {
                "The assistant run was not waiting for tool results.".to_string()
            }
            OrchestrationError::ToolRoundsExceeded { limit, .. } => {
                format!("The assistant requested tools more than {limit} times in one run.")
            }
            OrchestrationError::EmptyReply { .. } => {
                "The assistant finished without producing a reply.".to_string()
            }
        }
    }
}
