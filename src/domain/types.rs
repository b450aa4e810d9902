use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Handle for one conversation thread on the assistant service.
///
/// The thread itself lives server-side; dropping the session discards the
/// handle without any remote cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub thread_id: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            created_at: Utc::now(),
        }
    }
}

/// A single tool invocation requested by the assistant mid-run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Map<String, Value>,
}

/// Answer to one [`ToolCall`]; `output` carries the serialized JSON payload
/// the service forwards back to the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub output: String,
}

/// Run lifecycle as reported by the assistant service. The pending tool-call
/// batch exists only while the service waits for outputs, so it rides on the
/// `RequiresAction` variant instead of a nullable field.
#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    Queued,
    InProgress,
    RequiresAction { tool_calls: Vec<ToolCall> },
    Completed,
    Failed { error: Option<String> },
    Cancelled,
    Expired,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Completed
                | RunState::Failed { .. }
                | RunState::Cancelled
                | RunState::Expired
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            RunState::Queued => "queued",
            RunState::InProgress => "in_progress",
            RunState::RequiresAction { .. } => "requires_action",
            RunState::Completed => "completed",
            RunState::Failed { .. } => "failed",
            RunState::Cancelled => "cancelled",
            RunState::Expired => "expired",
        }
    }
}

/// One execution attempt of the assistant against a thread.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub id: String,
    pub thread_id: String,
    pub state: RunState,
}

impl Run {
    pub fn new(id: impl Into<String>, thread_id: impl Into<String>, state: RunState) -> Self {
        Self {
            id: id.into(),
            thread_id: thread_id.into(),
            state,
        }
    }
}
