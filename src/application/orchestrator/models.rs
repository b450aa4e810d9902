use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;

/// One dispatched tool call, recorded for the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ToolStep {
    pub tool: String,
    pub success: bool,
    pub output: Value,
}

/// Final result of one `ask` call.
#[derive(Debug, Clone)]
pub struct AskOutcome {
    pub thread_id: String,
    pub reply: String,
    pub steps: Vec<ToolStep>,
}

#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
    /// Upper bound on requires_action rounds within one run.
    pub max_tool_rounds: usize,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }
}
