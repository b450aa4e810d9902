use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info};

use super::errors::OrchestrationError;
use super::models::ToolStep;
use crate::application::tooling::ToolDispatcher;
use crate::domain::types::{Run, RunState, ToolOutput};
use crate::infrastructure::assistant::AssistantApi;

#[derive(Debug)]
pub struct ResolvedBatch {
    pub run: Run,
    pub steps: Vec<ToolStep>,
}

/// Answers one requires_action batch: every pending call is dispatched,
/// the full output set is submitted in a single request, and the updated
/// run is handed back for further polling.
pub struct ToolCallResolver {
    api: Arc<dyn AssistantApi>,
    dispatcher: ToolDispatcher,
}

impl ToolCallResolver {
    pub fn new(api: Arc<dyn AssistantApi>, dispatcher: ToolDispatcher) -> Self {
        Self { api, dispatcher }
    }

    pub async fn resolve(&self, run: &Run) -> Result<ResolvedBatch, OrchestrationError> {
        let RunState::RequiresAction { tool_calls } = &run.state else {
            return Err(OrchestrationError::NotActionable {
                run_id: run.id.clone(),
                status: run.state.label(),
            });
        };

        info!(run = %run.id, batch = tool_calls.len(), "Resolving required tool calls");
        // Fan-out: the calls are independent, so latency is bounded by the
        // slowest one. The service only accepts the complete set.
        let dispatches = tool_calls.iter().map(|call| async move {
            let outcome = self.dispatcher.dispatch(&call.name, &call.arguments).await;
            (call.id.clone(), outcome)
        });
        let outcomes = join_all(dispatches).await;

        let mut outputs = Vec::with_capacity(outcomes.len());
        let mut steps = Vec::with_capacity(outcomes.len());
        for (call_id, outcome) in outcomes {
            outputs.push(ToolOutput {
                tool_call_id: call_id,
                output: outcome.output.to_string(),
            });
            steps.push(ToolStep {
                tool: outcome.tool,
                success: outcome.success,
                output: outcome.output,
            });
        }

        // Tool side effects have already happened; a failed submission is
        // terminal for this ask rather than silently retried.
        let updated = self
            .api
            .submit_tool_outputs(&run.thread_id, &run.id, &outputs)
            .await
            .map_err(|source| OrchestrationError::Submit {
                run_id: run.id.clone(),
                source,
            })?;
        debug!(run = %updated.id, status = updated.state.label(), "Submitted tool outputs");

        Ok(ResolvedBatch {
            run: updated,
            steps,
        })
    }
}
