use std::sync::Arc;

use tracing::{info, warn};

use super::errors::OrchestrationError;
use super::models::{AskOutcome, OrchestratorOptions, ToolStep};
use super::poller::{PollOutcome, RunPoller};
use super::resolver::ToolCallResolver;
use crate::application::tooling::ToolDispatcher;
use crate::domain::types::{Run, RunState, Session};
use crate::infrastructure::assistant::{AssistantApi, AssistantError};

/// Drives one assistant conversation: appends user messages, triggers runs,
/// and alternates the poller and resolver until each run settles.
pub struct Conversation {
    api: Arc<dyn AssistantApi>,
    poller: RunPoller,
    resolver: ToolCallResolver,
    max_tool_rounds: usize,
}

impl Conversation {
    pub fn new(
        api: Arc<dyn AssistantApi>,
        dispatcher: ToolDispatcher,
        options: OrchestratorOptions,
    ) -> Self {
        let poller = RunPoller::new(api.clone(), options.poll_interval, options.poll_timeout);
        let resolver = ToolCallResolver::new(api.clone(), dispatcher);
        Self {
            api,
            poller,
            resolver,
            max_tool_rounds: options.max_tool_rounds,
        }
    }

    pub async fn start_session(&self) -> Result<Session, AssistantError> {
        let thread_id = self.api.create_thread().await?;
        info!(thread = %thread_id, "Conversation session started");
        Ok(Session::new(thread_id))
    }

    pub async fn ask(
        &self,
        session: &Session,
        message: &str,
    ) -> Result<AskOutcome, OrchestrationError> {
        info!(thread = %session.thread_id, "Submitting user message");
        self.api
            .add_user_message(&session.thread_id, message)
            .await?;
        let mut run = self.api.create_run(&session.thread_id).await?;
        info!(thread = %session.thread_id, run = %run.id, "Run created");

        let mut steps = Vec::new();
        let mut remaining_rounds = self.max_tool_rounds;
        loop {
            match self.poller.await_actionable_or_terminal(run).await? {
                PollOutcome::Actionable(actionable) => {
                    if remaining_rounds == 0 {
                        warn!(run = %actionable.id, "Run exceeded the tool round limit");
                        return Err(OrchestrationError::ToolRoundsExceeded {
                            run_id: actionable.id,
                            limit: self.max_tool_rounds,
                        });
                    }
                    remaining_rounds -= 1;
                    let resolved = self.resolver.resolve(&actionable).await?;
                    steps.extend(resolved.steps);
                    run = resolved.run;
                }
                PollOutcome::Terminal(terminal) => {
                    return self.conclude(session, terminal, steps).await;
                }
                PollOutcome::TimedOut(last) => {
                    return Err(OrchestrationError::TimedOut {
                        run_id: last.id,
                        last_status: last.state.label(),
                        waited: self.poller.timeout(),
                    });
                }
            }
        }
    }

    async fn conclude(
        &self,
        session: &Session,
        run: Run,
        steps: Vec<ToolStep>,
    ) -> Result<AskOutcome, OrchestrationError> {
        let status = run.state.label();
        match run.state {
            RunState::Completed => {
                let reply = self.api.latest_assistant_message(&session.thread_id).await?;
                match reply {
                    Some(text) => {
                        info!(
                            thread = %session.thread_id,
                            run = %run.id,
                            tool_steps = steps.len(),
                            "Run completed"
                        );
                        Ok(AskOutcome {
                            thread_id: session.thread_id.clone(),
                            reply: text,
                            steps,
                        })
                    }
                    None => Err(OrchestrationError::EmptyReply { run_id: run.id }),
                }
            }
            RunState::Failed { error } => Err(OrchestrationError::RunFailed {
                run_id: run.id,
                status,
                detail: error.unwrap_or_else(|| "no detail provided".to_string()),
            }),
            RunState::Cancelled => Err(OrchestrationError::RunFailed {
                run_id: run.id,
                status,
                detail: "run was cancelled".to_string(),
            }),
            RunState::Expired => Err(OrchestrationError::RunFailed {
                run_id: run.id,
                status,
                detail: "run expired before completing".to_string(),
            }),
            RunState::Queued | RunState::InProgress | RunState::RequiresAction { .. } => Err(
                OrchestrationError::Assistant(AssistantError::invalid_response(format!(
                    "run {id} concluded while still {status}",
                    id = run.id
                ))),
            ),
        }
    }
}
