use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use crate::domain::types::{Run, RunState};
use crate::infrastructure::assistant::{AssistantApi, AssistantError};

/// What the polling loop observed last. A timed-out run keeps its
/// last-known state so the caller can report what it was stuck in.
#[derive(Debug)]
pub enum PollOutcome {
    Actionable(Run),
    Terminal(Run),
    TimedOut(Run),
}

/// Watches one run until it needs tool outputs or settles. Pure observer;
/// dispatching and submission live elsewhere so the timeout policy stays
/// independent of tool logic.
pub struct RunPoller {
    api: Arc<dyn AssistantApi>,
    interval: Duration,
    timeout: Duration,
}

impl RunPoller {
    pub fn new(api: Arc<dyn AssistantApi>, interval: Duration, timeout: Duration) -> Self {
        Self {
            api,
            interval,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn await_actionable_or_terminal(
        &self,
        mut run: Run,
    ) -> Result<PollOutcome, AssistantError> {
        let deadline = Instant::now() + self.timeout;
        let mut polls = 0u32;
        loop {
            match &run.state {
                RunState::RequiresAction { tool_calls } => {
                    debug!(
                        run = %run.id,
                        batch = tool_calls.len(),
                        polls,
                        "Run is waiting for tool outputs"
                    );
                    return Ok(PollOutcome::Actionable(run));
                }
                state if state.is_terminal() => {
                    debug!(run = %run.id, status = state.label(), polls, "Run settled");
                    return Ok(PollOutcome::Terminal(run));
                }
                _ => {}
            }

            if Instant::now() >= deadline {
                warn!(
                    run = %run.id,
                    status = run.state.label(),
                    polls,
                    "Run did not settle within the polling window"
                );
                return Ok(PollOutcome::TimedOut(run));
            }

            sleep(self.interval).await;
            run = self.api.fetch_run(&run.thread_id, &run.id).await?;
            polls += 1;
        }
    }
}
